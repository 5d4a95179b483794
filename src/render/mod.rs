//! GPU-Rendering mit wgpu.

mod background_renderer;
mod callback;
mod compositor;
mod outline_overlay;
mod scene_renderer;
mod texture;
mod types;

pub use crate::shared::RenderScene;
pub(crate) use background_renderer::BackgroundRenderer;
pub use callback::{WgpuRenderCallback, WgpuRenderData};
pub(crate) use compositor::Compositor;
pub use outline_overlay::{
    decode_id_rgb8, encode_id_color, mask_dims, pack_width, supersampling_factor, OverlayError,
    MAX_TARGETS, MAX_WIDTH,
};
pub(crate) use outline_overlay::OutlineOverlay;
pub(crate) use scene_renderer::{SceneRenderer, ScenePass};
pub use texture::create_texture_from_image;
use types::RenderContext;

use eframe::{egui_wgpu, wgpu};
use image::DynamicImage;

use crate::core::Material;

/// Offscreen-Ziele der sichtbaren Szene (physische Auflösung).
struct BeautyTargets {
    _color: wgpu::Texture,
    color_view: wgpu::TextureView,
    _depth: wgpu::Texture,
    depth_view: wgpu::TextureView,
    size: [u32; 2],
}

/// Haupt-Renderer des Szenen-Viewers.
///
/// Dieser Renderer verwaltet seinen eigenen Zustand (GPU-Buffer, Pipelines)
/// und bietet eine saubere API: `new()` + `prepare()` + `paint()` +
/// `set_panorama()`. Die Frame-Sequenz: Beauty-Pass offscreen (Panorama,
/// Tiefen-Vorpässe, transparente Füllungen), dann das Outline-Overlay
/// (Maske → LUT → Kantensuche), zuletzt Kompositierung in den egui-Pass.
pub struct Renderer {
    background_renderer: BackgroundRenderer,
    scene_renderer: SceneRenderer,
    outline_overlay: OutlineOverlay,
    compositor: Compositor,

    beauty: Option<BeautyTargets>,
    materials: Vec<Material>,
}

impl Renderer {
    /// Erstellt einen neuen Renderer
    pub fn new(render_state: &egui_wgpu::RenderState) -> Self {
        let device = &render_state.device;

        // Shader einmalig laden — alle Sub-Renderer teilen dasselbe ShaderModule
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Viewer Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let background_renderer = BackgroundRenderer::new(render_state, &shader);
        let scene_renderer = SceneRenderer::new(render_state, &shader);
        let outline_overlay = OutlineOverlay::new(render_state, &shader);
        let compositor = Compositor::new(render_state, &shader);

        Self {
            background_renderer,
            scene_renderer,
            outline_overlay,
            compositor,
            beauty: None,
            materials: Vec::new(),
        }
    }

    /// Zeichnet alle Offscreen-Pässe des Frames in den Encoder.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        scene: &RenderScene,
    ) {
        let ctx = RenderContext {
            device,
            queue,
            scene,
        };

        self.ensure_beauty_targets(device, scene.physical_size());

        self.scene_renderer.prepare(&ctx);

        // Materialtabelle des Frames (wird für den Masken-Pass getauscht)
        self.materials.clear();
        self.materials
            .extend(scene.scene.nodes.iter().map(|n| n.material));

        // 1) Beauty-Pass: Panorama, dann Geometrie sortiert nach render_order
        self.scene_renderer
            .write_uniforms(&ctx, ScenePass::Beauty, &self.materials);
        self.background_renderer.prepare(&ctx);

        {
            let beauty = self.beauty.as_ref().expect("Beauty-Ziele existieren");
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Beauty Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &beauty.color_view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &beauty.depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.background_renderer
                .render(&mut pass, scene.background_visible);
            self.scene_renderer
                .draw(&mut pass, ScenePass::Beauty, &self.materials);
        }

        // 2) Outline-Overlay: Maske → LUT → Kantensuche
        match self.outline_overlay.update(
            &ctx,
            encoder,
            &mut self.materials,
            &mut self.scene_renderer,
        ) {
            Ok(realloc) => {
                if Self::needs_outline_rebind(realloc, self.compositor.has_outline_view()) {
                    self.compositor
                        .set_outline_view(device, self.outline_overlay.outline_view());
                }
            }
            Err(e) => {
                log::error!("Outline-Overlay übersprungen: {}", e);
                self.compositor.set_outline_view(device, None);
            }
        }
    }

    /// Kompositiert Beauty und Outline in den egui-Render-Pass.
    pub fn paint(&self, render_pass: &mut wgpu::RenderPass<'static>) {
        self.compositor.composite(render_pass);
    }

    /// Setzt das Panorama-Bild
    pub fn set_panorama(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DynamicImage,
    ) {
        self.background_renderer.set_panorama(device, queue, image);
    }

    /// Entfernt das Panorama
    pub fn clear_panorama(&mut self) {
        self.background_renderer.clear_panorama();
    }

    /// Gibt alle Offscreen-Ressourcen frei (idempotent).
    pub fn dispose(&mut self) {
        self.outline_overlay.dispose();
        self.beauty = None;
    }

    /// Ob der Kompositor das Outline-Ziel neu binden muss.
    ///
    /// Ein übersprungener Overlay-Frame löst die Bindung; das nächste
    /// erfolgreiche Update muss sie auch ohne Realloc wiederherstellen.
    fn needs_outline_rebind(realloc: bool, outline_bound: bool) -> bool {
        realloc || !outline_bound
    }

    fn ensure_beauty_targets(&mut self, device: &wgpu::Device, size: [u32; 2]) {
        if self.beauty.as_ref().is_some_and(|b| b.size == size) {
            return;
        }
        log::debug!("Beauty-Ziele neu anlegen: {}x{}", size[0], size[1]);
        let (color, color_view) = texture::create_color_target(device, "Beauty Target", size);
        let (depth, depth_view) = texture::create_depth_target(device, "Beauty Depth Target", size);
        self.compositor.set_beauty_view(device, &color_view);
        self.beauty = Some(BeautyTargets {
            _color: color,
            color_view,
            _depth: depth,
            depth_view,
            size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_rebinds_after_skipped_frame() {
        // Ein Fehlerframe hat die Bindung gelöst; das nächste erfolgreiche
        // Update bindet neu, obwohl die Maskenauflösung unverändert blieb
        assert!(Renderer::needs_outline_rebind(false, false));
        // Realloc bindet immer neu
        assert!(Renderer::needs_outline_rebind(true, true));
        // Unveränderte Auflösung mit intakter Bindung bleibt unangetastet
        assert!(!Renderer::needs_outline_rebind(false, true));
    }
}
