//! ID-Mask-basiertes Outline-Overlay.
//!
//! Pro Frame laufen drei Schritte:
//! 1. ID-Maske: die Szene wird mit getauschten Materialien gezeichnet —
//!    Outline-Ziele bekommen ihre 1-basierte Listen-Position als 24-Bit-Farbe,
//!    alle übrigen Nodes ein gemeinsames Blocker-Material ohne Farbschreiben
//!    (korrekte Verdeckung, ID 0).
//! 2. Stil-LUT: Farbe/Deckkraft/Breite jedes Ziels landen in zwei schmalen
//!    Lookup-Texturen, adressiert über (ID − 1).
//! 3. Kantensuche: ein Fullscreen-Pass dekodiert pro Pixel die ID, sucht in
//!    bis zu drei Ringen aus acht Kompassrichtungen den ersten abweichenden
//!    Nachbarn und zeichnet eine gefederte Kontur im Stil des Gewinners.
//!
//! Die Maske läuft mit Supersampling-Faktor `ss = max(1, 3 − dpr)`; das
//! Outline-Ziel wird beim Kompositieren linear heruntergefiltert.

use std::time::{Duration, Instant};

use eframe::{egui_wgpu, wgpu};

use super::scene_renderer::{SceneRenderer, ScenePass};
use super::texture::{create_color_target, create_depth_target};
use super::types::{OutlineUniforms, RenderContext, OFFSCREEN_FORMAT};
use crate::core::{Material, Scene, Stroke};

/// Obergrenze der Konturbreite in Masken-Pixeln (Synchron mit dem Shader).
pub const MAX_WIDTH: f32 = 32.0;

/// Höchste darstellbare Ziel-Anzahl (24-Bit-ID-Raum, ID 0 ist Hintergrund).
pub const MAX_TARGETS: usize = (1 << 24) - 1;

/// Fehler des Outline-Overlays.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// Mehr Ziele als der 24-Bit-ID-Raum adressieren kann.
    #[error("zu viele Outline-Ziele: {0} (Maximum {MAX_TARGETS})")]
    TooManyTargets(usize),
}

/// Supersampling-Faktor der ID-Maske aus dem Device-Pixel-Ratio.
///
/// Niedrige DPR-Werte bekommen mehr interne Auflösung, hohe keine —
/// so bleibt die Gesamt-Samplezahl beschränkt.
pub fn supersampling_factor(pixels_per_point: f32) -> u32 {
    (3 - pixels_per_point.round() as i32).max(1) as u32
}

/// Maskengröße aus physischer Viewport-Größe und Supersampling-Faktor.
pub fn mask_dims(physical: [u32; 2], ss: u32) -> [u32; 2] {
    [(physical[0] * ss).max(1), (physical[1] * ss).max(1)]
}

/// Kodiert eine 1-basierte Ziel-ID als RGB-Farbe (24 Bit, Big-Endian).
pub fn encode_id_color(id: u32) -> [f32; 3] {
    [
        ((id >> 16) & 0xff) as f32 / 255.0,
        ((id >> 8) & 0xff) as f32 / 255.0,
        (id & 0xff) as f32 / 255.0,
    ]
}

/// Dekodiert die RGB-Bytes eines Maskenpixels zurück zur ID.
pub fn decode_id_rgb8(rgb: [u8; 3]) -> u32 {
    ((rgb[0] as u32) << 16) | ((rgb[1] as u32) << 8) | rgb[2] as u32
}

/// Packt eine Konturbreite (logische Pixel) für die Breiten-LUT.
///
/// Breite wird gerundet, mit dem Supersampling-Faktor skaliert, auf
/// [1, MAX_WIDTH] geklemmt und normiert abgelegt. Der Shader dekodiert mit
/// `max(1, floor(wn * MAX_WIDTH + 0.5))` — der Faktor 2 in der Normierung
/// macht den dekodierten Wert zur vollen Strichbreite (halbe Breite beidseits
/// der Kante).
pub fn pack_width(width: f32, ss: u32) -> u8 {
    let wpx = (width.round() * ss as f32).clamp(1.0, MAX_WIDTH);
    ((wpx * 2.0 / MAX_WIDTH) * 255.0).round().min(255.0) as u8
}

/// Prüft die Ziel-Anzahl gegen den ID-Raum.
fn check_capacity(count: usize) -> Result<(), OverlayError> {
    if count > MAX_TARGETS {
        return Err(OverlayError::TooManyTargets(count));
    }
    Ok(())
}

/// Ein eingesammeltes Outline-Ziel.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TargetEntry {
    /// Index des Nodes in `scene.nodes`
    pub node_index: usize,
    /// Stil zum Zeitpunkt der Sammlung
    pub stroke: Stroke,
}

/// Geordnete Ziel-Liste eines Frames; die ID eines Eintrags ist
/// seine Listen-Position + 1.
#[derive(Debug, Default)]
pub(crate) struct TargetRegistry {
    pub entries: Vec<TargetEntry>,
}

/// Sammelt alle Stroke-getaggten Nodes ein.
///
/// `highlight` überschreibt den Stil des getroffenen Ziels mit Weiß
/// (Hover-Hervorhebung).
pub(crate) fn collect_targets(
    scene: &Scene,
    highlight: Option<usize>,
) -> Result<TargetRegistry, OverlayError> {
    let mut registry = TargetRegistry::default();
    for (node_index, node) in scene.nodes.iter().enumerate() {
        let Some(mut stroke) = node.stroke else {
            continue;
        };
        if highlight == Some(node_index) {
            stroke.color = [1.0, 1.0, 1.0];
        }
        registry.entries.push(TargetEntry { node_index, stroke });
    }
    check_capacity(registry.entries.len())?;
    Ok(registry)
}

/// Cache der Masken-Materialien.
///
/// Eintrag 0 ist das geteilte Blocker-Material (nur Tiefe), Eintrag i das
/// ID-Material des Ziels i. Der Cache wächst mit der Ziel-Anzahl und
/// schrumpft nach einer Sekunde ohne Bedarf wieder auf einen Eintrag.
pub(crate) struct MaskMaterialCache {
    materials: Vec<Material>,
    last_demand: Instant,
}

impl MaskMaterialCache {
    const COOLDOWN: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            materials: vec![Material::depth_only()],
            last_demand: Instant::now(),
        }
    }

    /// Geteiltes Blocker-Material (schreibt keine Farbe).
    pub fn blocker(&self) -> Material {
        self.materials[0]
    }

    /// ID-Material des Ziels an Listen-Position `index` (ID = index + 1).
    pub fn target(&mut self, index: usize) -> Material {
        while self.materials.len() <= index + 1 {
            let id = self.materials.len() as u32;
            self.materials.push(Material::fill(encode_id_color(id), 1.0));
        }
        self.materials[index + 1]
    }

    /// Meldet aktuellen Bedarf und schrumpft bei abgelaufenem Cooldown.
    pub fn maintain(&mut self, demand: usize, now: Instant) {
        if demand > 0 {
            self.last_demand = now;
        }
        if self.materials.len() > 1 && now.duration_since(self.last_demand) > Self::COOLDOWN {
            self.materials.truncate(1);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.materials.len()
    }
}

/// Scoped-Tausch der Materialtabelle für den Masken-Pass.
///
/// `apply` ersetzt jeden Eintrag: Ziele bekommen ihr ID-Material, alle
/// übrigen das Blocker-Material. `Drop` stellt die Originale garantiert
/// wieder her, auch wenn der Pass vorzeitig abbricht.
pub(crate) struct MaskScope<'a> {
    table: &'a mut [Material],
    saved: Vec<Material>,
}

impl<'a> MaskScope<'a> {
    pub fn apply(
        table: &'a mut [Material],
        registry: &TargetRegistry,
        cache: &mut MaskMaterialCache,
    ) -> Self {
        let saved = table.to_vec();
        let blocker = cache.blocker();
        table.fill(blocker);
        for (index, entry) in registry.entries.iter().enumerate() {
            if let Some(slot) = table.get_mut(entry.node_index) {
                *slot = cache.target(index);
            }
        }
        Self { table, saved }
    }

    /// Die getauschte Tabelle für Uniform-Upload und Zeichnen.
    pub fn table(&self) -> &[Material] {
        self.table
    }
}

impl Drop for MaskScope<'_> {
    fn drop(&mut self) {
        self.table.copy_from_slice(&self.saved);
    }
}

/// Offscreen-Ziele des Overlays (Maske + Outline, gleiche Größe).
struct OverlayTargets {
    _mask_texture: wgpu::Texture,
    mask_view: wgpu::TextureView,
    _mask_depth: wgpu::Texture,
    mask_depth_view: wgpu::TextureView,
    _outline_texture: wgpu::Texture,
    outline_view: wgpu::TextureView,
    size: [u32; 2],
}

/// Stil-LUT: zwei N×1-Texturen, adressiert über (ID − 1).
struct StyleLut {
    params_texture: wgpu::Texture,
    width_texture: wgpu::Texture,
    params_view: wgpu::TextureView,
    width_view: wgpu::TextureView,
    size: u32,
}

/// Orchestrator des Outline-Overlays.
pub(crate) struct OutlineOverlay {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,

    targets: Option<OverlayTargets>,
    lut: Option<StyleLut>,
    bind_group: Option<wgpu::BindGroup>,
    cache: MaskMaterialCache,
    lut_size: u32,
}

impl OutlineOverlay {
    /// Erstellt das Overlay (Pipeline + Uniform-Buffer; Ziele entstehen lazy).
    pub fn new(render_state: &egui_wgpu::RenderState, shader: &wgpu::ShaderModule) -> Self {
        let device = &render_state.device;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Outline Uniform Buffer"),
            size: std::mem::size_of::<OutlineUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                // textureLoad, daher keine Filterbarkeit nötig
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Outline Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1), // ID-Maske
                texture_entry(2), // Params-LUT
                texture_entry(3), // Breiten-LUT
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Outline Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Outline Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_outline"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: OFFSCREEN_FORMAT,
                    // Ziel wird transparent geleert, der Pass schreibt direkt
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            targets: None,
            lut: None,
            bind_group: None,
            cache: MaskMaterialCache::new(),
            lut_size: 0,
        }
    }

    /// Outline-Ziel für den Kompositor (None vor dem ersten Update / nach dispose).
    pub fn outline_view(&self) -> Option<&wgpu::TextureView> {
        self.targets.as_ref().map(|t| &t.outline_view)
    }

    /// Voller Rechenzyklus: Maske → LUT → Outline.
    ///
    /// `materials` ist die Beauty-Materialtabelle des Frames; sie wird für den
    /// Masken-Pass getauscht und garantiert wiederhergestellt. Liefert `true`,
    /// wenn das Outline-Ziel neu angelegt wurde (Kompositor muss neu binden).
    pub fn update(
        &mut self,
        ctx: &RenderContext<'_>,
        encoder: &mut wgpu::CommandEncoder,
        materials: &mut [Material],
        scene_renderer: &mut SceneRenderer,
    ) -> Result<bool, OverlayError> {
        let frame = ctx.scene;
        let ss = supersampling_factor(frame.pixels_per_point);
        let dims = mask_dims(frame.physical_size(), ss);
        let realloc = self.ensure_targets(ctx.device, dims);

        let registry = collect_targets(&frame.scene, frame.highlight)?;
        self.cache.maintain(registry.entries.len(), Instant::now());

        // 1) ID-Maske
        {
            let scope = MaskScope::apply(materials, &registry, &mut self.cache);
            scene_renderer.write_uniforms(ctx, ScenePass::Mask, scope.table());

            let targets = self.targets.as_ref().expect("ensure_targets garantiert Ziele");
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Mask Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &targets.mask_view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &targets.mask_depth_view,
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
            scene_renderer.draw(&mut pass, ScenePass::Mask, scope.table());
        } // MaskScope stellt hier die Materialien wieder her

        // 2) Stil-LUT
        let lut_changed = self.build_lut(ctx, &registry, ss);
        if realloc || lut_changed || self.bind_group.is_none() {
            self.rebuild_bind_group(ctx.device);
        }

        // 3) Kantensuche
        let uniforms = OutlineUniforms {
            feather_px: frame.feather_px.max(0.0),
            rings: frame.outline_rings.clamp(1, 3),
            lut_size: self.lut_size,
            _padding: 0,
        };
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let targets = self.targets.as_ref().expect("ensure_targets garantiert Ziele");
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Outline Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &targets.outline_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();
        if self.lut_size > 0 {
            if let Some(bind_group) = self.bind_group.as_ref() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, bind_group, &[]);
                pass.draw(0..3, 0..1);
            }
        }

        Ok(realloc)
    }

    /// Legt Masken-/Outline-Ziele bei Größenwechsel neu an.
    fn ensure_targets(&mut self, device: &wgpu::Device, dims: [u32; 2]) -> bool {
        if self.targets.as_ref().is_some_and(|t| t.size == dims) {
            return false;
        }
        log::debug!("Outline-Ziele neu anlegen: {}x{}", dims[0], dims[1]);
        let (mask_texture, mask_view) = create_color_target(device, "Mask Target", dims);
        let (mask_depth, mask_depth_view) = create_depth_target(device, "Mask Depth Target", dims);
        let (outline_texture, outline_view) = create_color_target(device, "Outline Target", dims);
        self.targets = Some(OverlayTargets {
            _mask_texture: mask_texture,
            mask_view,
            _mask_depth: mask_depth,
            mask_depth_view,
            _outline_texture: outline_texture,
            outline_view,
            size: dims,
        });
        self.bind_group = None;
        true
    }

    /// Baut die Stil-LUT auf; Realloc nur bei geänderter Ziel-Anzahl.
    ///
    /// Liefert `true`, wenn die Texturen neu angelegt wurden.
    fn build_lut(&mut self, ctx: &RenderContext<'_>, registry: &TargetRegistry, ss: u32) -> bool {
        let count = registry.entries.len();
        self.lut_size = count as u32;

        if count == 0 {
            let had_lut = self.lut.take().is_some();
            if had_lut {
                self.bind_group = None;
            }
            return had_lut;
        }

        let mut params = Vec::with_capacity(count * 4);
        let mut widths = Vec::with_capacity(count);
        for entry in &registry.entries {
            let stroke = &entry.stroke;
            for channel in 0..3 {
                params.push((stroke.color[channel].clamp(0.0, 1.0) * 255.0).round() as u8);
            }
            params.push((stroke.opacity.clamp(0.0, 1.0) * 255.0).round() as u8);
            widths.push(pack_width(stroke.width, ss));
        }

        let realloc = self.lut.as_ref().map_or(true, |lut| lut.size != count as u32);
        if realloc {
            let make = |format: wgpu::TextureFormat, label: &str| {
                ctx.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: count as u32,
                        height: 1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                })
            };
            let params_texture = make(wgpu::TextureFormat::Rgba8Unorm, "Outline Params LUT");
            let width_texture = make(wgpu::TextureFormat::R8Unorm, "Outline Width LUT");
            let params_view = params_texture.create_view(&wgpu::TextureViewDescriptor::default());
            let width_view = width_texture.create_view(&wgpu::TextureViewDescriptor::default());
            self.lut = Some(StyleLut {
                params_texture,
                width_texture,
                params_view,
                width_view,
                size: count as u32,
            });
        }

        let lut = self.lut.as_ref().expect("LUT existiert nach Realloc");
        let extent = wgpu::Extent3d {
            width: count as u32,
            height: 1,
            depth_or_array_layers: 1,
        };
        ctx.queue.write_texture(
            lut.params_texture.as_image_copy(),
            &params,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * count as u32),
                rows_per_image: Some(1),
            },
            extent,
        );
        ctx.queue.write_texture(
            lut.width_texture.as_image_copy(),
            &widths,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(count as u32),
                rows_per_image: Some(1),
            },
            extent,
        );

        realloc
    }

    fn rebuild_bind_group(&mut self, device: &wgpu::Device) {
        let (Some(targets), Some(lut)) = (self.targets.as_ref(), self.lut.as_ref()) else {
            self.bind_group = None;
            return;
        };
        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Outline Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.mask_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&lut.params_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&lut.width_view),
                },
            ],
        }));
    }

    /// Gibt alle Offscreen-Ressourcen frei. Mehrfach aufrufbar.
    pub fn dispose(&mut self) {
        let had_resources = self.targets.take().is_some() | self.lut.take().is_some();
        self.bind_group = None;
        self.lut_size = 0;
        if had_resources {
            log::debug!("Outline-Overlay: Ressourcen freigegeben");
        }
    }
}

/// CPU-Spiegel der Shader-Breitendekodierung (nur für Tests).
#[cfg(test)]
fn decode_width(byte: u8) -> f32 {
    ((byte as f32 / 255.0) * MAX_WIDTH + 0.5).floor().max(1.0)
}

/// CPU-Spiegel der Feder-Alpha-Berechnung des Shaders (nur für Tests).
#[cfg(test)]
fn feather_alpha(dist: f32, half_width: f32, feather: f32) -> f32 {
    if feather <= 0.0 {
        return 1.0;
    }
    let t = ((dist - (half_width - feather)) / (2.0 * feather)).clamp(0.0, 1.0);
    1.0 - t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MeshData, Scene, SceneGroup, SceneNode, Transform};
    use approx::assert_relative_eq;

    fn node(stroke: Option<Stroke>) -> SceneNode {
        SceneNode {
            name: String::new(),
            mesh: MeshData::new(),
            transform: Transform::default(),
            material: Material::fill([0.5; 3], 0.5),
            stroke,
            render_order: 0,
            pickable: true,
            group: SceneGroup::Walls,
        }
    }

    fn stroke(width: f32) -> Stroke {
        Stroke {
            color: [1.0, 0.0, 0.0],
            opacity: 1.0,
            width,
        }
    }

    #[test]
    fn test_id_roundtrip() {
        for id in [1u32, 2, 255, 256, 65535, 65536, 0xABCDEF, (1 << 24) - 1] {
            let color = encode_id_color(id);
            let rgb8 = [
                (color[0] * 255.0).round() as u8,
                (color[1] * 255.0).round() as u8,
                (color[2] * 255.0).round() as u8,
            ];
            assert_eq!(decode_id_rgb8(rgb8), id, "Roundtrip für ID {} kaputt", id);
        }
    }

    #[test]
    fn test_supersampling_factor() {
        assert_eq!(supersampling_factor(1.0), 2);
        assert_eq!(supersampling_factor(2.0), 1);
        assert_eq!(supersampling_factor(3.0), 1);
        assert_eq!(supersampling_factor(1.5), 1); // DPR rundet auf 2 → Faktor 1
        assert_eq!(supersampling_factor(0.5), 2);
    }

    #[test]
    fn test_mask_dims_clamp() {
        assert_eq!(mask_dims([800, 600], 2), [1600, 1200]);
        assert_eq!(mask_dims([0, 0], 1), [1, 1]);
    }

    #[test]
    fn test_pack_width_roundtrip() {
        // Breite 1 bei ss=2 → 2 Masken-Pixel → dekodiert 4 (volle Breite)
        assert_relative_eq!(decode_width(pack_width(1.0, 2)), 4.0);
        // Breite 4 bei ss=1 → dekodiert 8, halbe Breite 4
        assert_relative_eq!(decode_width(pack_width(4.0, 1)), 8.0);
        // Klemmen nach oben
        assert_relative_eq!(decode_width(pack_width(100.0, 2)), MAX_WIDTH);
        // Klemmen nach unten
        assert_relative_eq!(decode_width(pack_width(0.0, 1)), 2.0);
    }

    #[test]
    fn test_feather_alpha_midpoint() {
        // Breite 4 px, Feder 1 px: an der Silhouette (d = halbe Breite)
        // liegt das Alpha exakt in der Mitte des Falloffs
        let half_w = 0.5 * decode_width(pack_width(4.0, 1));
        assert_relative_eq!(feather_alpha(half_w, half_w, 1.0), 0.5, epsilon = 1e-6);
        // Außerhalb von halfW + Feder ist das Alpha 0
        assert_relative_eq!(feather_alpha(half_w + 1.0, half_w, 1.0), 0.0);
        // Deutlich innerhalb ist es 1
        assert_relative_eq!(feather_alpha(0.0, half_w, 1.0), 1.0);
    }

    #[test]
    fn test_collect_targets_partition() {
        let mut scene = Scene::new();
        scene.add_node(node(Some(stroke(1.0))));
        scene.add_node(node(None));
        scene.add_node(node(Some(stroke(2.0))));

        let registry = collect_targets(&scene, None).expect("Sammlung fehlgeschlagen");
        assert_eq!(registry.entries.len(), 2);
        assert_eq!(registry.entries[0].node_index, 0);
        assert_eq!(registry.entries[1].node_index, 2);
    }

    #[test]
    fn test_collect_targets_highlight_overrides_color() {
        let mut scene = Scene::new();
        scene.add_node(node(Some(stroke(1.0))));

        let registry = collect_targets(&scene, Some(0)).expect("Sammlung fehlgeschlagen");
        assert_eq!(registry.entries[0].stroke.color, [1.0, 1.0, 1.0]);
        // Die Szene selbst bleibt unverändert
        assert_eq!(
            scene.nodes[0].stroke.expect("Stroke fehlt").color,
            [1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_check_capacity_fails_fast() {
        assert!(check_capacity(MAX_TARGETS).is_ok());
        let err = check_capacity(MAX_TARGETS + 1).expect_err("Fehler erwartet");
        assert!(matches!(err, OverlayError::TooManyTargets(n) if n == MAX_TARGETS + 1));
    }

    #[test]
    fn test_mask_scope_swaps_and_restores() {
        let mut scene = Scene::new();
        scene.add_node(node(Some(stroke(1.0))));
        scene.add_node(node(None));
        let registry = collect_targets(&scene, None).expect("Sammlung fehlgeschlagen");

        let mut table: Vec<Material> = scene.nodes.iter().map(|n| n.material).collect();
        let original = table.clone();
        let mut cache = MaskMaterialCache::new();

        {
            let scope = MaskScope::apply(&mut table, &registry, &mut cache);
            // Ziel 0 trägt die Farbe von ID 1, Node 1 ist Blocker
            assert_eq!(scope.table()[0].color, encode_id_color(1));
            assert!(scope.table()[0].color_write);
            assert!(!scope.table()[1].color_write);
        }
        assert_eq!(table, original, "Materialien nicht wiederhergestellt");
    }

    #[test]
    fn test_mask_cache_cooldown_shrinks() {
        let mut cache = MaskMaterialCache::new();
        let t0 = Instant::now();

        // Bedarf für 3 Ziele → 4 Einträge (Blocker + 3 IDs)
        for i in 0..3 {
            let _ = cache.target(i);
        }
        cache.maintain(3, t0);
        assert_eq!(cache.len(), 4);

        // Innerhalb des Cooldowns bleibt der Cache groß
        cache.maintain(0, t0 + Duration::from_millis(500));
        assert_eq!(cache.len(), 4);

        // Nach Ablauf schrumpft er auf den Blocker-Eintrag
        cache.maintain(0, t0 + Duration::from_millis(1500));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_mask_cache_reuses_entries() {
        let mut cache = MaskMaterialCache::new();
        let first = cache.target(0);
        let second = cache.target(0);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 2);
    }
}
