//! wgpu Custom Render Callback für egui-Integration.

use super::Renderer;
use crate::shared::RenderScene;
use std::sync::{Arc, Mutex};

/// Render-Daten für den wgpu Callback
pub struct WgpuRenderData {
    /// Die Render-Szene für diesen Frame
    pub scene: RenderScene,
}

/// Custom wgpu Render Callback – kapselt die Renderer-Interaktion für egui
///
/// `prepare()` zeichnet alle Offscreen-Pässe (Beauty, ID-Maske, Outline) in
/// den egui-Encoder; dessen Kommandos laufen vor dem egui-Render-Pass, sodass
/// `paint()` nur noch kompositiert.
pub struct WgpuRenderCallback {
    /// Geteilter Renderer-Zustand (thread-safe)
    pub renderer: Arc<Mutex<Renderer>>,
    /// Render-Daten für diesen Frame
    pub render_data: WgpuRenderData,
}

impl eframe::egui_wgpu::CallbackTrait for WgpuRenderCallback {
    fn prepare(
        &self,
        device: &eframe::wgpu::Device,
        queue: &eframe::wgpu::Queue,
        _screen_descriptor: &eframe::egui_wgpu::ScreenDescriptor,
        egui_encoder: &mut eframe::wgpu::CommandEncoder,
        _callback_resources: &mut eframe::egui_wgpu::CallbackResources,
    ) -> Vec<eframe::wgpu::CommandBuffer> {
        if let Ok(mut renderer) = self.renderer.lock() {
            renderer.prepare(device, queue, egui_encoder, &self.render_data.scene);
        } else {
            log::error!("Renderer-Lock in prepare() fehlgeschlagen");
        }
        Vec::new()
    }

    fn paint<'b>(
        &'b self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut eframe::wgpu::RenderPass<'static>,
        _callback_resources: &'b eframe::egui_wgpu::CallbackResources,
    ) {
        if let Ok(renderer) = self.renderer.lock() {
            renderer.paint(render_pass);
        } else {
            log::error!("Renderer-Lock in paint() fehlgeschlagen");
        }
    }
}
