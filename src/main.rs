//! Pano Scene Viewer.
//!
//! Interaktiver 3D-Szenen-Viewer mit Panorama-Hintergrund und
//! ID-Mask-basierten Echtzeit-Outlines (egui + wgpu).

use eframe::egui;
use eframe::egui_wgpu;
use pano_scene_viewer::{render, ui, AppState, ViewerController, ViewerIntent, ViewerOptions};

fn main() -> Result<(), eframe::Error> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> Result<(), eframe::Error> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Pano Scene Viewer v{} startet...", env!("CARGO_PKG_VERSION"));

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 720.0])
                .with_title("Pano Scene Viewer"),
            renderer: eframe::Renderer::Wgpu,
            // Die 3D-Szene läuft offscreen mit eigenem Anti-Aliasing
            // (Supersampling im Outline-Pfad); egui selbst bleibt ohne MSAA
            multisampling: 1,
            ..Default::default()
        };

        eframe::run_native(
            "Pano Scene Viewer",
            options,
            Box::new(|cc| {
                let render_state = cc.wgpu_render_state.as_ref().ok_or_else(|| {
                    anyhow::anyhow!(
                        "wgpu nicht verfügbar: Renderer konnte nicht initialisiert werden"
                    )
                })?;
                Ok(Box::new(ViewerApp::new(render_state)))
            }),
        )
    }
}

/// Haupt-Anwendungsstruktur
struct ViewerApp {
    state: AppState,
    controller: ViewerController,
    renderer: std::sync::Arc<std::sync::Mutex<render::Renderer>>,
    device: eframe::wgpu::Device,
    queue: eframe::wgpu::Queue,
    input: ui::InputState,
}

impl ViewerApp {
    fn new(render_state: &egui_wgpu::RenderState) -> Self {
        // Optionen aus TOML laden (oder Standardwerte)
        let config_path = ViewerOptions::config_path();
        let viewer_options = ViewerOptions::load_from_file(&config_path);

        Self {
            state: AppState::new(viewer_options),
            controller: ViewerController::new(),
            renderer: std::sync::Arc::new(std::sync::Mutex::new(render::Renderer::new(
                render_state,
            ))),
            device: render_state.device.clone(),
            queue: render_state.queue.clone(),
            input: ui::InputState::new(),
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Spin und Hover laufen pro Frame, unabhängig von UI-Events
        self.controller.advance_frame(&mut self.state);

        let events = self.collect_ui_events(ctx);
        let has_meaningful_events = events
            .iter()
            .any(|e| !matches!(e, ViewerIntent::ViewportResized { .. }));

        self.process_events(events);

        self.sync_panorama_upload();

        self.maybe_request_repaint(ctx, has_meaningful_events);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Beende Anwendung, gebe GPU-Ressourcen frei");
        if let Ok(mut renderer) = self.renderer.lock() {
            renderer.dispose();
        }
    }
}

impl ViewerApp {
    fn collect_ui_events(&mut self, ctx: &egui::Context) -> Vec<ViewerIntent> {
        let mut events = Vec::new();

        events.extend(ui::render_settings_panel(ctx, &self.state.options));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

                let viewport_size = [rect.width(), rect.height()];
                let pixels_per_point = ui.ctx().pixels_per_point();

                events.extend(self.input.collect_viewport_events(
                    ui,
                    &response,
                    viewport_size,
                    pixels_per_point,
                ));

                let render_data = render::WgpuRenderData {
                    scene: self.controller.build_render_scene(&self.state),
                };

                let callback = egui_wgpu::Callback::new_paint_callback(
                    rect,
                    render::WgpuRenderCallback {
                        renderer: self.renderer.clone(),
                        render_data,
                    },
                );

                ui.painter().add(callback);
            });

        events
    }

    fn process_events(&mut self, events: Vec<ViewerIntent>) {
        for event in events {
            if let Err(e) = self.controller.handle_intent(&mut self.state, event) {
                log::error!("Intent-Verarbeitung fehlgeschlagen: {:#}", e);
            }
        }
    }

    fn sync_panorama_upload(&mut self) {
        if !self.state.panorama_dirty {
            return;
        }
        self.state.panorama_dirty = false;

        let Ok(mut renderer) = self.renderer.lock() else {
            log::error!("Renderer-Lock fehlgeschlagen (Mutex vergiftet)");
            return;
        };
        if let Some(panorama) = self.state.panorama.as_ref() {
            renderer.set_panorama(&self.device, &self.queue, panorama);
            log::info!("Panorama in Renderer hochgeladen");
        } else {
            renderer.clear_panorama();
            log::info!("Panorama aus Renderer entfernt");
        }
    }

    fn maybe_request_repaint(&self, ctx: &egui::Context, has_meaningful_events: bool) {
        // Bei laufender Rotation dauerhaft animieren, sonst nur bei Bedarf
        if self.state.options.rotate {
            ctx.request_repaint();
        } else if has_meaningful_events || ctx.input(|i| i.pointer.is_moving()) {
            ctx.request_repaint();
        }
    }
}
