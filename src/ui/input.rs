//! Viewport-Input-Handling: Maus-Events, Kamera, Picking → ViewerIntent.

use eframe::egui;

use crate::app::ViewerIntent;

/// Verwaltet den Input-Zustand für das Viewport (Drag, Scroll, Hover)
#[derive(Default)]
pub struct InputState;

impl InputState {
    /// Erstellt einen neuen, leeren Input-Zustand.
    pub fn new() -> Self {
        Self
    }

    /// Sammelt Viewport-Events aus egui-Input und gibt ViewerIntents zurück.
    ///
    /// Belegung wie im Prototyp: linke Taste Orbit, rechte/mittlere Taste
    /// (oder Shift) Pan, Scrollrad Zoom, Doppelklick Pick-Log, Leertaste
    /// erzwingt ein Overlay-Update.
    pub fn collect_viewport_events(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        viewport_size: [f32; 2],
        pixels_per_point: f32,
    ) -> Vec<ViewerIntent> {
        let mut events = Vec::new();

        events.push(ViewerIntent::ViewportResized {
            size: viewport_size,
            pixels_per_point,
        });

        let modifiers = ui.input(|i| i.modifiers);

        // Drag: Orbit mit links, Pan mit rechts/Mitte oder Shift+links
        let delta = response.drag_delta();
        if delta != egui::Vec2::ZERO {
            let pan = response.dragged_by(egui::PointerButton::Secondary)
                || response.dragged_by(egui::PointerButton::Middle)
                || (response.dragged_by(egui::PointerButton::Primary) && modifiers.shift);
            if pan {
                events.push(ViewerIntent::PanCamera {
                    delta: [delta.x, delta.y],
                });
            } else if response.dragged_by(egui::PointerButton::Primary) {
                events.push(ViewerIntent::OrbitCamera {
                    delta: [delta.x, delta.y],
                });
            }
        }

        // Zoom über Scrollrad (exponentiell, Richtung wie OrbitControls)
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                events.push(ViewerIntent::ZoomCamera {
                    factor: (-scroll * 0.002).exp(),
                });
            }
        }

        // Zeigerposition relativ zum Viewport (für Hover-Picking)
        if let Some(pos) = response.hover_pos() {
            let local = pos - response.rect.min;
            events.push(ViewerIntent::PointerMoved {
                pos: [local.x, local.y],
            });
        } else if response.rect.is_positive() {
            events.push(ViewerIntent::PointerLeft);
        }

        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - response.rect.min;
                events.push(ViewerIntent::DoubleClick {
                    pos: [local.x, local.y],
                });
            }
        }

        if ui.input(|i| i.key_pressed(egui::Key::Space)) {
            events.push(ViewerIntent::ForceOverlayUpdate);
        }
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            events.push(ViewerIntent::RequestExit);
        }

        events
    }
}
