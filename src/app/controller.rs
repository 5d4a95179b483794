//! Application Controller für zentrale Event-Verarbeitung.

use glam::{Vec2, Vec3};

use super::{AppState, ViewerIntent};
use crate::core::{pick_node, SceneGroup};
use crate::shared::options::SPIN_STEP;
use crate::shared::{RenderScene, ViewerOptions};

/// Orchestriert UI-Intents auf den AppState.
#[derive(Default)]
pub struct ViewerController;

impl ViewerController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: ViewerIntent) -> anyhow::Result<()> {
        match intent {
            // === Objekte ===
            ViewerIntent::SetGroupVisible { group, visible } => {
                match group {
                    SceneGroup::Walls => state.options.show_walls = visible,
                    SceneGroup::Primitives => state.options.show_primitives = visible,
                    SceneGroup::Box => state.options.show_box = visible,
                }
                state.rebuild_group(group);
                self.persist_options(state);
            }

            // === Stil ===
            ViewerIntent::SetFillOpacity(value) => {
                state.options.fill_opacity = value;
                state.scene_mut().set_fill_opacity(value);
                self.persist_options(state);
            }
            ViewerIntent::SetStrokeOpacity(value) => {
                state.options.stroke_opacity = value;
                state.scene_mut().set_stroke_opacity(value);
                self.persist_options(state);
            }
            ViewerIntent::SetStrokeWidth(value) => {
                state.options.stroke_width = value;
                state.scene_mut().set_stroke_width(value);
                self.persist_options(state);
            }
            ViewerIntent::SetFeather(value) => {
                state.options.feather_px = value.max(0.0);
                self.persist_options(state);
            }
            ViewerIntent::SetOutlineRings(value) => {
                state.options.outline_rings = value.clamp(1, 3);
                self.persist_options(state);
            }

            // === Verhalten ===
            ViewerIntent::SetBackgroundVisible(visible) => {
                state.options.background = visible;
                self.persist_options(state);
            }
            ViewerIntent::SetRotate(rotate) => {
                state.options.rotate = rotate;
                self.persist_options(state);
            }
            ViewerIntent::ResetOptions => {
                state.options = ViewerOptions::default();
                state.rebuild_all_groups();
                self.persist_options(state);
                log::info!("Optionen zurückgesetzt");
            }

            // === Panorama ===
            ViewerIntent::LoadPanorama { path } => {
                let image = image::open(&path)
                    .map_err(|e| anyhow::anyhow!("Panorama '{}' unlesbar: {e}", path.display()))?;
                log::info!(
                    "Panorama geladen: {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                state.panorama = Some(image);
                state.panorama_dirty = true;
            }
            ViewerIntent::ClearPanorama => {
                state.panorama = None;
                state.panorama_dirty = true;
            }

            // === Kamera & Viewport ===
            ViewerIntent::OrbitCamera { delta } => {
                state.camera.orbit(-delta[0] * 0.01, delta[1] * 0.01);
            }
            ViewerIntent::PanCamera { delta } => {
                let scale = Self::pan_scale(state);
                state
                    .camera
                    .pan(Vec2::new(-delta[0] * scale, delta[1] * scale));
            }
            ViewerIntent::ZoomCamera { factor } => {
                state.camera.zoom_by(factor);
            }
            ViewerIntent::ViewportResized {
                size,
                pixels_per_point,
            } => {
                state.viewport_size = size;
                state.pixels_per_point = pixels_per_point;
            }

            // === Picking ===
            ViewerIntent::PointerMoved { pos } => {
                state.pointer = Some(pos);
            }
            ViewerIntent::PointerLeft => {
                state.pointer = None;
                state.hover = None;
            }
            ViewerIntent::DoubleClick { pos } => {
                if let Some(hit) = self.pick_at(state, pos) {
                    let node = &state.scene.nodes[hit.0];
                    log::info!(
                        "Doppelklick-Treffer: '{}' in Distanz {:.3}",
                        node.name,
                        hit.1
                    );
                }
            }

            // === Overlay & Anwendung ===
            ViewerIntent::ForceOverlayUpdate => {
                // Das Overlay rechnet ohnehin jeden Frame; der Intent erzwingt
                // nur ein sofortiges Repaint (Leertaste wie im Prototyp)
                log::debug!("Outline-Overlay manuell angestoßen");
            }
            ViewerIntent::RequestExit => {
                state.should_exit = true;
            }
        }

        Ok(())
    }

    /// Pro-Frame-Fortschritt: Spin und Hover-Picking.
    ///
    /// Hover wird jeden Frame neu ausgewertet, weil die Szene unter dem
    /// stehenden Zeiger weiterrotieren kann.
    pub fn advance_frame(&mut self, state: &mut AppState) {
        if state.options.rotate {
            state.spin = (state.spin + SPIN_STEP) % std::f32::consts::TAU;
        }

        state.hover = state
            .pointer
            .and_then(|pos| self.pick_at(state, pos))
            .map(|(index, _)| index);
    }

    /// Baut die Render-Szene aus dem aktuellen AppState.
    pub fn build_render_scene(&self, state: &AppState) -> RenderScene {
        RenderScene {
            scene: state.scene.clone(),
            camera: state.camera.clone(),
            viewport_size: state.viewport_size,
            pixels_per_point: state.pixels_per_point,
            spin: state.spin,
            background_visible: state.options.background,
            feather_px: state.options.feather_px,
            outline_rings: state.options.rings_clamped(),
            highlight: state.hover,
        }
    }

    /// Ray-Pick an einer Viewport-Position (logische Pixel).
    fn pick_at(&self, state: &AppState, pos: [f32; 2]) -> Option<(usize, f32)> {
        let viewport = Vec2::new(state.viewport_size[0], state.viewport_size[1]);
        if viewport.x < 1.0 || viewport.y < 1.0 {
            return None;
        }
        let (origin, dir) = state.camera.screen_ray(Vec2::new(pos[0], pos[1]), viewport);
        if dir == Vec3::ZERO {
            return None;
        }
        pick_node(&state.scene, state.spin, origin, dir).map(|hit| (hit.node_index, hit.distance))
    }

    /// Welt-Einheiten pro logischem Pixel in der Ziel-Ebene der Kamera.
    fn pan_scale(state: &AppState) -> f32 {
        let height = state.viewport_size[1].max(1.0);
        2.0 * state.camera.distance * (state.camera.fov_y * 0.5).tan() / height
    }

    fn persist_options(&self, state: &AppState) {
        let path = ViewerOptions::config_path();
        if let Err(e) = state.options.save_to_file(&path) {
            log::warn!("Optionen konnten nicht gespeichert werden: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn state() -> AppState {
        let mut state = AppState::new(ViewerOptions::default());
        state.viewport_size = [800.0, 600.0];
        state.pixels_per_point = 1.0;
        state
    }

    #[test]
    fn test_style_intents_update_scene_and_options() {
        let mut state = state();
        let mut controller = ViewerController::new();

        controller
            .handle_intent(&mut state, ViewerIntent::SetStrokeWidth(4.0))
            .expect("Intent fehlgeschlagen");
        assert_relative_eq!(state.options.stroke_width, 4.0);
        for node in state.scene.nodes.iter().filter(|n| n.stroke.is_some()) {
            assert_relative_eq!(node.stroke.expect("Stroke fehlt").width, 4.0);
        }
    }

    #[test]
    fn test_group_toggle_rebuilds_scene() {
        let mut state = state();
        let mut controller = ViewerController::new();
        let before = state.scene.nodes.len();

        controller
            .handle_intent(
                &mut state,
                ViewerIntent::SetGroupVisible {
                    group: SceneGroup::Primitives,
                    visible: true,
                },
            )
            .expect("Intent fehlgeschlagen");
        assert!(state.options.show_primitives);
        assert!(state.scene.nodes.len() > before);
    }

    #[test]
    fn test_spin_only_advances_when_rotating() {
        let mut state = state();
        let mut controller = ViewerController::new();

        state.options.rotate = false;
        controller.advance_frame(&mut state);
        assert_relative_eq!(state.spin, 0.0);

        state.options.rotate = true;
        controller.advance_frame(&mut state);
        assert_relative_eq!(state.spin, SPIN_STEP);
    }

    #[test]
    fn test_hover_cleared_when_pointer_leaves() {
        let mut state = state();
        let mut controller = ViewerController::new();
        state.hover = Some(0);

        controller
            .handle_intent(&mut state, ViewerIntent::PointerLeft)
            .expect("Intent fehlgeschlagen");
        assert!(state.hover.is_none());
        assert!(state.pointer.is_none());
    }

    #[test]
    fn test_render_scene_snapshot_carries_highlight() {
        let mut state = state();
        state.hover = Some(3);
        let controller = ViewerController::new();

        let render_scene = controller.build_render_scene(&state);
        assert_eq!(render_scene.highlight, Some(3));
        assert_eq!(render_scene.viewport_size, [800.0, 600.0]);
    }
}
