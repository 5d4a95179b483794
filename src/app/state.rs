//! Zentraler Anwendungszustand des Viewers.

use std::sync::Arc;

use crate::core::demo::{self, DemoSceneParams};
use crate::core::{OrbitCamera, Scene, SceneGroup};
use crate::shared::ViewerOptions;

/// Gesamter veränderlicher Zustand der Anwendung.
///
/// Die Szene liegt in einem `Arc`, damit der Render-Callback einen billigen
/// Schnappschuss bekommt; Mutationen laufen über `scene_mut()`
/// (Copy-on-Write nur, wenn der Renderer den vorherigen Frame noch hält).
pub struct AppState {
    /// Aktuelle Szene
    pub scene: Arc<Scene>,
    /// Orbit-Kamera
    pub camera: OrbitCamera,
    /// Persistierte Optionen
    pub options: ViewerOptions,
    /// Globale Y-Rotation der Szene (Radiant)
    pub spin: f32,
    /// Unter dem Zeiger liegender Node (Hover-Hervorhebung)
    pub hover: Option<usize>,
    /// Letzte Zeigerposition im Viewport (logische Pixel)
    pub pointer: Option<[f32; 2]>,
    /// Geladenes Panorama (Upload in den Renderer steht noch aus, wenn dirty)
    pub panorama: Option<image::DynamicImage>,
    /// Panorama muss (erneut) in den Renderer hochgeladen werden
    pub panorama_dirty: bool,
    /// Viewport-Größe in logischen Punkten
    pub viewport_size: [f32; 2],
    /// Skalierung logische Punkte → physische Pixel
    pub pixels_per_point: f32,
    /// Anwendung beim nächsten Frame beenden
    pub should_exit: bool,
}

impl AppState {
    /// Erstellt den Startzustand und baut die Szene gemäß Optionen auf.
    pub fn new(options: ViewerOptions) -> Self {
        let mut state = Self {
            scene: Arc::new(Scene::new()),
            camera: OrbitCamera::default(),
            options,
            spin: 0.0,
            hover: None,
            pointer: None,
            panorama: None,
            panorama_dirty: false,
            viewport_size: [1.0, 1.0],
            pixels_per_point: 1.0,
            should_exit: false,
        };
        state.rebuild_all_groups();
        state
    }

    /// Stil-Parameter für den Szenenaufbau aus den aktuellen Optionen.
    pub fn demo_params(&self) -> DemoSceneParams {
        DemoSceneParams {
            fill_opacity: self.options.fill_opacity,
            stroke_opacity: self.options.stroke_opacity,
            stroke_width: self.options.stroke_width,
            color_seed: self.options.color_seed,
        }
    }

    /// Veränderlicher Zugriff auf die Szene (Copy-on-Write).
    pub fn scene_mut(&mut self) -> &mut Scene {
        Arc::make_mut(&mut self.scene)
    }

    /// Baut eine Gruppe gemäß aktueller Optionen neu auf.
    pub fn rebuild_group(&mut self, group: SceneGroup) {
        let params = self.demo_params();
        let enabled = match group {
            SceneGroup::Walls => self.options.show_walls,
            SceneGroup::Primitives => self.options.show_primitives,
            SceneGroup::Box => self.options.show_box,
        };
        demo::rebuild_group(self.scene_mut(), group, enabled, &params);
        self.hover = None;
    }

    /// Baut alle Gruppen neu auf (Start und Options-Reset).
    pub fn rebuild_all_groups(&mut self) {
        self.rebuild_group(SceneGroup::Walls);
        self.rebuild_group(SceneGroup::Primitives);
        self.rebuild_group(SceneGroup::Box);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_scene_follows_options() {
        let state = AppState::new(ViewerOptions::default());
        // Standard: nur Walls sichtbar
        assert!(state
            .scene
            .nodes
            .iter()
            .all(|n| n.group == SceneGroup::Walls));
        assert!(!state.scene.nodes.is_empty());
    }

    #[test]
    fn test_rebuild_group_toggles_nodes() {
        let mut state = AppState::new(ViewerOptions::default());
        let walls_only = state.scene.nodes.len();

        state.options.show_primitives = true;
        state.rebuild_group(SceneGroup::Primitives);
        assert!(state.scene.nodes.len() > walls_only);

        state.options.show_primitives = false;
        state.rebuild_group(SceneGroup::Primitives);
        assert_eq!(state.scene.nodes.len(), walls_only);
    }

    #[test]
    fn test_scene_mut_is_copy_on_write() {
        let mut state = AppState::new(ViewerOptions::default());
        let snapshot = state.scene.clone();
        let rev = snapshot.revision;

        state.scene_mut().remove_group(SceneGroup::Walls);
        // Schnappschuss bleibt unberührt
        assert_eq!(snapshot.revision, rev);
        assert!(!snapshot.nodes.is_empty());
        assert!(state.scene.nodes.is_empty());
    }
}
