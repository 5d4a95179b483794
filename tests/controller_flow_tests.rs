use pano_scene_viewer::{AppState, SceneGroup, ViewerController, ViewerIntent, ViewerOptions};

fn state() -> AppState {
    let mut state = AppState::new(ViewerOptions::default());
    state.viewport_size = [1280.0, 720.0];
    state.pixels_per_point = 1.0;
    state
}

#[test]
fn test_reset_restores_defaults_and_rebuilds_scene() {
    let mut controller = ViewerController::new();
    let mut state = state();

    controller
        .handle_intent(&mut state, ViewerIntent::SetStrokeWidth(7.0))
        .expect("SetStrokeWidth sollte ohne Fehler durchlaufen");
    controller
        .handle_intent(
            &mut state,
            ViewerIntent::SetGroupVisible {
                group: SceneGroup::Box,
                visible: true,
            },
        )
        .expect("SetGroupVisible sollte ohne Fehler durchlaufen");
    assert!(state.options.show_box);

    controller
        .handle_intent(&mut state, ViewerIntent::ResetOptions)
        .expect("ResetOptions sollte ohne Fehler durchlaufen");

    assert_eq!(state.options, ViewerOptions::default());
    // Nach dem Reset ist nur die Walls-Gruppe aufgebaut
    assert!(state
        .scene
        .nodes
        .iter()
        .all(|n| n.group == SceneGroup::Walls));
}

#[test]
fn test_feather_and_rings_are_clamped() {
    let mut controller = ViewerController::new();
    let mut state = state();

    controller
        .handle_intent(&mut state, ViewerIntent::SetFeather(-2.0))
        .expect("SetFeather sollte ohne Fehler durchlaufen");
    assert_eq!(state.options.feather_px, 0.0);

    controller
        .handle_intent(&mut state, ViewerIntent::SetOutlineRings(9))
        .expect("SetOutlineRings sollte ohne Fehler durchlaufen");
    assert_eq!(state.options.outline_rings, 3);

    controller
        .handle_intent(&mut state, ViewerIntent::SetOutlineRings(0))
        .expect("SetOutlineRings sollte ohne Fehler durchlaufen");
    assert_eq!(state.options.outline_rings, 1);
}

#[test]
fn test_load_panorama_with_missing_file_reports_error() {
    let mut controller = ViewerController::new();
    let mut state = state();

    let result = controller.handle_intent(
        &mut state,
        ViewerIntent::LoadPanorama {
            path: std::path::PathBuf::from("/nonexistent/panorama.jpg"),
        },
    );

    assert!(result.is_err());
    assert!(state.panorama.is_none());
    assert!(!state.panorama_dirty);
}

#[test]
fn test_clear_panorama_marks_renderer_sync() {
    let mut controller = ViewerController::new();
    let mut state = state();
    state.panorama_dirty = false;

    controller
        .handle_intent(&mut state, ViewerIntent::ClearPanorama)
        .expect("ClearPanorama sollte ohne Fehler durchlaufen");

    assert!(state.panorama.is_none());
    assert!(state.panorama_dirty);
}

#[test]
fn test_zoom_changes_camera_distance() {
    let mut controller = ViewerController::new();
    let mut state = state();
    let before = state.camera.distance;

    controller
        .handle_intent(&mut state, ViewerIntent::ZoomCamera { factor: 0.5 })
        .expect("ZoomCamera sollte ohne Fehler durchlaufen");
    assert!(state.camera.distance < before);

    controller
        .handle_intent(&mut state, ViewerIntent::ZoomCamera { factor: 4.0 })
        .expect("ZoomCamera sollte ohne Fehler durchlaufen");
    assert!(state.camera.distance > before);
}

#[test]
fn test_render_scene_snapshot_is_independent_of_later_edits() {
    let mut controller = ViewerController::new();
    let mut state = state();

    let snapshot = controller.build_render_scene(&state);
    let nodes_before = snapshot.scene.nodes.len();

    controller
        .handle_intent(
            &mut state,
            ViewerIntent::SetGroupVisible {
                group: SceneGroup::Walls,
                visible: false,
            },
        )
        .expect("SetGroupVisible sollte ohne Fehler durchlaufen");

    // Der Schnappschuss hält den alten Szenenstand (Copy-on-Write)
    assert_eq!(snapshot.scene.nodes.len(), nodes_before);
    assert!(state.scene.nodes.is_empty());
}

#[test]
fn test_escape_requests_exit() {
    let mut controller = ViewerController::new();
    let mut state = state();
    assert!(!state.should_exit);

    controller
        .handle_intent(&mut state, ViewerIntent::RequestExit)
        .expect("RequestExit sollte ohne Fehler durchlaufen");
    assert!(state.should_exit);
}

#[test]
fn test_options_file_roundtrip_on_disk() {
    let mut options = ViewerOptions::default();
    options.show_primitives = true;
    options.stroke_width = 3.5;
    options.outline_rings = 3;

    let path = std::env::temp_dir().join(format!(
        "pano_scene_viewer_test_{}.toml",
        std::process::id()
    ));
    options
        .save_to_file(&path)
        .expect("Speichern sollte gelingen");
    let loaded = ViewerOptions::load_from_file(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, options);
}
