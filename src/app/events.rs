//! Benutzer-Absichten der UI-Schicht.

use crate::core::SceneGroup;
use std::path::PathBuf;

/// High-Level-Events aus UI und Viewport.
///
/// Die UI erzeugt Intents, der `ViewerController` führt sie auf dem
/// `AppState` aus — die UI mutiert den Zustand nie direkt.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerIntent {
    // === Objekte ===
    /// Sichtbarkeit einer Demo-Gruppe umschalten
    SetGroupVisible { group: SceneGroup, visible: bool },

    // === Stil ===
    /// Deckkraft aller Füllmaterialien setzen
    SetFillOpacity(f32),
    /// Deckkraft aller Konturen setzen
    SetStrokeOpacity(f32),
    /// Breite aller Konturen setzen (Pixel)
    SetStrokeWidth(f32),
    /// Weiche Kantenbreite des Outline-Overlays setzen (Pixel)
    SetFeather(f32),
    /// Such-Ringe des Edge-Shaders setzen (1..3)
    SetOutlineRings(u32),

    // === Verhalten ===
    /// Panorama-Hintergrund ein-/ausblenden
    SetBackgroundVisible(bool),
    /// Kontinuierliche Szenen-Rotation ein-/ausschalten
    SetRotate(bool),
    /// Alle Optionen auf Standardwerte zurücksetzen
    ResetOptions,

    // === Panorama ===
    /// Panorama-Bild von Platte laden
    LoadPanorama { path: PathBuf },
    /// Panorama entfernen
    ClearPanorama,

    // === Kamera & Viewport ===
    /// Kamera um den Zielpunkt drehen (Delta in logischen Pixeln)
    OrbitCamera { delta: [f32; 2] },
    /// Zielpunkt in der Bildebene verschieben (Delta in logischen Pixeln)
    PanCamera { delta: [f32; 2] },
    /// Abstand skalieren (factor > 1 = herauszoomen)
    ZoomCamera { factor: f32 },
    /// Viewport-Größe und Pixeldichte des Frames
    ViewportResized {
        size: [f32; 2],
        pixels_per_point: f32,
    },

    // === Picking ===
    /// Zeiger bewegt (Position relativ zum Viewport, logische Pixel)
    PointerMoved { pos: [f32; 2] },
    /// Zeiger hat den Viewport verlassen
    PointerLeft,
    /// Doppelklick im Viewport (loggt den getroffenen Node)
    DoubleClick { pos: [f32; 2] },

    // === Overlay & Anwendung ===
    /// Outline-Overlay sofort neu berechnen (Leertaste)
    ForceOverlayUpdate,
    /// Anwendung beenden
    RequestExit,
}
