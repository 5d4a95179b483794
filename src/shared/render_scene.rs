//! Übergabe-Struktur zwischen App-Logik und Renderer.

use crate::core::{OrbitCamera, Scene};
use std::sync::Arc;

/// Pro Frame von der App an den Renderer übergebener Szenenzustand.
///
/// Der Renderer hält keinen eigenen Szenenzustand; er liest pro Frame
/// diesen Schnappschuss und lädt GPU-Ressourcen bei Bedarf nach
/// (`scene.revision` steuert die Invalidierung der Mesh-Puffer).
#[derive(Clone)]
pub struct RenderScene {
    /// Aktuelle Szene (geteilt, Änderungen erhöhen `revision`)
    pub scene: Arc<Scene>,
    /// Orbit-Kamera
    pub camera: OrbitCamera,
    /// Viewport-Größe in logischen Punkten
    pub viewport_size: [f32; 2],
    /// Skalierung logische Punkte → physische Pixel
    pub pixels_per_point: f32,
    /// Globale Y-Rotation der Szene (Radiant)
    pub spin: f32,
    /// Panorama-Hintergrund zeichnen
    pub background_visible: bool,
    /// Weiche Kantenbreite des Outline-Overlays in Pixeln
    pub feather_px: f32,
    /// Such-Ringe des Edge-Shaders (1..3)
    pub outline_rings: u32,
    /// Node-Index, dessen Kontur hervorgehoben wird (Hover)
    pub highlight: Option<usize>,
}

impl RenderScene {
    /// Viewport-Größe in physischen Pixeln (mindestens 1×1).
    pub fn physical_size(&self) -> [u32; 2] {
        [
            ((self.viewport_size[0] * self.pixels_per_point).round() as u32).max(1),
            ((self.viewport_size[1] * self.pixels_per_point).round() as u32).max(1),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_size_rounds_and_clamps() {
        let rs = RenderScene {
            scene: Arc::new(Scene::new()),
            camera: OrbitCamera::default(),
            viewport_size: [800.4, 0.0],
            pixels_per_point: 2.0,
            spin: 0.0,
            background_visible: true,
            feather_px: 1.0,
            outline_rings: 2,
            highlight: None,
        };
        assert_eq!(rs.physical_size(), [1601, 1]);
    }
}
