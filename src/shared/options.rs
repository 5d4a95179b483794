//! Zentrale Konfiguration für den Szenen-Viewer.
//!
//! `ViewerOptions` enthält alle zur Laufzeit änderbaren Werte und ersetzt
//! die im Prototyp extern persistierten GUI-Parameter durch eine explizite,
//! als TOML gespeicherte Konfiguration.

use serde::{Deserialize, Serialize};

// ── Stil ────────────────────────────────────────────────────────────

/// Standard-Deckkraft der Füllmaterialien.
pub const FILL_OPACITY_DEFAULT: f32 = 0.2;
/// Standard-Deckkraft der Konturen.
pub const STROKE_OPACITY_DEFAULT: f32 = 1.0;
/// Standard-Konturbreite in Pixeln.
pub const STROKE_WIDTH_DEFAULT: f32 = 1.0;

// ── Outline-Overlay ─────────────────────────────────────────────────

/// Weiche Kantenbreite in Pixeln (größer = weicherer Übergang).
pub const FEATHER_PX_DEFAULT: f32 = 1.0;
/// Such-Ringe des Edge-Shaders (1..3; mehr Ringe = breitere Suche, mehr Samples).
pub const OUTLINE_RINGS_DEFAULT: u32 = 2;

// ── Animation ───────────────────────────────────────────────────────

/// Y-Rotation der Szene pro Frame (Radiant).
pub const SPIN_STEP: f32 = 0.005;

// ── Farbvergabe ─────────────────────────────────────────────────────

/// Seed der Wall-Farbpalette.
pub const COLOR_SEED_DEFAULT: u32 = 42;

/// Alle zur Laufzeit änderbaren Viewer-Optionen.
/// Wird als `pano_scene_viewer.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerOptions {
    // ── Objekte ─────────────────────────────────────────────────
    /// Walls-Gruppe anzeigen
    pub show_walls: bool,
    /// Primitive-Gruppe anzeigen
    pub show_primitives: bool,
    /// Box-Gruppe anzeigen
    pub show_box: bool,

    // ── Stil ────────────────────────────────────────────────────
    /// Deckkraft der Füllmaterialien
    pub fill_opacity: f32,
    /// Deckkraft der Konturen
    pub stroke_opacity: f32,
    /// Konturbreite in Pixeln
    pub stroke_width: f32,

    // ── Verhalten ───────────────────────────────────────────────
    /// Panorama-Hintergrund anzeigen
    pub background: bool,
    /// Szene kontinuierlich rotieren
    pub rotate: bool,

    // ── Outline-Overlay ─────────────────────────────────────────
    /// Weiche Kantenbreite in Pixeln
    #[serde(default = "default_feather_px")]
    pub feather_px: f32,
    /// Such-Ringe des Edge-Shaders (1..3)
    #[serde(default = "default_outline_rings")]
    pub outline_rings: u32,

    // ── Farbvergabe ─────────────────────────────────────────────
    /// Seed der Wall-Farbpalette
    #[serde(default = "default_color_seed")]
    pub color_seed: u32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            show_walls: true,
            show_primitives: false,
            show_box: false,
            fill_opacity: FILL_OPACITY_DEFAULT,
            stroke_opacity: STROKE_OPACITY_DEFAULT,
            stroke_width: STROKE_WIDTH_DEFAULT,
            background: true,
            rotate: true,
            feather_px: FEATHER_PX_DEFAULT,
            outline_rings: OUTLINE_RINGS_DEFAULT,
            color_seed: COLOR_SEED_DEFAULT,
        }
    }
}

/// Serde-Default für `feather_px` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_feather_px() -> f32 {
    FEATHER_PX_DEFAULT
}

/// Serde-Default für `outline_rings` (Abwärtskompatibilität).
fn default_outline_rings() -> u32 {
    OUTLINE_RINGS_DEFAULT
}

/// Serde-Default für `color_seed` (Abwärtskompatibilität).
fn default_color_seed() -> u32 {
    COLOR_SEED_DEFAULT
}

impl ViewerOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("pano_scene_viewer"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("pano_scene_viewer.toml")
    }

    /// Ringzahl auf den gültigen Bereich 1..3 begrenzt.
    pub fn rings_clamped(&self) -> u32 {
        self.outline_rings.clamp(1, 3)
    }
}
