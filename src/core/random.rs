//! Deterministischer LCG-Zufallsgenerator für die Farbvergabe.
//!
//! Explizite Generator-Instanz mit festem Seed statt eines globalen
//! Zufalls-Overrides — gleiche Eingabe liefert immer dieselbe Farbfolge.

/// Linearer Kongruenzgenerator (MSVC-Konstanten, 15-Bit-Ausgabe).
#[derive(Debug, Clone)]
pub struct Lcg {
    seed: u32,
}

impl Lcg {
    /// Erstellt einen neuen Generator mit dem gegebenen Seed.
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Nächster Wert in [0, 1].
    pub fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(214_013).wrapping_add(2_531_011);
        let value = (self.seed >> 16) & 0x7FFF; // 15 Bit
        value as f32 / 0x7FFF as f32
    }
}

/// Konvertiert HSL nach RGB (alle Komponenten in [0, 1], `h` in Grad).
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

/// Zieht eine voll gesättigte Palettenfarbe aus `buckets` diskreten Hue-Stufen.
pub fn palette_color(rng: &mut Lcg, buckets: u32) -> [f32; 3] {
    let bucket = (buckets as f32 * rng.next_f32()) as u32 % buckets;
    let hue = bucket as f32 * (360.0 / buckets as f32);
    hsl_to_rgb(hue, 1.0, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lcg_is_deterministic() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn test_lcg_range() {
        let mut rng = Lcg::new(7);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_lcg_seed_changes_sequence() {
        let mut a = Lcg::new(1);
        let mut b = Lcg::new(2);
        let seq_a: Vec<f32> = (0..8).map(|_| a.next_f32()).collect();
        let seq_b: Vec<f32> = (0..8).map(|_| b.next_f32()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert_relative_eq!(red[0], 1.0);
        assert_relative_eq!(red[1], 0.0);
        assert_relative_eq!(red[2], 0.0);

        let green = hsl_to_rgb(120.0, 1.0, 0.5);
        assert_relative_eq!(green[1], 1.0);

        let blue = hsl_to_rgb(240.0, 1.0, 0.5);
        assert_relative_eq!(blue[2], 1.0);
    }

    #[test]
    fn test_palette_color_uses_discrete_hues() {
        let mut rng = Lcg::new(42);
        // Alle Farben müssen aus dem 72er-Raster stammen (keine Zwischentöne)
        for _ in 0..50 {
            let c = palette_color(&mut rng, 72);
            assert!(c.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
