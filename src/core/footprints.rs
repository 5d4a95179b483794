//! Eingebauter Grundriss-Datensatz für die Walls-Demo-Gruppe.

use glam::Vec2;

/// Ein Gebäude-Grundriss mit Etagen-Lage und Höhe (beide in Etagen-Einheiten).
#[derive(Debug, Clone, Copy)]
pub struct Footprint {
    /// Geschlossenes Polygon in der XY-Ebene (ohne doppelten Schlusspunkt)
    pub points: &'static [[f32; 2]],
    /// Unterkante in Etagen
    pub level: f32,
    /// Höhe in Etagen
    pub height: f32,
    /// Stabile Fach-ID des Platzierungsobjekts
    pub placement_id: u32,
    /// Terrassen werden neutral grau statt aus der Palette eingefärbt
    pub is_terrace: bool,
}

impl Footprint {
    /// Polygon als `Vec2`-Liste.
    pub fn polygon(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| Vec2::new(p[0], p[1])).collect()
    }
}

/// Meter pro Etagen-Einheit.
pub const LEVEL_MULTIPLY: f32 = 0.35;

/// Demo-Datensatz: ein kleiner Häuserblock um den Ursprung.
pub const FOOTPRINTS: &[Footprint] = &[
    Footprint {
        points: &[[-3.2, -2.4], [-1.2, -2.4], [-1.2, -0.6], [-3.2, -0.6]],
        level: 0.0,
        height: 6.0,
        placement_id: 101,
        is_terrace: false,
    },
    Footprint {
        // L-förmiges Eckgebäude
        points: &[
            [-0.6, -2.4],
            [1.8, -2.4],
            [1.8, -1.4],
            [0.4, -1.4],
            [0.4, -0.2],
            [-0.6, -0.2],
        ],
        level: 0.0,
        height: 8.0,
        placement_id: 102,
        is_terrace: false,
    },
    Footprint {
        points: &[[2.2, -2.2], [3.6, -2.2], [3.6, -0.8], [2.2, -0.8]],
        level: 0.0,
        height: 4.0,
        placement_id: 103,
        is_terrace: false,
    },
    Footprint {
        // Dachterrasse auf dem Eckgebäude
        points: &[[-0.6, -2.4], [0.4, -2.4], [0.4, -1.4], [-0.6, -1.4]],
        level: 8.0,
        height: 1.0,
        placement_id: 104,
        is_terrace: true,
    },
    Footprint {
        // U-förmiger Hof
        points: &[
            [-3.0, 0.4],
            [0.0, 0.4],
            [0.0, 2.8],
            [-1.0, 2.8],
            [-1.0, 1.4],
            [-2.0, 1.4],
            [-2.0, 2.8],
            [-3.0, 2.8],
        ],
        level: 0.0,
        height: 5.0,
        placement_id: 105,
        is_terrace: false,
    },
    Footprint {
        points: &[[0.8, 0.6], [2.4, 0.6], [2.4, 2.0], [0.8, 2.0]],
        level: 0.0,
        height: 10.0,
        placement_id: 106,
        is_terrace: false,
    },
    Footprint {
        points: &[[2.8, 0.6], [3.8, 0.6], [3.8, 1.6], [2.8, 1.6]],
        level: 0.0,
        height: 3.0,
        placement_id: 107,
        is_terrace: false,
    },
    Footprint {
        // Terrasse am Hochhaus
        points: &[[0.8, 2.2], [2.4, 2.2], [2.4, 3.0], [0.8, 3.0]],
        level: 0.0,
        height: 1.0,
        placement_id: 108,
        is_terrace: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::walls::signed_area;

    #[test]
    fn test_footprints_are_valid_polygons() {
        for fp in FOOTPRINTS {
            assert!(fp.points.len() >= 3, "Grundriss {} zu klein", fp.placement_id);
            assert!(fp.height > 0.0);
            assert!(
                signed_area(&fp.polygon()).abs() > 1e-3,
                "Grundriss {} ist degeneriert",
                fp.placement_id
            );
        }
    }

    #[test]
    fn test_placement_ids_are_unique() {
        let mut ids: Vec<u32> = FOOTPRINTS.iter().map(|f| f.placement_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), FOOTPRINTS.len());
    }
}
