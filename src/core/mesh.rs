//! Indizierte Dreiecks-Meshes als CPU-Daten.

use glam::{Mat3, Vec3};

/// Indiziertes Dreiecks-Mesh (nur Positionen — Rendering ist unbeleuchtet).
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex-Positionen
    pub positions: Vec<[f32; 3]>,
    /// Dreiecks-Indizes (je drei pro Dreieck)
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Erstellt ein leeres Mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Anzahl der Dreiecke.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Gibt zurück, ob das Mesh keine Dreiecke enthält.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Rotiert alle Positionen um die X-Achse (Winkel in Radiant).
    pub fn rotate_x(&mut self, angle: f32) {
        self.apply(Mat3::from_rotation_x(angle));
    }

    /// Rotiert alle Positionen um die Y-Achse (Winkel in Radiant).
    pub fn rotate_y(&mut self, angle: f32) {
        self.apply(Mat3::from_rotation_y(angle));
    }

    fn apply(&mut self, m: Mat3) {
        for p in &mut self.positions {
            let v = m * Vec3::from_array(*p);
            *p = v.to_array();
        }
    }

    /// Eckpunkte des Dreiecks `tri` (Index in [0, triangle_count)).
    pub fn triangle(&self, tri: usize) -> (Vec3, Vec3, Vec3) {
        let i = tri * 3;
        (
            Vec3::from_array(self.positions[self.indices[i] as usize]),
            Vec3::from_array(self.positions[self.indices[i + 1] as usize]),
            Vec3::from_array(self.positions[self.indices[i + 2] as usize]),
        )
    }

    /// Normierte Flächennormale des Dreiecks `tri`.
    /// Degenerierte Dreiecke liefern den Nullvektor.
    pub fn triangle_normal(&self, tri: usize) -> Vec3 {
        let (a, b, c) = self.triangle(tri);
        (b - a).cross(c - a).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> MeshData {
        MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_triangle_normal_points_along_z() {
        let mesh = unit_triangle();
        let n = mesh.triangle_normal(0);
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_x_maps_z_to_y() {
        let mut mesh = MeshData {
            positions: vec![[0.0, 0.0, 1.0]],
            indices: vec![],
        };
        mesh.rotate_x(-std::f32::consts::FRAC_PI_2);
        let p = mesh.positions[0];
        assert_relative_eq!(p[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let mesh = MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            indices: vec![0, 1, 2],
        };
        assert_eq!(mesh.triangle_normal(0), Vec3::ZERO);
    }
}
