//! Prozedurale Basis-Geometrien für die Primitive-Demo-Gruppe.

use super::mesh::MeshData;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Achsparalleler Quader, zentriert im Ursprung.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
    let positions = vec![
        // -X / +X / -Y / +Y / -Z / +Z, je 4 Ecken
        [-hw, -hh, -hd], [-hw, -hh, hd], [-hw, hh, hd], [-hw, hh, -hd],
        [hw, -hh, hd], [hw, -hh, -hd], [hw, hh, -hd], [hw, hh, hd],
        [-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd],
        [-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd],
        [hw, -hh, -hd], [-hw, -hh, -hd], [-hw, hh, -hd], [hw, hh, -hd],
        [-hw, -hh, hd], [hw, -hh, hd], [hw, hh, hd], [-hw, hh, hd],
    ];

    let mut indices = Vec::with_capacity(36);
    for face in 0..6u32 {
        let base = face * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { positions, indices }
}

/// UV-Kugel, zentriert im Ursprung.
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = MeshData::new();

    for iy in 0..=hs {
        let phi = iy as f32 / hs as f32 * PI;
        for ix in 0..=ws {
            let theta = ix as f32 / ws as f32 * TAU;
            mesh.positions.push([
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ]);
        }
    }

    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix;
            let b = a + row;
            // An den Polen degeneriert je ein Dreieck — überspringen
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
            }
            if iy != hs - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    mesh
}

/// Zylinder entlang der Y-Achse, zentriert im Ursprung, mit Kappen.
pub fn cylinder_mesh(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    let rs = radial_segments.max(3);
    let hh = height * 0.5;
    let mut mesh = MeshData::new();

    // Mantel-Ringe (unten, oben)
    for &y in &[-hh, hh] {
        for ix in 0..=rs {
            let theta = ix as f32 / rs as f32 * TAU;
            mesh.positions
                .push([radius * theta.cos(), y, radius * theta.sin()]);
        }
    }

    let row = rs + 1;
    for ix in 0..rs {
        let a = ix;
        let b = ix + row;
        mesh.indices.extend_from_slice(&[a, a + 1, b + 1]);
        mesh.indices.extend_from_slice(&[a, b + 1, b]);
    }

    // Kappen als Fächer um die Mittelpunkte
    let bottom_center = mesh.positions.len() as u32;
    mesh.positions.push([0.0, -hh, 0.0]);
    let top_center = mesh.positions.len() as u32;
    mesh.positions.push([0.0, hh, 0.0]);

    for ix in 0..rs {
        mesh.indices
            .extend_from_slice(&[bottom_center, ix, ix + 1]);
        mesh.indices
            .extend_from_slice(&[top_center, row + ix + 1, row + ix]);
    }

    mesh
}

/// Punkt auf der (p, q)-Torusknoten-Kurve.
fn torus_knot_point(u: f32, radius: f32, p: f32, q: f32) -> Vec3 {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    )
}

/// Torusknoten-Röhre (p=2, q=3 ergibt den klassischen Kleeblatt-Knoten).
pub fn torus_knot_mesh(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let ts = tubular_segments.max(3);
    let rs = radial_segments.max(3);
    let (pf, qf) = (p as f32, q as f32);
    let mut mesh = MeshData::new();

    for i in 0..=ts {
        let u = i as f32 / ts as f32 * pf * TAU;
        let p1 = torus_knot_point(u, radius, pf, qf);
        let p2 = torus_knot_point(u + 0.01, radius, pf, qf);

        // Frenet-ähnliches Frame aus Vorwärts-Differenz
        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(normal).normalize_or_zero();
        normal = binormal.cross(tangent).normalize_or_zero();

        for j in 0..=rs {
            let v = j as f32 / rs as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let pos = p1 + cx * normal + cy * binormal;
            mesh.positions.push(pos.to_array());
        }
    }

    let row = rs + 1;
    for i in 0..ts {
        for j in 0..rs {
            let a = i * row + j;
            let b = a + row;
            mesh.indices.extend_from_slice(&[a, b, a + 1]);
            mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_counts() {
        let mesh = box_mesh(1.0, 2.0, 3.0);
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = sphere_mesh(2.0, 16, 12);
        for p in &mesh.positions {
            let len = Vec3::from_array(*p).length();
            assert_relative_eq!(len, 2.0, epsilon = 1e-4);
        }
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_cylinder_is_closed() {
        let mesh = cylinder_mesh(1.0, 2.0, 24);
        // Mantel: 2 Dreiecke pro Segment, Kappen: je 1 pro Segment
        assert_eq!(mesh.triangle_count(), 24 * 2 + 24 * 2);
    }

    #[test]
    fn test_torus_knot_counts() {
        let mesh = torus_knot_mesh(0.7, 0.24, 120, 20, 2, 3);
        assert_eq!(mesh.triangle_count(), (120 * 20 * 2) as usize);
        assert_eq!(mesh.positions.len(), (121 * 21) as usize);
    }

    #[test]
    fn test_all_indices_in_bounds() {
        for mesh in [
            box_mesh(1.0, 1.0, 1.0),
            sphere_mesh(1.4, 48, 32),
            cylinder_mesh(0.9, 2.2, 48),
            torus_knot_mesh(0.7, 0.24, 120, 20, 2, 3),
        ] {
            let max = mesh.positions.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < max));
        }
    }
}
