//! Ray-Picking über Szenen-Meshes (Möller–Trumbore).

use super::scene::Scene;
use glam::Vec3;

/// Treffer eines Picking-Strahls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index des getroffenen Nodes in `scene.nodes`
    pub node_index: usize,
    /// Distanz entlang des Strahls
    pub distance: f32,
}

/// Schnitt Strahl/Dreieck nach Möller–Trumbore.
///
/// Liefert die Distanz `t` entlang des Strahls oder `None`.
/// Beidseitig — Backfaces treffen ebenfalls (die Demo-Meshes sind
/// teils von innen sichtbar).
pub fn ray_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let h = dir.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < EPSILON {
        return None; // Strahl parallel zur Dreiecksebene
    }

    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(h) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Nächstgelegener pickbarer Node entlang des Strahls.
///
/// `spin` ist die globale Y-Rotation der Szene (muss mit dem Renderer
/// übereinstimmen, sonst trifft der Strahl verschobene Geometrie).
pub fn pick_node(scene: &Scene, spin: f32, origin: Vec3, dir: Vec3) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;

    for (index, node) in scene.nodes.iter().enumerate() {
        if !node.pickable || node.mesh.is_empty() {
            continue;
        }

        let world = scene.world_transform(index, spin);
        for tri in 0..node.mesh.triangle_count() {
            let (a, b, c) = node.mesh.triangle(tri);
            let (a, b, c) = (
                world.transform_point3(a),
                world.transform_point3(b),
                world.transform_point3(c),
            );
            if let Some(t) = ray_triangle(origin, dir, a, b, c) {
                if best.map_or(true, |h| t < h.distance) {
                    best = Some(RayHit {
                        node_index: index,
                        distance: t,
                    });
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::MeshData;
    use crate::core::primitives::box_mesh;
    use crate::core::scene::{Material, SceneGroup, SceneNode, Transform};
    use approx::assert_relative_eq;

    fn box_node(x: f32, pickable: bool) -> SceneNode {
        SceneNode {
            name: "box".into(),
            mesh: box_mesh(1.0, 1.0, 1.0),
            transform: Transform {
                translation: glam::Vec3::new(x, 0.0, 0.0),
                ..Transform::default()
            },
            material: Material::fill([1.0; 3], 0.5),
            stroke: None,
            render_order: 0,
            pickable,
            group: SceneGroup::Box,
        }
    }

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let a = Vec3::new(-1.0, -1.0, 0.0);
        let b = Vec3::new(1.0, -1.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);

        let t = ray_triangle(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, a, b, c);
        assert_relative_eq!(t.expect("Treffer erwartet"), 5.0, epsilon = 1e-5);

        // Strahl läuft am Dreieck vorbei
        assert!(ray_triangle(Vec3::new(5.0, 5.0, 5.0), Vec3::NEG_Z, a, b, c).is_none());

        // Dreieck hinter dem Ursprung
        assert!(ray_triangle(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z, a, b, c).is_none());
    }

    #[test]
    fn test_pick_nearest_node() {
        let mut scene = Scene::new();
        scene.add_node(box_node(0.0, true));
        scene.add_node(box_node(0.0, true));
        // Zweite Box weiter hinten
        scene.nodes[1].transform.translation.z = -3.0;

        let hit = pick_node(&scene, 0.0, Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z)
            .expect("Treffer erwartet");
        assert_eq!(hit.node_index, 0);
    }

    #[test]
    fn test_pick_skips_unpickable() {
        let mut scene = Scene::new();
        scene.add_node(box_node(0.0, false));
        assert!(pick_node(&scene, 0.0, Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).is_none());
    }

    #[test]
    fn test_pick_respects_spin() {
        let mut scene = Scene::new();
        // Box bei x=3: ohne Spin verfehlt der Strahl durch den Ursprung sie,
        // nach 90°-Spin steht sie bei z=3 im Strahl
        scene.add_node(box_node(3.0, true));

        let origin = Vec3::new(0.0, 0.0, 10.0);
        assert!(pick_node(&scene, 0.0, origin, Vec3::NEG_Z).is_none());
        assert!(pick_node(&scene, std::f32::consts::FRAC_PI_2, origin, Vec3::NEG_Z).is_some());
    }

    #[test]
    fn test_empty_mesh_is_ignored() {
        let mut scene = Scene::new();
        let mut node = box_node(0.0, true);
        node.mesh = MeshData::new();
        scene.add_node(node);
        assert!(pick_node(&scene, 0.0, Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).is_none());
    }
}
