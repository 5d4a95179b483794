//! Aufbau der Demo-Szenengruppen (Walls, Primitive, Box).
//!
//! Jedes Füll-Mesh bekommt einen Depth-Prepass-Zwilling (schreibt nur Tiefe,
//! zeichnet vor den transparenten Füllungen) und ein Stroke-Tag für die
//! Outline-Auswahl.

use super::footprints::{self, Footprint};
use super::mesh::MeshData;
use super::primitives;
use super::random::{palette_color, Lcg};
use super::scene::{Material, Scene, SceneGroup, SceneNode, Stroke, Transform};
use super::walls;
use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_8, PI};

/// Anzahl diskreter Hue-Stufen der Wall-Palette.
pub const PALETTE_BUCKETS: u32 = 72;

/// Stil-Parameter für den Szenenaufbau.
#[derive(Debug, Clone, Copy)]
pub struct DemoSceneParams {
    /// Deckkraft der Füllmaterialien
    pub fill_opacity: f32,
    /// Deckkraft der Konturen
    pub stroke_opacity: f32,
    /// Konturbreite in Pixeln
    pub stroke_width: f32,
    /// Seed für die Wall-Farbvergabe (gleicher Seed = gleiche Farben)
    pub color_seed: u32,
}

impl DemoSceneParams {
    fn stroke(&self, color: [f32; 3]) -> Stroke {
        Stroke {
            color,
            opacity: self.stroke_opacity,
            width: self.stroke_width,
        }
    }
}

/// Baut eine Gruppe neu auf: erst entfernen, bei `enabled` wieder einfügen.
pub fn rebuild_group(scene: &mut Scene, group: SceneGroup, enabled: bool, params: &DemoSceneParams) {
    scene.remove_group(group);
    if !enabled {
        return;
    }

    match group {
        SceneGroup::Walls => build_walls(scene, params),
        SceneGroup::Primitives => build_primitives(scene, params),
        SceneGroup::Box => build_box(scene, params),
    }
}

/// Fügt ein Füll-Mesh plus Depth-Prepass-Zwilling ein.
fn add_stroked_pair(
    scene: &mut Scene,
    name: &str,
    fill_mesh: MeshData,
    depth_mesh: MeshData,
    transform: Transform,
    color: [f32; 3],
    group: SceneGroup,
    params: &DemoSceneParams,
) {
    scene.add_node(SceneNode {
        name: name.to_string(),
        mesh: fill_mesh,
        transform,
        material: Material::fill(color, params.fill_opacity),
        stroke: Some(params.stroke(color)),
        render_order: 0,
        pickable: true,
        group,
    });
    scene.add_node(SceneNode {
        name: format!("{name}_depth"),
        mesh: depth_mesh,
        transform,
        material: Material::depth_only(),
        stroke: None,
        render_order: -2,
        pickable: false,
        group,
    });
}

/// Grundriss → Wand-Paar (Wände ohne Kappen, Depth-Mesh mit Kappen).
fn add_placement(
    scene: &mut Scene,
    name: &str,
    footprint: &Footprint,
    color: [f32; 3],
    group: SceneGroup,
    params: &DemoSceneParams,
) {
    let polygon = footprint.polygon();

    let mut fill_mesh = walls::walls_from_polygon(&polygon, 1.0);
    let mut depth_mesh = walls::extrude_polygon(&polygon, 1.0);
    for mesh in [&mut fill_mesh, &mut depth_mesh] {
        // Extrusionsachse +Z → +Y, danach 180° um Y (Datensatz-Konvention)
        mesh.rotate_x(-FRAC_PI_2);
        mesh.rotate_y(PI);
    }

    let transform = Transform {
        translation: Vec3::new(0.0, footprint.level * footprints::LEVEL_MULTIPLY, 0.0),
        rotation: Quat::IDENTITY,
        scale: Vec3::new(1.0, footprint.height * footprints::LEVEL_MULTIPLY, 1.0),
    };

    add_stroked_pair(
        scene, name, fill_mesh, depth_mesh, transform, color, group, params,
    );
}

/// Neutralfarbe der Terrassen-Grundrisse.
const TERRACE_COLOR: [f32; 3] = [0.85, 0.85, 0.85];

fn build_walls(scene: &mut Scene, params: &DemoSceneParams) {
    let mut rng = Lcg::new(params.color_seed);

    for footprint in footprints::FOOTPRINTS {
        let color = if footprint.is_terrace {
            TERRACE_COLOR
        } else {
            palette_color(&mut rng, PALETTE_BUCKETS)
        };
        let name = format!("wall_{}", footprint.placement_id);
        add_placement(scene, &name, footprint, color, SceneGroup::Walls, params);
    }

    log::debug!(
        "Walls-Gruppe aufgebaut: {} Grundrisse",
        footprints::FOOTPRINTS.len()
    );
}

fn build_primitives(scene: &mut Scene, params: &DemoSceneParams) {
    let entries: [(&str, MeshData, [f32; 3], Transform); 4] = [
        (
            "any_box",
            primitives::box_mesh(2.2, 2.8, 1.2),
            [1.0, 0.0, 0.0],
            Transform {
                translation: Vec3::new(-0.6, 0.6, 0.2),
                ..Transform::default()
            },
        ),
        (
            "any_sphere",
            primitives::sphere_mesh(1.4, 48, 32),
            [0.0, 0.0, 1.0],
            Transform {
                translation: Vec3::new(0.9, -0.2, 0.9),
                ..Transform::default()
            },
        ),
        (
            "any_cylinder",
            primitives::cylinder_mesh(0.9, 2.2, 48),
            [0.0, 1.0, 0.0],
            Transform {
                translation: Vec3::new(1.8, 0.7, -0.6),
                rotation: Quat::from_rotation_z(FRAC_PI_8),
                scale: Vec3::ONE,
            },
        ),
        (
            "any_knot",
            primitives::torus_knot_mesh(0.7, 0.24, 120, 20, 2, 3),
            [1.0, 1.0, 0.0],
            Transform {
                translation: Vec3::new(-1.8, -0.4, -0.4),
                ..Transform::default()
            },
        ),
    ];

    for (name, mesh, color, transform) in entries {
        let depth_mesh = mesh.clone();
        add_stroked_pair(
            scene,
            name,
            mesh,
            depth_mesh,
            transform,
            color,
            SceneGroup::Primitives,
            params,
        );
    }
}

fn build_box(scene: &mut Scene, params: &DemoSceneParams) {
    let footprint = Footprint {
        points: &[[-0.5, -0.5], [-0.5, 0.5], [0.5, 0.5], [0.5, -0.5]],
        level: 0.0,
        height: 1.0 / footprints::LEVEL_MULTIPLY, // Einheitshöhe
        placement_id: 0,
        is_terrace: false,
    };
    add_placement(
        scene,
        "box",
        &footprint,
        [0.933, 0.933, 0.933],
        SceneGroup::Box,
        params,
    );
}
