//! Szene-Graph mit expliziter Outline-Markierung.
//!
//! Jeder Node deklariert über `stroke: Option<Stroke>` explizit, ob er ein
//! Outline-Ziel ist — kein Durchsuchen optionaler Felder zur Laufzeit.

use super::mesh::MeshData;
use glam::{Mat4, Quat, Vec3};

/// Lokale Transformation eines Nodes (TRS).
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    /// Translation in Welteinheiten
    pub translation: Vec3,
    /// Rotation
    pub rotation: Quat,
    /// Nicht-uniforme Skalierung
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Modell-Matrix (Translation * Rotation * Skalierung).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Flaches, unbeleuchtetes Material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// RGB-Füllfarbe
    pub color: [f32; 3],
    /// Deckkraft in [0, 1]
    pub opacity: f32,
    /// `false` = Depth-Prepass-Material: schreibt nur Tiefe, keine Farbe
    pub color_write: bool,
}

impl Material {
    /// Halbtransparentes Füllmaterial.
    pub fn fill(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            opacity,
            color_write: true,
        }
    }

    /// Material für reine Tiefen-Vorpässe.
    pub fn depth_only() -> Self {
        Self {
            color: [0.0; 3],
            opacity: 1.0,
            color_write: false,
        }
    }
}

/// Stroke-Tag: markiert einen Node als Outline-Ziel.
///
/// Reine Daten — das Vorhandensein dieses Tags ist das einzige Kriterium
/// für die Outline-Auswahl.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// RGB-Konturfarbe
    pub color: [f32; 3],
    /// Kontur-Deckkraft in [0, 1]
    pub opacity: f32,
    /// Konturbreite in Pixeln (>= 0)
    pub width: f32,
}

/// Demo-Gruppen der Szene (per GUI umschaltbar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneGroup {
    /// Extrudierte Wand-Grundrisse
    Walls,
    /// Freie Primitive (Box, Kugel, Zylinder, Torusknoten)
    Primitives,
    /// Einzelner Einheits-Quader-Grundriss
    Box,
}

/// Ein renderbarer Node der Szene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Anzeigename (für Logging/Picking)
    pub name: String,
    /// Geometrie (CPU-Daten; GPU-Buffer verwaltet der Renderer)
    pub mesh: MeshData,
    /// Lokale Transformation
    pub transform: Transform,
    /// Aktives Material
    pub material: Material,
    /// Optionales Outline-Tag
    pub stroke: Option<Stroke>,
    /// Zeichenreihenfolge innerhalb eines Passes (kleiner = früher)
    pub render_order: i32,
    /// Nimmt der Node am Ray-Picking teil?
    pub pickable: bool,
    /// Zugehörige Demo-Gruppe
    pub group: SceneGroup,
}

/// Flache Szene mit Revisionszähler.
///
/// `revision` wird bei jeder strukturellen Änderung erhöht, damit der
/// Renderer seine GPU-Buffer invalidieren kann. Material-/Stroke-Änderungen
/// ohne Geometrie-Wechsel erhöhen die Revision nicht.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Alle Nodes in Einfüge-Reihenfolge
    pub nodes: Vec<SceneNode>,
    /// Struktur-Revision für GPU-Buffer-Invalidierung
    pub revision: u64,
}

impl Scene {
    /// Erstellt eine leere Szene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt einen Node hinzu und gibt seinen Index zurück.
    pub fn add_node(&mut self, node: SceneNode) -> usize {
        self.nodes.push(node);
        self.revision += 1;
        self.nodes.len() - 1
    }

    /// Entfernt alle Nodes einer Gruppe.
    pub fn remove_group(&mut self, group: SceneGroup) {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.group != group);
        if self.nodes.len() != before {
            self.revision += 1;
        }
    }

    /// Welt-Transformation eines Nodes inklusive globalem Y-Spin.
    pub fn world_transform(&self, index: usize, spin: f32) -> Mat4 {
        Mat4::from_rotation_y(spin) * self.nodes[index].transform.matrix()
    }

    /// Setzt die Deckkraft aller Füllmaterialien (Depth-Prepass bleibt unberührt).
    pub fn set_fill_opacity(&mut self, opacity: f32) {
        for node in &mut self.nodes {
            if node.material.color_write {
                node.material.opacity = opacity;
            }
        }
    }

    /// Setzt die Deckkraft aller Stroke-Tags.
    pub fn set_stroke_opacity(&mut self, opacity: f32) {
        for node in &mut self.nodes {
            if let Some(stroke) = node.stroke.as_mut() {
                stroke.opacity = opacity;
            }
        }
    }

    /// Setzt die Breite aller Stroke-Tags.
    pub fn set_stroke_width(&mut self, width: f32) {
        for node in &mut self.nodes {
            if let Some(stroke) = node.stroke.as_mut() {
                stroke.width = width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn node(group: SceneGroup, stroke: Option<Stroke>, color_write: bool) -> SceneNode {
        SceneNode {
            name: String::new(),
            mesh: MeshData::new(),
            transform: Transform::default(),
            material: Material {
                color: [1.0; 3],
                opacity: 0.5,
                color_write,
            },
            stroke,
            render_order: 0,
            pickable: true,
            group,
        }
    }

    #[test]
    fn test_remove_group_bumps_revision() {
        let mut scene = Scene::new();
        scene.add_node(node(SceneGroup::Walls, None, true));
        scene.add_node(node(SceneGroup::Primitives, None, true));
        let rev = scene.revision;

        scene.remove_group(SceneGroup::Walls);
        assert_eq!(scene.nodes.len(), 1);
        assert!(scene.revision > rev);

        // Entfernen einer leeren Gruppe ändert nichts
        let rev = scene.revision;
        scene.remove_group(SceneGroup::Walls);
        assert_eq!(scene.revision, rev);
    }

    #[test]
    fn test_fill_opacity_skips_depth_prepass() {
        let mut scene = Scene::new();
        scene.add_node(node(SceneGroup::Walls, None, true));
        scene.add_node(node(SceneGroup::Walls, None, false));

        scene.set_fill_opacity(0.8);
        assert_relative_eq!(scene.nodes[0].material.opacity, 0.8);
        assert_relative_eq!(scene.nodes[1].material.opacity, 1.0);
    }

    #[test]
    fn test_stroke_setters_only_touch_tagged_nodes() {
        let stroke = Stroke {
            color: [1.0; 3],
            opacity: 1.0,
            width: 1.0,
        };
        let mut scene = Scene::new();
        scene.add_node(node(SceneGroup::Walls, Some(stroke), true));
        scene.add_node(node(SceneGroup::Walls, None, true));

        scene.set_stroke_width(4.0);
        scene.set_stroke_opacity(0.5);
        let s = scene.nodes[0].stroke.expect("Stroke fehlt");
        assert_relative_eq!(s.width, 4.0);
        assert_relative_eq!(s.opacity, 0.5);
        assert!(scene.nodes[1].stroke.is_none());
    }

    #[test]
    fn test_world_transform_applies_spin() {
        let mut scene = Scene::new();
        let mut n = node(SceneGroup::Box, None, true);
        n.transform.translation = Vec3::new(1.0, 0.0, 0.0);
        scene.add_node(n);

        let m = scene.world_transform(0, std::f32::consts::PI);
        let p = m.transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, -1.0, epsilon = 1e-6);
    }
}
