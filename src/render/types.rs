//! Rendering-Typen und gemeinsame Konstanten.

use bytemuck::{Pod, Zeroable};

use crate::shared::RenderScene;

/// Format aller Offscreen-Farbziele (Beauty, ID-Maske, Outline).
///
/// Bewusst kein sRGB-Format: egui wählt für das Framebuffer ein lineares
/// Format, und die ID-Maske braucht exakte, unkodierte Bytewerte.
pub(crate) const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Format der Tiefenziele.
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Byte-Abstand zweier Objekt-Uniform-Einträge (Dynamic-Offset-Alignment).
pub(crate) const UNIFORM_STRIDE: u64 = 256;

/// Gemeinsamer Kontext für alle Sub-Renderer.
///
/// Bündelt die GPU-Ressourcen und den Frame-Schnappschuss, die jeder
/// Sub-Renderer bei jedem Frame benötigt.
pub(crate) struct RenderContext<'a> {
    /// wgpu Device für Buffer-Allokation
    pub device: &'a wgpu::Device,
    /// wgpu Queue für Buffer-Uploads
    pub queue: &'a wgpu::Queue,
    /// Frame-Schnappschuss der App
    pub scene: &'a RenderScene,
}

/// Vertex eines Szenen-Meshes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position im Objektraum
    pub position: [f32; 3],
}

impl MeshVertex {
    /// Beschreibt das Vertex-Layout für wgpu.
    pub const fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Uniform-Buffer pro Pass (View-Projektion).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    /// View-Projection-Matrix (4x4)
    pub view_proj: [[f32; 4]; 4],
}

/// Uniform-Eintrag pro Objekt (Dynamic Offset, Abstand `UNIFORM_STRIDE`).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    /// Modell-Matrix (inklusive globalem Szenen-Spin)
    pub model: [[f32; 4]; 4],
    /// RGBA-Farbe des Objekts
    pub color: [f32; 4],
}

/// Uniforms für den Panorama-Hintergrund.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BackgroundUniforms {
    /// Inverse View-Projection-Matrix für die Strahlrekonstruktion
    pub inv_view_proj: [[f32; 4]; 4],
    /// Deckkraft des Panoramas
    pub opacity: f32,
    pub _padding: [f32; 3],
}

/// Uniforms für den Outline-Pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct OutlineUniforms {
    /// Weiche Kantenbreite in Pixeln
    pub feather_px: f32,
    /// Such-Ringe (1..3)
    pub rings: u32,
    /// Anzahl gültiger LUT-Einträge (0 = nichts zeichnen)
    pub lut_size: u32,
    pub _padding: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_uniforms_fit_stride() {
        assert!(std::mem::size_of::<ObjectUniforms>() as u64 <= UNIFORM_STRIDE);
    }

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<BackgroundUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<OutlineUniforms>() % 16, 0);
    }
}
