//! Texture-Utilities für wgpu.

use image::DynamicImage;

use super::types::{DEPTH_FORMAT, OFFSCREEN_FORMAT};

/// Erstellt eine wgpu-Texture aus einem DynamicImage
///
/// # Parameter
/// - `device`: wgpu-Device für Texture-Erstellung
/// - `queue`: wgpu-Queue für Daten-Upload
/// - `image`: Bilddaten (wird zu RGBA8 konvertiert)
/// - `label`: Debug-Label für die Texture
///
/// # Returns
/// Die erstellte Texture mit Sampler
pub fn create_texture_from_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &DynamicImage,
    label: &str,
) -> (wgpu::Texture, wgpu::Sampler) {
    let rgba_image = image.to_rgba8();
    let (width, height) = rgba_image.dimensions();

    log::debug!(
        "Erstelle wgpu-Texture '{}': {}x{} Pixel, {} Bytes",
        label,
        width,
        height,
        rgba_image.len()
    );

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        texture.as_image_copy(),
        &rgba_image,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    // Äquirektangulares Panorama: horizontal wiederholen (Naht bei ±180°),
    // vertikal an die Pole klemmen
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(&format!("{}_sampler", label)),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    (texture, sampler)
}

/// Erstellt ein Offscreen-Farbziel (Render-Attachment + Sampling).
pub(crate) fn create_color_target(
    device: &wgpu::Device,
    label: &str,
    size: [u32; 2],
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Erstellt ein Tiefenziel passend zu `create_color_target`.
pub(crate) fn create_depth_target(
    device: &wgpu::Device,
    label: &str,
    size: [u32; 2],
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
