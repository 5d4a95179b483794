//! Panorama-Hintergrund (äquirektangulare Projektion).
//!
//! Statt einer invertierten Kugel rekonstruiert ein Fullscreen-Pass pro Pixel
//! den Kamerastrahl aus der inversen View-Projektion und tastet das Panorama
//! über Länge/Breite des Strahls ab. Der Pass schreibt keine Tiefe und läuft
//! vor der Geometrie.

use eframe::{egui_wgpu, wgpu};
use image::DynamicImage;

use super::texture::create_texture_from_image;
use super::types::{BackgroundUniforms, RenderContext, DEPTH_FORMAT, OFFSCREEN_FORMAT};

/// Renderer für das Panorama.
pub(crate) struct BackgroundRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,

    texture: Option<wgpu::Texture>,
    bind_group: Option<wgpu::BindGroup>,
}

impl BackgroundRenderer {
    /// Erstellt den Panorama-Renderer (Texture wird per `set_panorama` geladen).
    pub fn new(render_state: &egui_wgpu::RenderState, shader: &wgpu::ShaderModule) -> Self {
        let device = &render_state.device;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Background Uniform Buffer"),
            size: std::mem::size_of::<BackgroundUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Background Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_background"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: OFFSCREEN_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            // Läuft im Beauty-Pass mit Tiefenziel: immer bestehen, nie schreiben
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            texture: None,
            bind_group: None,
        }
    }

    /// Lädt ein äquirektangulares Panorama hoch.
    pub fn set_panorama(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, image: &DynamicImage) {
        let (texture, sampler) = create_texture_from_image(device, queue, image, "Panorama");

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Background Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(
                        &texture.create_view(&wgpu::TextureViewDescriptor::default()),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.texture = Some(texture);
        self.bind_group = Some(bind_group);
        log::info!("BackgroundRenderer: Panorama geladen");
    }

    /// Entfernt das aktuelle Panorama.
    pub fn clear_panorama(&mut self) {
        self.texture = None;
        self.bind_group = None;
        log::info!("BackgroundRenderer: Panorama entfernt");
    }

    /// Schreibt die Uniforms des Frames (vor Beginn des Render-Passes).
    pub fn prepare(&self, ctx: &RenderContext<'_>) {
        let frame = ctx.scene;
        let inv_view_proj = frame
            .camera
            .view_projection(frame.viewport_size)
            .inverse()
            .to_cols_array_2d();
        let uniforms = BackgroundUniforms {
            inv_view_proj,
            opacity: 1.0,
            _padding: [0.0; 3],
        };
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Zeichnet das Panorama in den laufenden Beauty-Pass.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'static>, visible: bool) {
        if !visible {
            return;
        }
        let Some(bind_group) = self.bind_group.as_ref() else {
            return;
        };

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.draw(0..3, 0..1);

        log::trace!("BackgroundRenderer: Gerendert");
    }
}
