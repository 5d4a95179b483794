//! Kompositierung der Offscreen-Ziele in den egui-Render-Pass.
//!
//! Der Beauty-Blit ersetzt den Viewport-Inhalt, die Outline wird danach mit
//! Alpha-Blending darübergelegt. Der lineare Sampler filtert das supersampelte
//! Outline-Ziel beim Herunterskalieren.

use eframe::{egui_wgpu, wgpu};

/// Kompositor für Beauty- und Outline-Blit.
pub(crate) struct Compositor {
    opaque_pipeline: wgpu::RenderPipeline,
    blend_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    beauty_bind_group: Option<wgpu::BindGroup>,
    outline_bind_group: Option<wgpu::BindGroup>,
}

impl Compositor {
    /// Erstellt den Kompositor; die Pipelines zielen auf das egui-Framebuffer.
    pub fn new(render_state: &egui_wgpu::RenderState, shader: &wgpu::ShaderModule) -> Self {
        let device = &render_state.device;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Composite Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, blend: Option<wgpu::BlendState>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_fullscreen"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_blit"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: render_state.target_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let opaque_pipeline = make_pipeline("Composite Beauty Pipeline", Some(wgpu::BlendState::REPLACE));
        let blend_pipeline =
            make_pipeline("Composite Outline Pipeline", Some(wgpu::BlendState::ALPHA_BLENDING));

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Composite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            opaque_pipeline,
            blend_pipeline,
            bind_group_layout,
            sampler,
            beauty_bind_group: None,
            outline_bind_group: None,
        }
    }

    fn make_bind_group(
        &self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Bindet das Beauty-Ziel neu (nach Realloc).
    pub fn set_beauty_view(&mut self, device: &wgpu::Device, view: &wgpu::TextureView) {
        self.beauty_bind_group = Some(self.make_bind_group(device, view, "Composite Beauty Bind Group"));
    }

    /// Bindet das Outline-Ziel neu (nach Realloc).
    pub fn set_outline_view(&mut self, device: &wgpu::Device, view: Option<&wgpu::TextureView>) {
        self.outline_bind_group =
            view.map(|v| self.make_bind_group(device, v, "Composite Outline Bind Group"));
    }

    /// Ob aktuell ein Outline-Ziel gebunden ist.
    pub fn has_outline_view(&self) -> bool {
        self.outline_bind_group.is_some()
    }

    /// Zeichnet Beauty und Outline in den egui-Render-Pass.
    ///
    /// Der Pass gehört egui; er darf nicht geleert werden, daher nur Draws
    /// innerhalb des Callback-Viewports.
    pub fn composite(&self, render_pass: &mut wgpu::RenderPass<'static>) {
        if let Some(beauty) = self.beauty_bind_group.as_ref() {
            render_pass.set_pipeline(&self.opaque_pipeline);
            render_pass.set_bind_group(0, beauty, &[]);
            render_pass.draw(0..3, 0..1);
        }
        if let Some(outline) = self.outline_bind_group.as_ref() {
            render_pass.set_pipeline(&self.blend_pipeline);
            render_pass.set_bind_group(0, outline, &[]);
            render_pass.draw(0..3, 0..1);
        }
    }
}
