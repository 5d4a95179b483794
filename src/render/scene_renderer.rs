//! Geometrie-Renderer für Beauty- und Masken-Pass.
//!
//! Beide Pässe zeichnen dieselben Meshes in derselben Reihenfolge; sie
//! unterscheiden sich nur in Pipeline-Zustand (Blending, Farbschreiben) und
//! Materialtabelle. Die Uniform-Buffer sind pro Pass getrennt, weil alle
//! `write_buffer`-Aufrufe eines Frames vor den aufgezeichneten Pässen landen —
//! ein geteilter Buffer würde vom zweiten Schreiben überschrieben.

use eframe::{egui_wgpu, wgpu};
use wgpu::util::DeviceExt;

use super::types::{
    MeshVertex, ObjectUniforms, RenderContext, SceneUniforms, DEPTH_FORMAT, OFFSCREEN_FORMAT,
    UNIFORM_STRIDE,
};
use crate::core::{Material, Scene};

/// Tiefenvergleich aller Szenen-Pipelines. Die Depth-Prepass-Zwillinge rastern
/// exakt dieselben Dreiecke wie ihre Füllungen; ein strikter `Less`-Vergleich
/// würde jedes Füll-Fragment gegen den eigenen Zwilling verwerfen.
const DEPTH_COMPARE: wgpu::CompareFunction = wgpu::CompareFunction::LessEqual;

/// Welcher Pass gezeichnet wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScenePass {
    /// Sichtbare Szene: Alpha-Blending, Tiefentest ohne Tiefenschreiben
    Beauty,
    /// ID-Maske: flache Farben ohne Blending, Tiefentest mit Tiefenschreiben
    Mask,
}

/// GPU-Buffer eines Szenen-Meshes.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Uniform-Buffer und Bind-Group eines Passes.
struct PassResources {
    scene_buffer: wgpu::Buffer,
    object_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: u32,
}

/// Renderer für die Szenen-Geometrie.
pub(crate) struct SceneRenderer {
    beauty_pipeline: wgpu::RenderPipeline,
    beauty_depth_pipeline: wgpu::RenderPipeline,
    mask_pipeline: wgpu::RenderPipeline,
    mask_depth_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,

    beauty_resources: PassResources,
    mask_resources: PassResources,

    meshes: Vec<GpuMesh>,
    mesh_revision: Option<u64>,
    draw_order: Vec<usize>,
    scratch: Vec<u8>,
}

impl SceneRenderer {
    /// Erstellt den Geometrie-Renderer mit allen vier Pipelines.
    pub fn new(render_state: &egui_wgpu::RenderState, shader: &wgpu::ShaderModule) -> Self {
        let device = &render_state.device;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                // View-Projektion
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Objekt-Daten mit Dynamic Offset
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ObjectUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str,
                             blend: Option<wgpu::BlendState>,
                             write_mask: wgpu::ColorWrites,
                             depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_scene"),
                    buffers: &[MeshVertex::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_scene"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: OFFSCREEN_FORMAT,
                        blend,
                        write_mask,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Wände sind von innen sichtbar, daher kein Culling
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: DEPTH_COMPARE,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let beauty_pipeline = make_pipeline(
            "Scene Beauty Pipeline",
            Some(wgpu::BlendState::ALPHA_BLENDING),
            wgpu::ColorWrites::ALL,
            false,
        );
        let beauty_depth_pipeline = make_pipeline(
            "Scene Beauty Depth Pipeline",
            None,
            wgpu::ColorWrites::empty(),
            true,
        );
        let mask_pipeline = make_pipeline(
            "Scene Mask Pipeline",
            None,
            wgpu::ColorWrites::ALL,
            true,
        );
        let mask_depth_pipeline = make_pipeline(
            "Scene Mask Depth Pipeline",
            None,
            wgpu::ColorWrites::empty(),
            true,
        );

        let beauty_resources =
            Self::create_pass_resources(device, &bind_group_layout, "Beauty", 64);
        let mask_resources = Self::create_pass_resources(device, &bind_group_layout, "Mask", 64);

        Self {
            beauty_pipeline,
            beauty_depth_pipeline,
            mask_pipeline,
            mask_depth_pipeline,
            bind_group_layout,
            beauty_resources,
            mask_resources,
            meshes: Vec::new(),
            mesh_revision: None,
            draw_order: Vec::new(),
            scratch: Vec::new(),
        }
    }

    fn create_pass_resources(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        capacity: u32,
    ) -> PassResources {
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Scene Uniform Buffer")),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Object Uniform Buffer")),
            size: capacity as u64 * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Scene Bind Group")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &object_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
                    }),
                },
            ],
        });
        PassResources {
            scene_buffer,
            object_buffer,
            bind_group,
            capacity,
        }
    }

    /// Lädt Meshes bei Revisionswechsel neu und sortiert die Zeichenreihenfolge.
    pub fn prepare(&mut self, ctx: &RenderContext<'_>) {
        let scene = &ctx.scene.scene;

        if self.mesh_revision != Some(scene.revision) {
            self.upload_meshes(ctx.device, scene);
            self.mesh_revision = Some(scene.revision);
        }

        // render_order aufsteigend, bei Gleichstand Einfüge-Reihenfolge
        self.draw_order.clear();
        self.draw_order.extend(0..scene.nodes.len());
        self.draw_order
            .sort_by_key(|&i| (scene.nodes[i].render_order, i));

        let count = scene.nodes.len() as u32;
        if count > self.beauty_resources.capacity {
            let capacity = count.next_power_of_two().max(64);
            log::debug!("Objekt-Uniform-Buffer wachsen auf {} Einträge", capacity);
            self.beauty_resources = Self::create_pass_resources(
                ctx.device,
                &self.bind_group_layout,
                "Beauty",
                capacity,
            );
            self.mask_resources =
                Self::create_pass_resources(ctx.device, &self.bind_group_layout, "Mask", capacity);
        }
    }

    fn upload_meshes(&mut self, device: &wgpu::Device, scene: &Scene) {
        self.meshes.clear();
        for node in &scene.nodes {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Mesh Vertex Buffer '{}'", node.name)),
                contents: bytemuck::cast_slice(&node.mesh.positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Mesh Index Buffer '{}'", node.name)),
                contents: bytemuck::cast_slice(&node.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.meshes.push(GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: node.mesh.indices.len() as u32,
            });
        }
        log::debug!("{} Meshes hochgeladen", self.meshes.len());
    }

    /// Schreibt View-Projektion und Objekt-Uniforms eines Passes.
    ///
    /// `table` liefert pro Node Farbe und Deckkraft — im Masken-Pass sind das
    /// die getauschten ID-Materialien.
    pub fn write_uniforms(&mut self, ctx: &RenderContext<'_>, pass: ScenePass, table: &[Material]) {
        let frame = ctx.scene;
        let resources = match pass {
            ScenePass::Beauty => &self.beauty_resources,
            ScenePass::Mask => &self.mask_resources,
        };

        let uniforms = SceneUniforms {
            view_proj: frame
                .camera
                .view_projection(frame.viewport_size)
                .to_cols_array_2d(),
        };
        ctx.queue
            .write_buffer(&resources.scene_buffer, 0, bytemuck::bytes_of(&uniforms));

        let count = frame.scene.nodes.len().min(table.len());
        self.scratch.clear();
        self.scratch.resize(count * UNIFORM_STRIDE as usize, 0);
        for index in 0..count {
            let material = &table[index];
            let object = ObjectUniforms {
                model: frame
                    .scene
                    .world_transform(index, frame.spin)
                    .to_cols_array_2d(),
                color: [
                    material.color[0],
                    material.color[1],
                    material.color[2],
                    material.opacity,
                ],
            };
            let offset = index * UNIFORM_STRIDE as usize;
            self.scratch[offset..offset + std::mem::size_of::<ObjectUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&object));
        }
        if !self.scratch.is_empty() {
            ctx.queue
                .write_buffer(&resources.object_buffer, 0, &self.scratch);
        }
    }

    /// Zeichnet alle Meshes in den laufenden Render-Pass.
    ///
    /// Pipeline pro Node: `color_write` der Materialtabelle entscheidet
    /// zwischen Farb- und reiner Tiefen-Pipeline.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        pass: ScenePass,
        table: &[Material],
    ) {
        let resources = match pass {
            ScenePass::Beauty => &self.beauty_resources,
            ScenePass::Mask => &self.mask_resources,
        };

        for &index in &self.draw_order {
            let Some(mesh) = self.meshes.get(index) else {
                continue;
            };
            let Some(material) = table.get(index) else {
                continue;
            };
            if mesh.index_count == 0 {
                continue;
            }

            let pipeline = match (pass, material.color_write) {
                (ScenePass::Beauty, true) => &self.beauty_pipeline,
                (ScenePass::Beauty, false) => &self.beauty_depth_pipeline,
                (ScenePass::Mask, true) => &self.mask_pipeline,
                (ScenePass::Mask, false) => &self.mask_depth_pipeline,
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(
                0,
                &resources.bind_group,
                &[index as u32 * UNIFORM_STRIDE as u32],
            );
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_compare_keeps_coplanar_fills() {
        // Zwilling (render_order -2, Tiefenschreiben) und Füllung liefern
        // identische Tiefenwerte; der Vergleich muss Gleichstand durchlassen,
        // sonst bleiben Beauty-Füllungen und Masken-IDs leer.
        assert_eq!(DEPTH_COMPARE, wgpu::CompareFunction::LessEqual);
    }
}
