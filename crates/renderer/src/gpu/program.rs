//! Reusable shader program over a static screen quad.
//!
//! Both renderers (and the page backdrop) are the same machine: a unit quad,
//! one std140 uniform block at set 0, optionally one sampled texture at set 1,
//! and an indexed draw. The uniform block is a typed `bytemuck`-backed struct
//! supplied by the caller rather than a string-keyed handle table; a shader
//! that disagrees with the block layout fails pipeline validation at
//! construction time.

use bytemuck::{Pod, Zeroable};
use wgpu::naga::ShaderStage;
use wgpu::util::DeviceExt;

use crate::compile::{build_shader_module, checked_pipeline_build};
use crate::types::ShaderError;

/// Unit quad in widget space: top-left, bottom-left, bottom-right, top-right.
const QUAD_VERTICES: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Construction parameters for one program.
pub struct ProgramDescriptor<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    /// Byte size of the std140 uniform block at set 0, binding 0.
    pub uniform_size: u64,
    /// Texture sampled at set 1 (binding 0 texture, binding 1 sampler).
    pub texture_view: Option<&'a wgpu::TextureView>,
}

pub struct ShaderProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: Option<wgpu::BindGroupLayout>,
    texture_bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,
}

impl ShaderProgram {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        desc: &ProgramDescriptor<'_>,
    ) -> Result<Self, ShaderError> {
        let vertex_module = build_shader_module(
            device,
            &format!("{} vertex", desc.label),
            ShaderStage::Vertex,
            desc.vertex_source,
        )?;
        let fragment_module = build_shader_module(
            device,
            &format!("{} fragment", desc.label),
            ShaderStage::Fragment,
            desc.fragment_source,
        )?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size: desc.uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut sampler = None;
        let mut texture_layout = None;
        let mut texture_bind_group = None;
        if let Some(view) = desc.texture_view {
            let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
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
            let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("texture sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            });
            texture_bind_group = Some(build_texture_bind_group(
                device,
                &layout,
                view,
                &linear_sampler,
            ));
            texture_layout = Some(layout);
            sampler = Some(linear_sampler);
        }

        let mut bind_group_layouts: Vec<&wgpu::BindGroupLayout> = vec![&uniform_layout];
        if let Some(layout) = texture_layout.as_ref() {
            bind_group_layouts.push(layout);
        }
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        let pipeline = checked_pipeline_build(device, desc.label, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some("main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: 8,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 0,
                            shader_location: 0,
                        }],
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some("main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview: None,
                cache: None,
            })
        })?;

        tracing::debug!(label = desc.label, "shader program built");

        Ok(Self {
            label: desc.label.to_string(),
            pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            texture_bind_group,
            sampler,
        })
    }

    /// Rebinds the sampled texture after the owner reallocated it (resize).
    /// No-op for programs built without a texture slot.
    pub fn rebind_texture(&mut self, device: &wgpu::Device, view: &wgpu::TextureView) {
        if let (Some(layout), Some(sampler)) = (&self.texture_layout, &self.sampler) {
            self.texture_bind_group = Some(build_texture_bind_group(device, layout, view, sampler));
        } else {
            tracing::warn!(label = %self.label, "rebind_texture on a texture-less program");
        }
    }

    /// Uploads the uniform block and issues the indexed quad draw. Binding
    /// state on `pass` is clobbered; callers must not rely on it afterwards.
    pub fn draw<U>(&self, queue: &wgpu::Queue, pass: &mut wgpu::RenderPass<'_>, uniforms: &U)
    where
        U: Pod + Zeroable,
    {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        if let Some(texture_bind_group) = &self.texture_bind_group {
            pass.set_bind_group(1, texture_bind_group, &[]);
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

fn build_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
