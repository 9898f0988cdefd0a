use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::matrix_operations::flatten_4x4_matrix_for_wgpu;
use crate::point_cloud::{PointCloudStore, PointRecord, POINT_RECORD_SIZE};
use crate::renderer::{PointDraw, PointMeshBackend};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointVertex {
    position: [f32; 3],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Default, Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointUniforms {
    view_proj: [[f32; 4]; 4],
    tint: [f32; 4],
}

const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
const PACKED_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Uint32];

pub fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Point Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Point mesh rebuilt from decoded store data.
pub struct GpuPointMesh {
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
}

/// Packed `PointRecord`s uploaded as-is and decoded in the vertex shader.
pub struct ExternalPointBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

impl ExternalPointBuffer {
    pub fn from_records(device: &wgpu::Device, records: &[PointRecord]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Packed Point Buffer"),
            contents: bytemuck::cast_slice(records),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            count: records.len() as u32,
        }
    }

    pub fn from_store(device: &wgpu::Device, store: &PointCloudStore) -> Self {
        Self::from_records(device, store.records())
    }
}

pub struct GpuPointBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GpuPointBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

impl PointMeshBackend for GpuPointBackend {
    type Mesh = GpuPointMesh;
    type ExternalBuffer = ExternalPointBuffer;

    fn create_mesh(&mut self) -> GpuPointMesh {
        GpuPointMesh {
            buffer: None,
            capacity: 0,
        }
    }

    fn upload(&mut self, mesh: &mut GpuPointMesh, positions: &[[f32; 3]], colors: &[[f32; 4]]) {
        let vertices: Vec<PointVertex> = positions
            .iter()
            .zip(colors)
            .map(|(&position, &color)| PointVertex { position, color })
            .collect();
        if vertices.is_empty() {
            return;
        }

        match &mesh.buffer {
            Some(buffer) if mesh.capacity >= vertices.len() => {
                self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(&vertices));
            }
            _ => {
                mesh.buffer = Some(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Point Mesh Buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                }));
                mesh.capacity = vertices.len();
            }
        }
    }
}

pub struct PointPass {
    uniform_layout: wgpu::BindGroupLayout,
    mesh_pipeline: wgpu::RenderPipeline,
    packed_pipeline: wgpu::RenderPipeline,
}

impl PointPass {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points: Uniform Bind Group Layout"),
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
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::include_wgsl!("point.wgsl"));

        let pipeline = |label: &str, entry_point: &str, buffer: wgpu::VertexBufferLayout| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(entry_point),
                    compilation_options: Default::default(),
                    buffers: &[buffer],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(format.into())],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::PointList,
                    strip_index_format: None,
                    front_face: Default::default(),
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: Default::default(),
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let mesh_pipeline = pipeline(
            "Point Mesh Pipeline",
            "vs_mesh",
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &MESH_ATTRIBUTES,
            },
        );
        let packed_pipeline = pipeline(
            "Packed Point Pipeline",
            "vs_packed",
            wgpu::VertexBufferLayout {
                array_stride: POINT_RECORD_SIZE as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &PACKED_ATTRIBUTES,
            },
        );

        Self {
            uniform_layout,
            mesh_pipeline,
            packed_pipeline,
        }
    }
}

pub struct PointBindings {
    uniform_buffer: wgpu::Buffer,
    uniforms: wgpu::BindGroup,
}

impl PointBindings {
    pub fn new(device: &wgpu::Device, pass: &PointPass) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Uniform Buffer"),
            contents: bytemuck::cast_slice(&[PointUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniforms = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Points: Uniform Bind Group"),
            layout: &pass.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            uniform_buffer,
            uniforms,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, view_proj: Matrix4<f32>, tint: [f32; 4]) {
        let uniforms = PointUniforms {
            view_proj: flatten_4x4_matrix_for_wgpu(view_proj),
            tint,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }
}

impl<'a> PointPass {
    pub fn record<'pass>(
        &'a self,
        rpass: &mut wgpu::RenderPass<'pass>,
        bindings: &'a PointBindings,
        draw: PointDraw<'a, GpuPointMesh, ExternalPointBuffer>,
    ) where
        'a: 'pass,
    {
        let (pipeline, buffer, count) = match draw {
            PointDraw::Mesh { mesh, count } => match &mesh.buffer {
                Some(buffer) => (&self.mesh_pipeline, buffer, count),
                None => return,
            },
            PointDraw::External(external) => (&self.packed_pipeline, &external.buffer, external.count),
        };
        if count == 0 {
            return;
        }
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &bindings.uniforms, &[]);
        rpass.set_vertex_buffer(0, buffer.slice(..));
        rpass.draw(0..count, 0..1);
    }
}
