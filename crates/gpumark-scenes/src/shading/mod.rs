//! Diffuse-lit mesh loaded from a vertex data file, spinning about Y.

mod mesh;

pub use mesh::{Bounds, FLOATS_PER_VERTEX, Mesh, MeshVertex};

use bytemuck::{Pod, Zeroable};
use cgmath::{Deg, Matrix, Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use gpumark_engine::render::{RenderCtx, RenderTarget};

use crate::common::{
    DepthBuffer, OPAQUE_BLACK, depth_attachment, depth_less, surface_target, triangle_list,
};
use crate::scene::{Scene, SceneKind};

/// Degrees of Y rotation per second.
pub const SPIN_DEG_PER_SEC: f32 = 36.0;

/// Gap between the camera and the near side of the mesh's bounding sphere.
const CAMERA_GAP: f32 = 2.0;

/// Blue, opaque.
const MATERIAL_DIFFUSE: [f32; 4] = [0.0, 0.0, 0.7, 1.0];

/// Matches the WGSL `Uniform` struct (208 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShadingUniform {
    pub model_view_projection: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub material_diffuse: [f32; 4],
    pub model_view: [[f32; 4]; 4],
}

/// Y rotation in degrees after `elapsed_secs`.
pub fn spin(elapsed_secs: f32) -> f32 {
    SPIN_DEG_PER_SEC * elapsed_secs
}

impl ShadingUniform {
    /// Moves the mesh center onto the -Z axis, just far enough that the
    /// bounding sphere stays `CAMERA_GAP` in front of the eye.
    pub fn new(bounds: &Bounds, spin_deg: f32, aspect: f32) -> Self {
        let [cx, cy, cz] = bounds.center();
        let radius = bounds.radius();

        let model_view = Matrix4::from_translation(Vector3::new(
            -cx,
            -cy,
            -(cz + CAMERA_GAP + radius),
        )) * Matrix4::from_angle_y(Deg(spin_deg));

        // The spin pivots on the model origin, so allow for its offset from the center.
        let reach = CAMERA_GAP + 2.0 * radius + (cx * cx + cy * cy + cz * cz).sqrt();
        let far = (2.0 * reach).max(100.0);
        let projection = cgmath::perspective(Deg(45.0f32), aspect, 0.1, far);

        let normal = model_view
            .invert()
            .unwrap_or_else(Matrix4::identity)
            .transpose();

        Self {
            model_view_projection: (projection * model_view).into(),
            normal: normal.into(),
            material_diffuse: MATERIAL_DIFFUSE,
            model_view: model_view.into(),
        }
    }
}

pub struct ShadingScene {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    depth: DepthBuffer,

    bounds: Bounds,
    vertex_count: u32,
}

impl ShadingScene {
    pub fn new(ctx: &RenderCtx<'_>, mesh: &Mesh) -> Self {
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gpumark shading shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/shading.wgsl").into()),
        });

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gpumark shading vbo"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_size = std::mem::size_of::<ShadingUniform>() as u64;
        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gpumark shading ubo"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gpumark shading bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(uniform_size),
                    },
                    count: None,
                }],
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gpumark shading bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gpumark shading pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gpumark shading pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &surface_target(ctx.surface_format),
            }),
            primitive: triangle_list(),
            depth_stencil: Some(depth_less()),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            vertex_buffer,
            uniform_buffer,
            depth: DepthBuffer::new(ctx),
            bounds: mesh.bounds,
            vertex_count: mesh.vertex_count(),
        }
    }
}

impl Scene for ShadingScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Shading
    }

    fn frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let uniform = ShadingUniform::new(
            &self.bounds,
            spin(ctx.time.elapsed_secs()),
            ctx.aspect(),
        );
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        let color = target.color_attachment(wgpu::LoadOp::Clear(OPAQUE_BLACK));
        let depth_view = self.depth.view(ctx);
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gpumark shading pass"),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: Some(depth_attachment(depth_view)),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3  // normal
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}
