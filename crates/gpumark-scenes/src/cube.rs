use bytemuck::{Pod, Zeroable};
use cgmath::{Deg, Matrix, Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use gpumark_engine::render::{RenderCtx, RenderTarget};

use crate::common::{DepthBuffer, depth_attachment, depth_less, surface_target, triangle_list};
use crate::scene::{Scene, SceneKind};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

/// Interleaved vertex: position, color, normal (36 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
}

impl CubeVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // color
        2 => Float32x3  // normal
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const fn v(position: [f32; 3], color: [f32; 3], normal: [f32; 3]) -> CubeVertex {
    CubeVertex { position, color, normal }
}

/// Six faces, two triangles each. Color is the corner of the RGB cube the
/// vertex sits on; normals only carry the sign of Y.
#[rustfmt::skip]
pub const CUBE_VERTICES: [CubeVertex; 36] = [
    // +Z
    v([-1.0, -1.0,  1.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    v([-1.0,  1.0,  1.0], [0.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
    v([ 1.0,  1.0,  1.0], [1.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
    v([-1.0, -1.0,  1.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    v([ 1.0,  1.0,  1.0], [1.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
    v([ 1.0, -1.0,  1.0], [1.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    // -Z
    v([ 1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    v([ 1.0,  1.0, -1.0], [1.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([-1.0,  1.0, -1.0], [0.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([ 1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    v([-1.0,  1.0, -1.0], [0.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    // +X
    v([ 1.0, -1.0,  1.0], [1.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    v([ 1.0,  1.0,  1.0], [1.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
    v([ 1.0,  1.0, -1.0], [1.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([ 1.0, -1.0,  1.0], [1.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    v([ 1.0,  1.0, -1.0], [1.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([ 1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    // -X
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    v([-1.0,  1.0, -1.0], [0.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([-1.0,  1.0,  1.0], [0.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    v([-1.0,  1.0,  1.0], [0.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
    v([-1.0, -1.0,  1.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    // -Y
    v([ 1.0, -1.0,  1.0], [1.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    v([-1.0, -1.0,  1.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    v([ 1.0, -1.0,  1.0], [1.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    v([ 1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    // +Y
    v([-1.0,  1.0,  1.0], [0.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
    v([-1.0,  1.0, -1.0], [0.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([ 1.0,  1.0, -1.0], [1.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([-1.0,  1.0,  1.0], [0.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
    v([ 1.0,  1.0, -1.0], [1.0, 1.0, 0.0], [0.0,  1.0, 0.0]),
    v([ 1.0,  1.0,  1.0], [1.0, 1.0, 1.0], [0.0,  1.0, 0.0]),
];

/// Matches the WGSL `Uniform` struct: three column-major mat4x4f (192 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeUniform {
    pub model_view: [[f32; 4]; 4],
    pub model_view_projection: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

/// Euler rotation in degrees (X, Y, Z) after `elapsed_ms` of animation.
pub fn rotation(elapsed_ms: f32) -> [f32; 3] {
    let t = elapsed_ms / 5.0;
    [45.0 + 0.25 * t, 45.0 + 0.5 * t, 10.0 + 0.1 * t]
}

impl CubeUniform {
    /// Camera at the origin looking down -Z at a cube 8 units away.
    pub fn new(rotation_deg: [f32; 3], aspect: f32) -> Self {
        let [rx, ry, rz] = rotation_deg;
        let model_view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -8.0))
            * Matrix4::from_angle_x(Deg(rx))
            * Matrix4::from_angle_y(Deg(ry))
            * Matrix4::from_angle_z(Deg(rz));

        let projection = cgmath::perspective(Deg(45.0f32), aspect, 0.1, 100.0);

        // A rigid transform is always invertible; identity covers degenerate input.
        let normal = model_view
            .invert()
            .unwrap_or_else(Matrix4::identity)
            .transpose();

        Self {
            model_view: model_view.into(),
            model_view_projection: (projection * model_view).into(),
            normal: normal.into(),
        }
    }
}

pub struct CubeScene {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    depth: DepthBuffer,
}

impl CubeScene {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gpumark cube shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cube.wgsl").into()),
        });

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gpumark cube vbo"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_size = std::mem::size_of::<CubeUniform>() as u64;
        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gpumark cube ubo"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gpumark cube bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(uniform_size),
                    },
                    count: None,
                }],
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gpumark cube bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gpumark cube pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gpumark cube pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[CubeVertex::layout()],
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
        }
    }
}

impl Scene for CubeScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Cube
    }

    fn frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let elapsed_ms = ctx.time.elapsed.as_secs_f32() * 1000.0;
        let uniform = CubeUniform::new(rotation(elapsed_ms), ctx.aspect());
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        let color = target.color_attachment(wgpu::LoadOp::Clear(CLEAR_COLOR));
        let depth_view = self.depth.view(ctx);
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gpumark cube pass"),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: Some(depth_attachment(depth_view)),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..CUBE_VERTICES.len() as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector4, InnerSpace};

    #[test]
    fn vertex_layout_is_nine_floats() {
        assert_eq!(std::mem::size_of::<CubeVertex>(), 36);
        assert_eq!(CubeVertex::ATTRS[1].offset, 12);
        assert_eq!(CubeVertex::ATTRS[2].offset, 24);
    }

    #[test]
    fn uniform_is_three_mat4() {
        assert_eq!(std::mem::size_of::<CubeUniform>(), 192);
    }

    #[test]
    fn every_vertex_is_a_cube_corner() {
        for vert in CUBE_VERTICES {
            assert!(vert.position.iter().all(|c| c.abs() == 1.0));
            // Corner color mirrors the position mapped from [-1, 1] to [0, 1].
            for (p, c) in vert.position.iter().zip(vert.color) {
                assert_eq!((p + 1.0) / 2.0, c);
            }
        }
    }

    #[test]
    fn rotation_starts_at_rest_pose() {
        assert_eq!(rotation(0.0), [45.0, 45.0, 10.0]);
        assert_eq!(rotation(1000.0), [95.0, 145.0, 30.0]);
    }

    #[test]
    fn cube_center_sits_eight_units_ahead() {
        let u = CubeUniform::new([0.0; 3], 1.0);
        let mv = Matrix4::from(u.model_view);
        let center = mv * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((center.z + 8.0).abs() < 1e-5);
    }

    #[test]
    fn normal_matrix_keeps_rotated_normals_unit_length() {
        let u = CubeUniform::new(rotation(1234.0), 4.0 / 3.0);
        let n = Matrix4::from(u.normal);
        let rotated = n * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!((rotated.truncate().magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn projected_center_lands_inside_clip_volume() {
        let u = CubeUniform::new(rotation(0.0), 640.0 / 480.0);
        let mvp = Matrix4::from(u.model_view_projection);
        let clip = mvp * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc_z = clip.z / clip.w;
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        assert!(ndc_z > -1.0 && ndc_z < 1.0);
    }
}
