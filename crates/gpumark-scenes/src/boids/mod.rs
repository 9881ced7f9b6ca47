//! Compute boids: a compute pass advances the flock, a render pass draws it.
//!
//! Two particle buffers alternate roles each frame. Bind group `i` reads
//! buffer `i` and writes buffer `(i + 1) % 2`; the render pass draws the
//! buffer that was just written.

mod sim;

pub use sim::{initial_particles, simulate_step, Particle, SimParams, MAX_SPEED};

use anyhow::{Result, ensure};
use wgpu::util::DeviceExt;

use gpumark_engine::render::{RenderCtx, RenderTarget};

use crate::common::{seeded_rng, surface_target, triangle_list, OPAQUE_BLACK};
use crate::scene::{Scene, SceneKind};

pub const NUM_PARTICLES: u32 = 1500;

/// Must match `@workgroup_size` in `boids_update.wgsl`.
pub const WORKGROUP_SIZE: u32 = 64;

/// Boid outline in model space, pointing up +Y.
const MODEL: [[f32; 2]; 3] = [[-0.01, -0.02], [0.01, -0.02], [0.0, 0.02]];

/// Size of one particle buffer. Storage bindings need at least one particle.
fn particle_buffer_size(particles: u32) -> Result<wgpu::BufferAddress> {
    ensure!(particles > 0, "boids need at least one particle");
    Ok(particles as u64 * std::mem::size_of::<Particle>() as u64)
}

/// Workgroups needed to cover `particles` invocations.
pub fn workgroup_count(particles: u32) -> u32 {
    particles.div_ceil(WORKGROUP_SIZE)
}

pub struct ComputeBoidsScene {
    model_buffer: wgpu::Buffer,
    particle_buffers: [wgpu::Buffer; 2],

    render_pipeline: wgpu::RenderPipeline,
    update_pipeline: wgpu::ComputePipeline,
    update_bind_groups: [wgpu::BindGroup; 2],

    particle_count: u32,
    pingpong: usize,
}

impl ComputeBoidsScene {
    pub fn new(ctx: &RenderCtx<'_>, seed: u64) -> Result<Self> {
        Self::with_count(ctx, seed, NUM_PARTICLES)
    }

    fn with_count(ctx: &RenderCtx<'_>, seed: u64, particle_count: u32) -> Result<Self> {
        let buffer_size = particle_buffer_size(particle_count)?;

        // ── buffers ───────────────────────────────────────────────────────

        let model_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gpumark boids model vbo"),
            contents: bytemuck::cast_slice(&MODEL),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut rng = seeded_rng(seed);
        let particles = initial_particles(&mut rng, particle_count as usize);

        let particle_buffers = [0, 1].map(|i| {
            ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(if i == 0 {
                    "gpumark boids particles 0"
                } else {
                    "gpumark boids particles 1"
                }),
                contents: bytemuck::cast_slice(&particles),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::VERTEX
                    | wgpu::BufferUsages::COPY_DST,
            })
        });

        let sim_params = SimParams::with_count(particle_count);
        let params_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gpumark boids sim params"),
            contents: bytemuck::bytes_of(&sim_params),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // ── render ────────────────────────────────────────────────────────

        let render_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gpumark boids render shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/boids_render.wgsl").into()),
        });

        let render_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gpumark boids render pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let render_pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gpumark boids render pipeline"),
            layout: Some(&render_layout),
            vertex: wgpu::VertexState {
                module: &render_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[particle_layout(), model_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &surface_target(ctx.surface_format),
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // ── simulation ────────────────────────────────────────────────────

        let update_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gpumark boids update shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/boids_update.wgsl").into()),
        });

        let storage_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: false },
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Particle>() as u64),
            },
            count: None,
        };

        let update_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gpumark boids update bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<SimParams>() as u64,
                        ),
                    },
                    count: None,
                },
                storage_entry(1),
                storage_entry(2),
            ],
        });

        let update_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gpumark boids update pipeline layout"),
            bind_group_layouts: &[&update_bgl],
            immediate_size: 0,
        });

        let update_pipeline = ctx.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("gpumark boids update pipeline"),
            layout: Some(&update_layout),
            module: &update_shader,
            entry_point: Some("cs_main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let update_bind_groups = [0usize, 1].map(|i| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("gpumark boids update bind group"),
                layout: &update_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: particle_buffers[i].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: particle_buffers[(i + 1) % 2].as_entire_binding(),
                    },
                ],
            })
        });

        log::debug!(
            "boids: {particle_count} particles ({buffer_size} bytes per buffer), {} workgroups per step",
            workgroup_count(particle_count)
        );

        Ok(Self {
            model_buffer,
            particle_buffers,
            render_pipeline,
            update_pipeline,
            update_bind_groups,
            particle_count,
            pingpong: 0,
        })
    }
}

impl Scene for ComputeBoidsScene {
    fn kind(&self) -> SceneKind {
        SceneKind::ComputeBoids
    }

    fn frame(&mut self, _ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let i = self.pingpong;
        let written = &self.particle_buffers[(i + 1) % 2];

        {
            let mut cpass = target.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("gpumark boids update pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.update_pipeline);
            cpass.set_bind_group(0, &self.update_bind_groups[i], &[]);
            cpass.dispatch_workgroups(workgroup_count(self.particle_count), 1, 1);
        }

        {
            let color = target.color_attachment(wgpu::LoadOp::Clear(OPAQUE_BLACK));
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gpumark boids render pass"),
                color_attachments: &[Some(color)],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&self.render_pipeline);
            rpass.set_vertex_buffer(0, written.slice(..));
            rpass.set_vertex_buffer(1, self.model_buffer.slice(..));
            rpass.draw(0..MODEL.len() as u32, 0..self.particle_count);
        }

        self.pingpong = (self.pingpong + 1) % 2;
    }
}

// ── vertex layouts ────────────────────────────────────────────────────────

const PARTICLE_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2, // pos
    1 => Float32x2  // vel
];

const MODEL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

fn particle_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Particle>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &PARTICLE_ATTRS,
    }
}

fn model_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MODEL_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_covers_every_particle() {
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(64), 1);
        assert_eq!(workgroup_count(65), 2);
        assert_eq!(workgroup_count(NUM_PARTICLES), 24);
        assert!(workgroup_count(NUM_PARTICLES) * WORKGROUP_SIZE >= NUM_PARTICLES);
    }

    #[test]
    fn empty_flock_is_rejected() {
        assert!(particle_buffer_size(0).is_err());
        assert_eq!(particle_buffer_size(1).unwrap(), 16);
        assert_eq!(particle_buffer_size(NUM_PARTICLES).unwrap(), 24_000);
    }

    #[test]
    fn particle_attributes_follow_struct_layout() {
        assert_eq!(PARTICLE_ATTRS[0].offset, 0);
        assert_eq!(PARTICLE_ATTRS[1].offset, 8);
        assert_eq!(particle_layout().array_stride, 16);
    }

    #[test]
    fn model_points_along_positive_y() {
        let apex = MODEL.iter().fold(f32::MIN, |m, v| m.max(v[1]));
        assert_eq!(apex, 0.02);
        assert_eq!(model_layout().array_stride, 8);
    }
}
