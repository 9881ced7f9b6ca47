//! Animometer: a MotionMark-style stress test.
//!
//! Draws [`NUM_TRIANGLES`] small triangles, each with its own uniform record.
//! All records live in one buffer; the draw loop rebinds the same bind group
//! with a different dynamic offset before every `draw`.

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use rand::Rng;

use gpumark_engine::render::{RenderCtx, RenderTarget};

use crate::common::{seeded_rng, surface_target, triangle_list, uniform_stride};
use crate::scene::{Scene, SceneKind};

pub const NUM_TRIANGLES: usize = 10_000;

/// Frames per unit of shader time (`time = frame_index / FRAMES_PER_TIME_UNIT`).
const FRAMES_PER_TIME_UNIT: f32 = 60.0;

/// Per-triangle uniform record. Matches the WGSL `Constants` struct (24 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TriangleParams {
    pub scale: f32,
    pub time: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub scalar: f32,
    pub scalar_offset: f32,
}

impl TriangleParams {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            scale: rng.gen_range(0.2..0.4),
            time: 0.0,
            offset_x: rng.gen_range(-0.9..0.9),
            offset_y: rng.gen_range(-0.9..0.9),
            scalar: rng.gen_range(0.5..2.0),
            scalar_offset: rng.gen_range(0.0..10.0),
        }
    }
}

/// Shader time once `frames_drawn` frames have been drawn.
pub fn shader_time(frames_drawn: u64) -> f32 {
    frames_drawn as f32 / FRAMES_PER_TIME_UNIT
}

/// Counts drawn frames. The count is bumped before the time is read, so the
/// first frame already animates at `1 / 60`.
#[derive(Debug, Default, Clone)]
struct FrameTimer {
    frames_drawn: u64,
}

impl FrameTimer {
    fn next_time(&mut self) -> f32 {
        self.frames_drawn += 1;
        shader_time(self.frames_drawn)
    }
}

/// Copies each record to `i * stride` in `dst`, leaving padding untouched.
///
/// `dst` must hold at least `params.len() * stride` bytes.
pub fn pack_uniforms(params: &[TriangleParams], stride: usize, dst: &mut [u8]) {
    let size = std::mem::size_of::<TriangleParams>();
    debug_assert!(stride >= size);
    debug_assert!(dst.len() >= params.len() * stride);

    for (p, chunk) in params.iter().zip(dst.chunks_exact_mut(stride)) {
        chunk[..size].copy_from_slice(bytemuck::bytes_of(p));
    }
}

pub struct AnimometerScene {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    ubo: wgpu::Buffer,

    params: Vec<TriangleParams>,
    stride: u64,
    staging: Vec<u8>,
    timer: FrameTimer,
}

impl AnimometerScene {
    pub fn new(ctx: &RenderCtx<'_>, seed: u64) -> Result<Self> {
        let params_size = std::mem::size_of::<TriangleParams>() as u64;
        let align = ctx.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = uniform_stride(params_size, align);
        let ubo_size = stride * NUM_TRIANGLES as u64;

        anyhow::ensure!(
            ubo_size <= ctx.limits().max_buffer_size,
            "animometer uniform buffer ({ubo_size} bytes) exceeds device max_buffer_size"
        );
        // Dynamic offsets must fit in u32.
        let last_offset = u32::try_from(stride * (NUM_TRIANGLES as u64 - 1))
            .context("animometer dynamic offsets overflow u32")?;
        log::debug!("animometer: stride {stride} bytes, last offset {last_offset}");

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gpumark animometer shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/animometer.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gpumark animometer bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(params_size),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gpumark animometer pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gpumark animometer pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
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

        let mut rng = seeded_rng(seed);
        let params: Vec<TriangleParams> = (0..NUM_TRIANGLES)
            .map(|_| TriangleParams::random(&mut rng))
            .collect();

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gpumark animometer ubo"),
            size: ubo_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // One record-sized window; the dynamic offset slides it across the buffer.
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gpumark animometer bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(params_size),
                }),
            }],
        });

        Ok(Self {
            pipeline,
            bind_group,
            ubo,
            params,
            stride,
            staging: vec![0u8; ubo_size as usize],
            timer: FrameTimer::default(),
        })
    }
}

impl Scene for AnimometerScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Animometer
    }

    fn frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let time = self.timer.next_time();
        for p in &mut self.params {
            p.time = time;
        }

        pack_uniforms(&self.params, self.stride as usize, &mut self.staging);
        ctx.queue.write_buffer(&self.ubo, 0, &self.staging);

        let color = target.color_attachment(wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT));
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gpumark animometer pass"),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        for i in 0..self.params.len() {
            // Bounded by the u32 check in `new`.
            let offset = (i as u64 * self.stride) as u32;
            rpass.set_bind_group(0, &self.bind_group, &[offset]);
            rpass.draw(0..3, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<TriangleParams>(), 24);
    }

    #[test]
    fn random_params_stay_in_range() {
        let mut rng = seeded_rng(7);
        for _ in 0..1000 {
            let p = TriangleParams::random(&mut rng);
            assert!((0.2..0.4).contains(&p.scale));
            assert!((-0.9..0.9).contains(&p.offset_x));
            assert!((-0.9..0.9).contains(&p.offset_y));
            assert!((0.5..2.0).contains(&p.scalar));
            assert!((0.0..10.0).contains(&p.scalar_offset));
            assert_eq!(p.time, 0.0);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a: Vec<_> = {
            let mut rng = seeded_rng(42);
            (0..16).map(|_| TriangleParams::random(&mut rng)).collect()
        };
        let b: Vec<_> = {
            let mut rng = seeded_rng(42);
            (0..16).map(|_| TriangleParams::random(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn shader_time_is_sixty_frames_per_unit() {
        assert_eq!(shader_time(0), 0.0);
        assert_eq!(shader_time(60), 1.0);
        assert_eq!(shader_time(90), 1.5);
    }

    #[test]
    fn first_frame_is_already_one_tick_in() {
        let mut timer = FrameTimer::default();
        assert_eq!(timer.next_time(), 1.0 / 60.0);
        assert_eq!(timer.next_time(), 2.0 / 60.0);
        for _ in 0..58 {
            timer.next_time();
        }
        assert_eq!(timer.frames_drawn, 60);
    }

    #[test]
    fn pack_places_records_at_stride() {
        let params = [
            TriangleParams { scale: 1.0, time: 2.0, offset_x: 3.0, offset_y: 4.0, scalar: 5.0, scalar_offset: 6.0 },
            TriangleParams { scale: 7.0, time: 8.0, offset_x: 9.0, offset_y: 10.0, scalar: 11.0, scalar_offset: 12.0 },
        ];
        let stride = 256;
        let mut buf = vec![0xAAu8; stride * 2];
        pack_uniforms(&params, stride, &mut buf);

        assert_eq!(&buf[..24], bytemuck::bytes_of(&params[0]));
        assert_eq!(&buf[stride..stride + 24], bytemuck::bytes_of(&params[1]));

        let second: TriangleParams = bytemuck::pod_read_unaligned(&buf[stride..stride + 24]);
        assert_eq!(second.offset_y, 10.0);

        // Padding between records is not written.
        assert!(buf[24..stride].iter().all(|&b| b == 0xAA));
    }
}
