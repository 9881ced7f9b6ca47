use gpumark_engine::render::{RenderCtx, RenderTarget};

use crate::common::{surface_target, triangle_list, OPAQUE_BLACK};
use crate::scene::{Scene, SceneKind};

/// The classic hello-triangle: three positions baked into the vertex shader,
/// no vertex buffers and no bindings.
pub struct TriangleScene {
    pipeline: wgpu::RenderPipeline,
}

impl TriangleScene {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gpumark triangle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/triangle.wgsl").into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gpumark triangle pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gpumark triangle pipeline"),
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

        Self { pipeline }
    }
}

impl Scene for TriangleScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Triangle
    }

    fn frame(&mut self, _ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let color = target.color_attachment(wgpu::LoadOp::Clear(OPAQUE_BLACK));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gpumark triangle pass"),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.draw(0..3, 0..1);
    }
}
