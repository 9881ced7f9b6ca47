//! Small helpers shared by the scenes.

use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::dpi::PhysicalSize;

use gpumark_engine::render::RenderCtx;

// ── render state ──────────────────────────────────────────────────────────

pub(crate) fn triangle_list() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

/// Single color target in the surface format, no blending.
pub(crate) fn surface_target(format: wgpu::TextureFormat) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

pub(crate) const OPAQUE_BLACK: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

// ── depth ─────────────────────────────────────────────────────────────────

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Depth test with writes, nearer fragments win.
pub(crate) fn depth_less() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Depth texture that tracks the surface size.
pub(crate) struct DepthBuffer {
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

impl DepthBuffer {
    pub(crate) fn new(ctx: &RenderCtx<'_>) -> Self {
        Self {
            view: create_depth_view(ctx.device, ctx.size),
            size: ctx.size,
        }
    }

    /// Returns the view, recreating the texture if the surface was resized.
    pub(crate) fn view(&mut self, ctx: &RenderCtx<'_>) -> &wgpu::TextureView {
        if self.size != ctx.size {
            self.view = create_depth_view(ctx.device, ctx.size);
            self.size = ctx.size;
        }
        &self.view
    }
}

fn create_depth_view(device: &wgpu::Device, size: PhysicalSize<u32>) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("gpumark depth"),
        size: depth_extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Texture extent for a surface of `size`; never zero.
fn depth_extent(size: PhysicalSize<u32>) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width.max(1),
        height: size.height.max(1),
        depth_or_array_layers: 1,
    }
}

/// Depth attachment cleared to the far plane.
pub(crate) fn depth_attachment(view: &wgpu::TextureView) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(1.0),
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    }
}

// ── buffer layout ─────────────────────────────────────────────────────────

/// Byte distance between consecutive records addressed by dynamic offsets.
///
/// `size` rounded up to `align`, which must be a power of two (wgpu guarantees
/// this for `min_uniform_buffer_offset_alignment`).
pub fn uniform_stride(size: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    size.max(1).div_ceil(align) * align
}

// ── randomness ────────────────────────────────────────────────────────────

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(uniform_stride(24, 256), 256);
        assert_eq!(uniform_stride(256, 256), 256);
        assert_eq!(uniform_stride(257, 256), 512);
    }

    #[test]
    fn stride_of_aligned_size_is_unchanged() {
        assert_eq!(uniform_stride(64, 64), 64);
        assert_eq!(uniform_stride(32, 16), 32);
    }

    #[test]
    fn depth_extent_matches_surface() {
        let e = depth_extent(PhysicalSize::new(1280, 720));
        assert_eq!((e.width, e.height, e.depth_or_array_layers), (1280, 720, 1));
    }

    #[test]
    fn depth_extent_of_minimized_surface_is_one_pixel() {
        let e = depth_extent(PhysicalSize::new(0, 0));
        assert_eq!((e.width, e.height), (1, 1));
    }

    #[test]
    fn stride_never_zero() {
        assert_eq!(uniform_stride(0, 256), 256);
    }
}
