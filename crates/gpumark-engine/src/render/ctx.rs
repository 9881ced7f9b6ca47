use winit::dpi::PhysicalSize;

use crate::time::FrameTime;

/// Renderer-facing context (device/queue + surface format + drawable size + time).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub size: PhysicalSize<u32>, // physical px
    pub time: FrameTime,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        time: FrameTime,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            size,
            time,
        }
    }

    /// Width / height of the drawable; 1.0 while minimized.
    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.size.width == 0 || self.size.height == 0 {
            1.0
        } else {
            self.size.width as f32 / self.size.height as f32
        }
    }

    /// Limits of the logical device.
    #[inline]
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }
}

/// Target for drawing (encoder + color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }

    /// Color attachment over the frame's view with the given load op.
    #[inline]
    pub fn color_attachment(&self, load: wgpu::LoadOp<wgpu::Color>) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }
}
