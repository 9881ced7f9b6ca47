use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::FrameOutcome;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Updates the window title (used to show the scene name and FPS).
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Device, queue, surface format and timing for this frame.
    ///
    /// Usable outside [`render`](Self::render), e.g. for one-time setup.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.size(),
            self.time,
        )
    }

    /// Acquires the next surface texture, calls `draw` with a ready
    /// [`RenderCtx`] and [`RenderTarget`], then submits and presents.
    ///
    /// `draw` is responsible for clearing; no pass is recorded on its behalf.
    /// `draw` is only called for frames that end up [`FrameOutcome::Presented`].
    pub fn render<F>(&mut self, draw: F) -> FrameOutcome
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return FrameOutcome::Skipped;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("fatal surface error; exiting");
                }
                return outcome_for(action);
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            size,
            self.time,
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        FrameOutcome::Presented
    }
}

/// A frame that hit a surface error is never presented.
fn outcome_for(action: SurfaceErrorAction) -> FrameOutcome {
    match action {
        SurfaceErrorAction::Fatal => FrameOutcome::Exit,
        SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => FrameOutcome::Skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_errors_never_count_as_presented() {
        assert_eq!(outcome_for(SurfaceErrorAction::Reconfigured), FrameOutcome::Skipped);
        assert_eq!(outcome_for(SurfaceErrorAction::SkipFrame), FrameOutcome::Skipped);
        assert_eq!(outcome_for(SurfaceErrorAction::Fatal), FrameOutcome::Exit);
    }
}
