use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// What happened to the frame `FrameCtx::render` was asked to draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Drawn, submitted and presented.
    Presented,
    /// Nothing was presented: zero-size surface, or a recoverable surface error.
    Skipped,
    /// The surface is unusable; the app should exit.
    Exit,
}

/// Application contract implemented by whatever drives the window.
pub trait App {
    /// Called for window events before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
