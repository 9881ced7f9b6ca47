//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and the code driving a sample. It keeps winit/wgpu plumbing out of
//! scene code and provides a consistent per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl, FrameOutcome};
pub use ctx::{FrameCtx, WindowCtx};
