//! Renderer-facing handles.
//!
//! Scenes own their pipelines and buffers and record into the per-frame
//! encoder they are handed here. Nothing in this module caches GPU state.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
