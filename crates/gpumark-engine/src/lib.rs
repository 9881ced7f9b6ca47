//! GPUMark engine crate.
//!
//! Owns the platform + GPU runtime pieces the sample scenes run on:
//! window and event loop, wgpu device/surface, frame timing and logging.

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
