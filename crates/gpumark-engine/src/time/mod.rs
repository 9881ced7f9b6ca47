//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per window; call `tick()` once per presented frame
//! - one `FpsCounter` per measured run; call `frame()` after each present

mod fps;
mod frame_clock;

pub use fps::{FpsCounter, FpsSummary};
pub use frame_clock::{FrameClock, FrameTime};
