//! GPUMark sample scenes and the FPS harness that runs them.
//!
//! Each scene builds its pipelines once and records one frame per call
//! into the encoder the engine hands it.

pub mod animometer;
pub mod boids;
pub mod clear;
mod common;
pub mod cube;
pub mod runner;
pub mod scene;
pub mod shading;
pub mod triangle;

pub use common::uniform_stride;
pub use runner::{RunReport, RunnerConfig, SceneRunner};
pub use scene::{Scene, SceneKind, SceneOptions};
