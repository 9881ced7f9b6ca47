//! GPUMark harness: drives one scene, samples FPS, reports a summary.

use std::time::{Duration, Instant};

use anyhow::Result;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use gpumark_engine::core::{App, AppControl, FrameCtx, FrameOutcome};
use gpumark_engine::time::{FpsCounter, FpsSummary};

use crate::scene::{Scene, SceneKind, SceneOptions};

/// What to run and when to stop.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub scene: SceneKind,
    pub options: SceneOptions,
    /// Stop once this many FPS samples were collected. `None` runs until closed.
    pub target_samples: Option<usize>,
    pub fps_max_frames: u32,
    pub fps_max_interval: Duration,
    /// Show the scene name and latest FPS in the window title.
    pub show_fps_in_title: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::Animometer,
            options: SceneOptions::default(),
            target_samples: None,
            fps_max_frames: FpsCounter::DEFAULT_MAX_FRAMES,
            fps_max_interval: FpsCounter::DEFAULT_MAX_INTERVAL,
            show_fps_in_title: true,
        }
    }
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub scene: SceneKind,
    /// Name of the adapter the scene ran on, if setup got that far.
    pub adapter: Option<String>,
    pub samples: Vec<f32>,
    pub summary: Option<FpsSummary>,
}

/// Turns frame outcomes into FPS samples.
///
/// Only presented frames count. The first presented frame (the one that
/// paid for scene setup) opens the measuring window instead of being
/// counted, and any skipped frame abandons the current window so time spent
/// minimized or recovering the surface never reaches a sample.
#[derive(Debug, Clone)]
struct FrameMeter {
    max_frames: u32,
    max_interval: Duration,
    fps: Option<FpsCounter>,
    samples: Vec<f32>,
    target: Option<usize>,
}

impl FrameMeter {
    fn new(config: &RunnerConfig) -> Self {
        Self {
            max_frames: config.fps_max_frames,
            max_interval: config.fps_max_interval,
            fps: None,
            samples: Vec::new(),
            target: config.target_samples,
        }
    }

    /// Records one frame finishing at `at`. Returns the FPS sample it closed, if any.
    fn record(&mut self, outcome: FrameOutcome, at: Instant) -> Option<f32> {
        match outcome {
            FrameOutcome::Presented => {}
            FrameOutcome::Skipped | FrameOutcome::Exit => {
                self.fps = None;
                return None;
            }
        }

        let Some(fps) = self.fps.as_mut() else {
            self.fps = Some(FpsCounter::starting_at(self.max_frames, self.max_interval, at));
            return None;
        };

        let sample = fps.frame(at)?;
        self.samples.push(sample);
        Some(sample)
    }

    fn is_complete(&self) -> bool {
        self.target.is_some_and(|n| self.samples.len() >= n)
    }
}

enum SceneSlot {
    Pending,
    Ready(Box<dyn Scene>),
    Failed(anyhow::Error),
}

/// [`App`] that runs a single [`Scene`] and measures it.
pub struct SceneRunner {
    config: RunnerConfig,
    scene: SceneSlot,
    meter: FrameMeter,
    adapter: Option<String>,
}

impl SceneRunner {
    pub fn new(config: RunnerConfig) -> Self {
        let meter = FrameMeter::new(&config);
        Self {
            config,
            scene: SceneSlot::Pending,
            meter,
            adapter: None,
        }
    }

    /// Consumes the runner. Fails if the scene could not be set up.
    pub fn into_report(self) -> Result<RunReport> {
        if let SceneSlot::Failed(err) = self.scene {
            return Err(err.context(format!("scene '{}' failed to set up", self.config.scene)));
        }

        let summary = FpsSummary::from_samples(&self.meter.samples);
        Ok(RunReport {
            scene: self.config.scene,
            adapter: self.adapter,
            samples: self.meter.samples,
            summary,
        })
    }

    fn ensure_scene(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        match self.scene {
            SceneSlot::Ready(_) => return AppControl::Continue,
            SceneSlot::Failed(_) => return AppControl::Exit,
            SceneSlot::Pending => {}
        }

        self.adapter = Some(ctx.gpu.adapter_info().name);
        match self.config.scene.create(&ctx.render_ctx(), &self.config.options) {
            Ok(scene) => {
                self.scene = SceneSlot::Ready(scene);
                AppControl::Continue
            }
            Err(err) => {
                log::error!("scene setup failed: {err:#}");
                self.scene = SceneSlot::Failed(err);
                AppControl::Exit
            }
        }
    }
}

impl App for SceneRunner {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.meter.is_complete() {
            return AppControl::Exit;
        }
        if self.ensure_scene(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }
        let SceneSlot::Ready(scene) = &mut self.scene else {
            return AppControl::Exit;
        };

        let outcome = ctx.render(|r, t| scene.frame(r, t));
        if outcome == FrameOutcome::Exit {
            return AppControl::Exit;
        }

        // Taken after present so the setup frame's cost stays outside the window.
        if let Some(sample) = self.meter.record(outcome, Instant::now()) {
            log::info!("FPS: {sample:.3}");
            if self.config.show_fps_in_title {
                ctx.window
                    .set_title(&format!("gpumark - {} - {sample:.1} fps", self.config.scene));
            }
        }

        if self.meter.is_complete() {
            log::info!("collected {} samples; stopping", self.meter.samples.len());
            return AppControl::Exit;
        }
        AppControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn meter(max_frames: u32, target: Option<usize>) -> FrameMeter {
        FrameMeter::new(&RunnerConfig {
            fps_max_frames: max_frames,
            fps_max_interval: ms(1000),
            target_samples: target,
            ..RunnerConfig::default()
        })
    }

    // ── FrameMeter ────────────────────────────────────────────────────────

    #[test]
    fn setup_frame_only_opens_the_window() {
        let t0 = Instant::now();
        let mut m = meter(1, None);
        // With a one-frame window, a counted setup frame would sample at once.
        assert_eq!(m.record(FrameOutcome::Presented, t0), None);
        assert!(m.samples.is_empty());
    }

    #[test]
    fn setup_time_stays_out_of_the_first_sample() {
        // Setup (800 ms) ends when the setup frame is presented at t0.
        let t0 = Instant::now();
        let mut m = meter(4, None);
        m.record(FrameOutcome::Presented, t0);

        let mut sample = None;
        for i in 1..=4u64 {
            sample = m.record(FrameOutcome::Presented, t0 + ms(16 * i));
        }
        let fps = sample.unwrap();
        assert!((fps - 62.5).abs() < 1e-2, "{fps}");
    }

    #[test]
    fn skipped_frames_are_not_counted() {
        let t0 = Instant::now();
        let mut m = meter(2, None);
        m.record(FrameOutcome::Presented, t0);
        for i in 1..100 {
            assert_eq!(m.record(FrameOutcome::Skipped, t0 + Duration::from_micros(i)), None);
        }
        // The skips closed the window; this frame reopens it.
        assert_eq!(m.record(FrameOutcome::Presented, t0 + ms(500)), None);
        assert_eq!(m.record(FrameOutcome::Presented, t0 + ms(510)), None);
        let fps = m.record(FrameOutcome::Presented, t0 + ms(520)).unwrap();
        assert!((fps - 100.0).abs() < 1e-2, "{fps}");
        assert_eq!(m.samples.len(), 1);
    }

    #[test]
    fn minimized_stretch_does_not_produce_samples() {
        let t0 = Instant::now();
        let mut m = meter(256, Some(1));
        m.record(FrameOutcome::Presented, t0);
        for i in 1..10_000u64 {
            m.record(FrameOutcome::Skipped, t0 + Duration::from_micros(i * 100));
        }
        assert!(m.samples.is_empty());
        assert!(!m.is_complete());
    }

    #[test]
    fn completes_at_target() {
        let t0 = Instant::now();
        let mut m = meter(1, Some(2));
        m.record(FrameOutcome::Presented, t0);
        m.record(FrameOutcome::Presented, t0 + ms(10));
        assert!(!m.is_complete());
        m.record(FrameOutcome::Presented, t0 + ms(20));
        assert!(m.is_complete());
    }

    #[test]
    fn zero_target_is_complete_before_any_frame() {
        assert!(meter(256, Some(0)).is_complete());
        assert!(!meter(256, None).is_complete());
    }

    // ── reports ───────────────────────────────────────────────────────────

    #[test]
    fn report_before_any_frame_is_empty() {
        let runner = SceneRunner::new(RunnerConfig {
            scene: SceneKind::Cube,
            ..RunnerConfig::default()
        });
        let report = runner.into_report().unwrap();
        assert_eq!(report.scene, SceneKind::Cube);
        assert!(report.adapter.is_none());
        assert!(report.samples.is_empty());
        assert!(report.summary.is_none());
    }

    #[test]
    fn report_summarizes_samples() {
        let mut runner = SceneRunner::new(RunnerConfig::default());
        runner.meter.samples.extend([50.0, 70.0]);
        let report = runner.into_report().unwrap();
        let summary = report.summary.unwrap();
        assert_eq!(summary.count, 2);
        assert!((summary.mean - 60.0).abs() < 1e-4);
    }

    #[test]
    fn setup_failure_surfaces_in_report() {
        let mut runner = SceneRunner::new(RunnerConfig::default());
        runner.scene = SceneSlot::Failed(anyhow::anyhow!("max_buffer_size too small"));
        let err = runner.into_report().unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("animometer"));
        assert!(msg.contains("max_buffer_size too small"));
    }

    #[test]
    fn default_fps_window_matches_counter() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.fps_max_frames, 256);
        assert_eq!(cfg.fps_max_interval, Duration::from_millis(1000));
    }
}
