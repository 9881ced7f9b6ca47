use std::time::{Duration, Instant};

/// Windowed frame-rate meter.
///
/// A sample is emitted once either `max_frames` frames were counted or
/// `max_interval` has passed since the window opened, whichever comes first.
/// The sample is `frames / seconds` over that window; the window then restarts.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    max_frames: u32,
    max_interval: Duration,
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    pub const DEFAULT_MAX_FRAMES: u32 = 256;
    pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_millis(1000);

    pub fn new(max_frames: u32, max_interval: Duration) -> Self {
        Self::starting_at(max_frames, max_interval, Instant::now())
    }

    /// Creates a counter whose first window opens at `start`.
    pub fn starting_at(max_frames: u32, max_interval: Duration, start: Instant) -> Self {
        Self {
            max_frames: max_frames.max(1),
            max_interval,
            window_start: start,
            frames: 0,
        }
    }

    /// Restarts the current window without emitting a sample.
    pub fn restart(&mut self, now: Instant) {
        self.window_start = now;
        self.frames = 0;
    }

    /// Counts one presented frame. Returns an FPS sample when the window closes.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if self.frames < self.max_frames && elapsed < self.max_interval {
            return None;
        }

        let secs = elapsed.as_secs_f32();
        let frames = self.frames;
        self.restart(now);

        // Zero-length window: nothing meaningful to report.
        if secs <= 0.0 {
            return None;
        }
        Some(frames as f32 / secs)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FRAMES, Self::DEFAULT_MAX_INTERVAL)
    }
}

/// Aggregate over collected FPS samples.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FpsSummary {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl FpsSummary {
    /// Returns `None` for an empty sample set.
    pub fn from_samples(samples: &[f32]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let (min, max, sum) = samples.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
            |(lo, hi, sum), &s| (lo.min(s), hi.max(s), sum + s as f64),
        );

        Some(Self {
            count: samples.len(),
            min,
            max,
            mean: (sum / samples.len() as f64) as f32,
        })
    }
}

impl std::fmt::Display for FpsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} samples, mean {:.3} fps (min {:.3}, max {:.3})",
            self.count, self.mean, self.min, self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // ── FpsCounter ────────────────────────────────────────────────────────

    #[test]
    fn emits_after_frame_budget() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::starting_at(4, ms(1000), t0);
        assert_eq!(fps.frame(t0 + ms(100)), None);
        assert_eq!(fps.frame(t0 + ms(200)), None);
        assert_eq!(fps.frame(t0 + ms(300)), None);
        let sample = fps.frame(t0 + ms(400)).unwrap();
        assert!((sample - 10.0).abs() < 1e-3);
    }

    #[test]
    fn emits_after_interval_even_with_few_frames() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::starting_at(256, ms(1000), t0);
        assert_eq!(fps.frame(t0 + ms(500)), None);
        let sample = fps.frame(t0 + ms(1000)).unwrap();
        assert!((sample - 2.0).abs() < 1e-3);
    }

    #[test]
    fn window_restarts_after_sample() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::starting_at(2, ms(10_000), t0);
        assert_eq!(fps.frame(t0 + ms(50)), None);
        assert!(fps.frame(t0 + ms(100)).is_some());
        assert_eq!(fps.frame(t0 + ms(150)), None);
        let sample = fps.frame(t0 + ms(200)).unwrap();
        assert!((sample - 20.0).abs() < 1e-3);
    }

    #[test]
    fn zero_length_window_is_dropped() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::starting_at(1, ms(1000), t0);
        assert_eq!(fps.frame(t0), None);
    }

    // ── FpsSummary ────────────────────────────────────────────────────────

    #[test]
    fn summary_empty_is_none() {
        assert_eq!(FpsSummary::from_samples(&[]), None);
    }

    #[test]
    fn summary_aggregates() {
        let s = FpsSummary::from_samples(&[60.0, 30.0, 90.0]).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.min, 30.0);
        assert_eq!(s.max, 90.0);
        assert!((s.mean - 60.0).abs() < 1e-4);
    }
}
