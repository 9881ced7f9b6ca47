use gpumark_engine::render::{RenderCtx, RenderTarget};

use crate::scene::{Scene, SceneKind};

/// Seconds for one full turn of the hue wheel.
pub const HUE_PERIOD_SECS: f32 = 5.0;

/// Clears the surface to a color that cycles through the hue wheel.
///
/// No pipeline: the render pass does nothing but clear.
pub struct ClearScene;

impl ClearScene {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClearScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for ClearScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Clear
    }

    fn frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let [r, g, b, a] = hue_cycle_color(ctx.time.elapsed_secs());
        let color = target.color_attachment(wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }));

        let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gpumark clear pass"),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}

/// Fully saturated, full-value color for the hue reached after `elapsed_secs`.
///
/// The hue wheel is split into six sextants (red → yellow → green → cyan →
/// blue → magenta) and wraps every [`HUE_PERIOD_SECS`]. Alpha is always 1.
pub fn hue_cycle_color(elapsed_secs: f32) -> [f64; 4] {
    let h = (elapsed_secs / HUE_PERIOD_SECS * 6.0).rem_euclid(6.0);
    let x = 1.0 - ((h % 2.0) - 1.0).abs();

    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        5 => (1.0, 0.0, x),
        _ => (0.0, 0.0, 0.0),
    };

    [r as f64, g as f64, b as f64, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 4], b: [f64; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn starts_red() {
        assert!(close(hue_cycle_color(0.0), [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn primary_and_secondary_hues() {
        let sextant = HUE_PERIOD_SECS / 6.0;
        assert!(close(hue_cycle_color(sextant), [1.0, 1.0, 0.0, 1.0])); // yellow
        assert!(close(hue_cycle_color(2.0 * sextant), [0.0, 1.0, 0.0, 1.0])); // green
        assert!(close(hue_cycle_color(4.0 * sextant), [0.0, 0.0, 1.0, 1.0])); // blue
    }

    #[test]
    fn midpoint_of_first_sextant() {
        let c = hue_cycle_color(HUE_PERIOD_SECS / 12.0);
        assert!(close(c, [1.0, 0.5, 0.0, 1.0]));
    }

    #[test]
    fn wraps_every_period() {
        assert!(close(hue_cycle_color(1.3), hue_cycle_color(1.3 + HUE_PERIOD_SECS)));
    }

    #[test]
    fn alpha_is_opaque() {
        for i in 0..50 {
            assert_eq!(hue_cycle_color(i as f32 * 0.37)[3], 1.0);
        }
    }
}
