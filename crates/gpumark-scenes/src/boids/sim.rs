//! Host-side boids data and a CPU reference of the update kernel.
//!
//! The GPU runs `shaders/boids_update.wgsl`; [`simulate_step`] follows the
//! same rules on the CPU so their behavior can be pinned down in tests.

use bytemuck::{Pod, Zeroable};
use rand::Rng;

/// Maximum boid speed enforced after the three rules are applied.
pub const MAX_SPEED: f32 = 0.1;

/// One boid. Matches the WGSL `Particle` struct (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub pos: [f32; 2],
    pub vel: [f32; 2],
}

impl Particle {
    pub const fn new(pos: [f32; 2], vel: [f32; 2]) -> Self {
        Self { pos, vel }
    }
}

/// Simulation constants. Matches the WGSL `SimParams` struct (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SimParams {
    pub delta_t: f32,
    /// Cohesion radius.
    pub rule1_distance: f32,
    /// Separation radius.
    pub rule2_distance: f32,
    /// Alignment radius.
    pub rule3_distance: f32,
    pub rule1_scale: f32,
    pub rule2_scale: f32,
    pub rule3_scale: f32,
    pub particle_count: u32,
}

impl SimParams {
    pub fn with_count(particle_count: u32) -> Self {
        Self {
            delta_t: 0.04,
            rule1_distance: 0.1,
            rule2_distance: 0.025,
            rule3_distance: 0.025,
            rule1_scale: 0.02,
            rule2_scale: 0.05,
            rule3_scale: 0.005,
            particle_count,
        }
    }
}

/// Random flock: positions uniform in [-1, 1)², velocities in [-0.1, 0.1)².
pub fn initial_particles<R: Rng>(rng: &mut R, count: usize) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            Particle::new(
                [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)],
                [
                    rng.gen_range(-1.0..1.0) * 0.1,
                    rng.gen_range(-1.0..1.0) * 0.1,
                ],
            )
        })
        .collect()
}

/// Advances every boid in `src` by one step, writing the result to `dst`.
///
/// Only the first `params.particle_count` entries participate. `src` is read
/// only, so every boid sees the same previous state (the ping-pong contract).
pub fn simulate_step(params: &SimParams, src: &[Particle], dst: &mut [Particle]) {
    let n = (params.particle_count as usize).min(src.len()).min(dst.len());

    for (index, me) in src[..n].iter().enumerate() {
        let v_pos = me.pos;
        let mut v_vel = me.vel;

        let mut c_mass = [0.0f32; 2];
        let mut c_vel = [0.0f32; 2];
        let mut col_vel = [0.0f32; 2];
        let mut c_mass_count = 0u32;
        let mut c_vel_count = 0u32;

        for (i, other) in src[..n].iter().enumerate() {
            if i == index {
                continue;
            }
            let d = distance(other.pos, v_pos);

            if d < params.rule1_distance {
                c_mass = add(c_mass, other.pos);
                c_mass_count += 1;
            }
            if d < params.rule2_distance {
                col_vel = sub(col_vel, sub(other.pos, v_pos));
            }
            if d < params.rule3_distance {
                c_vel = add(c_vel, other.vel);
                c_vel_count += 1;
            }
        }

        if c_mass_count > 0 {
            c_mass = sub(scale(c_mass, 1.0 / c_mass_count as f32), v_pos);
        }
        if c_vel_count > 0 {
            c_vel = scale(c_vel, 1.0 / c_vel_count as f32);
        }

        v_vel = add(
            add(add(v_vel, scale(c_mass, params.rule1_scale)), scale(col_vel, params.rule2_scale)),
            scale(c_vel, params.rule3_scale),
        );

        let speed = length(v_vel);
        // WGSL normalize() of a zero vector is undefined; keep the boid still.
        if speed > 0.0 {
            v_vel = scale(v_vel, speed.clamp(0.0, MAX_SPEED) / speed);
        }

        let mut pos = add(v_pos, scale(v_vel, params.delta_t));
        for c in &mut pos {
            if *c < -1.0 {
                *c = 1.0;
            } else if *c > 1.0 {
                *c = -1.0;
            }
        }

        dst[index] = Particle::new(pos, v_vel);
    }
}

// ── vec2 helpers ──────────────────────────────────────────────────────────

#[inline]
fn add(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] + b[0], a[1] + b[1]]
}

#[inline]
fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
fn scale(a: [f32; 2], s: f32) -> [f32; 2] {
    [a[0] * s, a[1] * s]
}

#[inline]
fn length(a: [f32; 2]) -> f32 {
    a[0].hypot(a[1])
}

#[inline]
fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    length(sub(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::seeded_rng;

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-6 && (a[1] - b[1]).abs() < 1e-6
    }

    fn step(params: &SimParams, src: &[Particle]) -> Vec<Particle> {
        let mut dst = src.to_vec();
        simulate_step(params, src, &mut dst);
        dst
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn structs_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<Particle>(), 16);
        assert_eq!(std::mem::size_of::<SimParams>(), 32);
    }

    #[test]
    fn particle_count_is_last_word() {
        let p = SimParams::with_count(1500);
        let words: [u32; 8] = bytemuck::cast(p);
        assert_eq!(words[7], 1500);
        assert_eq!(f32::from_bits(words[0]), 0.04);
    }

    // ── initial state ─────────────────────────────────────────────────────

    #[test]
    fn initial_particles_in_range() {
        let mut rng = seeded_rng(1);
        let ps = initial_particles(&mut rng, 500);
        assert_eq!(ps.len(), 500);
        for p in ps {
            assert!(p.pos.iter().all(|c| (-1.0..1.0).contains(c)));
            assert!(p.vel.iter().all(|c| (-0.1..=0.1).contains(c)));
        }
    }

    // ── kernel ────────────────────────────────────────────────────────────

    #[test]
    fn isolated_boid_moves_in_a_straight_line() {
        let params = SimParams::with_count(2);
        let src = [
            Particle::new([-0.5, -0.5], [0.05, 0.0]),
            Particle::new([0.5, 0.5], [0.0, 0.05]),
        ];
        let dst = step(&params, &src);
        assert!(approx(dst[0].pos, [-0.5 + 0.05 * 0.04, -0.5]));
        assert!(approx(dst[0].vel, [0.05, 0.0]));
        assert!(approx(dst[1].pos, [0.5, 0.5 + 0.05 * 0.04]));
    }

    #[test]
    fn speed_is_clamped() {
        let params = SimParams::with_count(1);
        let dst = step(&params, &[Particle::new([0.0, 0.0], [0.3, 0.4])]);
        assert!((length(dst[0].vel) - MAX_SPEED).abs() < 1e-6);
        // Direction is preserved.
        assert!(approx(dst[0].vel, [0.06, 0.08]));
    }

    #[test]
    fn positions_wrap_at_the_edges() {
        let params = SimParams::with_count(2);
        let src = [
            Particle::new([0.999, 0.0], [0.1, 0.0]),
            Particle::new([0.0, -0.999], [0.0, -0.1]),
        ];
        let dst = step(&params, &src);
        assert_eq!(dst[0].pos[0], -1.0);
        assert_eq!(dst[1].pos[1], 1.0);
    }

    #[test]
    fn close_neighbours_push_apart() {
        let params = SimParams::with_count(2);
        let src = [
            Particle::new([0.0, 0.0], [0.0, 0.0001]),
            Particle::new([0.01, 0.0], [0.0, 0.0001]),
        ];
        let dst = step(&params, &src);
        // Separation dominates cohesion at this range: the left boid heads left.
        assert!(dst[0].vel[0] < 0.0);
        assert!(dst[1].vel[0] > 0.0);
    }

    #[test]
    fn only_counted_particles_are_updated() {
        let params = SimParams::with_count(1);
        let src = [
            Particle::new([0.0, 0.0], [0.01, 0.0]),
            Particle::new([0.2, 0.2], [0.01, 0.0]),
        ];
        let dst = step(&params, &src);
        assert_eq!(dst[1], src[1]);
    }

    #[test]
    fn reads_only_previous_state() {
        // Same flock, reversed order: each boid's result must not depend on
        // whether its neighbour was already updated.
        let params = SimParams::with_count(3);
        let src = [
            Particle::new([0.0, 0.0], [0.02, 0.01]),
            Particle::new([0.02, 0.0], [-0.01, 0.02]),
            Particle::new([0.0, 0.02], [0.01, -0.01]),
        ];
        let mut rev = src;
        rev.reverse();

        let a = step(&params, &src);
        let b = step(&params, &rev);
        assert!(approx(a[0].vel, b[2].vel));
        assert!(approx(a[1].pos, b[1].pos));
    }
}
