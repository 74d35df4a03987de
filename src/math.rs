//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` inputs, making them straightforward to unit-test.

use bevy::prelude::{Quat, Vec3};

/// Base bloom intensity of a closed bud.
pub const BLOOM_INTENSITY_BASE: f32 = 0.1;
/// Extra intensity gained over a full bloom.
pub const BLOOM_INTENSITY_RANGE: f32 = 0.8;
/// Hard ceiling for the derived bloom intensity.
pub const BLOOM_INTENSITY_CEILING: f32 = 1.2;
/// Depth-of-field focus distance of a closed bud.
pub const DOF_FOCUS_BASE: f32 = 4.0;
/// How far the focus distance pulls in over a full bloom.
pub const DOF_FOCUS_RANGE: f32 = 1.5;

/// Clamps a progress value into `[0, 1]`, mapping NaN to `0`.
///
/// # Examples
/// ```
/// # use bloom_gift::math::clamp_unit;
/// assert_eq!(clamp_unit(-0.5), 0.0);
/// assert_eq!(clamp_unit(1.7), 1.0);
/// assert_eq!(clamp_unit(f32::NAN), 0.0);
/// ```
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Visual intensity derived from bloom progress: `min(0.1 + p * 0.8, 1.2)`.
pub fn bloom_intensity(progress: f32) -> f32 {
    (BLOOM_INTENSITY_BASE + progress * BLOOM_INTENSITY_RANGE).min(BLOOM_INTENSITY_CEILING)
}

/// Depth-of-field focus distance derived from bloom progress: `4.0 - p * 1.5`.
pub fn dof_focus(progress: f32) -> f32 {
    DOF_FOCUS_BASE - progress * DOF_FOCUS_RANGE
}

/// Quadratic ease-in-out: slow start, slow finish, symmetric about `t = 0.5`.
///
/// Used for the bloom tween so petals open gently at both ends.
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Critically damped approach of `current` towards `target`.
///
/// `velocity` carries state between calls. `smooth_time` is roughly the time
/// it takes to cover most of the distance. Never overshoots the target: when
/// a step would pass it, the result snaps onto the target and the velocity is
/// zeroed.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }
    let omega = 2.0 / smooth_time.max(1e-4);
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec3::ZERO;
        return target;
    }
    output
}

/// Clamps a pitch angle so the camera cannot flip past vertical.
///
/// `current` is the existing pitch in radians.
/// `delta` is the desired change. The result is clamped to
/// `(-PI/2 + margin, PI/2 - margin)` and the *effective* delta is returned
/// (i.e. how much to actually rotate).
pub fn clamp_pitch(current: f32, delta: f32, margin: f32) -> f32 {
    let limit = std::f32::consts::FRAC_PI_2 - margin;
    let clamped = (current + delta).clamp(-limit, limit);
    clamped - current
}

/// Rotates `position` around `pivot` by `yaw` (about world Y) and `pitch`
/// (about the camera's right axis), then rescales the arm to `distance`.
///
/// Pitch is clamped with [`clamp_pitch`] so the arm never passes the poles.
pub fn orbit(
    position: Vec3,
    pivot: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    pitch_margin: f32,
) -> Vec3 {
    let arm = position - pivot;
    let Some(dir) = arm.try_normalize() else {
        return position;
    };
    let current_pitch = dir.y.clamp(-1.0, 1.0).asin();
    let pitch = clamp_pitch(current_pitch, pitch, pitch_margin);

    let yawed = Quat::from_rotation_y(yaw) * dir;
    let right = Vec3::Y.cross(yawed).normalize_or_zero();
    let rotated = if right == Vec3::ZERO {
        yawed
    } else {
        Quat::from_axis_angle(right, -pitch) * yawed
    };
    pivot + rotated.normalize_or_zero() * distance
}

/// `count` points spread evenly over a sphere of `radius` (golden-angle
/// spiral).
pub fn fibonacci_sphere(count: usize, radius: f32) -> Vec<Vec3> {
    let golden = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f32;
            Vec3::new(theta.cos() * ring, y, theta.sin() * ring) * radius
        })
        .collect()
}

/// Intensity factor of the rose glow: grows with bloom and breathes over
/// time when `pulse` is on.
pub fn rose_glow(bloom: f32, elapsed: f32, pulse: bool) -> f32 {
    let base = 0.5 + clamp_unit(bloom) * 3.0;
    if pulse {
        base * (1.0 + (elapsed * 3.0).sin() * 0.15)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── bloom-derived parameters ────────────────────────────────────

    #[test]
    fn intensity_follows_linear_ramp() {
        assert!((bloom_intensity(0.0) - 0.1).abs() < 1e-6);
        assert!((bloom_intensity(0.5) - 0.5).abs() < 1e-6);
        assert!((bloom_intensity(1.0) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn intensity_saturates_at_ceiling() {
        assert_eq!(bloom_intensity(10.0), BLOOM_INTENSITY_CEILING);
    }

    #[test]
    fn focus_pulls_in_as_bloom_opens() {
        assert_eq!(dof_focus(0.0), 4.0);
        assert_eq!(dof_focus(1.0), 2.5);
        assert!(dof_focus(0.3) > dof_focus(0.6));
    }

    // ── easing ──────────────────────────────────────────────────────

    #[test]
    fn ease_endpoints() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
    }

    #[test]
    fn in_out_is_symmetric_around_half() {
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-6);
        let a = ease_in_out_quad(0.2);
        let b = ease_in_out_quad(0.8);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ease_is_monotonically_increasing() {
        let steps: Vec<f32> = (0..=100)
            .map(|i| ease_in_out_quad(i as f32 / 100.0))
            .collect();
        for w in steps.windows(2) {
            assert!(w[1] >= w[0], "ease_in_out_quad must be non-decreasing");
        }
    }

    // ── smooth_damp ─────────────────────────────────────────────────

    #[test]
    fn damp_converges_without_overshoot() {
        let target = Vec3::new(4.0, 1.0, -2.0);
        let mut pos = Vec3::ZERO;
        let mut vel = Vec3::ZERO;
        let start_gap = (target - pos).length();
        let mut last_gap = start_gap;
        for _ in 0..600 {
            pos = smooth_damp(pos, target, &mut vel, 1.2, 1.0 / 60.0);
            let gap = (target - pos).length();
            assert!(gap <= last_gap + 1e-5, "gap must not grow");
            last_gap = gap;
        }
        assert!(last_gap < 0.01, "should be near target, gap {last_gap}");
    }

    #[test]
    fn damp_zero_dt_is_identity() {
        let mut vel = Vec3::ONE;
        let p = smooth_damp(Vec3::X, Vec3::Y, &mut vel, 1.0, 0.0);
        assert_eq!(p, Vec3::X);
    }

    // ── clamp_pitch ─────────────────────────────────────────────────

    #[test]
    fn small_delta_passes_through() {
        let delta = clamp_pitch(0.0, 0.1, 0.05);
        assert!((delta - 0.1).abs() < 1e-6);
    }

    #[test]
    fn clamps_at_upper_limit() {
        let limit = std::f32::consts::FRAC_PI_2 - 0.05;
        let delta = clamp_pitch(limit - 0.01, 0.1, 0.05);
        assert!(
            (delta - 0.01).abs() < 1e-4,
            "should clamp to remaining room"
        );
    }

    // ── orbit ───────────────────────────────────────────────────────

    #[test]
    fn orbit_preserves_requested_distance() {
        let p = orbit(Vec3::new(0.0, 1.0, 16.0), Vec3::ZERO, 0.4, 0.2, 10.0, 0.05);
        assert!((p.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn pure_yaw_keeps_height_ratio() {
        let start = Vec3::new(0.0, 0.0, 5.0);
        let p = orbit(start, Vec3::ZERO, std::f32::consts::FRAC_PI_2, 0.0, 5.0, 0.05);
        assert!(p.y.abs() < 1e-4);
        assert!((p.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_arm_is_left_alone() {
        let p = orbit(Vec3::ONE, Vec3::ONE, 1.0, 1.0, 3.0, 0.05);
        assert_eq!(p, Vec3::ONE);
    }

    // ── stage helpers ───────────────────────────────────────────────

    #[test]
    fn fibonacci_points_sit_on_the_shell() {
        let points = fibonacci_sphere(200, 40.0);
        assert_eq!(points.len(), 200);
        for p in &points {
            assert!((p.length() - 40.0).abs() < 1e-3);
        }
        let above = points.iter().filter(|p| p.y > 0.0).count();
        assert_eq!(above, 100, "spiral is balanced between hemispheres");
    }

    #[test]
    fn glow_grows_with_bloom_and_pulses() {
        assert!((rose_glow(0.0, 0.0, false) - 0.5).abs() < 1e-6);
        assert!((rose_glow(1.0, 0.0, false) - 3.5).abs() < 1e-6);
        let quarter = std::f32::consts::FRAC_PI_2 / 3.0;
        assert!((rose_glow(1.0, quarter, true) - 3.5 * 1.15).abs() < 1e-4);
        assert!((rose_glow(2.0, 0.0, false) - 3.5).abs() < 1e-6, "bloom is clamped");
    }
}
