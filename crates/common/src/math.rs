//! Vector and smoothing helpers shared by the simulation components.

use glam::Vec3;

/// Projections shorter than this (squared) are treated as zero-length.
const MIN_LENGTH_SQUARED: f32 = 1e-12;

/// Project `v` onto the horizontal plane and normalise it.
///
/// Returns `None` when the projection is zero-length or not finite, so callers
/// can fall back to a previous direction instead of propagating NaN.
pub fn flatten(v: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(v.x, 0.0, v.z);
    if flat.length_squared() < MIN_LENGTH_SQUARED {
        return None;
    }
    flat.try_normalize()
}

/// Fraction of a quantity kept after `dt` seconds, given the fraction kept per
/// tick at `reference_rate` ticks per second.
///
/// `retention_factor(0.85, 1.0 / 60.0, 60.0)` is `0.85`.
pub fn retention_factor(per_tick: f32, dt: f32, reference_rate: f32) -> f32 {
    per_tick.powf(dt * reference_rate)
}

/// Interpolation weight toward a target after `dt` seconds, given the weight
/// applied per tick at `reference_rate` ticks per second.
pub fn lerp_factor(per_tick: f32, dt: f32, reference_rate: f32) -> f32 {
    1.0 - retention_factor(1.0 - per_tick, dt, reference_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_drops_vertical_component() {
        let f = flatten(Vec3::new(0.0, 0.8, -0.6)).unwrap();
        assert!((f - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn flatten_rejects_degenerate_vectors() {
        assert!(flatten(Vec3::ZERO).is_none());
        assert!(flatten(Vec3::Y).is_none());
        assert!(flatten(Vec3::new(f32::NAN, 0.0, 1.0)).is_none());
        // Straight down from a yaw/pitch rig leaves float noise on x.
        assert!(flatten(Vec3::new(-4.4e-8, -1.0, 0.0)).is_none());
    }

    #[test]
    fn factors_match_per_tick_values_at_reference_rate() {
        let dt = 1.0 / 60.0;
        assert!((retention_factor(0.85, dt, 60.0) - 0.85).abs() < 1e-5);
        assert!((lerp_factor(0.15, dt, 60.0) - 0.15).abs() < 1e-5);
    }

    #[test]
    fn two_half_steps_equal_one_full_step() {
        let half = retention_factor(0.85, 1.0 / 120.0, 60.0);
        let full = retention_factor(0.85, 1.0 / 60.0, 60.0);
        assert!((half * half - full).abs() < 1e-5);
    }

    #[test]
    fn zero_dt_is_identity() {
        assert_eq!(retention_factor(0.85, 0.0, 60.0), 1.0);
        assert_eq!(lerp_factor(0.15, 0.0, 60.0), 0.0);
    }
}
