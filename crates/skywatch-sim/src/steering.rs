//! Steering forces for the two drones.
//!
//! Both behaviors are pure seek: a constant-magnitude force along the
//! normalized line from the body to its goal. No obstacle avoidance,
//! no lead prediction.

use skywatch_core::constants::GRAVITY;
use skywatch_core::types::Vec3;

/// Force driving a body from `from` toward `toward` at the given gain.
/// A degenerate (zero-length) direction yields zero force for the tick.
pub fn seek_force(from: Vec3, toward: Vec3, gain: f32) -> Vec3 {
    (toward - from).normalize_or_zero().scale(gain)
}

/// Interceptor steering: chases the quarry's *current* position. The
/// interceptor wins by out-accelerating the enemy, not by predicting it.
pub fn pursuit_force(pursuer: Vec3, quarry_pos: Vec3, gain: f32) -> Vec3 {
    seek_force(pursuer, quarry_pos, gain)
}

/// Per-tick force exactly canceling world gravity for a body of the
/// given mass, so powered drones hold altitude without a thrust model.
pub fn gravity_compensation(mass: f32) -> Vec3 {
    Vec3::new(0.0, mass * GRAVITY, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_points_at_goal() {
        let force = seek_force(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 25.0);
        assert!((force.length() - 25.0).abs() < 1e-4);
        assert!(force.x < 0.0, "force should point back toward the origin");
        assert_eq!(force.y, 0.0);
        assert_eq!(force.z, 0.0);
    }

    #[test]
    fn test_seek_magnitude_independent_of_range() {
        let near = seek_force(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 25.0);
        let far = seek_force(Vec3::new(500.0, 0.0, 0.0), Vec3::ZERO, 25.0);
        assert!((near.length() - far.length()).abs() < 1e-4);
    }

    /// Coincident pursuer and quarry must not produce NaN forces.
    #[test]
    fn test_degenerate_direction_yields_zero_force() {
        let p = Vec3::new(3.0, 1.0, -2.0);
        let force = pursuit_force(p, p, 40.0);
        assert_eq!(force, Vec3::ZERO);
    }

    #[test]
    fn test_gravity_compensation_cancels_weight() {
        let lift = gravity_compensation(1.0);
        assert!((lift.y - GRAVITY).abs() < 1e-6);
        assert_eq!(lift.x, 0.0);
        assert_eq!(lift.z, 0.0);
    }
}
