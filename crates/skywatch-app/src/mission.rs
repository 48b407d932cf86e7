//! Local mission source.
//!
//! Stands in for the external mission-generation service: produces
//! `MissionParams` with the enemy spawned 20–40 units out on a random
//! bearing and the interceptor adjacent to the defended point. The
//! networked generator, after-action debrief, and speech playback stay
//! out of this binary entirely.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use skywatch_core::mission::MissionParams;
use skywatch_core::types::Vec3;

const NAME_FIRST: &[&str] = &[
    "IRON", "NIGHT", "SILENT", "CRIMSON", "AMBER", "STATIC", "HOLLOW", "VIGIL",
];
const NAME_SECOND: &[&str] = &[
    "HARRIER", "VEIL", "LANTERN", "PALISADE", "SABRE", "WARDEN", "CURTAIN", "ARROW",
];

/// Enemy spawn ring, horizontal distance from the defended point.
const ENEMY_RANGE_MIN: f32 = 20.0;
const ENEMY_RANGE_MAX: f32 = 40.0;

/// Seeded generator of mission parameters.
pub struct MissionSource {
    rng: ChaCha8Rng,
}

impl MissionSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate the next mission.
    pub fn next_mission(&mut self) -> MissionParams {
        let first = NAME_FIRST[self.rng.gen_range(0..NAME_FIRST.len())];
        let second = NAME_SECOND[self.rng.gen_range(0..NAME_SECOND.len())];
        let mission_name = format!("{first} {second}");

        let bearing: f32 = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let range: f32 = self.rng.gen_range(ENEMY_RANGE_MIN..ENEMY_RANGE_MAX);
        let altitude: f32 = self.rng.gen_range(8.0..20.0);
        let enemy_pos = Vec3::new(range * bearing.sin(), altitude, range * bearing.cos());

        let interceptor_pos = Vec3::new(
            self.rng.gen_range(-5.0..5.0),
            self.rng.gen_range(0.5..2.0),
            self.rng.gen_range(-5.0..5.0),
        );

        let briefing = format!(
            "Hostile drone inbound, {range:.0} units out. Launch and intercept before it reaches the position."
        );

        MissionParams {
            mission_name,
            enemy_pos,
            interceptor_pos,
            briefing,
        }
    }
}
