//! Simulation snapshot — the read-only projection handed to renderers
//! and the host each frame.

use serde::{Deserialize, Serialize};

use crate::constants::CLOSEST_APPROACH_SENTINEL;
use crate::events::SimEvent;
use crate::status::SimStatus;
use crate::types::{SimTime, Vec3};

/// Complete visible state after one frame. Renderers copy transforms
/// out of this; they never touch the physics world directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub status: SimStatus,
    /// Present only while a mission's body pair exists.
    pub enemy: Option<BodyView>,
    pub interceptor: Option<BodyView>,
    /// The defended point (fixed).
    pub target: Vec3,
    pub stats: StatsView,
    /// Live burst particles, most recent last.
    pub particles: Vec<ParticleView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<SimEvent>,
}

/// Kinematic state of one drone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodyView {
    pub position: Vec3,
    /// Orientation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    pub velocity: Vec3,
}

/// Derived mission statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatsView {
    /// Enemy-to-interceptor distance (units).
    pub distance: f32,
    /// Interceptor speed (units/s).
    pub interceptor_speed: f32,
    /// Minimum enemy-to-interceptor distance seen this mission.
    pub closest_approach: f32,
    /// Mission time in seconds.
    pub elapsed_secs: f32,
}

impl Default for StatsView {
    fn default() -> Self {
        Self {
            distance: 0.0,
            interceptor_speed: 0.0,
            closest_approach: CLOSEST_APPROACH_SENTINEL,
            elapsed_secs: 0.0,
        }
    }
}

/// One burst particle, as seen by a renderer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Vec3,
    /// Remaining life in [0, 1]. Renderers scale and fade by this.
    pub life: f32,
}
