//! Events emitted by the simulation for the surrounding application.

use serde::{Deserialize, Serialize};

use crate::status::SimStatus;
use crate::types::Vec3;

/// One-way notifications drained into each snapshot. The host forwards
/// these to its telemetry and status sinks; the simulation never reads
/// them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A new mission has been seeded and is now active.
    MissionStarted { mission_name: String },
    /// Throttled telemetry sample (every few physics ticks, never when
    /// the mission is not active).
    Telemetry {
        /// Enemy-to-interceptor distance (units).
        distance: f32,
        /// Interceptor speed (units/s).
        interceptor_speed: f32,
    },
    /// A particle burst was spawned at an impact point.
    Burst { position: Vec3 },
    /// An end condition fired; `status` is terminal.
    MissionEnded { status: SimStatus },
}
