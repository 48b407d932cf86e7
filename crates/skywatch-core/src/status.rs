//! Mission status state machine.

use serde::{Deserialize, Serialize};

/// Top-level simulation status. Transitions are one-directional within
/// a mission: `Idle` → `Active` → (`Success` | `Failure`). Only starting
/// a new mission returns the status to `Active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimStatus {
    /// No mission running; bodies may not exist yet.
    #[default]
    Idle,
    /// Mission underway, physics and AI stepping.
    Active,
    /// Interceptor reached the enemy drone.
    Success,
    /// Enemy drone breached the defended point.
    Failure,
}

impl SimStatus {
    /// True once an end condition has fired this mission.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimStatus::Success | SimStatus::Failure)
    }
}

impl std::fmt::Display for SimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SimStatus::Idle => "IDLE",
            SimStatus::Active => "ACTIVE",
            SimStatus::Success => "INTERCEPT SUCCESS",
            SimStatus::Failure => "ASSET LOST",
        };
        f.write_str(s)
    }
}
