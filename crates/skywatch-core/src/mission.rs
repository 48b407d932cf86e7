//! Mission parameters supplied by an external mission source.

use serde::{Deserialize, Serialize};

use crate::types::Vec3;

/// Initial conditions for one mission. The simulation reads only the
/// two spawn positions; the name and briefing pass through to the
/// presentation layer untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionParams {
    pub mission_name: String,
    pub enemy_pos: Vec3,
    pub interceptor_pos: Vec3,
    pub briefing: String,
}
