//! Simulation engine for SKYWATCH.
//!
//! Owns the rapier physics world, runs pursuit steering and end-condition
//! checks at a fixed tick rate, and produces `SimSnapshot`s for whichever
//! renderer is active. Completely headless, enabling deterministic testing.

pub mod engine;
pub mod particles;
pub mod spawn;
pub mod steering;
pub mod world;

pub use engine::{PursuitEngine, SimConfig};
pub use skywatch_core as core;

#[cfg(test)]
mod tests;
