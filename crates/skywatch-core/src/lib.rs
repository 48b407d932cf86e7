//! Core types and definitions for the SKYWATCH intercept simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometric types, the mission status machine, mission parameters,
//! simulation events, snapshots, and tuning constants. It has no
//! dependency on the physics or rendering stacks.

pub mod constants;
pub mod events;
pub mod mission;
pub mod snapshot;
pub mod status;
pub mod types;
