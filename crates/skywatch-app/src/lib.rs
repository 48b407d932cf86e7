//! SKYWATCH host application.
//!
//! Wires the simulation engine to whichever rendering backend the
//! capability probe selects, and stands in for the external mission
//! source and telemetry/status sinks.

pub mod app;
pub mod mission;

pub use skywatch_core as core;
