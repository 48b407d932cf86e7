//! Renderer error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),
    #[error("No suitable graphics adapter found")]
    AdapterNotFound,
    #[error("Failed to create device: {0}")]
    DeviceCreation(String),
    #[error("Surface error: {0}")]
    SurfaceError(String),
    /// Reported on unmount when a resource refuses to release; never
    /// prevents the unmount itself from completing.
    #[error("Failed to release graphics resources: {0}")]
    Teardown(String),
}
