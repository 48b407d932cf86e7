//! Dual rendering backends for SKYWATCH.
//!
//! A wgpu 3D scene (windowed or offscreen) and a CPU 2D canvas fallback
//! share the `SimSnapshot` state model. The capability probe in
//! [`backend`] picks exactly one of them at mount time; the choice holds
//! for the life of the session.

pub mod backend;
pub mod camera;
pub mod canvas2d;
pub mod context;
pub mod error;
pub mod primitives;
pub mod scene3d;

pub use backend::{Renderer, RendererKind};
pub use canvas2d::Canvas2d;
pub use error::RenderError;
pub use scene3d::Scene3d;
