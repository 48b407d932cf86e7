//! Renderer capability selection.
//!
//! One probe, made once per mount: try to bring up the 3D path; on any
//! failure, fall back to the 2D canvas. The choice is fixed for the
//! session — there is no mid-session switch, and no retry.

use std::sync::Arc;

use tracing::{info, warn};
use winit::window::Window;

use skywatch_core::snapshot::SimSnapshot;

use crate::canvas2d::Canvas2d;
use crate::error::RenderError;
use crate::scene3d::Scene3d;

/// Which of the two mutually exclusive paths is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    ThreeD,
    TwoD,
}

/// The active rendering backend. Exactly one variant exists per session.
pub enum Renderer {
    ThreeD(Scene3d),
    TwoD(Canvas2d),
}

impl Renderer {
    /// Probe for a windowed 3D context, falling back to the 2D canvas
    /// sized to the same viewport.
    pub fn windowed(window: Arc<Window>) -> Renderer {
        let size = window.inner_size();
        Self::select_with_probe(|| Scene3d::windowed(window.clone()), size.width, size.height)
    }

    /// Probe for an offscreen 3D context (no window), with the same
    /// fallback behavior.
    pub fn headless(width: u32, height: u32) -> Renderer {
        Self::select_with_probe(|| Scene3d::headless(width, height), width, height)
    }

    /// Run the capability probe. Injectable so tests can force the
    /// failure branch.
    pub fn select_with_probe(
        probe: impl FnOnce() -> Result<Scene3d, RenderError>,
        width: u32,
        height: u32,
    ) -> Renderer {
        match probe() {
            Ok(scene) => {
                info!("3D rendering path active");
                Renderer::ThreeD(scene)
            }
            Err(e) => {
                warn!("3D context unavailable ({e}); falling back to 2D canvas");
                Renderer::TwoD(Canvas2d::new(width, height))
            }
        }
    }

    pub fn kind(&self) -> RendererKind {
        match self {
            Renderer::ThreeD(_) => RendererKind::ThreeD,
            Renderer::TwoD(_) => RendererKind::TwoD,
        }
    }

    /// Copy simulation state into the active visual representation. The
    /// 2D canvas rasterizes its whole frame here.
    pub fn sync(&mut self, snapshot: &SimSnapshot) {
        match self {
            Renderer::ThreeD(scene) => scene.sync(snapshot),
            Renderer::TwoD(canvas) => canvas.sync(snapshot),
        }
    }

    /// Draw and present. A no-op for the 2D canvas, whose frame is
    /// finished at sync time and read back via [`Renderer::frame_rgba`].
    pub fn render(&mut self) -> Result<(), RenderError> {
        match self {
            Renderer::ThreeD(scene) => scene.render(),
            Renderer::TwoD(_) => Ok(()),
        }
    }

    /// Re-fit the active backend to new viewport dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        match self {
            Renderer::ThreeD(scene) => scene.resize(width, height),
            Renderer::TwoD(canvas) => canvas.resize(width, height),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        match self {
            Renderer::ThreeD(scene) => scene.size(),
            Renderer::TwoD(canvas) => (canvas.width(), canvas.height()),
        }
    }

    /// The finished CPU frame, available only under the 2D path.
    pub fn frame_rgba(&self) -> Option<(&[u8], u32, u32)> {
        match self {
            Renderer::ThreeD(_) => None,
            Renderer::TwoD(canvas) => Some((canvas.frame(), canvas.width(), canvas.height())),
        }
    }

    /// Release graphics resources. Failures are reported to the caller
    /// for logging but unmount proceeds regardless.
    pub fn teardown(self) -> Result<(), RenderError> {
        match self {
            Renderer::ThreeD(scene) => scene.teardown(),
            Renderer::TwoD(_) => Ok(()),
        }
    }
}
