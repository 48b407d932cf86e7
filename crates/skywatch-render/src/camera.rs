//! Fixed-vantage perspective camera.

use glam::{Mat4, Vec3};

use skywatch_core::constants::{CAMERA_EYE, CAMERA_FOV_DEG};

/// Perspective camera looking at the defended area from a raised
/// vantage point. Only the aspect ratio changes at runtime (resize).
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: CAMERA_EYE.into(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: CAMERA_FOV_DEG,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Combined view-projection matrix (wgpu 0..1 depth range).
    pub fn view_projection(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far);
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        proj * view
    }
}
