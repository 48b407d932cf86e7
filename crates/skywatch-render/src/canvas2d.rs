//! CPU 2D canvas fallback.
//!
//! Rasterizes the simulation into an owned RGBA8 buffer: fixed grid,
//! defended-point marker, one square per drone at its projected (x, z)
//! position, and fading circles for burst particles. The host decides
//! what to do with the finished frame (record it, hand it to a blitter).

use skywatch_core::constants::{
    VIEW_2D_GRID_EXTENT, VIEW_2D_GRID_SPACING, VIEW_2D_HIDE_RANGE, VIEW_2D_PIXELS_PER_UNIT,
    VIEW_2D_Y_OFFSET,
};
use skywatch_core::snapshot::SimSnapshot;
use skywatch_core::status::SimStatus;
use skywatch_core::types::Vec3;

const BACKGROUND: [u8; 3] = [5, 5, 5];
const GRID: [u8; 3] = [17, 34, 17];
const TARGET: [u8; 3] = [0, 255, 0];
const ENEMY: [u8; 3] = [255, 0, 0];
const INTERCEPTOR: [u8; 3] = [0, 255, 255];
const PARTICLE: [u8; 3] = [255, 170, 0];

/// The 2D drawing surface. Always constructible; this is the path the
/// capability probe falls back to.
pub struct Canvas2d {
    width: u32,
    height: u32,
    frame: Vec<u8>,
}

impl Canvas2d {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            frame: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The finished frame, RGBA8 row-major.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Re-fit the surface to new viewport dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.frame = vec![0; (self.width * self.height * 4) as usize];
    }

    /// Redraw the whole frame from the snapshot.
    pub fn sync(&mut self, snapshot: &SimSnapshot) {
        self.clear();
        self.draw_grid();

        let (cx, cy) = self.view_center();
        let scale = VIEW_2D_PIXELS_PER_UNIT;

        // Defended point marker.
        self.fill_circle(cx, cy, 0.5 * scale, TARGET, 1.0);

        for (body, color) in [
            (&snapshot.enemy, ENEMY),
            (&snapshot.interceptor, INTERCEPTOR),
        ] {
            let Some(view) = body else { continue };
            if hidden_after_intercept(snapshot.status, view.position, snapshot.target) {
                continue;
            }
            self.fill_rect(
                cx + (view.position.x - 0.5) * scale,
                cy + (view.position.z - 0.5) * scale,
                scale,
                scale,
                color,
            );
        }

        for p in &snapshot.particles {
            let radius = (p.life * scale * 0.5).max(1.0);
            self.fill_circle(
                cx + p.position.x * scale,
                cy + p.position.z * scale,
                radius,
                PARTICLE,
                p.life.clamp(0.0, 1.0),
            );
        }
    }

    /// Screen-space center: the defended point sits in the lower-middle
    /// of the view.
    fn view_center(&self) -> (f32, f32) {
        (
            self.width as f32 / 2.0,
            self.height as f32 / 2.0 + VIEW_2D_Y_OFFSET,
        )
    }

    fn clear(&mut self) {
        for px in self.frame.chunks_exact_mut(4) {
            px[0] = BACKGROUND[0];
            px[1] = BACKGROUND[1];
            px[2] = BACKGROUND[2];
            px[3] = 255;
        }
    }

    fn draw_grid(&mut self) {
        let (cx, cy) = self.view_center();
        let scale = VIEW_2D_PIXELS_PER_UNIT;

        let mut offset = -VIEW_2D_GRID_EXTENT;
        while offset <= VIEW_2D_GRID_EXTENT {
            let sx = (cx + offset * scale).round() as i64;
            if sx >= 0 && sx < self.width as i64 {
                for y in 0..self.height {
                    self.blend_pixel(sx, y as i64, GRID, 1.0);
                }
            }
            let sy = (cy + offset * scale).round() as i64;
            if sy >= 0 && sy < self.height as i64 {
                for x in 0..self.width {
                    self.blend_pixel(x as i64, sy, GRID, 1.0);
                }
            }
            offset += VIEW_2D_GRID_SPACING;
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 3]) {
        let x0 = x.round() as i64;
        let y0 = y.round() as i64;
        let x1 = (x + w).round() as i64;
        let y1 = (y + h).round() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, 1.0);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 3], alpha: f32) {
        let r = radius.max(0.0);
        let x0 = (cx - r).floor() as i64;
        let x1 = (cx + r).ceil() as i64;
        let y0 = (cy - r).floor() as i64;
        let y1 = (cy + r).ceil() as i64;
        let r_sq = r * r;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 - cx;
                let dy = py as f32 - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        let a = alpha.clamp(0.0, 1.0);
        for c in 0..3 {
            let dst = self.frame[idx + c] as f32;
            self.frame[idx + c] = (dst * (1.0 - a) + color[c] as f32 * a).round() as u8;
        }
        self.frame[idx + 3] = 255;
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 4) as usize;
        [self.frame[idx], self.frame[idx + 1], self.frame[idx + 2]]
    }
}

/// Drones disappear from the 2D view once the intercept succeeded and
/// they have drifted away from the defended point.
fn hidden_after_intercept(status: SimStatus, position: Vec3, target: Vec3) -> bool {
    status == SimStatus::Success && position.distance_to(&target) > VIEW_2D_HIDE_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use skywatch_core::constants::DEFENDED_POINT;
    use skywatch_core::snapshot::{BodyView, ParticleView};

    fn body_at(position: Vec3) -> Option<BodyView> {
        Some(BodyView {
            position,
            rotation: [0.0, 0.0, 0.0, 1.0],
            velocity: Vec3::ZERO,
        })
    }

    fn base_snapshot() -> SimSnapshot {
        SimSnapshot {
            status: SimStatus::Active,
            target: DEFENDED_POINT,
            ..Default::default()
        }
    }

    fn count_pixels(canvas: &Canvas2d, color: [u8; 3]) -> usize {
        let mut n = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) == color {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_surface_sized_to_viewport() {
        let canvas = Canvas2d::new(800, 600);
        assert_eq!(canvas.width(), 800);
        assert_eq!(canvas.height(), 600);
        assert_eq!(canvas.frame().len(), 800 * 600 * 4);
    }

    /// Scenario: viewport change re-fits the surface without touching
    /// simulation state.
    #[test]
    fn test_resize_refits_surface() {
        let mut canvas = Canvas2d::new(800, 600);
        canvas.resize(1920, 1080);
        assert_eq!((canvas.width(), canvas.height()), (1920, 1080));
        assert_eq!(canvas.frame().len(), 1920 * 1080 * 4);
        canvas.sync(&base_snapshot());
    }

    #[test]
    fn test_sync_draws_grid_and_marker() {
        let mut canvas = Canvas2d::new(640, 480);
        canvas.sync(&base_snapshot());

        // Center column carries a grid line from the top of the frame.
        assert_eq!(canvas.pixel(320, 0), GRID);
        // Defended point marker at the offset view center.
        let cy = (480 / 2) as u32 + VIEW_2D_Y_OFFSET as u32;
        assert_eq!(canvas.pixel(320, cy), TARGET);
        // Background elsewhere.
        assert_eq!(canvas.pixel(5, 5), BACKGROUND);
    }

    #[test]
    fn test_sync_draws_drone_squares() {
        let mut canvas = Canvas2d::new(640, 480);
        let mut snapshot = base_snapshot();
        snapshot.enemy = body_at(Vec3::new(-8.0, 5.0, -8.0));
        snapshot.interceptor = body_at(Vec3::new(8.0, 5.0, -8.0));
        canvas.sync(&snapshot);

        assert!(count_pixels(&canvas, ENEMY) > 0, "enemy square missing");
        assert!(
            count_pixels(&canvas, INTERCEPTOR) > 0,
            "interceptor square missing"
        );
    }

    /// After a successful intercept, drones away from the defended point
    /// are no longer drawn; the wreck near the point still is.
    #[test]
    fn test_success_visibility_heuristic() {
        let mut canvas = Canvas2d::new(640, 480);
        let mut snapshot = base_snapshot();
        snapshot.status = SimStatus::Success;
        snapshot.enemy = body_at(Vec3::new(-10.0, 5.0, -10.0));
        snapshot.interceptor = body_at(Vec3::new(0.5, 1.0, 0.5));
        canvas.sync(&snapshot);

        assert_eq!(count_pixels(&canvas, ENEMY), 0, "distant wreck drawn");
        assert!(
            count_pixels(&canvas, INTERCEPTOR) > 0,
            "interceptor near the point should remain visible"
        );
    }

    #[test]
    fn test_particles_fade_with_life() {
        let mut canvas = Canvas2d::new(640, 480);
        let mut snapshot = base_snapshot();
        snapshot.particles = vec![ParticleView {
            position: Vec3::new(-5.0, 1.0, -5.0),
            life: 1.0,
        }];
        canvas.sync(&snapshot);
        assert!(count_pixels(&canvas, PARTICLE) > 0, "full-life particle");

        // A nearly dead particle blends toward the background: no pixel
        // carries the pure particle color.
        snapshot.particles[0].life = 0.05;
        canvas.sync(&snapshot);
        assert_eq!(count_pixels(&canvas, PARTICLE), 0);
    }
}
