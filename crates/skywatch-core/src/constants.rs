//! Simulation constants and tuning parameters.

use crate::types::Vec3;

/// Physics tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Upper bound on the wall-clock delta consumed in a single frame
/// (seconds). Frame hitches longer than this are dropped rather than
/// replayed, which caps the number of catch-up ticks per frame.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Velocity solver iterations per physics step.
pub const SOLVER_ITERATIONS: usize = 3;

/// Downward gravity magnitude (m/s²).
pub const GRAVITY: f32 = 9.82;

// --- Bodies ---

/// Mass of each drone (kg).
pub const DRONE_MASS: f32 = 1.0;

/// Linear damping coefficient applied to both drones.
pub const DRONE_LINEAR_DAMPING: f32 = 0.5;

/// Drone collider half-extents (x, y, z).
pub const DRONE_HALF_EXTENTS: [f32; 3] = [0.5, 0.2, 0.5];

/// The defended point. Fixed for the process lifetime.
pub const DEFENDED_POINT: Vec3 = Vec3::new(0.0, 1.0, 0.0);

// --- Steering ---

/// Steering force magnitude for the enemy drone seeking the defended
/// point (force units).
pub const ENEMY_SEEK_GAIN: f32 = 25.0;

/// Steering force magnitude for the interceptor chasing the enemy.
/// Deliberately higher than the enemy's gain so the interceptor closes.
pub const INTERCEPTOR_PURSUIT_GAIN: f32 = 40.0;

// --- End conditions ---

/// Enemy-to-interceptor distance below which the intercept succeeds.
pub const INTERCEPT_CUTOFF: f32 = 1.5;

/// Enemy-to-defended-point distance below which the mission fails.
pub const BREACH_CUTOFF: f32 = 2.0;

// --- Telemetry ---

/// Emit telemetry every Nth physics tick, not every tick.
pub const TELEMETRY_INTERVAL_TICKS: u64 = 5;

/// Closest-approach accumulator reset value at mission start.
pub const CLOSEST_APPROACH_SENTINEL: f32 = 9999.0;

// --- Particles ---

/// Number of particles spawned per burst.
pub const BURST_PARTICLE_COUNT: usize = 15;

/// Half-width of the uniform velocity range per axis (units/s).
pub const PARTICLE_SPREAD: f32 = 10.0;

/// Position advance per frame: velocity × this factor.
pub const PARTICLE_STEP_SCALE: f32 = 0.02;

/// Life decay per frame (life starts at 1.0).
pub const PARTICLE_LIFE_DECAY: f32 = 0.02;

// --- 3D view ---

/// Camera vantage point.
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 15.0, 25.0);

/// Vertical field of view (degrees).
pub const CAMERA_FOV_DEG: f32 = 75.0;

// --- 2D fallback view ---

/// Screen pixels per simulation unit in the 2D projection.
pub const VIEW_2D_PIXELS_PER_UNIT: f32 = 15.0;

/// Vertical offset (pixels) pushing the defended point below the
/// screen center, into the lower-middle of the view.
pub const VIEW_2D_Y_OFFSET: f32 = 100.0;

/// Grid line spacing (simulation units).
pub const VIEW_2D_GRID_SPACING: f32 = 5.0;

/// Grid half-extent (simulation units).
pub const VIEW_2D_GRID_EXTENT: f32 = 50.0;

/// Distance from the defended point beyond which destroyed drones are
/// no longer drawn in the 2D view.
pub const VIEW_2D_HIDE_RANGE: f32 = 5.0;
