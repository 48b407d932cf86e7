//! Pursuit engine — the core of the simulation.
//!
//! `PursuitEngine` owns the physics world and the two drones, applies
//! steering each tick, detects end conditions, and produces
//! `SimSnapshot`s. Completely headless (no window or GPU dependency),
//! enabling deterministic testing.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rapier3d::prelude::RigidBodyHandle;

use skywatch_core::constants::{
    BREACH_CUTOFF, CLOSEST_APPROACH_SENTINEL, DEFENDED_POINT, DRONE_MASS, DT, ENEMY_SEEK_GAIN,
    INTERCEPTOR_PURSUIT_GAIN, INTERCEPT_CUTOFF, MAX_FRAME_DELTA, TELEMETRY_INTERVAL_TICKS,
};
use skywatch_core::events::SimEvent;
use skywatch_core::mission::MissionParams;
use skywatch_core::snapshot::{BodyView, SimSnapshot, StatsView};
use skywatch_core::status::SimStatus;
use skywatch_core::types::{SimTime, Vec3};

use crate::particles::ParticleSystem;
use crate::spawn::{despawn_drone_pair, spawn_drone_pair, spawn_ground, DronePair};
use crate::steering;
use crate::world::{to_vec3, to_vector, PhysicsWorld};

/// Configuration for a new engine.
pub struct SimConfig {
    /// RNG seed for determinism (particle burst velocities). Same seed
    /// plus same frame cadence = same snapshot stream.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// The simulation engine. Owns the physics world and all mission state.
pub struct PursuitEngine {
    physics: PhysicsWorld,
    drones: Option<DronePair>,
    target: Vec3,
    status: SimStatus,
    time: SimTime,
    /// Unconsumed wall-clock time carried between frames.
    accumulator: f32,
    /// Ticks since mission start, for telemetry throttling.
    telemetry_counter: u64,
    closest_approach: f32,
    particles: ParticleSystem,
    rng: ChaCha8Rng,
    events: Vec<SimEvent>,
}

impl PursuitEngine {
    /// Create a new engine with an empty world (ground plane only).
    pub fn new(config: SimConfig) -> Self {
        let mut physics = PhysicsWorld::new();
        spawn_ground(&mut physics);

        Self {
            physics,
            drones: None,
            target: DEFENDED_POINT,
            status: SimStatus::Idle,
            time: SimTime::default(),
            accumulator: 0.0,
            telemetry_counter: 0,
            closest_approach: CLOSEST_APPROACH_SENTINEL,
            particles: ParticleSystem::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            events: Vec::new(),
        }
    }

    /// Begin a new mission: replace the drone pair at the supplied spawn
    /// positions with zeroed velocities, reset the mission accumulators,
    /// and go Active. Any particles from a previous mission keep playing.
    pub fn start_mission(&mut self, params: &MissionParams) {
        if let Some(pair) = self.drones.take() {
            despawn_drone_pair(&mut self.physics, pair);
        }
        self.drones = Some(spawn_drone_pair(
            &mut self.physics,
            params.enemy_pos,
            params.interceptor_pos,
        ));

        self.time = SimTime::default();
        self.accumulator = 0.0;
        self.telemetry_counter = 0;
        self.closest_approach = CLOSEST_APPROACH_SENTINEL;
        self.status = SimStatus::Active;
        self.events.push(SimEvent::MissionStarted {
            mission_name: params.mission_name.clone(),
        });
    }

    /// Advance by one rendered frame and return the snapshot.
    ///
    /// Physics ticks run at the fixed rate while Active, consuming at
    /// most `MAX_FRAME_DELTA` of wall time per frame. Particle animation
    /// runs every frame regardless of status so bursts finish playing
    /// after the mission ends.
    pub fn frame(&mut self, wall_dt: f32) -> SimSnapshot {
        let dt = wall_dt.clamp(0.0, MAX_FRAME_DELTA);

        if self.status == SimStatus::Active {
            self.accumulator += dt;
            while self.accumulator >= DT {
                self.accumulator -= DT;
                self.step();
                if self.status != SimStatus::Active {
                    break;
                }
            }
        }

        self.particles.update();
        self.build_snapshot()
    }

    /// Current mission status.
    pub fn status(&self) -> SimStatus {
        self.status
    }

    /// Current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Minimum enemy-to-interceptor distance seen this mission.
    pub fn closest_approach(&self) -> f32 {
        self.closest_approach
    }

    /// Number of live burst particles.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// One fixed physics tick: steering, integration, telemetry, and
    /// end-condition evaluation, in that order.
    fn step(&mut self) {
        let Some(pair) = self.drones else {
            return;
        };
        let (Some(enemy_pos), Some(interceptor_pos)) =
            (self.body_position(pair.enemy), self.body_position(pair.interceptor))
        else {
            return;
        };

        // Steering: enemy seeks the defended point, interceptor chases
        // the enemy's current position. Both also cancel gravity.
        let lift = steering::gravity_compensation(DRONE_MASS);
        let enemy_force = steering::seek_force(enemy_pos, self.target, ENEMY_SEEK_GAIN) + lift;
        let pursuit_force =
            steering::pursuit_force(interceptor_pos, enemy_pos, INTERCEPTOR_PURSUIT_GAIN) + lift;

        self.apply_force(pair.enemy, enemy_force);
        self.apply_force(pair.interceptor, pursuit_force);

        self.physics.step(DT);
        self.time.advance();

        let (Some(enemy_pos), Some(interceptor_pos)) =
            (self.body_position(pair.enemy), self.body_position(pair.interceptor))
        else {
            return;
        };
        let distance = enemy_pos.distance_to(&interceptor_pos);

        // Throttled telemetry: every Nth tick, starting with the first.
        if self.telemetry_counter % TELEMETRY_INTERVAL_TICKS == 0 {
            let interceptor_speed = self
                .physics
                .get_rigid_body(pair.interceptor)
                .map(|b| to_vec3(b.linvel()).length())
                .unwrap_or(0.0);
            self.events.push(SimEvent::Telemetry {
                distance,
                interceptor_speed,
            });
        }
        self.telemetry_counter += 1;

        if distance < self.closest_approach {
            self.closest_approach = distance;
        }

        // End conditions, intercept first. At most one transition fires
        // per mission; once terminal, stepping stops entirely.
        if distance < INTERCEPT_CUTOFF {
            self.end_mission(SimStatus::Success, enemy_pos);
        } else if enemy_pos.distance_to(&self.target) < BREACH_CUTOFF {
            self.end_mission(SimStatus::Failure, self.target);
        }
    }

    fn end_mission(&mut self, status: SimStatus, burst_at: Vec3) {
        self.particles.spawn_burst(burst_at, &mut self.rng);
        self.events.push(SimEvent::Burst { position: burst_at });
        self.status = status;
        self.events.push(SimEvent::MissionEnded { status });
    }

    /// Reset the body's force buffer and load this tick's force.
    fn apply_force(&mut self, handle: RigidBodyHandle, force: Vec3) {
        if let Some(body) = self.physics.get_rigid_body_mut(handle) {
            body.reset_forces(true);
            body.add_force(to_vector(force), true);
        }
    }

    fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.physics
            .get_rigid_body(handle)
            .map(|b| to_vec3(b.translation()))
    }

    fn body_view(&self, handle: RigidBodyHandle) -> Option<BodyView> {
        self.physics.get_rigid_body(handle).map(|body| {
            let q = body.rotation();
            BodyView {
                position: to_vec3(body.translation()),
                rotation: [q.i, q.j, q.k, q.w],
                velocity: to_vec3(body.linvel()),
            }
        })
    }

    fn build_snapshot(&mut self) -> SimSnapshot {
        let (enemy, interceptor) = match self.drones {
            Some(pair) => (self.body_view(pair.enemy), self.body_view(pair.interceptor)),
            None => (None, None),
        };

        let stats = match (&enemy, &interceptor) {
            (Some(e), Some(i)) => StatsView {
                distance: e.position.distance_to(&i.position),
                interceptor_speed: i.velocity.length(),
                closest_approach: self.closest_approach,
                elapsed_secs: self.time.elapsed_secs,
            },
            _ => StatsView::default(),
        };

        SimSnapshot {
            time: self.time,
            status: self.status,
            enemy,
            interceptor,
            target: self.target,
            stats,
            particles: self.particles.views(),
            events: std::mem::take(&mut self.events),
        }
    }
}
