//! Burst particle effect at an impact point.
//!
//! Particles animate per rendered frame (not per physics tick) so a
//! burst keeps playing after the mission ends.

use rand::Rng;

use skywatch_core::constants::{
    BURST_PARTICLE_COUNT, PARTICLE_LIFE_DECAY, PARTICLE_SPREAD, PARTICLE_STEP_SCALE,
};
use skywatch_core::snapshot::ParticleView;
use skywatch_core::types::Vec3;

/// One burst particle.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining life in [0, 1]; the particle is removed at <= 0.
    pub life: f32,
}

/// All live particles, across bursts. Removal order is irrelevant, but
/// update-and-remove must visit every element exactly once.
#[derive(Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a fixed-count burst at the impact point with velocities
    /// uniform in ±spread/2 per axis.
    pub fn spawn_burst(&mut self, at: Vec3, rng: &mut impl Rng) {
        let half = PARTICLE_SPREAD * 0.5;
        for _ in 0..BURST_PARTICLE_COUNT {
            self.particles.push(Particle {
                position: at,
                velocity: Vec3::new(
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                ),
                life: 1.0,
            });
        }
    }

    /// Advance every particle one frame and drop the expired ones.
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| {
            p.position = p.position + p.velocity.scale(PARTICLE_STEP_SCALE);
            p.life -= PARTICLE_LIFE_DECAY;
            p.life > 0.0
        });
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Snapshot views for the renderer.
    pub fn views(&self) -> Vec<ParticleView> {
        self.particles
            .iter()
            .map(|p| ParticleView {
                position: p.position,
                life: p.life,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_burst_spawns_exact_count() {
        let mut system = ParticleSystem::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        system.spawn_burst(Vec3::new(1.0, 2.0, 3.0), &mut rng);
        assert_eq!(system.len(), BURST_PARTICLE_COUNT);
    }

    #[test]
    fn test_particles_decay_to_zero() {
        let mut system = ParticleSystem::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        system.spawn_burst(Vec3::ZERO, &mut rng);

        // Life 1.0 at 0.02 decay per frame: all gone by frame 52
        // (accumulated float error can stretch the nominal 50 by one).
        for _ in 0..49 {
            system.update();
        }
        assert!(!system.is_empty(), "particles should survive 49 frames");
        for _ in 0..3 {
            system.update();
        }
        assert!(system.is_empty(), "all particles expire together");
    }

    /// Overlapping bursts decay independently; removal in the middle of
    /// the collection must not skip the swapped-in element.
    #[test]
    fn test_overlapping_bursts_remove_independently() {
        let mut system = ParticleSystem::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        system.spawn_burst(Vec3::ZERO, &mut rng);
        for _ in 0..26 {
            system.update();
        }
        system.spawn_burst(Vec3::new(5.0, 0.0, 0.0), &mut rng);
        assert_eq!(system.len(), BURST_PARTICLE_COUNT * 2);

        // 26 more frames finish off the first burst only.
        for _ in 0..26 {
            system.update();
        }
        assert_eq!(system.len(), BURST_PARTICLE_COUNT);

        for _ in 0..26 {
            system.update();
        }
        assert!(system.is_empty());
    }

    #[test]
    fn test_positions_advance_by_scaled_velocity() {
        let mut system = ParticleSystem::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        system.spawn_burst(Vec3::ZERO, &mut rng);

        let before = system.views();
        system.update();
        let after = system.views();

        for (b, a) in before.iter().zip(after.iter()) {
            let moved = b.position.distance_to(&a.position);
            // Max speed is half the spread on each axis.
            assert!(moved <= PARTICLE_SPREAD * PARTICLE_STEP_SCALE);
            assert!((b.life - a.life - PARTICLE_LIFE_DECAY).abs() < 1e-6);
        }
    }
}
