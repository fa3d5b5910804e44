//! Impact particles
//!
//! Short-lived visual debris spawned at bullet impact points. Purely
//! cosmetic - particles never affect gameplay.

use glam::Vec2;
use rand::Rng;

use crate::consts::{EXPLOSION_PARTICLES, PARTICLE_LIFE};

/// Explosion tint for hits landing on the bot (orange)
pub const BOT_HIT_COLOR: [u8; 3] = [0xff, 0x85, 0x03];
/// Explosion tint for hits landing on the player (red)
pub const PLAYER_HIT_COLOR: [u8; 3] = [0xff, 0x02, 0x02];

/// A single piece of explosion debris
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: [u8; 3],
    /// Remaining frames; removed at zero
    pub life: u32,
}

impl Particle {
    /// Render opacity: linear fade from 1 to 0 over the lifespan
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE as f32
    }
}

/// Spawn a burst of 20 particles at a point, with velocity components drawn
/// uniformly from [-2.5, 2.5] on both axes and sizes from [2, 7]
pub fn spawn_explosion(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    at: Vec2,
    color: [u8; 3],
) {
    for _ in 0..EXPLOSION_PARTICLES {
        particles.push(Particle {
            pos: at,
            vel: Vec2::new(rng.random_range(-2.5..2.5), rng.random_range(-2.5..2.5)),
            size: rng.random_range(2.0..7.0),
            color,
            life: PARTICLE_LIFE,
        });
    }
}

/// Advance every particle by its velocity and age it one frame; expired
/// particles are removed
pub fn age_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn explosion_spawns_fixed_batch_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut particles = Vec::new();
        spawn_explosion(&mut particles, &mut rng, Vec2::new(10.0, 20.0), BOT_HIT_COLOR);

        assert_eq!(particles.len(), EXPLOSION_PARTICLES);
        for p in &particles {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert!(p.vel.x >= -2.5 && p.vel.x < 2.5);
            assert!(p.vel.y >= -2.5 && p.vel.y < 2.5);
            assert!(p.size >= 2.0 && p.size < 7.0);
            assert_eq!(p.life, PARTICLE_LIFE);
            assert_eq!(p.color, BOT_HIT_COLOR);
        }
    }

    #[test]
    fn particles_drift_and_expire() {
        let particle = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            size: 3.0,
            color: PLAYER_HIT_COLOR,
            life: 2,
        };
        let mut particles = vec![particle];

        age_particles(&mut particles);
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].pos, Vec2::new(1.0, -2.0));
        assert_eq!(particles[0].life, 1);

        age_particles(&mut particles);
        assert!(particles.is_empty());
    }

    #[test]
    fn alpha_fades_linearly() {
        let mut particle = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 3.0,
            color: BOT_HIT_COLOR,
            life: PARTICLE_LIFE,
        };
        assert_eq!(particle.alpha(), 1.0);
        particle.life = PARTICLE_LIFE / 2;
        assert_eq!(particle.alpha(), 0.5);
        particle.life = 0;
        assert_eq!(particle.alpha(), 0.0);
    }
}
