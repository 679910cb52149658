use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::constants::PARTICLE_GRAVITY;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Seconds left before removal.
    pub life: f32,
    pub size: f32,
}

/// Confetti bursts emitted on collection and at the end of the cinematic.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, origin: Vec2, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(120.0..420.0);
            self.particles.push(Particle {
                position: origin,
                velocity: Vec2::new(angle.cos() * speed, angle.sin() * speed - 180.0),
                life: rng.random_range(0.55..1.15),
                size: rng.random_range(2.0..5.0),
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.velocity.y += PARTICLE_GRAVITY * dt;
            p.position += p.velocity * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
