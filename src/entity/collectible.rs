use glam::Vec2;

use crate::constants::{BOB_AMPLITUDE, BOB_SPEED};
use crate::entity::Body;

/// A bobbing pickup. Only one is alive at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collectible {
    /// Resting position; the drawn position bobs around it.
    pub position: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Bob phase, in radians.
    pub bob_phase: f32,
}

impl Collectible {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    pub fn spawn(&mut self, position: Vec2) {
        self.position = position;
        self.bob_phase = 0.0;
        self.alive = true;
    }

    pub fn update(&mut self, dt: f32) {
        if self.alive {
            self.bob_phase += dt * BOB_SPEED;
        }
    }

    pub fn bob_offset(&self) -> f32 {
        self.bob_phase.sin() * self.radius * BOB_AMPLITUDE
    }

    /// Where the collectible is drawn and collides this frame.
    pub fn visual_position(&self) -> Vec2 {
        self.position + Vec2::new(0.0, self.bob_offset())
    }
}

impl Body for Collectible {
    fn position(&self) -> Vec2 {
        self.visual_position()
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
