use glam::Vec2;

use crate::entity::direction::Direction;
use crate::entity::Body;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub radius: f32,
    /// Pixels per second.
    pub speed: f32,
    pub facing: Direction,
    /// True when the player moved during the last update.
    pub moving: bool,
}

impl Player {
    pub fn new(position: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            position,
            radius,
            speed,
            facing: Direction::default(),
            moving: false,
        }
    }

    /// Moves along `direction` (a unit vector) for `dt` seconds, never further than `max_step`.
    pub fn step(&mut self, direction: Vec2, dt: f32, max_step: f32) {
        let step = (self.speed * dt).min(max_step);
        self.position += direction * step;
        self.moving = step > 0.0 && direction != Vec2::ZERO;
    }

    pub fn stop(&mut self) {
        self.moving = false;
    }
}

impl Body for Player {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
