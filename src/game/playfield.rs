//! Playfield dimensions and the sizes derived from them.

use glam::Vec2;

use crate::spawn::Bounds;

/// Every size in the scene scales with the smaller viewport dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub size: Vec2,
    /// `min(width, height)`.
    pub unit: f32,
    /// Distance kept clear of every edge.
    pub margin: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        let unit = width.min(height).max(0.0);
        Self {
            size: Vec2::new(width, height),
            unit,
            margin: (unit * 0.06).max(16.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn player_radius(&self) -> f32 {
        (self.unit * 0.03).max(10.0)
    }

    pub fn collectible_radius(&self) -> f32 {
        (self.unit * 0.028).max(10.0)
    }

    /// Pixels per second.
    pub fn player_speed(&self) -> f32 {
        (self.unit * 0.30).max(120.0)
    }

    /// Extra clearance at the top so the player's head never leaves the screen.
    pub fn head_room(&self) -> f32 {
        self.margin * 0.5
    }

    pub fn start_position(&self) -> Vec2 {
        Vec2::new(self.size.x * 0.5, self.size.y * 0.6)
    }

    /// Where the player walks to when the ending begins.
    pub fn stage_mark(&self) -> Vec2 {
        Vec2::new(self.size.x * 0.5, self.size.y * 0.6)
    }

    pub fn confetti_origin(&self) -> Vec2 {
        Vec2::new(self.size.x * 0.5, self.size.y * 0.45)
    }

    /// Clamps a point to where the player may stand.
    pub fn clamp_player(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            clamp(p.x, self.margin, self.size.x - self.margin),
            clamp(p.y, self.margin + self.head_room(), self.size.y - self.margin),
        )
    }

    /// Clamps a point to the margin on every side.
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            clamp(p.x, self.margin, self.size.x - self.margin),
            clamp(p.y, self.margin, self.size.y - self.margin),
        )
    }

    pub fn spawn_bounds(&self) -> Bounds {
        Bounds::new(self.size.x, self.size.y, self.margin)
    }
}

/// Lower bound wins when the range is inverted, so tiny viewports never panic.
fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}
