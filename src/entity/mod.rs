//! Positional state for everything that lives on the playfield.

pub mod collectible;
pub mod direction;
pub mod particle;
pub mod player;

use glam::Vec2;

/// Anything with a circular footprint.
pub trait Body {
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;

    /// Circle overlap, shrunk by `factor` so grazing contact does not count.
    fn overlaps(&self, other: &dyn Body, factor: f32) -> bool {
        self.position().distance(other.position()) <= (self.radius() + other.radius()) * factor
    }
}
