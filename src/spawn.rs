//! Rejection-sampled placement of new collectibles.

use glam::Vec2;
use rand::Rng;
use tracing::warn;

use crate::constants::SPAWN_ATTEMPTS;

/// The area a point may be placed in, inset by `margin` on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub size: Vec2,
    pub margin: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            margin,
        }
    }

    /// Inclusive-exclusive sampling range on one axis; collapses to the center when the
    /// margin leaves no room.
    fn axis(extent: f32, margin: f32) -> (f32, f32) {
        let (lo, hi) = (margin, extent - margin);
        if hi > lo {
            (lo, hi)
        } else {
            (extent * 0.5, extent * 0.5)
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let (x0, x1) = Self::axis(self.size.x, self.margin);
        let (y0, y1) = Self::axis(self.size.y, self.margin);
        let x = if x1 > x0 { rng.random_range(x0..x1) } else { x0 };
        let y = if y1 > y0 { rng.random_range(y0..y1) } else { y0 };
        Vec2::new(x, y)
    }
}

/// Best-effort placement under minimum-distance constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPlacer {
    pub attempts: usize,
}

impl Default for SpawnPlacer {
    fn default() -> Self {
        Self {
            attempts: SPAWN_ATTEMPTS,
        }
    }
}

impl SpawnPlacer {
    pub fn new(attempts: usize) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    /// Samples up to `attempts` points and returns the first one further than
    /// `min_distances[i]` from every `existing[i]`.
    ///
    /// When the budget runs out the last sample is returned anyway; placement never fails.
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R, bounds: Bounds, existing: &[Vec2], min_distances: &[f32]) -> Vec2 {
        let mut candidate = bounds.sample(rng);

        for attempt in 0..self.attempts.max(1) {
            if attempt > 0 {
                candidate = bounds.sample(rng);
            }
            let clear = existing
                .iter()
                .zip(min_distances)
                .all(|(point, &min)| candidate.distance(*point) > min);
            if clear {
                return candidate;
            }
        }

        warn!(
            attempts = self.attempts,
            x = candidate.x,
            y = candidate.y,
            "Placement exhausted, using last candidate"
        );
        candidate
    }
}
