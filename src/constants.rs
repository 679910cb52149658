//! This module contains the tuning constants shared across the scene.

use std::time::Duration;

/// Target pacing of the desktop frame loop.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Upper bound on a single simulated step, in seconds.
///
/// A long pause (window hidden, debugger break) must not turn into one huge step.
pub const FRAME_DELTA_CEILING: f32 = 0.033;

/// Pixels with alpha at or below this value are padding, never content.
pub const ALPHA_THRESHOLD: u8 = 30;
/// A pixel is near-white when every color channel is at or above this value.
pub const WHITE_THRESHOLD: u8 = 235;

/// Default minimum column/row density for a content run to open.
pub const GRID_MIN_DENSITY: u32 = 0;
/// Default gap (in pixels) below which adjacent content runs are merged.
pub const GRID_MIN_GAP: usize = 6;

/// Half-width of the moving average applied to portrait column density.
pub const VALLEY_SMOOTH_RADIUS: usize = 5;
/// A valley must be no higher than every column within this radius.
pub const VALLEY_NEIGHBOR_RADIUS: usize = 10;
/// Accepted valleys must be further apart than this.
pub const VALLEY_MIN_SPACING: usize = 60;
/// Columns this close to the content edges never count as valleys.
pub const VALLEY_EDGE_MARGIN: usize = 20;
/// Smoothed density at or below this value is treated as empty when trimming.
pub const VALLEY_NEAR_ZERO: f32 = 0.5;

/// Pixels trimmed off the trailing edge of uniform-grid cells to hide neighbour bleed.
pub const BLEED_TRIM: u32 = 2;

/// Rejection-sampling budget for collectible placement.
pub const SPAWN_ATTEMPTS: usize = 80;

/// Collision tolerance, as a fraction of the summed radii.
pub const COLLISION_FACTOR: f32 = 0.92;
/// Collectible bob speed, in radians per second.
pub const BOB_SPEED: f32 = 3.2;
/// Collectible bob amplitude, as a fraction of its radius.
pub const BOB_AMPLITUDE: f32 = 0.22;

/// Particle gravity, in pixels per second squared.
pub const PARTICLE_GRAVITY: f32 = 520.0;
/// Particles emitted when a collectible is picked up.
pub const COLLECT_BURST: usize = 26;
/// Particles emitted when the confetti phase begins.
pub const CONFETTI_BURST: usize = 120;

/// Minimum distance from the player for a new collectible, in player radii.
pub const SPAWN_PLAYER_CLEARANCE: f32 = 5.2;
/// Minimum distance from the previous collectible, in collectible radii.
pub const SPAWN_PREVIOUS_CLEARANCE: f32 = 4.0;
