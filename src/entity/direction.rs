use glam::Vec2;
use strum_macros::{EnumIter, IntoStaticStr};

/// The four facings a character sheet has rows for.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Facing for a movement vector, or `None` when there is no movement.
    ///
    /// Horizontal wins unless the vertical component exceeds it by `vertical_bias`, which
    /// keeps near-diagonal input from flickering between rows.
    pub fn from_movement(movement: Vec2, vertical_bias: f32) -> Option<Direction> {
        if movement == Vec2::ZERO {
            return None;
        }

        let Vec2 { x, y } = movement;
        if y.abs() > x.abs() * vertical_bias {
            Some(if y < 0.0 { Direction::Up } else { Direction::Down })
        } else {
            Some(if x < 0.0 { Direction::Left } else { Direction::Right })
        }
    }
}

impl From<Direction> for Vec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -Vec2::Y,
            Direction::Down => Vec2::Y,
            Direction::Left => -Vec2::X,
            Direction::Right => Vec2::X,
        }
    }
}
