//! Movement arbitration between keyboard, virtual joystick and pointer taps.
//!
//! Raw device events are normalized upstream; this module only sees held directions,
//! joystick drag positions and tap points.

use bitflags::bitflags;
use glam::Vec2;
use strum::IntoEnumIterator;

use crate::entity::direction::Direction;

/// Joystick displacement below this (in pixels) does not steer.
pub const JOYSTICK_DEADZONE: f32 = 12.0;
/// A tap target closer than this counts as reached.
pub const TAP_EPSILON: f32 = 1.0;
/// How much the vertical component must dominate before facing turns vertical.
pub const VERTICAL_BIAS: f32 = 1.25;

bitflags! {
    /// Direction keys currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HeldKeys: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl HeldKeys {
    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => HeldKeys::UP,
            Direction::Down => HeldKeys::DOWN,
            Direction::Left => HeldKeys::LEFT,
            Direction::Right => HeldKeys::RIGHT,
        }
    }

    /// Unit vector of the held keys. Opposing keys cancel; diagonals are normalized.
    pub fn vector(self) -> Vec2 {
        Direction::iter()
            .filter(|&direction| self.contains(HeldKeys::from_direction(direction)))
            .map(Vec2::from)
            .sum::<Vec2>()
            .normalize_or_zero()
    }
}

/// Where a virtual joystick touch started and where it is now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joystick {
    pub origin: Vec2,
    pub current: Vec2,
}

impl Joystick {
    pub fn displacement(&self) -> Vec2 {
        self.current - self.origin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard,
    Joystick,
    Tap,
}

/// The single movement chosen for a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub source: InputSource,
    /// Unit vector.
    pub direction: Vec2,
    /// Furthest the player may travel this tick; finite only for taps so they never overshoot.
    pub max_distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputParams {
    pub joystick_deadzone: f32,
    pub tap_epsilon: f32,
    pub vertical_bias: f32,
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            joystick_deadzone: JOYSTICK_DEADZONE,
            tap_epsilon: TAP_EPSILON,
            vertical_bias: VERTICAL_BIAS,
        }
    }
}

/// Resolves one movement per tick by fixed priority: keyboard, then joystick, then tap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputArbiter {
    keys: HeldKeys,
    joystick: Option<Joystick>,
    tap_target: Option<Vec2>,
    params: InputParams,
}

impl InputArbiter {
    pub fn new(params: InputParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn params(&self) -> InputParams {
        self.params
    }

    pub fn key_down(&mut self, direction: Direction) {
        self.keys.insert(HeldKeys::from_direction(direction));
    }

    pub fn key_up(&mut self, direction: Direction) {
        self.keys.remove(HeldKeys::from_direction(direction));
    }

    pub fn held_keys(&self) -> HeldKeys {
        self.keys
    }

    pub fn joystick_begin(&mut self, origin: Vec2) {
        self.joystick = Some(Joystick { origin, current: origin });
    }

    pub fn joystick_move(&mut self, position: Vec2) {
        if let Some(joystick) = self.joystick.as_mut() {
            joystick.current = position;
        }
    }

    pub fn joystick_end(&mut self) {
        self.joystick = None;
    }

    pub fn joystick(&self) -> Option<Joystick> {
        self.joystick
    }

    /// Records a tap target. Ignored while a joystick touch is held.
    pub fn tap(&mut self, target: Vec2) -> bool {
        if self.joystick.is_some() {
            return false;
        }
        self.tap_target = Some(target);
        true
    }

    pub fn tap_target(&self) -> Option<Vec2> {
        self.tap_target
    }

    /// Drops the tap target; every scene transition does this.
    pub fn clear_target(&mut self) {
        self.tap_target = None;
    }

    /// Forgets every source, as on restart.
    pub fn clear_all(&mut self) {
        self.keys = HeldKeys::empty();
        self.joystick = None;
        self.tap_target = None;
    }

    fn keyboard(&self) -> Option<Vec2> {
        let v = self.keys.vector();
        (v != Vec2::ZERO).then_some(v)
    }

    fn joystick_direction(&self) -> Option<Vec2> {
        let d = self.joystick?.displacement();
        (d.length() > self.params.joystick_deadzone).then(|| d.normalize())
    }

    /// Picks the highest-priority active source for a player at `position`.
    ///
    /// A tap target within the epsilon is cleared and yields no movement.
    pub fn resolve(&mut self, position: Vec2) -> Option<Movement> {
        if let Some(direction) = self.keyboard() {
            return Some(Movement {
                source: InputSource::Keyboard,
                direction,
                max_distance: f32::INFINITY,
            });
        }

        if let Some(direction) = self.joystick_direction() {
            return Some(Movement {
                source: InputSource::Joystick,
                direction,
                max_distance: f32::INFINITY,
            });
        }

        let target = self.tap_target?;
        let offset = target - position;
        let distance = offset.length();
        if distance <= self.params.tap_epsilon {
            self.tap_target = None;
            return None;
        }

        Some(Movement {
            source: InputSource::Tap,
            direction: offset / distance,
            max_distance: distance,
        })
    }

    /// Facing for a movement direction under this arbiter's vertical bias.
    pub fn facing(&self, direction: Vec2) -> Option<Direction> {
        Direction::from_movement(direction, self.params.vertical_bias)
    }
}
