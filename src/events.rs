//! Discrete tokens exchanged with the presentation layer.
//!
//! The presentation renders text and buttons for each [`SceneEvent::Entered`] and sends
//! back [`Action`]s; it never forwards raw device events.

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::game::state::SceneState;

/// A user decision coming back from the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Start,
    HowToPlay,
    BackToStart,
    Acknowledge,
    Promise,
    Accept,
    Restart,
    ToggleMute,
}

/// A one-off sound/haptic trigger for the presentation to interpret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Collected,
    Confetti,
}

/// What the overlay needs to render a state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    None,
    Progress { collected: usize, total: usize },
    Reason { index: usize, total: usize, emotion: usize },
    Portrait { emotion: usize },
    Gesture { frames: Vec<usize> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    Entered { state: SceneState, payload: Payload },
    Cue(Cue),
}
