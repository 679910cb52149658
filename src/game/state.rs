use strum_macros::{EnumIter, IntoStaticStr};

/// Top-level scene state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoStaticStr)]
pub enum SceneState {
    /// Waiting for sheets to decode and segment.
    #[default]
    Loading,
    Start,
    HowToPlay,
    Playing,
    /// Reaction animation after a pickup, before any dialogue.
    ReactingToCollection,
    ShowingReason,
    /// Held back before the last collectible spawns.
    FinalGate,
    EndingSequence(CinematicPhase),
    Ended,
}

impl SceneState {
    /// Whether movement input drives the player.
    pub fn accepts_movement(&self) -> bool {
        matches!(self, SceneState::Playing)
    }

    pub fn phase(&self) -> Option<CinematicPhase> {
        match self {
            SceneState::EndingSequence(phase) => Some(*phase),
            _ => None,
        }
    }
}

/// Ordered sub-steps of the ending sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum CinematicPhase {
    WalkIn,
    Question,
    Reaction,
    CloseUp,
    Confetti,
}

impl CinematicPhase {
    /// The phase after this one, or `None` once confetti is done.
    pub fn next(self, close_up: bool) -> Option<CinematicPhase> {
        match self {
            CinematicPhase::WalkIn => Some(CinematicPhase::Question),
            CinematicPhase::Question => Some(CinematicPhase::Reaction),
            CinematicPhase::Reaction if close_up => Some(CinematicPhase::CloseUp),
            CinematicPhase::Reaction | CinematicPhase::CloseUp => Some(CinematicPhase::Confetti),
            CinematicPhase::Confetti => None,
        }
    }
}
