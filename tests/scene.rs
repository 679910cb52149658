mod common;

use glam::Vec2;
use heartwalk::asset::LoadedAssets;
use heartwalk::config::SceneConfig;
use heartwalk::events::{Action, Cue, Payload, SceneEvent};
use heartwalk::game::state::{CinematicPhase, SceneState};
use heartwalk::game::GameSession;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use common::{chase_collectible, play_to_end, session, STEP};

fn entered(events: &[SceneEvent]) -> Vec<SceneState> {
    events
        .iter()
        .filter_map(|e| match e {
            SceneEvent::Entered { state, .. } => Some(*state),
            SceneEvent::Cue(_) => None,
        })
        .collect()
}

fn wait_while(session: &mut GameSession, state: SceneState) {
    for _ in 0..10_000 {
        if session.state() != state {
            return;
        }
        session.update(STEP);
    }
    panic!("stuck in {state:?}");
}

#[test]
fn test_loading_waits_for_assets() {
    let mut session = GameSession::with_seed(SceneConfig::default(), 800.0, 600.0, 1).unwrap();
    assert_that(&session.state()).is_equal_to(SceneState::Loading);

    session.update(5.0);
    assert_that(&session.state()).is_equal_to(SceneState::Loading);

    session.assets_ready(&LoadedAssets::default());
    assert_that(&session.state()).is_equal_to(SceneState::Start);
}

#[test]
fn test_full_run_without_gate_reaches_end() {
    let config = SceneConfig {
        final_gate: false,
        ..Default::default()
    };
    let mut session = session(config);
    play_to_end(&mut session);

    assert_that(&session.state()).is_equal_to(SceneState::Ended);
    assert_that(&session.collected()).is_equal_to(session.total());
    assert_that(&session.input().tap_target()).is_none();
}

#[test]
fn test_full_run_with_gate_visits_every_phase() {
    let mut session = session(SceneConfig::default());
    play_to_end(&mut session);
    let states = entered(&session.drain_events());

    assert_that(&states).contains(SceneState::FinalGate);
    let phases: Vec<_> = states.iter().filter_map(|s| s.phase()).collect();
    assert_eq!(
        phases,
        vec![
            CinematicPhase::WalkIn,
            CinematicPhase::Question,
            CinematicPhase::Reaction,
            CinematicPhase::CloseUp,
            CinematicPhase::Confetti,
        ]
    );
    assert_that(&states.last().copied()).is_equal_to(Some(SceneState::Ended));
    assert_that(&session.collected()).is_equal_to(7);
}

#[test]
fn test_final_gate_holds_back_the_last_collectible() {
    let config = SceneConfig {
        total_collectibles: 2,
        reason_count: 2,
        ..Default::default()
    };
    let mut session = session(config);
    session.apply(Action::Start);
    chase_collectible(&mut session);
    wait_while(&mut session, SceneState::ReactingToCollection);
    assert_that(&session.state()).is_equal_to(SceneState::ShowingReason);

    session.apply(Action::Acknowledge);
    assert_that(&session.state()).is_equal_to(SceneState::FinalGate);
    assert_that(&session.collectible().alive).is_false();

    session.apply(Action::Promise);
    assert_that(&session.state()).is_equal_to(SceneState::Playing);
    assert_that(&session.collectible().alive).is_true();
}

#[test]
fn test_collections_past_the_reasons_skip_dialogue() {
    let config = SceneConfig {
        total_collectibles: 2,
        reason_count: 1,
        final_gate: false,
        ..Default::default()
    };
    let mut session = session(config);
    session.apply(Action::Start);

    chase_collectible(&mut session);
    wait_while(&mut session, SceneState::ReactingToCollection);
    assert_that(&session.state()).is_equal_to(SceneState::ShowingReason);
    session.apply(Action::Acknowledge);

    chase_collectible(&mut session);
    wait_while(&mut session, SceneState::ReactingToCollection);
    assert_that(&session.state()).is_equal_to(SceneState::EndingSequence(CinematicPhase::WalkIn));
}

#[test]
fn test_every_transition_is_announced_once() {
    let mut session = session(SceneConfig::default());
    session.drain_events();

    session.apply(Action::Start);
    let events = session.drain_events();
    assert_eq!(
        events,
        vec![SceneEvent::Entered {
            state: SceneState::Playing,
            payload: Payload::Progress { collected: 0, total: 7 },
        }]
    );

    chase_collectible(&mut session);
    let events = session.drain_events();
    assert_that(&entered(&events)).is_equal_to(vec![SceneState::ReactingToCollection]);
    assert_that(&events).contains(SceneEvent::Cue(Cue::Collected));

    wait_while(&mut session, SceneState::ReactingToCollection);
    let events = session.drain_events();
    assert_eq!(
        events,
        vec![SceneEvent::Entered {
            state: SceneState::ShowingReason,
            payload: Payload::Reason {
                index: 0,
                total: 7,
                emotion: 0
            },
        }]
    );
}

#[test]
fn test_transitions_clear_tap_target() {
    let mut session = session(SceneConfig::default());
    session.apply(Action::Start);
    session.pointer_down(Vec2::new(100.0, 100.0));
    assert_that(&session.input().tap_target()).is_some();

    chase_collectible(&mut session);
    assert_that(&session.state()).is_equal_to(SceneState::ReactingToCollection);
    assert_that(&session.input().tap_target()).is_none();
}

#[test]
fn test_pointer_outside_playing_is_ignored() {
    let mut session = session(SceneConfig::default());
    session.pointer_down(Vec2::new(100.0, 100.0));
    assert_that(&session.input().tap_target()).is_none();
}

#[test]
fn test_tap_targets_are_clamped_to_reachable_area() {
    let mut session = session(SceneConfig::default());
    session.apply(Action::Start);
    session.pointer_down(Vec2::new(-500.0, -500.0));

    let field = *session.playfield();
    let target = session.input().tap_target().expect("target");
    assert_that(&target).is_equal_to(Vec2::new(field.margin, field.margin + field.head_room()));
}

#[test]
fn test_actions_outside_their_state_are_ignored() {
    let mut session = session(SceneConfig::default());
    session.drain_events();

    session.apply(Action::Accept);
    session.apply(Action::Promise);
    session.apply(Action::Restart);

    assert_that(&session.state()).is_equal_to(SceneState::Start);
    assert_that(&session.drain_events().is_empty()).is_true();
}

#[test]
fn test_how_to_play_round_trip() {
    let mut session = session(SceneConfig::default());
    session.apply(Action::HowToPlay);
    assert_that(&session.state()).is_equal_to(SceneState::HowToPlay);
    assert_that(&session.primary_action()).is_equal_to(Some(Action::BackToStart));
    session.apply(Action::BackToStart);
    assert_that(&session.state()).is_equal_to(SceneState::Start);
}

#[test]
fn test_muted_session_emits_no_cues() {
    let mut session = session(SceneConfig::default());
    session.apply(Action::ToggleMute);
    assert_that(&session.is_muted()).is_true();

    session.apply(Action::Start);
    chase_collectible(&mut session);
    let cues = session
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SceneEvent::Cue(_)))
        .count();
    assert_that(&cues).is_equal_to(0);
}

#[test]
fn test_collection_bursts_particles() {
    let mut session = session(SceneConfig::default());
    session.apply(Action::Start);
    chase_collectible(&mut session);
    assert_that(&session.particles().len()).is_equal_to(26);
    assert_that(&session.collected()).is_equal_to(1);
}

#[test]
fn test_keyboard_moves_and_faces_player() {
    let mut session = session(SceneConfig::default());
    session.apply(Action::Start);
    let start = session.player().position;

    session.key_down(heartwalk::entity::direction::Direction::Left);
    session.update(0.1);

    let player = session.player();
    assert_that(&(player.position.x < start.x)).is_true();
    assert_that(&player.facing).is_equal_to(heartwalk::entity::direction::Direction::Left);
    assert_that(&player.moving).is_true();
}

#[test]
fn test_question_waits_for_accept() {
    let config = SceneConfig {
        total_collectibles: 1,
        reason_count: 0,
        ..Default::default()
    };
    let mut session = session(config);
    session.apply(Action::Start);
    chase_collectible(&mut session);
    wait_while(&mut session, SceneState::ReactingToCollection);
    wait_while(&mut session, SceneState::EndingSequence(CinematicPhase::WalkIn));

    let question = SceneState::EndingSequence(CinematicPhase::Question);
    assert_that(&session.state()).is_equal_to(question);
    for _ in 0..600 {
        session.update(STEP);
    }
    assert_that(&session.state()).is_equal_to(question);

    session.apply(Action::Accept);
    assert_that(&session.state()).is_equal_to(SceneState::EndingSequence(CinematicPhase::Reaction));
}

#[test]
fn test_close_up_can_be_skipped_by_config() {
    let mut config = SceneConfig {
        total_collectibles: 1,
        reason_count: 0,
        ..Default::default()
    };
    config.cinematic.close_up_enabled = false;
    let mut session = session(config);
    play_to_end(&mut session);

    let states = entered(&session.drain_events());
    assert_that(&states).does_not_contain(SceneState::EndingSequence(CinematicPhase::CloseUp));
    assert_that(&session.state()).is_equal_to(SceneState::Ended);
}

#[test]
fn test_restart_resets_the_run() {
    let config = SceneConfig {
        total_collectibles: 1,
        reason_count: 1,
        ..Default::default()
    };
    let mut session = session(config);
    play_to_end(&mut session);

    session.apply(Action::Restart);
    assert_that(&session.state()).is_equal_to(SceneState::Start);
    assert_that(&session.collected()).is_equal_to(0);
    assert_that(&session.collectible().alive).is_false();
    assert_that(&session.particles().is_empty()).is_true();
    assert_that(&session.player().position).is_equal_to(session.playfield().start_position());
}

#[test]
fn test_resize_keeps_entities_inside() {
    let mut session = session(SceneConfig::default());
    session.apply(Action::Start);
    session.resize(200.0, 150.0);

    let field = *session.playfield();
    let p = session.player().position;
    assert_that(&(p.x <= field.width() - field.margin)).is_true();
    assert_that(&(p.y <= field.height() - field.margin)).is_true();
    assert_that(&session.player().radius).is_equal_to(field.player_radius());

    let c = session.collectible().position;
    assert_that(&(c.x <= field.width() - field.margin)).is_true();
    assert_that(&(c.y <= field.height() - field.margin)).is_true();
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SceneConfig {
        total_collectibles: 0,
        ..Default::default()
    };
    assert_that(&GameSession::new(config, 800.0, 600.0).is_err()).is_true();
}
