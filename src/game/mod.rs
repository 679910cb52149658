//! The scene session: state machine, entities and the per-frame loop.
//!
//! Everything that changes while the scene runs lives on [`GameSession`]. A restart resets
//! it in place; nothing is global except the log tick counter.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use smallvec::{smallvec, SmallVec};
use tracing::{debug, info, trace};

use crate::asset::LoadedAssets;
use crate::config::SceneConfig;
use crate::constants::{
    COLLECT_BURST, COLLISION_FACTOR, CONFETTI_BURST, SPAWN_PLAYER_CLEARANCE, SPAWN_PREVIOUS_CLEARANCE,
};
use crate::entity::collectible::Collectible;
use crate::entity::direction::Direction;
use crate::entity::particle::ParticleField;
use crate::entity::player::Player;
use crate::entity::Body;
use crate::error::GameResult;
use crate::events::{Action, Cue, Payload, SceneEvent};
use crate::formatter;
use crate::input::InputArbiter;
use crate::spawn::SpawnPlacer;
use crate::texture::cache::SheetCache;
use crate::texture::target::DrawTarget;

use self::clock::FrameClock;
use self::playfield::Playfield;
use self::sprites::SpriteSet;
use self::state::{CinematicPhase, SceneState};

pub mod clock;
pub mod playfield;
pub mod render;
pub mod sprites;
pub mod state;

/// Distance at which the walk-in counts as arrived.
const ARRIVAL_EPSILON: f32 = 2.0;

pub struct GameSession {
    config: SceneConfig,
    state: SceneState,
    /// Seconds spent in the current state (or cinematic phase).
    state_elapsed: f32,
    playfield: Playfield,
    player: Player,
    collectible: Collectible,
    last_collected_at: Option<Vec2>,
    particles: ParticleField,
    input: InputArbiter,
    placer: SpawnPlacer,
    sheets: SheetCache,
    sprites: SpriteSet,
    rng: SmallRng,
    clock: FrameClock,
    collected: usize,
    final_spawned: bool,
    muted: bool,
    events: Vec<SceneEvent>,
}

impl GameSession {
    pub fn new(config: SceneConfig, width: f32, height: f32) -> GameResult<Self> {
        Self::with_rng(config, width, height, SmallRng::from_os_rng())
    }

    /// Deterministic placement and particles, for tests and replays.
    pub fn with_seed(config: SceneConfig, width: f32, height: f32, seed: u64) -> GameResult<Self> {
        Self::with_rng(config, width, height, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: SceneConfig, width: f32, height: f32, rng: SmallRng) -> GameResult<Self> {
        config.validate()?;

        let playfield = Playfield::new(width, height);
        let player = Player::new(
            playfield.start_position(),
            playfield.player_radius(),
            playfield.player_speed(),
        );

        Ok(Self {
            state: SceneState::Loading,
            state_elapsed: 0.0,
            player,
            collectible: Collectible::new(playfield.collectible_radius()),
            last_collected_at: None,
            particles: ParticleField::default(),
            input: InputArbiter::new(config.input_params()),
            placer: SpawnPlacer::new(config.spawn_attempts),
            sheets: SheetCache::new(),
            sprites: SpriteSet::placeholder(&config.assets),
            rng,
            clock: FrameClock::new(config.frame_delta_ceiling),
            collected: 0,
            final_spawned: false,
            muted: false,
            events: Vec::new(),
            playfield,
            config,
        })
    }

    /// Builds animators from the settled assets and leaves the loading state.
    ///
    /// Failed sheets fall back to placeholders; loading never blocks the scene.
    pub fn assets_ready(&mut self, assets: &LoadedAssets) {
        self.sprites = SpriteSet::from_assets(&self.config.assets, assets, &mut self.sheets);
        info!(
            sheets = self.sheets.len(),
            failed = assets.failed().len(),
            "Sprites ready"
        );
        if self.state == SceneState::Loading {
            self.transition(SceneState::Start);
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn phase_elapsed(&self) -> f32 {
        self.state_elapsed
    }

    pub fn collected(&self) -> usize {
        self.collected
    }

    pub fn total(&self) -> usize {
        self.config.total_collectibles
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn collectible(&self) -> &Collectible {
        &self.collectible
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn input(&self) -> &InputArbiter {
        &self.input
    }

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }

    pub fn sheets(&self) -> &SheetCache {
        &self.sheets
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Events produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// The action a confirm key stands for in the current state, if any.
    pub fn primary_action(&self) -> Option<Action> {
        match self.state {
            SceneState::Start => Some(Action::Start),
            SceneState::HowToPlay => Some(Action::BackToStart),
            SceneState::ShowingReason => Some(Action::Acknowledge),
            SceneState::FinalGate => Some(Action::Promise),
            SceneState::EndingSequence(CinematicPhase::Question) => Some(Action::Accept),
            SceneState::EndingSequence(CinematicPhase::CloseUp) => Some(Action::Acknowledge),
            SceneState::Ended => Some(Action::Restart),
            _ => None,
        }
    }

    /// Applies an overlay action. Actions that do not belong to the current state are ignored.
    pub fn apply(&mut self, action: Action) {
        match (self.state, action) {
            (_, Action::ToggleMute) => {
                self.muted = !self.muted;
                debug!(muted = self.muted, "Toggled mute");
            }
            (SceneState::Start, Action::Start) => {
                self.reset();
                self.enter_playing();
            }
            (SceneState::Start, Action::HowToPlay) => self.transition(SceneState::HowToPlay),
            (SceneState::HowToPlay, Action::BackToStart) => self.transition(SceneState::Start),
            (SceneState::ShowingReason, Action::Acknowledge) => self.after_reason(),
            (SceneState::FinalGate, Action::Promise) => {
                self.final_spawned = true;
                self.enter_playing();
            }
            (SceneState::EndingSequence(phase @ CinematicPhase::Question), Action::Accept)
            | (SceneState::EndingSequence(phase @ CinematicPhase::CloseUp), Action::Acknowledge) => {
                self.advance_phase(phase)
            }
            (SceneState::Ended, Action::Restart) => {
                self.reset();
                self.transition(SceneState::Start);
            }
            (state, action) => trace!(?state, ?action, "Ignoring action"),
        }
    }

    pub fn key_down(&mut self, direction: Direction) {
        self.input.key_down(direction);
    }

    pub fn key_up(&mut self, direction: Direction) {
        self.input.key_up(direction);
    }

    /// A tap or click. Sets the tap target while playing; ignored otherwise.
    pub fn pointer_down(&mut self, position: Vec2) {
        if self.state.accepts_movement() {
            let target = self.playfield.clamp_player(position);
            self.input.tap(target);
        }
    }

    /// Pointer dragged while pressed; retargets the same way a tap does.
    pub fn pointer_drag(&mut self, position: Vec2) {
        self.pointer_down(position);
    }

    pub fn joystick_begin(&mut self, origin: Vec2) {
        self.input.joystick_begin(origin);
    }

    pub fn joystick_move(&mut self, position: Vec2) {
        self.input.joystick_move(position);
    }

    pub fn joystick_end(&mut self) {
        self.input.joystick_end();
    }

    /// Recomputes every derived size and pulls entities back inside the new bounds.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        self.player.radius = self.playfield.player_radius();
        self.player.speed = self.playfield.player_speed();
        self.player.position = self.playfield.clamp_player(self.player.position);
        self.collectible.radius = self.playfield.collectible_radius();
        if self.collectible.alive {
            self.collectible.position = self.playfield.clamp_point(self.collectible.position);
        }
        if let Some(target) = self.input.tap_target() {
            self.input.clear_target();
            self.input.tap(self.playfield.clamp_player(target));
        }
        debug!(width, height, "Playfield resized");
    }

    /// One display frame: bounded delta, simulation, then drawing.
    pub fn frame(&mut self, time: f64, target: &mut dyn DrawTarget) {
        let dt = self.clock.delta(time);
        self.update(dt);
        self.render(target);
        formatter::advance_frame();
    }

    /// Advances the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.state_elapsed += dt;
        self.collectible.update(dt);
        self.particles.update(dt);
        self.sprites.advance(dt);

        match self.state {
            SceneState::Playing => self.update_playing(dt),
            SceneState::ReactingToCollection if self.state_elapsed >= self.config.reaction_duration => {
                self.after_reaction()
            }
            SceneState::EndingSequence(phase) => self.update_cinematic(phase, dt),
            _ => {}
        }
    }

    fn update_playing(&mut self, dt: f32) {
        match self.input.resolve(self.player.position) {
            Some(movement) => {
                self.player.step(movement.direction, dt, movement.max_distance);
                self.player.position = self.playfield.clamp_player(self.player.position);
                if let Some(facing) = self.input.facing(movement.direction) {
                    self.player.facing = facing;
                }
            }
            None => self.player.stop(),
        }
        self.sprites.walk(self.player.facing, self.player.moving);

        if self.collectible.alive && self.player.overlaps(&self.collectible, COLLISION_FACTOR) {
            self.collect();
        }
    }

    fn update_cinematic(&mut self, phase: CinematicPhase, dt: f32) {
        let timings = &self.config.cinematic;
        let done = match phase {
            CinematicPhase::WalkIn => {
                let mark = self.playfield.stage_mark();
                let offset = mark - self.player.position;
                let distance = offset.length();
                if distance > ARRIVAL_EPSILON {
                    let direction = offset / distance;
                    self.player.step(direction, dt, distance);
                    if let Some(facing) = self.input.facing(direction) {
                        self.player.facing = facing;
                    }
                } else {
                    self.player.stop();
                }
                self.sprites.walk(self.player.facing, self.player.moving);

                self.player.position.distance(mark) <= ARRIVAL_EPSILON || self.state_elapsed >= timings.walk_in
            }
            CinematicPhase::Question => false,
            CinematicPhase::Reaction => self.state_elapsed >= timings.reaction,
            CinematicPhase::CloseUp => self.state_elapsed >= timings.close_up,
            CinematicPhase::Confetti => self.state_elapsed >= timings.confetti,
        };

        if done {
            self.advance_phase(phase);
        }
    }

    fn advance_phase(&mut self, phase: CinematicPhase) {
        match phase.next(self.config.cinematic.close_up_enabled) {
            Some(next) => self.transition(SceneState::EndingSequence(next)),
            None => self.transition(SceneState::Ended),
        }
    }

    fn collect(&mut self) {
        let at = self.collectible.visual_position();
        self.collectible.alive = false;
        self.collected += 1;
        self.last_collected_at = Some(self.collectible.position);
        self.particles.burst(&mut self.rng, at, COLLECT_BURST);
        info!(collected = self.collected, total = self.total(), "Collected");
        self.cue(Cue::Collected);
        self.transition(SceneState::ReactingToCollection);
    }

    fn after_reaction(&mut self) {
        let index = self.collected.saturating_sub(1);
        if self.collected > 0 && index < self.config.reason_count {
            self.transition(SceneState::ShowingReason);
        } else if self.collected >= self.total() {
            self.transition(SceneState::EndingSequence(CinematicPhase::WalkIn));
        } else {
            self.enter_playing();
        }
    }

    fn after_reason(&mut self) {
        let total = self.total();
        if self.collected >= total {
            self.transition(SceneState::EndingSequence(CinematicPhase::WalkIn));
        } else if self.config.final_gate && self.collected + 1 == total && !self.final_spawned {
            self.transition(SceneState::FinalGate);
        } else {
            self.enter_playing();
        }
    }

    /// Enters `Playing` with a fresh collectible.
    fn enter_playing(&mut self) {
        if self.collected + 1 == self.total() {
            self.final_spawned = true;
        }
        self.transition(SceneState::Playing);
        self.spawn_collectible();
    }

    fn spawn_collectible(&mut self) {
        let mut existing: SmallVec<[Vec2; 2]> = smallvec![self.player.position];
        let mut min_distances: SmallVec<[f32; 2]> = smallvec![self.player.radius * SPAWN_PLAYER_CLEARANCE];
        if let Some(previous) = self.last_collected_at {
            existing.push(previous);
            min_distances.push(self.collectible.radius * SPAWN_PREVIOUS_CLEARANCE);
        }

        let position = self
            .placer
            .place(&mut self.rng, self.playfield.spawn_bounds(), &existing, &min_distances);
        self.collectible.spawn(position);
        debug!(x = position.x, y = position.y, "Spawned collectible");
    }

    fn cue(&mut self, cue: Cue) {
        if !self.muted {
            self.events.push(SceneEvent::Cue(cue));
        }
    }

    /// Switches state, clearing the tap target and timers, and notifies the overlay once.
    fn transition(&mut self, next: SceneState) {
        let previous = self.state;
        self.state = next;
        self.state_elapsed = 0.0;
        self.input.clear_target();
        self.player.stop();

        match next {
            SceneState::Playing | SceneState::EndingSequence(CinematicPhase::WalkIn) => {
                self.sprites.resume_walk(self.player.facing)
            }
            SceneState::ReactingToCollection => self.sprites.play_reaction(),
            SceneState::ShowingReason => {
                let emotion = self.config.reason_emotion(self.collected.saturating_sub(1));
                self.sprites.show_emotion(emotion);
            }
            SceneState::EndingSequence(CinematicPhase::Question) => {
                self.sprites.show_emotion(self.config.cinematic.question_emotion)
            }
            SceneState::EndingSequence(CinematicPhase::Reaction) => {
                self.sprites.play_reaction();
                self.sprites.show_emotion(self.config.cinematic.reaction_emotion);
            }
            SceneState::EndingSequence(CinematicPhase::CloseUp) => {
                self.sprites.play_gesture(&self.config.cinematic.close_up_gesture)
            }
            SceneState::EndingSequence(CinematicPhase::Confetti) => {
                let origin = self.playfield.confetti_origin();
                self.particles.burst(&mut self.rng, origin, CONFETTI_BURST);
                self.cue(Cue::Confetti);
            }
            _ => {}
        }

        debug!(from = ?previous, to = ?next, "Scene transition");
        let payload = self.payload(next);
        self.events.push(SceneEvent::Entered { state: next, payload });
    }

    fn payload(&self, state: SceneState) -> Payload {
        let cinematic = &self.config.cinematic;
        match state {
            SceneState::Playing | SceneState::ReactingToCollection | SceneState::Ended => Payload::Progress {
                collected: self.collected,
                total: self.total(),
            },
            SceneState::ShowingReason => {
                let index = self.collected.saturating_sub(1);
                Payload::Reason {
                    index,
                    total: self.config.reason_count,
                    emotion: self.config.reason_emotion(index),
                }
            }
            SceneState::EndingSequence(CinematicPhase::Question) => Payload::Portrait {
                emotion: cinematic.question_emotion,
            },
            SceneState::EndingSequence(CinematicPhase::Reaction) => Payload::Portrait {
                emotion: cinematic.reaction_emotion,
            },
            SceneState::EndingSequence(CinematicPhase::CloseUp) => Payload::Gesture {
                frames: cinematic.close_up_gesture.clone(),
            },
            _ => Payload::None,
        }
    }

    /// Clears the run: counters, entities, particles and input.
    fn reset(&mut self) {
        self.collected = 0;
        self.final_spawned = false;
        self.last_collected_at = None;
        self.collectible.alive = false;
        self.particles.clear();
        self.input.clear_all();
        self.player.position = self.playfield.start_position();
        self.player.facing = Direction::default();
        self.player.stop();
        self.sprites.resume_walk(self.player.facing);
    }
}
