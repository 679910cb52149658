//! The animators the scene draws with, built once the sheets have settled.

use crate::asset::LoadedAssets;
use crate::config::{AssetConfig, CharacterRows};
use crate::entity::direction::Direction;
use crate::texture::animated::FrameAnimator;
use crate::texture::cache::SheetCache;
use crate::texture::sprite::FrameSource;
use crate::texture::target::Color;

pub const PLAYER_PLACEHOLDER: Color = Color::rgba(255, 255, 255, 230);
pub const COLLECTIBLE_PLACEHOLDER: Color = Color::rgba(255, 92, 138, 240);
pub const PORTRAIT_PLACEHOLDER: Color = Color::rgba(255, 214, 230, 220);

#[derive(Debug)]
pub struct SpriteSet {
    pub player: FrameAnimator,
    pub collectible: FrameAnimator,
    pub portrait: FrameAnimator,
    /// Mirror the player; set when a right-facing row is borrowed from the left one.
    pub player_flip: bool,
    rows: CharacterRows,
    walk_fps: f32,
    portrait_fps: f32,
}

impl SpriteSet {
    /// Image-less animators, used until loading settles.
    pub fn placeholder(config: &AssetConfig) -> Self {
        let player = FrameAnimator::new(
            None,
            FrameSource::uniform(config.player.columns, config.player.rows),
            config.player.fps,
        );
        let collectible = FrameAnimator::new(
            None,
            FrameSource::uniform(config.collectible.columns, config.collectible.rows),
            config.collectible.fps,
        );
        let portrait = FrameAnimator::new(None, FrameSource::uniform(config.portraits.count, 1), config.portraits.fps);
        Self::assemble(config, player, collectible, portrait)
    }

    /// Segments every sheet through `cache` and builds animators over them.
    ///
    /// Sheets missing from `assets` keep a placeholder animator over a uniform grid.
    pub fn from_assets(config: &AssetConfig, assets: &LoadedAssets, cache: &mut SheetCache) -> Self {
        let player = cache
            .get_or_segment(&config.player.key, assets.get(&config.player.key), config.player.segmentation())
            .animator(config.player.fps);
        let collectible = cache
            .get_or_segment(
                &config.collectible.key,
                assets.get(&config.collectible.key),
                config.collectible.segmentation(),
            )
            .animator(config.collectible.fps);
        let portrait = cache
            .get_or_segment(
                &config.portraits.key,
                assets.get(&config.portraits.key),
                config.portraits.segmentation(),
            )
            .animator(config.portraits.fps);
        Self::assemble(config, player, collectible, portrait)
    }

    fn assemble(
        config: &AssetConfig,
        mut player: FrameAnimator,
        mut collectible: FrameAnimator,
        mut portrait: FrameAnimator,
    ) -> Self {
        player.set_placeholder(PLAYER_PLACEHOLDER);
        player.set_row(config.player_rows.down);
        player.reset(false);
        collectible.set_placeholder(COLLECTIBLE_PLACEHOLDER);
        portrait.set_placeholder(PORTRAIT_PLACEHOLDER);
        portrait.set_looping(false);
        portrait.reset(false);

        Self {
            player,
            collectible,
            portrait,
            player_flip: false,
            rows: config.player_rows.clone(),
            walk_fps: config.player.fps,
            portrait_fps: config.portraits.fps,
        }
    }

    /// Sheet row for a facing, and whether it must be mirrored.
    pub fn facing_row(&self, facing: Direction) -> (usize, bool) {
        match facing {
            Direction::Down => (self.rows.down, false),
            Direction::Up => (self.rows.up, false),
            Direction::Left => (self.rows.left, false),
            Direction::Right => match self.rows.right {
                Some(row) => (row, false),
                None => (self.rows.left, true),
            },
        }
    }

    /// Points the walk cycle at `facing`; plays it while moving and rests on the first
    /// frame otherwise.
    pub fn walk(&mut self, facing: Direction, moving: bool) {
        let (row, flip) = self.facing_row(facing);
        self.player_flip = flip;
        self.player.set_row(row);
        if moving && !self.player.is_playing() {
            self.player.reset(true);
        } else if !moving && self.player.is_playing() {
            self.player.reset(false);
        }
    }

    /// Back to the walk cycle, idle, facing `facing`.
    pub fn resume_walk(&mut self, facing: Direction) {
        self.player.set_sequence(None);
        self.player.set_looping(true);
        self.player.set_fps(self.walk_fps);
        let (row, flip) = self.facing_row(facing);
        self.player_flip = flip;
        self.player.set_row(row);
        self.player.reset(false);
    }

    /// Plays the reaction row once and holds its last frame.
    pub fn play_reaction(&mut self) {
        self.player_flip = false;
        self.player.set_sequence(None);
        self.player.set_looping(false);
        self.player.set_fps(self.rows.reaction_fps);
        self.player.set_row(self.rows.reaction);
        self.player.reset(true);
    }

    /// Shows a single portrait.
    pub fn show_emotion(&mut self, emotion: usize) {
        self.portrait.set_sequence(None);
        self.portrait.set_looping(false);
        self.portrait.set_start_frame(emotion);
        self.portrait.reset(false);
    }

    /// Plays portraits in `frames` order once.
    pub fn play_gesture(&mut self, frames: &[usize]) {
        self.portrait.set_sequence(Some(frames.to_vec()));
        self.portrait.set_looping(false);
        self.portrait.set_fps(self.portrait_fps);
        self.portrait.reset(true);
    }

    pub fn advance(&mut self, dt: f32) {
        self.player.advance(dt);
        self.collectible.advance(dt);
        self.portrait.advance(dt);
    }
}
