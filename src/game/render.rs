//! Draws the scene onto any [`DrawTarget`]. Text and buttons belong to the overlay.

use glam::Vec2;

use crate::game::state::{CinematicPhase, SceneState};
use crate::game::GameSession;
use crate::texture::target::{Color, DrawTarget, Rect};

const BACKGROUND: Color = Color::rgba(11, 15, 26, 255);
const STAR: Color = Color::rgba(255, 255, 255, 56);
const TARGET_MARKER: Color = Color::rgba(255, 255, 255, 64);
const PARTICLE: Color = Color::rgba(255, 170, 200, 230);
const STAR_COUNT: u32 = 42;

impl GameSession {
    pub fn render(&self, target: &mut dyn DrawTarget) {
        let field = self.playfield();
        target.clear(BACKGROUND);
        draw_stars(target, field.size);

        if self.state() == SceneState::Playing {
            if let Some(tap) = self.input().tap_target() {
                let radius = (self.player().radius * 0.55).max(10.0);
                target.fill_circle(tap, radius, TARGET_MARKER);
            }
        }

        let collectible = self.collectible();
        if collectible.alive {
            let size = Vec2::splat(collectible.radius * 2.4);
            self.sprites()
                .collectible
                .render(target, Rect::centered(collectible.visual_position(), size), false);
        }

        let player = self.player();
        let sprites = self.sprites();
        let player_size = sprites.player.frame_size(player.radius * 3.2);
        sprites
            .player
            .render(target, Rect::centered(player.position, player_size), sprites.player_flip);

        for particle in self.particles().iter() {
            let size = Vec2::splat(particle.size);
            target.fill_rect(Rect::centered(particle.position, size), PARTICLE);
        }

        if shows_portrait(self.state()) {
            let height = field.unit * 0.22;
            let size = sprites.portrait.frame_size(height);
            let center = Vec2::new(field.width() * 0.5, field.height() * 0.2);
            sprites.portrait.render(target, Rect::centered(center, size), false);
        }
    }
}

fn shows_portrait(state: SceneState) -> bool {
    matches!(
        state,
        SceneState::ShowingReason
            | SceneState::FinalGate
            | SceneState::EndingSequence(
                CinematicPhase::Question | CinematicPhase::Reaction | CinematicPhase::CloseUp
            )
    )
}

/// A fixed scatter, so the sky does not shimmer between frames.
fn draw_stars(target: &mut dyn DrawTarget, size: Vec2) {
    let (w, h) = (size.x.max(1.0) as u32, size.y.max(1.0) as u32);
    for i in 0..STAR_COUNT {
        let position = Vec2::new(((i * 97) % w) as f32, ((i * 173) % h) as f32);
        let radius = 1.0 + (i % 3) as f32 * 0.6;
        target.fill_circle(position, radius, STAR);
    }
}
