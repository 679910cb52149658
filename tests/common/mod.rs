#![allow(dead_code)]

use heartwalk::asset::LoadedAssets;
use heartwalk::config::SceneConfig;
use heartwalk::game::state::SceneState;
use heartwalk::game::GameSession;
use heartwalk::texture::raster::RasterImage;

pub const INK: [u8; 4] = [20, 20, 20, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const CLEAR: [u8; 4] = [0, 0, 0, 0];

pub const STEP: f32 = 1.0 / 60.0;

/// A transparent sheet with opaque blocks at `(x, y, w, h)`.
pub fn sheet_with_blocks(width: u32, height: u32, blocks: &[(u32, u32, u32, u32)]) -> RasterImage {
    let mut image = RasterImage::filled(width, height, CLEAR);
    for &(bx, by, bw, bh) in blocks {
        for y in by..by + bh {
            for x in bx..bx + bw {
                image.put_pixel(x, y, INK);
            }
        }
    }
    image
}

/// A `columns` x `rows` grid of `cell`-sized blocks separated by `gap` pixels.
pub fn grid_sheet(columns: u32, rows: u32, cell: u32, gap: u32) -> RasterImage {
    let pitch = cell + gap;
    let blocks: Vec<_> = (0..rows)
        .flat_map(|r| (0..columns).map(move |c| (c * pitch, r * pitch, cell, cell)))
        .collect();
    sheet_with_blocks(columns * pitch - gap, rows * pitch - gap, &blocks)
}

/// A strip whose column `x` holds `profile(x)` ink pixels from the top, on white.
pub fn strip_from_profile(width: u32, height: u32, profile: impl Fn(u32) -> u32) -> RasterImage {
    let mut image = RasterImage::filled(width, height, WHITE);
    for x in 0..width {
        for y in 0..profile(x).min(height) {
            image.put_pixel(x, y, INK);
        }
    }
    image
}

/// `count` tent-shaped faces of `face` width that touch their neighbours, never
/// leaving an empty column between them.
pub fn touching_faces(count: u32, face: u32) -> RasterImage {
    let half = face / 2;
    strip_from_profile(count * face, face, move |x| {
        let u = x % face;
        face - u.abs_diff(half) - half / 2
    })
}

/// A session at 800x600 that has left the loading state with no sheets.
pub fn session(config: SceneConfig) -> GameSession {
    let mut session = GameSession::with_seed(config, 800.0, 600.0, 7).expect("valid config");
    session.assets_ready(&LoadedAssets::default());
    assert_eq!(session.state(), SceneState::Start);
    session
}

/// Taps on the collectible every frame until the state changes. Returns frames spent.
pub fn chase_collectible(session: &mut GameSession) -> usize {
    for frame in 0..5_000 {
        if session.state() != SceneState::Playing {
            return frame;
        }
        let target = session.collectible().visual_position();
        session.pointer_down(target);
        session.update(STEP);
    }
    panic!("collectible never reached");
}

/// Plays the whole scene with the confirm action until `Ended`.
pub fn play_to_end(session: &mut GameSession) {
    for _ in 0..100_000 {
        match session.state() {
            SceneState::Ended => return,
            SceneState::Playing => {
                chase_collectible(session);
            }
            _ => {
                if let Some(action) = session.primary_action() {
                    session.apply(action);
                }
                session.update(STEP);
            }
        }
    }
    panic!("scene never ended, stuck in {:?}", session.state());
}
