//! Heartwalk scene library crate.
//!
//! Spritesheet segmentation, frame animation and the scene state machine live here;
//! the desktop presentation is behind the `sdl` feature.

#[cfg(feature = "sdl")]
pub mod app;
pub mod asset;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod input;
pub mod logging;
pub mod spawn;
pub mod texture;
