//! Spritesheet handling: raster buffers, segmentation, frame animation and drawing.

pub mod animated;
pub mod cache;
pub mod density;
pub mod grid;
pub mod raster;
pub mod sprite;
pub mod target;
pub mod valley;
