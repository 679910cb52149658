//! Centralized error types for the scene.
//!
//! Nothing in the running session is fatal: missing assets, underdetermined segmentation,
//! stale frame indices and exhausted spawn placement all degrade locally. These types cover
//! construction-time mistakes and backend failures only.

use std::io;

/// Main error type for the scene.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Loader panicked: {0}")]
    Panicked(String),
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => AssetError::Io(io),
            other => AssetError::Decode(other.to_string()),
        }
    }
}

/// Errors related to raster buffers and drawing.
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    InvalidBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Rendering failed: {0}")]
    RenderFailed(String),
}

/// Errors produced while layering or validating the scene configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Figment(Box::new(e))
    }
}

/// Result type for scene operations.
pub type GameResult<T> = Result<T, GameError>;
