//! Scene configuration, layered from defaults, an optional TOML file and the environment.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::constants::{FRAME_DELTA_CEILING, GRID_MIN_DENSITY, GRID_MIN_GAP, SPAWN_ATTEMPTS};
use crate::error::ConfigError;
use crate::input::{InputParams, JOYSTICK_DEADZONE, TAP_EPSILON, VERTICAL_BIAS};
use crate::texture::cache::Segmentation;
use crate::texture::grid::GridParams;
use crate::texture::valley::ValleyParams;

pub const CONFIG_FILE: &str = "heartwalk.toml";
pub const ENV_PREFIX: &str = "HEARTWALK_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Collectibles in one run.
    pub total_collectibles: usize,
    /// Reasons the overlay has text for; collections past this skip the reason dialogue.
    pub reason_count: usize,
    /// Portrait emotion index shown with each reason, cycled if shorter than the reasons.
    pub reason_emotions: Vec<usize>,
    /// Hold back the last collectible until the player makes a promise.
    pub final_gate: bool,
    /// Seconds the collection reaction plays before the dialogue opens.
    pub reaction_duration: f32,
    pub frame_delta_ceiling: f32,
    pub spawn_attempts: usize,
    pub input: InputConfig,
    pub cinematic: CinematicConfig,
    pub assets: AssetConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            total_collectibles: 7,
            reason_count: 7,
            reason_emotions: vec![0, 1, 2, 1, 3, 2, 4],
            final_gate: true,
            reaction_duration: 0.9,
            frame_delta_ceiling: FRAME_DELTA_CEILING,
            spawn_attempts: SPAWN_ATTEMPTS,
            input: InputConfig::default(),
            cinematic: CinematicConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub joystick_deadzone: f32,
    pub tap_epsilon: f32,
    pub vertical_bias: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            joystick_deadzone: JOYSTICK_DEADZONE,
            tap_epsilon: TAP_EPSILON,
            vertical_bias: VERTICAL_BIAS,
        }
    }
}

impl From<&InputConfig> for InputParams {
    fn from(config: &InputConfig) -> Self {
        InputParams {
            joystick_deadzone: config.joystick_deadzone,
            tap_epsilon: config.tap_epsilon,
            vertical_bias: config.vertical_bias,
        }
    }
}

/// Timings and portrait choices for the ending sequence. Durations are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CinematicConfig {
    pub walk_in: f32,
    pub reaction: f32,
    pub close_up_enabled: bool,
    pub close_up: f32,
    pub confetti: f32,
    pub question_emotion: usize,
    pub reaction_emotion: usize,
    /// Portrait frame order played during the close-up.
    pub close_up_gesture: Vec<usize>,
}

impl Default for CinematicConfig {
    fn default() -> Self {
        Self {
            walk_in: 3.0,
            reaction: 1.5,
            close_up_enabled: true,
            close_up: 2.5,
            confetti: 2.0,
            question_emotion: 0,
            reaction_emotion: 4,
            close_up_gesture: vec![4, 5, 4, 5, 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub key: String,
    /// File name relative to the asset directory.
    pub file: String,
    /// Uniform grid used when detection is off or finds nothing.
    pub columns: usize,
    pub rows: usize,
    pub fps: f32,
    /// Infer frame boundaries from pixel density.
    pub detect: bool,
    pub min_density: u32,
    pub min_gap: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            file: String::new(),
            columns: 1,
            rows: 1,
            fps: 8.0,
            detect: true,
            min_density: GRID_MIN_DENSITY,
            min_gap: GRID_MIN_GAP,
        }
    }
}

impl SheetConfig {
    fn named(key: &str, columns: usize, rows: usize, fps: f32) -> Self {
        Self {
            key: key.to_string(),
            file: format!("{key}.png"),
            columns,
            rows,
            fps,
            ..Default::default()
        }
    }

    pub fn segmentation(&self) -> Segmentation {
        if self.detect {
            Segmentation::Grid {
                params: GridParams {
                    min_density: self.min_density,
                    min_gap: self.min_gap,
                },
                columns: self.columns,
                rows: self.rows,
            }
        } else {
            Segmentation::Uniform {
                columns: self.columns,
                rows: self.rows,
            }
        }
    }
}

/// Which sheet rows hold each walk direction and the reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRows {
    pub down: usize,
    pub left: usize,
    /// `None` mirrors the left row.
    pub right: Option<usize>,
    pub up: usize,
    pub reaction: usize,
    pub reaction_fps: f32,
}

impl Default for CharacterRows {
    fn default() -> Self {
        Self {
            down: 0,
            left: 1,
            right: None,
            up: 2,
            reaction: 3,
            reaction_fps: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitConfig {
    pub key: String,
    pub file: String,
    /// Portraits in the strip.
    pub count: usize,
    pub fps: f32,
}

impl Default for PortraitConfig {
    fn default() -> Self {
        Self {
            key: "portraits".to_string(),
            file: "portraits.png".to_string(),
            count: 6,
            fps: 6.0,
        }
    }
}

impl PortraitConfig {
    pub fn segmentation(&self) -> Segmentation {
        Segmentation::Portraits {
            count: self.count,
            params: ValleyParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub directory: PathBuf,
    pub player: SheetConfig,
    pub player_rows: CharacterRows,
    pub collectible: SheetConfig,
    pub portraits: PortraitConfig,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets"),
            player: SheetConfig::named("player", 4, 4, 8.0),
            player_rows: CharacterRows::default(),
            collectible: SheetConfig::named("heart", 4, 1, 6.0),
            portraits: PortraitConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Defaults, then `path` (if it exists), then `HEARTWALK_*` variables.
    ///
    /// Nested keys use a double underscore: `HEARTWALK_CINEMATIC__WALK_IN=2.5`.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(SceneConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: SceneConfig = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.total_collectibles == 0 {
            return invalid("total_collectibles must be at least 1".into());
        }
        if !(self.frame_delta_ceiling > 0.0) {
            return invalid(format!("frame_delta_ceiling must be positive, got {}", self.frame_delta_ceiling));
        }
        if self.reaction_duration < 0.0 {
            return invalid(format!("reaction_duration must not be negative, got {}", self.reaction_duration));
        }

        let c = &self.cinematic;
        for (name, value) in [
            ("walk_in", c.walk_in),
            ("reaction", c.reaction),
            ("close_up", c.close_up),
            ("confetti", c.confetti),
        ] {
            if value < 0.0 {
                return invalid(format!("cinematic.{name} must not be negative, got {value}"));
            }
        }

        for sheet in [&self.assets.player, &self.assets.collectible] {
            if sheet.key.is_empty() {
                return invalid("sheet keys must not be empty".into());
            }
            if !(sheet.fps > 0.0) {
                return invalid(format!("sheet '{}' fps must be positive, got {}", sheet.key, sheet.fps));
            }
        }
        if self.assets.portraits.key.is_empty() {
            return invalid("portrait key must not be empty".into());
        }
        if self.assets.portraits.count == 0 {
            return invalid("portraits.count must be at least 1".into());
        }
        for (name, fps) in [
            ("portraits.fps", self.assets.portraits.fps),
            ("player_rows.reaction_fps", self.assets.player_rows.reaction_fps),
        ] {
            if !(fps > 0.0) {
                return invalid(format!("assets.{name} must be positive, got {fps}"));
            }
        }

        Ok(())
    }

    pub fn input_params(&self) -> InputParams {
        InputParams::from(&self.input)
    }

    /// Portrait emotion shown with the reason at `index`.
    pub fn reason_emotion(&self, index: usize) -> usize {
        if self.reason_emotions.is_empty() {
            0
        } else {
            self.reason_emotions[index % self.reason_emotions.len()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_collectibles_rejected() {
        let config = SceneConfig {
            total_collectibles: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_reason_emotions_cycle() {
        let config = SceneConfig {
            reason_emotions: vec![3, 1],
            ..Default::default()
        };
        assert_eq!(config.reason_emotion(0), 3);
        assert_eq!(config.reason_emotion(3), 1);
    }
}
