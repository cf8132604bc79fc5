//! Data-driven game balance
//!
//! Loaded from JSON; every field has a default so a partial file only
//! overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Round length and lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    /// Seconds per round
    pub duration: f32,
    pub start_lives: u32,
    /// Drop one item immediately when a round (re)starts
    pub spawn_on_start: bool,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            duration: ROUND_DURATION,
            start_lives: START_LIVES,
            spawn_on_start: true,
        }
    }
}

/// Spawn cadence and randomized motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Seconds between spawns
    pub interval: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Acceleration of the occasional accelerating item
    pub acceleration: f32,
    /// Probability (0-1) that an item accelerates
    pub acceleration_chance: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval: SPAWN_INTERVAL,
            speed_min: DROP_SPEED_MIN,
            speed_max: DROP_SPEED_MAX,
            acceleration: DROP_ACCELERATION,
            acceleration_chance: ACCELERATION_CHANCE,
        }
    }
}

/// Playfield bounds. The floor is at y = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayArea {
    /// World x of the left edge
    pub left: f32,
    pub width: f32,
    /// Ceiling items are released from
    pub drop_height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            left: -PLAY_WIDTH / 2.0,
            width: PLAY_WIDTH,
            drop_height: DROP_HEIGHT,
        }
    }
}

impl PlayArea {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Item dimensions and the hazard preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTuning {
    pub height: f32,
    /// Preset name that marks an item as a hazard
    pub hazard_preset: String,
}

impl Default for ItemTuning {
    fn default() -> Self {
        Self {
            height: ITEM_HEIGHT,
            hazard_preset: HAZARD_PRESET.to_string(),
        }
    }
}

/// All tunable values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub round: RoundTuning,
    pub spawn: SpawnTuning,
    pub play_area: PlayArea,
    pub items: ItemTuning,
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be > 0 (got {value})")))
            }
        }

        positive("round.duration", self.round.duration)?;
        positive("spawn.interval", self.spawn.interval)?;
        positive("play_area.width", self.play_area.width)?;
        positive("play_area.drop_height", self.play_area.drop_height)?;
        positive("items.height", self.items.height)?;

        let s = &self.spawn;
        if !(s.speed_min.is_finite() && s.speed_max.is_finite())
            || s.speed_min < 0.0
            || s.speed_min > s.speed_max
        {
            return Err(ConfigError::Invalid(format!(
                "spawn speed range {}..{} is invalid",
                s.speed_min, s.speed_max
            )));
        }
        if !s.acceleration.is_finite() || s.acceleration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spawn.acceleration must be >= 0 (got {})",
                s.acceleration
            )));
        }
        if !(0.0..=1.0).contains(&s.acceleration_chance) {
            return Err(ConfigError::Invalid(format!(
                "spawn.acceleration_chance must be within 0..=1 (got {})",
                s.acceleration_chance
            )));
        }
        if !self.play_area.left.is_finite() {
            return Err(ConfigError::Invalid("play_area.left must be finite".into()));
        }
        Ok(())
    }
}
