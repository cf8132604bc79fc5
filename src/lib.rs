//! Fruit Catch - simulation core for a catch-the-falling-item arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (trajectories, collisions, pooling, round rules)
//! - `tuning`: Data-driven game balance
//! - `error`: Error types reported by the core

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, InvalidEntity, InvalidReason, PoolError, SpawnError};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Round length in seconds
    pub const ROUND_DURATION: f32 = 60.0;
    /// Lives at the start of every round
    pub const START_LIVES: u32 = 3;
    /// Seconds between spawns
    pub const SPAWN_INTERVAL: f32 = 3.0;

    /// Randomized drop speed range (units/sec)
    pub const DROP_SPEED_MIN: f32 = 30.0;
    pub const DROP_SPEED_MAX: f32 = 90.0;
    /// Acceleration applied to the occasional "heavy" item (units/sec²)
    pub const DROP_ACCELERATION: f32 = 50.0;
    /// Probability that a spawned item accelerates
    pub const ACCELERATION_CHANCE: f64 = 0.2;

    /// Play area defaults (portrait playfield)
    pub const PLAY_WIDTH: f32 = 720.0;
    pub const DROP_HEIGHT: f32 = 1280.0;

    /// Rendered item height; width follows the preset aspect ratio
    pub const ITEM_HEIGHT: f32 = 50.0;
    /// Preset that marks an item as a hazard
    pub const HAZARD_PRESET: &str = "mushroom";

    /// Triangular sway: half-period (distance units) and peak-to-peak amplitude
    pub const ZIGZAG_HALF_PERIOD: f32 = 100.0;
    pub const ZIGZAG_AMPLITUDE: f32 = 150.0;
}
