//! Errors reported by the simulation core
//!
//! None of these are fatal: a rejected item is skipped, a pool failure
//! skips one spawn, and bad tuning is refused before a round is built.

use thiserror::Error;

use crate::sim::state::{EntityHandle, FallingEntity};

/// Why an item can't be registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("motion profile is not usable")]
    UnusableProfile,
    #[error("bounding box is degenerate")]
    DegenerateBounds,
}

/// Registration refused. The item is handed back so it can be pooled.
#[derive(Debug, Error)]
#[error("invalid entity {}: {reason}", .entity.handle)]
pub struct InvalidEntity {
    pub entity: FallingEntity,
    pub reason: InvalidReason,
}

impl InvalidEntity {
    pub fn into_entity(self) -> FallingEntity {
        self.entity
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// A new item couldn't be set up
    #[error("entity pool exhausted: {0}")]
    Exhausted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Items only drop while the round clock runs
    #[error("round is not running")]
    NotRunning,
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("spawned entity {handle} rejected: {reason}")]
    Rejected {
        handle: EntityHandle,
        reason: InvalidReason,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}
