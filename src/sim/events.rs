//! Typed lifecycle signalling
//!
//! The registry reports removals straight to a `LifecycleSink` passed in by
//! its owner; the removed item moves along with the call. Presentation code
//! gets a parallel stream of `GameEvent`s that carry only handles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EndReason, EntityHandle, FallingEntity};

/// Receives items as the registry removes them
pub trait LifecycleSink {
    /// Item reached the floor, or was swept by `stop()`
    fn boundary_exit(&mut self, entity: FallingEntity);
    /// Item entered the catch target
    fn caught(&mut self, entity: FallingEntity);
}

/// Which rule removed an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Removal {
    BoundaryExit,
    Caught,
}

/// Collects removals in order, for callers that handle them after the pass
impl LifecycleSink for Vec<(Removal, FallingEntity)> {
    fn boundary_exit(&mut self, entity: FallingEntity) {
        self.push((Removal::BoundaryExit, entity));
    }

    fn caught(&mut self, entity: FallingEntity) {
        self.push((Removal::Caught, entity));
    }
}

/// Fire-and-forget notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// New item at its release point
    Spawned {
        handle: EntityHandle,
        preset: String,
        hazard: bool,
        position: Vec2,
    },
    /// Missed item (or swept at round end)
    BoundaryExit { handle: EntityHandle },
    /// Item landed in the catch target
    Caught { handle: EntityHandle, hazard: bool },
    RoundEnded { reason: EndReason, score: u64 },
}

impl GameEvent {
    /// Item the event refers to, if any
    pub fn handle(&self) -> Option<EntityHandle> {
        match self {
            GameEvent::Spawned { handle, .. }
            | GameEvent::BoundaryExit { handle }
            | GameEvent::Caught { handle, .. } => Some(*handle),
            GameEvent::RoundEnded { .. } => None,
        }
    }
}
