//! Simulation state types
//!
//! Falling items and the per-round scoreboard. Items are plain owned values:
//! the pool hands one out, the registry owns it while it falls, and it goes
//! back to the pool once removed.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::trajectory::DropProfile;

/// Stable identity of a pooled item.
///
/// `generation` changes every time the slot goes back to the pool, so a handle
/// kept by presentation code after the item was removed never matches the
/// next item that reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle {
    pub slot: u32,
    pub generation: u32,
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.slot, self.generation)
    }
}

/// Lifecycle of a falling item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    /// Active in the registry
    Falling,
    /// Left play (missed or caught); owned by whoever handles the event
    Removed,
}

/// A falling item
#[derive(Debug, Serialize)]
pub struct FallingEntity {
    pub(crate) handle: EntityHandle,
    /// Visual preset name (sprite identity for the presentation layer)
    pub(crate) preset: String,
    pub(crate) hazard: bool,
    pub(crate) profile: DropProfile,
    /// Width/height of the bounding box, anchored bottom-centre
    pub(crate) size: Vec2,
    /// Horizontal release coordinate
    pub(crate) origin_x: f32,
    /// Seconds spent falling
    pub(crate) elapsed: f32,
    /// Bottom-centre of the item in world space
    pub(crate) position: Vec2,
    pub(crate) state: EntityState,
}

impl FallingEntity {
    pub(crate) fn new(handle: EntityHandle) -> Self {
        Self {
            handle,
            preset: String::new(),
            hazard: false,
            profile: DropProfile::new(0.0, 0.0, Default::default()),
            size: Vec2::ZERO,
            origin_x: 0.0,
            elapsed: 0.0,
            position: Vec2::ZERO,
            state: EntityState::Removed,
        }
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn preset(&self) -> &str {
        &self.preset
    }

    /// Costs a life when caught instead of scoring
    pub fn is_hazard(&self) -> bool {
        self.hazard
    }

    pub fn profile(&self) -> &DropProfile {
        &self.profile
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn origin_x(&self) -> f32 {
        self.origin_x
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    /// Move the item (before registration this sets its release point)
    pub fn place_at(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Current world-space bounding box
    pub fn bounds(&self) -> Aabb {
        Aabb::from_bottom_center(self.position, self.size)
    }

    /// Whether the bounding box can take part in a catch test
    pub fn has_usable_bounds(&self) -> bool {
        self.size.is_finite()
            && self.size.x > 0.0
            && self.size.y > 0.0
            && self.position.is_finite()
    }

    /// Advance the drop clock and recompute position
    pub(crate) fn advance(&mut self, dt: f32, drop_height: f32) {
        self.elapsed += dt;
        self.position = self.profile.position(self.elapsed, self.origin_x, drop_height);
    }
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Never started
    #[default]
    Idle,
    /// Clock running, items falling
    Running,
    /// Out of time or out of lives; waits for restart
    Ended,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    OutOfLives,
}

/// Per-round scoreboard (ephemeral, never persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u64,
    pub lives: u32,
    /// Score added by the next catch; grows with each consecutive catch
    pub multiplier: u32,
    /// Seconds played, clamped to the round duration
    pub elapsed: f32,
    /// Time since the last spawn, remainder carried across spawns
    pub spawn_accumulator: f32,
    pub phase: RoundPhase,
    /// Set once the round has ended
    pub end_reason: Option<EndReason>,
}

impl RoundState {
    pub fn new(start_lives: u32) -> Self {
        Self {
            score: 0,
            lives: start_lives,
            multiplier: 1,
            elapsed: 0.0,
            spawn_accumulator: 0.0,
            phase: RoundPhase::Idle,
            end_reason: None,
        }
    }

    /// Fresh running round
    pub fn reset(&mut self, start_lives: u32) {
        *self = Self::new(start_lives);
        self.phase = RoundPhase::Running;
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Finish the round; phase and reason always change together
    pub fn end(&mut self, reason: EndReason) {
        self.phase = RoundPhase::Ended;
        self.end_reason = Some(reason);
    }
}
