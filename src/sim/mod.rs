//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(dt)`
//! - Seeded (or injected) RNG only
//! - Stable iteration order (registration order)
//! - No rendering or input dependencies

pub mod collision;
pub mod events;
pub mod pool;
pub mod registry;
pub mod round;
pub mod state;
pub mod trajectory;

pub use collision::{Aabb, intersects};
pub use events::{GameEvent, LifecycleSink, Removal};
pub use pool::{EntityPool, PoolConfig, PresetOptions, VisualPreset};
pub use registry::FallingItemRegistry;
pub use round::RoundStateMachine;
pub use state::{EndReason, EntityHandle, EntityState, FallingEntity, RoundPhase, RoundState};
pub use trajectory::{DropProfile, ShiftKind, zigzag};
