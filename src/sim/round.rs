//! Round state machine
//!
//! `RoundStateMachine` is the one context object the game loop holds. It owns
//! the registry, the pool and the RNG, turns registry removals into score,
//! lives and multiplier changes within the same frame, and drives spawning.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::events::{GameEvent, LifecycleSink};
use super::pool::{EntityPool, PoolConfig, PresetOptions, VisualPreset};
use super::registry::FallingItemRegistry;
use super::state::{EndReason, EntityHandle, FallingEntity, RoundPhase, RoundState};
use crate::error::{ConfigError, SpawnError};
use crate::tuning::Tuning;

/// Applies scoring rules to removals while the registry is mid-pass
struct RoundRules<'a> {
    state: &'a mut RoundState,
    pool: &'a mut EntityPool,
    events: &'a mut Vec<GameEvent>,
}

impl LifecycleSink for RoundRules<'_> {
    fn boundary_exit(&mut self, entity: FallingEntity) {
        let handle = entity.handle();
        if !self.pool.put(entity) {
            log::error!("Entity {} left play but could not be recycled", handle);
        }
        self.state.multiplier = 1;
        self.events.push(GameEvent::BoundaryExit { handle });
    }

    fn caught(&mut self, entity: FallingEntity) {
        let handle = entity.handle();
        let hazard = entity.is_hazard();
        if !self.pool.put(entity) {
            log::error!("Entity {} was caught but could not be recycled", handle);
        }
        self.events.push(GameEvent::Caught { handle, hazard });

        // Lives ran out earlier in this pass; the item is only recycled
        if !self.state.is_running() {
            return;
        }

        if hazard {
            self.state.lives = self.state.lives.saturating_sub(1);
            self.state.multiplier = 1;
            if self.state.lives == 0 {
                self.state.end(EndReason::OutOfLives);
            }
        } else {
            self.state.score += u64::from(self.state.multiplier);
            self.state.multiplier += 1;
        }
    }
}

pub struct RoundStateMachine<R: Rng = Pcg32> {
    tuning: Tuning,
    state: RoundState,
    registry: FallingItemRegistry,
    pool: EntityPool,
    rng: R,
    events: Vec<GameEvent>,
}

impl RoundStateMachine<Pcg32> {
    /// Round driven by a seeded PCG generator
    pub fn new(
        tuning: Tuning,
        presets: Vec<VisualPreset>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(tuning, presets, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> RoundStateMachine<R> {
    /// Round driven by any generator (tests inject fixed sequences here).
    /// Tuning that can't drive a round is refused up front.
    pub fn with_rng(
        tuning: Tuning,
        presets: Vec<VisualPreset>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let pool = EntityPool::new(presets, PoolConfig::from(&tuning))?;
        let registry = FallingItemRegistry::new(tuning.play_area.drop_height);
        let state = RoundState::new(tuning.round.start_lives);
        Ok(Self {
            tuning,
            state,
            registry,
            pool,
            rng,
            events: Vec::new(),
        })
    }

    /// Begin a fresh round from any phase
    pub fn restart(&mut self) {
        // Items still falling leave as misses
        self.stop_registry();
        self.registry.configure(self.tuning.play_area.drop_height);
        self.state.reset(self.tuning.round.start_lives);
        log::info!(
            "Round started ({}s, {} lives)",
            self.tuning.round.duration,
            self.state.lives
        );

        if self.tuning.round.spawn_on_start {
            self.spawn_logged();
        }
        self.registry.start();
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32) {
        if !self.state.is_running() {
            self.stop_registry();
            return;
        }

        self.state.elapsed = (self.state.elapsed + dt).min(self.tuning.round.duration);

        self.state.spawn_accumulator += dt;
        while self.state.spawn_accumulator >= self.tuning.spawn.interval {
            self.state.spawn_accumulator -= self.tuning.spawn.interval;
            self.spawn_logged();
        }

        let mut rules = RoundRules {
            state: &mut self.state,
            pool: &mut self.pool,
            events: &mut self.events,
        };
        self.registry.tick(dt, &mut rules);

        // Hazard catches may already have ended the round mid-pass
        if self.state.is_running() {
            let reason = if self.state.elapsed >= self.tuning.round.duration {
                Some(EndReason::TimeUp)
            } else if self.state.lives == 0 {
                Some(EndReason::OutOfLives)
            } else {
                None
            };
            if let Some(reason) = reason {
                self.state.end(reason);
            }
        }

        // Running at the top of this frame, so an end reason here is new
        if let Some(reason) = self.state.end_reason {
            // Sweep first so RoundEnded is the last event of the frame
            self.stop_registry();
            log::info!(
                "Round ended ({:?}) at {:.2}s: score {}, lives {}",
                reason,
                self.state.elapsed,
                self.state.score,
                self.state.lives
            );
            self.events.push(GameEvent::RoundEnded {
                reason,
                score: self.state.score,
            });
        }
    }

    /// Drop one randomized item
    pub fn spawn(&mut self) -> Result<EntityHandle, SpawnError> {
        self.spawn_with(&PresetOptions::default())
    }

    /// Drop one item at a random column along the ceiling, fully inside the
    /// play area
    pub fn spawn_with(&mut self, options: &PresetOptions) -> Result<EntityHandle, SpawnError> {
        if !self.state.is_running() {
            return Err(SpawnError::NotRunning);
        }
        let mut entity = self.pool.get(options, &mut self.rng)?;

        let area = &self.tuning.play_area;
        let half_width = entity.size().x / 2.0;
        let free_span = (area.width - 2.0 * half_width).max(0.0);
        let x = area.left + half_width + self.rng.random::<f32>() * free_span;
        entity.place_at(Vec2::new(x, area.drop_height));

        let preset = entity.preset().to_string();
        let hazard = entity.is_hazard();
        match self.registry.register(entity) {
            Ok(handle) => {
                log::debug!("Spawned {} '{}' at x={:.1}", handle, preset, x);
                self.events.push(GameEvent::Spawned {
                    handle,
                    preset,
                    hazard,
                    position: Vec2::new(x, area.drop_height),
                });
                Ok(handle)
            }
            Err(rejected) => {
                let reason = rejected.reason;
                let entity = rejected.into_entity();
                let handle = entity.handle();
                if !self.pool.put(entity) {
                    log::error!("Rejected entity {} could not be recycled", handle);
                }
                Err(SpawnError::Rejected { handle, reason })
            }
        }
    }

    /// Place (or move) the catch zone
    pub fn set_catch_target(&mut self, target: Aabb) {
        self.registry.register_catch_target(target);
    }

    pub fn clear_catch_target(&mut self) {
        self.registry.clear_catch_target();
    }

    /// Take queued presentation events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    /// Seconds left on the round clock
    pub fn remaining_time(&self) -> f32 {
        (self.tuning.round.duration - self.state.elapsed).max(0.0)
    }

    pub fn registry(&self) -> &FallingItemRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn spawn_logged(&mut self) {
        if let Err(e) = self.spawn() {
            log::warn!("Spawn skipped: {}", e);
        }
    }

    fn stop_registry(&mut self) {
        let mut rules = RoundRules {
            state: &mut self.state,
            pool: &mut self.pool,
            events: &mut self.events,
        };
        self.registry.stop(&mut rules);
    }
}
