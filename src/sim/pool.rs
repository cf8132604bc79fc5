//! Falling item pool
//!
//! Items are created lazily, one at a time, and recycled through a free
//! list. Every slot carries a generation counter that moves on each `put`,
//! so presentation code can tell a recycled item from the one it was still
//! animating.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EntityHandle, EntityState, FallingEntity};
use super::trajectory::{DropProfile, ShiftKind};
use crate::error::{ConfigError, PoolError};
use crate::tuning::Tuning;

/// Sprite data an item can be dressed in. Only the aspect ratio matters here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualPreset {
    pub name: String,
    /// Source width (pixels)
    pub width: f32,
    /// Source height (pixels)
    pub height: f32,
}

impl VisualPreset {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    fn aspect_ratio(&self) -> Option<f32> {
        let ratio = self.width / self.height;
        (ratio.is_finite() && ratio > 0.0).then_some(ratio)
    }
}

/// Per-request overrides; anything left `None` is randomized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetOptions {
    pub preset: Option<String>,
    pub speed: Option<f32>,
    pub acceleration: Option<f32>,
    pub shift: Option<ShiftKind>,
}

/// Randomization ranges used when an option is unspecified
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub speed_min: f32,
    pub speed_max: f32,
    pub acceleration: f32,
    pub acceleration_chance: f64,
    pub item_height: f32,
    pub hazard_preset: String,
}

impl From<&Tuning> for PoolConfig {
    fn from(tuning: &Tuning) -> Self {
        Self {
            speed_min: tuning.spawn.speed_min,
            speed_max: tuning.spawn.speed_max,
            acceleration: tuning.spawn.acceleration,
            acceleration_chance: tuning.spawn.acceleration_chance,
            item_height: tuning.items.height,
            hazard_preset: tuning.items.hazard_preset.clone(),
        }
    }
}

impl PoolConfig {
    /// Ranges must be samplable; an empty speed range or a chance outside
    /// 0..=1 would panic inside the RNG
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed_min.is_finite() && self.speed_max.is_finite())
            || self.speed_min < 0.0
            || self.speed_min > self.speed_max
        {
            return Err(ConfigError::Invalid(format!(
                "speed range {}..{} is invalid",
                self.speed_min, self.speed_max
            )));
        }
        if !self.acceleration.is_finite() || self.acceleration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "acceleration must be >= 0 (got {})",
                self.acceleration
            )));
        }
        if !(0.0..=1.0).contains(&self.acceleration_chance) {
            return Err(ConfigError::Invalid(format!(
                "acceleration chance must be within 0..=1 (got {})",
                self.acceleration_chance
            )));
        }
        if !(self.item_height.is_finite() && self.item_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "item height must be > 0 (got {})",
                self.item_height
            )));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    checked_out: bool,
}

pub struct EntityPool {
    presets: Vec<VisualPreset>,
    config: PoolConfig,
    slots: Vec<Slot>,
    free: Vec<FallingEntity>,
}

impl EntityPool {
    pub fn new(presets: Vec<VisualPreset>, config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            presets,
            config,
            slots: Vec::new(),
            free: Vec::new(),
        })
    }

    /// Hand out a configured item, creating one if the free list is empty
    pub fn get<R: Rng>(
        &mut self,
        options: &PresetOptions,
        rng: &mut R,
    ) -> Result<FallingEntity, PoolError> {
        // Resolve the preset first so a failure never leaks a slot
        let preset = self.pick_preset(options.preset.as_deref(), rng)?;
        let ratio = preset.aspect_ratio().ok_or_else(|| {
            PoolError::Exhausted(format!("preset '{}' has degenerate dimensions", preset.name))
        })?;
        let preset_name = preset.name.clone();

        let mut entity = match self.free.pop() {
            Some(entity) => entity,
            None => self.create(),
        };
        if let Some(slot) = self.slots.get_mut(entity.handle.slot as usize) {
            slot.checked_out = true;
        }

        let profile = DropProfile::new(
            options
                .speed
                .unwrap_or_else(|| rng.random_range(self.config.speed_min..=self.config.speed_max)),
            options.acceleration.unwrap_or_else(|| {
                if rng.random_bool(self.config.acceleration_chance) {
                    self.config.acceleration
                } else {
                    0.0
                }
            }),
            options
                .shift
                .unwrap_or_else(|| ShiftKind::ALL[rng.random_range(0..ShiftKind::ALL.len())]),
        );

        entity.hazard = preset_name == self.config.hazard_preset;
        entity.preset = preset_name;
        entity.profile = profile;
        entity.size = Vec2::new(self.config.item_height * ratio, self.config.item_height);
        entity.origin_x = 0.0;
        entity.elapsed = 0.0;
        entity.position = Vec2::ZERO;
        entity.state = EntityState::Removed;
        Ok(entity)
    }

    /// Take an item back. Its handle goes stale immediately.
    ///
    /// Returns `false` (and drops the item) if it is stale or belongs to
    /// another pool.
    pub fn put(&mut self, mut entity: FallingEntity) -> bool {
        let handle = entity.handle;
        let Some(slot) = self.slots.get_mut(handle.slot as usize) else {
            log::warn!("Ignoring entity {} from another pool", handle);
            return false;
        };
        if !slot.checked_out || slot.generation != handle.generation {
            log::warn!("Ignoring stale entity {} (slot at v{})", handle, slot.generation);
            return false;
        }
        slot.checked_out = false;
        slot.generation = slot.generation.wrapping_add(1);
        entity.handle.generation = slot.generation;
        entity.state = EntityState::Removed;
        self.free.push(entity);
        true
    }

    /// Whether `handle` still names a live (checked out) item
    pub fn is_current(&self, handle: EntityHandle) -> bool {
        self.slots
            .get(handle.slot as usize)
            .is_some_and(|s| s.checked_out && s.generation == handle.generation)
    }

    /// Items ever created
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Items waiting for reuse
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn presets(&self) -> &[VisualPreset] {
        &self.presets
    }

    fn create(&mut self) -> FallingEntity {
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            checked_out: false,
        });
        log::debug!("Pool grew to {} items", self.slots.len());
        FallingEntity::new(EntityHandle {
            slot,
            generation: 0,
        })
    }

    fn pick_preset<R: Rng>(
        &self,
        name: Option<&str>,
        rng: &mut R,
    ) -> Result<&VisualPreset, PoolError> {
        if let Some(found) = name.and_then(|n| self.presets.iter().find(|p| p.name == n)) {
            return Ok(found);
        }
        if self.presets.is_empty() {
            return Err(PoolError::Exhausted("no visual presets configured".into()));
        }
        Ok(&self.presets[rng.random_range(0..self.presets.len())])
    }
}
