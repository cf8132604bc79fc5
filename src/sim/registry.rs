//! Falling item registry and per-frame tick
//!
//! Owns every item that is currently falling plus the optional catch zone.
//! Each frame moves items along their drop profile, then applies the two
//! removal rules in a fixed order: floor first, catch second. An item
//! removed by one rule is never tested against the other in the same pass.

use super::collision::{Aabb, intersects};
use super::events::LifecycleSink;
use super::state::{EntityHandle, EntityState, FallingEntity};
use crate::error::{InvalidEntity, InvalidReason};

#[derive(Debug, Default)]
pub struct FallingItemRegistry {
    /// Falling items in registration order
    active: Vec<FallingEntity>,
    /// Inside zone of the catch receptacle, in world space
    catch_target: Option<Aabb>,
    drop_height: f32,
    running: bool,
}

impl FallingItemRegistry {
    pub fn new(drop_height: f32) -> Self {
        Self {
            drop_height,
            ..Default::default()
        }
    }

    /// Ceiling the items fall from
    pub fn configure(&mut self, drop_height: f32) {
        self.drop_height = drop_height;
    }

    pub fn drop_height(&self) -> f32 {
        self.drop_height
    }

    /// Set (or move) the catch zone. Called again whenever the target moves.
    pub fn register_catch_target(&mut self, target: Aabb) {
        self.catch_target = Some(target);
    }

    /// Disable catching; items still exit at the floor
    pub fn clear_catch_target(&mut self) {
        self.catch_target = None;
    }

    pub fn catch_target(&self) -> Option<Aabb> {
        self.catch_target
    }

    /// Start tracking an item from its current position.
    ///
    /// The item's current x becomes its release column and its drop clock
    /// restarts from zero. Items without a usable profile or bounding box are
    /// handed back inside the error.
    pub fn register(&mut self, mut entity: FallingEntity) -> Result<EntityHandle, InvalidEntity> {
        let reason = if !entity.profile.is_usable() {
            Some(InvalidReason::UnusableProfile)
        } else if !entity.has_usable_bounds() {
            Some(InvalidReason::DegenerateBounds)
        } else {
            None
        };
        if let Some(reason) = reason {
            log::error!("Can't register entity {}: {}", entity.handle, reason);
            return Err(InvalidEntity { entity, reason });
        }

        entity.origin_x = entity.position.x;
        entity.elapsed = 0.0;
        entity.state = EntityState::Falling;
        let handle = entity.handle;
        self.active.push(entity);
        Ok(handle)
    }

    /// Stop tracking an item without raising an event. No-op if absent.
    pub fn unregister(&mut self, handle: EntityHandle) -> Option<FallingEntity> {
        let index = self.active.iter().position(|e| e.handle == handle)?;
        let mut entity = self.active.remove(index);
        entity.state = EntityState::Removed;
        Some(entity)
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Halt the simulation and sweep every active item out as a boundary
    /// exit, exactly once each. Items registered before `start()` are swept
    /// too; a second call finds nothing left.
    pub fn stop(&mut self, sink: &mut dyn LifecycleSink) {
        self.running = false;

        // Snapshot, then clear, then emit
        let swept = std::mem::take(&mut self.active);
        if !swept.is_empty() {
            log::debug!("Sweeping {} items on stop", swept.len());
        }
        for mut entity in swept {
            entity.state = EntityState::Removed;
            sink.boundary_exit(entity);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.active.iter().any(|e| e.handle == handle)
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&FallingEntity> {
        self.active.iter().find(|e| e.handle == handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FallingEntity> {
        self.active.iter()
    }

    /// Advance one frame. Each removed item is passed to `sink` exactly once
    /// and is gone from the active set when this returns.
    pub fn tick(&mut self, dt: f32, sink: &mut dyn LifecycleSink) {
        if !self.running {
            return;
        }

        let target = self.catch_target;
        let drop_height = self.drop_height;
        let items = std::mem::take(&mut self.active);
        let mut kept = Vec::with_capacity(items.len());

        for mut entity in items {
            if entity.position.y >= 0.0 {
                entity.advance(dt, drop_height);
            }

            if entity.position.y <= 0.0 {
                log::trace!("Entity {} hit the floor", entity.handle);
                entity.state = EntityState::Removed;
                sink.boundary_exit(entity);
                continue;
            }

            if let Some(target) = target
                && intersects(&entity.bounds(), &target)
            {
                log::trace!("Entity {} caught", entity.handle);
                entity.state = EntityState::Removed;
                sink.caught(entity);
                continue;
            }

            kept.push(entity);
        }

        self.active = kept;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::Removal;
    use crate::sim::trajectory::{DropProfile, ShiftKind};
    use glam::Vec2;

    type Log = Vec<(Removal, FallingEntity)>;

    fn item(slot: u32, speed: f32, x: f32, y: f32) -> FallingEntity {
        let mut e = FallingEntity::new(EntityHandle {
            slot,
            generation: 0,
        });
        e.profile = DropProfile::new(speed, 0.0, ShiftKind::None);
        e.size = Vec2::new(40.0, 50.0);
        e.position = Vec2::new(x, y);
        e
    }

    fn kinds(log: &Log) -> Vec<(Removal, u32)> {
        log.iter().map(|(r, e)| (*r, e.handle().slot)).collect()
    }

    #[test]
    fn test_tick_is_noop_when_stopped() {
        let mut reg = FallingItemRegistry::new(500.0);
        reg.register(item(0, 30.0, 0.0, 500.0)).unwrap();
        let mut log = Log::new();
        reg.tick(1.0, &mut log);
        assert!(log.is_empty());
        assert_eq!(reg.get(EntityHandle { slot: 0, generation: 0 }).unwrap().elapsed(), 0.0);
    }

    #[test]
    fn test_tick_moves_items() {
        let mut reg = FallingItemRegistry::new(500.0);
        reg.register(item(0, 30.0, 25.0, 500.0)).unwrap();
        reg.start();
        let mut log = Log::new();
        reg.tick(1.0, &mut log);
        reg.tick(1.0, &mut log);
        let e = reg.iter().next().unwrap();
        assert_eq!(e.position(), Vec2::new(25.0, 440.0));
        assert!(log.is_empty());
    }

    #[test]
    fn test_floor_exit_same_tick() {
        let mut reg = FallingItemRegistry::new(100.0);
        reg.register(item(0, 60.0, 0.0, 100.0)).unwrap();
        reg.start();
        let mut log = Log::new();
        reg.tick(1.0, &mut log);
        assert!(log.is_empty());
        // Crosses the floor during this tick and is flagged immediately
        reg.tick(1.0, &mut log);
        assert_eq!(kinds(&log), vec![(Removal::BoundaryExit, 0)]);
        assert!(reg.is_empty());
        assert_eq!(log[0].1.state(), EntityState::Removed);
    }

    #[test]
    fn test_catch() {
        let mut reg = FallingItemRegistry::new(500.0);
        reg.register(item(0, 30.0, 0.0, 500.0)).unwrap();
        reg.register(item(1, 30.0, 300.0, 500.0)).unwrap();
        reg.register_catch_target(Aabb::new(Vec2::new(-50.0, 400.0), Vec2::new(50.0, 480.0)));
        reg.start();
        let mut log = Log::new();
        reg.tick(1.0, &mut log);
        assert_eq!(kinds(&log), vec![(Removal::Caught, 0)]);
        assert_eq!(reg.len(), 1);
        assert!(!reg.contains(EntityHandle { slot: 0, generation: 0 }));
    }

    #[test]
    fn test_floor_beats_catch() {
        let mut reg = FallingItemRegistry::new(100.0);
        reg.register(item(0, 200.0, 0.0, 100.0)).unwrap();
        // Target straddles the floor so both rules would fire
        reg.register_catch_target(Aabb::new(Vec2::new(-50.0, -200.0), Vec2::new(50.0, 200.0)));
        reg.start();
        let mut log = Log::new();
        reg.tick(1.0, &mut log);
        assert_eq!(kinds(&log), vec![(Removal::BoundaryExit, 0)]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_no_target_no_catch() {
        let mut reg = FallingItemRegistry::new(500.0);
        reg.register(item(0, 30.0, 0.0, 500.0)).unwrap();
        reg.register_catch_target(Aabb::new(Vec2::new(-50.0, 400.0), Vec2::new(50.0, 480.0)));
        reg.clear_catch_target();
        reg.start();
        let mut log = Log::new();
        reg.tick(1.0, &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn test_register_rejects_invalid() {
        let mut reg = FallingItemRegistry::new(500.0);

        let mut bad = item(0, 30.0, 0.0, 500.0);
        bad.profile = DropProfile::new(f32::NAN, 0.0, ShiftKind::None);
        let err = reg.register(bad).unwrap_err();
        assert_eq!(err.reason, InvalidReason::UnusableProfile);

        let mut flat = item(1, 30.0, 0.0, 500.0);
        flat.size = Vec2::new(40.0, 0.0);
        let err = reg.register(flat).unwrap_err();
        assert_eq!(err.reason, InvalidReason::DegenerateBounds);
        assert_eq!(err.into_entity().handle().slot, 1);

        assert!(reg.is_empty());
    }

    #[test]
    fn test_register_resets_drop_clock() {
        let mut reg = FallingItemRegistry::new(500.0);
        let mut e = item(0, 30.0, 42.0, 500.0);
        e.elapsed = 9.0;
        let handle = reg.register(e).unwrap();
        let e = reg.get(handle).unwrap();
        assert_eq!(e.elapsed(), 0.0);
        assert_eq!(e.origin_x(), 42.0);
        assert_eq!(e.state(), EntityState::Falling);
    }

    #[test]
    fn test_unregister() {
        let mut reg = FallingItemRegistry::new(500.0);
        let h = reg.register(item(0, 30.0, 0.0, 500.0)).unwrap();
        assert!(reg.unregister(EntityHandle { slot: 9, generation: 0 }).is_none());
        let e = reg.unregister(h).unwrap();
        assert_eq!(e.state(), EntityState::Removed);
        assert!(reg.unregister(h).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_stop_sweeps_once() {
        let mut reg = FallingItemRegistry::new(500.0);
        for slot in 0..3 {
            reg.register(item(slot, 30.0, 0.0, 500.0)).unwrap();
        }
        reg.start();
        let mut log = Log::new();
        reg.stop(&mut log);
        assert_eq!(
            kinds(&log),
            vec![
                (Removal::BoundaryExit, 0),
                (Removal::BoundaryExit, 1),
                (Removal::BoundaryExit, 2)
            ]
        );
        assert!(reg.is_empty());
        assert!(!reg.is_running());

        // Idempotent
        reg.stop(&mut log);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_stop_sweeps_items_registered_while_stopped() {
        let mut reg = FallingItemRegistry::new(500.0);
        let h = reg.register(item(0, 30.0, 0.0, 500.0)).unwrap();
        assert!(!reg.is_running());

        let mut log = Log::new();
        reg.stop(&mut log);
        assert_eq!(kinds(&log), vec![(Removal::BoundaryExit, 0)]);
        assert!(reg.is_empty());
        assert!(!reg.contains(h));
    }

    #[test]
    fn test_removed_items_gone_next_frame() {
        let mut reg = FallingItemRegistry::new(100.0);
        reg.register(item(0, 150.0, 0.0, 100.0)).unwrap();
        reg.register(item(1, 10.0, 0.0, 100.0)).unwrap();
        reg.start();
        let mut log = Log::new();
        reg.tick(1.0, &mut log);
        assert_eq!(kinds(&log), vec![(Removal::BoundaryExit, 0)]);
        reg.tick(1.0, &mut log);
        assert_eq!(log.len(), 1);
        assert_eq!(reg.iter().map(|e| e.handle().slot).collect::<Vec<_>>(), vec![1]);
    }
}
