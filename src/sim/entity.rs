//! Entities and the live entity registry
//!
//! The world scrolls one way: everything except bullets drifts left and is
//! culled once fully past the left edge. The ship is created once with the
//! registry and only ever repositioned.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{EventLog, SimEvent};
use crate::SceneBounds;
use crate::consts::*;

/// Stable entity handle, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Collision category of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Asteroid,
    Bullet,
    Heart,
    Shield,
}

/// Entity variant with per-kind data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    /// Rotation is cosmetic and ignored by collisions
    Asteroid { rotation: f32, spin: f32 },
    Bullet,
    Heart,
    /// Shield power-up pickup
    Shield,
}

impl EntityKind {
    pub fn category(&self) -> Category {
        match self {
            EntityKind::Ship => Category::Player,
            EntityKind::Asteroid { .. } => Category::Asteroid,
            EntityKind::Bullet => Category::Bullet,
            EntityKind::Heart => Category::Heart,
            EntityKind::Shield => Category::Shield,
        }
    }
}

/// A live entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Entity {
    #[inline]
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Full width of the entity, used as the off-screen margin
    #[inline]
    pub fn extent(&self) -> f32 {
        self.radius * 2.0
    }

    fn is_off_screen(&self, bounds: &SceneBounds) -> bool {
        match self.kind {
            EntityKind::Ship => false,
            EntityKind::Bullet => self.pos.x > bounds.width + self.extent(),
            _ => self.pos.x < -self.extent(),
        }
    }
}

/// All live entities of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    bounds: SceneBounds,
    ship: Entity,
    /// Non-ship entities, sorted by id
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityRegistry {
    /// Create a registry holding only the ship, centered vertically
    pub fn new(bounds: SceneBounds) -> Self {
        let ship = Entity {
            id: EntityId(1),
            kind: EntityKind::Ship,
            pos: Vec2::new(bounds.width * SHIP_X_FRACTION, bounds.height / 2.0),
            vel: Vec2::ZERO,
            radius: SHIP_SIZE / 2.0,
        };
        Self {
            bounds,
            ship,
            entities: Vec::new(),
            next_id: 2,
        }
    }

    pub fn bounds(&self) -> SceneBounds {
        self.bounds
    }

    pub fn ship(&self) -> &Entity {
        &self.ship
    }

    /// Non-ship entities in id order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Ship first, then everything else in id order
    pub fn iter_all(&self) -> impl Iterator<Item = &Entity> {
        std::iter::once(&self.ship).chain(self.entities.iter())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, category: Category) -> usize {
        self.iter_all().filter(|e| e.category() == category).count()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if id == self.ship.id {
            return Some(&self.ship);
        }
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        events: &mut EventLog,
    ) -> EntityId {
        let id = self.next_entity_id();
        let category = kind.category();
        // Ids only grow, so pushing keeps the list sorted
        self.entities.push(Entity {
            id,
            kind,
            pos,
            vel,
            radius,
        });
        events.emit(SimEvent::EntitySpawned { id, category, pos });
        log::debug!("Spawned {:?} #{} at ({:.1}, {:.1})", category, id.0, pos.x, pos.y);
        id
    }

    pub fn spawn_asteroid(&mut self, pos: Vec2, rotation: f32, events: &mut EventLog) -> EntityId {
        self.insert(
            EntityKind::Asteroid {
                rotation,
                spin: ASTEROID_SPIN,
            },
            pos,
            Vec2::new(-ASTEROID_SPEED, 0.0),
            ASTEROID_SIZE / 2.0,
            events,
        )
    }

    pub fn spawn_heart(&mut self, pos: Vec2, events: &mut EventLog) -> EntityId {
        self.insert(
            EntityKind::Heart,
            pos,
            Vec2::new(-HEART_SPEED, 0.0),
            HEART_SIZE / 2.0,
            events,
        )
    }

    pub fn spawn_shield(&mut self, pos: Vec2, events: &mut EventLog) -> EntityId {
        self.insert(
            EntityKind::Shield,
            pos,
            Vec2::new(-SHIELD_SPEED, 0.0),
            SHIELD_SIZE / 2.0,
            events,
        )
    }

    /// Fire a bullet from the ship's nose
    pub fn spawn_bullet(&mut self, events: &mut EventLog) -> EntityId {
        let pos = self.ship.pos + Vec2::new(BULLET_MUZZLE_OFFSET, 0.0);
        self.insert(
            EntityKind::Bullet,
            pos,
            Vec2::new(BULLET_SPEED, 0.0),
            BULLET_RADIUS,
            events,
        )
    }

    /// Remove an entity. The ship cannot be removed; unknown ids are ignored.
    pub fn remove(&mut self, id: EntityId, events: &mut EventLog) -> Option<Entity> {
        let index = self.index_of(id)?;
        let entity = self.entities.remove(index);
        events.emit(SimEvent::EntityRemoved { id });
        Some(entity)
    }

    /// Remove every non-ship entity
    pub fn clear(&mut self, events: &mut EventLog) {
        for entity in self.entities.drain(..) {
            events.emit(SimEvent::EntityRemoved { id: entity.id });
        }
    }

    /// Integrate motion and cull anything that left the scene
    pub fn step(&mut self, dt: f32, events: &mut EventLog) {
        for entity in &mut self.entities {
            entity.pos += entity.vel * dt;
            if let EntityKind::Asteroid { rotation, spin } = &mut entity.kind {
                *rotation = (*rotation + *spin * dt).rem_euclid(TAU);
            }
        }

        let bounds = self.bounds;
        self.entities.retain(|entity| {
            if entity.is_off_screen(&bounds) {
                events.emit(SimEvent::EntityRemoved { id: entity.id });
                false
            } else {
                true
            }
        });
    }

    /// Ship y for a normalized input sample, keeping the hull on screen
    pub fn ship_target_y(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let half = self.ship.radius.min(self.bounds.height / 2.0);
        (normalized * self.bounds.height).clamp(half, self.bounds.height - half)
    }

    /// Place the ship directly at the input sample
    pub fn set_ship_vertical_position(&mut self, normalized: f32) {
        if !normalized.is_finite() {
            return;
        }
        self.ship.pos.y = self.ship_target_y(normalized);
    }

    /// Move the ship a fraction of the way toward `target_y`
    pub fn move_ship_toward(&mut self, target_y: f32, factor: f32) {
        let distance = target_y - self.ship.pos.y;
        if distance.abs() < SHIP_DEAD_ZONE {
            return;
        }
        let half = self.ship.radius.min(self.bounds.height / 2.0);
        let y = self.ship.pos.y + distance * factor.clamp(0.0, 1.0);
        self.ship.pos.y = y.clamp(half, self.bounds.height - half);
    }

    /// Return the ship to its starting spot
    pub fn reset_ship(&mut self) {
        self.ship.pos = Vec2::new(
            self.bounds.width * SHIP_X_FRACTION,
            self.ship_target_y(SHIP_REST_POSITION),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (EntityRegistry, EventLog) {
        (EntityRegistry::new(SceneBounds::new(200.0, 100.0)), EventLog::new())
    }

    #[test]
    fn test_new_registry_has_only_ship() {
        let (reg, _) = registry();
        assert!(reg.is_empty());
        assert_eq!(reg.count(Category::Player), 1);
        assert_eq!(reg.ship().pos, Vec2::new(30.0, 50.0));
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let (mut reg, mut events) = registry();
        let a = reg.spawn_asteroid(Vec2::new(100.0, 10.0), 0.0, &mut events);
        let b = reg.spawn_heart(Vec2::new(100.0, 20.0), &mut events);
        reg.remove(a, &mut events);
        let c = reg.spawn_shield(Vec2::new(100.0, 30.0), &mut events);
        assert!(a < b && b < c);
        assert_ne!(a, reg.ship().id);
        assert!(!reg.contains(a));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_step_moves_leftward_at_kind_speed() {
        let (mut reg, mut events) = registry();
        let a = reg.spawn_asteroid(Vec2::new(150.0, 50.0), 0.0, &mut events);
        let h = reg.spawn_heart(Vec2::new(150.0, 50.0), &mut events);
        let s = reg.spawn_shield(Vec2::new(150.0, 50.0), &mut events);
        reg.step(0.5, &mut events);

        assert_eq!(reg.get(a).map(|e| e.pos.x), Some(75.0));
        assert_eq!(reg.get(h).map(|e| e.pos.x), Some(100.0));
        assert_eq!(reg.get(s).map(|e| e.pos.x), Some(100.0));
    }

    #[test]
    fn test_ship_is_not_integrated() {
        let (mut reg, mut events) = registry();
        let before = reg.ship().pos;
        reg.step(1.0, &mut events);
        assert_eq!(reg.ship().pos, before);
    }

    #[test]
    fn test_bullet_flies_right_from_ship() {
        let (mut reg, mut events) = registry();
        let id = reg.spawn_bullet(&mut events);
        let start = reg.get(id).map(|e| e.pos).unwrap_or_default();
        assert_eq!(start, reg.ship().pos + Vec2::new(BULLET_MUZZLE_OFFSET, 0.0));

        reg.step(0.1, &mut events);
        let moved = reg.get(id).map(|e| e.pos).unwrap_or_default();
        assert!((moved.x - start.x - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_culls_past_left_edge_by_extent() {
        let (mut reg, mut events) = registry();
        // Asteroid radius 10, extent 20
        let id = reg.spawn_asteroid(Vec2::new(-10.0, 50.0), 0.0, &mut events);
        reg.step(0.0, &mut events);
        assert!(reg.contains(id));

        events.drain();
        reg.step(0.1, &mut events);
        assert!(!reg.contains(id));
        assert_eq!(events.drain(), vec![SimEvent::EntityRemoved { id }]);
    }

    #[test]
    fn test_culls_bullet_past_right_edge() {
        let (mut reg, mut events) = registry();
        let id = reg.spawn_bullet(&mut events);
        reg.step(1.0, &mut events);
        assert!(!reg.contains(id));
    }

    #[test]
    fn test_ship_position_clamped_to_hull() {
        let (mut reg, _) = registry();
        reg.set_ship_vertical_position(0.0);
        assert_eq!(reg.ship().pos.y, SHIP_SIZE / 2.0);
        reg.set_ship_vertical_position(1.0);
        assert_eq!(reg.ship().pos.y, 100.0 - SHIP_SIZE / 2.0);
        reg.set_ship_vertical_position(7.0);
        assert_eq!(reg.ship().pos.y, 100.0 - SHIP_SIZE / 2.0);
        reg.set_ship_vertical_position(0.25);
        assert_eq!(reg.ship().pos.y, 25.0);
        reg.set_ship_vertical_position(f32::NAN);
        assert_eq!(reg.ship().pos.y, 25.0);
    }

    #[test]
    fn test_smoothed_ship_motion() {
        let (mut reg, _) = registry();
        // Ship starts at y=50
        reg.move_ship_toward(90.0, 0.25);
        assert_eq!(reg.ship().pos.y, 60.0);
        // Inside dead zone: no movement
        reg.move_ship_toward(60.2, 0.25);
        assert_eq!(reg.ship().pos.y, 60.0);
    }

    #[test]
    fn test_clear_keeps_ship() {
        let (mut reg, mut events) = registry();
        reg.spawn_asteroid(Vec2::new(100.0, 10.0), 0.0, &mut events);
        reg.spawn_bullet(&mut events);
        events.drain();

        reg.clear(&mut events);
        assert!(reg.is_empty());
        assert_eq!(events.len(), 2);
        assert!(reg.get(reg.ship().id).is_some());
    }

    #[test]
    fn test_remove_unknown_or_ship_is_noop() {
        let (mut reg, mut events) = registry();
        let ship = reg.ship().id;
        assert!(reg.remove(ship, &mut events).is_none());
        assert!(reg.remove(EntityId(999), &mut events).is_none());
        assert!(events.is_empty());
    }
}
