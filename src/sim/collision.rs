//! Collision detection and category-pair resolution
//!
//! Detection is circle-vs-circle between the ship or a bullet and every other
//! live entity, for pairs that have a rule in the table. All contacts of a frame are gathered first, then resolved in
//! discovery order; a contact whose entity was already consumed is skipped.

use std::collections::HashMap;

use super::entity::{Category, EntityId, EntityRegistry};
use super::events::{EventLog, Feedback, SimEvent};
use super::state::{GameState, HitOutcome};
use crate::circles_overlap;
use crate::consts::{ASTEROID_DESTROY_BONUS, HEART_BONUS, SHIELD_BONUS};

/// Unordered pair of categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryPair(Category, Category);

impl CategoryPair {
    pub fn new(a: Category, b: Category) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0 == category || self.1 == category
    }
}

/// What happens when a pair touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Asteroid meets the ship (shield decides the outcome)
    AsteroidStrike,
    /// Bullet meets asteroid
    AsteroidShot,
    /// Ship collects a heart
    HeartPickup,
    /// Ship collects a shield
    ShieldPickup,
}

/// Map from category pair to resolution. Pairs without an entry never collide.
#[derive(Debug, Clone)]
pub struct CollisionTable {
    rules: HashMap<CategoryPair, Resolution>,
}

impl Default for CollisionTable {
    fn default() -> Self {
        let rules = [
            (Category::Player, Category::Asteroid, Resolution::AsteroidStrike),
            (Category::Bullet, Category::Asteroid, Resolution::AsteroidShot),
            (Category::Player, Category::Heart, Resolution::HeartPickup),
            (Category::Player, Category::Shield, Resolution::ShieldPickup),
        ];
        Self {
            rules: rules
                .into_iter()
                .map(|(a, b, r)| (CategoryPair::new(a, b), r))
                .collect(),
        }
    }
}

impl CollisionTable {
    pub fn rule(&self, a: Category, b: Category) -> Option<Resolution> {
        self.rules.get(&CategoryPair::new(a, b)).copied()
    }
}

/// A detected overlap between two live entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
    pub resolution: Resolution,
}

/// Summary of one resolve pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub resolved: u32,
    pub skipped: u32,
    pub game_over: bool,
}

/// Detects contacts and applies their consequences
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    table: CollisionTable,
}

impl CollisionResolver {
    pub fn new(table: CollisionTable) -> Self {
        Self { table }
    }

    /// All overlapping pairs with a rule. Only the ship and bullets act, so
    /// drifting entities are never paired with each other. Order is ship
    /// first, then bullets by id, each against targets by ascending id.
    pub fn detect(&self, registry: &EntityRegistry) -> Vec<Contact> {
        let (actors, targets): (Vec<_>, Vec<_>) =
            registry.iter_all().partition(|e| is_actor(e.category()));
        let mut contacts = Vec::new();

        for a in &actors {
            for b in &targets {
                let Some(resolution) = self.table.rule(a.category(), b.category()) else {
                    continue;
                };
                if circles_overlap(a.pos, a.radius, b.pos, b.radius) {
                    contacts.push(Contact {
                        a: a.id,
                        b: b.id,
                        resolution,
                    });
                }
            }
        }

        contacts
    }

    /// Detect and resolve this frame's contacts. Stops once the run ends.
    pub fn resolve(
        &self,
        registry: &mut EntityRegistry,
        state: &mut GameState,
        events: &mut EventLog,
    ) -> ResolveReport {
        let mut report = ResolveReport::default();

        for contact in self.detect(registry) {
            if report.game_over {
                break;
            }
            if !(registry.contains(contact.a) && registry.contains(contact.b)) {
                report.skipped += 1;
                continue;
            }
            report.resolved += 1;
            if apply(contact, registry, state, events) == HitOutcome::GameOver {
                report.game_over = true;
            }
        }

        report
    }
}

fn is_actor(category: Category) -> bool {
    matches!(category, Category::Player | Category::Bullet)
}

/// The member of a contact that is not of `category`
fn counterpart(registry: &EntityRegistry, contact: Contact, category: Category) -> EntityId {
    let a_matches = registry
        .get(contact.a)
        .map(|e| e.category() == category)
        .unwrap_or(false);
    if a_matches { contact.b } else { contact.a }
}

fn apply(
    contact: Contact,
    registry: &mut EntityRegistry,
    state: &mut GameState,
    events: &mut EventLog,
) -> HitOutcome {
    match contact.resolution {
        Resolution::AsteroidStrike => {
            let asteroid = counterpart(registry, contact, Category::Player);
            registry.remove(asteroid, events);
            if state.consume_shield() {
                log::debug!("Shield absorbed asteroid #{}", asteroid.0);
                events.emit(SimEvent::ShieldChanged(false));
                events.feedback(Feedback::ShieldBreak);
                return HitOutcome::Continuing;
            }
            events.feedback(Feedback::Hit);
            let outcome = state.register_asteroid_hit();
            log::debug!("Asteroid #{} hit ship, {} lives left", asteroid.0, state.lives());
            outcome
        }
        Resolution::AsteroidShot => {
            registry.remove(contact.a, events);
            registry.remove(contact.b, events);
            state.add_score(ASTEROID_DESTROY_BONUS);
            state.record_destroyed_asteroid();
            events.feedback(Feedback::Destroyed);
            HitOutcome::Continuing
        }
        Resolution::HeartPickup => {
            let heart = counterpart(registry, contact, Category::Player);
            registry.remove(heart, events);
            state.add_life();
            state.add_score(HEART_BONUS);
            state.record_collected_heart();
            events.feedback(Feedback::Collected);
            HitOutcome::Continuing
        }
        Resolution::ShieldPickup => {
            let shield = counterpart(registry, contact, Category::Player);
            registry.remove(shield, events);
            if state.activate_shield() {
                events.emit(SimEvent::ShieldChanged(true));
            } else {
                log::debug!("Shield already up, pickup #{} absorbed", shield.0);
            }
            state.add_score(SHIELD_BONUS);
            state.record_collected_shield();
            events.feedback(Feedback::Collected);
            HitOutcome::Continuing
        }
    }
}
