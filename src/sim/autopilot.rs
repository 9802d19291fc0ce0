//! Idle/demo mode - a simple pilot that plays the game
//!
//! Dodges the nearest asteroid in the ship's lane, otherwise drifts toward a
//! useful pickup, and fires whenever something is lined up ahead.

use super::entity::{Entity, EntityKind, EntityRegistry};
use super::state::GameState;
use crate::consts::{ASTEROID_SIZE, MAX_LIVES};

/// How far ahead (scene units) the pilot reacts to asteroids
const LOOKAHEAD: f32 = 120.0;
/// Extra clearance kept around asteroids when dodging
const CLEARANCE: f32 = 4.0;
/// Frames between shots
const FIRE_INTERVAL: u64 = 12;

/// Steering and trigger for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotCommand {
    /// Normalized vertical target in [0, 1]
    pub vertical_position: f32,
    pub shoot: bool,
}

/// Decide where to fly and whether to fire
pub fn pilot(registry: &EntityRegistry, state: &GameState, frame: u64) -> PilotCommand {
    let ship = registry.ship();
    let height = registry.bounds().height.max(1.0);
    let lane = ship.radius + ASTEROID_SIZE / 2.0 + CLEARANCE;

    let ahead = |e: &&Entity| e.pos.x > ship.pos.x - ship.radius && e.pos.x < ship.pos.x + LOOKAHEAD;

    // Nearest asteroid that will pass through the ship's lane
    let threat = registry
        .entities()
        .iter()
        .filter(|e| matches!(e.kind, EntityKind::Asteroid { .. }))
        .filter(ahead)
        .filter(|e| (e.pos.y - ship.pos.y).abs() < lane)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let target_y = if let Some(asteroid) = threat {
        // Slip past on whichever side has more room
        let room_above = height - asteroid.pos.y;
        if room_above > asteroid.pos.y {
            asteroid.pos.y + lane + CLEARANCE
        } else {
            asteroid.pos.y - lane - CLEARANCE
        }
    } else {
        let wants = |e: &&Entity| match e.kind {
            EntityKind::Heart => state.lives() < MAX_LIVES,
            EntityKind::Shield => !state.shield_active(),
            _ => false,
        };
        registry
            .entities()
            .iter()
            .filter(wants)
            .filter(|e| e.pos.x > ship.pos.x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|pickup| pickup.pos.y)
            .unwrap_or(ship.pos.y)
    };

    let lined_up = registry.entities().iter().any(|e| {
        matches!(e.kind, EntityKind::Asteroid { .. })
            && e.pos.x > ship.pos.x
            && (e.pos.y - ship.pos.y).abs() < ASTEROID_SIZE / 2.0
    });

    PilotCommand {
        vertical_position: (target_y / height).clamp(0.0, 1.0),
        shoot: lined_up && frame % FIRE_INTERVAL == 0,
    }
}
