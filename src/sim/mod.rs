//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform input:
//! - One `tick` per rendered frame, single-threaded
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Output is a stream of `SimEvent`s plus a pollable registry

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod events;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::{PilotCommand, pilot};
pub use collision::{CategoryPair, CollisionResolver, CollisionTable, Contact, Resolution};
pub use entity::{Category, Entity, EntityId, EntityKind, EntityRegistry};
pub use events::{EventLog, Feedback, SimEvent};
pub use spawn::{SpawnClock, SpawnDecision, SpawnPolicy, asteroid_count, asteroid_interval};
pub use state::{GameState, HitOutcome, difficulty_for_score};
pub use tick::{InputSlot, Phase, Simulation, TickInput};
