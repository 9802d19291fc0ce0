//! Output events for presentation, audio and persistence collaborators

use glam::Vec2;

use super::entity::{Category, EntityId};
use crate::highscores::RunRecord;

/// Semantic feedback mapped to sounds/haptics by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Bullet fired
    Shoot,
    /// Asteroid struck the unshielded ship
    Hit,
    /// Shield soaked up an asteroid
    ShieldBreak,
    /// Asteroid shot down
    Destroyed,
    /// Heart or shield picked up
    Collected,
    /// Run ended
    GameOver,
}

/// Something the outside world may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    EntitySpawned {
        id: EntityId,
        category: Category,
        pos: Vec2,
    },
    EntityRemoved {
        id: EntityId,
    },
    ScoreChanged(u64),
    LivesChanged(u8),
    ShieldChanged(bool),
    Feedback(Feedback),
    GameStarted,
    GameOverFinalized(RunRecord),
}

/// Events produced during ticks, drained by the host once per frame
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn feedback(&mut self, feedback: Feedback) {
        self.events.push(SimEvent::Feedback(feedback));
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Events not yet drained, oldest first
    pub fn pending(&self) -> &[SimEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
