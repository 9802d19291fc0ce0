//! Orbit Drift - A side-scrolling asteroid survival game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (spawning, motion, collisions, game state)
//! - `highscores`: Top-10 run leaderboard
//! - `settings`: Scene and control configuration

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, RunRecord};
pub use settings::{Settings, ShipMotion};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta a single tick will integrate
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Motion/contact passes per tick are at most SIM_DT long, up to this many
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default scene dimensions (44mm watch face, points)
    pub const SCENE_WIDTH: f32 = 184.0;
    pub const SCENE_HEIGHT: f32 = 224.0;

    /// Player ship
    pub const MAX_LIVES: u8 = 3;
    pub const SHIP_SIZE: f32 = 15.0;
    /// Horizontal ship position as a fraction of scene width
    pub const SHIP_X_FRACTION: f32 = 0.15;
    /// Input value the ship returns to on restart
    pub const SHIP_REST_POSITION: f32 = 0.5;
    /// Smoothed steering stops inside this distance
    pub const SHIP_DEAD_ZONE: f32 = 0.5;
    /// Default fraction of the gap closed per frame in smoothed steering
    pub const SHIP_SMOOTHING: f32 = 0.15;

    /// Asteroids
    pub const ASTEROID_SIZE: f32 = 20.0;
    pub const ASTEROID_SPEED: f32 = 150.0;
    /// Cosmetic spin (radians/sec)
    pub const ASTEROID_SPIN: f32 = 1.0;
    pub const ASTEROID_BASE_INTERVAL: f32 = 2.0;
    pub const ASTEROID_MIN_INTERVAL: f32 = 0.5;
    /// Score at which the asteroid interval has halved
    pub const ASTEROID_INTERVAL_SCORE_SCALE: f32 = 1000.0;
    /// Every this many points adds one asteroid per wave
    pub const ASTEROID_COUNT_SCORE_STEP: u64 = 500;
    /// Asteroids enter this far right (fraction of scene width)
    pub const ASTEROID_SPAWN_X_FRACTION: f32 = 1.5;

    /// Heart power-up
    pub const HEART_SIZE: f32 = 15.0;
    pub const HEART_SPEED: f32 = 100.0;
    pub const HEART_INTERVAL: f32 = 15.0;

    /// Shield power-up
    pub const SHIELD_SIZE: f32 = 15.0;
    pub const SHIELD_SPEED: f32 = 100.0;
    pub const SHIELD_INTERVAL: f32 = 20.0;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_SPEED: f32 = 300.0;
    /// Bullets leave the ship nose this far ahead of its center
    pub const BULLET_MUZZLE_OFFSET: f32 = 10.0;

    /// Scoring
    pub const PASSIVE_SCORE_PER_FRAME: u64 = 1;
    pub const ASTEROID_DESTROY_BONUS: u64 = 50;
    pub const HEART_BONUS: u64 = 100;
    pub const SHIELD_BONUS: u64 = 100;

    /// Seconds after game over before a restart is accepted
    pub const RESTART_DELAY: f32 = 1.0;
}

/// Visible scene extent. Origin bottom-left, y grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self {
            width: consts::SCENE_WIDTH,
            height: consts::SCENE_HEIGHT,
        }
    }
}

impl SceneBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Check whether two circles overlap (touching counts as a miss)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(3.0, 3.0), 1.0));
    }

    #[test]
    fn test_scene_center() {
        let bounds = SceneBounds::new(100.0, 50.0);
        assert_eq!(bounds.center(), Vec2::new(50.0, 25.0));
    }
}
