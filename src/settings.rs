//! Game settings and preferences
//!
//! Persisted as JSON next to the high score file. Every field has a default so
//! partial files load cleanly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SceneBounds;
use crate::consts::{RESTART_DELAY, SHIP_SMOOTHING};

/// How the ship follows the vertical input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShipMotion {
    /// Ship sits exactly at the latest input sample
    #[default]
    Direct,
    /// Ship closes `factor` of the remaining distance each frame
    Smoothed { factor: f32 },
}

impl ShipMotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipMotion::Direct => "Direct",
            ShipMotion::Smoothed { .. } => "Smoothed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Some(ShipMotion::Direct),
            "smoothed" | "smooth" => Some(ShipMotion::Smoothed {
                factor: SHIP_SMOOTHING,
            }),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Visible play area
    pub scene: SceneBounds,
    /// Ship steering model
    pub ship_motion: ShipMotion,
    /// Fixed RNG seed (random per session when absent)
    pub seed: Option<u64>,
    /// Debounce after game over before restart is accepted (seconds)
    pub restart_delay: f32,

    // === Headless demo ===
    /// Simulated seconds the autopilot demo plays
    pub demo_seconds: f32,
    /// Where the leaderboard is stored
    pub highscore_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene: SceneBounds::default(),
            ship_motion: ShipMotion::Direct,
            seed: None,
            restart_delay: RESTART_DELAY,

            demo_seconds: 120.0,
            highscore_path: PathBuf::from("orbit_drift_highscores.json"),
        }
    }
}

impl Settings {
    /// Settings with a fixed seed (tests, reproducible demos)
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Restart delay, never negative
    pub fn effective_restart_delay(&self) -> f32 {
        if self.restart_delay.is_finite() {
            self.restart_delay.max(0.0)
        } else {
            RESTART_DELAY
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
