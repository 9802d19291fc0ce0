//! Game state and run bookkeeping
//!
//! Score, lives, difficulty and shield live here together with the transition
//! rules. Every mutation is a silent no-op while no run is in progress, which
//! swallows stray input after game over.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LIVES;
use crate::highscores::{HighScores, RunRecord};

/// Result of an unshielded asteroid strike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Lives remain, play goes on
    Continuing,
    /// Last life lost (or no run in progress)
    GameOver,
}

/// Difficulty for a given score: +0.1 per 10 points
#[inline]
pub fn difficulty_for_score(score: u64) -> f32 {
    1.0 + (score as f32 / 10.0) * 0.1
}

/// Per-session game state. Construct once and reuse across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    score: u64,
    lives: u8,
    difficulty: f32,
    shield_active: bool,
    running: bool,
    destroyed_asteroids: u32,
    collected_hearts: u32,
    collected_shields: u32,
    high_scores: HighScores,
    last_run: Option<RunRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(HighScores::new())
    }
}

impl GameState {
    /// Create an idle state seeded with previously persisted high scores
    pub fn new(high_scores: HighScores) -> Self {
        Self {
            score: 0,
            lives: MAX_LIVES,
            difficulty: 1.0,
            shield_active: false,
            running: false,
            destroyed_asteroids: 0,
            collected_hearts: 0,
            collected_shields: 0,
            high_scores,
            last_run: None,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn shield_active(&self) -> bool {
        self.shield_active
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn destroyed_asteroids(&self) -> u32 {
        self.destroyed_asteroids
    }

    pub fn collected_hearts(&self) -> u32 {
        self.collected_hearts
    }

    pub fn collected_shields(&self) -> u32 {
        self.collected_shields
    }

    /// Best score seen this session, updated while playing
    pub fn best_score(&self) -> u64 {
        self.high_scores.best_score
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// The most recently finished run
    pub fn last_run(&self) -> Option<RunRecord> {
        self.last_run
    }

    /// Begin a fresh run
    pub fn start_game(&mut self) {
        self.score = 0;
        self.lives = MAX_LIVES;
        self.difficulty = 1.0;
        self.shield_active = false;
        self.destroyed_asteroids = 0;
        self.collected_hearts = 0;
        self.collected_shields = 0;
        self.running = true;
        log::info!("Run started (best so far: {})", self.high_scores.best_score);
    }

    /// Add points to the score and recompute difficulty
    pub fn add_score(&mut self, points: u64) {
        if !self.running {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.difficulty = difficulty_for_score(self.score);
        self.high_scores.observe_score(self.score);
    }

    /// Lose a life to an asteroid. Ends the run on the last life.
    pub fn register_asteroid_hit(&mut self) -> HitOutcome {
        if !self.running {
            return HitOutcome::GameOver;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.end_game();
            HitOutcome::GameOver
        } else {
            HitOutcome::Continuing
        }
    }

    /// Regain a life, capped at the starting count
    pub fn add_life(&mut self) {
        if !self.running || self.lives >= MAX_LIVES {
            return;
        }
        self.lives += 1;
    }

    /// Raise the shield. Returns false if it was already up (no stacking).
    pub fn activate_shield(&mut self) -> bool {
        if !self.running || self.shield_active {
            return false;
        }
        self.shield_active = true;
        true
    }

    /// Drop the shield. Returns whether it was up.
    pub fn consume_shield(&mut self) -> bool {
        std::mem::replace(&mut self.shield_active, false)
    }

    pub fn record_destroyed_asteroid(&mut self) {
        if self.running {
            self.destroyed_asteroids += 1;
        }
    }

    pub fn record_collected_heart(&mut self) {
        if self.running {
            self.collected_hearts += 1;
        }
    }

    pub fn record_collected_shield(&mut self) {
        if self.running {
            self.collected_shields += 1;
        }
    }

    /// Freeze the run and file it into the leaderboard
    pub fn end_game(&mut self) -> Option<RunRecord> {
        if !self.running {
            return None;
        }
        self.running = false;

        let run = RunRecord {
            score: self.score,
            destroyed_asteroids: self.destroyed_asteroids,
            collected_hearts: self.collected_hearts,
        };
        let rank = self.high_scores.add_run(run);
        self.last_run = Some(run);

        match rank {
            Some(rank) => log::info!("Run over: score {} (rank #{})", run.score, rank),
            None => log::info!("Run over: score {}", run.score),
        }
        Some(run)
    }
}
