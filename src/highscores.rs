//! High score leaderboard system
//!
//! Tracks the top 10 finished runs plus the best score ever seen. Durable storage
//! is a JSON file owned by the host; the simulation only holds the in-memory copy.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Outcome of one finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Final score
    pub score: u64,
    /// Asteroids shot down during the run
    pub destroyed_asteroids: u32,
    /// Hearts picked up during the run
    pub collected_hearts: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Sorted descending by score, at most `MAX_HIGH_SCORES` long
    pub entries: Vec<RunRecord>,
    /// Best single score, including runs still in progress
    #[serde(default)]
    pub best_score: u64,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            best_score: 0,
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a finished run to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_run(&mut self, run: RunRecord) -> Option<usize> {
        self.observe_score(run.score);
        if !self.qualifies(run.score) {
            return None;
        }

        // Equal scores keep arrival order
        let pos = self.entries.iter().position(|e| run.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, run);
                i + 1
            }
            None => {
                self.entries.push(run);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Raise the running best score
    pub fn observe_score(&mut self, score: u64) {
        if score > self.best_score {
            self.best_score = score;
        }
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Scores only, in leaderboard order
    pub fn scores(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.score).collect()
    }

    /// Load high scores from a JSON file, starting fresh when missing or unreadable
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No high scores at {} ({}), starting fresh", path.display(), e);
                return Self::new();
            }
        };

        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.normalize();
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high score file {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Save high scores to a JSON file
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Restore ordering and bounds on data from outside
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        let top = self.top_score().unwrap_or(0);
        self.observe_score(top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> RunRecord {
        RunRecord {
            score,
            destroyed_asteroids: 0,
            collected_hearts: 0,
        }
    }

    #[test]
    fn test_add_run_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_run(run(100)), Some(1));
        assert_eq!(scores.add_run(run(300)), Some(1));
        assert_eq!(scores.add_run(run(200)), Some(2));
        assert_eq!(scores.scores(), vec![300, 200, 100]);
        assert_eq!(scores.best_score, 300);
    }

    #[test]
    fn test_leaderboard_truncates_to_ten() {
        let mut scores = HighScores::new();
        for s in 1..=15 {
            scores.add_run(run(s * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(150));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(60));

        // Too low to place
        assert!(!scores.qualifies(60));
        assert_eq!(scores.add_run(run(5)), None);
        assert_eq!(scores.add_run(run(1000)), Some(1));
    }

    #[test]
    fn test_zero_score_is_recorded_while_room_remains() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_run(run(0)), Some(1));
        assert_eq!(scores.scores(), vec![0]);
    }

    #[test]
    fn test_load_missing_file_starts_fresh() {
        let path = std::env::temp_dir().join("orbit-drift-missing-highscores.json");
        let _ = fs::remove_file(&path);
        assert!(HighScores::load(&path).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "orbit-drift-highscores-{}.json",
            std::process::id()
        ));
        let mut scores = HighScores::new();
        scores.add_run(RunRecord {
            score: 420,
            destroyed_asteroids: 3,
            collected_hearts: 1,
        });
        scores.save(&path).expect("save should succeed");

        let loaded = HighScores::load(&path);
        assert_eq!(loaded.entries, scores.entries);
        assert_eq!(loaded.best_score, 420);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_sorts_unsorted_file() {
        let path = std::env::temp_dir().join(format!(
            "orbit-drift-unsorted-{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{"entries":[{"score":1,"destroyed_asteroids":0,"collected_hearts":0},
                           {"score":9,"destroyed_asteroids":0,"collected_hearts":0}]}"#,
        )
        .expect("write fixture");
        let loaded = HighScores::load(&path);
        assert_eq!(loaded.scores(), vec![9, 1]);
        assert_eq!(loaded.best_score, 9);
        let _ = fs::remove_file(&path);
    }
}
