//! Spawn pacing and placement
//!
//! Pacing is a pure function of the elapsed timers, score and lives. Placement
//! draws from the session RNG so runs with the same seed look the same.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::SceneBounds;
use crate::consts::*;

/// Seconds elapsed since each spawn timer last fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    pub since_asteroid: f32,
    pub since_heart: f32,
    pub since_shield: f32,
}

impl SpawnClock {
    pub fn advance(&mut self, dt: f32) {
        self.since_asteroid += dt;
        self.since_heart += dt;
        self.since_shield += dt;
    }

    /// Restart the timers that fired in `decision`
    pub fn reset_fired(&mut self, decision: &SpawnDecision) {
        if decision.asteroids > 0 {
            self.since_asteroid = 0.0;
        }
        if decision.heart_timer_fired {
            self.since_heart = 0.0;
        }
        if decision.shield {
            self.since_shield = 0.0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What to create this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnDecision {
    /// Asteroids in this wave (0 = timer not due)
    pub asteroids: u32,
    /// Heart period elapsed (the timer restarts even when no heart is needed)
    pub heart_timer_fired: bool,
    pub heart: bool,
    pub shield: bool,
}

impl SpawnDecision {
    pub fn is_empty(&self) -> bool {
        self.asteroids == 0 && !self.heart && !self.shield
    }
}

/// What kind of entity a request creates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnKind {
    Asteroid { rotation: f32 },
    Heart,
    Shield,
}

/// A placed spawn, ready for the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: SpawnKind,
    pub pos: Vec2,
}

/// Seconds between asteroid waves at a given score
pub fn asteroid_interval(score: u64) -> f32 {
    let interval = ASTEROID_BASE_INTERVAL / (1.0 + score as f32 / ASTEROID_INTERVAL_SCORE_SCALE);
    interval.max(ASTEROID_MIN_INTERVAL)
}

/// Asteroids per wave at a given score (uncapped)
pub fn asteroid_count(score: u64) -> u32 {
    let extra = score / ASTEROID_COUNT_SCORE_STEP;
    1u32.saturating_add(u32::try_from(extra).unwrap_or(u32::MAX))
}

/// Spawn pacing rules
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnPolicy;

impl SpawnPolicy {
    /// Decide what spawns this frame. Timers fire once strictly past their interval.
    pub fn decide(&self, clock: &SpawnClock, score: u64, lives: u8) -> SpawnDecision {
        let asteroids = if clock.since_asteroid > asteroid_interval(score) {
            asteroid_count(score)
        } else {
            0
        };
        let heart_timer_fired = clock.since_heart > HEART_INTERVAL;
        SpawnDecision {
            asteroids,
            heart_timer_fired,
            // Never waste a heart at full health
            heart: heart_timer_fired && lives < MAX_LIVES,
            shield: clock.since_shield > SHIELD_INTERVAL,
        }
    }

    /// Turn a decision into positioned requests
    pub fn place<R: Rng>(
        &self,
        decision: &SpawnDecision,
        bounds: &SceneBounds,
        rng: &mut R,
    ) -> Vec<SpawnRequest> {
        let mut requests = Vec::with_capacity(decision.asteroids as usize + 2);

        for _ in 0..decision.asteroids {
            let y = random_in(rng, 0.0, bounds.height);
            requests.push(SpawnRequest {
                kind: SpawnKind::Asteroid {
                    rotation: rng.random_range(0.0..TAU),
                },
                pos: Vec2::new(bounds.width * ASTEROID_SPAWN_X_FRACTION, y),
            });
        }

        if decision.heart {
            let y = random_in(rng, HEART_SIZE, bounds.height - HEART_SIZE);
            requests.push(SpawnRequest {
                kind: SpawnKind::Heart,
                pos: Vec2::new(bounds.width + HEART_SIZE, y),
            });
        }

        if decision.shield {
            let y = random_in(rng, SHIELD_SIZE, bounds.height - SHIELD_SIZE);
            requests.push(SpawnRequest {
                kind: SpawnKind::Shield,
                pos: Vec2::new(bounds.width + SHIELD_SIZE, y),
            });
        }

        requests
    }
}

/// Uniform sample in `[lo, hi]`, collapsing to the midpoint for degenerate ranges
fn random_in<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        (lo + hi) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_asteroid_interval_curve() {
        assert_eq!(asteroid_interval(0), 2.0);
        assert!((asteroid_interval(1000) - 1.0).abs() < 1e-6);
        assert!((asteroid_interval(999) - 1.0005).abs() < 1e-3);
        assert_eq!(asteroid_interval(100_000), ASTEROID_MIN_INTERVAL);
    }

    #[test]
    fn test_asteroid_count_steps() {
        assert_eq!(asteroid_count(0), 1);
        assert_eq!(asteroid_count(499), 1);
        assert_eq!(asteroid_count(500), 2);
        assert_eq!(asteroid_count(1500), 3);
        assert_eq!(asteroid_count(u64::MAX), u32::MAX);
    }

    #[test]
    fn test_nothing_due_on_fresh_clock() {
        let decision = SpawnPolicy.decide(&SpawnClock::default(), 0, 3);
        assert!(decision.is_empty());
        assert!(!decision.heart_timer_fired);
    }

    #[test]
    fn test_asteroid_wave_fires_after_interval() {
        let clock = SpawnClock {
            since_asteroid: 2.01,
            ..Default::default()
        };
        assert_eq!(SpawnPolicy.decide(&clock, 0, 3).asteroids, 1);
        assert_eq!(SpawnPolicy.decide(&clock, 1500, 3).asteroids, 3);

        let exact = SpawnClock {
            since_asteroid: 2.0,
            ..Default::default()
        };
        assert_eq!(SpawnPolicy.decide(&exact, 0, 3).asteroids, 0);
    }

    #[test]
    fn test_heart_only_when_hurt() {
        let clock = SpawnClock {
            since_heart: 15.5,
            ..Default::default()
        };
        let full = SpawnPolicy.decide(&clock, 0, 3);
        assert!(full.heart_timer_fired);
        assert!(!full.heart);

        let hurt = SpawnPolicy.decide(&clock, 0, 2);
        assert!(hurt.heart);
    }

    #[test]
    fn test_shield_regardless_of_state() {
        let clock = SpawnClock {
            since_shield: 20.5,
            ..Default::default()
        };
        assert!(SpawnPolicy.decide(&clock, 0, 3).shield);
    }

    #[test]
    fn test_reset_fired_only_touches_due_timers() {
        let mut clock = SpawnClock {
            since_asteroid: 3.0,
            since_heart: 16.0,
            since_shield: 5.0,
        };
        let decision = SpawnPolicy.decide(&clock, 0, 3);
        clock.reset_fired(&decision);
        assert_eq!(clock.since_asteroid, 0.0);
        // Heart timer restarts even though no heart was requested
        assert_eq!(clock.since_heart, 0.0);
        assert_eq!(clock.since_shield, 5.0);
    }

    #[test]
    fn test_placement_bounds() {
        let bounds = SceneBounds::new(184.0, 224.0);
        let mut rng = Pcg32::seed_from_u64(7);
        let decision = SpawnDecision {
            asteroids: 20,
            heart_timer_fired: true,
            heart: true,
            shield: true,
        };
        let requests = SpawnPolicy.place(&decision, &bounds, &mut rng);
        assert_eq!(requests.len(), 22);

        for req in &requests {
            match req.kind {
                SpawnKind::Asteroid { rotation } => {
                    assert_eq!(req.pos.x, 276.0);
                    assert!((0.0..=224.0).contains(&req.pos.y));
                    assert!((0.0..TAU).contains(&rotation));
                }
                SpawnKind::Heart => {
                    assert_eq!(req.pos.x, 184.0 + HEART_SIZE);
                    assert!((HEART_SIZE..=224.0 - HEART_SIZE).contains(&req.pos.y));
                }
                SpawnKind::Shield => {
                    assert_eq!(req.pos.x, 184.0 + SHIELD_SIZE);
                    assert!((SHIELD_SIZE..=224.0 - SHIELD_SIZE).contains(&req.pos.y));
                }
            }
        }
    }

    #[test]
    fn test_placement_is_seeded() {
        let bounds = SceneBounds::default();
        let decision = SpawnDecision {
            asteroids: 3,
            ..Default::default()
        };
        let a = SpawnPolicy.place(&decision, &bounds, &mut Pcg32::seed_from_u64(42));
        let b = SpawnPolicy.place(&decision, &bounds, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_interval_non_increasing_and_floored(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(asteroid_interval(hi) <= asteroid_interval(lo));
            prop_assert!(asteroid_interval(hi) >= ASTEROID_MIN_INTERVAL);
            prop_assert!(asteroid_interval(lo) <= ASTEROID_BASE_INTERVAL);
        }

        #[test]
        fn prop_count_non_decreasing(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(asteroid_count(hi) >= asteroid_count(lo));
        }
    }
}
