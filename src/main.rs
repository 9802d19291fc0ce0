//! Orbit Drift headless entry point
//!
//! Plays autopilot runs for the configured number of simulated seconds, logs
//! every finished run and persists the leaderboard.
//!
//! Usage: `orbit-drift [settings.json] [direct|smoothed]`

use std::path::PathBuf;

use orbit_drift::consts::SIM_DT;
use orbit_drift::sim::{SimEvent, Simulation, TickInput};
use orbit_drift::{HighScores, Settings, ShipMotion};

fn main() {
    env_logger::init();
    log::info!("Orbit Drift (headless) starting...");

    let mut args = std::env::args().skip(1);
    let mut settings = match args.next() {
        Some(path) => Settings::load(&PathBuf::from(path)),
        None => Settings::default(),
    };
    if let Some(mode) = args.next() {
        match ShipMotion::from_str(&mode) {
            Some(motion) => settings.ship_motion = motion,
            None => log::warn!(
                "Unknown steering mode '{}', keeping {}",
                mode,
                settings.ship_motion.as_str()
            ),
        }
    }
    let highscore_path = settings.highscore_path.clone();
    let frames = (settings.demo_seconds.max(0.0) / SIM_DT).round() as u64;

    let mut sim = Simulation::new(settings, HighScores::load(&highscore_path));
    let input = TickInput {
        autopilot: true,
        restart: true,
        ..Default::default()
    };

    let mut runs = 0u32;
    for _ in 0..frames {
        sim.tick(&input, SIM_DT);

        for event in sim.drain_events() {
            match event {
                SimEvent::GameOverFinalized(run) => {
                    runs += 1;
                    println!(
                        "Run {:>3}: score {:>6}  asteroids {:>3}  hearts {:>2}",
                        runs, run.score, run.destroyed_asteroids, run.collected_hearts
                    );
                }
                other => log::trace!("{:?}", other),
            }
        }
    }

    let state = sim.state();
    if state.is_running() {
        println!("Unfinished run: score {}", state.score());
    }
    println!("\nHigh scores (best {}):", state.best_score());
    for (rank, entry) in state.high_scores().entries.iter().enumerate() {
        println!("{:>3}. {}", rank + 1, entry.score);
    }

    if let Err(e) = state.high_scores().save(&highscore_path) {
        log::warn!("Could not save high scores to {}: {}", highscore_path.display(), e);
    }
}
