//! Per-frame simulation driver
//!
//! Owns every simulation component and advances them in a fixed order once per
//! rendered frame. Input is sampled at the start of the tick; nothing inside a
//! tick blocks.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::autopilot::pilot;
use super::collision::CollisionResolver;
use super::entity::EntityRegistry;
use super::events::{EventLog, Feedback, SimEvent};
use super::spawn::{SpawnClock, SpawnKind, SpawnPolicy};
use super::state::GameState;
use crate::consts::*;
use crate::highscores::HighScores;
use crate::settings::{Settings, ShipMotion};

/// Where the run lifecycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Session open, waiting for the first start
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended; restart is accepted once the debounce has elapsed
    GameOver,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Latest normalized vertical position (None keeps the previous sample)
    pub vertical_position: Option<f32>,
    /// Fire a bullet
    pub shoot: bool,
    /// Start a new run (first start or after game over)
    pub restart: bool,
    /// Idle/demo mode - the autopilot flies the ship
    pub autopilot: bool,
}

/// Single-slot, latest-value input handoff between an input thread and the
/// simulation thread. Vertical samples overwrite; intents latch until taken.
#[derive(Debug, Clone, Default)]
pub struct InputSlot {
    inner: Arc<Mutex<TickInput>>,
}

impl InputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut TickInput) -> T) -> T {
        // A panicked writer cannot leave a TickInput half-updated
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn set_vertical_position(&self, value: f32) {
        self.with(|input| input.vertical_position = Some(value));
    }

    pub fn shoot(&self) {
        self.with(|input| input.shoot = true);
    }

    pub fn restart(&self) {
        self.with(|input| input.restart = true);
    }

    pub fn set_autopilot(&self, enabled: bool) {
        self.with(|input| input.autopilot = enabled);
    }

    /// Snapshot for this tick, clearing one-shot intents
    pub fn take(&self) -> TickInput {
        self.with(|input| {
            let snapshot = input.clone();
            input.shoot = false;
            input.restart = false;
            snapshot
        })
    }
}

/// The game session: state machine plus all simulation components
#[derive(Debug)]
pub struct Simulation {
    settings: Settings,
    seed: u64,
    rng: Pcg32,
    state: GameState,
    registry: EntityRegistry,
    clock: SpawnClock,
    policy: SpawnPolicy,
    resolver: CollisionResolver,
    phase: Phase,
    /// Seconds left before a restart is honored
    restart_cooldown: f32,
    /// Latest normalized vertical input
    ship_input: f32,
    /// Running frames since session start
    frame: u64,
    events: EventLog,
}

impl Simulation {
    /// Open a session with previously persisted high scores
    pub fn new(settings: Settings, high_scores: HighScores) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random::<u64>);
        log::info!(
            "Session seed {} ({}x{} scene, {} steering)",
            seed,
            settings.scene.width,
            settings.scene.height,
            settings.ship_motion.as_str()
        );
        Self {
            registry: EntityRegistry::new(settings.scene),
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            state: GameState::new(high_scores),
            clock: SpawnClock::default(),
            policy: SpawnPolicy,
            resolver: CollisionResolver::default(),
            phase: Phase::NotStarted,
            restart_cooldown: 0.0,
            ship_input: SHIP_REST_POSITION,
            frame: 0,
            events: EventLog::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// True once the post-game-over debounce has elapsed
    pub fn can_restart(&self) -> bool {
        match self.phase {
            Phase::NotStarted => true,
            Phase::Running => false,
            Phase::GameOver => self.restart_cooldown <= 0.0,
        }
    }

    /// Events produced since the last drain
    pub fn pending_events(&self) -> &[SimEvent] {
        self.events.pending()
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Begin a fresh run: clear the field, recenter the ship, reset timers.
    /// Only reached through a restart intent that `can_restart` allows.
    fn start_game(&mut self) {
        self.registry.clear(&mut self.events);
        self.ship_input = SHIP_REST_POSITION;
        self.registry.reset_ship();
        self.clock.reset();
        self.state.start_game();
        self.phase = Phase::Running;
        self.restart_cooldown = 0.0;

        self.events.emit(SimEvent::GameStarted);
        self.events.emit(SimEvent::ScoreChanged(self.state.score()));
        self.events.emit(SimEvent::LivesChanged(self.state.lives()));
        self.events.emit(SimEvent::ShieldChanged(self.state.shield_active()));
    }

    /// Advance the session by one frame
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some(value) = input.vertical_position {
            if value.is_finite() {
                self.ship_input = value.clamp(0.0, 1.0);
            }
        }

        match self.phase {
            Phase::NotStarted => {
                if input.restart {
                    self.start_game();
                }
            }
            Phase::GameOver => {
                // Field stays frozen; only the debounce runs
                self.restart_cooldown = (self.restart_cooldown - dt).max(0.0);
                if input.restart && self.can_restart() {
                    log::info!("Restarting");
                    self.start_game();
                }
            }
            Phase::Running => self.run_frame(input, dt.min(MAX_FRAME_DT)),
        }
    }

    fn run_frame(&mut self, input: &TickInput, dt: f32) {
        self.frame += 1;
        let score_before = self.state.score();
        let lives_before = self.state.lives();

        // 1. Ship follows the latest sample
        let mut shoot = input.shoot;
        if input.autopilot {
            let command = pilot(&self.registry, &self.state, self.frame);
            self.ship_input = command.vertical_position;
            shoot |= command.shoot;
        }
        self.steer_ship();

        if shoot {
            self.registry.spawn_bullet(&mut self.events);
            self.events.feedback(Feedback::Shoot);
        }

        // 2. Spawning
        self.clock.advance(dt);
        let decision = self
            .policy
            .decide(&self.clock, self.state.score(), self.state.lives());
        self.clock.reset_fired(&decision);
        if !decision.is_empty() {
            let bounds = self.registry.bounds();
            for request in self.policy.place(&decision, &bounds, &mut self.rng) {
                match request.kind {
                    SpawnKind::Asteroid { rotation } => {
                        self.registry
                            .spawn_asteroid(request.pos, rotation, &mut self.events);
                    }
                    SpawnKind::Heart => {
                        self.registry.spawn_heart(request.pos, &mut self.events);
                    }
                    SpawnKind::Shield => {
                        self.registry.spawn_shield(request.pos, &mut self.events);
                    }
                }
            }
        }

        // 3-4. Motion and contacts, in fixed substeps so fast pairs can't tunnel
        let substeps = substep_count(dt);
        let step_dt = dt / substeps as f32;
        let mut game_over = false;
        for _ in 0..substeps {
            self.registry.step(step_dt, &mut self.events);
            let report = self
                .resolver
                .resolve(&mut self.registry, &mut self.state, &mut self.events);
            if report.game_over {
                game_over = true;
                break;
            }
        }

        // 5. Passive score
        self.state.add_score(PASSIVE_SCORE_PER_FRAME);

        if self.state.score() != score_before {
            self.events.emit(SimEvent::ScoreChanged(self.state.score()));
        }
        if self.state.lives() != lives_before {
            self.events.emit(SimEvent::LivesChanged(self.state.lives()));
        }

        if game_over || !self.state.is_running() {
            self.enter_game_over();
        }
    }

    fn steer_ship(&mut self) {
        match self.settings.ship_motion {
            ShipMotion::Direct => self.registry.set_ship_vertical_position(self.ship_input),
            ShipMotion::Smoothed { factor } => {
                let target = self.registry.ship_target_y(self.ship_input);
                self.registry.move_ship_toward(target, factor);
            }
        }
    }

    fn enter_game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.restart_cooldown = self.settings.effective_restart_delay();
        self.events.feedback(Feedback::GameOver);
        if let Some(run) = self.state.last_run() {
            self.events.emit(SimEvent::GameOverFinalized(run));
        }
    }
}

/// Number of equal motion/contact passes needed to keep each under `SIM_DT`
fn substep_count(dt: f32) -> u32 {
    // Tolerance keeps an exact multiple of SIM_DT from rounding up a step
    let steps = (dt / SIM_DT - 1e-3).ceil();
    if steps < 1.0 {
        1
    } else {
        (steps as u32).min(MAX_SUBSTEPS)
    }
}
