//! World state and the events it publishes
//!
//! Everything one run needs lives in `World`; a reset rebuilds all of it in
//! a single call so the driving loop never observes a half-reset world.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionEvent, CollisionResolver};
use super::hero::{Hero, MoveState, SoundCue};
use super::meters::MeterCounter;
use super::obstacle::{Category, Obstacle};
use super::powerup::{PowerUp, PowerUpKind, PowerUpStrategies};
use super::score::ScoreTracker;
use super::stream::ObstacleStream;
use crate::consts::HERO_START_FRACTION;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Notifications for audio/UI collaborators, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StateChanged { from: MoveState, to: MoveState },
    Sound(SoundCue),
    MetersChanged(u64),
    ScoreChanged(u64),
    ObstacleSpawned { id: u32, category: Category },
    PowerUpSpawned { id: u32, kind: PowerUpKind },
    Collision(CollisionEvent),
    /// The world was rebuilt; carries the totals of the finished run
    Reset { score: u64, meters: u64 },
}

/// RNG state wrapper: one PCG stream per run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn with_stream(self, stream: u64) -> Self {
        Self { stream, ..self }
    }

    pub fn to_rng(&self) -> Pcg32 {
        if self.stream == 0 {
            Pcg32::seed_from_u64(self.seed)
        } else {
            Pcg32::new(self.seed, self.stream)
        }
    }
}

/// Complete simulation state
#[derive(Debug)]
pub struct World {
    pub settings: Settings,
    /// Current viewport width (may change with the window)
    pub viewport_width: f32,
    pub rng_state: RngState,
    /// Number of completed runs
    pub run: u64,
    /// Ticks since the current run started
    pub time_ticks: u64,
    pub hero: Hero,
    pub stream: ObstacleStream,
    pub power_ups: Vec<PowerUp>,
    pub(crate) resolver: CollisionResolver,
    pub(crate) score: ScoreTracker,
    pub(crate) meters: MeterCounter,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl World {
    /// Validate `settings` and build a fresh world seeded with `seed`
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        Self::with_strategies(settings, seed, PowerUpStrategies::with_defaults())
    }

    pub fn with_strategies(
        settings: Settings,
        seed: u64,
        strategies: PowerUpStrategies,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let stream = ObstacleStream::new(&settings.spawn, settings.ground_offset)?;
        let score = ScoreTracker::new(&settings.score)?;
        let rng_state = RngState::new(seed);

        Ok(Self {
            viewport_width: settings.viewport_width,
            hero: spawn_hero(&settings, settings.viewport_width),
            stream,
            power_ups: Vec::new(),
            resolver: CollisionResolver::new(strategies),
            score,
            meters: MeterCounter::new(&settings.difficulty),
            rng: rng_state.to_rng(),
            rng_state,
            run: 0,
            time_ticks: 0,
            events: Vec::new(),
            settings,
        })
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.stream.obstacles()
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    pub fn multiplier(&self) -> f64 {
        self.score.multiplier()
    }

    /// Externally adjust the score multiplier (rounded to one decimal)
    pub fn set_multiplier(&mut self, multiplier: f64) -> Result<(), ConfigError> {
        self.score.set_multiplier(multiplier)
    }

    pub fn meters(&self) -> u64 {
        self.meters.meters()
    }

    /// Scroll speed per tick
    pub fn speed(&self) -> f32 {
        self.meters.speed()
    }

    /// Events published since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rebuild hero, obstacles, power-ups, contacts, score and meters
    pub fn reset(&mut self) {
        let score = self.score.score();
        let meters = self.meters.meters();
        self.run += 1;
        log::info!(
            "Run {} over: score {}, {} m; resetting",
            self.run,
            score,
            meters
        );

        self.stream.clear();
        self.hero = spawn_hero(&self.settings, self.viewport_width);
        self.power_ups.clear();
        self.resolver.clear();
        self.score.restart();
        self.meters = MeterCounter::new(&self.settings.difficulty);
        self.rng = self.rng_state.with_stream(self.run).to_rng();
        self.time_ticks = 0;
        self.events.clear();
        self.events.push(GameEvent::Reset { score, meters });
    }

    /// Move hero transitions into the event outbox
    pub(crate) fn flush_hero_changes(&mut self) {
        for change in self.hero.take_changes() {
            self.events.push(GameEvent::StateChanged {
                from: change.from,
                to: change.to,
            });
            if let Some(cue) = change.sound {
                self.events.push(GameEvent::Sound(cue));
            }
        }
    }
}

fn spawn_hero(settings: &Settings, viewport_width: f32) -> Hero {
    Hero::new(
        settings.hero.clone(),
        viewport_width * HERO_START_FRACTION,
        settings.ground_offset,
    )
}
