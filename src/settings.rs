//! Simulation settings and tuning
//!
//! Loaded from JSON (every field optional) and validated before a world is
//! built from them.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::HeroMetrics;

/// Obstacle and power-up spawning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// 1-in-N chance per tick to spawn once the gap is wide enough (N >= 1)
    pub spawn_probability: u32,
    /// Minimum gap between obstacles, in hero widths (>= 1)
    pub minimum_distance_multiplier: u32,
    /// 1-in-N chance per tick to spawn a power-up (N >= 1)
    pub power_up_probability: u32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            spawn_probability: SPAWN_PROBABILITY,
            minimum_distance_multiplier: MINIMUM_DISTANCE_MULTIPLIER,
            power_up_probability: POWER_UP_PROBABILITY,
        }
    }
}

/// Score accrual
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSettings {
    pub score_factor: u32,
    pub meters_delta: u64,
    pub initial_multiplier: f64,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            score_factor: SCORE_FACTOR,
            meters_delta: METERS_DELTA,
            initial_multiplier: INITIAL_MULTIPLIER,
        }
    }
}

/// Scroll speed progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultySettings {
    pub pixels_per_meter: f32,
    pub initial_speed: f32,
    pub speed_factor: f32,
    pub max_speed: f32,
    pub meters_per_level: u64,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            pixels_per_meter: PIXELS_PER_METER,
            initial_speed: INITIAL_SPEED,
            speed_factor: SPEED_FACTOR,
            max_speed: MAX_SPEED,
            meters_per_level: METERS_PER_LEVEL,
        }
    }
}

/// Complete simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Viewport width in world units
    pub viewport_width: f32,
    /// Height of the ground line
    pub ground_offset: f32,

    // === Hero ===
    pub hero: HeroMetrics,

    // === Spawning ===
    pub spawn: SpawnSettings,

    // === Score ===
    pub score: ScoreSettings,

    // === Difficulty ===
    pub difficulty: DifficultySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            ground_offset: GROUND_OFFSET,
            hero: HeroMetrics::default(),
            spawn: SpawnSettings::default(),
            score: ScoreSettings::default(),
            difficulty: DifficultySettings::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!("Loaded settings (viewport {})", settings.viewport_width);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject any tunable outside its legal range
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("viewport_width", self.viewport_width)?;
        if !self.ground_offset.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "ground_offset",
                value: self.ground_offset,
            });
        }

        self.hero.validate()?;

        if self.spawn.spawn_probability < 1 {
            return Err(ConfigError::SpawnProbability(self.spawn.spawn_probability));
        }
        if self.spawn.minimum_distance_multiplier < 1 {
            return Err(ConfigError::MinimumDistanceMultiplier(
                self.spawn.minimum_distance_multiplier,
            ));
        }
        if self.spawn.power_up_probability < 1 {
            return Err(ConfigError::PowerUpProbability(
                self.spawn.power_up_probability,
            ));
        }

        if self.score.meters_delta < 1 {
            return Err(ConfigError::MetersDelta);
        }
        let multiplier = self.score.initial_multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(ConfigError::Multiplier(multiplier));
        }

        let d = &self.difficulty;
        positive("pixels_per_meter", d.pixels_per_meter)?;
        positive("initial_speed", d.initial_speed)?;
        positive("max_speed", d.max_speed)?;
        if !d.speed_factor.is_finite() || d.speed_factor < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "speed_factor",
                value: d.speed_factor,
            });
        }
        if d.meters_per_level < 1 {
            return Err(ConfigError::NonPositive {
                field: "meters_per_level",
                value: 0.0,
            });
        }
        Ok(())
    }
}
