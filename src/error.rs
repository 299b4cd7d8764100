//! Configuration errors
//!
//! Invalid tunables are rejected where they are set, never clamped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("spawn probability must be greater or equal than 1, got {0}")]
    SpawnProbability(u32),
    #[error("power-up probability must be greater or equal than 1, got {0}")]
    PowerUpProbability(u32),
    #[error("minimum distance multiplier must be greater or equal than 1, got {0}")]
    MinimumDistanceMultiplier(u32),
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be at least {min} so a jump clears the ground probe, got {value}")]
    VerticalSpeed {
        field: &'static str,
        value: f32,
        min: f32,
    },
    #[error("max jump elevation ({0}) must exceed 1 so jumpable obstacles stay clearable")]
    JumpElevation(f32),
    #[error("score multiplier must be finite and non-negative, got {0}")]
    Multiplier(f64),
    #[error("meters delta must be at least 1")]
    MetersDelta,
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}
