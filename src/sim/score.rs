//! Distance-driven score
//!
//! Fed by "meters changed" notifications; returns the new total whenever the
//! score moves so the caller can publish a "score changed" event.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::ScoreSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTracker {
    score: u64,
    multiplier: f64,
    meters: u64,
    score_factor: u32,
    meters_delta: u64,
    initial_multiplier: f64,
}

impl ScoreTracker {
    pub fn new(settings: &ScoreSettings) -> Result<Self, ConfigError> {
        if settings.meters_delta < 1 {
            return Err(ConfigError::MetersDelta);
        }
        let mut tracker = Self {
            score: 0,
            multiplier: 0.0,
            meters: 0,
            score_factor: settings.score_factor,
            meters_delta: settings.meters_delta,
            initial_multiplier: 0.0,
        };
        tracker.set_multiplier(settings.initial_multiplier)?;
        tracker.initial_multiplier = tracker.multiplier;
        Ok(tracker)
    }

    /// Back to zero with the configured starting multiplier
    pub fn restart(&mut self) {
        self.score = 0;
        self.meters = 0;
        self.multiplier = self.initial_multiplier;
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Last meter count seen
    pub fn meters(&self) -> u64 {
        self.meters
    }

    /// Set the multiplier, rounded to one decimal place
    pub fn set_multiplier(&mut self, multiplier: f64) -> Result<(), ConfigError> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(ConfigError::Multiplier(multiplier));
        }
        self.multiplier = round_tenth(multiplier);
        Ok(())
    }

    /// React to a new meter count. Returns the new score when it changed.
    pub fn on_meters_changed(&mut self, meters: u64) -> Option<u64> {
        self.meters = self.meters.max(meters);
        if meters % self.meters_delta != 0 {
            return None;
        }
        let gain = (self.score_factor as f64 * self.multiplier).floor() as u64;
        if gain == 0 {
            return None;
        }
        self.score += gain;
        Some(self.score)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
