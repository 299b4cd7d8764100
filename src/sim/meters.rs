//! Distance → meters, and the scroll speed those meters buy
//!
//! Difficulty values come from settings; this module only applies them.

use serde::{Deserialize, Serialize};

use crate::settings::DifficultySettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeterCounter {
    settings: DifficultySettings,
    /// Scroll distance not yet converted into a whole meter
    carry: f32,
    meters: u64,
    level: u64,
    speed: f32,
}

impl MeterCounter {
    pub fn new(settings: &DifficultySettings) -> Self {
        Self {
            settings: settings.clone(),
            carry: 0.0,
            meters: 0,
            level: 0,
            speed: settings.initial_speed.min(settings.max_speed),
        }
    }

    pub fn meters(&self) -> u64 {
        self.meters
    }

    /// Current scroll speed per tick
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    /// Scroll one tick at the current speed.
    ///
    /// Returns every meter count reached during the tick, oldest first.
    pub fn advance(&mut self) -> Vec<u64> {
        self.carry += self.speed;
        let mut reached = Vec::new();
        while self.carry >= self.settings.pixels_per_meter {
            self.carry -= self.settings.pixels_per_meter;
            self.meters += 1;
            reached.push(self.meters);
            self.update_difficulty();
        }
        reached
    }

    fn update_difficulty(&mut self) {
        let level = self.meters / self.settings.meters_per_level;
        if level == self.level {
            return;
        }
        self.level = level;
        let speed = self.settings.initial_speed + self.settings.speed_factor * level as f32;
        self.speed = speed.min(self.settings.max_speed);
        log::info!(
            "Difficulty level {} at {} m, speed {}",
            self.level,
            self.meters,
            self.speed
        );
    }
}
