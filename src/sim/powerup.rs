//! Power-ups and their collect/consume strategies
//!
//! Each kind is handled by a strategy registered in `PowerUpStrategies`.
//! Looking up a kind nobody registered is a programming error and panics.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::hero::Hero;
use super::score::ScoreTracker;
use crate::consts::MULTIPLIER_STEP;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Sword,
    Shield,
    Multiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Sword,
        PowerUpKind::Shield,
        PowerUpKind::Multiplier,
    ];
}

/// A collectible floating in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub bbox: Aabb,
    /// Cleared once collected
    pub active: bool,
}

impl PowerUp {
    pub const SIZE: f32 = 16.0;

    pub fn new(id: u32, kind: PowerUpKind, x: f32, y: f32) -> Self {
        Self {
            id,
            kind,
            bbox: Aabb::new(x, y, Self::SIZE, Self::SIZE),
            active: true,
        }
    }
}

/// What a strategy may touch
pub struct EffectTarget<'a> {
    pub hero: &'a mut Hero,
    pub score: &'a mut ScoreTracker,
}

pub trait PowerUpStrategy {
    /// Apply the pickup; false when it could not be collected
    fn collect(&self, target: &mut EffectTarget<'_>) -> bool;

    /// Spend one use of the effect; false when none is left
    fn consume(&self, _target: &mut EffectTarget<'_>) -> bool {
        false
    }
}

pub struct SwordStrategy;

impl PowerUpStrategy for SwordStrategy {
    fn collect(&self, target: &mut EffectTarget<'_>) -> bool {
        target.hero.sword_charges += 1;
        true
    }

    fn consume(&self, target: &mut EffectTarget<'_>) -> bool {
        if target.hero.sword_charges == 0 {
            return false;
        }
        target.hero.sword_charges -= 1;
        true
    }
}

pub struct ShieldStrategy;

impl PowerUpStrategy for ShieldStrategy {
    /// A second shield cannot be stacked on top of the first
    fn collect(&self, target: &mut EffectTarget<'_>) -> bool {
        if target.hero.shield {
            return false;
        }
        target.hero.shield = true;
        true
    }

    fn consume(&self, target: &mut EffectTarget<'_>) -> bool {
        std::mem::replace(&mut target.hero.shield, false)
    }
}

pub struct MultiplierStrategy;

impl PowerUpStrategy for MultiplierStrategy {
    fn collect(&self, target: &mut EffectTarget<'_>) -> bool {
        let next = target.score.multiplier() + MULTIPLIER_STEP;
        target.score.set_multiplier(next).is_ok()
    }
}

/// Strategy registry keyed by power-up kind
#[derive(Default)]
pub struct PowerUpStrategies {
    strategies: HashMap<PowerUpKind, Box<dyn PowerUpStrategy>>,
}

impl fmt::Debug for PowerUpStrategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.strategies.keys().collect();
        kinds.sort_by_key(|k| **k as u8);
        f.debug_struct("PowerUpStrategies")
            .field("kinds", &kinds)
            .finish()
    }
}

impl PowerUpStrategies {
    /// Registry with every built-in strategy
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(PowerUpKind::Sword, Box::new(SwordStrategy));
        registry.register(PowerUpKind::Shield, Box::new(ShieldStrategy));
        registry.register(PowerUpKind::Multiplier, Box::new(MultiplierStrategy));
        registry
    }

    pub fn register(&mut self, kind: PowerUpKind, strategy: Box<dyn PowerUpStrategy>) {
        self.strategies.insert(kind, strategy);
    }

    /// Panics when `kind` has no registered strategy
    pub fn get(&self, kind: PowerUpKind) -> &dyn PowerUpStrategy {
        match self.strategies.get(&kind) {
            Some(strategy) => strategy.as_ref(),
            None => panic!("no power-up strategy registered for {kind:?}"),
        }
    }

    pub fn collect(&self, kind: PowerUpKind, target: &mut EffectTarget<'_>) -> bool {
        self.get(kind).collect(target)
    }

    /// Weapon check for a hostile engagement: a sword charge first, then the shield
    pub fn consume_weapon(&self, target: &mut EffectTarget<'_>) -> bool {
        self.get(PowerUpKind::Sword).consume(target)
            || self.get(PowerUpKind::Shield).consume(target)
    }
}
