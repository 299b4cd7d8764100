//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies; collaborators drain events

pub mod collision;
pub mod geometry;
pub mod hero;
pub mod hostile;
pub mod meters;
pub mod obstacle;
pub mod powerup;
pub mod score;
pub mod state;
pub mod stream;
pub mod tick;

pub use collision::{CollisionEvent, CollisionResolver, Side, classify_side, resolve_side};
pub use geometry::Aabb;
pub use hero::{
    AnimationSet, Facing, Hero, HeroEvent, HeroMetrics, MoveState, SoundCue, StateChange,
};
pub use hostile::{Hostile, HostileState};
pub use meters::MeterCounter;
pub use obstacle::{Capabilities, Category, Obstacle};
pub use powerup::{
    EffectTarget, MultiplierStrategy, PowerUp, PowerUpKind, PowerUpStrategies, PowerUpStrategy,
    ShieldStrategy, SwordStrategy,
};
pub use score::ScoreTracker;
pub use state::{GameEvent, RngState, World};
pub use stream::ObstacleStream;
pub use tick::{Intent, TickInput, apply_intents, tick};
