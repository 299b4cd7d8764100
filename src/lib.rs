//! Neverending Run - simulation core of an endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hero state machine, collisions, obstacle stream, score)
//! - `settings`: Data-driven tuning with validation
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Base unit the default sizes are derived from
    pub const OFFSET_MEASURE: f32 = 20.0;

    /// Hero defaults
    pub const HERO_WIDTH: f32 = OFFSET_MEASURE;
    pub const HERO_HEIGHT: f32 = OFFSET_MEASURE * 2.0;
    pub const HERO_MAX_JUMP: f32 = OFFSET_MEASURE * 4.5;
    pub const HERO_MAX_SLIDE: f32 = OFFSET_MEASURE * 4.5;
    pub const HERO_RUN_SPEED: f32 = 5.0;
    pub const HERO_JUMP_SPEED: f32 = 6.0;
    pub const HERO_FALL_SPEED: f32 = 6.0;
    pub const HERO_SLIDE_SPEED: f32 = 5.0;
    /// Hero spawn x (fraction of viewport width)
    pub const HERO_START_FRACTION: f32 = 0.25;

    /// Viewport width in world units
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    /// Ground height all ground-level objects rest on
    pub const GROUND_OFFSET: f32 = 0.0;

    /// Obstacle spawning: 1-in-N chance per tick once the gap is wide enough
    pub const SPAWN_PROBABILITY: u32 = 50;
    /// Minimum gap between obstacles, in hero widths
    pub const MINIMUM_DISTANCE_MULTIPLIER: u32 = 3;
    /// Power-up spawning: 1-in-N chance per tick
    pub const POWER_UP_PROBABILITY: u32 = 400;

    /// Score gained every `METERS_DELTA` meters (before multiplier)
    pub const SCORE_FACTOR: u32 = 10;
    pub const METERS_DELTA: u64 = 1;
    pub const INITIAL_MULTIPLIER: f64 = 1.0;
    /// Multiplier gained per Multiplier power-up
    pub const MULTIPLIER_STEP: f64 = 0.5;

    /// Scroll distance per meter
    pub const PIXELS_PER_METER: f32 = 40.0;
    /// Scroll speed at difficulty level 0
    pub const INITIAL_SPEED: f32 = 4.0;
    /// Speed gained per difficulty level
    pub const SPEED_FACTOR: f32 = 0.5;
    pub const MAX_SPEED: f32 = 12.0;
    /// Meters between difficulty levels
    pub const METERS_PER_LEVEL: u64 = 100;
}
