//! Hero move/life state machine
//!
//! The hero owns its `MoveState` by value. Events are dispatched through a
//! single transition table (`MoveState::apply`); entering a state fires its
//! sound cue once and swaps the animation key.

use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use crate::consts::*;
use crate::error::ConfigError;

/// Motion/life state of the hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveState {
    Idle,
    Run,
    Jump,
    Slide,
    Fall,
    Dead,
}

/// Transition requests the hero understands.
///
/// `on_idle` is not an event of its own: it resolves to `Run` or `Stand`
/// depending on horizontal velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroEvent {
    Stand,
    Run,
    Jump,
    Slide,
    Fall,
    Die,
}

/// Sound playback requests fired on state entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Slide,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl MoveState {
    pub const ALL: [MoveState; 6] = [
        MoveState::Idle,
        MoveState::Run,
        MoveState::Jump,
        MoveState::Slide,
        MoveState::Fall,
        MoveState::Dead,
    ];

    /// State reached after `event`, or `self` when the event is ignored
    pub fn apply(self, event: HeroEvent) -> MoveState {
        use HeroEvent as E;
        use MoveState as S;

        match (self, event) {
            (S::Dead, _) => S::Dead,
            (_, E::Die) => S::Dead,

            (S::Idle, E::Run) => S::Run,
            (S::Idle | S::Run, E::Jump) => S::Jump,
            (S::Idle | S::Run, E::Slide) => S::Slide,
            (S::Idle | S::Run | S::Jump | S::Slide, E::Fall) => S::Fall,
            (S::Run, E::Stand) => S::Idle,

            // Airborne states land through stand/run
            (S::Jump | S::Fall, E::Stand) => S::Idle,
            (S::Jump | S::Fall, E::Run) => S::Run,

            (state, _) => state,
        }
    }

    /// Sound requested when the state is entered
    pub fn sound(self) -> Option<SoundCue> {
        match self {
            MoveState::Jump => Some(SoundCue::Jump),
            MoveState::Slide => Some(SoundCue::Slide),
            MoveState::Dead => Some(SoundCue::Death),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// States that have an animation registered by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSet {
    registered: [bool; 6],
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self::all()
    }
}

impl AnimationSet {
    pub fn all() -> Self {
        Self {
            registered: [true; 6],
        }
    }

    pub fn none() -> Self {
        Self {
            registered: [false; 6],
        }
    }

    pub fn without(mut self, state: MoveState) -> Self {
        self.registered[state.index()] = false;
        self
    }

    pub fn contains(&self, state: MoveState) -> bool {
        self.registered[state.index()]
    }
}

/// Slowest jump or fall speed the collision probes can tell from resting
pub const MIN_VERTICAL_SPEED: f32 = 1.0;

/// Capability parameters of the hero
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroMetrics {
    pub standard_width: f32,
    pub standard_height: f32,
    /// Highest elevation a jump reaches above its take-off height
    pub max_jump_elevation: f32,
    /// Distance covered by one slide
    pub max_slide_distance: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub fall_speed: f32,
    pub slide_speed: f32,
}

impl Default for HeroMetrics {
    fn default() -> Self {
        Self {
            standard_width: HERO_WIDTH,
            standard_height: HERO_HEIGHT,
            max_jump_elevation: HERO_MAX_JUMP,
            max_slide_distance: HERO_MAX_SLIDE,
            run_speed: HERO_RUN_SPEED,
            jump_speed: HERO_JUMP_SPEED,
            fall_speed: HERO_FALL_SPEED,
            slide_speed: HERO_SLIDE_SPEED,
        }
    }
}

impl HeroMetrics {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("standard_width", self.standard_width),
            ("standard_height", self.standard_height),
            ("max_slide_distance", self.max_slide_distance),
            ("run_speed", self.run_speed),
            ("jump_speed", self.jump_speed),
            ("fall_speed", self.fall_speed),
            ("slide_speed", self.slide_speed),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        // One tick of vertical motion must leave the 1-unit contact probe
        let vertical = [
            ("jump_speed", self.jump_speed),
            ("fall_speed", self.fall_speed),
        ];
        for (field, value) in vertical {
            if value < MIN_VERTICAL_SPEED {
                return Err(ConfigError::VerticalSpeed {
                    field,
                    value,
                    min: MIN_VERTICAL_SPEED,
                });
            }
        }
        if !self.max_jump_elevation.is_finite() || self.max_jump_elevation <= 1.0 {
            return Err(ConfigError::JumpElevation(self.max_jump_elevation));
        }
        Ok(())
    }

    /// Height while sliding
    pub fn slide_height(&self) -> f32 {
        self.standard_height / 2.0
    }
}

/// A state transition that actually happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub from: MoveState,
    pub to: MoveState,
    pub sound: Option<SoundCue>,
}

/// The player-controlled character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub bbox: Aabb,
    /// Horizontal speed magnitude; direction comes from `facing`
    pub dx: f32,
    pub facing: Facing,
    pub metrics: HeroMetrics,
    /// Resting on top of an obstacle (set by the collision resolver)
    pub grounded: bool,
    /// Remaining sword charges
    pub sword_charges: u32,
    pub shield: bool,
    state: MoveState,
    ground_y: f32,
    jump_base: f32,
    slide_remaining: f32,
    animation: Option<MoveState>,
    animations: AnimationSet,
    #[serde(skip)]
    changes: Vec<StateChange>,
}

impl Hero {
    /// A hero standing idle on the ground at `x`
    pub fn new(metrics: HeroMetrics, x: f32, ground_y: f32) -> Self {
        Self::with_animations(metrics, x, ground_y, AnimationSet::all())
    }

    pub fn with_animations(
        metrics: HeroMetrics,
        x: f32,
        ground_y: f32,
        animations: AnimationSet,
    ) -> Self {
        let bbox = Aabb::new(x, ground_y, metrics.standard_width, metrics.standard_height);
        Self {
            bbox,
            dx: 0.0,
            facing: Facing::Right,
            metrics,
            grounded: false,
            sword_charges: 0,
            shield: false,
            state: MoveState::Idle,
            ground_y,
            jump_base: ground_y,
            slide_remaining: 0.0,
            animation: animations.contains(MoveState::Idle).then_some(MoveState::Idle),
            animations,
            changes: Vec::new(),
        }
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    /// Animation to draw, `None` when the state has none registered
    pub fn animation(&self) -> Option<MoveState> {
        self.animation
    }

    pub fn is_moving(&self) -> bool {
        self.dx != 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.state == MoveState::Dead
    }

    /// Transitions since the last call, oldest first
    pub fn take_changes(&mut self) -> Vec<StateChange> {
        std::mem::take(&mut self.changes)
    }

    /// Dispatch `event`; returns true when it caused a transition
    pub fn handle(&mut self, event: HeroEvent) -> bool {
        let next = self.state.apply(event);
        if next == self.state {
            return false;
        }
        self.enter(next);
        true
    }

    /// Run while moving, stand otherwise
    pub fn on_idle(&mut self) -> bool {
        if self.is_moving() {
            self.on_run()
        } else {
            self.on_stand()
        }
    }

    pub fn on_stand(&mut self) -> bool {
        self.handle(HeroEvent::Stand)
    }

    pub fn on_run(&mut self) -> bool {
        self.handle(HeroEvent::Run)
    }

    pub fn on_jump(&mut self) -> bool {
        self.handle(HeroEvent::Jump)
    }

    pub fn on_slide(&mut self) -> bool {
        self.handle(HeroEvent::Slide)
    }

    pub fn on_fall(&mut self) -> bool {
        self.handle(HeroEvent::Fall)
    }

    pub fn on_die(&mut self) -> bool {
        self.handle(HeroEvent::Die)
    }

    /// Set horizontal intent; ignored once dead
    pub fn steer(&mut self, facing: Option<Facing>) {
        if self.is_dead() {
            return;
        }
        match facing {
            Some(facing) => {
                self.facing = facing;
                self.dx = self.metrics.run_speed;
            }
            None => self.dx = 0.0,
        }
    }

    fn enter(&mut self, next: MoveState) {
        let from = self.state;
        if from == MoveState::Slide {
            self.bbox.height = self.metrics.standard_height;
        }

        match next {
            MoveState::Jump => {
                self.jump_base = self.bbox.y;
                self.grounded = false;
            }
            MoveState::Slide => {
                self.bbox.height = self.metrics.slide_height();
                self.slide_remaining = self.metrics.max_slide_distance;
            }
            MoveState::Dead => {
                self.dx = 0.0;
                self.grounded = false;
            }
            _ => {}
        }

        self.state = next;
        self.animation = self.animations.contains(next).then_some(next);
        let sound = next.sound();
        log::debug!("Hero {:?} -> {:?}", from, next);
        self.changes.push(StateChange {
            from,
            to: next,
            sound,
        });
    }

    /// Advance position by one tick according to velocity and state
    pub fn update(&mut self) {
        if !self.is_dead() && self.is_moving() {
            match self.facing {
                Facing::Right => self.bbox.x += self.dx,
                Facing::Left => self.bbox.x -= self.dx,
            }
        }

        match self.state {
            MoveState::Jump => {
                self.bbox.y += self.metrics.jump_speed;
                let apex = self.jump_base + self.metrics.max_jump_elevation;
                if self.bbox.y >= apex {
                    self.bbox.y = apex;
                    self.on_fall();
                }
            }
            MoveState::Fall | MoveState::Dead => {
                if self.bbox.y > self.ground_y {
                    self.bbox.y = (self.bbox.y - self.metrics.fall_speed).max(self.ground_y);
                    if self.bbox.y <= self.ground_y {
                        self.on_idle();
                    }
                }
            }
            MoveState::Slide => {
                self.slide_remaining -= self.metrics.slide_speed;
                if self.slide_remaining <= 0.0 {
                    self.finish_slide();
                }
            }
            MoveState::Idle | MoveState::Run => {}
        }
    }

    /// Slide ignores stand/run requests until it has covered its distance
    fn finish_slide(&mut self) {
        let next = if self.is_moving() {
            MoveState::Run
        } else {
            MoveState::Idle
        };
        self.enter(next);
    }
}
