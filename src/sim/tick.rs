//! Simulation tick
//!
//! Advances one world step: distance and score, intents, hero movement,
//! scrolling, obstacle lifecycle, then collision resolution.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hero::{Facing, Hero, MoveState};
use super::state::{GameEvent, World};

/// Discrete movement request from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveRight,
    MoveLeft,
    Jump,
    Slide,
    None,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents held this tick; the last horizontal one wins
    pub intents: Vec<Intent>,
    /// New viewport width, when the window was resized
    pub viewport_width: Option<f32>,
}

impl TickInput {
    pub fn with_intents(intents: &[Intent]) -> Self {
        Self {
            intents: intents.to_vec(),
            ..Default::default()
        }
    }
}

/// Translate intents into velocity and state-machine events
pub fn apply_intents(hero: &mut Hero, intents: &[Intent]) {
    let facing = intents.iter().fold(None, |facing, intent| match intent {
        Intent::MoveRight => Some(Facing::Right),
        Intent::MoveLeft => Some(Facing::Left),
        _ => facing,
    });
    hero.steer(facing);

    // Start or stop running on the ground
    if matches!(hero.state(), MoveState::Idle | MoveState::Run) {
        hero.on_idle();
    }

    for intent in intents {
        match intent {
            Intent::Jump => {
                hero.on_jump();
            }
            Intent::Slide => {
                hero.on_slide();
            }
            Intent::MoveRight | Intent::MoveLeft | Intent::None => {}
        }
    }
}

/// Advance the world by one step
pub fn tick(world: &mut World, input: &TickInput) {
    if let Some(width) = input.viewport_width {
        if width.is_finite() && width > 0.0 {
            world.viewport_width = width;
        } else {
            log::warn!("Ignoring invalid viewport width {}", width);
        }
    }
    let viewport = world.viewport_width;

    // Hero left the screen: the run is over
    if !world.hero.bbox.is_x_visible(viewport) {
        world.reset();
        return;
    }

    world.time_ticks += 1;

    // Distance drives meters, meters drive score; a dead hero runs no further
    let scroll = world.meters.speed();
    if !world.hero.is_dead() {
        for meters in world.meters.advance() {
            world.events.push(GameEvent::MetersChanged(meters));
            if let Some(score) = world.score.on_meters_changed(meters) {
                world.events.push(GameEvent::ScoreChanged(score));
            }
        }
    }

    apply_intents(&mut world.hero, &input.intents);
    world.hero.update();

    // Scroll the world past the hero
    let delta = Vec2::new(-scroll, 0.0);
    for obstacle in world.stream.obstacles_mut() {
        obstacle.bbox.translate(delta);
    }
    for power_up in &mut world.power_ups {
        power_up.bbox.translate(delta);
    }
    world.stream.refresh_visibility(viewport);

    let hero_width = world.hero.metrics.standard_width;
    world.stream.retire_offscreen(hero_width);
    world
        .power_ups
        .retain(|power_up| power_up.bbox.right() + hero_width >= 0.0);

    if let Some(obstacle) = world
        .stream
        .try_spawn(viewport, &world.hero.metrics, &mut world.rng)
    {
        world.events.push(GameEvent::ObstacleSpawned {
            id: obstacle.id,
            category: obstacle.category,
        });
    }
    if let Some(power_up) = world
        .stream
        .try_spawn_power_up(viewport, &world.hero.metrics, &mut world.rng)
    {
        world.events.push(GameEvent::PowerUpSpawned {
            id: power_up.id,
            kind: power_up.kind,
        });
        world.power_ups.push(power_up);
    }

    let collisions = world.resolver.resolve(
        &mut world.hero,
        world.stream.obstacles_mut(),
        &mut world.power_ups,
        &mut world.score,
    );
    world
        .events
        .extend(collisions.into_iter().map(GameEvent::Collision));

    world.flush_hero_changes();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::hero::SoundCue;
    use crate::sim::obstacle::{Category, Obstacle};

    fn world(seed: u64) -> World {
        World::new(Settings::default(), seed).unwrap()
    }

    #[test]
    fn test_intents_start_and_stop_running() {
        let mut world = world(1);
        tick(&mut world, &TickInput::with_intents(&[Intent::MoveRight]));
        assert_eq!(world.hero().state(), MoveState::Run);
        assert_eq!(world.hero().bbox.x, 205.0);

        tick(&mut world, &TickInput::with_intents(&[Intent::None]));
        assert_eq!(world.hero().state(), MoveState::Idle);

        tick(&mut world, &TickInput::with_intents(&[Intent::MoveLeft]));
        assert_eq!(world.hero().facing, Facing::Left);
        assert_eq!(world.hero().bbox.x, 200.0);
    }

    #[test]
    fn test_jump_publishes_state_and_sound_once() {
        let mut world = world(1);
        world.drain_events();
        tick(&mut world, &TickInput::with_intents(&[Intent::Jump]));
        tick(&mut world, &TickInput::with_intents(&[Intent::Jump]));
        let events = world.drain_events();
        let sounds = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Sound(SoundCue::Jump)))
            .count();
        assert_eq!(sounds, 1);
        assert!(events.contains(&GameEvent::StateChanged {
            from: MoveState::Idle,
            to: MoveState::Jump
        }));
    }

    #[test]
    fn test_score_follows_meters() {
        let mut world = world(3);
        for _ in 0..100 {
            tick(&mut world, &TickInput::default());
        }
        // 4 units per tick, 40 units per meter, 10 points per meter
        assert_eq!(world.meters(), 10);
        assert_eq!(world.score(), 100);
        let events = world.drain_events();
        let last_score = events.iter().rev().find_map(|e| match e {
            GameEvent::ScoreChanged(score) => Some(*score),
            _ => None,
        });
        assert_eq!(last_score, Some(100));
    }

    #[test]
    fn test_first_tick_spawns_at_right_edge() {
        let mut world = world(5);
        tick(&mut world, &TickInput::default());
        assert_eq!(world.obstacles().len(), 1);
        assert_eq!(world.obstacles()[0].bbox.x, world.viewport_width);
        assert!(
            world
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
        );
    }

    #[test]
    fn test_scrolling_obstacle_pushes_idle_hero() {
        let mut world = world(5);
        // Block directly in front of the hero, 8 units away
        let hero_right = world.hero().bbox.right();
        let mut block = Obstacle::with_size(
            900,
            Category::Jumpable,
            Vec2::new(hero_right + 8.0, 0.0),
            Vec2::new(10.0, 10.0),
        );
        block.refresh_visibility(world.viewport_width);
        world.stream.push(block);

        for _ in 0..4 {
            tick(&mut world, &TickInput::default());
        }
        let block = world.obstacles().iter().find(|o| o.id == 900).unwrap();
        assert_eq!(world.hero().bbox.right(), block.bbox.x);
    }

    #[test]
    fn test_hero_off_screen_resets_world() {
        let mut world = world(5);
        for _ in 0..50 {
            tick(&mut world, &TickInput::default());
        }
        assert!(world.score() > 0);
        world.hero.bbox.x = -100.0;
        tick(&mut world, &TickInput::default());

        assert_eq!(world.run, 1);
        assert_eq!(world.score(), 0);
        assert_eq!(world.meters(), 0);
        assert!(world.obstacles().is_empty());
        assert!(matches!(
            world.drain_events().as_slice(),
            [GameEvent::Reset { .. }]
        ));
    }

    #[test]
    fn test_dead_hero_ignores_intents() {
        let mut world = world(5);
        world.hero.on_die();
        tick(&mut world, &TickInput::with_intents(&[Intent::MoveRight, Intent::Jump]));
        assert_eq!(world.hero().state(), MoveState::Dead);
        assert_eq!(world.hero().bbox.x, 200.0);
    }

    #[test]
    fn test_dead_hero_stops_scoring() {
        let mut world = world(5);
        for _ in 0..20 {
            tick(&mut world, &TickInput::default());
        }
        let (score, meters) = (world.score(), world.meters());
        world.hero.on_die();
        world.drain_events();

        // Short enough that no obstacle reaches the hero
        for _ in 0..100 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.run, 0);
        assert_eq!(world.score(), score);
        assert_eq!(world.meters(), meters);
        assert!(!world.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::ScoreChanged(_) | GameEvent::MetersChanged(_)
        )));

        // The finished run reports the score at death
        world.hero.bbox.x = -100.0;
        tick(&mut world, &TickInput::default());
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::Reset { score, meters }]
        );
    }

    #[test]
    fn test_invalid_viewport_width_ignored() {
        let mut world = world(5);
        let input = TickInput {
            viewport_width: Some(-3.0),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert_eq!(world.viewport_width, 800.0);
    }

    #[test]
    fn test_determinism() {
        let script = [
            vec![Intent::MoveRight],
            vec![Intent::MoveRight, Intent::Jump],
            vec![Intent::None],
            vec![Intent::Slide],
            vec![Intent::MoveLeft],
        ];
        let run = |seed| {
            let mut world = world(seed);
            let mut events = Vec::new();
            for i in 0..3000 {
                let input = TickInput::with_intents(&script[(i / 37) % script.len()]);
                tick(&mut world, &input);
                events.extend(world.drain_events());
            }
            (events, world.hero().bbox, world.score())
        };
        let (events_a, hero_a, score_a) = run(99999);
        let (events_b, hero_b, score_b) = run(99999);
        assert_eq!(events_a, events_b);
        assert_eq!(hero_a, hero_b);
        assert_eq!(score_a, score_b);
        assert!(!events_a.is_empty());
    }
}
