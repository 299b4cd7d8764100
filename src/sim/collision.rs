//! Collision detection and response for axis-aligned boxes
//!
//! Side classification projects four 1-unit probes out of the hero's box and
//! keeps the probe with the strictly greatest overlap area. Probes are
//! evaluated in `Side::PRIORITY` order, so on equal areas the earlier side
//! wins. Sides name where the obstacle sits relative to the hero.

use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::hero::Hero;
use super::obstacle::{Category, Obstacle};
use super::powerup::{EffectTarget, PowerUp, PowerUpKind, PowerUpStrategies};
use super::score::ScoreTracker;

/// Thickness and outward offset of a probe
const PROBE: f32 = 1.0;

/// Side of the hero an obstacle touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Obstacle on the hero's left
    Left,
    /// Hero standing on the obstacle
    Bottom,
    /// Obstacle on the hero's right
    Right,
    /// Obstacle overhanging the hero's head
    Top,
}

impl Side {
    /// Probe evaluation order, which doubles as the tie-break
    pub const PRIORITY: [Side; 4] = [Side::Left, Side::Bottom, Side::Right, Side::Top];

    /// Probe rectangle for this side of `hero`
    pub fn probe(self, hero: &Aabb) -> Aabb {
        match self {
            Side::Left => Aabb::new(hero.x - PROBE, hero.y, PROBE, hero.height),
            Side::Bottom => Aabb::new(hero.x, hero.y - PROBE, hero.width, PROBE),
            Side::Right => Aabb::new(hero.right(), hero.y, PROBE, hero.height),
            Side::Top => Aabb::new(hero.x, hero.top(), hero.width, PROBE),
        }
    }
}

/// Which side of `hero` touches `obstacle`, `None` when no probe overlaps it
pub fn classify_side(hero: &Aabb, obstacle: &Aabb) -> Option<Side> {
    let mut greatest_area = 0.0;
    let mut greatest = None;

    for side in Side::PRIORITY {
        if let Some(overlap) = side.probe(hero).intersection(obstacle) {
            let area = overlap.area();
            if area > greatest_area {
                greatest_area = area;
                greatest = Some(side);
            }
        }
    }

    greatest
}

/// Apply the position correction and transition request for `side`.
///
/// Returns true when the hero now stands on the obstacle.
pub fn resolve_side(hero: &mut Hero, obstacle: &Aabb, side: Side) -> bool {
    match side {
        Side::Right => {
            hero.bbox.x = obstacle.x - hero.bbox.width;
            false
        }
        Side::Left => {
            hero.bbox.x = obstacle.right();
            false
        }
        Side::Bottom => {
            hero.bbox.y = obstacle.top();
            hero.on_idle();
            true
        }
        Side::Top => false,
    }
}

/// Something the resolver did that collaborators may care about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// Hero landed on an obstacle after not standing on one
    Landed { obstacle: u32 },
    /// Hero lost contact with the obstacle it stood on
    LostFooting,
    PowerUpCollected { id: u32, kind: PowerUpKind },
    HostileDefeated { id: u32, category: Category },
    HeroKilled { by: u32, category: Category },
}

/// Reconciles the hero against the active world objects each tick
#[derive(Debug)]
pub struct CollisionResolver {
    strategies: PowerUpStrategies,
    /// Hostiles overlapping the hero last tick
    touching_hostiles: Vec<u32>,
    /// Power-ups overlapping the hero last tick
    touching_power_ups: Vec<u32>,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(PowerUpStrategies::with_defaults())
    }
}

impl CollisionResolver {
    pub fn new(strategies: PowerUpStrategies) -> Self {
        Self {
            strategies,
            touching_hostiles: Vec::new(),
            touching_power_ups: Vec::new(),
        }
    }

    /// Forget every contact from previous ticks
    pub fn clear(&mut self) {
        self.touching_hostiles.clear();
        self.touching_power_ups.clear();
    }

    /// Resolve the hero against `obstacles` and `power_ups`.
    ///
    /// Collected power-ups are removed from `power_ups`.
    pub fn resolve(
        &mut self,
        hero: &mut Hero,
        obstacles: &mut [Obstacle],
        power_ups: &mut Vec<PowerUp>,
        score: &mut ScoreTracker,
    ) -> Vec<CollisionEvent> {
        let mut events = Vec::new();

        self.resolve_obstacles(hero, obstacles, &mut events);
        self.resolve_hostiles(hero, obstacles, score, &mut events);
        self.resolve_power_ups(hero, power_ups, score, &mut events);

        events
    }

    fn resolve_obstacles(
        &mut self,
        hero: &mut Hero,
        obstacles: &[Obstacle],
        events: &mut Vec<CollisionEvent>,
    ) {
        let mut grounded = false;

        for obstacle in obstacles.iter().filter(|o| !o.is_hostile()) {
            let Some(side) = classify_side(&hero.bbox, &obstacle.bbox) else {
                continue;
            };
            log::trace!("Hero touches obstacle {} on {:?}", obstacle.id, side);
            if resolve_side(hero, &obstacle.bbox, side) {
                // Only the first support of a fresh landing is reported
                if !hero.grounded && !grounded {
                    events.push(CollisionEvent::Landed {
                        obstacle: obstacle.id,
                    });
                }
                grounded = true;
            }
        }

        // Contact loss, not contact gain, drops the hero
        if hero.grounded && !grounded {
            hero.on_fall();
            events.push(CollisionEvent::LostFooting);
        }
        hero.grounded = grounded;
    }

    fn resolve_hostiles(
        &mut self,
        hero: &mut Hero,
        obstacles: &mut [Obstacle],
        score: &mut ScoreTracker,
        events: &mut Vec<CollisionEvent>,
    ) {
        let mut touching = Vec::new();

        for obstacle in obstacles.iter_mut() {
            let id = obstacle.id;
            let category = obstacle.category;
            let overlapping = hero.bbox.intersects(&obstacle.bbox);
            let Some(hostile) = obstacle.hostile.as_mut() else {
                continue;
            };
            let was_touching = self.touching_hostiles.contains(&id);

            if !overlapping {
                if was_touching {
                    hostile.on_idle();
                }
                continue;
            }
            touching.push(id);

            if was_touching || hostile.is_dead() || hero.is_dead() {
                continue;
            }

            hostile.on_attack();
            let mut target = EffectTarget {
                hero: &mut *hero,
                score: &mut *score,
            };
            if self.strategies.consume_weapon(&mut target) {
                hostile.on_die();
                log::debug!("Hero defeated {:?} {}", category, id);
                events.push(CollisionEvent::HostileDefeated { id, category });
            } else {
                hero.on_die();
                log::info!("Hero killed by {:?} {}", category, id);
                events.push(CollisionEvent::HeroKilled { by: id, category });
            }
        }

        self.touching_hostiles = touching;
    }

    fn resolve_power_ups(
        &mut self,
        hero: &mut Hero,
        power_ups: &mut Vec<PowerUp>,
        score: &mut ScoreTracker,
        events: &mut Vec<CollisionEvent>,
    ) {
        let mut touching = Vec::new();

        for power_up in power_ups.iter_mut().filter(|p| p.active) {
            if !hero.bbox.intersects(&power_up.bbox) {
                continue;
            }
            touching.push(power_up.id);
            if self.touching_power_ups.contains(&power_up.id) || hero.is_dead() {
                continue;
            }

            let mut target = EffectTarget {
                hero: &mut *hero,
                score: &mut *score,
            };
            if self.strategies.collect(power_up.kind, &mut target) {
                power_up.active = false;
                log::debug!("Collected {:?} {}", power_up.kind, power_up.id);
                events.push(CollisionEvent::PowerUpCollected {
                    id: power_up.id,
                    kind: power_up.kind,
                });
            }
        }

        power_ups.retain(|p| p.active);
        touching.retain(|id| power_ups.iter().any(|p| p.id == *id));
        self.touching_power_ups = touching;
    }
}
