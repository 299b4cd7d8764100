//! Procedural obstacle stream
//!
//! Decides each tick whether a new obstacle (or power-up) may enter at the
//! right edge of the viewport, places it so the hero can always get past,
//! and retires obstacles that scrolled out on the left. Scrolling itself is
//! the caller's job.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hero::HeroMetrics;
use super::obstacle::{Category, Obstacle};
use super::powerup::{PowerUp, PowerUpKind};
use crate::error::ConfigError;
use crate::settings::SpawnSettings;

/// Uniform draw in `[low, high)`; collapses to `low` when the range is empty
fn draw<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.random_range(low..high)
    } else {
        low
    }
}

fn random_category<R: Rng + ?Sized>(rng: &mut R) -> Category {
    Category::ALL[rng.random_range(0..Category::ALL.len())]
}

/// Active obstacles in spawn order plus the spawning policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleStream {
    active: Vec<Obstacle>,
    next_id: u32,
    spawn_probability: u32,
    minimum_distance_multiplier: u32,
    power_up_probability: u32,
    ground_offset: f32,
}

impl ObstacleStream {
    pub fn new(settings: &SpawnSettings, ground_offset: f32) -> Result<Self, ConfigError> {
        let mut stream = Self {
            active: Vec::new(),
            next_id: 1,
            spawn_probability: 1,
            minimum_distance_multiplier: 1,
            power_up_probability: 1,
            ground_offset,
        };
        stream.set_spawn_probability(settings.spawn_probability)?;
        stream.set_minimum_distance_multiplier(settings.minimum_distance_multiplier)?;
        stream.set_power_up_probability(settings.power_up_probability)?;
        Ok(stream)
    }

    /// Inverse spawn chance: with 1 an obstacle spawns as soon as the gap allows
    pub fn set_spawn_probability(&mut self, spawn_probability: u32) -> Result<(), ConfigError> {
        if spawn_probability < 1 {
            return Err(ConfigError::SpawnProbability(spawn_probability));
        }
        self.spawn_probability = spawn_probability;
        Ok(())
    }

    /// Minimum gap between obstacles in hero widths; 1 leaves exactly one hero of room
    pub fn set_minimum_distance_multiplier(
        &mut self,
        minimum_distance_multiplier: u32,
    ) -> Result<(), ConfigError> {
        if minimum_distance_multiplier < 1 {
            return Err(ConfigError::MinimumDistanceMultiplier(
                minimum_distance_multiplier,
            ));
        }
        self.minimum_distance_multiplier = minimum_distance_multiplier;
        Ok(())
    }

    pub fn set_power_up_probability(
        &mut self,
        power_up_probability: u32,
    ) -> Result<(), ConfigError> {
        if power_up_probability < 1 {
            return Err(ConfigError::PowerUpProbability(power_up_probability));
        }
        self.power_up_probability = power_up_probability;
        Ok(())
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.active
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.active
    }

    /// Most recently spawned obstacle still active
    pub fn last(&self) -> Option<&Obstacle> {
        self.active.last()
    }

    /// Forget every active obstacle, keeping the spawning policy
    pub fn clear(&mut self) {
        self.active.clear();
        self.next_id = 1;
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, obstacle: Obstacle) {
        self.active.push(obstacle);
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Minimum free distance before a non-chained obstacle may spawn
    pub fn minimum_gap(&self, hero: &HeroMetrics) -> f32 {
        hero.standard_width * self.minimum_distance_multiplier as f32
    }

    /// Category allowed to spawn this tick, if any.
    ///
    /// Legality depends on the last obstacle and on the free distance between
    /// its right edge and the right edge of the viewport.
    pub fn choose_category<R: Rng + ?Sized>(
        &self,
        viewport_width: f32,
        hero: &HeroMetrics,
        rng: &mut R,
    ) -> Option<Category> {
        let last = match self.last() {
            Some(last) if last.bbox.is_x_visible(viewport_width) => last,
            _ => return Some(random_category(rng)),
        };

        let distance = (viewport_width - last.bbox.right()).trunc();

        // Still entering the screen
        if distance < 0.0 {
            return None;
        }

        // Back-to-back chaining
        if distance == 0.0 {
            match last.category {
                Category::Jumpable => {
                    return match rng.random_range(-1..=1) {
                        1 => Some(Category::Jumpable),
                        -1 => Some(Category::Slidable),
                        _ => None,
                    };
                }
                Category::Slidable | Category::JumpableSlidable => return None,
                Category::Wolf | Category::Golem => {
                    if rng.random_bool(0.5) {
                        return Some(Category::Jumpable);
                    }
                }
                Category::Witch => {}
            }
        }

        if distance < self.minimum_gap(hero) {
            return None;
        }

        if rng.random_range(0..self.spawn_probability) == 0 {
            Some(random_category(rng))
        } else {
            None
        }
    }

    /// Maybe spawn an obstacle at the right edge of the viewport
    pub fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        viewport_width: f32,
        hero: &HeroMetrics,
        rng: &mut R,
    ) -> Option<&Obstacle> {
        let category = self.choose_category(viewport_width, hero, rng)?;
        let obstacle = self.build(category, viewport_width, hero, rng);
        log::debug!(
            "Spawned {:?} {} at ({}, {}) size {}x{}",
            obstacle.category,
            obstacle.id,
            obstacle.bbox.x,
            obstacle.bbox.y,
            obstacle.bbox.width,
            obstacle.bbox.height
        );
        self.active.push(obstacle);
        self.active.last()
    }

    /// Size and place a new obstacle of `category`
    fn build<R: Rng + ?Sized>(
        &mut self,
        category: Category,
        viewport_width: f32,
        hero: &HeroMetrics,
        rng: &mut R,
    ) -> Obstacle {
        let base = category.base_size();
        let jump = hero.max_jump_elevation;
        let half_height = hero.standard_height / 2.0;

        // Jumpables are resized once so they always stay below the jump apex
        let size = if category == Category::Jumpable {
            let max_height = jump - 1.0;
            let min_height = base.y.min(max_height);
            Vec2::new(base.x, draw(rng, min_height, max_height))
        } else {
            base
        };

        let y = match category {
            Category::Jumpable | Category::Wolf | Category::Golem | Category::Witch => 0.0,
            Category::Slidable => {
                let mut y = draw(rng, half_height, hero.standard_height - 1.0);
                let chained = self.last().filter(|last| {
                    last.category == Category::Jumpable
                        && last.bbox.right() >= viewport_width - 1.0
                });
                if let Some(last) = chained {
                    y += last.bbox.height + last.bbox.y - self.ground_offset;
                }
                y
            }
            Category::JumpableSlidable => {
                draw(rng, half_height, half_height + jump - size.y)
            }
        };

        let id = self.next_entity_id();
        let mut obstacle = Obstacle::with_size(
            id,
            category,
            Vec2::new(viewport_width, y + self.ground_offset),
            size,
        );
        obstacle.refresh_visibility(viewport_width);
        obstacle
    }

    /// Maybe spawn a power-up within jumping reach at the right edge
    pub fn try_spawn_power_up<R: Rng + ?Sized>(
        &mut self,
        viewport_width: f32,
        hero: &HeroMetrics,
        rng: &mut R,
    ) -> Option<PowerUp> {
        if rng.random_range(0..self.power_up_probability) != 0 {
            return None;
        }
        // Keep the spawn column clear of the obstacle still entering
        if self
            .last()
            .is_some_and(|last| last.bbox.right() > viewport_width - PowerUp::SIZE)
        {
            return None;
        }

        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let low = hero.standard_height;
        let y = draw(rng, low, low + hero.max_jump_elevation - PowerUp::SIZE);
        let id = self.next_entity_id();
        log::debug!("Spawned power-up {:?} {}", kind, id);
        Some(PowerUp::new(id, kind, viewport_width, y + self.ground_offset))
    }

    /// Update the visibility flag of every active obstacle
    pub fn refresh_visibility(&mut self, viewport_width: f32) {
        for obstacle in &mut self.active {
            obstacle.refresh_visibility(viewport_width);
        }
    }

    /// Drop obstacles that scrolled past the left edge, keeping a hero-width
    /// margin. Returns how many were removed.
    pub fn retire_offscreen(&mut self, hero_width: f32) -> usize {
        let before = self.active.len();
        self.active
            .retain(|obstacle| obstacle.bbox.right() + hero_width >= 0.0);
        before - self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const VIEWPORT: f32 = 800.0;

    fn stream() -> ObstacleStream {
        ObstacleStream::new(&SpawnSettings::default(), 0.0).unwrap()
    }

    fn with_last(category: Category, right_edge: f32) -> ObstacleStream {
        let mut stream = stream();
        let size = category.base_size();
        stream.active.push(Obstacle::new(
            99,
            category,
            Vec2::new(right_edge - size.x, 0.0),
        ));
        stream
    }

    #[test]
    fn test_rejects_bad_tunables() {
        let mut stream = stream();
        assert!(matches!(
            stream.set_spawn_probability(0),
            Err(ConfigError::SpawnProbability(0))
        ));
        assert!(matches!(
            stream.set_minimum_distance_multiplier(0),
            Err(ConfigError::MinimumDistanceMultiplier(0))
        ));
        let settings = SpawnSettings {
            spawn_probability: 0,
            ..SpawnSettings::default()
        };
        assert!(ObstacleStream::new(&settings, 0.0).is_err());
    }

    #[test]
    fn test_empty_stream_always_spawns_at_right_edge() {
        let hero = HeroMetrics::default();
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut stream = stream();
            let obstacle = stream.try_spawn(VIEWPORT, &hero, &mut rng).unwrap();
            assert_eq!(obstacle.bbox.x, VIEWPORT);
            assert!(obstacle.visible);
        }
    }

    #[test]
    fn test_waits_while_last_is_entering() {
        let hero = HeroMetrics::default();
        let stream = with_last(Category::Jumpable, VIEWPORT + 5.0);
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            assert_eq!(stream.choose_category(VIEWPORT, &hero, &mut rng), None);
        }
    }

    #[test]
    fn test_nothing_chains_after_slidables() {
        let hero = HeroMetrics::default();
        for category in [Category::Slidable, Category::JumpableSlidable] {
            let stream = with_last(category, VIEWPORT);
            for seed in 0..50 {
                let mut rng = Pcg32::seed_from_u64(seed);
                assert_eq!(stream.choose_category(VIEWPORT, &hero, &mut rng), None);
            }
        }
    }

    #[test]
    fn test_jumpable_chains_jumpable_or_slidable() {
        let hero = HeroMetrics::default();
        let stream = with_last(Category::Jumpable, VIEWPORT);
        let mut seen = [false; 3];
        for seed in 0..300 {
            let mut rng = Pcg32::seed_from_u64(seed);
            match stream.choose_category(VIEWPORT, &hero, &mut rng) {
                Some(Category::Jumpable) => seen[0] = true,
                Some(Category::Slidable) => seen[1] = true,
                None => seen[2] = true,
                Some(other) => panic!("illegal chain after Jumpable: {other:?}"),
            }
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_ground_hostile_chains_only_jumpable() {
        let hero = HeroMetrics::default();
        let stream = with_last(Category::Wolf, VIEWPORT);
        let mut chained = 0;
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            match stream.choose_category(VIEWPORT, &hero, &mut rng) {
                Some(Category::Jumpable) => chained += 1,
                None => {}
                Some(other) => panic!("illegal chain after Wolf: {other:?}"),
            }
        }
        assert!(chained > 50 && chained < 150);
    }

    #[test]
    fn test_wide_gap_spawns_with_certainty_at_probability_one() {
        let hero = HeroMetrics::default();
        let mut stream = with_last(Category::Slidable, VIEWPORT - 100.0);
        stream.set_spawn_probability(1).unwrap();
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            assert!(stream.choose_category(VIEWPORT, &hero, &mut rng).is_some());
        }
    }

    #[test]
    fn test_invisible_last_allows_any_category() {
        let hero = HeroMetrics::default();
        let stream = with_last(Category::Slidable, -5.0);
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(stream.choose_category(VIEWPORT, &hero, &mut rng).is_some());
    }

    #[test]
    fn test_slidable_sits_in_lower_half_band() {
        let hero = HeroMetrics::default();
        for seed in 0..100 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut stream = stream();
            let o = stream.build(Category::Slidable, VIEWPORT, &hero, &mut rng);
            assert!(o.bbox.y >= hero.standard_height / 2.0);
            assert!(o.bbox.y < hero.standard_height - 1.0);
        }
    }

    #[test]
    fn test_slidable_chained_after_jumpable_is_raised() {
        let hero = HeroMetrics::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut stream = with_last(Category::Jumpable, VIEWPORT);
        let last_top = stream.last().unwrap().bbox.top();
        let o = stream.build(Category::Slidable, VIEWPORT, &hero, &mut rng);
        assert!(o.bbox.y >= hero.standard_height / 2.0 + last_top);
    }

    #[test]
    fn test_jumpable_slidable_band() {
        let hero = HeroMetrics::default();
        let height = Category::JumpableSlidable.base_size().y;
        for seed in 0..100 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut stream = stream();
            let o = stream.build(Category::JumpableSlidable, VIEWPORT, &hero, &mut rng);
            let low = hero.standard_height / 2.0;
            assert!(o.bbox.y >= low);
            assert!(o.bbox.y < low + hero.max_jump_elevation - height);
        }
    }

    #[test]
    fn test_degenerate_band_collapses_to_lower_bound() {
        let hero = HeroMetrics {
            max_jump_elevation: 1.5,
            ..HeroMetrics::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let mut stream = stream();
        let o = stream.build(Category::JumpableSlidable, VIEWPORT, &hero, &mut rng);
        assert_eq!(o.bbox.y, hero.standard_height / 2.0);
        let o = stream.build(Category::Jumpable, VIEWPORT, &hero, &mut rng);
        assert_eq!(o.bbox.height, 0.5);
    }

    #[test]
    fn test_ground_offset_applies() {
        let hero = HeroMetrics::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut stream = ObstacleStream::new(&SpawnSettings::default(), 12.0).unwrap();
        let o = stream.build(Category::Wolf, VIEWPORT, &hero, &mut rng);
        assert_eq!(o.bbox.y, 12.0);
    }

    #[test]
    fn test_retire_offscreen_keeps_margin() {
        let mut stream = stream();
        let w = HeroMetrics::default().standard_width;
        stream
            .active
            .push(Obstacle::new(1, Category::Jumpable, Vec2::new(-100.0, 0.0)));
        stream
            .active
            .push(Obstacle::new(2, Category::Jumpable, Vec2::new(-24.0 - w, 0.0)));
        stream
            .active
            .push(Obstacle::new(3, Category::Jumpable, Vec2::new(300.0, 0.0)));
        assert_eq!(stream.retire_offscreen(w), 1);
        let ids: Vec<_> = stream.obstacles().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_power_up_waits_for_clear_column() {
        let hero = HeroMetrics::default();
        let settings = SpawnSettings {
            power_up_probability: 1,
            ..SpawnSettings::default()
        };
        let mut stream = ObstacleStream::new(&settings, 0.0).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let power_up = stream.try_spawn_power_up(VIEWPORT, &hero, &mut rng).unwrap();
        assert_eq!(power_up.bbox.x, VIEWPORT);
        assert!(power_up.bbox.y >= hero.standard_height);
        assert!(power_up.bbox.top() <= hero.standard_height + hero.max_jump_elevation);

        stream
            .active
            .push(Obstacle::new(7, Category::Jumpable, Vec2::new(VIEWPORT - 4.0, 0.0)));
        assert!(stream.try_spawn_power_up(VIEWPORT, &hero, &mut rng).is_none());
    }

    #[test]
    fn test_same_seed_same_stream() {
        let hero = HeroMetrics::default();
        let run = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut stream = stream();
            let mut spawned = Vec::new();
            for _ in 0..2000 {
                for o in stream.obstacles_mut() {
                    o.bbox.x -= 4.0;
                }
                stream.retire_offscreen(hero.standard_width);
                if let Some(o) = stream.try_spawn(VIEWPORT, &hero, &mut rng) {
                    spawned.push((o.category, o.bbox));
                }
            }
            spawned
        };
        let first = run(42);
        assert!(!first.is_empty());
        assert_eq!(first, run(42));
    }

    proptest! {
        #[test]
        fn never_spawns_inside_minimum_gap(
            multiplier in 1u32..8,
            fraction in 0.0f32..1.0,
            seed in any::<u64>(),
        ) {
            let hero = HeroMetrics::default();
            let mut stream = with_last(Category::Jumpable, VIEWPORT);
            stream.set_minimum_distance_multiplier(multiplier).unwrap();
            stream.set_spawn_probability(1).unwrap();
            let gap = stream.minimum_gap(&hero);
            // Strictly positive distance below the gap
            let distance = (1.0 + fraction * (gap - 1.0)).floor().min(gap - 1.0).max(1.0);
            stream.active[0].bbox.x = VIEWPORT - distance - stream.active[0].bbox.width;

            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert!(stream.try_spawn(VIEWPORT, &hero, &mut rng).is_none());
        }

        #[test]
        fn jumpables_stay_below_jump_height(
            jump in 2.0f32..200.0,
            seed in any::<u64>(),
        ) {
            let hero = HeroMetrics {
                max_jump_elevation: jump,
                ..HeroMetrics::default()
            };
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut stream = stream();
            let o = stream.build(Category::Jumpable, VIEWPORT, &hero, &mut rng);
            prop_assert!(o.bbox.height < jump);
            prop_assert!(o.bbox.height >= 0.0);
        }
    }
}
