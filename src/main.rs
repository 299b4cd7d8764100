//! Neverending Run headless driver
//!
//! Runs the simulation with a scripted input pattern and logs what happened.
//! Usage: `neverending-run [settings.json] [seed] [ticks]`

#[cfg(not(target_arch = "wasm32"))]
use neverending_run::Settings;
#[cfg(not(target_arch = "wasm32"))]
use neverending_run::sim::{CollisionEvent, GameEvent, Intent, TickInput, World, tick};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 12345;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u64 = 3600;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Neverending Run (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            Settings::from_json(&json).map_err(|e| {
                log::error!("Invalid settings in {}: {}", path, e);
                e
            })?
        }
        None => Settings::default(),
    };
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(DEFAULT_SEED);
    let ticks = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(DEFAULT_TICKS);

    let mut world = World::new(settings, seed)?;
    let mut summary = Summary::default();

    for step in 0..ticks {
        let input = TickInput::with_intents(script(step));
        tick(&mut world, &input);
        for event in world.drain_events() {
            summary.record(&event);
        }
    }

    log::info!(
        "{} ticks: {} runs finished (best score {}), current score {} at {} m, x{:.1}, speed {}",
        ticks,
        summary.runs,
        summary.best_score.max(world.score()),
        world.score(),
        world.meters(),
        world.multiplier(),
        world.speed()
    );
    log::info!(
        "{} obstacles, {} power-ups collected, {} hostiles defeated, {} deaths",
        summary.obstacles,
        summary.power_ups,
        summary.hostiles_defeated,
        summary.deaths
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core has no web entry point
}

/// Run right, jump every couple of seconds, slide now and then
#[cfg(not(target_arch = "wasm32"))]
fn script(step: u64) -> &'static [Intent] {
    match step % 240 {
        0 => &[Intent::MoveRight, Intent::Jump],
        120 => &[Intent::Slide],
        60..=90 => &[Intent::None],
        _ => &[Intent::MoveRight],
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Summary {
    runs: u64,
    best_score: u64,
    obstacles: u64,
    power_ups: u64,
    hostiles_defeated: u64,
    deaths: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl Summary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Reset { score, meters } => {
                self.runs += 1;
                self.best_score = self.best_score.max(*score);
                log::info!("Run {} finished: score {}, {} m", self.runs, score, meters);
            }
            GameEvent::ObstacleSpawned { .. } => self.obstacles += 1,
            GameEvent::Collision(CollisionEvent::PowerUpCollected { .. }) => self.power_ups += 1,
            GameEvent::Collision(CollisionEvent::HostileDefeated { .. }) => {
                self.hostiles_defeated += 1
            }
            GameEvent::Collision(CollisionEvent::HeroKilled { .. }) => self.deaths += 1,
            _ => {}
        }
    }
}
