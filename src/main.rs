//! Fruit Catch headless runner
//!
//! Plays one round at a fixed timestep with a simple autopilot steering the
//! basket, logging lifecycle events along the way.
//!
//! Usage: `fruit-catch [tuning.json] [seed]`

use anyhow::Context;
use glam::Vec2;

use fruit_catch::Tuning;
use fruit_catch::sim::{Aabb, GameEvent, RoundPhase, RoundStateMachine, VisualPreset};

/// Fixed simulation timestep (60 Hz)
const SIM_DT: f32 = 1.0 / 60.0;
/// Basket inside-zone size and height above the floor
const BASKET_SIZE: Vec2 = Vec2::new(120.0, 30.0);
const BASKET_Y: f32 = 60.0;
/// Horizontal basket speed (units/sec)
const BASKET_SPEED: f32 = 400.0;

fn default_presets() -> Vec<VisualPreset> {
    vec![
        VisualPreset::new("apple", 128.0, 128.0),
        VisualPreset::new("banana", 160.0, 128.0),
        VisualPreset::new("cherry", 112.0, 128.0),
        VisualPreset::new("pear", 100.0, 128.0),
        VisualPreset::new("mushroom", 120.0, 128.0),
    ]
}

/// Column of the lowest item worth catching, if any
fn autopilot_target(round: &RoundStateMachine) -> Option<f32> {
    round
        .registry()
        .iter()
        .filter(|e| !e.is_hazard())
        .min_by(|a, b| a.position().y.total_cmp(&b.position().y))
        .map(|e| e.position().x)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).with_context(|| format!("loading tuning from {path}"))?,
        None => Tuning::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().with_context(|| format!("invalid seed '{s}'"))?,
        None => 42,
    };

    log::info!("Fruit Catch (headless) starting with seed {}", seed);

    let area = tuning.play_area.clone();
    let mut round = RoundStateMachine::new(tuning, default_presets(), seed)
        .context("building the round")?;
    let mut basket_x = area.left + area.width / 2.0;
    round.restart();

    let (mut caught, mut missed, mut hazards) = (0u32, 0u32, 0u32);
    while round.phase() == RoundPhase::Running {
        if let Some(target_x) = autopilot_target(&round) {
            let step = BASKET_SPEED * SIM_DT;
            basket_x += (target_x - basket_x).clamp(-step, step);
        }
        let half = BASKET_SIZE.x / 2.0;
        basket_x = basket_x.clamp(area.left + half, area.right() - half);
        round.set_catch_target(Aabb::from_center(
            Vec2::new(basket_x, BASKET_Y),
            BASKET_SIZE,
        ));

        round.tick(SIM_DT);

        for event in round.drain_events() {
            match event {
                GameEvent::Spawned { handle, preset, .. } => {
                    log::debug!("spawn {} ({})", handle, preset)
                }
                GameEvent::Caught { hazard: true, .. } => hazards += 1,
                GameEvent::Caught { .. } => caught += 1,
                GameEvent::BoundaryExit { .. } => missed += 1,
                GameEvent::RoundEnded { reason, score } => {
                    log::info!("Round over: {:?}, score {}", reason, score)
                }
            }
        }
    }

    let state = round.state();
    println!(
        "score {} | lives {} | time {:.1}s | caught {} | missed {} | hazards {}",
        state.score, state.lives, state.elapsed, caught, missed, hazards
    );
    Ok(())
}
