use anyhow::Result;

use crate::world_core::config::GameConfig;
use crate::world_runtime::{RuntimeStats, WorldRuntime};

mod args;
mod autopilot;

pub use args::RunArgs;
pub use autopilot::Autopilot;

const REPORT_EVERY_TICKS: u64 = 300;

/// Runs the world headless under the autopilot for `args.ticks` frames.
pub fn run(args: &RunArgs, mut config: GameConfig) -> Result<RuntimeStats> {
    args.apply(&mut config);
    let mut autopilot = Autopilot::new(&config.avatar);
    let mut world = WorldRuntime::new(config)?;

    for _ in 0..args.ticks {
        let input = autopilot.next_input(world.avatar(), world.last_contact());
        world.update(args.dt, &input);

        let stats = world.stats();
        if stats.tick % REPORT_EVERY_TICKS == 0 {
            log_stats(&stats, &world.energy_text());
        }
    }

    let stats = world.stats();
    log::info!(
        "run finished after {} ticks ({:.1}s): {} chunks materialized, {} dematerialized, {} fruit collected",
        stats.tick,
        stats.elapsed,
        stats.materialized_total,
        stats.dematerialized_total,
        stats.fruits_collected
    );
    Ok(stats)
}

fn log_stats(stats: &RuntimeStats, energy_text: &str) {
    log::info!(
        "t={:.1}s x={:.0} y={:.0} {:?} {} | chunk {} ({} loaded)",
        stats.elapsed,
        stats.avatar_position.x,
        stats.avatar_position.y,
        stats.avatar_state,
        energy_text,
        stats.center_chunk,
        stats.loaded_chunks
    );
}
