use sidescroll_world::app::{self, RunArgs};
use sidescroll_world::world_core::config::GameConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = RunArgs::from_env_args()?;
    log::info!(
        "headless run: {} ticks at dt {:.4}s, seed override {:?}",
        args.ticks,
        args.dt,
        args.seed
    );

    let config = GameConfig::load();
    app::run(&args, config)?;
    Ok(())
}
