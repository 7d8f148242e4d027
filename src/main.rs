//! AR Box Shooter entry point
//!
//! Native builds have no AR session to attach to, so this runs the headless
//! autoplay against the in-memory engine and reports how the rounds went.
//!
//! Usage: `ar-box-shooter [settings.json] [seed]`

use anyhow::{Context, Result};

use ar_box_shooter::Settings;
use ar_box_shooter::demo::{Autoplay, AutoplayConfig};

fn main() -> Result<()> {
    env_logger::init();
    log::info!("AR Box Shooter (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    let seed = match args.next() {
        Some(seed) => seed
            .parse::<u64>()
            .with_context(|| format!("seed must be an integer, got {seed:?}"))?,
        None => AutoplayConfig::default().seed,
    };

    let config = AutoplayConfig {
        seed,
        ..Default::default()
    };
    let rounds = config.rounds;
    let mut autoplay = Autoplay::new(settings.rules(), config);
    settings.apply_to(&mut autoplay.engine);
    let stats = autoplay.run();

    println!(
        "{} of {} rounds won, {} lost ({} shots, {} boxes, {} caught misses, {} frames)",
        stats.rounds_won,
        rounds,
        stats.rounds_lost,
        stats.shots_fired,
        stats.boxes_destroyed,
        stats.misses,
        stats.ticks
    );
    Ok(())
}
