//! Terravox headless simulation
//!
//! Streams a procedurally generated voxel world around a wandering player,
//! running block physics, the day clock, mob spawning and entity physics at
//! a fixed tick rate.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p terravox-sim -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--seed <N>`: World generation seed (default: 42)
//! - `--ticks <N>`: Ticks to simulate, 0 for unlimited (default: 2400)
//! - `--load-radius <N>`: Chunk load radius around the player (default: 3)
//! - `--tick-rate <N>`: Ticks per simulated second (default: 20)
//! - `--realtime`: Sleep so simulated time tracks wall time
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod app;
mod game;

use terravox_app::{run_app, AppConfig};

use crate::app::{SimOptions, Simulation};

fn main() -> anyhow::Result<()> {
    // Check for help flag before starting the app
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    let options = SimOptions::from_args();
    let mut config = AppConfig::new("Terravox Simulation")
        .with_tick_rate(options.tick_rate)
        .with_realtime(options.realtime);
    if let Some(ticks) = options.ticks {
        config = config.with_max_ticks(ticks);
    }

    run_app::<Simulation>(config)?;
    Ok(())
}

fn print_help() {
    eprintln!(
        "Terravox headless simulation

USAGE:
    cargo run -p terravox-sim -- [OPTIONS]

WORLD OPTIONS:
    --seed <N>              World generation seed (default: 42)
    --load-radius <N>       Chunk load radius around the player (default: 3)

LOOP OPTIONS:
    --ticks <N>             Ticks to simulate, 0 for unlimited (default: 2400)
    --tick-rate <N>         Ticks per simulated second (default: 20)
    --realtime              Sleep so simulated time tracks wall time

OTHER:
    -h, --help              Print this help message

EXAMPLES:
    # Two simulated minutes on the default seed
    cargo run -p terravox-sim

    # A longer run on another seed with more terrain loaded
    cargo run -p terravox-sim -- --seed 7 --ticks 12000 --load-radius 5

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}
