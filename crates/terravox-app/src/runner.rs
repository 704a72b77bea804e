//! Fixed-timestep application runner.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::bail;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::app::SimApp;
use crate::context::AppContext;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name used in log output.
    pub title: String,
    /// Simulation ticks per simulated second.
    pub tick_rate: u32,
    /// Stop after this many ticks (None runs until the app exits).
    pub max_ticks: Option<u64>,
    /// Sleep between ticks so simulated time tracks wall time.
    pub realtime: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Terravox".to_string(),
            tick_rate: 20,
            max_ticks: None,
            realtime: false,
        }
    }
}

impl AppConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    #[must_use]
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Length of one tick in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// Totals reported when the loop ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub sim_time: f64,
    pub wall_time: Duration,
}

/// Install the global `tracing` subscriber (`RUST_LOG`, default `info`).
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    if result.is_err() {
        debug!("Global subscriber already installed");
    }
}

/// Run a SimApp with the given configuration.
///
/// Initializes logging, then drives the app at a fixed timestep until the
/// tick limit is reached or the app asks to exit.
pub fn run_app<A: SimApp>(config: AppConfig) -> anyhow::Result<RunSummary> {
    init_logging();
    run_loop::<A>(&config)
}

/// The tick loop without logging setup.
pub fn run_loop<A: SimApp>(config: &AppConfig) -> anyhow::Result<RunSummary> {
    if config.tick_rate == 0 {
        bail!("tick rate must be positive");
    }
    info!("{} starting at {} ticks/s", config.title, config.tick_rate);

    let dt = config.dt();
    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(config.tick_rate));
    let mut ctx = AppContext::new(dt);
    let mut app = A::init(&mut ctx)?;
    info!("Application ready!");

    let mut slowest = Duration::ZERO;
    loop {
        if config.max_ticks.is_some_and(|max| ctx.tick_count >= max) || app.should_exit() {
            break;
        }
        let tick_start = Instant::now();
        app.update(&ctx, dt)?;
        ctx.advance();

        let elapsed = tick_start.elapsed();
        slowest = slowest.max(elapsed);
        if config.realtime && elapsed < tick_duration {
            thread::sleep(tick_duration - elapsed);
        }
    }

    let summary = RunSummary {
        ticks: ctx.tick_count,
        sim_time: ctx.sim_time(),
        wall_time: ctx.wall_time(),
    };
    info!("Tick statistics:");
    info!("  Total ticks: {}", summary.ticks);
    info!("  Simulated: {:.1}s", summary.sim_time);
    info!("  Wall time: {:.2?}", summary.wall_time);
    info!("  Slowest tick: {:.2?}", slowest);

    info!("Starting cleanup...");
    app.cleanup(&mut ctx);
    info!("Cleanup complete");
    Ok(summary)
}
