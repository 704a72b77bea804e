//! `SimApp` implementation driving a [`Game`].

use terravox_app::{AppContext, SimApp};
use terravox_physics::{PhysicsConfig, StepOutcome};
use terravox_world::{StreamingConfig, WorldConfig, MAX_LOAD_RADIUS};
use tracing::info;

use crate::game::Game;

/// Seconds of simulated time between status lines.
const STATUS_INTERVAL: f64 = 10.0;

/// Simulation parameters (from CLI or defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct SimOptions {
    pub seed: u64,
    /// Ticks to run before exiting; None runs forever.
    pub ticks: Option<u64>,
    pub load_radius: i32,
    pub tick_rate: u32,
    pub realtime: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: Some(2400),
            load_radius: terravox_core::constants::RENDER_DISTANCE,
            tick_rate: 20,
            realtime: false,
        }
    }
}

impl SimOptions {
    /// Parse simulation parameters from command line arguments.
    pub fn from_args() -> Self {
        Self::parse(std::env::args())
    }

    /// Parse from an argument list whose first item is the program name.
    /// Unknown flags and unparsable values are ignored.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut options = Self::default();
        let args: Vec<String> = args.into_iter().collect();

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1);
            let consumed = match args[i].as_str() {
                "--seed" => parse_into(value, &mut options.seed),
                "--load-radius" => parse_into(value, &mut options.load_radius),
                "--tick-rate" => parse_into(value, &mut options.tick_rate),
                "--ticks" => match value.and_then(|v| v.parse::<u64>().ok()) {
                    Some(0) => {
                        options.ticks = None;
                        true
                    }
                    Some(n) => {
                        options.ticks = Some(n);
                        true
                    }
                    None => false,
                },
                "--realtime" => {
                    options.realtime = true;
                    false
                }
                _ => false,
            };
            i += if consumed { 2 } else { 1 };
        }

        options
    }

    pub fn world_config(&self) -> WorldConfig {
        let streaming = StreamingConfig::default().with_load_radius(self.load_radius);
        // Room for the whole unload area so large radii stay valid; radii past
        // the world limit are left for validation to reject.
        let side = 2 * streaming.unload_radius.clamp(0, 2 * MAX_LOAD_RADIUS) as usize + 1;
        let max_chunks = streaming.max_chunks.max(side * side);
        let streaming = streaming.with_max_chunks(max_chunks);
        WorldConfig::default()
            .with_seed(self.seed)
            .with_streaming(streaming)
    }
}

fn parse_into<T: std::str::FromStr>(value: Option<&String>, slot: &mut T) -> bool {
    match value.and_then(|v| v.parse().ok()) {
        Some(parsed) => {
            *slot = parsed;
            true
        }
        None => false,
    }
}

/// Headless simulation: an autopiloted player wandering a streamed world.
pub struct Simulation {
    game: Game,
    last_step: StepOutcome,
    next_status: f64,
}

impl SimApp for Simulation {
    fn init(_ctx: &mut AppContext) -> anyhow::Result<Self> {
        let options = SimOptions::from_args();
        info!(
            "World seed {}, load radius {}",
            options.seed, options.load_radius
        );
        let game = Game::new(options.world_config(), PhysicsConfig::default())?;
        Ok(Self {
            game,
            last_step: StepOutcome::default(),
            next_status: STATUS_INTERVAL,
        })
    }

    fn update(&mut self, ctx: &AppContext, dt: f32) -> anyhow::Result<()> {
        let intent = self.game.wander_intent(&self.last_step);
        self.last_step = self.game.tick(dt, intent).player;

        if ctx.sim_time() >= self.next_status {
            self.next_status += STATUS_INTERVAL;
            let clock = self.game.world().clock();
            let chunks = self.game.world().chunks();
            let player = self.game.player();
            info!(
                "Day {} t={:.2}: player at {:.1?} ({:.0} hp), {} chunks ({:.1} MiB), {} mobs",
                clock.day(),
                clock.time(),
                player.position(),
                player.health.current,
                chunks.len(),
                chunks.memory_usage() as f64 / (1024.0 * 1024.0),
                self.game.mobs().len()
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut AppContext) {
        let stats = self.game.stats();
        info!("Simulation statistics:");
        info!("  Ticks: {}", stats.ticks);
        info!(
            "  Chunks generated: {} (evicted {})",
            stats.chunks_generated, stats.chunks_evicted
        );
        info!(
            "  Blocks fallen: {}, burned: {}",
            stats.blocks_fallen, stats.blocks_burned
        );
        info!(
            "  Blocks mined: {}, placed: {}",
            stats.blocks_mined, stats.blocks_placed
        );
        info!(
            "  Mobs spawned: {}, removed: {}",
            stats.mobs_spawned, stats.mobs_removed
        );
        info!("  Player deaths: {}", stats.player_deaths);
    }
}
