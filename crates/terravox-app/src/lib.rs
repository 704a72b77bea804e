//! Application framework for the Terravox voxel sandbox.
//!
//! This crate provides a trait-based headless runner that handles:
//! - Logging initialization (`RUST_LOG`, default `info`)
//! - A fixed-timestep tick loop with optional real-time pacing
//! - Tick statistics and shutdown
//!
//! # Example
//!
//! ```no_run
//! use terravox_app::{run_app, AppConfig, AppContext, SimApp};
//!
//! struct MyApp;
//!
//! impl SimApp for MyApp {
//!     fn init(_ctx: &mut AppContext) -> anyhow::Result<Self> {
//!         Ok(MyApp)
//!     }
//!
//!     fn update(&mut self, _ctx: &AppContext, _dt: f32) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     run_app::<MyApp>(AppConfig::new("my app").with_max_ticks(100))?;
//!     Ok(())
//! }
//! ```

mod app;
mod context;
mod runner;

pub use app::SimApp;
pub use context::AppContext;
pub use runner::{init_logging, run_app, run_loop, AppConfig, RunSummary};
