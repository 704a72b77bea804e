//! Application context.

use std::time::{Duration, Instant};

/// Timing state shared with every [`SimApp`](crate::SimApp) call.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Fixed tick length in seconds.
    pub dt: f32,
    /// Ticks completed so far.
    pub tick_count: u64,
    /// When the loop started.
    pub(crate) started: Instant,
}

impl AppContext {
    pub(crate) fn new(dt: f32) -> Self {
        Self {
            dt,
            tick_count: 0,
            started: Instant::now(),
        }
    }

    /// Simulated seconds elapsed.
    pub fn sim_time(&self) -> f64 {
        self.tick_count as f64 * f64::from(self.dt)
    }

    /// Wall-clock time since the loop started.
    pub fn wall_time(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn advance(&mut self) {
        self.tick_count += 1;
    }
}
