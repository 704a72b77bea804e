//! Day/night clock.

use serde::{Deserialize, Serialize};

/// Default length of a full day in seconds.
pub const DEFAULT_DAY_LENGTH: f32 = 600.0;

/// Time of day in `[0, 1)` plus a day counter.
///
/// `0.0` is sunrise; the second half of the cycle is night.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayClock {
    time: f32,
    day: u32,
    day_length: f32,
}

impl Default for DayClock {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_LENGTH)
    }
}

impl DayClock {
    /// A clock at sunrise of day 0. `day_length` must be positive.
    pub fn new(day_length: f32) -> Self {
        Self {
            time: 0.0,
            day: 0,
            day_length,
        }
    }

    /// Advance by `dt` seconds, wrapping into following days.
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() || self.day_length <= 0.0 {
            return;
        }
        self.time += dt / self.day_length;
        if self.time >= 1.0 {
            let whole = self.time.floor();
            self.day = self.day.saturating_add(whole as u32);
            self.time -= whole;
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn day_length(&self) -> f32 {
        self.day_length
    }

    #[inline]
    pub fn is_night(&self) -> bool {
        self.time >= 0.5
    }
}
