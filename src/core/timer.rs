//! Tick-driven timers
//!
//! Timed sequences are plain state objects advanced by the host's frame
//! callback. Stopping is always idempotent.

use serde::{Deserialize, Serialize};

/// One-shot timer counting down to zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
    running: bool,
}

impl Countdown {
    pub fn new(secs: f32) -> Self {
        Self { remaining: secs.max(0.0), running: true }
    }

    pub fn start(&mut self, secs: f32) {
        *self = Self::new(secs);
    }

    /// Advance by `dt`; returns true exactly once, on the tick it expires
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.running || !dt.is_finite() || dt < 0.0 {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return true;
        }
        false
    }

    /// Halt without firing; returns whether it was running
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Repeating timer that fires once per period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    period: f32,
    until_next: f32,
    running: bool,
}

impl Interval {
    /// Start with the first firing one full period away
    pub fn new(period: f32) -> Self {
        Self { period, until_next: period, running: period > 0.0 }
    }

    /// Advance by `dt`; returns how many periods elapsed
    ///
    /// The count saturates at `u32::MAX`. The next firing always ends up
    /// within one period, however small the period is.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.until_next -= dt;
        if self.until_next > 0.0 {
            return 0;
        }
        let overshoot = -self.until_next;
        let fired = ((overshoot / self.period).floor() as u32).saturating_add(1);
        self.until_next = self.period - overshoot.rem_euclid(self.period);
        fired
    }

    /// Halt; returns whether it was running
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
