//! Wall-clock tracking between sessions
//!
//! The only thing remembered across launches is the moment the last session
//! closed. On the next launch the gap is applied to the pet's needs in one
//! batch.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use crate::persistence::store::{SharedStore, LAST_LOGIN_KEY};

/// Source of "now" as seconds since the unix epoch
pub trait TimeSource {
    fn now_secs(&self) -> f64;
}

/// Reads the operating system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_secs(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Hand-driven clock for tests and replays
///
/// Clones share the same instant, so a test can keep one handle and move
/// time forward while the game holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<f64>>,
}

impl ManualTimeSource {
    pub fn new(start_secs: f64) -> Self {
        Self { now: Rc::new(Cell::new(start_secs)) }
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}

pub struct Clock {
    source: Box<dyn TimeSource>,
    store: SharedStore,
}

impl Clock {
    pub fn new(source: Box<dyn TimeSource>, store: SharedStore) -> Self {
        Self { source, store }
    }

    pub fn now_secs(&self) -> f64 {
        self.source.now_secs()
    }

    /// Seconds since the previous session closed
    ///
    /// `None` on a first run. A last-close time in the future (clock moved
    /// backwards) counts as no time passed.
    pub fn elapsed_since_last_session(&self) -> Option<f64> {
        let last = self.store.get(LAST_LOGIN_KEY)?.as_f64()?;
        let elapsed = self.now_secs() - last;
        if elapsed < 0.0 {
            tracing::warn!("Last session closed {:.0}s in the future; ignoring", -elapsed);
            return Some(0.0);
        }
        Some(elapsed)
    }

    /// Remember now as the moment this session closed
    pub fn record_session_close(&self) {
        let now = self.now_secs();
        self.store.put(LAST_LOGIN_KEY, json!(now));
        tracing::debug!("Session close recorded at {:.0}", now);
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock").field("now", &self.now_secs()).finish()
    }
}
