//! Pet state: needs and their critical-level monitor

pub mod monitor;
pub mod needs;

pub use monitor::{CriticalMonitor, NeedTransition};
pub use needs::{NeedDeltas, NeedType, NeedsState};
