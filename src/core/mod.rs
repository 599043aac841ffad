pub mod clock;
pub mod config;
pub mod error;
pub mod timer;
pub mod types;

pub use clock::{Clock, ManualTimeSource, SystemTimeSource, TimeSource};
pub use config::GameConfig;
pub use error::{PetError, Result};
