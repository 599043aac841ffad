//! Garden clicker mini-game

pub mod placement;
pub mod session;
pub mod stats;

pub use placement::SpawnArea;
pub use session::{compute_reward, GameResult, MiniGameSession, SessionState, Target};
pub use stats::GameStats;
