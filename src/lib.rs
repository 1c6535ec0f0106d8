//! Dino Runner - A side-scrolling reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, spawning, collisions, phases)
//! - `session`: Host-facing wrapper (phase transitions, queued input, snapshots)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Local leaderboard
//!
//! Rendering, windowing and asset loading live in the host; the core only
//! produces rectangles and enums.

pub mod error;
pub mod highscores;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{StorageError, TuningError};
pub use highscores::HighScores;
pub use session::{FrameAccumulator, GameSession, Snapshot};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: Duration = Duration::from_millis(20);
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Default RNG seed for the demo driver
    pub const DEFAULT_SEED: u64 = 0x5EED_D1A0;
}
