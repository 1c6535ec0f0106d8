//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles sorted left to right)
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod ground;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use difficulty::SpeedRamp;
pub use ground::GroundScroll;
pub use rect::{Rect, hitboxes_overlap, intersects};
pub use spawn::{SpawnContext, gap_seeking_x, maybe_spawn, right_edge_clear};
pub use state::{
    GameEvent, GamePhase, GameState, MAX_PENDING_EVENTS, Obstacle, ObstacleKind, Player,
    PlayerSprite, PlayerState,
};
pub use tick::{TickInput, autopilot_input, first_collision, tick};
pub use timer::{Delay, IntervalTimer};
