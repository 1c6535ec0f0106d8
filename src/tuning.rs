//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be retuned from a JSON
//! file without touching the simulation. Defaults reproduce the classic
//! 800x300 desktop layout.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Gameplay tuning (all distances in pixels, speeds in pixels per tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Y of the ground strip (top of the scrolling ground tiles)
    pub ground_strip_y: f32,

    // === Player ===
    pub player_x: f32,
    /// Top edge of the standing player when grounded
    pub player_ground_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Height of the crouched hitbox (bottom-aligned with the standing one)
    pub duck_height: f32,
    /// Forgiving-hitbox inset applied to each side of the player
    pub player_inset: f32,

    // === Jump ===
    /// Upward step on the first airborne tick
    pub jump_velocity: f32,
    /// Step reduction per tick
    pub jump_deceleration: f32,

    // === Obstacles ===
    pub ground_obstacle_width: f32,
    pub ground_obstacle_height: f32,
    pub ground_obstacle_y: f32,
    pub ground_inset: f32,
    pub aerial_obstacle_width: f32,
    pub aerial_obstacle_height: f32,
    /// Discrete top-edge heights for aerial obstacles
    pub aerial_lanes: Vec<f32>,
    pub aerial_inset: f32,

    // === Spawning ===
    pub spawn_interval_ms: u64,
    pub min_gap: f32,
    /// Upper bound of the random extra distance past the right edge
    pub spawn_jitter: f32,
    /// Shift applied to the midpoint of the largest gap
    pub gap_seek_offset: f32,
    /// Gap-seeking placements left of this x are rejected (no pop-in near the player)
    pub gap_seek_min_x: f32,
    /// Delay before aerial obstacles may appear (`0` = from the start)
    pub aerial_unlock_ms: u64,

    // === Difficulty ===
    pub base_speed: f32,
    pub speed_increase_interval_ms: u64,
    pub speed_increase_factor: f32,
    /// Cap as a multiple of `base_speed`; `None` lets speed grow without bound
    pub max_speed_multiplier: Option<f32>,

    // === Animation ===
    pub run_frame_ticks: u32,

    /// Fixed tick length the host is expected to drive
    pub tick_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 300.0,
            ground_strip_y: 240.0,

            player_x: 50.0,
            player_ground_y: 200.0,
            player_width: 40.0,
            player_height: 40.0,
            duck_height: 20.0,
            player_inset: 5.0,

            jump_velocity: 12.0,
            jump_deceleration: 1.0,

            ground_obstacle_width: 40.0,
            ground_obstacle_height: 40.0,
            ground_obstacle_y: 200.0,
            ground_inset: 5.0,
            aerial_obstacle_width: 50.0,
            aerial_obstacle_height: 50.0,
            aerial_lanes: vec![120.0, 145.0, 175.0],
            aerial_inset: 10.0,

            spawn_interval_ms: 400,
            min_gap: 300.0,
            spawn_jitter: 300.0,
            gap_seek_offset: 20.0,
            gap_seek_min_x: 400.0,
            aerial_unlock_ms: 2000,

            base_speed: 5.0,
            speed_increase_interval_ms: 1000,
            speed_increase_factor: 0.1,
            max_speed_multiplier: Some(1.5),

            run_frame_ticks: 5,

            tick_ms: 20,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("duck_height", self.duck_height),
            ("jump_velocity", self.jump_velocity),
            ("jump_deceleration", self.jump_deceleration),
            ("ground_obstacle_width", self.ground_obstacle_width),
            ("ground_obstacle_height", self.ground_obstacle_height),
            ("aerial_obstacle_width", self.aerial_obstacle_width),
            ("aerial_obstacle_height", self.aerial_obstacle_height),
            ("base_speed", self.base_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("player_inset", self.player_inset),
            ("ground_inset", self.ground_inset),
            ("aerial_inset", self.aerial_inset),
            ("min_gap", self.min_gap),
            ("spawn_jitter", self.spawn_jitter),
            ("speed_increase_factor", self.speed_increase_factor),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::invalid(field, format!("must be >= 0, got {value}")));
            }
        }

        let intervals = [
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("speed_increase_interval_ms", self.speed_increase_interval_ms),
            ("tick_ms", self.tick_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(TuningError::invalid(field, "must be at least 1 ms"));
            }
        }

        if self.duck_height > self.player_height {
            return Err(TuningError::invalid(
                "duck_height",
                "cannot exceed player_height",
            ));
        }
        let jump_steps = self.jump_velocity / self.jump_deceleration;
        if (jump_steps - jump_steps.round()).abs() > 1e-4 {
            return Err(TuningError::invalid(
                "jump_deceleration",
                format!(
                    "jump_velocity {} is not a whole multiple of {}",
                    self.jump_velocity, self.jump_deceleration
                ),
            ));
        }
        if self.aerial_lanes.is_empty() {
            return Err(TuningError::invalid("aerial_lanes", "needs at least one lane"));
        }
        if self.run_frame_ticks == 0 {
            return Err(TuningError::invalid("run_frame_ticks", "must be at least 1"));
        }
        if let Some(mult) = self.max_speed_multiplier {
            if !(mult.is_finite() && mult >= 1.0) {
                return Err(TuningError::invalid(
                    "max_speed_multiplier",
                    format!("must be >= 1.0, got {mult}"),
                ));
            }
        }

        Ok(())
    }

    /// Speed cap in pixels per tick (if capped)
    pub fn max_speed(&self) -> Option<f32> {
        self.max_speed_multiplier.map(|m| self.base_speed * m)
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn speed_increase_interval(&self) -> Duration {
        Duration::from_millis(self.speed_increase_interval_ms)
    }

    pub fn aerial_unlock_delay(&self) -> Duration {
        Duration::from_millis(self.aerial_unlock_ms)
    }
}
