//! Host-facing game session
//!
//! Wraps [`GameState`] with the phase transitions, queued input and read-only
//! views a rendering adapter needs. Input is buffered here and applied at the
//! start of the next tick; one-shot inputs are cleared after each tick.

use std::time::Duration;

use serde::Serialize;

use crate::consts::MAX_SUBSTEPS;
use crate::error::TuningError;
use crate::sim::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, PlayerSprite, PlayerState, Rect,
    TickInput, tick,
};
use crate::tuning::Tuning;

/// Render-ready view of the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub state: PlayerState,
    pub sprite: PlayerSprite,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub speed: f32,
    pub player: PlayerView,
    pub obstacles: Vec<Obstacle>,
    /// X positions of the two ground tiles
    pub ground_tiles: [f32; 2],
    pub ground_y: f32,
    /// Set on the game over screen
    pub final_cause: Option<ObstacleKind>,
}

/// One play-through manager: menu, run, game over, repeat
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    input: TickInput,
}

impl GameSession {
    /// New session with default tuning, sitting in the main menu
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(seed, Tuning::default()),
            input: TickInput::default(),
        }
    }

    /// New session with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(seed, tuning),
            input: TickInput::default(),
        })
    }

    /// Main menu -> Playing
    pub fn start(&mut self) -> bool {
        if self.state.phase != GamePhase::MainMenu {
            return false;
        }
        self.begin_run();
        true
    }

    /// Game over -> Playing, via the same reset path as `start`
    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            return false;
        }
        self.begin_run();
        true
    }

    /// Game over (or an abandoned run) -> Main menu
    pub fn return_to_menu(&mut self) -> bool {
        if self.state.phase == GamePhase::MainMenu {
            return false;
        }
        if self.state.phase == GamePhase::Playing {
            log::info!("Run abandoned at score {}", self.state.score);
        }
        self.state.phase = GamePhase::MainMenu;
        self.clear_input();
        true
    }

    fn begin_run(&mut self) {
        self.state.reset();
        self.clear_input();
        self.state.phase = GamePhase::Playing;
        self.state.sessions_started += 1;
        self.state.emit(GameEvent::SessionStarted);
        log::info!(
            "Session {} started (seed {})",
            self.state.sessions_started,
            self.state.seed
        );
    }

    fn clear_input(&mut self) {
        let autopilot = self.input.autopilot;
        self.input = TickInput {
            autopilot,
            ..Default::default()
        };
    }

    /// Advance exactly one step. Returns the final score on the tick the run ends.
    pub fn tick(&mut self, dt: Duration) -> Option<u64> {
        let result = tick(&mut self.state, &self.input, dt);
        // Clear one-shot inputs after processing
        self.input.jump = false;
        result
    }

    /// One step of the tuned tick length
    pub fn tick_fixed(&mut self) -> Option<u64> {
        let dt = self.state.tuning.tick_duration();
        self.tick(dt)
    }

    pub fn on_jump_pressed(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.input.jump = true;
        }
    }

    pub fn on_duck_pressed(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.input.duck = true;
        }
    }

    pub fn on_duck_released(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.input.duck = false;
        }
    }

    /// Let the built-in AI drive (demo mode)
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    /// Final score while on the game over screen
    pub fn final_score(&self) -> Option<u64> {
        (self.state.phase == GamePhase::GameOver).then_some(self.state.score)
    }

    /// Obstacle kind that ended the run, while on the game over screen
    pub fn final_cause(&self) -> Option<ObstacleKind> {
        if self.state.phase == GamePhase::GameOver {
            self.state.final_cause
        } else {
            None
        }
    }

    pub fn speed(&self) -> f32 {
        self.state.speed.speed()
    }

    pub fn player_rect(&self) -> Rect {
        self.state.player.rect
    }

    pub fn player_state(&self) -> PlayerState {
        self.state.player.state
    }

    pub fn player_sprite(&self) -> PlayerSprite {
        self.state.player_sprite()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.state.obstacles
    }

    pub fn ground_offset(&self) -> f32 {
        self.state.ground.offset()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.state.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Drain events raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            score: self.state.score,
            speed: self.state.speed.speed(),
            player: PlayerView {
                rect: self.state.player.rect,
                state: self.state.player.state,
                sprite: self.state.player_sprite(),
            },
            obstacles: self.state.obstacles.clone(),
            ground_tiles: self.state.ground.tiles(),
            ground_y: self.state.tuning.ground_strip_y,
            final_cause: self.final_cause(),
        }
    }
}

/// Fixed-step accumulator for real-time hosts
///
/// Converts variable frame times into a whole number of simulation steps,
/// capped per frame to prevent a spiral of death.
#[derive(Debug, Clone)]
pub struct FrameAccumulator {
    step: Duration,
    accumulator: Duration,
    max_substeps: u32,
}

impl FrameAccumulator {
    /// Longest frame time honoured; longer hitches are dropped
    const MAX_FRAME: Duration = Duration::from_millis(100);

    pub fn new(step: Duration) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    /// Add one frame's elapsed time; returns how many steps to run now
    pub fn advance(&mut self, frame_dt: Duration) -> u32 {
        if self.step.is_zero() {
            return 0;
        }
        self.accumulator += frame_dt.min(Self::MAX_FRAME);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    pub fn step(&self) -> Duration {
        self.step
    }
}
