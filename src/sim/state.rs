//! Game state and core simulation types
//!
//! Everything the tick mutates lives in one [`GameState`] value owned by the
//! host; there is no ambient state.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::SpeedRamp;
use super::ground::GroundScroll;
use super::rect::Rect;
use super::timer::{Delay, IntervalTimer};
use crate::tuning::Tuning;

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for start
    MainMenu,
    /// Active gameplay
    Playing,
    /// Run ended, final score on display
    GameOver,
}

/// Player posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Grounded,
    Jumping,
    Ducking,
}

/// Sprite frame the renderer should draw for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSprite {
    Standing,
    RunA,
    RunB,
    Ducking,
}

/// The runner. Horizontal position never changes; the world scrolls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Effective body (swapped for the crouched box while ducking)
    pub rect: Rect,
    /// Upward step applied on the next airborne tick (0 when grounded)
    pub vertical_velocity: f32,
    pub state: PlayerState,
    ground_y: f32,
    standing_size: Vec2,
    duck_height: f32,
    jump_velocity: f32,
    jump_deceleration: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                tuning.player_x,
                tuning.player_ground_y,
                tuning.player_width,
                tuning.player_height,
            ),
            vertical_velocity: 0.0,
            state: PlayerState::Grounded,
            ground_y: tuning.player_ground_y,
            standing_size: Vec2::new(tuning.player_width, tuning.player_height),
            duck_height: tuning.duck_height,
            jump_velocity: tuning.jump_velocity,
            jump_deceleration: tuning.jump_deceleration,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.state == PlayerState::Grounded
    }

    /// Height above the ground line (0 when standing on it)
    pub fn altitude(&self) -> f32 {
        match self.state {
            PlayerState::Ducking => 0.0,
            _ => self.ground_y - self.rect.y(),
        }
    }

    /// Standing body at the current altitude (ignores ducking)
    pub fn standing_rect(&self) -> Rect {
        let y = self.ground_y - self.altitude();
        Rect::new(self.rect.x(), y, self.standing_size.x, self.standing_size.y)
    }

    fn crouched_rect(&self) -> Rect {
        let bottom = self.ground_y + self.standing_size.y;
        Rect::new(self.rect.x(), bottom - self.duck_height, self.standing_size.x, self.duck_height)
    }

    /// Start a jump. Only valid from the ground; otherwise a no-op.
    pub fn try_jump(&mut self) -> bool {
        if self.state != PlayerState::Grounded {
            return false;
        }
        self.state = PlayerState::Jumping;
        self.vertical_velocity = self.jump_velocity;
        true
    }

    /// Crouch. Only valid from the ground; otherwise a no-op.
    pub fn try_duck(&mut self) -> bool {
        if self.state != PlayerState::Grounded {
            return false;
        }
        self.state = PlayerState::Ducking;
        self.rect = self.crouched_rect();
        true
    }

    /// Stand back up from a crouch
    pub fn release_duck(&mut self) -> bool {
        if self.state != PlayerState::Ducking {
            return false;
        }
        self.state = PlayerState::Grounded;
        self.rect = self.standing_rect_on_ground();
        true
    }

    fn standing_rect_on_ground(&self) -> Rect {
        Rect::new(self.rect.x(), self.ground_y, self.standing_size.x, self.standing_size.y)
    }

    /// Advance the jump arc by one tick; returns true on the landing tick.
    ///
    /// Steps run `v, v-d, ..., d` going up and `-d, ..., -v` coming down; the
    /// zero step at the apex is skipped so the arc is symmetric and lasts
    /// exactly `2v/d` ticks. Needs `v` to be a whole multiple of `d`, which
    /// `Tuning::validate` enforces.
    pub fn step(&mut self) -> bool {
        if self.state != PlayerState::Jumping {
            return false;
        }

        self.rect.translate(Vec2::new(0.0, -self.vertical_velocity));
        self.vertical_velocity -= self.jump_deceleration;
        if self.vertical_velocity <= 0.0 && self.vertical_velocity > -self.jump_deceleration {
            self.vertical_velocity = -self.jump_deceleration;
        }

        if self.rect.y() >= self.ground_y {
            self.rect = self.standing_rect_on_ground();
            self.state = PlayerState::Grounded;
            self.vertical_velocity = 0.0;
            return true;
        }
        false
    }

    /// Sprite frame for the given animation tick
    pub fn sprite(&self, phase: GamePhase, anim_ticks: u64, run_frame_ticks: u32) -> PlayerSprite {
        match (phase, self.state) {
            (_, PlayerState::Ducking) => PlayerSprite::Ducking,
            (GamePhase::Playing, PlayerState::Grounded) => {
                let frame = anim_ticks / u64::from(run_frame_ticks.max(1));
                if frame % 2 == 0 {
                    PlayerSprite::RunA
                } else {
                    PlayerSprite::RunB
                }
            }
            _ => PlayerSprite::Standing,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Sits on the ground; jump over it
    Ground,
    /// Flies at a lane height; low lanes must be ducked
    Aerial,
}

impl ObstacleKind {
    /// Forgiving-hitbox inset for this kind
    pub fn inset(self, tuning: &Tuning) -> f32 {
        match self {
            ObstacleKind::Ground => tuning.ground_inset,
            ObstacleKind::Aerial => tuning.aerial_inset,
        }
    }

    pub fn size(self, tuning: &Tuning) -> Vec2 {
        match self {
            ObstacleKind::Ground => {
                Vec2::new(tuning.ground_obstacle_width, tuning.ground_obstacle_height)
            }
            ObstacleKind::Aerial => {
                Vec2::new(tuning.aerial_obstacle_width, tuning.aerial_obstacle_height)
            }
        }
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, y: f32, tuning: &Tuning) -> Self {
        let size = kind.size(tuning);
        Self {
            rect: Rect::new(x, y, size.x, size.y),
            kind,
        }
    }

    /// Collision box after the per-kind inset
    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        self.rect.inset(self.kind.inset(tuning))
    }

    /// Fully scrolled past the left screen edge
    pub fn is_off_screen(&self) -> bool {
        self.rect.x() < -self.rect.width()
    }
}

/// Things the host may want to react to (sounds, HUD, leaderboard)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    Jumped,
    ObstacleSpawned { kind: ObstacleKind, x: f32 },
    SpeedIncreased { speed: f32 },
    AerialUnlocked,
    /// Raised exactly once per session, on the collision tick
    GameOver {
        final_score: u64,
        cause: ObstacleKind,
    },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles, sorted left to right by x
    pub obstacles: Vec<Obstacle>,
    /// Shared scroll speed
    pub speed: SpeedRamp,
    pub ground: GroundScroll,
    /// Ticks survived this session
    pub score: u64,
    /// Ticks since the session started (animation clock)
    pub time_ticks: u64,
    /// Aerial obstacles may spawn (one-way flip per session)
    pub aerial_enabled: bool,
    /// Sessions started since creation
    pub sessions_started: u32,
    /// What ended the last run (cactus or pterodactyl message)
    pub final_cause: Option<ObstacleKind>,
    pub(crate) spawn_timer: IntervalTimer,
    pub(crate) aerial_unlock: Delay,
    pub(crate) rng: Pcg32,
    pub(crate) events: VecDeque<GameEvent>,
}

impl GameState {
    /// Create a new game state in the main menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::MainMenu,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            speed: SpeedRamp::new(&tuning),
            ground: GroundScroll::new(tuning.screen_width),
            score: 0,
            time_ticks: 0,
            aerial_enabled: false,
            sessions_started: 0,
            final_cause: None,
            spawn_timer: IntervalTimer::new(tuning.spawn_interval()),
            aerial_unlock: Delay::new(tuning.aerial_unlock_delay()),
            rng: Pcg32::seed_from_u64(seed),
            events: VecDeque::new(),
            tuning,
        }
    }

    /// Reinitialize the run (player, obstacles, score, speed, triggers).
    /// The RNG stream carries on so the next session plays differently.
    /// Events nobody drained belong to the old run and are discarded.
    pub fn reset(&mut self) {
        self.player = Player::new(&self.tuning);
        self.obstacles.clear();
        self.speed.reset();
        self.ground.reset();
        self.score = 0;
        self.time_ticks = 0;
        self.aerial_enabled = false;
        self.spawn_timer.reset();
        self.aerial_unlock.reset();
        self.final_cause = None;
        self.events.clear();
    }

    /// Insert keeping left-to-right order
    pub fn insert_obstacle(&mut self, obstacle: Obstacle) {
        let idx = self
            .obstacles
            .partition_point(|o| o.rect.x() <= obstacle.rect.x());
        self.obstacles.insert(idx, obstacle);
    }

    /// Queue an event; past `MAX_PENDING_EVENTS` the oldest one is dropped
    pub fn emit(&mut self, event: GameEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn player_sprite(&self) -> PlayerSprite {
        self.player
            .sprite(self.phase, self.time_ticks, self.tuning.run_frame_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_in_menu() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::MainMenu);
        assert_eq!(state.player.rect, Rect::new(50.0, 200.0, 40.0, 40.0));
        assert!(state.player.is_grounded());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.speed.speed(), 5.0);
    }

    #[test]
    fn test_jump_round_trip_takes_two_initial_steps() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        assert!(player.try_jump());

        let mut peak = 0.0f32;
        for i in 0..24 {
            let landed = player.step();
            peak = peak.max(player.altitude());
            assert_eq!(landed, i == 23, "landed early/late at tick {i}");
        }
        assert_eq!(player.state, PlayerState::Grounded);
        assert_eq!(player.rect.y(), 200.0);
        assert_eq!(player.vertical_velocity, 0.0);
        assert_eq!(peak, 78.0);
    }

    #[test]
    fn test_jump_arc_is_symmetric() {
        let mut player = Player::new(&Tuning::default());
        player.try_jump();
        let altitudes: Vec<f32> = (0..24)
            .map(|_| {
                player.step();
                player.altitude()
            })
            .collect();
        // Altitude after tick k equals altitude after tick 22-k
        for k in 0..11 {
            assert_eq!(altitudes[k], altitudes[22 - k]);
        }
        assert_eq!(altitudes[11], 78.0);
    }

    #[test]
    fn test_jump_and_duck_are_exclusive() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);

        assert!(player.try_duck());
        assert_eq!(player.rect, Rect::new(50.0, 220.0, 40.0, 20.0));
        assert!(!player.try_jump());
        assert_eq!(player.state, PlayerState::Ducking);

        assert!(player.release_duck());
        assert_eq!(player.rect, Rect::new(50.0, 200.0, 40.0, 40.0));

        assert!(player.try_jump());
        player.step();
        assert!(!player.try_duck());
        assert!(!player.release_duck());
        assert_eq!(player.state, PlayerState::Jumping);
    }

    #[test]
    fn test_sprite_selection() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        assert_eq!(player.sprite(GamePhase::MainMenu, 0, 5), PlayerSprite::Standing);
        assert_eq!(player.sprite(GamePhase::Playing, 0, 5), PlayerSprite::RunA);
        assert_eq!(player.sprite(GamePhase::Playing, 4, 5), PlayerSprite::RunA);
        assert_eq!(player.sprite(GamePhase::Playing, 5, 5), PlayerSprite::RunB);
        assert_eq!(player.sprite(GamePhase::Playing, 10, 5), PlayerSprite::RunA);

        player.try_duck();
        assert_eq!(player.sprite(GamePhase::Playing, 5, 5), PlayerSprite::Ducking);
        player.release_duck();
        player.try_jump();
        assert_eq!(player.sprite(GamePhase::Playing, 5, 5), PlayerSprite::Standing);
    }

    #[test]
    fn test_obstacle_off_screen_threshold() {
        let tuning = Tuning::default();
        let mut obstacle = Obstacle::new(ObstacleKind::Ground, -40.0, 200.0, &tuning);
        assert!(!obstacle.is_off_screen());
        obstacle.rect.translate(Vec2::new(-0.5, 0.0));
        assert!(obstacle.is_off_screen());
    }

    #[test]
    fn test_obstacle_hitbox_uses_kind_inset() {
        let tuning = Tuning::default();
        let ground = Obstacle::new(ObstacleKind::Ground, 100.0, 200.0, &tuning);
        assert_eq!(ground.hitbox(&tuning), Rect::new(105.0, 205.0, 30.0, 30.0));
        let aerial = Obstacle::new(ObstacleKind::Aerial, 100.0, 175.0, &tuning);
        assert_eq!(aerial.hitbox(&tuning), Rect::new(110.0, 185.0, 30.0, 30.0));
    }

    #[test]
    fn test_event_queue_is_bounded() {
        let mut state = GameState::new(1, Tuning::default());
        for _ in 0..MAX_PENDING_EVENTS + 10 {
            state.emit(GameEvent::Jumped);
        }
        state.emit(GameEvent::AerialUnlocked);
        assert_eq!(state.pending_events(), MAX_PENDING_EVENTS);

        // Newest survives, oldest went
        let events = state.take_events();
        assert_eq!(events.last(), Some(&GameEvent::AerialUnlocked));
        assert_eq!(state.pending_events(), 0);
    }

    #[test]
    fn test_reset_discards_stale_events() {
        let mut state = GameState::new(1, Tuning::default());
        state.emit(GameEvent::Jumped);
        state.final_cause = Some(ObstacleKind::Aerial);
        state.reset();
        assert_eq!(state.pending_events(), 0);
        assert_eq!(state.final_cause, None);
    }

    #[test]
    fn test_steeper_deceleration_stays_symmetric() {
        let tuning = Tuning {
            jump_velocity: 12.0,
            jump_deceleration: 3.0,
            ..Tuning::default()
        };
        tuning.validate().expect("12 is a multiple of 3");
        let mut player = Player::new(&tuning);
        player.try_jump();
        // Up 12, 9, 6, 3 then down 3, 6, 9, 12
        let mut altitudes = Vec::new();
        loop {
            let landed = player.step();
            altitudes.push(player.altitude());
            if landed {
                break;
            }
        }
        assert_eq!(altitudes, vec![12.0, 21.0, 27.0, 30.0, 27.0, 21.0, 12.0, 0.0]);
    }

    #[test]
    fn test_insert_keeps_order() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, tuning.clone());
        for x in [500.0, 100.0, 300.0] {
            state.insert_obstacle(Obstacle::new(ObstacleKind::Ground, x, 200.0, &tuning));
        }
        let xs: Vec<f32> = state.obstacles.iter().map(|o| o.rect.x()).collect();
        assert_eq!(xs, vec![100.0, 300.0, 500.0]);
    }
}
