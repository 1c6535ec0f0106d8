//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run deterministically.

use std::time::Duration;

use glam::Vec2;

use super::rect::hitboxes_overlap;
use super::spawn::{SpawnContext, maybe_spawn};
use super::state::{GameEvent, GamePhase, GameState, ObstacleKind, PlayerState};

/// Ticks of lead the autopilot gives a ground obstacle before jumping
const AUTOPILOT_JUMP_LEAD_TICKS: f32 = 5.0;
/// Ticks of lead before ducking under a low flyer
const AUTOPILOT_DUCK_LEAD_TICKS: f32 = 3.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (one-shot)
    pub jump: bool,
    /// Duck is held
    pub duck: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Returns the final score on the tick the run ends. Outside `Playing`
/// this is a no-op.
pub fn tick(state: &mut GameState, input: &TickInput, dt: Duration) -> Option<u64> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };
    apply_input(state, &input);

    state.time_ticks += 1;
    let speed = state.speed.speed();

    // 1. Player arc
    state.player.step();

    // 2. Scroll obstacles and drop the ones that left the screen
    for obstacle in &mut state.obstacles {
        obstacle.rect.translate(Vec2::new(-speed, 0.0));
    }
    state.obstacles.retain(|o| !o.is_off_screen());

    // 3. Spawner and aerial unlock run on their own cadence
    if state.aerial_unlock.advance(dt) && !state.aerial_enabled {
        state.aerial_enabled = true;
        log::debug!("Aerial obstacles unlocked at tick {}", state.time_ticks);
        state.emit(GameEvent::AerialUnlocked);
    }
    for _ in 0..state.spawn_timer.advance(dt) {
        try_spawn(state);
    }

    // 4. Ground strip
    state.ground.advance(speed);

    // Difficulty ramp (new speed applies from the next tick)
    if state.speed.advance(dt) {
        let speed = state.speed.speed();
        if state.speed.is_capped() {
            log::debug!("Speed reached its cap of {:.3}", speed);
        } else {
            log::debug!("Speed increased to {:.3}", speed);
        }
        state.emit(GameEvent::SpeedIncreased { speed });
    }

    // 5. Survived another tick
    state.score += 1;

    // 6. Collision ends the run
    if let Some(cause) = first_collision(state) {
        state.phase = GamePhase::GameOver;
        state.final_cause = Some(cause);
        let final_score = state.score;
        log::info!("Game over: hit {:?} obstacle, final score {}", cause, final_score);
        state.emit(GameEvent::GameOver { final_score, cause });
        return Some(final_score);
    }

    None
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if !input.duck {
        state.player.release_duck();
    }
    if input.jump && state.player.try_jump() {
        state.emit(GameEvent::Jumped);
    }
    if input.duck {
        state.player.try_duck();
    }
}

fn try_spawn(state: &mut GameState) {
    let ctx = SpawnContext {
        tuning: &state.tuning,
        aerial_enabled: state.aerial_enabled,
    };
    if let Some(obstacle) = maybe_spawn(&state.obstacles, &ctx, &mut state.rng) {
        log::debug!(
            "Spawned {:?} obstacle at x={:.1} y={:.1}",
            obstacle.kind,
            obstacle.rect.x(),
            obstacle.rect.y()
        );
        let event = GameEvent::ObstacleSpawned {
            kind: obstacle.kind,
            x: obstacle.rect.x(),
        };
        state.insert_obstacle(obstacle);
        state.emit(event);
    }
}

/// Kind of the first obstacle whose hitbox overlaps the player's
pub fn first_collision(state: &GameState) -> Option<ObstacleKind> {
    let tuning = &state.tuning;
    state
        .obstacles
        .iter()
        .find(|o| {
            hitboxes_overlap(
                &state.player.rect,
                tuning.player_inset,
                &o.rect,
                o.kind.inset(tuning),
            )
        })
        .map(|o| o.kind)
}

/// Demo-mode AI: jump ground obstacles, duck flyers that would hit a
/// standing player, ignore the rest
pub fn autopilot_input(state: &GameState) -> TickInput {
    let tuning = &state.tuning;
    let speed = state.speed.speed();
    let standing = state.player.standing_rect().inset(tuning.player_inset);
    let mut input = TickInput::default();

    // Nearest obstacle not yet fully behind the player
    let threat = state
        .obstacles
        .iter()
        .map(|o| (o.kind, o.hitbox(tuning)))
        .find(|(_, hitbox)| hitbox.right() > standing.x());

    if let Some((kind, hitbox)) = threat {
        let distance = hitbox.x() - standing.right();
        match kind {
            ObstacleKind::Ground => {
                input.jump = distance <= speed * AUTOPILOT_JUMP_LEAD_TICKS;
            }
            ObstacleKind::Aerial => {
                let hits_standing =
                    hitbox.y() < standing.bottom() && standing.y() < hitbox.bottom();
                input.duck = hits_standing
                    && distance <= speed * AUTOPILOT_DUCK_LEAD_TICKS
                    && state.player.state != PlayerState::Jumping;
            }
        }
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::Obstacle;
    use crate::tuning::Tuning;

    const DT: Duration = Duration::from_millis(20);

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.reset();
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_tick_is_noop_outside_playing() {
        let mut state = GameState::new(1, Tuning::default());
        assert_eq!(tick(&mut state, &TickInput::default(), DT), None);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);

        state.phase = GamePhase::GameOver;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_score_counts_ticks() {
        let mut state = playing_state(5);
        for expected in 1..=100 {
            assert_eq!(tick(&mut state, &TickInput::default(), DT), None);
            assert_eq!(state.score, expected);
        }
    }

    #[test]
    fn test_obstacles_scroll_by_speed() {
        let mut state = playing_state(5);
        let tuning = state.tuning.clone();
        state.insert_obstacle(Obstacle::new(ObstacleKind::Ground, 700.0, 200.0, &tuning));

        for _ in 0..60 {
            let speed = state.speed.speed();
            let before = state.obstacles[0].rect.x();
            tick(&mut state, &TickInput::default(), DT);
            let after = state.obstacles[0].rect.x();
            assert!((before - after - speed).abs() < 1e-4);
        }
    }

    #[test]
    fn test_obstacle_removed_past_left_edge() {
        let mut state = playing_state(5);
        let tuning = state.tuning.clone();
        state.insert_obstacle(Obstacle::new(ObstacleKind::Ground, 0.0, 200.0, &tuning));

        // 8 ticks at speed 5 -> x = -40, still on the boundary
        for _ in 0..8 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].rect.x(), -40.0);

        // Ninth tick -> x = -45 < -40, removed
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_collision_ends_run_once() {
        let mut state = playing_state(5);
        let tuning = state.tuning.clone();
        state.insert_obstacle(Obstacle::new(ObstacleKind::Ground, 60.0, 200.0, &tuning));

        let result = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(result, Some(1));
        assert_eq!(state.phase, GamePhase::GameOver);

        // No late mutation after game over
        let obstacles_before = state.obstacles.clone();
        assert_eq!(tick(&mut state, &TickInput::default(), DT), None);
        assert_eq!(state.score, 1);
        assert_eq!(state.obstacles, obstacles_before);

        let game_overs: Vec<GameEvent> = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(
            game_overs,
            vec![GameEvent::GameOver {
                final_score: 1,
                cause: ObstacleKind::Ground,
            }]
        );
        assert_eq!(state.final_cause, Some(ObstacleKind::Ground));
    }

    #[test]
    fn test_flyer_collision_reports_aerial_cause() {
        let mut state = playing_state(5);
        state.obstacles.push(Obstacle {
            rect: Rect::new(45.0, 175.0, 50.0, 50.0),
            kind: ObstacleKind::Aerial,
        });
        assert_eq!(tick(&mut state, &TickInput::default(), DT), Some(1));
        assert_eq!(state.final_cause, Some(ObstacleKind::Aerial));
    }

    #[test]
    fn test_jump_clears_ground_obstacle_height() {
        let mut state = playing_state(5);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, DT);
        assert_eq!(state.player.state, PlayerState::Jumping);
        for _ in 0..23 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.player.state, PlayerState::Grounded);
        assert_eq!(state.player.rect.y(), 200.0);
    }

    #[test]
    fn test_duck_avoids_low_flyer() {
        let mut state = playing_state(5);
        // Low lane flyer sitting right on the player
        state.obstacles.push(Obstacle {
            rect: Rect::new(45.0, 175.0, 50.0, 50.0),
            kind: ObstacleKind::Aerial,
        });
        let duck = TickInput {
            duck: true,
            ..Default::default()
        };
        // Ducking: flyer hitbox bottom 215 stays above crouched hitbox top 225
        assert_eq!(tick(&mut state, &duck, DT), None);
        assert_eq!(state.player.state, PlayerState::Ducking);

        // Standing back up runs into it
        state.obstacles[0].rect = Rect::new(45.0, 175.0, 50.0, 50.0);
        assert!(tick(&mut state, &TickInput::default(), DT).is_some());
    }

    #[test]
    fn test_aerial_unlock_after_delay() {
        let mut state = playing_state(5);
        // 2000ms = 100 ticks
        for _ in 0..99 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.aerial_enabled);
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.aerial_enabled);
        let unlocks = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::AerialUnlocked))
            .count();
        assert_eq!(unlocks, 1);
    }

    #[test]
    fn test_speed_ramps_after_one_second() {
        let mut state = playing_state(5);
        for _ in 0..49 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.speed.speed(), 5.0);
        tick(&mut state, &TickInput::default(), DT);
        assert!((state.speed.speed() - 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_spawner_runs_on_cadence() {
        let mut state = playing_state(5);
        // First attempt at 400ms = tick 20
        for _ in 0..19 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.obstacles.is_empty());
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.obstacles[0].rect.x() >= 800.0);
    }

    #[test]
    fn test_autopilot_jumps_and_ducks() {
        let mut state = playing_state(5);
        let tuning = state.tuning.clone();

        state.obstacles = vec![Obstacle::new(ObstacleKind::Ground, 100.0, 200.0, &tuning)];
        assert!(autopilot_input(&state).jump);

        state.obstacles = vec![Obstacle::new(ObstacleKind::Ground, 400.0, 200.0, &tuning)];
        assert!(!autopilot_input(&state).jump);

        state.obstacles = vec![Obstacle::new(ObstacleKind::Aerial, 90.0, 175.0, &tuning)];
        let input = autopilot_input(&state);
        assert!(input.duck && !input.jump);

        // High lane passes over a standing player
        state.obstacles = vec![Obstacle::new(ObstacleKind::Aerial, 90.0, 120.0, &tuning)];
        let input = autopilot_input(&state);
        assert!(!input.duck && !input.jump);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing_state(99999);
        let mut state2 = playing_state(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        for _ in 0..600 {
            tick(&mut state1, &input, DT);
            tick(&mut state2, &input, DT);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.obstacles, state2.obstacles);
        assert_eq!(state1.player, state2.player);
    }
}
