//! Obstacle spawning
//!
//! Spacing is enforced at attempt time: an attempt either places an obstacle
//! at least `min_gap` from every existing one or places nothing. Aerial
//! obstacles first try the largest gap between existing obstacles so a
//! flyer never lands right on top of a cactus.

use rand::Rng;

use super::state::{Obstacle, ObstacleKind};
use crate::tuning::Tuning;

/// Inputs the spawner needs beyond the obstacle list
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub tuning: &'a Tuning,
    pub aerial_enabled: bool,
}

/// Try to create one obstacle.
///
/// `obstacles` must be sorted left to right by x.
pub fn maybe_spawn<R: Rng + ?Sized>(
    obstacles: &[Obstacle],
    ctx: &SpawnContext<'_>,
    rng: &mut R,
) -> Option<Obstacle> {
    let tuning = ctx.tuning;
    let kind = if ctx.aerial_enabled && rng.random_bool(0.5) {
        ObstacleKind::Aerial
    } else {
        ObstacleKind::Ground
    };

    let y = match kind {
        ObstacleKind::Ground => tuning.ground_obstacle_y,
        ObstacleKind::Aerial => pick_lane(tuning, rng),
    };

    if kind == ObstacleKind::Aerial {
        if let Some(x) = gap_seeking_x(obstacles, tuning) {
            return Some(Obstacle::new(kind, x, y, tuning));
        }
    }

    // Fallback for both kinds: the right edge, past the last obstacle
    if !right_edge_clear(obstacles, tuning.screen_width, tuning.min_gap) {
        return None;
    }
    let jitter = if tuning.spawn_jitter > 0.0 {
        rng.random_range(0.0..=tuning.spawn_jitter)
    } else {
        0.0
    };
    Some(Obstacle::new(kind, tuning.screen_width + jitter, y, tuning))
}

/// True when nothing is within `min_gap` of the right screen edge
pub fn right_edge_clear(obstacles: &[Obstacle], screen_width: f32, min_gap: f32) -> bool {
    rightmost_x(obstacles).is_none_or(|x| screen_width - x >= min_gap)
}

fn rightmost_x(obstacles: &[Obstacle]) -> Option<f32> {
    obstacles
        .iter()
        .map(|o| o.rect.x())
        .fold(None, |acc: Option<f32>, x| Some(acc.map_or(x, |m| m.max(x))))
}

/// Midpoint (plus offset) of the largest gap between consecutive obstacles,
/// if that spot keeps `min_gap` to both neighbours and sits far enough right.
///
/// Fewer than two obstacles means no gap is eligible.
pub fn gap_seeking_x(obstacles: &[Obstacle], tuning: &Tuning) -> Option<f32> {
    let (left, right) = obstacles
        .windows(2)
        .map(|pair| (pair[0].rect.x(), pair[1].rect.x()))
        .max_by(|a, b| {
            (a.1 - a.0)
                .partial_cmp(&(b.1 - b.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let x = left + (right - left) / 2.0 + tuning.gap_seek_offset;
    let spaced = x - left >= tuning.min_gap && right - x >= tuning.min_gap;
    (spaced && x >= tuning.gap_seek_min_x).then_some(x)
}

fn pick_lane<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    match tuning.aerial_lanes.len() {
        0 => tuning.ground_obstacle_y,
        n => tuning.aerial_lanes[rng.random_range(0..n)],
    }
}
