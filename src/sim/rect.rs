//! Axis-aligned rectangles and overlap tests
//!
//! Screen space: x grows right, y grows down, `pos` is the top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height (never negative)
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height).max(Vec2::ZERO),
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Zero-area rectangles never collide
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Shrink by `amount` on every side. Over-shrinking collapses to an
    /// empty rect at the center rather than going negative.
    pub fn inset(&self, amount: f32) -> Self {
        let size = (self.size - Vec2::splat(2.0 * amount)).max(Vec2::ZERO);
        Self {
            pos: self.center() - size * 0.5,
            size,
        }
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

/// Standard AABB overlap test (touching edges do not count)
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.x() < b.right() && b.x() < a.right() && a.y() < b.bottom() && b.y() < a.bottom()
}

/// Overlap test on forgiving hitboxes: each rect is inset by its own amount first
pub fn hitboxes_overlap(a: &Rect, a_inset: f32, b: &Rect, b_inset: f32) -> bool {
    intersects(&a.inset(a_inset), &b.inset(b_inset))
}
