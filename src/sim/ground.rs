//! Looping ground strip (cosmetic only)

use serde::{Deserialize, Serialize};

/// Offset of two tiled ground copies placed at `offset` and `offset + width`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundScroll {
    offset: f32,
    width: f32,
}

impl GroundScroll {
    pub fn new(width: f32) -> Self {
        Self { offset: 0.0, width }
    }

    /// Scroll left by `speed`, wrapping so the offset stays in `(-width, 0]`
    pub fn advance(&mut self, speed: f32) {
        self.offset -= speed;
        if self.offset <= -self.width {
            self.offset = -((-self.offset) % self.width);
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// X positions of the two tiles
    pub fn tiles(&self) -> [f32; 2] {
        [self.offset, self.offset + self.width]
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wraps_at_screen_width() {
        let mut ground = GroundScroll::new(800.0);
        for _ in 0..159 {
            ground.advance(5.0);
        }
        assert_eq!(ground.offset(), -795.0);
        ground.advance(5.0);
        assert_eq!(ground.offset(), 0.0);
        assert_eq!(ground.tiles(), [0.0, 800.0]);
    }

    #[test]
    fn test_wrap_keeps_remainder() {
        let mut ground = GroundScroll::new(800.0);
        for _ in 0..107 {
            ground.advance(7.5);
        }
        // 107 * 7.5 = 802.5 -> one wrap, 2.5 past the seam
        assert!((ground.offset() - -2.5).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_offset_stays_in_range(steps in prop::collection::vec(0.0f32..900.0, 1..200)) {
            let mut ground = GroundScroll::new(800.0);
            for speed in steps {
                ground.advance(speed);
                prop_assert!(ground.offset() <= 0.0);
                prop_assert!(ground.offset() > -800.0);
            }
        }
    }
}
