//! Difficulty ramp: one shared scroll speed that grows on a wall-clock cadence

use std::time::Duration;

use super::timer::IntervalTimer;
use crate::tuning::Tuning;

/// Scroll speed with exponential growth every interval
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRamp {
    base: f32,
    current: f32,
    factor: f32,
    cap: Option<f32>,
    timer: IntervalTimer,
}

impl SpeedRamp {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            base: tuning.base_speed,
            current: tuning.base_speed,
            factor: tuning.speed_increase_factor,
            cap: tuning.max_speed(),
            timer: IntervalTimer::new(tuning.speed_increase_interval()),
        }
    }

    /// Current speed (pixels per tick)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.current
    }

    pub fn is_capped(&self) -> bool {
        self.cap.is_some_and(|cap| self.current >= cap)
    }

    /// Advance wall-clock time; returns true if the speed changed
    pub fn advance(&mut self, dt: Duration) -> bool {
        let before = self.current;
        for _ in 0..self.timer.advance(dt) {
            let next = self.current * (1.0 + self.factor);
            self.current = match self.cap {
                Some(cap) => next.min(cap),
                None => next,
            };
        }
        self.current != before
    }

    /// Back to base speed with a fresh interval
    pub fn reset(&mut self) {
        self.current = self.base;
        self.timer.reset();
    }
}
