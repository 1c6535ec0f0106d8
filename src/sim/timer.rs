//! Scheduled triggers driven by the tick clock
//!
//! Wall-clock cadences (spawn attempts, speed ramp, aerial unlock) are plain
//! accumulators advanced inside `tick`. They only move while the session is
//! playing, so nothing can fire into a finished run.

use std::time::Duration;

/// Repeating trigger that fires once per elapsed `period`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Duration,
    elapsed: Duration,
}

impl IntervalTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `dt`, returning how many periods completed
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// One-shot trigger; fires exactly once after `delay`, then stays spent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delay {
    delay: Duration,
    remaining: Option<Duration>,
}

impl Delay {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            remaining: Some(delay),
        }
    }

    /// Advance by `dt`; returns true on the tick the delay expires
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(left) if left <= dt => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - dt);
                false
            }
            None => false,
        }
    }

    /// Re-arm with the original delay
    pub fn reset(&mut self) {
        self.remaining = Some(self.delay);
    }
}
