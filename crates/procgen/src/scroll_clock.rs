//! Tick counter that paces height-field shifts.
//!
//! The clock advances once per game-loop iteration, not per unit of wall
//! time, so the visual scroll speed follows the frame rate.

/// Counts ticks in `[0, period)` and reports when a full period has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollClock {
    counter: u32,
    period: u32,
}

impl ScrollClock {
    /// Ticks per shift used by the background.
    pub const DEFAULT_PERIOD: u32 = 50;

    /// # Panics
    /// If `period` is zero.
    pub fn new(period: u32) -> Self {
        assert!(period > 0, "scroll clock period must be positive");
        Self { counter: 0, period }
    }

    /// Advance one tick. Returns `true` when the counter wraps, which is the
    /// caller's cue to shift the height field.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter == self.period {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Progress towards the next shift, in `[0, 1)`.
    pub fn fractional_offset(&self) -> f32 {
        self.counter as f32 / self.period as f32
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn period(&self) -> u32 {
        self.period
    }
}

impl Default for ScrollClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}
