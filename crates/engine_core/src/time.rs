//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time when the engine started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a time manager whose clock starts at `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Update timing as if the frame started at `now`. A `now` earlier than the
    /// previous frame yields a zero delta.
    pub fn update_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.elapsed = now.saturating_duration_since(self.start_time);
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time in whole milliseconds.
    pub fn delta_millis(&self) -> u64 {
        self.delta.as_millis() as u64
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in whole milliseconds.
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Get total elapsed time as Duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_millis_tracks_frame_gap() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        time.update_at(start + Duration::from_millis(16));
        time.update_at(start + Duration::from_millis(50));
        assert_eq!(time.delta_millis(), 34);
        assert_eq!(time.elapsed_millis(), 50);
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn backwards_clock_gives_zero_delta() {
        let start = Instant::now() + Duration::from_millis(100);
        let mut time = Time::starting_at(start);
        time.update_at(start - Duration::from_millis(10));
        assert_eq!(time.delta_millis(), 0);
        assert_eq!(time.fps(), 0.0);
    }
}
