//! Frame timing utilities

use std::time::Instant;

/// Monotonic per-frame elapsed-time source.
///
/// One `tick()` per frame returns the seconds since the previous tick and
/// advances the internal "last frame" instant. The first tick reports 0.0
/// rather than time-since-construction, so hook animations start from rest.
pub struct FrameClock {
    last_frame: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock that has not yet ticked
    pub fn new() -> Self {
        Self { last_frame: None }
    }

    /// Advance the clock and return the elapsed seconds since the last tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame = Some(now);
        elapsed
    }
}
