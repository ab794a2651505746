use std::time::{Duration, Instant};

/// Per-frame timing snapshot handed to the application each frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped by the clock.
    pub dt: f32,

    /// Seconds since the clock was created or last reset.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, wrapping on overflow.
    pub frame_index: u64,
}

/// Produces [`FrameTime`] snapshots for one render loop.
///
/// Delta time is clamped on both ends: the minimum keeps tight loops from
/// reporting zero, the maximum keeps simulations stable after a stall (window
/// minimized, debugger pause, long asset load).
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Rebaselines the clock, e.g. after resuming from suspension.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last = now;
        self.frame_index = 0;
    }

    /// Advances the clock one frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let frame = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_advances_per_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_to_the_configured_range() {
        let min = Duration::from_millis(5);
        let max = Duration::from_millis(20);
        let mut clock = FrameClock::with_clamps(min, max);

        // Immediate tick lands below the minimum.
        let frame = clock.tick();
        assert!((frame.dt - min.as_secs_f32()).abs() < 1e-6);

        // A stalled frame is capped at the maximum.
        clock.last = Instant::now() - Duration::from_secs(2);
        let frame = clock.tick();
        assert!((frame.dt - max.as_secs_f32()).abs() < 1e-6);
    }

    #[test]
    fn reset_rewinds_elapsed_and_frame_index() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.tick();
        clock.reset();
        let frame = clock.tick();
        assert_eq!(frame.frame_index, 0);
        assert!(frame.elapsed < 1.0);
    }
}
