use std::time::Duration;

use super::source::{MonotonicTime, SharedTimeSource};

/// Tick timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,

    /// Time-source reading taken at the tick.
    pub now: Duration,

    /// Monotonic tick counter.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots for the simulation loop.
///
/// One clock per tick loop. Delta time is clamped so a debugger pause or a
/// long stall does not hand the level a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: SharedTimeSource,
    last: Duration,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clock on the process monotonic source with default clamps
    /// (0.1 ms to 250 ms).
    pub fn new() -> Self {
        Self::with_source(MonotonicTime::shared())
    }

    pub fn with_source(source: SharedTimeSource) -> Self {
        Self::with_clamps(source, Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(source: SharedTimeSource, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let last = source.now();
        Self { source, last, frame_index: 0, dt_min, dt_max }
    }

    /// Resets the baseline, e.g. after the level was paused.
    pub fn reset(&mut self) {
        self.last = self.source.now();
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = self.source.now();
        let dt = now.saturating_sub(self.last).clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime { dt: dt.as_secs_f32(), now, frame_index: self.frame_index };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
