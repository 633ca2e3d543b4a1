use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::source::{MonotonicTime, SharedTimeSource, to_nanos};

/// Set in `state` while the clock runs.
const RUNNING: u64 = 1 << 63;
const VALUE: u64 = !RUNNING;

/// A clock shared between a level, its mechanics, and read-only displays.
pub type SharedClock = Arc<OffsetClock>;

/// Stopwatch whose reported time includes an additive offset.
///
/// `elapsed() == raw_elapsed() + offset()` in every state. Raw elapsed only
/// advances while running; the offset changes only through [`set_offset`].
///
/// Running flag and raw elapsed share one atomic word:
/// - running: low bits hold the source reading at which raw elapsed was zero
/// - stopped: low bits hold the frozen raw elapsed
///
/// so a reader on the tick thread never sees a torn pair while an input
/// handler starts or stops the clock. All methods take `&self`.
///
/// [`set_offset`]: OffsetClock::set_offset
#[derive(Debug)]
pub struct OffsetClock {
    source: SharedTimeSource,
    state: AtomicU64,
    offset: AtomicU64,
}

impl OffsetClock {
    /// Stopped clock on the process monotonic source.
    pub fn new(offset: Duration) -> Self {
        Self::with_source(MonotonicTime::shared(), offset)
    }

    /// Stopped clock reading `source`.
    pub fn with_source(source: SharedTimeSource, offset: Duration) -> Self {
        Self {
            source,
            state: AtomicU64::new(0),
            offset: AtomicU64::new(to_nanos(offset)),
        }
    }

    pub fn shared(self) -> SharedClock {
        Arc::new(self)
    }

    pub fn source(&self) -> &SharedTimeSource {
        &self.source
    }

    fn now(&self) -> u64 {
        to_nanos(self.source.now()) & VALUE
    }

    /// Starts counting. No-op while already running.
    pub fn start(&self) {
        let now = self.now();
        let _ = self.state.fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| {
            (s & RUNNING == 0).then(|| RUNNING | now.saturating_sub(s & VALUE))
        });
    }

    /// Freezes raw elapsed. No-op while already stopped.
    pub fn stop(&self) {
        let now = self.now();
        let _ = self.state.fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| {
            (s & RUNNING != 0).then(|| now.saturating_sub(s & VALUE))
        });
    }

    /// Stops the clock and zeroes raw elapsed. The offset is kept.
    pub fn reset(&self) {
        self.state.store(0, Ordering::Release);
    }

    /// Zeroes raw elapsed and starts counting.
    pub fn restart(&self) {
        self.state.store(RUNNING | self.now(), Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) & RUNNING != 0
    }

    /// Time counted while running, without the offset.
    pub fn raw_elapsed(&self) -> Duration {
        let s = self.state.load(Ordering::Acquire);
        let raw = if s & RUNNING != 0 {
            self.now().saturating_sub(s & VALUE)
        } else {
            s
        };
        Duration::from_nanos(raw)
    }

    pub fn offset(&self) -> Duration {
        Duration::from_nanos(self.offset.load(Ordering::Acquire))
    }

    /// Takes effect on the next read; raw elapsed is untouched.
    pub fn set_offset(&self, offset: Duration) {
        self.offset.store(to_nanos(offset), Ordering::Release);
    }

    pub fn elapsed(&self) -> Duration {
        self.raw_elapsed().saturating_add(self.offset())
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for OffsetClock {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
