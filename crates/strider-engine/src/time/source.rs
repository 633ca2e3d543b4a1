use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time reading shared by clocks.
///
/// `now()` must never go backwards. The origin is arbitrary; only differences
/// between readings are meaningful.
pub trait TimeSource: Send + Sync + fmt::Debug {
    fn now(&self) -> Duration;
}

pub type SharedTimeSource = Arc<dyn TimeSource>;

/// Wall-clock monotonic source backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }

    pub fn shared() -> SharedTimeSource {
        Arc::new(Self::new())
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced source for deterministic tests and replays.
///
/// Advancing is atomic, so a `ManualTime` can be driven from one thread while
/// clocks built on it are read from another.
#[derive(Debug, Default)]
pub struct ManualTime {
    nanos: AtomicU64,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(to_nanos(by), Ordering::AcqRel);
    }

    /// Moves to `at`. Ignored if `at` is earlier than the current reading.
    pub fn set(&self, at: Duration) {
        self.nanos.fetch_max(to_nanos(at), Ordering::AcqRel);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

pub(crate) fn to_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}
