/// Lifecycle position of an interactive object.
///
/// `Uninitialized → Initialized → (Started ⇄ Stopped)* → Disposed`
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Phase {
    #[default]
    Uninitialized,
    Initialized,
    Started,
    Stopped,
    Disposed,
}

/// Contract shared by every timed, stateful object in a level.
///
/// - `initialize` is idempotent; only the first call has effects.
/// - `start` may run repeatedly (level restarts) and must put per-object
///   counters back to their starting values each time. Calling it before
///   `initialize` is a programming error and panics.
/// - `stop` without a matching `start` is a no-op; it detaches everything
///   `start` attached before it returns.
/// - `dispose` consumes the object, so nothing can be called afterwards.
pub trait Lifecycle {
    fn phase(&self) -> Phase;
    fn initialize(&mut self);
    fn start(&mut self);
    fn stop(&mut self);
    fn dispose(self)
    where
        Self: Sized;
}

/// Phase bookkeeping embedded by each `Lifecycle` implementor.
///
/// Transition methods report whether the caller should run its hook.
#[derive(Debug, Clone, Default)]
pub struct PhaseCell {
    phase: Phase,
}

impl PhaseCell {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.phase == Phase::Started
    }

    /// `true` on the first call only.
    pub fn initialize(&mut self) -> bool {
        match self.phase {
            Phase::Uninitialized => {
                self.phase = Phase::Initialized;
                true
            }
            Phase::Disposed => panic!("initialize called on a disposed object"),
            _ => false,
        }
    }

    /// Enters `Started`. The start hook always runs, including on restart.
    pub fn start(&mut self) {
        match self.phase {
            Phase::Uninitialized => panic!("start called before initialize"),
            Phase::Disposed => panic!("start called on a disposed object"),
            _ => self.phase = Phase::Started,
        }
    }

    /// `true` when the object was started and must detach.
    pub fn stop(&mut self) -> bool {
        match self.phase {
            Phase::Started => {
                self.phase = Phase::Stopped;
                true
            }
            Phase::Disposed => panic!("stop called on a disposed object"),
            _ => false,
        }
    }

    /// `true` when the caller still has to run its stop hook first.
    pub fn dispose(&mut self) -> bool {
        assert_ne!(self.phase, Phase::Disposed, "disposed twice");
        let was_started = self.phase == Phase::Started;
        self.phase = Phase::Disposed;
        was_started
    }
}
