use std::fmt;
use std::path::PathBuf;

use crate::config::RunnerConfig;
use crate::core::{Lifecycle, Phase};
use crate::scene::{FsSceneProvider, SceneProvider};
use crate::time::{MonotonicTime, SharedClock, SharedTimeSource, TimerDisplay};

use super::{Level, LevelError, LevelPackage, Missing};

/// Notifications about the runner's current level, in the order they occur.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    LevelCreated { name: String },
    LevelStarted { name: String },
    /// `phase` is the level's phase after the stop.
    LevelStopped { name: String, phase: Phase },
    LevelDisposed { name: String },
    /// A load attempt failed; the runner state is described by the events
    /// that preceded it.
    LoadFailed { dir: PathBuf, error: String },
}

type Listener = Box<dyn FnMut(&RunnerEvent)>;

/// Per-session orchestrator holding at most one level package.
///
/// Assigning a new package fully stops and disposes the current level
/// before the next one is constructed, so two levels never run at once.
///
/// # Example
///
/// ```rust,no_run
/// use strider_engine::config::RunnerConfig;
/// use strider_engine::level::{LevelRunner, RunnerEvent};
///
/// let mut runner = LevelRunner::new("player-1", RunnerConfig::default())
///     .on_event(|e| if let RunnerEvent::LoadFailed { error, .. } = e { eprintln!("{error}") });
///
/// runner.assign("levels/tutorial")?;
/// runner.tick();
/// println!("{}", runner.timer().map(|t| t.text()).unwrap_or_default());
/// # Ok::<(), strider_engine::level::LevelError>(())
/// ```
pub struct LevelRunner {
    session: String,
    config: RunnerConfig,
    provider: Box<dyn SceneProvider>,
    time: SharedTimeSource,
    current: Option<LevelPackage>,
    listeners: Vec<Listener>,
}

impl LevelRunner {
    /// Runner reading blueprints from disk on the process monotonic clock.
    pub fn new(session: impl Into<String>, config: RunnerConfig) -> Self {
        let provider = FsSceneProvider::with_file_name(config.blueprint_file.clone());
        Self {
            session: session.into(),
            config,
            provider: Box::new(provider),
            time: MonotonicTime::shared(),
            current: None,
            listeners: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: impl SceneProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Time source for every clock the runner creates.
    pub fn with_time_source(mut self, time: SharedTimeSource) -> Self {
        self.time = time;
        self
    }

    pub fn on_event(mut self, f: impl FnMut(&RunnerEvent) + 'static) -> Self {
        self.listeners.push(Box::new(f));
        self
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&LevelPackage> {
        self.current.as_ref()
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.current.as_ref()?.level()
    }

    pub fn current_level_mut(&mut self) -> Option<&mut Level> {
        self.current.as_mut()?.level_mut()
    }

    /// Clock of the running level, for read-only consumers.
    pub fn active_clock(&self) -> Option<SharedClock> {
        self.current_level().map(|level| level.clock().clone())
    }

    pub fn timer(&self) -> Option<TimerDisplay> {
        self.active_clock()
            .map(|clock| TimerDisplay::new(clock, self.config.timer_digits))
    }

    /// Replaces the current level with the package stored in `dir`.
    ///
    /// The package is read and checked before anything is torn down: if it
    /// is missing or corrupt the current level keeps running. Only then is
    /// the current level disposed and the new one built.
    pub fn assign(&mut self, dir: impl Into<PathBuf>) -> Result<(), LevelError> {
        let dir = dir.into();
        let mut next = LevelPackage::new(dir.clone());
        if let Err(err) = next.load_root_node(self.provider.as_ref()) {
            return Err(self.fail(dir, err));
        }

        self.unload();

        let name = match next.create_level_instance(&self.time, self.config.mechanic_clock) {
            Ok(level) => level.name().to_string(),
            Err(err) => return Err(self.fail(dir, err)),
        };
        self.emit(RunnerEvent::LevelCreated { name: name.clone() });

        if let Err(err) = next.start_level() {
            next.dispose();
            return Err(self.fail(dir, err));
        }
        self.emit(RunnerEvent::LevelStarted { name: name.clone() });

        log::info!("session {:?}: entered level {name:?}", self.session);
        self.current = Some(next);
        Ok(())
    }

    /// Stops and disposes the current level. `false` if there was none.
    pub fn unload(&mut self) -> bool {
        let Some(mut package) = self.current.take() else {
            return false;
        };
        if let Some(mut level) = package.take_level() {
            let name = level.name().to_string();
            level.stop();
            self.emit(RunnerEvent::LevelStopped { name: name.clone(), phase: level.phase() });
            level.dispose();
            self.emit(RunnerEvent::LevelDisposed { name: name.clone() });
            log::info!("session {:?}: left level {name:?}", self.session);
        }
        package.dispose();
        true
    }

    /// Restarts the current level. `false` if there is none.
    pub fn restart(&mut self, reset_clock: bool) -> bool {
        match self.current_level_mut() {
            Some(level) => {
                level.restart(reset_clock);
                true
            }
            None => false,
        }
    }

    /// Pauses or resumes the current level. `false` if there is none.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let Some(level) = self.current_level_mut() else {
            return false;
        };
        if paused {
            level.pause();
        } else {
            level.resume();
        }
        log::debug!("level {:?} paused: {paused}", level.name());
        true
    }

    pub fn is_paused(&self) -> bool {
        self.current_level().is_some_and(Level::is_paused)
    }

    pub fn tick(&mut self) {
        if let Some(level) = self.current_level_mut() {
            level.tick();
        }
    }

    /// Fires a teleporter of the current level on the node named `subject`.
    pub fn teleport(&mut self, teleporter: &str, subject: &str) -> Result<bool, LevelError> {
        match self.current_level_mut() {
            Some(level) => level.teleport(teleporter, subject),
            None => Err(LevelError::NotFound(Missing::Mechanic(teleporter.to_string()))),
        }
    }

    fn fail(&mut self, dir: PathBuf, err: LevelError) -> LevelError {
        log::error!("session {:?}: failed to load {}: {err}", self.session, dir.display());
        self.emit(RunnerEvent::LoadFailed { dir, error: err.to_string() });
        err
    }

    fn emit(&mut self, event: RunnerEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl fmt::Debug for LevelRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelRunner")
            .field("session", &self.session)
            .field("config", &self.config)
            .field("current", &self.current_level().map(Level::name))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Drop for LevelRunner {
    fn drop(&mut self) {
        self.unload();
    }
}
