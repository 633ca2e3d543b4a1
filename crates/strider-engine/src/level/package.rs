use std::path::{Path, PathBuf};
use std::time::Duration;

use strider_format::Blueprint;

use crate::core::Lifecycle;
use crate::mechanics::MechanicClockPolicy;
use crate::scene::SceneProvider;
use crate::time::{OffsetClock, SharedTimeSource};

use super::{Level, LevelError, LevelInfo, Missing};

/// The on-storage bundle for one level: metadata plus blueprint, and the
/// level instance once one is created.
///
/// Load sequence: [`load_root_node`] → [`create_level_instance`] →
/// [`start_level`]. Each step fails with [`LevelError::NotLoaded`] if the
/// one before it has not run.
///
/// [`load_root_node`]: LevelPackage::load_root_node
/// [`create_level_instance`]: LevelPackage::create_level_instance
/// [`start_level`]: LevelPackage::start_level
#[derive(Debug)]
pub struct LevelPackage {
    dir: PathBuf,
    info: Option<LevelInfo>,
    blueprint: Option<Blueprint>,
    level: Option<Level>,
}

impl LevelPackage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), info: None, blueprint: None, level: None }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn info(&self) -> Option<&LevelInfo> {
        self.info.as_ref()
    }

    pub fn blueprint(&self) -> Option<&Blueprint> {
        self.blueprint.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.info.is_some() && self.blueprint.is_some()
    }

    /// Reads metadata and blueprint from the package directory and checks
    /// that a level can be built from them. Nothing is kept unless every
    /// step succeeds.
    pub fn load_root_node(&mut self, provider: &dyn SceneProvider) -> Result<(), LevelError> {
        if !self.dir.is_dir() {
            return Err(LevelError::NotFound(Missing::LevelDirectory(self.dir.clone())));
        }
        let info = LevelInfo::load(&self.dir)?;
        let blueprint = provider.load_blueprint(&self.dir)?;
        Level::validate(&info, &blueprint)?;

        log::debug!("loaded package {:?} from {}", info.name, self.dir.display());
        self.info = Some(info);
        self.blueprint = Some(blueprint);
        Ok(())
    }

    /// Materializes a level on a fresh stopped clock with zero offset.
    /// A previous instance of this package is disposed first.
    pub fn create_level_instance(
        &mut self,
        time: &SharedTimeSource,
        policy: MechanicClockPolicy,
    ) -> Result<&mut Level, LevelError> {
        let (Some(info), Some(blueprint)) = (&self.info, &self.blueprint) else {
            return Err(LevelError::NotLoaded { dir: self.dir.clone(), step: "root node" });
        };
        if let Some(previous) = self.level.take() {
            previous.dispose();
        }

        let clock = OffsetClock::with_source(time.clone(), Duration::ZERO).shared();
        let level = Level::build(info.clone(), blueprint, clock, policy)?;
        Ok(self.level.insert(level))
    }

    /// Initializes and starts the level instance.
    pub fn start_level(&mut self) -> Result<(), LevelError> {
        let Some(level) = self.level.as_mut() else {
            return Err(LevelError::NotLoaded { dir: self.dir.clone(), step: "level instance" });
        };
        level.initialize();
        level.start();
        Ok(())
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    /// Detaches the level instance; the caller becomes responsible for it.
    pub fn take_level(&mut self) -> Option<Level> {
        self.level.take()
    }

    /// Stops and disposes the level instance, if any.
    pub fn dispose(mut self) {
        if let Some(mut level) = self.level.take() {
            level.stop();
            level.dispose();
        }
    }
}
