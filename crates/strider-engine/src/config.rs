//! Engine configuration, read from `strider.toml`.
//!
//! ```toml
//! [runner]
//! timer_digits = 2
//! mechanic_clock = "inherit_level_offset"
//!
//! [logging]
//! filter = "strider_engine=debug"
//! ```
//!
//! Every field has a default, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;
use crate::mechanics::MechanicClockPolicy;
use crate::scene::BLUEPRINT_FILE;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Level runner settings, the `[runner]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Fraction digits shown by the level timer.
    pub timer_digits: usize,
    /// Seeding of mechanic private clocks on level start.
    pub mechanic_clock: MechanicClockPolicy,
    /// Blueprint file name inside each level directory.
    pub blueprint_file: String,
    /// Simulation ticks per second.
    pub tick_rate: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timer_digits: 3,
            mechanic_clock: MechanicClockPolicy::default(),
            blueprint_file: BLUEPRINT_FILE.to_string(),
            tick_rate: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub runner: RunnerConfig,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&src)
    }
}
