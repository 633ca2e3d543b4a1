use std::sync::Once;

use serde::{Deserialize, Serialize};

/// ANSI coloring policy for log output.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for env_logger::WriteStyle {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => env_logger::WriteStyle::Auto,
            ColorMode::Always => env_logger::WriteStyle::Always,
            ColorMode::Never => env_logger::WriteStyle::Never,
        }
    }
}

/// Logger configuration, the `[logging]` section of `strider.toml`.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "strider_engine=debug"). When unset, `RUST_LOG` is consulted, then `info`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub color: ColorMode,
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.color.into());
        builder.format_timestamp_millis();

        // Another logger may already be installed (e.g. by a host binary).
        if builder.try_init().is_err() {
            log::debug!("global logger already set; keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}
