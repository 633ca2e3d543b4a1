//! Level loading and the per-session runner.
//!
//! | Type | Role |
//! |------|------|
//! | [`LevelInfo`] | typed view of `info.txt` |
//! | [`LevelPackage`] | on-storage bundle; load → create → start |
//! | [`Level`] | running instance owning scene, clock, mechanics |
//! | [`LevelRunner`] | holds at most one package per session |

mod error;
mod info;
mod level;
mod package;
mod runner;

pub use error::{LevelError, Missing};
pub use info::{INFO_JSON_FILE, LevelInfo, MetadataFormat};
pub use level::{LEVEL_ROOT_KIND, Level};
pub use package::LevelPackage;
pub use runner::{LevelRunner, RunnerEvent};
