//! Strider level runtime.
//!
//! Loads level packages from disk, instantiates their scenes and mechanics,
//! and drives them on offset clocks under a per-session runner.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`time`] | `OffsetClock`, time sources, frame clock, timer display |
//! | [`core`] | `Lifecycle` contract and `PhaseCell` |
//! | [`coords`] | `Vec3`, `Transform` |
//! | [`scene`] | materialized scene tree and blueprint providers |
//! | [`mechanics`] | `Spinner`, `Teleporter` |
//! | [`level`] | `LevelInfo`, `Level`, `LevelPackage`, `LevelRunner` |
//! | [`config`] | `EngineConfig` (`strider.toml`) |
//! | [`logging`] | `init_logging` |

pub mod config;
pub mod coords;
pub mod core;
pub mod level;
pub mod logging;
pub mod mechanics;
pub mod scene;
pub mod time;

pub use strider_format as format;
