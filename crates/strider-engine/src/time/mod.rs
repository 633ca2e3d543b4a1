//! Time subsystem.
//!
//! - [`TimeSource`]: monotonic readings; `ManualTime` makes tests deterministic
//! - [`OffsetClock`]: stopwatch plus offset, shared as [`SharedClock`] between a
//!   level, its mechanics, and timer displays
//! - [`FrameClock`]: per-tick delta snapshots for the simulation loop
//! - [`format_elapsed`] / [`TimerDisplay`]: `m:ss.fff` timer text

mod frame_clock;
mod offset_clock;
mod source;
mod timer;

pub use frame_clock::{FrameClock, FrameTime};
pub use offset_clock::{OffsetClock, SharedClock};
pub use source::{ManualTime, MonotonicTime, SharedTimeSource, TimeSource};
pub use timer::{TimerDisplay, format_elapsed};
