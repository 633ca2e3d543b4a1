//! Core contracts shared by levels and mechanics.
//!
//! Interactive objects compose a [`PhaseCell`] and implement [`Lifecycle`]
//! instead of inheriting from a node base class.

mod lifecycle;

pub use lifecycle::{Lifecycle, Phase, PhaseCell};
