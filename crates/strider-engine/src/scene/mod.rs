//! Scene composition.
//!
//! Responsibilities:
//! - materialize a parsed blueprint into an index-addressed node arena
//! - named-anchor lookup and world-space positioning for mechanics
//! - load blueprints from storage through a [`SceneProvider`]

mod node;
mod provider;
mod tree;

pub use node::{NodeId, SceneNode};
pub use provider::{BLUEPRINT_FILE, FsSceneProvider, SceneProvider};
pub use tree::SceneTree;
