//! Level mechanics: time-driven or triggered interactive objects.
//!
//! A blueprint node whose kind names a mechanic (`Spinner`, `Teleporter`) is
//! turned into a [`Mechanic`] when the level is instantiated. Every other
//! kind is scenery.

mod spinner;
mod teleporter;

use serde::{Deserialize, Serialize};
use strider_format::Value;

pub use spinner::Spinner;
pub use teleporter::Teleporter;

use crate::core::{Lifecycle, Phase};
use crate::level::LevelError;
use crate::scene::{NodeId, SceneNode, SceneTree};
use crate::time::SharedClock;

/// How a mechanic's private clock is seeded each time the level starts.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicClockPolicy {
    /// Restart at zero offset.
    #[default]
    ResetToZero,
    /// Restart with offset = level clock elapsed at start time.
    InheritLevelOffset,
}

/// Position of a mechanic in blueprint pre-order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MechanicId(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MechanicKind {
    Spinner,
    Teleporter,
}

impl MechanicKind {
    /// Maps a blueprint node kind to a mechanic kind.
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "Spinner" => Some(MechanicKind::Spinner),
            "Teleporter" => Some(MechanicKind::Teleporter),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MechanicKind::Spinner => "Spinner",
            MechanicKind::Teleporter => "Teleporter",
        }
    }
}

#[derive(Debug)]
pub enum Mechanic {
    Spinner(Spinner),
    Teleporter(Teleporter),
}

impl Mechanic {
    /// Builds the mechanic a node marks, if any. Unnamed mechanics are named
    /// `Kind#index`.
    pub(crate) fn from_node(
        id: NodeId,
        node: &SceneNode,
        scene: &SceneTree,
        level_clock: &SharedClock,
        policy: MechanicClockPolicy,
    ) -> Result<Option<Self>, LevelError> {
        let Some(kind) = MechanicKind::from_node_kind(&node.kind) else {
            return Ok(None);
        };
        let name = mechanic_name(kind, id, node);

        let mechanic = match kind {
            MechanicKind::Spinner => {
                Mechanic::Spinner(Spinner::from_node(name, id, node, level_clock.clone())?)
            }
            MechanicKind::Teleporter => Mechanic::Teleporter(Teleporter::from_node(
                name,
                id,
                node,
                scene,
                level_clock.clone(),
                policy,
            )?),
        };
        Ok(Some(mechanic))
    }

    /// Reads the configuration of the mechanic a node marks without building
    /// it. Fails exactly where [`from_node`](Self::from_node) would.
    pub(crate) fn check_node(id: NodeId, node: &SceneNode, scene: &SceneTree) -> Result<(), LevelError> {
        let Some(kind) = MechanicKind::from_node_kind(&node.kind) else {
            return Ok(());
        };
        let name = mechanic_name(kind, id, node);
        match kind {
            MechanicKind::Spinner => Spinner::read_config(&name, node).map(drop),
            MechanicKind::Teleporter => Teleporter::read_config(&name, node, scene).map(drop),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Mechanic::Spinner(s) => s.name(),
            Mechanic::Teleporter(t) => t.name(),
        }
    }

    pub fn kind(&self) -> MechanicKind {
        match self {
            Mechanic::Spinner(_) => MechanicKind::Spinner,
            Mechanic::Teleporter(_) => MechanicKind::Teleporter,
        }
    }

    /// Per-tick update.
    pub fn update(&mut self, scene: &mut SceneTree) {
        match self {
            Mechanic::Spinner(s) => s.update(scene),
            // Triggered only; nothing to do per tick.
            Mechanic::Teleporter(_) => {}
        }
    }

    pub fn as_spinner(&self) -> Option<&Spinner> {
        match self {
            Mechanic::Spinner(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_teleporter(&self) -> Option<&Teleporter> {
        match self {
            Mechanic::Teleporter(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_teleporter_mut(&mut self) -> Option<&mut Teleporter> {
        match self {
            Mechanic::Teleporter(t) => Some(t),
            _ => None,
        }
    }
}

fn mechanic_name(kind: MechanicKind, id: NodeId, node: &SceneNode) -> String {
    node.name
        .clone()
        .unwrap_or_else(|| format!("{}#{}", kind.as_str(), id.index()))
}

/// A numeric property: `None` when absent, an error when present with any
/// other value type.
pub(crate) fn number_prop(name: &str, node: &SceneNode, key: &str) -> Result<Option<f64>, LevelError> {
    match node.prop(key) {
        None => Ok(None),
        Some(Value::Number(v)) => Ok(Some(*v)),
        Some(other) => Err(LevelError::InvalidMechanic {
            name: name.to_string(),
            reason: format!("`{key}` must be a number, got {other:?}"),
        }),
    }
}

impl Lifecycle for Mechanic {
    fn phase(&self) -> Phase {
        match self {
            Mechanic::Spinner(s) => s.phase(),
            Mechanic::Teleporter(t) => t.phase(),
        }
    }

    fn initialize(&mut self) {
        match self {
            Mechanic::Spinner(s) => s.initialize(),
            Mechanic::Teleporter(t) => t.initialize(),
        }
    }

    fn start(&mut self) {
        match self {
            Mechanic::Spinner(s) => s.start(),
            Mechanic::Teleporter(t) => t.start(),
        }
    }

    fn stop(&mut self) {
        match self {
            Mechanic::Spinner(s) => s.stop(),
            Mechanic::Teleporter(t) => t.stop(),
        }
    }

    fn dispose(self) {
        match self {
            Mechanic::Spinner(s) => s.dispose(),
            Mechanic::Teleporter(t) => t.dispose(),
        }
    }
}
