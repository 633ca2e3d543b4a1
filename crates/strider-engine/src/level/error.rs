use std::fmt;
use std::path::PathBuf;

use strider_format::ParseError;

/// A resource a load or lookup required but did not find.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Missing {
    LevelDirectory(PathBuf),
    Blueprint(PathBuf),
    Metadata(PathBuf),
    /// A teleporter's destination anchor is not in the scene.
    Anchor { teleporter: String, anchor: String },
    Mechanic(String),
    Node(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::LevelDirectory(p) => write!(f, "level directory {}", p.display()),
            Missing::Blueprint(p) => write!(f, "blueprint {}", p.display()),
            Missing::Metadata(p) => write!(f, "metadata file in {}", p.display()),
            Missing::Anchor { teleporter, anchor } => {
                write!(f, "anchor {anchor:?} (destination of teleporter {teleporter:?})")
            }
            Missing::Mechanic(name) => write!(f, "mechanic {name:?}"),
            Missing::Node(name) => write!(f, "scene node {name:?}"),
        }
    }
}

/// Errors surfaced by level loading and level operations.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("{0} not found")]
    NotFound(Missing),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid blueprint {}", path.display())]
    Blueprint {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Storage yielded no usable scene composition.
    #[error("level {level:?} is corrupt: {reason}")]
    Corrupt { level: String, reason: String },

    #[error("invalid mechanic {name:?}: {reason}")]
    InvalidMechanic { name: String, reason: String },

    /// A recognized but unimplemented format. Never silently substituted.
    #[error("{0} is not supported")]
    Unsupported(String),

    /// An operation needed a step of the load sequence that has not run.
    #[error("level package {} has no {step} yet", dir.display())]
    NotLoaded { dir: PathBuf, step: &'static str },
}

impl LevelError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LevelError::NotFound(_))
    }
}
