use strider_format::{Prop, Value};

use crate::coords::Transform;

/// Index of a node inside its [`SceneTree`](super::SceneTree).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A materialized blueprint node.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub kind: String,
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Local transform relative to `parent`.
    pub transform: Transform,
    /// Blueprint properties other than the transform, kept for mechanics.
    pub props: Vec<Prop>,
}

impl SceneNode {
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.iter().rev().find(|p| p.key == key).map(|p| &p.value)
    }

    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        match self.prop(key)? {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn prop_text(&self, key: &str) -> Option<&str> {
        self.prop(key)?.as_text()
    }

    /// Display label for logs: the name if present, else the kind.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }
}
