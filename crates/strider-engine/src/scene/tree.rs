use std::collections::HashMap;

use strider_format::{Blueprint, Node};

use crate::coords::{Transform, Vec3};

use super::{NodeId, SceneNode};

const TRANSFORM_KEYS: [&str; 4] = ["x", "y", "z", "yaw"];

/// Arena of scene nodes materialized from a blueprint.
///
/// Nodes are stored in blueprint pre-order, so the root is always index 0 and
/// iteration visits parents before children. Named nodes are indexed for
/// anchor lookup; the first node with a given name owns it.
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
    names: HashMap<String, NodeId>,
}

impl SceneTree {
    pub fn from_blueprint(blueprint: &Blueprint) -> Self {
        let mut tree = Self::default();
        tree.insert(&blueprint.root, None);
        tree
    }

    fn insert(&mut self, node: &Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);

        let read = |key: &str| node.prop_f64(key).unwrap_or(0.0) as f32;
        let transform = Transform {
            position: Vec3::new(read("x"), read("y"), read("z")),
            yaw: read("yaw"),
        };
        let props = node
            .props
            .iter()
            .filter(|p| !TRANSFORM_KEYS.contains(&p.key.as_str()))
            .cloned()
            .collect();

        self.nodes.push(SceneNode {
            kind: node.kind.clone(),
            name: node.name.clone(),
            parent,
            children: Vec::with_capacity(node.children.len()),
            transform,
            props,
        });

        if let Some(name) = &node.name {
            if self.names.contains_key(name) {
                log::warn!("duplicate node name {:?} at line {}; keeping the first", name, node.line);
            } else {
                self.names.insert(name.clone(), id);
            }
        }

        for child in &node.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.index()].children.push(child_id);
        }

        id
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.index())
    }

    /// Named-anchor lookup.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Sum of local positions from `id` up to the root.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let mut node = self.get(id)?;
        let mut pos = node.transform.position;
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            pos = pos + node.transform.position;
        }
        Some(pos)
    }

    /// Moves `id` so its world position becomes `position`. `false` if `id`
    /// does not exist.
    pub fn set_world_position(&mut self, id: NodeId, position: Vec3) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let parent_world = match node.parent {
            Some(parent) => self.world_position(parent).unwrap_or(Vec3::ZERO),
            None => Vec3::ZERO,
        };
        match self.get_mut(id) {
            Some(node) => {
                node.transform.position = position - parent_world;
                true
            }
            None => false,
        }
    }

    pub fn anchor_position(&self, name: &str) -> Option<Vec3> {
        self.world_position(self.find(name)?)
    }
}

#[cfg(test)]
mod tests {
    use strider_format::parse_str;

    use super::*;

    fn tree(src: &str) -> SceneTree {
        SceneTree::from_blueprint(&parse_str(src).unwrap())
    }

    #[test]
    fn preorder_layout() {
        let t = tree(r#"Level { Group "g" { Anchor "a" } Anchor "b" }"#);
        let kinds: Vec<_> = t.iter().map(|(_, n)| n.label().to_string()).collect();
        assert_eq!(kinds, ["Level", "g", "a", "b"]);
        assert_eq!(t.get(t.root()).unwrap().children.len(), 2);
    }

    #[test]
    fn transform_props_are_lifted() {
        let t = tree(r#"Level { Spinner "s" { x: 1 yaw: 0.5 speed: 2 } }"#);
        let s = t.get(t.find("s").unwrap()).unwrap();
        assert_eq!(s.transform.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(s.transform.yaw, 0.5);
        assert_eq!(s.prop_f64("speed"), Some(2.0));
        assert!(s.prop("x").is_none());
    }

    #[test]
    fn world_position_accumulates_parents() {
        let t = tree(r#"Level { x: 1 Group "g" { y: 2 Anchor "a" { z: 3 } } }"#);
        assert_eq!(t.anchor_position("a"), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn set_world_position_compensates_parent() {
        let mut t = tree(r#"Level { Group "g" { x: 10 Body "p" } }"#);
        let p = t.find("p").unwrap();
        assert!(t.set_world_position(p, Vec3::new(4.0, 1.0, 0.0)));
        assert_eq!(t.world_position(p), Some(Vec3::new(4.0, 1.0, 0.0)));
        assert_eq!(t.get(p).unwrap().transform.position, Vec3::new(-6.0, 1.0, 0.0));
    }

    #[test]
    fn duplicate_names_keep_first() {
        let t = tree(r#"Level { Anchor "a" { x: 1 } Anchor "a" { x: 2 } }"#);
        assert_eq!(t.anchor_position("a"), Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn missing_anchor() {
        let t = tree("Level { }");
        assert!(t.find("exit").is_none());
        assert!(t.anchor_position("exit").is_none());
    }
}
