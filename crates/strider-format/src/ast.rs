// ── Value ─────────────────────────────────────────────────────────────────

/// A literal value in a property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted string: `"exit"`
    Str(String),
    /// Numeric literal: `1.5` or `-2`
    Number(f64),
    /// Unquoted identifier: anchor references, `true` / `false`, enum-like words
    Ident(String),
}

impl Value {
    /// Text content of a `Str` or `Ident` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Ident(s) => Some(s),
            Value::Number(_) => None,
        }
    }
}

// ── Prop ──────────────────────────────────────────────────────────────────

/// A single `key: value` property inside a node block.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub key: String,
    pub value: Value,
}

// ── Node ──────────────────────────────────────────────────────────────────

/// One node of a level blueprint.
///
/// ```text
/// Teleporter "gate" {
///     destination: exit
///     cooldown: 0.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node kind: `"Level"`, `"Anchor"`, `"Spinner"`, ...
    pub kind: String,
    /// Optional quoted name; named nodes double as anchors.
    pub name: Option<String>,
    pub props: Vec<Prop>,
    pub children: Vec<Node>,
    /// 1-based line of the kind identifier.
    pub line: usize,
}

impl Node {
    /// Look up a property value by key. The last occurrence wins.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.iter().rev().find(|p| p.key == key).map(|p| &p.value)
    }

    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        match self.prop(key)? {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text of a `Str` or `Ident` property.
    pub fn prop_text(&self, key: &str) -> Option<&str> {
        self.prop(key)?.as_text()
    }

    pub fn prop_bool(&self, key: &str) -> Option<bool> {
        match self.prop(key)? {
            Value::Ident(s) if s == "true" => Some(true),
            Value::Ident(s) if s == "false" => Some(false),
            _ => None,
        }
    }

    /// Depth-first, pre-order walk over this node and all descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Iterator returned by [`Node::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// ── Blueprint ─────────────────────────────────────────────────────────────

/// A parsed `.scene` file: exactly one root node.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub root: Node,
}

impl Blueprint {
    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        self.root.walk().count()
    }
}
