use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Field name under which unlabelled child nodes are collected.
pub const CHILDREN: &str = "children";

/// Ordered named fields of a record. Order is the enumeration order used by
/// every traversal.
pub type Fields = Vec<(String, Tree)>;

/// A primitive value carried by a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Leaf {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Native identity of a node as reported by the grammar that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Raw {
    /// Node-type tag assigned by the grammar (`string`, `statement_block`, ...)
    pub native_kind: String,
    /// Grammar that produced the node
    pub grammar: &'static str,
}

/// A node-shaped record.
///
/// `start`/`end` are UTF-16 code-unit offsets into the source. Either may be
/// absent, in which case the node never takes part in cursor queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Normalized category (`string`, `block`) or the native tag
    pub kind: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub raw: Option<Raw>,
    pub fields: Fields,
}

impl Node {
    /// Create a node with no offsets and no fields.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            start: None,
            end: None,
            raw: None,
            fields: Vec::new(),
        }
    }

    /// Create a node covering `[start, end]`.
    pub fn with_span(kind: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::new(kind)
        }
    }

    /// Attach the grammar's native identity.
    pub fn with_raw(mut self, native_kind: impl Into<String>, grammar: &'static str) -> Self {
        self.raw = Some(Raw {
            native_kind: native_kind.into(),
            grammar,
        });
        self
    }

    /// Append a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Tree>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&Tree> {
        lookup(&self.fields, name)
    }

    /// The grammar's tag for this node, falling back to `kind` for nodes
    /// built without one.
    pub fn native_kind(&self) -> &str {
        self.raw
            .as_ref()
            .map(|raw| raw.native_kind.as_str())
            .unwrap_or(&self.kind)
    }

    /// Both offsets, if present and ordered.
    pub fn span(&self) -> Option<(usize, usize)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }
}

/// A heterogeneous tree: node-shaped records, plain records, sequences,
/// primitives and holes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Tree {
    Node(Box<Node>),
    /// A keyed record that is not itself a node (e.g. a location record)
    Record(Fields),
    Seq(Vec<Tree>),
    Leaf(Leaf),
    #[default]
    Absent,
}

impl Tree {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Tree::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Field lookup on nodes and records; `None` for everything else.
    pub fn get(&self, name: &str) -> Option<&Tree> {
        match self {
            Tree::Node(node) => node.field(name),
            Tree::Record(fields) => lookup(fields, name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::Leaf(Leaf::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// A non-negative integer leaf as an offset. Any other shape is `None`.
    pub fn as_offset(&self) -> Option<usize> {
        match self {
            Tree::Leaf(Leaf::Int(n)) => usize::try_from(*n).ok(),
            _ => None,
        }
    }
}

fn lookup<'a>(fields: &'a Fields, name: &str) -> Option<&'a Tree> {
    fields
        .iter()
        .find(|(field, _)| field == name)
        .map(|(_, value)| value)
}

impl From<Node> for Tree {
    fn from(node: Node) -> Self {
        Tree::Node(Box::new(node))
    }
}

impl From<Leaf> for Tree {
    fn from(leaf: Leaf) -> Self {
        Tree::Leaf(leaf)
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::Seq(items)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::Leaf(Leaf::Str(s.to_string()))
    }
}

impl From<i64> for Tree {
    fn from(n: i64) -> Self {
        Tree::Leaf(Leaf::Int(n))
    }
}

impl From<bool> for Tree {
    fn from(b: bool) -> Self {
        Tree::Leaf(Leaf::Bool(b))
    }
}

struct FieldsRef<'a>(&'a Fields);

impl Serialize for FieldsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", &self.kind)?;
        map.serialize_entry("start", &self.start)?;
        map.serialize_entry("end", &self.end)?;
        if let Some(raw) = &self.raw {
            map.serialize_entry("raw", raw)?;
        }
        if !self.fields.is_empty() {
            map.serialize_entry("fields", &FieldsRef(&self.fields))?;
        }
        map.end()
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Node(node) => node.serialize(serializer),
            Tree::Record(fields) => FieldsRef(fields).serialize(serializer),
            Tree::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tree::Leaf(leaf) => leaf.serialize(serializer),
            Tree::Absent => serializer.serialize_unit(),
        }
    }
}
