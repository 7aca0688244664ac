//! EMV TLV tree types (TagClass, Node, Value, Tree, Structure)

use emv_core::{TlvError, TlvResult, tag_name};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::encoder::Encoder;

/// Tag class
///
/// Taken from bits 7-6 of the first tag byte:
/// - **Universal** (00)
/// - **Application** (01), the class of most EMV data elements (`5A`, `5F2A`)
/// - **Context-specific** (10), e.g. `82`, `9F26`
/// - **Private** (11), e.g. `DF01`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl TagClass {
    /// Get tag class from the top two bits of a tag byte
    pub fn from_bits(byte: u8) -> Self {
        match (byte >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// Convert tag class back to its bit position in a tag byte
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// Ordered mapping of canonical tag string to node
///
/// Inserting a tag that is already present replaces the node in place, so a
/// tag repeated at the same level keeps the position of its first occurrence
/// and the content of its last.
pub type Tree = IndexMap<String, Node>;

/// Node value
///
/// Primitive tags carry raw data as a lowercase hex string; constructed tags
/// carry a nested tree. In JSON a string is primitive and an object is
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Raw value bytes, hex encoded
    Primitive(String),
    /// Nested TLV elements
    Constructed(Tree),
}

impl Value {
    /// Check whether this value holds a nested tree
    pub fn is_constructed(&self) -> bool {
        matches!(self, Value::Constructed(_))
    }

    /// Get the hex string of a primitive value
    pub fn as_primitive(&self) -> Option<&str> {
        match self {
            Value::Primitive(hex) => Some(hex),
            Value::Constructed(_) => None,
        }
    }

    /// Get the nested tree of a constructed value
    pub fn as_constructed(&self) -> Option<&Tree> {
        match self {
            Value::Primitive(_) => None,
            Value::Constructed(tree) => Some(tree),
        }
    }
}

/// A decoded TLV data element
///
/// `length` is the length declared by the length field, which may exceed the
/// number of value bytes actually present when the payload was truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Canonical tag string; when absent the encoder uses the tree key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Display name from the tag dictionary (empty if unknown)
    #[serde(default)]
    pub name: String,
    /// Declared value length in bytes
    #[serde(default)]
    pub length: usize,
    /// Value
    pub value: Value,
}

impl Node {
    /// Create a primitive node from a hex-encoded value
    ///
    /// The name is looked up in the tag dictionary and the length is the
    /// byte count of `hex`.
    pub fn primitive(tag: impl Into<String>, hex: impl Into<String>) -> Self {
        let tag = tag.into();
        let hex = hex.into();
        Self {
            name: tag_name(&tag).to_string(),
            length: hex.len() / 2,
            tag: Some(tag),
            value: Value::Primitive(hex),
        }
    }

    /// Create a constructed node from a nested tree
    ///
    /// The length is the byte count of the nested tree once encoded.
    pub fn constructed(tag: impl Into<String>, tree: Tree) -> Self {
        let tag = tag.into();
        let length = Encoder::new().encode_tree(&tree).len() / 2;
        Self {
            name: tag_name(&tag).to_string(),
            length,
            tag: Some(tag),
            value: Value::Constructed(tree),
        }
    }
}

/// Depth-first lookup helpers on a [`Tree`]
pub trait TreeExt {
    /// Find the first node carrying `tag`, searching nested levels
    /// depth-first in tree order
    fn find(&self, tag: &str) -> Option<&Node>;

    /// Insert a node keyed by its own tag
    ///
    /// Returns the node previously stored under that tag, if any. Nodes
    /// without a tag are not inserted and are handed back.
    fn push(&mut self, node: Node) -> Option<Node>;
}

impl TreeExt for Tree {
    fn find(&self, tag: &str) -> Option<&Node> {
        for (key, node) in self {
            if key == tag {
                return Some(node);
            }
            if let Value::Constructed(nested) = &node.value {
                if let Some(found) = nested.find(tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn push(&mut self, node: Node) -> Option<Node> {
        match node.tag.clone() {
            Some(tag) => self.insert(tag, node),
            None => Some(node),
        }
    }
}

/// Encoder input: either a whole tree or a single node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    /// Sequence of elements, encoded in tree order
    Tree(Tree),
    /// Single element, encoded under its own tag
    Node(Node),
}

impl From<Tree> for Structure {
    fn from(tree: Tree) -> Self {
        Structure::Tree(tree)
    }
}

impl From<Node> for Structure {
    fn from(node: Node) -> Self {
        Structure::Node(node)
    }
}

impl Structure {
    /// Build encoder input from dynamic JSON
    ///
    /// An object with a string or object `value` field is read as a single
    /// node; any other object is read as a tree. Tree entries that are not
    /// well-formed nodes are dropped here, the same way the encoder skips
    /// them.
    ///
    /// # Error Handling
    /// Returns `MalformedStructure` when `json` is not an object.
    pub fn from_json(json: &serde_json::Value) -> TlvResult<Self> {
        let object = json.as_object().ok_or(TlvError::MalformedStructure(
            "expected a tree or a node object",
        ))?;

        match node_from_json(object) {
            Some(node) => Ok(Structure::Node(node)),
            None => Ok(Structure::Tree(tree_from_json(object))),
        }
    }
}

impl TryFrom<&serde_json::Value> for Structure {
    type Error = TlvError;

    fn try_from(json: &serde_json::Value) -> TlvResult<Self> {
        Structure::from_json(json)
    }
}

fn node_from_json(object: &Map<String, serde_json::Value>) -> Option<Node> {
    let value = match object.get("value")? {
        serde_json::Value::String(hex) => Value::Primitive(hex.clone()),
        serde_json::Value::Object(nested) => Value::Constructed(tree_from_json(nested)),
        _ => return None,
    };

    Some(Node {
        tag: object.get("tag").and_then(|t| t.as_str()).map(str::to_string),
        name: object
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or_default()
            .to_string(),
        length: object
            .get("length")
            .and_then(|l| l.as_u64())
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or_default(),
        value,
    })
}

fn tree_from_json(object: &Map<String, serde_json::Value>) -> Tree {
    object
        .iter()
        .filter_map(|(tag, entry)| {
            let node = node_from_json(entry.as_object()?)?;
            Some((tag.clone(), node))
        })
        .collect()
}
