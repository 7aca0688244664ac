//! EMV BER-TLV encoder
//!
//! Serializes a [`Tree`] or a single [`Node`] into hex text. Nodes that
//! cannot be encoded produce no output and the rest of the tree is still
//! serialized; nothing about the offending node is reported to the caller.
//!
//! # Usage Example
//!
//! ```rust
//! use emv_tlv::{Encoder, Node, Structure};
//!
//! let hex = Encoder::new().serialize(&Structure::Node(Node::primitive("5A", "ff")));
//! assert_eq!(hex, "5A01ff");
//! ```

use emv_core::TlvResult;
use emv_core::constants::{MAX_VALUE_LENGTH, TAG_HEX_LENGTHS};
use log::debug;

use crate::hex_text;
use crate::inspector::tag;
use crate::types::{Node, Structure, Tree, Value};

/// EMV BER-TLV encoder
///
/// Stateless; one instance can be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Encoder;

impl Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self
    }

    /// Serialize a tree or a single node into hex text
    pub fn serialize(&self, structure: &Structure) -> String {
        match structure {
            Structure::Tree(tree) => self.encode_tree(tree),
            Structure::Node(node) => self.encode_node(node, None),
        }
    }

    /// Serialize a tree or node given as JSON
    ///
    /// # Error Handling
    /// Returns `MalformedStructure` if `json` is not an object. Object
    /// entries that are not well-formed nodes are skipped.
    pub fn serialize_json(&self, json: &serde_json::Value) -> TlvResult<String> {
        let structure = Structure::from_json(json)?;
        Ok(self.serialize(&structure))
    }

    /// Encode every node of a tree, in tree order
    ///
    /// A node without its own tag is encoded under its tree key.
    pub fn encode_tree(&self, tree: &Tree) -> String {
        tree.iter()
            .map(|(key, node)| self.encode_node(node, Some(key)))
            .collect()
    }

    /// Encode one node
    ///
    /// # Arguments
    /// * `node` - Node to encode
    /// * `key` - Tag to use when the node carries none
    ///
    /// # Returns
    /// `tag ++ length ++ value`, or an empty string when the node has no
    /// usable tag, when its value does not match the tag's
    /// primitive/constructed encoding, or when the value is too long for a
    /// length field.
    pub fn encode_node(&self, node: &Node, key: Option<&str>) -> String {
        let Some(tag) = node.tag.as_deref().or(key) else {
            debug!("skipping node without tag");
            return String::new();
        };

        if !TAG_HEX_LENGTHS.contains(&tag.len()) {
            debug!("skipping node with {}-character tag", tag.len());
            return String::new();
        }

        let Some(first) = tag.get(..2).and_then(hex_text::parse_byte) else {
            debug!("skipping node with non-hexadecimal tag");
            return String::new();
        };

        let value = match (tag::is_constructed(first), &node.value) {
            (true, Value::Constructed(tree)) => self.encode_tree(tree),
            (false, Value::Primitive(raw)) => raw.clone(),
            _ => {
                debug!("skipping node {}: value does not match tag encoding", tag);
                return String::new();
            }
        };

        let Some(length) = encode_length((value.len() / 2) as u64) else {
            debug!("skipping node {}: value exceeds maximum length", tag);
            return String::new();
        };

        format!("{}{}{}", tag, length, value)
    }
}

/// Encode a value length as an uppercase hex length field
///
/// Uses the short form below 128 and otherwise the shortest long form:
/// `81 xx`, `82 xx xx`, `83 xx xx xx` or `84 xx xx xx xx`.
///
/// # Returns
/// `None` if `length` exceeds `FFFFFFFF`.
pub fn encode_length(length: u64) -> Option<String> {
    if length > MAX_VALUE_LENGTH {
        return None;
    }

    if length < 0x80 {
        return Some(format!("{:02X}", length));
    }

    let be = (length as u32).to_be_bytes();
    let significant: Vec<u8> = be.iter().copied().skip_while(|&byte| byte == 0).collect();

    let mut out = format!("{:02X}", 0x80 | significant.len());
    out.push_str(&hex_text::encode_upper(&significant));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::types::TreeExt;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::json;

    const PRIMITIVE_TAGS: [&str; 9] = ["5A", "50", "57", "84", "87", "9F02", "9F1A", "5F2A", "DF8101"];
    const CONSTRUCTED_TAGS: [&str; 5] = ["6F", "70", "A5", "BF0C", "77"];

    fn random_tree(rng: &mut StdRng, depth: usize) -> Tree {
        let mut tree = Tree::new();
        for _ in 0..rng.gen_range(1..=4) {
            if depth < 3 && rng.gen_bool(0.3) {
                let tag = CONSTRUCTED_TAGS[rng.gen_range(0..CONSTRUCTED_TAGS.len())];
                tree.push(Node::constructed(tag, random_tree(rng, depth + 1)));
            } else {
                let tag = PRIMITIVE_TAGS[rng.gen_range(0..PRIMITIVE_TAGS.len())];
                let size = if rng.gen_bool(0.1) {
                    rng.gen_range(128..400)
                } else {
                    rng.gen_range(1..16)
                };
                let bytes: Vec<u8> = (0..size).map(|_| rng.r#gen()).collect();
                tree.push(Node::primitive(tag, hex_text::encode_lower(&bytes)));
            }
        }
        tree
    }

    fn encode(structure: impl Into<Structure>) -> String {
        Encoder::new().serialize(&structure.into())
    }

    #[test]
    fn test_encode_length_minimal() {
        assert_eq!(encode_length(0).as_deref(), Some("00"));
        assert_eq!(encode_length(127).as_deref(), Some("7F"));
        assert_eq!(encode_length(128).as_deref(), Some("8180"));
        assert_eq!(encode_length(255).as_deref(), Some("81FF"));
        assert_eq!(encode_length(256).as_deref(), Some("820100"));
        assert_eq!(encode_length(65_535).as_deref(), Some("82FFFF"));
        assert_eq!(encode_length(65_536).as_deref(), Some("83010000"));
        assert_eq!(encode_length(16_777_216).as_deref(), Some("8401000000"));
        assert_eq!(encode_length(0xFFFF_FFFF).as_deref(), Some("84FFFFFFFF"));
    }

    #[test]
    fn test_encode_length_oversized() {
        assert_eq!(encode_length(0x1_0000_0000), None);
        assert_eq!(encode_length(u64::MAX), None);
    }

    #[test]
    fn test_encode_primitive_node() {
        assert_eq!(encode(Node::primitive("5F2A", "01ff")), "5F2A0201ff");
    }

    #[test]
    fn test_encode_long_primitive_node() {
        let value = "ab".repeat(128);
        assert_eq!(
            encode(Node::primitive("9F4B", value.clone())),
            format!("9F4B8180{}", value)
        );
    }

    #[test]
    fn test_encode_constructed_node() {
        let mut inner = Tree::new();
        inner.push(Node::primitive("5A", "FF"));
        assert_eq!(encode(Node::constructed("6F", inner)), "6F025A01FF");
    }

    #[test]
    fn test_encode_tree_in_order() {
        let mut tree = Tree::new();
        tree.push(Node::primitive("9F1A", "0840"));
        tree.push(Node::primitive("5A", "11"));
        assert_eq!(encode(tree), "9F1A0208405A0111");
    }

    #[test]
    fn test_encode_tag_case_is_preserved() {
        assert_eq!(encode(Node::primitive("9f1a", "0840")), "9f1a020840");
    }

    #[test]
    fn test_encode_uses_key_when_tag_missing() {
        let mut node = Node::primitive("5A", "ff");
        node.tag = None;

        let mut tree = Tree::new();
        tree.insert("5A".to_string(), node.clone());
        assert_eq!(encode(tree), "5A01ff");

        // A lone node without a tag has nothing to fall back on
        assert_eq!(encode(node), "");
    }

    #[test]
    fn test_encode_node_tag_wins_over_key() {
        let mut tree = Tree::new();
        tree.insert("50".to_string(), Node::primitive("5A", "ff"));
        assert_eq!(encode(tree), "5A01ff");
    }

    #[test]
    fn test_encode_skips_bad_tags() {
        let mut tree = Tree::new();
        tree.insert("5".to_string(), Node::primitive("5", "01"));
        tree.insert("9F1A2".to_string(), Node::primitive("9F1A2", "01"));
        tree.insert("9F1A2B3C".to_string(), Node::primitive("9F1A2B3C", "01"));
        tree.insert("ZZ".to_string(), Node::primitive("ZZ", "01"));
        tree.push(Node::primitive("5A", "02"));
        assert_eq!(encode(tree), "5A0102");
    }

    #[test]
    fn test_encode_skips_mismatched_values() {
        let mut tree = Tree::new();
        tree.push(Node::primitive("6F", "5A01FF"));
        tree.push(Node::constructed("5A", Tree::new()));
        tree.push(Node::primitive("50", "56495341"));
        assert_eq!(encode(tree), "500456495341");
    }

    #[test]
    fn test_encode_ignores_declared_length() {
        let mut node = Node::primitive("5A", "ffff");
        node.length = 99;
        assert_eq!(encode(node), "5A02ffff");
    }

    #[test]
    fn test_encode_empty_tree() {
        assert_eq!(encode(Tree::new()), "");
        assert_eq!(encode(Node::constructed("70", Tree::new())), "7000");
    }

    #[test]
    fn test_serialize_json() {
        let encoder = Encoder::new();
        let json = json!({
            "9F02": { "value": "000000001000" },
            "70": { "value": { "5A": { "value": "4111111111111111" } } },
            "57": "not a node"
        });
        assert_eq!(
            encoder.serialize_json(&json).unwrap(),
            "9F0206000000001000700A5A084111111111111111"
        );

        let json = json!({ "tag": "5A", "value": "ff" });
        assert_eq!(encoder.serialize_json(&json).unwrap(), "5A01ff");
    }

    #[test]
    fn test_serialize_json_rejects_non_structures() {
        let encoder = Encoder::new();
        assert!(encoder.serialize_json(&json!("5A01FF")).is_err());
        assert!(encoder.serialize_json(&json!([{ "tag": "5A", "value": "ff" }])).is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut proprietary = Tree::new();
        proprietary.push(Node::primitive("50", "56495341"));
        proprietary.push(Node::primitive("87", "01"));
        proprietary.push(Node::primitive("9F38", "9f66049f02069f37045f2a02"));

        let mut fci = Tree::new();
        fci.push(Node::primitive("84", "a0000000031010"));
        fci.push(Node::constructed("A5", proprietary));

        let mut tree = Tree::new();
        tree.push(Node::constructed("6F", fci));
        tree.push(Node::primitive("9F4B", "cd".repeat(300)));
        tree.push(Node::primitive("DF8101", "00"));

        let hex = encode(tree.clone());
        let decoded = Decoder::new().unserialize(&hex).unwrap();
        assert_eq!(decoded, tree);
        assert_eq!(decoded.find("87").map(|n| n.name.as_str()), Some("Application Priority Indicator"));
    }

    #[test]
    fn test_round_trip_random_trees() {
        let mut rng = StdRng::seed_from_u64(0x9F26);
        let decoder = Decoder::new();

        for _ in 0..200 {
            let tree = random_tree(&mut rng, 0);
            let hex = encode(tree.clone());
            assert_eq!(decoder.unserialize(&hex).unwrap(), tree);
        }
    }
}
