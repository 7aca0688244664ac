//! EMV BER-TLV decoder
//!
//! Turns a hex payload into a [`Tree`]. Only a malformed hex payload is
//! reported as an error. Anything wrong inside the TLV structure is absorbed
//! so that no diagnostic ever has to quote cardholder data:
//!
//! - an invalid first tag byte is skipped and decoding resumes on the next byte
//! - an invalid length byte ends decoding of the current level
//! - running out of bytes inside a tag or length field ends decoding of the
//!   current level
//! - a constructed element nested deeper than
//!   [`MAX_NESTING_DEPTH`](emv_core::constants::MAX_NESTING_DEPTH) ends
//!   decoding of the current level
//! - a value shorter than its declared length keeps the bytes that are present
//!
//! # Usage Example
//!
//! ```rust
//! use emv_tlv::Decoder;
//!
//! let tree = Decoder::new().unserialize("5F2A0201FF").unwrap();
//! assert_eq!(tree["5F2A"].length, 2);
//! ```

use emv_core::TlvResult;
use emv_core::constants::{MAX_NESTING_DEPTH, MAX_TAG_BYTES};
use log::{debug, trace};

use crate::hex_text;
use crate::inspector::{length, tag};
use crate::types::{Node, Tree, Value};

/// Outcome of decoding one element
enum Step {
    /// A complete element
    Element(String, Node),
    /// The byte at the cursor was not a valid tag start and has been skipped
    Skip,
    /// Nothing more can be decoded at this level
    Stop,
}

/// Cursor over the bytes of one tree level
///
/// The position may move past the end of the buffer when a declared length
/// exceeds what is left; every read past the end yields `None`.
struct Cursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.buffer.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    /// Take up to `count` bytes and move the position by exactly `count`
    fn take(&mut self, count: usize) -> &'a [u8] {
        let start = self.position.min(self.buffer.len());
        let end = self.position.saturating_add(count).min(self.buffer.len());
        self.position = self.position.saturating_add(count);
        &self.buffer[start..end]
    }
}

/// EMV BER-TLV decoder
///
/// Stateless; one instance can be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Decoder;

impl Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode a hex-encoded TLV payload
    ///
    /// # Arguments
    /// * `payload` - Hex digits, either case, even length
    ///
    /// # Returns
    /// The decoded tree, possibly empty or partial when the payload is not
    /// well-formed TLV.
    ///
    /// # Error Handling
    /// Returns `MalformedPayload` if the payload is not valid hex.
    pub fn unserialize(&self, payload: &str) -> TlvResult<Tree> {
        let bytes = hex_text::decode(payload)?;
        Ok(self.decode_tlv(&bytes))
    }

    /// Decode a sequence of TLV elements from raw bytes
    ///
    /// Elements repeating a tag already seen at this level replace the
    /// earlier element.
    pub fn decode_tlv(&self, bytes: &[u8]) -> Tree {
        self.decode_level(bytes, 0)
    }

    fn decode_level(&self, bytes: &[u8], depth: usize) -> Tree {
        let mut tree = Tree::new();
        let mut cursor = Cursor::new(bytes);

        while cursor.has_remaining() {
            match self.decode_element(&mut cursor, depth) {
                Step::Element(tag, node) => {
                    if tree.insert(tag, node).is_some() {
                        trace!("duplicate tag replaced earlier element");
                    }
                }
                Step::Skip => continue,
                Step::Stop => break,
            }
        }

        tree
    }

    fn decode_element(&self, cursor: &mut Cursor<'_>, depth: usize) -> Step {
        let offset = cursor.position;

        // Tag
        let Some(first) = cursor.read_byte() else {
            return Step::Stop;
        };

        if !tag::is_valid(first, 1) {
            trace!("skipping invalid tag byte at offset {}", offset);
            return Step::Skip;
        }

        let mut tag_bytes = Vec::with_capacity(MAX_TAG_BYTES);
        tag_bytes.push(first);
        if tag::is_multi_byte(first) {
            let Some(second) = cursor.read_byte() else {
                return self.truncated(offset, "tag");
            };
            tag_bytes.push(second);

            if !tag::is_last(second) {
                let Some(third) = cursor.read_byte() else {
                    return self.truncated(offset, "tag");
                };
                tag_bytes.push(third);
            }
        }

        let constructed = tag::is_constructed(first);
        if constructed && depth >= MAX_NESTING_DEPTH {
            debug!("nesting limit reached at offset {}, stopping", offset);
            return Step::Stop;
        }

        let tag = hex_text::encode_upper(&tag_bytes);

        // Length
        let Some(length_byte) = cursor.read_byte() else {
            return self.truncated(offset, "length");
        };

        if !length::is_valid(length_byte) {
            debug!("invalid length byte at offset {}, stopping", cursor.position - 1);
            return Step::Stop;
        }

        let mut value_length = length::length(length_byte) as usize;
        if length::is_multi_byte(length_byte) {
            let count = value_length;
            value_length = 0;
            for _ in 0..count {
                let Some(byte) = cursor.read_byte() else {
                    return self.truncated(offset, "length");
                };
                value_length = value_length << 8 | byte as usize;
            }
        }

        // Value
        if !cursor.has_remaining() {
            return self.truncated(offset, "value");
        }

        let bytes = cursor.take(value_length);
        if bytes.len() < value_length {
            trace!(
                "element at offset {} declares {} bytes, {} available",
                offset,
                value_length,
                bytes.len()
            );
        }

        let value = if constructed {
            Value::Constructed(self.decode_level(bytes, depth + 1))
        } else {
            Value::Primitive(hex_text::encode_lower(bytes))
        };

        let node = Node {
            name: tag::name(&tag).to_string(),
            tag: Some(tag.clone()),
            length: value_length,
            value,
        };

        Step::Element(tag, node)
    }

    fn truncated(&self, offset: usize, field: &str) -> Step {
        trace!("input exhausted in {} field of element at offset {}", field, offset);
        Step::Stop
    }
}
