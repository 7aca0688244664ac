//! Codec façade over [`Decoder`] and [`Encoder`]

use emv_core::TlvResult;
use once_cell::sync::OnceCell;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::types::{Structure, Tree};

/// Unserializes EMV TLV payloads into trees and serializes them back
///
/// The decoder and encoder are created on first use.
#[derive(Debug, Default)]
pub struct Codec {
    decoder: OnceCell<Decoder>,
    encoder: OnceCell<Encoder>,
}

impl Codec {
    /// Create a codec; nothing is built until first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a tree or a single node into an EMV TLV payload
    pub fn serialize(&self, structure: &Structure) -> String {
        self.encoder.get_or_init(Encoder::new).serialize(structure)
    }

    /// Serialize a tree or node given as JSON into an EMV TLV payload
    ///
    /// # Error Handling
    /// Returns `MalformedStructure` if `json` is not an object.
    pub fn serialize_json(&self, json: &serde_json::Value) -> TlvResult<String> {
        self.encoder.get_or_init(Encoder::new).serialize_json(json)
    }

    /// Unserialize an EMV TLV payload into a tree
    ///
    /// # Error Handling
    /// Returns `MalformedPayload` if the payload is not valid hex.
    pub fn unserialize(&self, payload: &str) -> TlvResult<Tree> {
        self.decoder.get_or_init(Decoder::new).unserialize(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emv_core::TlvError;
    use serde_json::json;

    #[test]
    fn test_codec_is_lazy() {
        let codec = Codec::new();
        assert!(codec.decoder.get().is_none());
        assert!(codec.encoder.get().is_none());

        codec.unserialize("5A01FF").unwrap();
        assert!(codec.decoder.get().is_some());
        assert!(codec.encoder.get().is_none());
    }

    #[test]
    fn test_codec_round_trip() {
        let codec = Codec::new();
        let payload = "6F1A840E315041592E5359532E4444463031A5088801025F2D02656E";
        let tree = codec.unserialize(payload).unwrap();
        // Tags and lengths come back uppercase, values lowercase
        assert_eq!(
            codec.serialize(&Structure::Tree(tree)),
            "6F1A840E315041592e5359532e4444463031A5088801025F2D02656e"
        );
    }

    #[test]
    fn test_codec_errors() {
        let codec = Codec::new();
        assert!(matches!(codec.unserialize("XYZ"), Err(TlvError::MalformedPayload(_))));
        assert!(matches!(
            codec.serialize_json(&json!(null)),
            Err(TlvError::MalformedStructure(_))
        ));
    }

    #[test]
    fn test_codec_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Codec>();
    }
}
