//! BER-TLV processing for EMV payloads
//!
//! This crate decodes hex-encoded EMV TLV data blocks (ISO/IEC 7816-4
//! section 5.2, EMV Book 3 Annex B) into ordered trees and encodes such trees
//! back into hex.
//!
//! # Supported subset
//!
//! - Tags of one to three bytes
//! - Definite lengths in short form or in long form with one to four length
//!   bytes
//!
//! # Failure policy
//!
//! EMV payloads may carry cardholder data, so the codec never produces
//! diagnostics that would have to quote them. Only two caller mistakes are
//! reported: a payload that is not valid hex, and encoder input that is not a
//! tree or node. Everything else is decoded or encoded on a best-effort basis.
//!
//! ```rust
//! use emv_tlv::{Codec, Structure};
//!
//! let codec = Codec::new();
//! let tree = codec.unserialize("6F025A01FF").unwrap();
//! let inner = tree["6F"].value.as_constructed().unwrap();
//! assert_eq!(inner["5A"].value.as_primitive(), Some("ff"));
//!
//! assert_eq!(codec.serialize(&Structure::Tree(tree)), "6F025A01ff");
//! ```

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod hex_text;
pub mod inspector;
pub mod types;

pub use codec::Codec;
pub use decoder::Decoder;
pub use encoder::{Encoder, encode_length};
pub use emv_core::{TlvError, TlvResult};
pub use types::{Node, Structure, TagClass, Tree, TreeExt, Value};
