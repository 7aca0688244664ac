//! EMV - Rust implementation of EMV BER-TLV processing
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `emv-core`: Error type, codec limits and the EMV tag dictionary
//! - `emv-tlv`: Tag/length inspection, decoder, encoder and codec façade
//! - `emv-tlv-tool`: Command-line decoder/encoder (`emv-tlv` binary)
//!
//! # Usage
//!
//! ```
//! use emv::tlv::{Codec, Structure};
//!
//! let codec = Codec::new();
//! let tree = codec.unserialize("5F2A0201FF").unwrap();
//! assert_eq!(tree["5F2A"].name, "Transaction Currency Code");
//! assert_eq!(codec.serialize(&Structure::Tree(tree)), "5F2A0201ff");
//! ```

// Re-export core types
pub use emv_core::{TlvError, TlvResult, constants, tag_name};

// Re-export the TLV codec
pub mod tlv {
    pub use emv_tlv::*;
}

pub use emv_tlv::{Codec, Node, Structure, Tree, Value};
