//! EMV BER-TLV codec limits
//!
//! These limits follow ISO/IEC 7816-4:2013 section 5.2 and EMV Book 3
//! Annex B, restricted to the subset this codec handles.

/// Maximum number of bytes in a tag field
pub const MAX_TAG_BYTES: usize = 3;

/// Maximum number of subsequent bytes in a long-form length field
///
/// ISO/IEC 7816 supports length fields of up to five bytes: the marker byte
/// plus four length bytes.
pub const MAX_LENGTH_BYTES: usize = 4;

/// Largest value length representable in a length field (`FFFFFFFF`)
pub const MAX_VALUE_LENGTH: u64 = 0xFFFF_FFFF;

/// Tag lengths, in hex characters, accepted by the encoder
pub const TAG_HEX_LENGTHS: [usize; 3] = [2, 4, 6];

/// Maximum number of constructed elements nested inside one another
///
/// A constructed element found deeper than this ends decoding of its level,
/// the same way an invalid length byte does.
pub const MAX_NESTING_DEPTH: usize = 32;
