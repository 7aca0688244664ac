//! Length byte inspection

use emv_core::constants::MAX_LENGTH_BYTES;

const LONG_FORM_BIT: u8 = 0x80;
const LENGTH_MASK: u8 = 0x7F;

/// Check whether a byte is an acceptable first length byte
///
/// Valid bytes are the short forms `00`-`7F` and the long forms `81`-`84`.
/// The indefinite form `80` and long forms announcing more than four length
/// bytes are rejected.
pub fn is_valid(byte: u8) -> bool {
    byte != LONG_FORM_BIT && byte <= LONG_FORM_BIT | MAX_LENGTH_BYTES as u8
}

/// Check whether a length byte uses the long form
pub fn is_multi_byte(byte: u8) -> bool {
    byte & LONG_FORM_BIT == LONG_FORM_BIT
}

/// Extract the low seven bits of a length byte
///
/// For a short form byte this is the length itself; for a long form byte it
/// is the number of length bytes that follow.
pub fn length(byte: u8) -> u8 {
    byte & LENGTH_MASK
}
