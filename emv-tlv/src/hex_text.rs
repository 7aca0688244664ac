//! Hex text helpers
//!
//! Thin wrappers over the `hex` crate that map its errors onto
//! [`TlvError::MalformedPayload`] without quoting the payload.

use emv_core::{TlvError, TlvResult};
use hex::FromHexError;

/// Convert a hex payload into bytes
///
/// Upper and lower case digits are both accepted.
///
/// # Error Handling
/// Returns `MalformedPayload` if the payload has an odd number of digits or
/// contains anything other than `[0-9a-fA-F]`. The offending text is not
/// included in the error.
pub fn decode(payload: &str) -> TlvResult<Vec<u8>> {
    hex::decode(payload).map_err(|err| match err {
        FromHexError::OddLength => TlvError::MalformedPayload("odd number of hex digits"),
        _ => TlvError::MalformedPayload("non-hexadecimal character"),
    })
}

/// Render bytes as lowercase hex
pub fn encode_lower(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Render bytes as uppercase hex
pub fn encode_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Parse exactly two hex digits into a byte
pub fn parse_byte(digits: &str) -> Option<u8> {
    if digits.len() != 2 {
        return None;
    }
    let mut byte = [0u8; 1];
    hex::decode_to_slice(digits, &mut byte).ok()?;
    Some(byte[0])
}
