//! Tag byte inspection

use emv_core::tag_name;

use crate::types::TagClass;

const CONSTRUCTED_BIT: u8 = 0x20;
const TAG_NUMBER_MASK: u8 = 0x1F;
const CONTINUATION_BIT: u8 = 0x80;

/// Get the class of a first tag byte
pub fn class(byte: u8) -> TagClass {
    TagClass::from_bits(byte)
}

/// Check whether a first tag byte is in the universal class
pub fn is_universal(byte: u8) -> bool {
    class(byte) == TagClass::Universal
}

/// Check whether a first tag byte is in the application class
pub fn is_application(byte: u8) -> bool {
    class(byte) == TagClass::Application
}

/// Check whether a first tag byte is in the context-specific class
pub fn is_context_specific(byte: u8) -> bool {
    class(byte) == TagClass::ContextSpecific
}

/// Check whether a first tag byte is in the private class
pub fn is_private(byte: u8) -> bool {
    class(byte) == TagClass::Private
}

/// Check whether a first tag byte marks a constructed data object
pub fn is_constructed(byte: u8) -> bool {
    byte & CONSTRUCTED_BIT == CONSTRUCTED_BIT
}

/// Check whether a first tag byte marks a primitive data object
pub fn is_primitive(byte: u8) -> bool {
    byte & CONSTRUCTED_BIT == 0
}

/// Check whether a first tag byte announces subsequent tag bytes
pub fn is_multi_byte(byte: u8) -> bool {
    byte & TAG_NUMBER_MASK == TAG_NUMBER_MASK
}

/// Check whether a continuation byte is the last byte of the tag
pub fn is_last(byte: u8) -> bool {
    byte & CONTINUATION_BIT == 0
}

/// Extract the tag number bits
///
/// # Arguments
/// * `byte` - Tag byte
/// * `continuation` - `true` for a subsequent tag byte (7 number bits),
///   `false` for the first tag byte (5 number bits)
pub fn number(byte: u8, continuation: bool) -> u8 {
    if continuation {
        byte & !CONTINUATION_BIT
    } else {
        byte & TAG_NUMBER_MASK
    }
}

/// Check whether a byte is acceptable at the given tag position
///
/// # Arguments
/// * `byte` - Tag byte
/// * `position` - 1-based position of the byte within the tag (1, 2 or 3)
///
/// # Rules
/// - `00` is invalid as a first or second byte
/// - `1E` and `80` are invalid as a second byte
/// - the third byte is unrestricted
pub fn is_valid(byte: u8, position: usize) -> bool {
    if position <= 2 && byte == 0x00 {
        return false;
    }

    if position == 2 && (byte == 0x1E || byte == 0x80) {
        return false;
    }

    true
}

/// Look up the display name of a canonical tag string
pub fn name(tag: &str) -> &'static str {
    tag_name(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class() {
        assert!(is_universal(0x04));
        assert!(is_application(0x5F));
        assert!(is_context_specific(0x9F));
        assert!(is_private(0xDF));
        assert!(!is_private(0x9F));
    }

    #[test]
    fn test_encoding() {
        assert!(is_constructed(0x6F));
        assert!(is_constructed(0x70));
        assert!(is_constructed(0xBF));
        assert!(is_primitive(0x5A));
        assert!(is_primitive(0x9F));
        assert!(!is_primitive(0xA5));
    }

    #[test]
    fn test_multi_byte_and_last() {
        assert!(is_multi_byte(0x5F));
        assert!(is_multi_byte(0x9F));
        assert!(is_multi_byte(0xDF));
        assert!(!is_multi_byte(0x5A));

        assert!(is_last(0x2A));
        assert!(is_last(0x7F));
        assert!(!is_last(0x81));
    }

    #[test]
    fn test_number() {
        assert_eq!(number(0x5A, false), 0x1A);
        assert_eq!(number(0x9F, false), 0x1F);
        assert_eq!(number(0x81, true), 0x01);
        assert_eq!(number(0x26, true), 0x26);
    }

    #[test]
    fn test_is_valid() {
        assert!(!is_valid(0x00, 1));
        assert!(!is_valid(0x00, 2));
        assert!(is_valid(0x00, 3));

        assert!(!is_valid(0x1E, 2));
        assert!(!is_valid(0x80, 2));
        assert!(is_valid(0x1E, 1));
        assert!(is_valid(0x80, 1));
        assert!(is_valid(0x80, 3));

        assert!(is_valid(0x5A, 1));
        assert!(is_valid(0x2A, 2));
    }

    #[test]
    fn test_name() {
        assert_eq!(name("9F02"), "Amount, Authorised (Numeric)");
        assert_eq!(name("9F7F"), "");
    }
}
