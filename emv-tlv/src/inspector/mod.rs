//! Bit-level inspection of tag and length bytes
//!
//! # Tag byte layout
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! - CC = class (00 Universal, 01 Application, 10 Context-specific, 11 Private)
//! - P = primitive (0) or constructed (1)
//! - TTTTT = tag number, or 11111 when the tag continues in following bytes
//!
//! Continuation bytes carry `M T T T T T T T`, where M = 1 means another tag
//! byte follows.
//!
//! # Length byte layout
//!
//! - Short form: `0 L L L L L L L`, a length of 0-127
//! - Long form: `1 N N N N N N N`, followed by N big-endian length bytes

pub mod length;
pub mod tag;
