//! Core types and utilities for EMV BER-TLV processing
//!
//! This crate provides the error type, the codec limits, and the EMV tag
//! dictionary shared by the rest of the workspace.

pub mod constants;
pub mod error;
pub mod tag_names;

pub use error::{TlvError, TlvResult};
pub use tag_names::tag_name;
