use thiserror::Error;

/// Error type surfaced by the EMV TLV codec
///
/// Only caller mistakes are reported. Anomalies found while walking a payload
/// (bad tag bytes, truncated values, oversized lengths) are absorbed by the
/// codec and never turned into errors, so no variant carries payload bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TlvError {
    /// Decoder input is not hexadecimal or has an odd number of digits
    #[error("Malformed payload: {0}")]
    MalformedPayload(&'static str),

    /// Encoder input is neither a tree nor a single node
    #[error("Malformed structure: {0}")]
    MalformedStructure(&'static str),
}

/// Result type alias for EMV TLV operations
pub type TlvResult<T> = Result<T, TlvError>;
