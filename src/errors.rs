// Error type for the whole crate.
//
// Every variant here is a caller-input validity problem: a malformed map
// cannot be partially trusted, so nothing is recovered locally and nothing
// is retried. The merge operation's lookup miss is deliberately NOT an
// error (see `compose::merge`).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of decoding and (re-)serializing a v3 source map.
#[derive(Debug, Error)]
pub enum Error {
    /// A `mappings` byte is not part of the base64 VLQ alphabet.
    #[error("invalid base64 VLQ character {0:?}")]
    InvalidBase64(char),

    /// A VLQ group set its continuation bit but the input ended.
    #[error("truncated VLQ sequence (unterminated continuation)")]
    TruncatedVlq,

    /// A VLQ sequence does not fit the 64-bit accumulator.
    #[error("VLQ value overflow")]
    VlqOverflow,

    /// A segment decoded to an unusable number of fields. Segments carry
    /// 1, 4 or 5 fields; a 1-field segment has no source association to
    /// resolve and is rejected rather than silently fabricated.
    #[error("unsupported segment arity {0} (expected 4 or 5 fields)")]
    UnsupportedSegmentArity(usize),

    /// A segment referenced a source index past the `sources` table.
    #[error("source index {index} out of range ({len} sources)")]
    SourceIndexOutOfRange { index: i64, len: usize },

    /// A segment referenced a name index past the `names` table.
    #[error("name index {index} out of range ({len} names)")]
    NameIndexOutOfRange { index: i64, len: usize },

    /// A delta accumulated to a value no position field can hold
    /// (negative, or past u32).
    #[error("{field} value {value} out of range in mappings")]
    PositionOutOfRange { field: &'static str, value: i64 },

    /// The map declares a version other than 3.
    #[error("unsupported source map version {0}")]
    UnsupportedVersion(u32),

    /// The JSON collaborator rejected the wire text.
    #[error("malformed source map JSON: {0}")]
    Json(#[from] serde_json::Error),
}
