//! Error types for the core state crate.

use thiserror::Error;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core state crate.
///
/// Reads never fail: absent flags, items and records resolve to typed
/// defaults. Only (de)serialization of snapshots and content can error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A snapshot or content document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A mode name could not be parsed.
    #[error("unknown mode: \"{0}\"")]
    UnknownMode(String),
}
