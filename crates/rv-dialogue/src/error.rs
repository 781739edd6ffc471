//! Error types for dialogue content.

use thiserror::Error;

/// Result type for dialogue content operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors raised while loading dialogue content.
///
/// The engine never propagates these to its caller: a failed load is logged
/// and the session simply does not start.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// No dialogue with this id exists in the source.
    #[error("dialogue not found: {0}")]
    NotFound(String),

    /// The dialogue has no nodes.
    #[error("dialogue '{0}' has no nodes")]
    Empty(String),

    /// A `nextNodeId` points at a node that does not exist.
    #[error("dialogue '{dialogue}' references unknown node '{node}'")]
    UnknownNode {
        /// Dialogue id.
        dialogue: String,
        /// The missing node id.
        node: String,
    },

    /// Dialogue JSON could not be parsed.
    #[error("invalid dialogue '{id}': {source}")]
    Parse {
        /// Dialogue id.
        id: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Dialogue file could not be read.
    #[error("failed to read dialogue '{id}': {source}")]
    Io {
        /// Dialogue id.
        id: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
