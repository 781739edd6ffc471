//! Error types for the runtime layer.

use std::path::PathBuf;

use rv_core::{CoreError, GameMode};
use rv_dialogue::DialogueError;
use rv_rules::RuleError;
use thiserror::Error;

/// Result type for runtime operations.
pub type PlayResult<T> = Result<T, PlayError>;

/// Errors raised while loading content, saving, or routing input.
#[derive(Debug, Error)]
pub enum PlayError {
    /// A core state operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Interactable definitions could not be loaded.
    #[error(transparent)]
    Rules(#[from] RuleError),

    /// Dialogue content could not be loaded.
    #[error(transparent)]
    Dialogue(#[from] DialogueError),

    /// The content directory does not exist.
    #[error("content directory not found: {}", .0.display())]
    MissingContent(PathBuf),

    /// A file could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A content or config file is not valid JSON for its type.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A save could not be serialized or parsed.
    #[error("invalid save data: {0}")]
    Save(#[from] serde_json::Error),

    /// The save was written by a newer format.
    #[error("unsupported save version {found} (this build reads up to {supported})")]
    SaveVersion {
        /// Version in the file.
        found: u32,
        /// Highest version this build understands.
        supported: u32,
    },

    /// No interactable has this name or id.
    #[error("unknown interactable '{name}'{}", did_you_mean(.suggestion))]
    UnknownInteractable {
        /// What was asked for.
        name: String,
        /// The closest known name.
        suggestion: Option<String>,
    },

    /// World interaction is only possible while exploring.
    #[error("cannot interact while in {0} mode")]
    NotExploring(GameMode),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{name}'?)"),
        None => String::new(),
    }
}
