//! Error types for the rule engine.

use thiserror::Error;

/// Result type for rule operations.
pub type RuleResult<T> = Result<T, RuleError>;

/// Errors raised while loading rule content.
///
/// Evaluation itself never fails; these only surface at load time.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Definition JSON could not be parsed.
    #[error("invalid definition content: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two definitions share an id.
    #[error("duplicate interactable definition: {0}")]
    DuplicateDefinition(String),

    /// A definition has no id.
    #[error("interactable definition without an id")]
    MissingId,

    /// An instance references a definition that does not exist.
    #[error("unknown interactable definition: {0}")]
    UnknownDefinition(String),
}
