//! Condition/action rule engine for Reverie interactables.
//!
//! Interactables are driven by data: a shared [`InteractableDefinition`]
//! lists ordered rules mapping [`Condition`]s to [`Action`]s, visibility
//! rules, and use-item rules. An [`Interactable`] instance evaluates those
//! rules against a [`rv_core::GameContext`] when the player interacts.
//!
//! Malformed conditions evaluate to false and malformed
//! actions are logged no-ops.

/// Actions executed when a rule fires.
pub mod action;
/// Conditions evaluated against the state store.
pub mod condition;
/// Interactable definitions and the definition library.
pub mod definition;
/// Error types for rule content.
pub mod error;
/// Interactable instances and interaction handling.
pub mod interactable;

pub use action::{Action, execute_all};
pub use condition::{CompareOp, Condition, all_hold, any_holds, resolve_target};
pub use definition::{
    DefinitionLibrary, InteractableDefinition, InteractionRule, TriggerMode, TriggerSource,
    UseItemRule, VisibilityRule,
};
pub use error::{RuleError, RuleResult};
pub use interactable::{IgnoreReason, Interactable, InteractionOutcome};
