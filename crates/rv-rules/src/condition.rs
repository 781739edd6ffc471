//! Condition evaluation for interaction and visibility rules.

use std::fmt;

use rv_core::StateStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Target string that refers to the interactable evaluating the rule.
pub const SELF_TARGET: &str = "self";

/// Resolve a rule target: `"self"` (any case) or empty means `self_id`.
pub fn resolve_target<'a>(target: &'a str, self_id: &'a str) -> &'a str {
    let trimmed = target.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SELF_TARGET) {
        self_id
    } else {
        trimmed
    }
}

pub(crate) fn self_target() -> String {
    SELF_TARGET.to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_count() -> u32 {
    1
}

/// Integer comparison operator, shared by flag and state comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// `lhs == rhs`
    #[default]
    #[serde(alias = "==", alias = "eq")]
    Equal,
    /// `lhs != rhs`
    #[serde(alias = "!=", alias = "ne")]
    NotEqual,
    /// `lhs < rhs`
    #[serde(alias = "<", alias = "lt")]
    Less,
    /// `lhs <= rhs`
    #[serde(alias = "<=", alias = "le")]
    LessOrEqual,
    /// `lhs > rhs`
    #[serde(alias = ">", alias = "gt")]
    Greater,
    /// `lhs >= rhs`
    #[serde(alias = ">=", alias = "ge")]
    GreaterOrEqual,
}

impl CompareOp {
    /// Apply the operator.
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::NotEqual => lhs != rhs,
            Self::Less => lhs < rhs,
            Self::LessOrEqual => lhs <= rhs,
            Self::Greater => lhs > rhs,
            Self::GreaterOrEqual => lhs >= rhs,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        };
        f.write_str(symbol)
    }
}

/// A read-only test against the state store.
///
/// Conditions are immutable descriptors evaluated against the store at call
/// time. Absent data reads as its neutral default and malformed conditions
/// evaluate to `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// A boolean flag equals `expected` (absent reads as `false`).
    FlagBool {
        /// Flag key.
        key: String,
        /// Expected value.
        #[serde(default = "default_true")]
        expected: bool,
    },
    /// An integer flag compared with `value` (absent reads as 0).
    FlagIntCompare {
        /// Flag key.
        key: String,
        /// Comparison operator.
        #[serde(default)]
        op: CompareOp,
        /// Right-hand side.
        value: i64,
    },
    /// The player carries at least `min_count` of an item.
    HasInventoryItem {
        /// Item id.
        item_id: String,
        /// Minimum count (at least 1).
        #[serde(default = "default_min_count")]
        min_count: u32,
    },
    /// An interactable's state compared with `value` (absent reads as 0).
    InteractableStateCompare {
        /// Interactable id, or `"self"`.
        #[serde(default = "self_target")]
        target: String,
        /// Comparison operator.
        #[serde(default)]
        op: CompareOp,
        /// Right-hand side.
        value: i64,
    },
    /// A mask is equipped.
    ///
    /// Mask equipment is not tracked yet, so this always holds.
    EquippedMask {
        /// Mask id.
        mask_id: String,
    },
    /// A condition type this build does not know. Always false.
    #[serde(other)]
    Unknown,
}

impl Condition {
    /// Evaluate against the store, with `self_id` substituted for `"self"`.
    pub fn evaluate(&self, state: &StateStore, self_id: &str) -> bool {
        match self {
            Condition::FlagBool { key, expected } => {
                if key.is_empty() {
                    warn!("flag_bool condition without a key");
                    return false;
                }
                state.flag_bool(key, false) == *expected
            }
            Condition::FlagIntCompare { key, op, value } => {
                if key.is_empty() {
                    warn!("flag_int_compare condition without a key");
                    return false;
                }
                op.apply(state.flag_int(key, 0), *value)
            }
            Condition::HasInventoryItem { item_id, min_count } => {
                if item_id.is_empty() {
                    warn!("has_inventory_item condition without an item");
                    return false;
                }
                state.item_count(item_id) >= (*min_count).max(1)
            }
            Condition::InteractableStateCompare { target, op, value } => {
                let id = resolve_target(target, self_id);
                if id.is_empty() {
                    warn!("interactable_state_compare could not resolve a target");
                    return false;
                }
                op.apply(state.state(id, 0), *value)
            }
            Condition::EquippedMask { mask_id } => {
                debug!(%mask_id, "equipped_mask is not tracked; treating as held");
                true
            }
            Condition::Unknown => {
                warn!("unknown condition type evaluates to false");
                false
            }
        }
    }
}

/// Whether every condition holds. An empty list always holds.
pub fn all_hold(conditions: &[Condition], state: &StateStore, self_id: &str) -> bool {
    conditions.iter().all(|c| c.evaluate(state, self_id))
}

/// Whether any condition holds. An empty list never holds.
pub fn any_holds(conditions: &[Condition], state: &StateStore, self_id: &str) -> bool {
    conditions.iter().any(|c| c.evaluate(state, self_id))
}
