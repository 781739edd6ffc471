//! Interactable definitions: the read-only rule templates shared by
//! interactable instances.

use std::collections::HashMap;
use std::sync::Arc;

use rv_core::StateStore;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::condition::{Condition, all_hold, any_holds};
use crate::error::{RuleError, RuleResult};

fn default_true() -> bool {
    true
}

/// Which input gestures may trigger an interactable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Only explicit clicks.
    ClickOnly,
    /// Only walking into the object.
    CollisionOnly,
    /// Either gesture.
    #[default]
    Both,
}

impl TriggerMode {
    /// Whether `source` may trigger an interactable in this mode.
    pub fn accepts(self, source: TriggerSource) -> bool {
        matches!(
            (self, source),
            (Self::Both, _)
                | (Self::ClickOnly, TriggerSource::Click)
                | (Self::CollisionOnly, TriggerSource::Collision)
        )
    }
}

/// The gesture that triggered an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// A click or explicit interact key.
    Click,
    /// The player walked into the object.
    Collision,
}

/// Decides whether an interactable is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityRule {
    /// Hide if any of these hold.
    #[serde(default)]
    pub hide_when: Vec<Condition>,
    /// If non-empty, hide unless all of these hold.
    #[serde(default)]
    pub show_when: Vec<Condition>,
}

impl VisibilityRule {
    /// Whether this rule hides the interactable. `hide_when` is checked first.
    pub fn hides(&self, state: &StateStore, self_id: &str) -> bool {
        if any_holds(&self.hide_when, state, self_id) {
            return true;
        }
        !self.show_when.is_empty() && !all_hold(&self.show_when, state, self_id)
    }
}

/// Conditions mapped to actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    /// Conditions that must all hold. Empty matches unconditionally.
    #[serde(default)]
    pub when: Vec<Condition>,
    /// Actions run in order when the rule fires.
    #[serde(default, alias = "do_actions")]
    pub actions: Vec<Action>,
    /// Stop checking later rules after this one fires.
    #[serde(default = "default_true")]
    pub stop_after_match: bool,
}

impl InteractionRule {
    /// A rule with no conditions and the given actions.
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            when: Vec::new(),
            actions,
            stop_after_match: true,
        }
    }

    /// Add a condition.
    pub fn when(mut self, condition: Condition) -> Self {
        self.when.push(condition);
        self
    }

    /// Keep checking later rules after this one fires.
    pub fn fall_through(mut self) -> Self {
        self.stop_after_match = false;
        self
    }
}

/// A rule that fires when an item is used on the interactable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseItemRule {
    /// Required item. `None` accepts any item.
    #[serde(default)]
    pub item_id: Option<String>,
    /// Conditions that must all hold.
    #[serde(default)]
    pub when: Vec<Condition>,
    /// Actions run in order when the rule fires.
    #[serde(default, alias = "do_actions")]
    pub actions: Vec<Action>,
}

impl UseItemRule {
    /// Whether the rule accepts `item_id`.
    pub fn accepts_item(&self, item_id: &str) -> bool {
        self.item_id
            .as_deref()
            .is_none_or(|required| required.is_empty() || required == item_id)
    }
}

/// A reusable interactable template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractableDefinition {
    /// Default id for instances that do not override it.
    #[serde(default)]
    pub id: String,
    /// Which gestures trigger the interactable.
    #[serde(default)]
    pub trigger: TriggerMode,
    /// Consume the instance after any normal rule fires.
    #[serde(default)]
    pub one_shot: bool,
    /// Checked in order; the first rule that hides wins.
    #[serde(default)]
    pub visibility_rules: Vec<VisibilityRule>,
    /// Normal-mode rules, checked in order.
    #[serde(default)]
    pub rules: Vec<InteractionRule>,
    /// Use-item rules, checked in order.
    #[serde(default)]
    pub use_item_rules: Vec<UseItemRule>,
}

impl InteractableDefinition {
    /// An empty definition with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            trigger: TriggerMode::Both,
            one_shot: false,
            visibility_rules: Vec::new(),
            rules: Vec::new(),
            use_item_rules: Vec::new(),
        }
    }

    /// Set the trigger mode.
    pub fn with_trigger(mut self, trigger: TriggerMode) -> Self {
        self.trigger = trigger;
        self
    }

    /// Make the definition one-shot.
    pub fn one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    /// Add a normal rule.
    pub fn with_rule(mut self, rule: InteractionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a use-item rule.
    pub fn with_use_item_rule(mut self, rule: UseItemRule) -> Self {
        self.use_item_rules.push(rule);
        self
    }

    /// Add a visibility rule.
    pub fn with_visibility_rule(mut self, rule: VisibilityRule) -> Self {
        self.visibility_rules.push(rule);
        self
    }

    /// Authoring problems that will make parts of the definition inert.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let label = if self.id.is_empty() { "<unnamed>" } else { self.id.as_str() };

        let conditions = self
            .visibility_rules
            .iter()
            .flat_map(|v| v.hide_when.iter().chain(v.show_when.iter()))
            .chain(self.rules.iter().flat_map(|r| r.when.iter()))
            .chain(self.use_item_rules.iter().flat_map(|r| r.when.iter()));
        for condition in conditions {
            if matches!(condition, Condition::Unknown) {
                issues.push(format!("{label}: unknown condition type"));
            }
        }

        let actions = self
            .rules
            .iter()
            .flat_map(|r| r.actions.iter())
            .chain(self.use_item_rules.iter().flat_map(|r| r.actions.iter()));
        for action in actions {
            if matches!(action, Action::Unknown) {
                issues.push(format!("{label}: unknown action type"));
            }
        }

        for (i, rule) in self.rules.iter().enumerate() {
            if rule.actions.is_empty() {
                issues.push(format!("{label}: rule {i} has no actions"));
            }
        }
        issues
    }
}

/// Definitions keyed by id, shared between instances via [`Arc`].
#[derive(Debug, Clone, Default)]
pub struct DefinitionLibrary {
    definitions: HashMap<String, Arc<InteractableDefinition>>,
}

impl DefinitionLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of definitions.
    pub fn from_json(json: &str) -> RuleResult<Self> {
        let definitions: Vec<InteractableDefinition> = serde_json::from_str(json)?;
        let mut library = Self::new();
        for definition in definitions {
            library.insert(definition)?;
        }
        Ok(library)
    }

    /// Add a definition. Ids must be unique and non-empty.
    pub fn insert(&mut self, definition: InteractableDefinition) -> RuleResult<Arc<InteractableDefinition>> {
        if definition.id.is_empty() {
            return Err(RuleError::MissingId);
        }
        if self.definitions.contains_key(&definition.id) {
            return Err(RuleError::DuplicateDefinition(definition.id));
        }
        let shared = Arc::new(definition);
        self.definitions
            .insert(shared.id.clone(), Arc::clone(&shared));
        Ok(shared)
    }

    /// Look up a definition.
    pub fn get(&self, id: &str) -> Option<Arc<InteractableDefinition>> {
        self.definitions.get(id).cloned()
    }

    /// All definition ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Authoring problems across every definition, sorted by id.
    pub fn issues(&self) -> Vec<String> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.definitions.get(id))
            .flat_map(|d| d.issues())
            .collect()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::CompareOp;
    use rv_core::FlagValue;

    #[test]
    fn trigger_mode_gating() {
        assert!(TriggerMode::Both.accepts(TriggerSource::Collision));
        assert!(TriggerMode::ClickOnly.accepts(TriggerSource::Click));
        assert!(!TriggerMode::ClickOnly.accepts(TriggerSource::Collision));
        assert!(!TriggerMode::CollisionOnly.accepts(TriggerSource::Click));
    }

    #[test]
    fn hide_when_checked_before_show_when() {
        let mut state = StateStore::new();
        state.set_flag("lit", FlagValue::Bool(true));
        let rule = VisibilityRule {
            hide_when: vec![Condition::FlagBool {
                key: "lit".into(),
                expected: true,
            }],
            show_when: vec![Condition::FlagBool {
                key: "lit".into(),
                expected: true,
            }],
        };
        assert!(rule.hides(&state, "x"));
    }

    #[test]
    fn show_when_requires_all() {
        let mut state = StateStore::new();
        state.set_flag("a", FlagValue::Bool(true));
        let rule = VisibilityRule {
            hide_when: vec![],
            show_when: vec![
                Condition::FlagBool {
                    key: "a".into(),
                    expected: true,
                },
                Condition::FlagIntCompare {
                    key: "b".into(),
                    op: CompareOp::Greater,
                    value: 0,
                },
            ],
        };
        assert!(rule.hides(&state, "x"));
        state.set_flag("b", FlagValue::Int(1));
        assert!(!rule.hides(&state, "x"));
        assert!(!VisibilityRule::default().hides(&state, "x"));
    }

    #[test]
    fn use_item_rule_matching() {
        let any = UseItemRule {
            item_id: None,
            when: vec![],
            actions: vec![],
        };
        let key_only = UseItemRule {
            item_id: Some("key".into()),
            ..any.clone()
        };
        assert!(any.accepts_item("anything"));
        assert!(key_only.accepts_item("key"));
        assert!(!key_only.accepts_item("coin"));
    }

    #[test]
    fn definition_from_json_defaults() {
        let json = r#"[{
            "id": "lamp",
            "one_shot": true,
            "rules": [{"when": [], "do_actions": [{"type": "show_popup", "text": "Click."}]}]
        }]"#;
        let library = DefinitionLibrary::from_json(json).unwrap();
        let lamp = library.get("lamp").unwrap();
        assert_eq!(lamp.trigger, TriggerMode::Both);
        assert!(lamp.one_shot);
        assert!(lamp.rules[0].stop_after_match);
        assert_eq!(lamp.rules[0].actions.len(), 1);
    }

    #[test]
    fn duplicate_and_missing_ids_rejected() {
        let mut library = DefinitionLibrary::new();
        library.insert(InteractableDefinition::new("a")).unwrap();
        assert!(matches!(
            library.insert(InteractableDefinition::new("a")),
            Err(RuleError::DuplicateDefinition(_))
        ));
        assert!(matches!(
            library.insert(InteractableDefinition::new("")),
            Err(RuleError::MissingId)
        ));
    }

    #[test]
    fn issues_report_inert_content() {
        let json = r#"[{
            "id": "statue",
            "rules": [
                {"when": [{"type": "moon_phase"}], "actions": [{"type": "teleport"}]},
                {"when": []}
            ]
        }]"#;
        let library = DefinitionLibrary::from_json(json).unwrap();
        let issues = library.issues();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.contains("rule 1 has no actions")));
    }
}
