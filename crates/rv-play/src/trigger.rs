//! Dialogues started by flag changes.

use rv_core::{FlagValue, GameEvent};
use serde::{Deserialize, Serialize};

fn default_equals() -> FlagValue {
    FlagValue::Bool(true)
}

fn default_true() -> bool {
    true
}

/// Starts a dialogue when a flag is set to a given value.
///
/// ```json
/// {"flag": "bell_rung", "equals": {"bool": true}, "dialogue_id": "priest", "once": true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagTrigger {
    /// Flag to watch.
    pub flag: String,
    /// Value that fires the trigger.
    #[serde(default = "default_equals")]
    pub equals: FlagValue,
    /// Dialogue to start.
    pub dialogue_id: String,
    /// Fire at most once per game.
    #[serde(default = "default_true")]
    pub once: bool,
}

impl FlagTrigger {
    /// Fire `dialogue_id` once when `flag` becomes `true`.
    pub fn new(flag: impl Into<String>, dialogue_id: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            equals: default_equals(),
            dialogue_id: dialogue_id.into(),
            once: true,
        }
    }

    /// Fire on a different value.
    pub fn when_equals(mut self, value: impl Into<FlagValue>) -> Self {
        self.equals = value.into();
        self
    }

    /// Fire every time the flag is written with the value.
    pub fn repeating(mut self) -> Self {
        self.once = false;
        self
    }

    /// Stable key used to remember that a one-time trigger fired.
    pub fn key(&self) -> String {
        format!("{}={}->{}", self.flag, self.equals, self.dialogue_id)
    }

    /// Whether `event` fires this trigger.
    pub fn matches(&self, event: &GameEvent) -> bool {
        matches!(
            event,
            GameEvent::FlagChanged { key, value } if *key == self.flag && *value == self.equals
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(key: &str, value: FlagValue) -> GameEvent {
        GameEvent::FlagChanged {
            key: key.into(),
            value,
        }
    }

    #[test]
    fn matches_flag_and_value() {
        let trigger = FlagTrigger::new("bell_rung", "priest");
        assert!(trigger.matches(&changed("bell_rung", FlagValue::Bool(true))));
        assert!(!trigger.matches(&changed("bell_rung", FlagValue::Bool(false))));
        assert!(!trigger.matches(&changed("other", FlagValue::Bool(true))));
        assert!(!trigger.matches(&GameEvent::InteractableConsumed { id: "bell_rung".into() }));
    }

    #[test]
    fn int_values() {
        let trigger = FlagTrigger::new("bells", "priest").when_equals(3i64);
        assert!(trigger.matches(&changed("bells", FlagValue::Int(3))));
        assert!(!trigger.matches(&changed("bells", FlagValue::Int(2))));
    }

    #[test]
    fn parse_with_defaults() {
        let trigger: FlagTrigger =
            serde_json::from_str(r#"{"flag": "lit", "dialogue_id": "lamp"}"#).unwrap();
        assert_eq!(trigger, FlagTrigger::new("lit", "lamp"));
        assert!(trigger.once);
    }
}
