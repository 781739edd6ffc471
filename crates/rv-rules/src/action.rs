//! Actions executed when a rule fires.

use rv_core::{FlagValue, GameplayEffects};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::condition::{resolve_target, self_target};

/// Item reference that resolves to the item being used.
pub const USED_ITEM: &str = "used_item";

/// A side effect applied through [`GameplayEffects`].
///
/// Actions never evaluate conditions and never report an outcome back to
/// the caller; malformed actions are logged and skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Request a dialogue.
    StartDialogue {
        /// Dialogue id.
        dialogue_id: String,
    },
    /// Write a flag. The value's variant decides bool vs int vs string.
    SetFlag {
        /// Flag key.
        key: String,
        /// New value.
        value: FlagValue,
    },
    /// Give the player one copy of an item.
    AddInventoryItem {
        /// Item id.
        item_id: String,
    },
    /// Take one copy of an item. `"used_item"` refers to the item in use.
    RemoveInventoryItem {
        /// Item id.
        item_id: String,
    },
    /// Set an interactable's state.
    SetInteractableState {
        /// Interactable id, or `"self"`.
        #[serde(default = "self_target")]
        target: String,
        /// New state.
        state: i64,
    },
    /// Permanently consume an interactable.
    ConsumeInteractable {
        /// Interactable id, or `"self"`.
        #[serde(default = "self_target")]
        target: String,
    },
    /// Equip a mask.
    SetEquippedMask {
        /// Mask id.
        mask_id: String,
    },
    /// Request a room change.
    LoadRoom {
        /// Scene id.
        scene_id: String,
        /// Spawn point inside the scene.
        #[serde(default)]
        spawn_point: Option<String>,
    },
    /// Show a popup message.
    ShowPopup {
        /// Popup text.
        text: String,
    },
    /// An action type this build does not know. Does nothing.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Apply the action.
    ///
    /// `self_id` replaces `"self"` targets and `used_item` replaces
    /// `"used_item"` item references.
    pub fn execute<E>(&self, fx: &mut E, self_id: &str, used_item: Option<&str>)
    where
        E: GameplayEffects + ?Sized,
    {
        debug!(action = ?self, %self_id, ?used_item, "execute action");
        match self {
            Action::StartDialogue { dialogue_id } => {
                if dialogue_id.is_empty() {
                    warn!(%self_id, "start_dialogue without a dialogue id");
                    return;
                }
                fx.request_dialogue(dialogue_id);
            }
            Action::SetFlag { key, value } => {
                if key.is_empty() {
                    warn!(%self_id, "set_flag without a key");
                    return;
                }
                fx.set_flag(key, value.clone());
            }
            Action::AddInventoryItem { item_id } => {
                if item_id.is_empty() {
                    warn!(%self_id, "add_inventory_item without an item");
                    return;
                }
                fx.add_item(item_id);
            }
            Action::RemoveInventoryItem { item_id } => {
                let resolved = if item_id == USED_ITEM {
                    used_item.unwrap_or_default()
                } else {
                    item_id.as_str()
                };
                if resolved.is_empty() {
                    warn!(%self_id, "remove_inventory_item could not resolve an item");
                    return;
                }
                fx.remove_item(resolved);
            }
            Action::SetInteractableState { target, state } => {
                let id = resolve_target(target, self_id);
                if id.is_empty() {
                    warn!("set_interactable_state could not resolve a target");
                    return;
                }
                fx.set_interactable_state(id, *state);
            }
            Action::ConsumeInteractable { target } => {
                let id = resolve_target(target, self_id);
                if id.is_empty() {
                    warn!("consume_interactable could not resolve a target");
                    return;
                }
                fx.consume_interactable(id);
            }
            Action::SetEquippedMask { mask_id } => {
                if mask_id.is_empty() {
                    warn!(%self_id, "set_equipped_mask without a mask");
                    return;
                }
                fx.equip_mask(mask_id);
            }
            Action::LoadRoom {
                scene_id,
                spawn_point,
            } => {
                if scene_id.is_empty() {
                    warn!(%self_id, "load_room without a scene");
                    return;
                }
                fx.request_room(scene_id, spawn_point.as_deref());
            }
            Action::ShowPopup { text } => fx.show_popup(text),
            Action::Unknown => warn!(%self_id, "unknown action type skipped"),
        }
    }
}

/// Run actions strictly in list order.
pub fn execute_all<E>(actions: &[Action], fx: &mut E, self_id: &str, used_item: Option<&str>)
where
    E: GameplayEffects + ?Sized,
{
    for action in actions {
        action.execute(fx, self_id, used_item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::{GameContext, GameEvent, ItemCatalog, ItemDefinition};

    fn context() -> GameContext {
        GameContext::new(ItemCatalog::from_items([ItemDefinition::new("coin").stackable()]))
    }

    #[test]
    fn set_flag_keeps_value_type() {
        let mut ctx = context();
        Action::SetFlag {
            key: "count".into(),
            value: FlagValue::Int(1),
        }
        .execute(&mut ctx, "x", None);
        Action::SetFlag {
            key: "seen".into(),
            value: FlagValue::Bool(true),
        }
        .execute(&mut ctx, "x", None);

        assert_eq!(ctx.state().flag("count"), Some(&FlagValue::Int(1)));
        assert!(ctx.state().flag_bool("seen", false));
    }

    #[test]
    fn targets_resolve_self() {
        let mut ctx = context();
        execute_all(
            &[
                Action::SetInteractableState {
                    target: "self".into(),
                    state: 4,
                },
                Action::ConsumeInteractable {
                    target: "door".into(),
                },
            ],
            &mut ctx,
            "lamp",
            None,
        );
        assert_eq!(ctx.state().state("lamp", 0), 4);
        assert!(ctx.state().is_consumed("door"));
        assert!(!ctx.state().is_consumed("lamp"));
    }

    #[test]
    fn actions_run_in_order() {
        let mut ctx = context();
        execute_all(
            &[
                Action::AddInventoryItem {
                    item_id: "coin".into(),
                },
                Action::AddInventoryItem {
                    item_id: "coin".into(),
                },
                Action::RemoveInventoryItem {
                    item_id: "coin".into(),
                },
                Action::ShowPopup {
                    text: "done".into(),
                },
            ],
            &mut ctx,
            "x",
            None,
        );
        let events = ctx.bus_mut().drain();
        let counts: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::InventoryChanged { count, .. } => Some(*count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 1]);
        assert!(matches!(events.last(), Some(GameEvent::PopupRequested { .. })));
    }

    #[test]
    fn remove_used_item_reference() {
        let mut ctx = context();
        ctx.add_item("key");
        Action::RemoveInventoryItem {
            item_id: USED_ITEM.into(),
        }
        .execute(&mut ctx, "door", Some("key"));
        assert!(!ctx.state().has_item("key"));
    }

    #[test]
    fn start_dialogue_and_room_are_requests() {
        let mut ctx = context();
        Action::StartDialogue {
            dialogue_id: "intro".into(),
        }
        .execute(&mut ctx, "x", None);
        Action::LoadRoom {
            scene_id: "cellar".into(),
            spawn_point: None,
        }
        .execute(&mut ctx, "x", None);
        assert_eq!(ctx.pending_dialogue(), Some("intro"));
        assert_eq!(ctx.take_room_request().map(|r| r.scene_id).as_deref(), Some("cellar"));
    }

    #[test]
    fn malformed_actions_are_noops() {
        let mut ctx = context();
        execute_all(
            &[
                Action::StartDialogue {
                    dialogue_id: String::new(),
                },
                Action::SetFlag {
                    key: String::new(),
                    value: FlagValue::Bool(true),
                },
                Action::RemoveInventoryItem {
                    item_id: USED_ITEM.into(),
                },
                Action::Unknown,
            ],
            &mut ctx,
            "x",
            None,
        );
        assert!(ctx.bus().is_empty());
        assert_eq!(ctx.pending_dialogue(), None);
    }

    #[test]
    fn parse_set_flag_from_json() {
        let action: Action = serde_json::from_str(
            r#"{"type": "set_flag", "key": "bells", "value": {"int": 2}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::SetFlag {
                key: "bells".into(),
                value: FlagValue::Int(2),
            }
        );
    }
}
