//! Interactable instances and the interaction rule engine.
//!
//! An [`Interactable`] is one object in a scene. It references a shared
//! [`InteractableDefinition`] and resolves its own id, which keys its
//! persistent record in the state store.

use std::sync::Arc;

use rv_core::{GameContext, GameplayEffects, StateStore};
use tracing::{debug, info};

use crate::action::execute_all;
use crate::condition::all_hold;
use crate::definition::{InteractableDefinition, TriggerSource};

/// Why an interaction did nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The instance is deactivated (consumed).
    Inactive,
    /// The instance is hidden by a visibility rule.
    Hidden,
    /// The trigger mode does not accept this gesture.
    WrongTrigger,
}

/// What happened when the player interacted with an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Nothing was evaluated.
    Ignored(IgnoreReason),
    /// Normal mode: no rule's conditions held.
    NoMatch,
    /// Normal mode: these rules fired, in order.
    Fired {
        /// Indices into the definition's `rules`.
        rules: Vec<usize>,
        /// Whether the instance is consumed afterwards.
        consumed: bool,
    },
    /// Use-item mode: a rule accepted the item.
    ItemUsed {
        /// The item that was used.
        item_id: String,
        /// Index into the definition's `use_item_rules`.
        rule: usize,
        /// Whether one copy of the item was removed.
        item_consumed: bool,
    },
    /// Use-item mode: no rule accepted the item.
    ItemRejected {
        /// The item that was tried.
        item_id: String,
    },
}

/// A live interactable in the current scene.
#[derive(Debug, Clone)]
pub struct Interactable {
    id: String,
    name: String,
    definition: Arc<InteractableDefinition>,
    active: bool,
    visible: bool,
    visual_state: i64,
}

impl Interactable {
    /// Create an instance.
    ///
    /// The effective id is `id_override` if set, else the definition's id,
    /// else `instance_name`.
    pub fn new(
        definition: Arc<InteractableDefinition>,
        id_override: Option<&str>,
        instance_name: &str,
    ) -> Self {
        let id = id_override
            .filter(|id| !id.trim().is_empty())
            .or_else(|| Some(definition.id.as_str()).filter(|id| !id.is_empty()))
            .unwrap_or(instance_name)
            .to_string();
        Self {
            id,
            name: instance_name.to_string(),
            definition,
            active: true,
            visible: true,
            visual_state: 0,
        }
    }

    /// The id used as the state-store key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared definition.
    pub fn definition(&self) -> &InteractableDefinition {
        &self.definition
    }

    /// Whether the instance still responds to input.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the instance is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The state last applied to the visual collaborator.
    pub fn visual_state(&self) -> i64 {
        self.visual_state
    }

    /// Bring the instance in line with persisted state.
    ///
    /// A consumed instance is deactivated and nothing else is evaluated.
    pub fn activate(&mut self, state: &StateStore) {
        if state.is_consumed(&self.id) {
            debug!(id = %self.id, "consumed on load; deactivating");
            self.active = false;
            self.visible = false;
            return;
        }
        self.active = true;
        self.visual_state = state.state(&self.id, 0);
        self.refresh_visibility(state);
    }

    /// Re-evaluate visibility rules. Returns the new visibility.
    ///
    /// Rules are checked in order and the first one that hides wins.
    pub fn refresh_visibility(&mut self, state: &StateStore) -> bool {
        if !self.active {
            self.visible = false;
            return false;
        }
        self.visible = !self
            .definition
            .visibility_rules
            .iter()
            .any(|rule| rule.hides(state, &self.id));
        self.visible
    }

    /// Handle an interaction gesture.
    ///
    /// With an item selected in `ctx`, only use-item rules are considered
    /// and the selection is cleared. Otherwise normal rules are checked in
    /// order, honoring `stop_after_match` and `one_shot`.
    pub fn interact(&mut self, ctx: &mut GameContext, source: TriggerSource) -> InteractionOutcome {
        if !self.active {
            return InteractionOutcome::Ignored(IgnoreReason::Inactive);
        }
        if !self.visible {
            return InteractionOutcome::Ignored(IgnoreReason::Hidden);
        }
        if !self.definition.trigger.accepts(source) {
            return InteractionOutcome::Ignored(IgnoreReason::WrongTrigger);
        }

        let outcome = match ctx.selected_item().map(str::to_string) {
            Some(item_id) => self.use_item(ctx, item_id),
            None => self.run_rules(ctx),
        };

        self.sync_visuals(ctx.state());
        if ctx.state().is_consumed(&self.id) {
            self.deactivate();
        } else {
            self.refresh_visibility(ctx.state());
        }
        outcome
    }

    fn use_item(&mut self, ctx: &mut GameContext, item_id: String) -> InteractionOutcome {
        let definition = Arc::clone(&self.definition);
        let matched = definition.use_item_rules.iter().position(|rule| {
            rule.accepts_item(&item_id) && all_hold(&rule.when, ctx.state(), &self.id)
        });
        let outcome = match matched {
            Some(index) => {
                let rule = &definition.use_item_rules[index];
                info!(id = %self.id, item = %item_id, rule = index, "item used");
                execute_all(&rule.actions, ctx, &self.id, Some(&item_id));
                let item_consumed =
                    ctx.items().consumes_on_use(&item_id) && ctx.state().has_item(&item_id);
                if item_consumed {
                    ctx.remove_item(&item_id);
                }
                InteractionOutcome::ItemUsed {
                    item_id,
                    rule: index,
                    item_consumed,
                }
            }
            None => {
                debug!(id = %self.id, item = %item_id, "no use-item rule accepted the item");
                InteractionOutcome::ItemRejected { item_id }
            }
        };
        ctx.clear_selection();
        outcome
    }

    fn run_rules(&mut self, ctx: &mut GameContext) -> InteractionOutcome {
        let definition = Arc::clone(&self.definition);
        let mut fired = Vec::new();
        for (index, rule) in definition.rules.iter().enumerate() {
            if !all_hold(&rule.when, ctx.state(), &self.id) {
                continue;
            }
            info!(id = %self.id, rule = index, "rule fired");
            execute_all(&rule.actions, ctx, &self.id, None);
            fired.push(index);
            if rule.stop_after_match {
                break;
            }
        }

        if fired.is_empty() {
            return InteractionOutcome::NoMatch;
        }
        if definition.one_shot {
            ctx.consume_interactable(&self.id);
        }
        InteractionOutcome::Fired {
            rules: fired,
            consumed: ctx.state().is_consumed(&self.id),
        }
    }

    fn sync_visuals(&mut self, state: &StateStore) {
        let current = state.state(&self.id, 0);
        if current != self.visual_state {
            debug!(id = %self.id, from = self.visual_state, to = current, "visual state updated");
            self.visual_state = current;
        }
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.visible = false;
    }
}
