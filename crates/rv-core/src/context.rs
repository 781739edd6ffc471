use tracing::debug;

use crate::effects::GameplayEffects;
use crate::error::CoreResult;
use crate::event::{EventBus, GameEvent};
use crate::flag::FlagValue;
use crate::inventory::ItemCatalog;
use crate::mode::{GameMode, GameModeMachine, WorldMode};
use crate::player::PlayerStats;
use crate::store::{StateSnapshot, StateStore};

/// A pending room/scene change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRequest {
    /// Target scene id.
    pub scene_id: String,
    /// Spawn point inside the scene, if any.
    pub spawn_point: Option<String>,
}

/// The explicitly-constructed game context.
///
/// Owns the state store, item catalog, mode machine, event bus and player
/// stats. Every mutation goes through here so that the matching
/// [`GameEvent`] is published.
#[derive(Debug, Default)]
pub struct GameContext {
    state: StateStore,
    items: ItemCatalog,
    modes: GameModeMachine,
    bus: EventBus,
    player: PlayerStats,
    world_mode: WorldMode,
    equipped_mask: Option<String>,
    selected_item: Option<String>,
    pending_dialogue: Option<String>,
    pending_room: Option<RoomRequest>,
}

impl GameContext {
    /// Create a context with an empty store and the given item catalog.
    pub fn new(items: ItemCatalog) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Replace the event bus (e.g. to change its capacity).
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    /// Replace the player stats.
    pub fn with_player(mut self, player: PlayerStats) -> Self {
        self.player = player;
        self
    }

    /// Start in a specific game mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.modes = GameModeMachine::new(mode);
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The item catalog.
    pub fn items(&self) -> &ItemCatalog {
        &self.items
    }

    /// The event bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Mutable access to the event bus, for subscribing and draining.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Player stats.
    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    /// Mutable player stats.
    pub fn player_mut(&mut self) -> &mut PlayerStats {
        &mut self.player
    }

    /// The currently equipped mask.
    pub fn equipped_mask(&self) -> Option<&str> {
        self.equipped_mask.as_deref()
    }

    // -----------------------------------------------------------------------
    // Game modes
    // -----------------------------------------------------------------------

    /// The current game mode.
    pub fn mode(&self) -> GameMode {
        self.modes.current()
    }

    /// The mode before the last transition.
    pub fn previous_mode(&self) -> Option<GameMode> {
        self.modes.previous()
    }

    /// Switch game mode, publishing [`GameEvent::ModeChanged`] on change.
    pub fn set_mode(&mut self, mode: GameMode) {
        if let Some((from, to)) = self.modes.set_mode(mode) {
            debug!(%from, %to, "game mode changed");
            self.bus.publish(GameEvent::ModeChanged { from, to });
        }
    }

    /// Return to the previous game mode, if any.
    pub fn return_to_previous_mode(&mut self) {
        if let Some((from, to)) = self.modes.return_to_previous() {
            self.bus.publish(GameEvent::ModeChanged { from, to });
        }
    }

    // -----------------------------------------------------------------------
    // Item selection (use-item mode)
    // -----------------------------------------------------------------------

    /// The item currently selected for use, if any.
    pub fn selected_item(&self) -> Option<&str> {
        self.selected_item.as_deref()
    }

    /// Select a carried item for use on the next interaction.
    ///
    /// Returns `false` and leaves the selection untouched if the item is
    /// not carried.
    pub fn select_item(&mut self, item_id: &str) -> bool {
        if !self.state.has_item(item_id) {
            return false;
        }
        self.selected_item = Some(item_id.to_string());
        true
    }

    /// Leave use-item mode.
    pub fn clear_selection(&mut self) {
        self.selected_item = None;
    }

    // -----------------------------------------------------------------------
    // Pending requests
    // -----------------------------------------------------------------------

    /// The dialogue waiting for a dialogue engine, if any.
    pub fn pending_dialogue(&self) -> Option<&str> {
        self.pending_dialogue.as_deref()
    }

    /// Take the pending dialogue id, leaving the slot empty.
    pub fn take_pending_dialogue(&mut self) -> Option<String> {
        self.pending_dialogue.take()
    }

    /// Take the pending room change, leaving the slot empty.
    pub fn take_room_request(&mut self) -> Option<RoomRequest> {
        self.pending_room.take()
    }

    /// Publish an event on the context's bus.
    pub fn publish(&mut self, event: GameEvent) {
        self.bus.publish(event);
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Snapshot flags, records and inventory.
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// Replace flags, records and inventory. Clears transient selection.
    pub fn load_snapshot(&mut self, snapshot: StateSnapshot) {
        self.state.load_snapshot(snapshot);
        self.selected_item = None;
    }

    /// Load a JSON snapshot.
    pub fn load_snapshot_json(&mut self, json: &str) -> CoreResult<()> {
        self.load_snapshot(StateSnapshot::from_json(json)?);
        Ok(())
    }

    /// Reset everything for a new game.
    pub fn new_game(&mut self) {
        self.state.new_game();
        self.world_mode = WorldMode::default();
        self.equipped_mask = None;
        self.selected_item = None;
        self.pending_dialogue = None;
        self.pending_room = None;
        self.player.set_sanity(self.player.max_sanity());
    }
}

impl GameplayEffects for GameContext {
    fn state(&self) -> &StateStore {
        &self.state
    }

    fn set_flag(&mut self, key: &str, value: FlagValue) {
        self.state.set_flag(key, value.clone());
        self.bus.publish(GameEvent::FlagChanged {
            key: key.to_string(),
            value,
        });
    }

    fn add_item(&mut self, item_id: &str) {
        let stackable = self.items.is_stackable(item_id);
        let count = self.state.add_item(item_id, stackable);
        self.bus.publish(GameEvent::InventoryChanged {
            item: item_id.to_string(),
            count,
        });
    }

    fn remove_item(&mut self, item_id: &str) {
        if let Some(count) = self.state.remove_item(item_id) {
            if count == 0 && self.selected_item.as_deref() == Some(item_id) {
                self.selected_item = None;
            }
            self.bus.publish(GameEvent::InventoryChanged {
                item: item_id.to_string(),
                count,
            });
        }
    }

    fn set_interactable_state(&mut self, id: &str, state: i64) {
        let from = self.state.set_state(id, state);
        self.bus.publish(GameEvent::InteractableStateChanged {
            id: id.to_string(),
            from,
            to: state,
        });
    }

    fn consume_interactable(&mut self, id: &str) {
        if self.state.consume(id) {
            self.bus.publish(GameEvent::InteractableConsumed { id: id.to_string() });
        }
    }

    fn equip_mask(&mut self, mask_id: &str) {
        self.equipped_mask = Some(mask_id.to_string());
        self.bus.publish(GameEvent::MaskEquipped {
            mask_id: mask_id.to_string(),
        });
    }

    fn request_dialogue(&mut self, dialogue_id: &str) {
        self.pending_dialogue = Some(dialogue_id.to_string());
        self.bus.publish(GameEvent::DialogueRequested {
            dialogue_id: dialogue_id.to_string(),
        });
    }

    fn request_room(&mut self, scene_id: &str, spawn_point: Option<&str>) {
        self.pending_room = Some(RoomRequest {
            scene_id: scene_id.to_string(),
            spawn_point: spawn_point.map(str::to_string),
        });
        self.bus.publish(GameEvent::RoomChangeRequested {
            scene_id: scene_id.to_string(),
            spawn_point: spawn_point.map(str::to_string),
        });
    }

    fn show_popup(&mut self, text: &str) {
        self.bus.publish(GameEvent::PopupRequested {
            text: text.to_string(),
        });
    }

    fn play_sound(&mut self, name: &str) {
        self.bus.publish(GameEvent::SoundRequested {
            name: name.to_string(),
            play: true,
        });
    }

    fn stop_sound(&mut self, name: &str) {
        self.bus.publish(GameEvent::SoundRequested {
            name: name.to_string(),
            play: false,
        });
    }

    fn world_mode(&self) -> WorldMode {
        self.world_mode
    }

    fn set_world_mode(&mut self, mode: WorldMode) {
        if self.world_mode != mode {
            self.world_mode = mode;
            self.bus.publish(GameEvent::WorldModeChanged { mode });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::ItemDefinition;

    fn context() -> GameContext {
        GameContext::new(ItemCatalog::from_items([
            ItemDefinition::new("coin").stackable(),
            ItemDefinition::new("key"),
        ]))
    }

    #[test]
    fn mutations_publish_events() {
        let mut ctx = context();
        ctx.set_flag("lit", FlagValue::Bool(true));
        ctx.set_interactable_state("lamp", 1);
        ctx.consume_interactable("lamp");
        ctx.consume_interactable("lamp");

        let events = ctx.bus_mut().drain();
        assert_eq!(
            events,
            vec![
                GameEvent::FlagChanged {
                    key: "lit".into(),
                    value: FlagValue::Bool(true)
                },
                GameEvent::InteractableStateChanged {
                    id: "lamp".into(),
                    from: 0,
                    to: 1
                },
                GameEvent::InteractableConsumed { id: "lamp".into() },
            ]
        );
    }

    #[test]
    fn add_item_uses_catalog_stackability() {
        let mut ctx = context();
        ctx.add_item("coin");
        ctx.add_item("coin");
        ctx.add_item("key");
        ctx.add_item("key");
        assert_eq!(ctx.state().item_count("coin"), 2);
        assert_eq!(ctx.state().item_count("key"), 1);
    }

    #[test]
    fn removing_absent_item_publishes_nothing() {
        let mut ctx = context();
        ctx.remove_item("ghost");
        assert!(ctx.bus().is_empty());
    }

    #[test]
    fn selection_requires_carried_item() {
        let mut ctx = context();
        assert!(!ctx.select_item("key"));
        ctx.add_item("key");
        assert!(ctx.select_item("key"));
        ctx.remove_item("key");
        assert_eq!(ctx.selected_item(), None);
    }

    #[test]
    fn dialogue_request_is_stashed() {
        let mut ctx = context();
        ctx.request_dialogue("intro");
        assert_eq!(ctx.pending_dialogue(), Some("intro"));
        assert_eq!(ctx.take_pending_dialogue().as_deref(), Some("intro"));
        assert_eq!(ctx.pending_dialogue(), None);
    }

    #[test]
    fn mode_changes_are_published() {
        let mut ctx = context();
        ctx.set_mode(GameMode::Dialogue);
        ctx.return_to_previous_mode();
        assert_eq!(ctx.mode(), GameMode::Explore);
        assert_eq!(ctx.bus().len(), 2);
    }

    #[test]
    fn new_game_resets_transient_state() {
        let mut ctx = context();
        ctx.add_item("key");
        ctx.select_item("key");
        ctx.set_world_mode(WorldMode::Dream);
        ctx.request_room("cellar", Some("stairs"));
        ctx.new_game();

        assert!(ctx.state().inventory().is_empty());
        assert_eq!(ctx.selected_item(), None);
        assert_eq!(ctx.world_mode(), WorldMode::Reality);
        assert_eq!(ctx.take_room_request(), None);
    }
}
