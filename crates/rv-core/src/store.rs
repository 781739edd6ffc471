use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::flag::{FlagStore, FlagValue};
use crate::interactable::InteractableStore;
use crate::inventory::Inventory;

/// Serializable copy of all three stores.
///
/// Each field is self-contained and can be loaded on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Flag store contents.
    #[serde(default)]
    pub flags: FlagStore,
    /// Interactable records.
    #[serde(default)]
    pub interactables: InteractableStore,
    /// Inventory counts.
    #[serde(default)]
    pub inventory: Inventory,
}

impl StateSnapshot {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Flags, interactable records and inventory.
///
/// Pure data plus mutation API. Change notifications are published by
/// [`crate::GameContext`], which owns the store.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    flags: FlagStore,
    interactables: InteractableStore,
    inventory: Inventory,
}

impl StateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Flags
    // -----------------------------------------------------------------------

    /// Set a flag, returning the previous value.
    pub fn set_flag(&mut self, key: &str, value: FlagValue) -> Option<FlagValue> {
        self.flags.set(key, value)
    }

    /// Whether a flag is set.
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.has(key)
    }

    /// Raw flag value.
    pub fn flag(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// Boolean flag or `default`.
    pub fn flag_bool(&self, key: &str, default: bool) -> bool {
        self.flags.get_bool(key, default)
    }

    /// Integer flag or `default`.
    pub fn flag_int(&self, key: &str, default: i64) -> i64 {
        self.flags.get_int(key, default)
    }

    /// String flag or `default`.
    pub fn flag_string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.flags.get_string(key, default)
    }

    /// The flag store.
    pub fn flags(&self) -> &FlagStore {
        &self.flags
    }

    // -----------------------------------------------------------------------
    // Interactables
    // -----------------------------------------------------------------------

    /// Whether the interactable has been consumed.
    pub fn is_consumed(&self, id: &str) -> bool {
        self.interactables.is_consumed(id)
    }

    /// Consume the interactable. Returns `true` if it was not consumed before.
    pub fn consume(&mut self, id: &str) -> bool {
        self.interactables.consume(id)
    }

    /// Interactable state, or `default` if there is no record.
    pub fn state(&self, id: &str, default: i64) -> i64 {
        self.interactables.state(id, default)
    }

    /// Set interactable state, returning the previous one.
    pub fn set_state(&mut self, id: &str, state: i64) -> i64 {
        self.interactables.set_state(id, state)
    }

    /// The interactable store.
    pub fn interactables(&self) -> &InteractableStore {
        &self.interactables
    }

    // -----------------------------------------------------------------------
    // Inventory
    // -----------------------------------------------------------------------

    /// Add one copy of an item. Returns the new count.
    pub fn add_item(&mut self, id: &str, stackable: bool) -> u32 {
        self.inventory.add(id, stackable)
    }

    /// Remove one copy of an item; `None` if it was not carried.
    pub fn remove_item(&mut self, id: &str) -> Option<u32> {
        self.inventory.remove(id)
    }

    /// Whether the item is carried.
    pub fn has_item(&self, id: &str) -> bool {
        self.inventory.has(id)
    }

    /// Carried count, 0 if absent.
    pub fn item_count(&self, id: &str) -> u32 {
        self.inventory.count(id)
    }

    /// The inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Copy all three stores.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            flags: self.flags.clone(),
            interactables: self.interactables.clone(),
            inventory: self.inventory.clone(),
        }
    }

    /// Replace all three stores with the snapshot's contents.
    pub fn load_snapshot(&mut self, snapshot: StateSnapshot) {
        self.flags = snapshot.flags;
        self.interactables = snapshot.interactables;
        self.inventory = snapshot.inventory;
    }

    /// Replace only the flags.
    pub fn load_flags(&mut self, flags: FlagStore) {
        self.flags = flags;
    }

    /// Replace only the interactable records.
    pub fn load_interactables(&mut self, interactables: InteractableStore) {
        self.interactables = interactables;
    }

    /// Replace only the inventory.
    pub fn load_inventory(&mut self, inventory: Inventory) {
        self.inventory = inventory;
    }

    /// Clear all three stores.
    pub fn new_game(&mut self) {
        self.flags.clear();
        self.interactables.clear();
        self.inventory.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> StateStore {
        let mut store = StateStore::new();
        store.set_flag("met_warden", FlagValue::Bool(true));
        store.set_flag("bell_rings", FlagValue::Int(3));
        store.set_flag("password", FlagValue::String("moth".into()));
        store.consume("letter");
        store.set_state("door", 2);
        store.add_item("coin", true);
        store.add_item("coin", true);
        store.add_item("lantern", false);
        store
    }

    #[test]
    fn snapshot_round_trip_reproduces_queries() {
        let original = populated();
        let json = original.snapshot().to_json().unwrap();

        let mut fresh = StateStore::new();
        fresh.load_snapshot(StateSnapshot::from_json(&json).unwrap());

        assert!(fresh.is_consumed("letter"));
        assert!(!fresh.is_consumed("door"));
        assert_eq!(fresh.state("door", 0), 2);
        assert!(fresh.flag_bool("met_warden", false));
        assert_eq!(fresh.flag_int("bell_rings", 0), 3);
        assert_eq!(fresh.flag_string("password", ""), "moth");
        assert_eq!(fresh.item_count("coin"), 2);
        assert!(fresh.has_item("lantern"));
    }

    #[test]
    fn load_replaces_instead_of_merging() {
        let mut store = populated();
        let mut other = StateStore::new();
        other.set_flag("only_here", FlagValue::Bool(true));

        store.load_snapshot(other.snapshot());
        assert!(!store.has_flag("met_warden"));
        assert!(!store.is_consumed("letter"));
        assert!(!store.has_item("coin"));
        assert!(store.has_flag("only_here"));
    }

    #[test]
    fn partial_loads_touch_one_store() {
        let mut store = populated();
        store.load_inventory(Inventory::new());
        assert!(!store.has_item("coin"));
        assert!(store.has_flag("met_warden"));
        assert!(store.is_consumed("letter"));
    }

    #[test]
    fn new_game_clears_everything() {
        let mut store = populated();
        store.new_game();
        assert!(store.flags().is_empty());
        assert!(store.interactables().is_empty());
        assert!(store.inventory().is_empty());
    }

    #[test]
    fn defaults_for_unset_keys() {
        let store = StateStore::new();
        assert!(!store.flag_bool("x", false));
        assert_eq!(store.flag_int("x", 9), 9);
        assert_eq!(store.item_count("x"), 0);
        assert_eq!(store.state("x", 0), 0);
        assert!(!store.is_consumed("x"));
    }
}
