use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static description of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Stable item id used as the inventory key.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
    /// Whether multiple copies stack into a count.
    #[serde(default)]
    pub stackable: bool,
    /// Whether using the item on an interactable removes one copy.
    #[serde(default)]
    pub consume_on_use: bool,
}

impl ItemDefinition {
    /// Create a non-stackable item that is kept on use.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            stackable: false,
            consume_on_use: false,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Mark the item as stackable.
    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    /// Mark the item as consumed when used.
    pub fn consumed_on_use(mut self) -> Self {
        self.consume_on_use = true;
        self
    }
}

/// Lookup table of item definitions.
///
/// Unknown ids behave as non-stackable items that are kept on use.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ItemDefinition>,
}

impl ItemCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of definitions. Later duplicates win.
    pub fn from_items(items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    /// Look up a definition.
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Whether the item stacks.
    pub fn is_stackable(&self, id: &str) -> bool {
        self.get(id).is_some_and(|i| i.stackable)
    }

    /// Whether the item is removed when used.
    pub fn consumes_on_use(&self, id: &str) -> bool {
        self.get(id).is_some_and(|i| i.consume_on_use)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The player's carried items as id -> count.
///
/// Non-stackable items are presence-only: their count is 0 or 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    counts: HashMap<String, u32>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy. Returns the new count.
    pub fn add(&mut self, id: &str, stackable: bool) -> u32 {
        let count = self.counts.entry(id.to_string()).or_insert(0);
        *count = if stackable { count.saturating_add(1) } else { 1 };
        *count
    }

    /// Remove one copy, or `None` if the item was not carried.
    pub fn remove(&mut self, id: &str) -> Option<u32> {
        let count = self.counts.get_mut(id)?;
        *count = count.saturating_sub(1);
        let remaining = *count;
        if remaining == 0 {
            self.counts.remove(id);
        }
        Some(remaining)
    }

    /// Whether at least one copy is carried.
    pub fn has(&self, id: &str) -> bool {
        self.count(id) > 0
    }

    /// Number of copies carried (0 if absent).
    pub fn count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Iterate over carried items in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct items carried.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing is carried.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stackable_counts_by_one() {
        let mut inv = Inventory::new();
        assert_eq!(inv.add("coin", true), 1);
        assert_eq!(inv.add("coin", true), 2);
        assert_eq!(inv.remove("coin"), Some(1));
        assert_eq!(inv.count("coin"), 1);
        assert_eq!(inv.remove("coin"), Some(0));
        assert!(!inv.has("coin"));
        assert!(inv.is_empty());
    }

    #[test]
    fn non_stackable_is_presence_only() {
        let mut inv = Inventory::new();
        inv.add("key", false);
        inv.add("key", false);
        assert_eq!(inv.count("key"), 1);
        inv.remove("key");
        assert!(!inv.has("key"));
    }

    #[test]
    fn removing_absent_item_is_noop() {
        let mut inv = Inventory::new();
        assert_eq!(inv.remove("ghost"), None);
        assert_eq!(inv.count("ghost"), 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn catalog_defaults_for_unknown_items() {
        let catalog = ItemCatalog::from_items([
            ItemDefinition::new("coin").stackable(),
            ItemDefinition::new("potion").consumed_on_use(),
        ]);
        assert!(catalog.is_stackable("coin"));
        assert!(!catalog.is_stackable("potion"));
        assert!(catalog.consumes_on_use("potion"));
        assert!(!catalog.is_stackable("unknown"));
        assert!(!catalog.consumes_on_use("unknown"));
    }

    #[test]
    fn item_definition_from_json_defaults() {
        let item: ItemDefinition = serde_json::from_str(r#"{"id": "lens"}"#).unwrap();
        assert_eq!(item.id, "lens");
        assert!(!item.stackable);
        assert!(!item.consume_on_use);
    }
}
