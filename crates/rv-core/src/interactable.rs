use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Persistent save data for one interactable, keyed by its stable id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractableRecord {
    /// Once true, the interactable never fires again.
    #[serde(default)]
    pub consumed: bool,
    /// Game-defined visual/logic state (e.g. a sprite index).
    #[serde(default)]
    pub state: i64,
}

/// Per-interactable records, created lazily on first write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractableStore {
    records: HashMap<String, InteractableRecord>,
}

impl InteractableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for `id`, or the default record if none exists.
    pub fn record(&self, id: &str) -> InteractableRecord {
        self.records.get(id).copied().unwrap_or_default()
    }

    /// Whether `id` has been consumed.
    pub fn is_consumed(&self, id: &str) -> bool {
        self.records.get(id).is_some_and(|r| r.consumed)
    }

    /// Mark `id` as consumed. Returns `true` only if this call changed it.
    pub fn consume(&mut self, id: &str) -> bool {
        let record = self.records.entry(id.to_string()).or_default();
        if record.consumed {
            return false;
        }
        record.consumed = true;
        true
    }

    /// The stored state for `id`, or `default` if no record exists.
    pub fn state(&self, id: &str, default: i64) -> i64 {
        self.records.get(id).map_or(default, |r| r.state)
    }

    /// Set the state for `id`, returning the previous state (0 if new).
    pub fn set_state(&mut self, id: &str, state: i64) -> i64 {
        let record = self.records.entry(id.to_string()).or_default();
        std::mem::replace(&mut record.state, state)
    }

    /// Iterate over all records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InteractableRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
