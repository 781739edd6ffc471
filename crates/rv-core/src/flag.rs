use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed flag value.
///
/// The variant tag is the discriminator: a flag set as `Int(1)` is not a
/// boolean, and reading it with [`FlagStore::get_bool`] yields the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer flag.
    Int(i64),
    /// A string flag.
    String(String),
}

impl FlagValue {
    /// Parse a loosely-typed authoring value.
    ///
    /// `true`/`false` (any case) become [`FlagValue::Bool`], anything that
    /// parses as an integer becomes [`FlagValue::Int`], everything else is a
    /// [`FlagValue::String`].
    pub fn parse_loose(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Self::Bool(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Self::Bool(false)
        } else if let Ok(n) = trimmed.parse::<i64>() {
            Self::Int(n)
        } else {
            Self::String(raw.to_string())
        }
    }

    /// The boolean payload, if this is a boolean flag.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer flag.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if this is a string flag.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Global key-value store of typed flags. Last write wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagStore {
    flags: HashMap<String, FlagValue>,
}

impl FlagStore {
    /// Create an empty flag store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FlagValue>) -> Option<FlagValue> {
        self.flags.insert(key.into(), value.into())
    }

    /// Get the raw flag value.
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// Whether a flag of any type is set.
    pub fn has(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }

    /// Read a boolean flag, or `default` if absent or not a boolean.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(FlagValue::as_bool).unwrap_or(default)
    }

    /// Read an integer flag, or `default` if absent or not an integer.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(FlagValue::as_int).unwrap_or(default)
    }

    /// Read a string flag, or `default` if absent or not a string.
    pub fn get_string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(FlagValue::as_str).unwrap_or(default)
    }

    /// Iterate over all flags in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of flags set.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no flags are set.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Remove every flag.
    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_reads_fall_back_on_mismatch() {
        let mut flags = FlagStore::new();
        flags.set("door_open", true);
        flags.set("visits", 3i64);
        flags.set("name", "Mara");

        assert!(flags.get_bool("door_open", false));
        assert_eq!(flags.get_int("door_open", 7), 7);
        assert_eq!(flags.get_int("visits", 0), 3);
        assert!(!flags.get_bool("visits", false));
        assert_eq!(flags.get_string("name", "?"), "Mara");
        assert_eq!(flags.get_string("visits", "?"), "?");
    }

    #[test]
    fn absent_flags_use_default() {
        let flags = FlagStore::new();
        assert!(!flags.has("missing"));
        assert!(flags.get_bool("missing", true));
        assert_eq!(flags.get_int("missing", -1), -1);
        assert_eq!(flags.get_string("missing", "none"), "none");
    }

    #[test]
    fn last_write_wins_across_types() {
        let mut flags = FlagStore::new();
        flags.set("k", true);
        let previous = flags.set("k", 5i64);
        assert_eq!(previous, Some(FlagValue::Bool(true)));
        assert_eq!(flags.get("k"), Some(&FlagValue::Int(5)));
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn parse_loose_values() {
        assert_eq!(FlagValue::parse_loose("TRUE"), FlagValue::Bool(true));
        assert_eq!(FlagValue::parse_loose("false"), FlagValue::Bool(false));
        assert_eq!(FlagValue::parse_loose("-12"), FlagValue::Int(-12));
        assert_eq!(
            FlagValue::parse_loose("lantern"),
            FlagValue::String("lantern".to_string())
        );
    }

    #[test]
    fn round_trip_serde() {
        let mut flags = FlagStore::new();
        flags.set("a", true);
        flags.set("b", 2i64);
        let json = serde_json::to_string(&flags).unwrap();
        let back: FlagStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
    }
}
