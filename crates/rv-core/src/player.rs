//! Player stats consulted by the presentation layer.

use serde::{Deserialize, Serialize};

/// Player stats that outlive a single scene.
///
/// Only sanity is modeled; it drives the text corruption effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    sanity: f32,
    min_sanity: f32,
    max_sanity: f32,
}

impl PlayerStats {
    /// Create stats with sanity in `[min, max]`, starting at `max`.
    pub fn new(min_sanity: f32, max_sanity: f32) -> Self {
        let (min_sanity, max_sanity) = if min_sanity <= max_sanity {
            (min_sanity, max_sanity)
        } else {
            (max_sanity, min_sanity)
        };
        Self {
            sanity: max_sanity,
            min_sanity,
            max_sanity,
        }
    }

    /// Current sanity.
    pub fn sanity(&self) -> f32 {
        self.sanity
    }

    /// Lowest possible sanity.
    pub fn min_sanity(&self) -> f32 {
        self.min_sanity
    }

    /// Highest possible sanity.
    pub fn max_sanity(&self) -> f32 {
        self.max_sanity
    }

    /// Set sanity, clamped to the valid range.
    pub fn set_sanity(&mut self, value: f32) {
        self.sanity = value.clamp(self.min_sanity, self.max_sanity);
    }

    /// Add `delta` to sanity, clamped.
    pub fn adjust_sanity(&mut self, delta: f32) {
        self.set_sanity(self.sanity + delta);
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}
