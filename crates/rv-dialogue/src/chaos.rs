//! Sanity-driven text corruption.
//!
//! At full sanity text is untouched. As sanity drops toward its minimum,
//! each visible character is increasingly likely to be swapped for a glyph
//! from the corruption alphabet.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rv_core::PlayerStats;
use serde::{Deserialize, Serialize};

/// Glyphs used when no alphabet is configured.
pub const DEFAULT_ALPHABET: &str = "#$%&@!?*~^+=<>/\\|";

/// Per-character text transform used while revealing text.
pub trait CharTransform {
    /// Map one revealed character.
    fn apply(&mut self, c: char) -> char;
}

/// Leaves text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl CharTransform for Identity {
    fn apply(&mut self, c: char) -> char {
        c
    }
}

/// Configuration for [`ChaosEffect`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosConfig {
    /// Corruption probability at minimum sanity.
    pub max_probability: f64,
    /// Replacement glyphs.
    pub alphabet: String,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            max_probability: 0.3,
            alphabet: DEFAULT_ALPHABET.to_string(),
            seed: None,
        }
    }
}

impl ChaosConfig {
    /// Set the probability cap (clamped to `0.0..=1.0`).
    pub fn with_max_probability(mut self, probability: f64) -> Self {
        self.max_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the replacement glyphs.
    pub fn with_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    /// Seed the RNG for reproducible corruption.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Corrupts text according to the player's sanity.
#[derive(Debug, Clone)]
pub struct ChaosEffect {
    max_probability: f64,
    alphabet: Vec<char>,
    rng: StdRng,
}

impl ChaosEffect {
    /// Create the effect from its configuration.
    pub fn new(config: &ChaosConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            max_probability: config.max_probability.clamp(0.0, 1.0),
            alphabet: config.alphabet.chars().filter(|c| !c.is_whitespace()).collect(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Corruption probability for the player's current sanity.
    ///
    /// Zero at maximum sanity, rising linearly to the configured cap at
    /// minimum sanity.
    pub fn probability(&self, player: &PlayerStats) -> f64 {
        let range = f64::from(player.max_sanity() - player.min_sanity());
        if !range.is_finite() || range <= 0.0 {
            return 0.0;
        }
        let lost = f64::from(player.max_sanity() - player.sanity()) / range;
        usable(lost.clamp(0.0, 1.0) * self.max_probability)
    }

    /// A transform that corrupts with the given probability.
    pub fn at(&mut self, probability: f64) -> Corruption<'_> {
        Corruption {
            probability: usable(probability),
            effect: self,
        }
    }

    /// Corrupt a whole string once.
    pub fn corrupt(&mut self, text: &str, probability: f64) -> String {
        let mut corruption = self.at(probability);
        text.chars().map(|c| corruption.apply(c)).collect()
    }

    fn corrupt_char(&mut self, c: char, probability: f64) -> char {
        if c.is_whitespace() || self.alphabet.is_empty() || probability <= 0.0 {
            return c;
        }
        if self.rng.random_bool(probability) {
            self.alphabet[self.rng.random_range(0..self.alphabet.len())]
        } else {
            c
        }
    }
}

/// Clamp to `0.0..=1.0`; anything not finite never corrupts.
fn usable(probability: f64) -> f64 {
    if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// [`ChaosEffect`] bound to one probability.
#[derive(Debug)]
pub struct Corruption<'a> {
    effect: &'a mut ChaosEffect,
    probability: f64,
}

impl CharTransform for Corruption<'_> {
    fn apply(&mut self, c: char) -> char {
        self.effect.corrupt_char(c, self.probability)
    }
}
