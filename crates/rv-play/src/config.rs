//! Runtime configuration, optionally read from `reverie.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use rv_core::GameMode;
use rv_dialogue::{ChaosConfig, TypewriterConfig};
use serde::{Deserialize, Serialize};

use crate::error::{PlayError, PlayResult};
use crate::trigger::FlagTrigger;

/// One interactable placed in the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Instance name, used to address it.
    pub name: String,
    /// Definition id.
    pub definition: String,
    /// Id override for the persistent record.
    #[serde(default)]
    pub id: Option<String>,
}

impl InstanceSpec {
    /// Place `definition` under `name`.
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            id: None,
        }
    }
}

/// Configuration for a play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Dialogue started when the game begins.
    pub start_dialogue: Option<String>,
    /// Initial game mode.
    pub start_mode: GameMode,
    /// Lowest sanity.
    pub min_sanity: f32,
    /// Highest sanity; the player starts here.
    pub max_sanity: f32,
    /// Event log capacity.
    pub max_events: usize,
    /// Typewriter settings.
    pub typewriter: TypewriterConfig,
    /// Text corruption. `None` disables it.
    pub chaos: Option<ChaosConfig>,
    /// Seed for the corruption RNG, overriding the chaos config.
    pub seed: Option<u64>,
    /// Flag-triggered dialogues.
    pub triggers: Vec<FlagTrigger>,
    /// Scene layout. Empty places one instance per definition.
    pub instances: Vec<InstanceSpec>,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            start_dialogue: None,
            start_mode: GameMode::Explore,
            min_sanity: 0.0,
            max_sanity: 100.0,
            max_events: 1024,
            typewriter: TypewriterConfig::default(),
            chaos: None,
            seed: None,
            triggers: Vec::new(),
            instances: Vec::new(),
        }
    }
}

impl PlayConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> PlayResult<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PlayError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&json).map_err(|source| PlayError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Seed text corruption.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set typewriter settings.
    pub fn with_typewriter(mut self, typewriter: TypewriterConfig) -> Self {
        self.typewriter = typewriter;
        self
    }

    /// Enable text corruption.
    pub fn with_chaos(mut self, chaos: ChaosConfig) -> Self {
        self.chaos = Some(chaos);
        self
    }

    /// Set the initial game mode.
    pub fn with_start_mode(mut self, mode: GameMode) -> Self {
        self.start_mode = mode;
        self
    }

    /// Set the dialogue started when the game begins.
    pub fn with_start_dialogue(mut self, dialogue_id: impl Into<String>) -> Self {
        self.start_dialogue = Some(dialogue_id.into());
        self
    }

    /// Add a flag trigger.
    pub fn with_trigger(mut self, trigger: FlagTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// The chaos config with the seed override applied.
    pub fn effective_chaos(&self) -> Option<ChaosConfig> {
        let chaos = self.chaos.clone()?;
        Some(match self.seed {
            Some(seed) => chaos.with_seed(seed),
            None => chaos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlayConfig::load(&dir.path().join("reverie.json")).unwrap();
        assert_eq!(config, PlayConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reverie.json");
        fs::write(
            &path,
            r#"{
                "start_dialogue": "intro",
                "typewriter": {"chars_per_second": 0},
                "chaos": {"max_probability": 0.5},
                "triggers": [{"flag": "lit", "dialogue_id": "lamp"}]
            }"#,
        )
        .unwrap();
        let config = PlayConfig::load(&path).unwrap();
        assert_eq!(config.start_dialogue.as_deref(), Some("intro"));
        assert_eq!(config.typewriter.chars_per_second, 0.0);
        assert_eq!(config.max_events, 1024);
        assert_eq!(config.triggers.len(), 1);
        assert_eq!(config.chaos.as_ref().map(|c| c.max_probability), Some(0.5));
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reverie.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(PlayConfig::load(&path), Err(PlayError::Json { .. })));
    }

    #[test]
    fn seed_overrides_chaos_seed() {
        let config = PlayConfig::default()
            .with_chaos(ChaosConfig::default().with_seed(1))
            .with_seed(9);
        assert_eq!(config.effective_chaos().and_then(|c| c.seed), Some(9));
        assert_eq!(PlayConfig::default().with_seed(9).effective_chaos(), None);
    }
}
