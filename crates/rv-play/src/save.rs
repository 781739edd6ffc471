//! Save files: the state snapshot plus player stats.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rv_core::{PlayerStats, StateSnapshot, WorldMode};
use serde::{Deserialize, Serialize};

use crate::error::{PlayError, PlayResult};

/// Newest save format this build writes.
pub const SAVE_VERSION: u32 = 1;

/// Everything needed to resume a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Format version.
    pub version: u32,
    /// When the save was written.
    pub saved_at: DateTime<Utc>,
    /// Flags, interactable records and inventory.
    pub state: StateSnapshot,
    /// Player stats.
    pub player: PlayerStats,
    /// Current world layer.
    #[serde(default)]
    pub world_mode: WorldMode,
    /// Equipped mask.
    #[serde(default)]
    pub equipped_mask: Option<String>,
    /// Keys of one-time flag triggers that already fired.
    #[serde(default)]
    pub fired_triggers: Vec<String>,
}

impl SaveFile {
    /// A save of `state` and `player` stamped now.
    pub fn new(state: StateSnapshot, player: PlayerStats) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            state,
            player,
            world_mode: WorldMode::default(),
            equipped_mask: None,
            fired_triggers: Vec::new(),
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> PlayResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a save, rejecting newer formats.
    pub fn from_json(json: &str) -> PlayResult<Self> {
        let save: Self = serde_json::from_str(json)?;
        if save.version > SAVE_VERSION {
            return Err(PlayError::SaveVersion {
                found: save.version,
                supported: SAVE_VERSION,
            });
        }
        Ok(save)
    }

    /// Write to `path`.
    pub fn write(&self, path: &Path) -> PlayResult<()> {
        fs::write(path, self.to_json()?).map_err(|source| PlayError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read from `path`.
    pub fn read(path: &Path) -> PlayResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| PlayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
