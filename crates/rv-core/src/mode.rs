use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What the game is currently doing, as seen by scene/UI orchestration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Free exploration; interactables respond to input.
    #[default]
    Explore,
    /// A dialogue session owns input.
    Dialogue,
    /// The inventory screen is open.
    Inventory,
    /// The game is paused.
    Paused,
    /// A non-interactive sequence is playing.
    Cutscene,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explore => "explore",
            Self::Dialogue => "dialogue",
            Self::Inventory => "inventory",
            Self::Paused => "paused",
            Self::Cutscene => "cutscene",
        };
        f.write_str(name)
    }
}

impl FromStr for GameMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "explore" => Ok(Self::Explore),
            "dialogue" => Ok(Self::Dialogue),
            "inventory" => Ok(Self::Inventory),
            "paused" | "pause" => Ok(Self::Paused),
            "cutscene" => Ok(Self::Cutscene),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}

/// Tracks the current and previous [`GameMode`].
#[derive(Debug, Clone, Default)]
pub struct GameModeMachine {
    current: GameMode,
    previous: Option<GameMode>,
}

impl GameModeMachine {
    /// Start in `initial` with no previous mode.
    pub fn new(initial: GameMode) -> Self {
        Self {
            current: initial,
            previous: None,
        }
    }

    /// The active mode.
    pub fn current(&self) -> GameMode {
        self.current
    }

    /// The mode active before the last transition.
    pub fn previous(&self) -> Option<GameMode> {
        self.previous
    }

    /// Switch modes. Returns `(from, to)` if the mode actually changed.
    pub fn set_mode(&mut self, mode: GameMode) -> Option<(GameMode, GameMode)> {
        if mode == self.current {
            return None;
        }
        let from = std::mem::replace(&mut self.current, mode);
        self.previous = Some(from);
        Some((from, mode))
    }

    /// Go back to the previous mode, if there is one.
    pub fn return_to_previous(&mut self) -> Option<(GameMode, GameMode)> {
        let previous = self.previous?;
        self.set_mode(previous)
    }
}

/// Which layer of the world the player currently perceives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldMode {
    /// The waking world.
    #[default]
    Reality,
    /// The dream layer.
    Dream,
}

impl fmt::Display for WorldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reality => f.write_str("Reality"),
            Self::Dream => f.write_str("Dream"),
        }
    }
}

impl FromStr for WorldMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reality" => Ok(Self::Reality),
            "dream" => Ok(Self::Dream),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}
