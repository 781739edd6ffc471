//! Runtime orchestration for Reverie.
//!
//! A [`Game`] ties the state layer, interactables and the dialogue engine
//! together: it routes player input, hands dialogue requests to the engine,
//! fires [`FlagTrigger`]s, and saves and restores progress. Content comes
//! from a [`ContentPack`] directory.

/// Runtime configuration.
pub mod config;
/// Content directories.
pub mod content;
/// Error types.
pub mod error;
/// The game orchestrator.
pub mod game;
/// Fuzzy name suggestions.
pub mod resolve;
/// Save files.
pub mod save;
/// Flag-triggered dialogues.
pub mod trigger;

pub use config::{InstanceSpec, PlayConfig};
pub use content::{CONFIG_FILE, CheckReport, ContentPack, DIALOGUE_DIR, INTERACTABLES_FILE, ITEMS_FILE};
pub use error::{PlayError, PlayResult};
pub use game::Game;
pub use resolve::suggest;
pub use save::{SAVE_VERSION, SaveFile};
pub use trigger::FlagTrigger;
