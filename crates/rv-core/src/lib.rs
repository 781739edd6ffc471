//! Core game state for Reverie.
//!
//! This crate holds everything the interaction and dialogue layers read and
//! mutate: typed flags, per-interactable persistent records, the player
//! inventory, game and world modes, player stats, and the typed event bus.
//! [`GameContext`] bundles them into one explicitly-constructed object and
//! implements [`GameplayEffects`], the narrow seam through which rule actions
//! and dialogue commands change the game.

/// The explicitly-constructed game context.
pub mod context;
/// The narrow mutation interface shared by actions and dialogue commands.
pub mod effects;
/// Error types used throughout the crate.
pub mod error;
/// Typed game events and the event bus.
pub mod event;
/// Typed global flags.
pub mod flag;
/// Per-interactable persistent records.
pub mod interactable;
/// Player inventory and item definitions.
pub mod inventory;
/// Game mode and world mode state.
pub mod mode;
/// Player stats such as sanity.
pub mod player;
/// The combined state store and its snapshots.
pub mod store;

pub use context::{GameContext, RoomRequest};
pub use effects::GameplayEffects;
pub use error::{CoreError, CoreResult};
pub use event::{EventBus, GameEvent, SubscriptionId};
pub use flag::{FlagStore, FlagValue};
pub use interactable::{InteractableRecord, InteractableStore};
pub use inventory::{Inventory, ItemCatalog, ItemDefinition};
pub use mode::{GameMode, GameModeMachine, WorldMode};
pub use player::PlayerStats;
pub use store::{StateSnapshot, StateStore};
