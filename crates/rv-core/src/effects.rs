//! The narrow mutation seam shared by rule actions and dialogue commands.
//!
//! Neither the action executor nor the dialogue engine knows about the
//! other: both only talk to a [`GameplayEffects`] implementation. A dialogue
//! start requested by an action is stashed here and picked up by whoever
//! owns the dialogue engine.

use crate::flag::FlagValue;
use crate::mode::WorldMode;
use crate::store::StateStore;

/// Everything an action or dialogue command may read or change.
pub trait GameplayEffects {
    /// Read-only view of flags, records and inventory.
    fn state(&self) -> &StateStore;

    /// Write a flag.
    fn set_flag(&mut self, key: &str, value: FlagValue);

    /// Add one copy of an item, honoring its stackability.
    fn add_item(&mut self, item_id: &str);

    /// Remove one copy of an item. No-op if absent.
    fn remove_item(&mut self, item_id: &str);

    /// Set an interactable's persistent state.
    fn set_interactable_state(&mut self, id: &str, state: i64);

    /// Permanently consume an interactable. Idempotent.
    fn consume_interactable(&mut self, id: &str);

    /// Equip a mask.
    fn equip_mask(&mut self, mask_id: &str);

    /// Ask for a dialogue to start.
    fn request_dialogue(&mut self, dialogue_id: &str);

    /// Ask for a room/scene change.
    fn request_room(&mut self, scene_id: &str, spawn_point: Option<&str>);

    /// Ask the UI to show a popup.
    fn show_popup(&mut self, text: &str);

    /// Ask the audio layer to play a sound.
    fn play_sound(&mut self, name: &str);

    /// Ask the audio layer to stop a sound.
    fn stop_sound(&mut self, name: &str);

    /// The current world mode.
    fn world_mode(&self) -> WorldMode;

    /// Switch the world mode.
    fn set_world_mode(&mut self, mode: WorldMode);
}
