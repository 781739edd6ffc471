//! The game orchestrator: routes input, starts requested dialogues, fires
//! flag triggers, and saves and loads.

use std::collections::BTreeSet;

use rv_core::{
    EventBus, GameContext, GameEvent, GameMode, GameplayEffects, PlayerStats, RoomRequest,
};
use rv_dialogue::{ChaosEffect, DialogueEngine, DialogueView};
use rv_rules::{Interactable, InteractionOutcome, RuleError, TriggerSource};
use tracing::{info, warn};

use crate::config::InstanceSpec;
use crate::content::ContentPack;
use crate::error::{PlayError, PlayResult};
use crate::resolve::suggest;
use crate::save::SaveFile;
use crate::trigger::FlagTrigger;

/// Upper bound on dialogue hand-offs processed after one input.
const MAX_CASCADE: usize = 16;

/// A running game.
#[derive(Debug)]
pub struct Game<V: DialogueView> {
    ctx: GameContext,
    engine: DialogueEngine<V>,
    instances: Vec<Interactable>,
    triggers: Vec<FlagTrigger>,
    fired: BTreeSet<String>,
    start_dialogue: Option<String>,
    events: Vec<GameEvent>,
    popups: Vec<String>,
    room: Option<RoomRequest>,
}

impl<V: DialogueView> Game<V> {
    /// Assemble a game from a context and a dialogue engine.
    pub fn new(ctx: GameContext, engine: DialogueEngine<V>) -> Self {
        Self {
            ctx,
            engine,
            instances: Vec::new(),
            triggers: Vec::new(),
            fired: BTreeSet::new(),
            start_dialogue: None,
            events: Vec::new(),
            popups: Vec::new(),
            room: None,
        }
    }

    /// Build a game from a content pack.
    pub fn from_pack(pack: &ContentPack, view: V) -> PlayResult<Self> {
        let config = &pack.config;
        let ctx = GameContext::new(pack.items.clone())
            .with_bus(EventBus::new(config.max_events))
            .with_player(PlayerStats::new(config.min_sanity, config.max_sanity))
            .with_mode(config.start_mode);
        let mut engine = DialogueEngine::new(pack.dialogues().clone(), view, config.typewriter.clone());
        if let Some(chaos) = config.effective_chaos() {
            engine = engine.with_chaos(ChaosEffect::new(&chaos));
        }

        let specs: Vec<InstanceSpec> = if config.instances.is_empty() {
            pack.definitions
                .ids()
                .into_iter()
                .map(|id| InstanceSpec::new(id, id))
                .collect()
        } else {
            config.instances.clone()
        };

        let mut game = Self::new(ctx, engine);
        for spec in specs {
            let definition = pack
                .definitions
                .get(&spec.definition)
                .ok_or_else(|| RuleError::UnknownDefinition(spec.definition.clone()))?;
            game = game.with_instance(Interactable::new(definition, spec.id.as_deref(), &spec.name));
        }
        for trigger in &config.triggers {
            game = game.with_trigger(trigger.clone());
        }
        game.start_dialogue = config.start_dialogue.clone();
        Ok(game)
    }

    /// Place an interactable, activating it against the current state.
    pub fn with_instance(mut self, mut instance: Interactable) -> Self {
        instance.activate(self.ctx.state());
        self.instances.push(instance);
        self
    }

    /// Add a flag trigger.
    pub fn with_trigger(mut self, trigger: FlagTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Start the configured opening dialogue, if any.
    pub fn begin(&mut self) -> bool {
        match self.start_dialogue.clone() {
            Some(id) => self.start_dialogue(&id),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Interact with an object by instance name or id.
    pub fn interact(&mut self, name: &str, source: TriggerSource) -> PlayResult<InteractionOutcome> {
        let mode = self.ctx.mode();
        if mode != GameMode::Explore {
            return Err(PlayError::NotExploring(mode));
        }
        let index = self.find_instance(name)?;
        let outcome = self.instances[index].interact(&mut self.ctx, source);
        info!(%name, ?outcome, "interaction");
        self.pump();
        Ok(outcome)
    }

    /// Select a carried item for the next interaction.
    pub fn select_item(&mut self, item_id: &str) -> bool {
        self.ctx.select_item(item_id)
    }

    /// A generic submit/click while a dialogue is active.
    pub fn submit(&mut self) -> bool {
        let handled = self.engine.submit(&mut self.ctx);
        self.pump();
        handled
    }

    /// Pick a dialogue choice.
    pub fn choose(&mut self, index: usize) -> bool {
        let chosen = self.engine.select_choice(&mut self.ctx, index);
        self.pump();
        chosen
    }

    /// Advance time by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.engine.tick(&self.ctx, dt);
        self.pump();
    }

    /// Start a dialogue directly.
    pub fn start_dialogue(&mut self, dialogue_id: &str) -> bool {
        let started = self.engine.start(&mut self.ctx, dialogue_id);
        self.pump();
        started
    }

    /// Change the game mode from outside the dialogue engine.
    ///
    /// Leaving dialogue mode this way ends the active session.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.ctx.set_mode(mode);
        self.pump();
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Capture the game for saving.
    pub fn save(&self) -> SaveFile {
        let mut save = SaveFile::new(self.ctx.snapshot(), self.ctx.player().clone());
        save.world_mode = self.ctx.world_mode();
        save.equipped_mask = self.ctx.equipped_mask().map(str::to_string);
        save.fired_triggers = self.fired.iter().cloned().collect();
        save
    }

    /// Replace the game state with a save. Ends any active dialogue.
    pub fn load(&mut self, save: SaveFile) {
        self.engine.end(&mut self.ctx);
        self.ctx.new_game();
        self.ctx.load_snapshot(save.state);
        *self.ctx.player_mut() = save.player;
        self.ctx.set_world_mode(save.world_mode);
        if let Some(mask) = save.equipped_mask {
            self.ctx.equip_mask(&mask);
        }
        self.fired = save.fired_triggers.into_iter().collect();
        self.reset_transient();
        info!("save loaded");
    }

    /// Clear all state and start over.
    pub fn new_game(&mut self) {
        self.engine.end(&mut self.ctx);
        self.ctx.new_game();
        self.fired.clear();
        self.reset_transient();
        info!("new game");
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The game context.
    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    /// The game context, mutably. Call [`Game::set_mode`] rather than
    /// changing modes here so the dialogue safeguard runs.
    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    /// The dialogue engine.
    pub fn dialogue(&self) -> &DialogueEngine<V> {
        &self.engine
    }

    /// The dialogue engine, mutably.
    pub fn dialogue_mut(&mut self) -> &mut DialogueEngine<V> {
        &mut self.engine
    }

    /// All placed interactables.
    pub fn instances(&self) -> &[Interactable] {
        &self.instances
    }

    /// Look up an interactable by name or id.
    pub fn instance(&self, name: &str) -> Option<&Interactable> {
        self.instances
            .iter()
            .find(|i| i.name() == name || i.id() == name)
    }

    /// Take events observed since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take popups requested since the last call.
    pub fn take_popups(&mut self) -> Vec<String> {
        std::mem::take(&mut self.popups)
    }

    /// The most recent room change request.
    pub fn room_request(&self) -> Option<&RoomRequest> {
        self.room.as_ref()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn find_instance(&self, name: &str) -> PlayResult<usize> {
        self.instances
            .iter()
            .position(|i| i.name() == name || i.id() == name)
            .ok_or_else(|| PlayError::UnknownInteractable {
                name: name.to_string(),
                suggestion: suggest(name, self.instances.iter().map(Interactable::name)),
            })
    }

    /// Process everything the last step produced: events, flag triggers,
    /// room requests and pending dialogues.
    fn pump(&mut self) {
        for _ in 0..MAX_CASCADE {
            let events = self.ctx.bus_mut().drain();
            for event in &events {
                self.observe(event);
            }
            self.events.extend(events);

            if let Some(room) = self.ctx.take_room_request() {
                info!(scene = %room.scene_id, spawn = ?room.spawn_point, "room change requested");
                self.room = Some(room);
            }
            if self.engine.is_active() && self.ctx.mode() != GameMode::Dialogue {
                let mode = self.ctx.mode();
                self.engine.on_mode_changed(&mut self.ctx, mode);
            }
            match self.ctx.take_pending_dialogue() {
                Some(id) => {
                    self.engine.start(&mut self.ctx, &id);
                }
                None if self.ctx.bus().is_empty() => break,
                None => {}
            }
        }
        if self.ctx.pending_dialogue().is_some() || !self.ctx.bus().is_empty() {
            warn!("dialogue hand-offs did not settle; leaving the rest for the next step");
        }
        self.refresh_instances();
    }

    fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::FlagChanged { .. } => {
                for trigger in &self.triggers {
                    if !trigger.matches(event) {
                        continue;
                    }
                    if trigger.once && !self.fired.insert(trigger.key()) {
                        continue;
                    }
                    info!(flag = %trigger.flag, dialogue_id = %trigger.dialogue_id, "flag trigger fired");
                    self.ctx.request_dialogue(&trigger.dialogue_id);
                }
            }
            GameEvent::PopupRequested { text } => self.popups.push(text.clone()),
            _ => {}
        }
    }

    fn refresh_instances(&mut self) {
        for instance in &mut self.instances {
            if instance.is_active() {
                instance.refresh_visibility(self.ctx.state());
            }
        }
    }

    fn reset_transient(&mut self) {
        self.ctx.bus_mut().drain();
        self.events.clear();
        self.popups.clear();
        self.room = None;
        for instance in &mut self.instances {
            instance.activate(self.ctx.state());
        }
    }
}
