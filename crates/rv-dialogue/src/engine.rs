//! The dialogue state machine.
//!
//! A session is either absent (idle) or active at one node. While active
//! the engine is typing, waiting for the next page, waiting for an advance,
//! or waiting for a choice. Every input is safe to send in any state;
//! inputs that make no sense are logged and ignored.

use std::fmt;

use rv_core::{GameContext, GameEvent, GameMode, PlayerStats};
use tracing::{debug, error, info, warn};

use crate::chaos::{ChaosEffect, Identity};
use crate::command::run_commands;
use crate::graph::{DialogueGraph, DialogueNode, END_NODE};
use crate::source::DialogueSource;
use crate::typewriter::{Typewriter, TypewriterConfig, TypewriterEvent};
use crate::view::DialogueView;

/// Where the engine is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialoguePhase {
    /// No session.
    Idle,
    /// Text is being revealed.
    Typing,
    /// A non-final page is complete.
    AwaitingPage,
    /// The line is complete and the node has no choices.
    AwaitingAdvance,
    /// The node's choices are waiting for a selection.
    AwaitingChoice,
}

struct Session {
    id: String,
    graph: DialogueGraph,
    node_id: String,
    previous_mode: GameMode,
}

enum Reveal {
    Tick(f32),
    Skip,
}

/// Runs dialogue sessions against a [`GameContext`].
pub struct DialogueEngine<V> {
    source: Box<dyn DialogueSource>,
    view: V,
    typewriter: Typewriter,
    chaos: Option<ChaosEffect>,
    session: Option<Session>,
    choices_visible: bool,
}

impl<V: DialogueView> fmt::Debug for DialogueEngine<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogueEngine")
            .field("dialogue", &self.dialogue_id())
            .field("node", &self.current_node_id())
            .field("choices_visible", &self.choices_visible)
            .finish_non_exhaustive()
    }
}

impl<V: DialogueView> DialogueEngine<V> {
    /// Create an idle engine.
    pub fn new(source: impl DialogueSource + 'static, view: V, config: TypewriterConfig) -> Self {
        Self {
            source: Box::new(source),
            view,
            typewriter: Typewriter::new(config),
            chaos: None,
            session: None,
            choices_visible: false,
        }
    }

    /// Corrupt revealed text according to player sanity.
    pub fn with_chaos(mut self, chaos: ChaosEffect) -> Self {
        self.chaos = Some(chaos);
        self
    }

    /// Start a dialogue, ending any active one first.
    ///
    /// Returns `false` and stays idle if the graph cannot be loaded or has
    /// no nodes.
    pub fn start(&mut self, ctx: &mut GameContext, dialogue_id: &str) -> bool {
        if let Some(current) = self.dialogue_id() {
            info!(%current, next = %dialogue_id, "replacing active dialogue");
            self.end(ctx);
        }

        let graph = match self.source.load(dialogue_id) {
            Ok(graph) => graph,
            Err(err) => {
                error!(%dialogue_id, %err, "failed to load dialogue");
                return false;
            }
        };
        let Some(start) = graph.start_node_id().map(str::to_string) else {
            error!(%dialogue_id, "dialogue has no nodes");
            return false;
        };

        let previous_mode = match ctx.mode() {
            GameMode::Dialogue => GameMode::Explore,
            mode => mode,
        };
        ctx.set_mode(GameMode::Dialogue);
        ctx.publish(GameEvent::DialogueStarted {
            dialogue_id: dialogue_id.to_string(),
        });
        info!(%dialogue_id, %start, "dialogue started");

        self.session = Some(Session {
            id: dialogue_id.to_string(),
            graph,
            node_id: start.clone(),
            previous_mode,
        });
        self.typewriter.clear_history();
        self.enter_node(ctx, start);
        true
    }

    /// Move past a node without choices. Ends the session when the node
    /// has no successor.
    pub fn advance(&mut self, ctx: &mut GameContext) {
        let Some(node) = self.current_node() else {
            warn!("advance while no dialogue is active");
            return;
        };
        if node.has_choices() {
            debug!("advance ignored; node waits for a choice");
            return;
        }
        match node.next().map(str::to_string) {
            Some(next) => self.enter_node(ctx, next),
            None => self.end(ctx),
        }
    }

    /// Take choice `index` of the current node.
    ///
    /// Returns `false` without changing anything when idle, when the node
    /// has no choices, or when `index` is out of range.
    pub fn select_choice(&mut self, ctx: &mut GameContext, index: usize) -> bool {
        let Some(node) = self.current_node() else {
            warn!(index, "select_choice while no dialogue is active");
            return false;
        };
        if !node.has_choices() {
            warn!(index, "select_choice on a node without choices");
            return false;
        }
        let Some(choice) = node.choices.get(index).cloned() else {
            warn!(index, available = node.choices.len(), "choice index out of range");
            return false;
        };

        debug!(index, text = %choice.text, "choice selected");
        self.hide_choices();
        self.typewriter.clear_history();
        self.typewriter.stop();
        run_commands(&choice.commands, ctx);
        match choice.next().map(str::to_string) {
            Some(next) => self.enter_node(ctx, next),
            None => self.end(ctx),
        }
        true
    }

    /// Finish the reveal if typing; otherwise show the next page, or
    /// advance when the node has no choices.
    pub fn skip_typewriter(&mut self, ctx: &mut GameContext) {
        if !self.is_active() {
            warn!("skip_typewriter while no dialogue is active");
            return;
        }
        if self.typewriter.is_typing() {
            self.reveal(ctx.player(), Reveal::Skip);
            return;
        }
        if self.typewriter.is_awaiting_page() {
            self.next_page();
            return;
        }
        if self.current_node().is_some_and(DialogueNode::has_choices) {
            debug!("skip ignored; waiting for a choice");
            return;
        }
        self.advance(ctx);
    }

    /// Route a generic submit/click intent.
    ///
    /// Ignored while choices are on screen. Returns whether the input was
    /// consumed.
    pub fn submit(&mut self, ctx: &mut GameContext) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.choices_visible {
            debug!("submit ignored while choices are shown");
            return false;
        }
        self.skip_typewriter(ctx);
        true
    }

    /// Drive the typewriter by `dt` seconds.
    pub fn tick(&mut self, ctx: &GameContext, dt: f32) {
        if self.is_active() && self.typewriter.is_typing() {
            self.reveal(ctx.player(), Reveal::Tick(dt));
        }
    }

    /// End the session and restore the mode that was active before it.
    /// Does nothing when idle.
    pub fn end(&mut self, ctx: &mut GameContext) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.typewriter.clear();
        self.hide_choices();
        self.view.hide();
        if ctx.mode() == GameMode::Dialogue {
            ctx.set_mode(session.previous_mode);
        }
        info!(dialogue_id = %session.id, restored = %ctx.mode(), "dialogue ended");
        ctx.publish(GameEvent::DialogueEnded {
            dialogue_id: session.id,
        });
    }

    /// React to a game-mode change made by someone else. Leaving
    /// [`GameMode::Dialogue`] ends the session.
    pub fn on_mode_changed(&mut self, ctx: &mut GameContext, mode: GameMode) {
        if self.is_active() && mode != GameMode::Dialogue {
            warn!(%mode, "game mode left dialogue; ending session");
            self.end(ctx);
        }
    }

    /// Whether a session is active.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The current phase.
    pub fn phase(&self) -> DialoguePhase {
        if self.session.is_none() {
            DialoguePhase::Idle
        } else if self.typewriter.is_typing() {
            DialoguePhase::Typing
        } else if self.typewriter.is_awaiting_page() {
            DialoguePhase::AwaitingPage
        } else if self.current_node().is_some_and(DialogueNode::has_choices) {
            DialoguePhase::AwaitingChoice
        } else {
            DialoguePhase::AwaitingAdvance
        }
    }

    /// Id of the active dialogue.
    pub fn dialogue_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    /// Id of the current node.
    pub fn current_node_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.node_id.as_str())
    }

    /// The current node.
    pub fn current_node(&self) -> Option<&DialogueNode> {
        let session = self.session.as_ref()?;
        session.graph.node(&session.node_id)
    }

    /// Labels of the current node's choices.
    pub fn choices(&self) -> Vec<&str> {
        self.current_node()
            .map(|node| node.choices.iter().map(|c| c.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Whether choices are on screen.
    pub fn choices_visible(&self) -> bool {
        self.choices_visible
    }

    /// The typewriter.
    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    /// The presentation surface.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The presentation surface, mutably.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn enter_node(&mut self, ctx: &mut GameContext, node_id: String) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let node = session.graph.node(&node_id).cloned();

        if node_id == END_NODE {
            if let Some(node) = node {
                run_commands(&node.commands, ctx);
            }
            self.end(ctx);
            return;
        }
        let Some(node) = node else {
            error!(dialogue_id = %session.id, node = %node_id, "unknown dialogue node; ending");
            self.end(ctx);
            return;
        };

        session.node_id = node_id.clone();
        let dialogue_id = session.id.clone();
        debug!(%dialogue_id, node = %node_id, "entering node");
        ctx.publish(GameEvent::NodeEntered {
            dialogue_id,
            node_id,
        });

        run_commands(&node.commands, ctx);
        self.hide_choices();
        let event = self.typewriter.show_line(&node.speaker, &node.text);
        let shown = self.typewriter.transcript();
        self.view.show_text(&node.speaker, &shown);
        if let Some(event) = event {
            self.on_typewriter(event);
        }
    }

    fn reveal(&mut self, player: &PlayerStats, step: Reveal) {
        let typewriter = &mut self.typewriter;
        let event = match self.chaos.as_mut() {
            Some(chaos) => {
                let probability = chaos.probability(player);
                let mut corruption = chaos.at(probability);
                match step {
                    Reveal::Tick(dt) => typewriter.tick(dt, &mut corruption),
                    Reveal::Skip => typewriter.skip(&mut corruption),
                }
            }
            None => match step {
                Reveal::Tick(dt) => typewriter.tick(dt, &mut Identity),
                Reveal::Skip => typewriter.skip(&mut Identity),
            },
        };
        let shown = self.typewriter.transcript();
        self.view.show_text(self.typewriter.speaker(), &shown);
        if let Some(event) = event {
            self.on_typewriter(event);
        }
    }

    fn next_page(&mut self) {
        let Some(started) = self.typewriter.next_page() else {
            return;
        };
        let shown = self.typewriter.transcript();
        self.view.show_text(self.typewriter.speaker(), &shown);
        if let Some(event) = started {
            self.on_typewriter(event);
        }
    }

    fn on_typewriter(&mut self, event: TypewriterEvent) {
        let shown = self.typewriter.transcript();
        self.view.text_complete(self.typewriter.speaker(), &shown);
        match event {
            TypewriterEvent::PageComplete { page, remaining } => {
                debug!(page, remaining, "page complete");
            }
            TypewriterEvent::LineComplete => {
                let choices: Vec<String> = self.choices().into_iter().map(str::to_string).collect();
                if !choices.is_empty() {
                    self.view.show_choices(&choices);
                    self.choices_visible = true;
                }
            }
        }
    }

    fn hide_choices(&mut self) {
        self.view.clear_choices();
        self.choices_visible = false;
    }
}
