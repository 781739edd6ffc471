//! Dialogue runtime for Reverie.
//!
//! Dialogue graphs are loaded from a [`DialogueSource`] and traversed by a
//! [`DialogueEngine`], which executes node commands through
//! [`rv_core::GameplayEffects`], reveals text through a paging
//! [`Typewriter`], and reports what should be on screen to a
//! [`DialogueView`].
//!
//! The engine is tick-driven: nothing blocks, and every input is safe to
//! send at any time.

/// Sanity-driven text corruption.
pub mod chaos;
/// Dialogue command vocabulary.
pub mod command;
/// The dialogue state machine.
pub mod engine;
/// Error types.
pub mod error;
/// Dialogue graph model.
pub mod graph;
/// Page splitting.
pub mod paging;
/// Graph sources.
pub mod source;
/// Incremental text reveal.
pub mod typewriter;
/// Presentation surfaces.
pub mod view;

pub use chaos::{ChaosConfig, ChaosEffect, CharTransform, Identity};
pub use command::{DialogueCommand, run_commands};
pub use engine::{DialogueEngine, DialoguePhase};
pub use error::{DialogueError, DialogueResult};
pub use graph::{DialogueChoice, DialogueGraph, DialogueNode, END_NODE, RawCommand, START_NODE};
pub use paging::{PageBudget, paginate};
pub use source::{DialogueSource, DirectorySource, MemorySource};
pub use typewriter::{CorruptionMode, Typewriter, TypewriterConfig, TypewriterEvent};
pub use view::{DialogueView, NullView, TranscriptView, ViewEvent};
