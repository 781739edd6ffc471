//! Dialogue graph model.
//!
//! Graphs are authored as JSON documents:
//!
//! ```json
//! {
//!   "dialogueID": "intro",
//!   "startNode": "start",
//!   "nodes": {
//!     "start": { "speaker": "Mara", "text": "Hi", "nextNodeId": "end" },
//!     "end": {}
//!   }
//! }
//! ```
//!
//! Nodes are navigated by id. The sentinel id `"end"` terminates the
//! session without showing text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::command::DialogueCommand;
use crate::error::{DialogueError, DialogueResult};

/// Node id that ends the session when entered.
pub const END_NODE: &str = "end";

/// Node id preferred as the entry point.
pub const START_NODE: &str = "start";

/// A command as written in content: a name and string arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommand {
    /// Command name, matched case-insensitively.
    pub command: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl RawCommand {
    /// Build a command from a name and arguments.
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// One option offered at a branching node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueChoice {
    /// Label shown to the player.
    #[serde(default)]
    pub text: String,
    /// Node to move to. Absent or empty ends the session.
    #[serde(default, rename = "nextNodeId")]
    pub next_node_id: Option<String>,
    /// Commands run when the choice is taken.
    #[serde(default)]
    pub commands: Vec<RawCommand>,
}

impl DialogueChoice {
    /// The target node, ignoring empty ids.
    pub fn next(&self) -> Option<&str> {
        non_empty(self.next_node_id.as_deref())
    }
}

/// A single line of dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueNode {
    /// Who is speaking.
    #[serde(default)]
    pub speaker: String,
    /// The line itself.
    #[serde(default)]
    pub text: String,
    /// Commands run when the node is entered.
    #[serde(default)]
    pub commands: Vec<RawCommand>,
    /// Options; when present the node never auto-advances.
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
    /// Node to move to on advance. Only used without choices.
    #[serde(default, rename = "nextNodeId")]
    pub next_node_id: Option<String>,
}

impl DialogueNode {
    /// A node with a speaker and a line.
    pub fn line(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the next node.
    pub fn then(mut self, next: impl Into<String>) -> Self {
        self.next_node_id = Some(next.into());
        self
    }

    /// Add a choice.
    pub fn with_choice(mut self, text: impl Into<String>, next: impl Into<String>) -> Self {
        self.choices.push(DialogueChoice {
            text: text.into(),
            next_node_id: Some(next.into()),
            commands: Vec::new(),
        });
        self
    }

    /// Add a command.
    pub fn with_command(mut self, command: RawCommand) -> Self {
        self.commands.push(command);
        self
    }

    /// The target node, ignoring empty ids.
    pub fn next(&self) -> Option<&str> {
        non_empty(self.next_node_id.as_deref())
    }

    /// Whether the node branches.
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }
}

/// A loaded dialogue: nodes keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueGraph {
    /// Dialogue id.
    #[serde(default, rename = "dialogueID", alias = "dialogueId")]
    pub dialogue_id: String,
    /// Explicit entry node.
    #[serde(default, rename = "startNode", skip_serializing_if = "Option::is_none")]
    pub start_node: Option<String>,
    /// Nodes by id. Ordered so start-node fallback is deterministic.
    #[serde(default)]
    pub nodes: BTreeMap<String, DialogueNode>,
}

impl DialogueGraph {
    /// An empty graph.
    pub fn new(dialogue_id: impl Into<String>) -> Self {
        Self {
            dialogue_id: dialogue_id.into(),
            start_node: None,
            nodes: BTreeMap::new(),
        }
    }

    /// Parse a graph. A missing `dialogueID` is filled in from `id`.
    pub fn from_json(id: &str, json: &str) -> DialogueResult<Self> {
        let mut graph: Self = serde_json::from_str(json).map_err(|source| DialogueError::Parse {
            id: id.to_string(),
            source,
        })?;
        if graph.dialogue_id.is_empty() {
            graph.dialogue_id = id.to_string();
        }
        Ok(graph)
    }

    /// Add a node.
    pub fn with_node(mut self, id: impl Into<String>, node: DialogueNode) -> Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Set the explicit entry node.
    pub fn with_start(mut self, id: impl Into<String>) -> Self {
        self.start_node = Some(id.into());
        self
    }

    /// Look up a node.
    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node a session starts at.
    ///
    /// An explicit `startNode` wins if it exists, then a node named
    /// `"start"`, then the lexicographically first id.
    pub fn start_node_id(&self) -> Option<&str> {
        if let Some(start) = non_empty(self.start_node.as_deref()) {
            if self.nodes.contains_key(start) {
                return Some(start);
            }
            warn!(dialogue = %self.dialogue_id, %start, "startNode does not exist; falling back");
        }
        if self.nodes.contains_key(START_NODE) {
            return Some(START_NODE);
        }
        let first = self.nodes.keys().next().map(String::as_str);
        if let Some(first) = first {
            warn!(dialogue = %self.dialogue_id, node = %first, "no start node; using first node by id");
        }
        first
    }

    /// Check the graph for authoring problems.
    ///
    /// Reports every dangling `nextNodeId` as an error, and unknown
    /// commands as warnings in the returned list.
    pub fn validate(&self) -> Result<Vec<String>, Vec<DialogueError>> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.nodes.is_empty() {
            errors.push(DialogueError::Empty(self.dialogue_id.clone()));
        }
        let missing_start = non_empty(self.start_node.as_deref())
            .filter(|start| !self.nodes.contains_key(*start));
        if let Some(start) = missing_start {
            errors.push(self.unknown(start));
        }

        for (id, node) in &self.nodes {
            let targets = node
                .next()
                .into_iter()
                .chain(node.choices.iter().filter_map(DialogueChoice::next));
            for target in targets {
                if target != END_NODE && !self.nodes.contains_key(target) {
                    errors.push(self.unknown(target));
                }
            }

            let commands = node
                .commands
                .iter()
                .chain(node.choices.iter().flat_map(|c| c.commands.iter()));
            for raw in commands {
                if let DialogueCommand::Unknown { command, .. } = DialogueCommand::parse(raw) {
                    warnings.push(format!(
                        "{}/{id}: unrecognized command '{command}'",
                        self.dialogue_id
                    ));
                }
            }
            if node.has_choices() && node.next().is_some() {
                warnings.push(format!(
                    "{}/{id}: nextNodeId is ignored on a node with choices",
                    self.dialogue_id
                ));
            }
        }

        if errors.is_empty() { Ok(warnings) } else { Err(errors) }
    }

    fn unknown(&self, node: &str) -> DialogueError {
        DialogueError::UnknownNode {
            dialogue: self.dialogue_id.clone(),
            node: node.to_string(),
        }
    }
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTRO: &str = r#"{
        "dialogueID": "intro",
        "nodes": {
            "start": {"speaker": "Mara", "text": "Hi", "nextNodeId": "end"},
            "end": {}
        }
    }"#;

    #[test]
    fn parse_authoring_format() {
        let graph = DialogueGraph::from_json("intro", INTRO).unwrap();
        assert_eq!(graph.dialogue_id, "intro");
        assert_eq!(graph.len(), 2);
        let start = graph.node("start").unwrap();
        assert_eq!(start.speaker, "Mara");
        assert_eq!(start.next(), Some("end"));
        assert!(graph.node("end").unwrap().text.is_empty());
    }

    #[test]
    fn missing_id_filled_from_name() {
        let graph = DialogueGraph::from_json("cellar", r#"{"nodes": {"a": {}}}"#).unwrap();
        assert_eq!(graph.dialogue_id, "cellar");
    }

    #[test]
    fn parse_choices_and_commands() {
        let json = r#"{
            "dialogueID": "door",
            "nodes": {
                "start": {
                    "text": "Open it?",
                    "commands": [{"command": "flag", "args": ["set", "seen_door"]}],
                    "choices": [
                        {"text": "Yes", "nextNodeId": "open"},
                        {"text": "No", "nextNodeId": ""}
                    ]
                },
                "open": {"text": "Creak."}
            }
        }"#;
        let graph = DialogueGraph::from_json("door", json).unwrap();
        let start = graph.node("start").unwrap();
        assert_eq!(start.commands[0].args, vec!["set", "seen_door"]);
        assert_eq!(start.choices[0].next(), Some("open"));
        assert_eq!(start.choices[1].next(), None);
    }

    #[test]
    fn start_node_resolution() {
        let graph = DialogueGraph::new("d")
            .with_node("b", DialogueNode::default())
            .with_node("a", DialogueNode::default());
        assert_eq!(graph.start_node_id(), Some("a"));

        let graph = graph.with_node("start", DialogueNode::default());
        assert_eq!(graph.start_node_id(), Some("start"));

        let graph = graph.with_start("b");
        assert_eq!(graph.start_node_id(), Some("b"));

        let graph = graph.with_start("missing");
        assert_eq!(graph.start_node_id(), Some("start"));

        assert_eq!(DialogueGraph::new("empty").start_node_id(), None);
    }

    #[test]
    fn validate_reports_dangling_references() {
        let graph = DialogueGraph::new("d")
            .with_node("start", DialogueNode::line("", "x").then("nowhere"))
            .with_node("other", DialogueNode::line("", "y").then(END_NODE));
        let errors = graph.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            DialogueError::UnknownNode { node, .. } if node == "nowhere"
        ));
    }

    #[test]
    fn validate_warns_on_unknown_commands() {
        let graph = DialogueGraph::new("d").with_node(
            "start",
            DialogueNode::line("", "x").with_command(RawCommand::new("teleport", ["x"])),
        );
        let warnings = graph.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("teleport"));
    }

    #[test]
    fn empty_graph_is_invalid() {
        let errors = DialogueGraph::new("d").validate().unwrap_err();
        assert!(matches!(errors[0], DialogueError::Empty(_)));
    }
}
