//! Content packs: a directory of items, interactables, dialogues and config.
//!
//! ```text
//! content/
//!   reverie.json          optional PlayConfig
//!   items.json            [ItemDefinition]
//!   interactables.json    [InteractableDefinition]
//!   dialogues/<id>.json   one DialogueGraph per file
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rv_core::{ItemCatalog, ItemDefinition};
use rv_dialogue::{DialogueCommand, DialogueGraph, DialogueSource, DirectorySource};
use rv_rules::{Action, Condition, DefinitionLibrary};
use tracing::debug;

use crate::config::PlayConfig;
use crate::error::{PlayError, PlayResult};

/// Runtime config file name.
pub const CONFIG_FILE: &str = "reverie.json";
/// Item catalog file name.
pub const ITEMS_FILE: &str = "items.json";
/// Interactable definitions file name.
pub const INTERACTABLES_FILE: &str = "interactables.json";
/// Dialogue directory name.
pub const DIALOGUE_DIR: &str = "dialogues";

/// Everything loaded from a content directory.
#[derive(Debug, Clone)]
pub struct ContentPack {
    root: PathBuf,
    /// Item definitions.
    pub items: ItemCatalog,
    /// Interactable definitions.
    pub definitions: DefinitionLibrary,
    /// Runtime configuration.
    pub config: PlayConfig,
    dialogues: DirectorySource,
}

/// Findings from [`ContentPack::check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Dialogues inspected.
    pub dialogues: usize,
    /// Definitions inspected.
    pub definitions: usize,
    /// Items in the catalog.
    pub items: usize,
    /// Problems that will break play.
    pub errors: Vec<String>,
    /// Problems that make content inert.
    pub warnings: Vec<String>,
}

impl CheckReport {
    /// Whether no errors were found.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ContentPack {
    /// Load a content directory. Every file is optional.
    pub fn load(root: impl Into<PathBuf>) -> PlayResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(PlayError::MissingContent(root));
        }

        let items = match read_optional(&root.join(ITEMS_FILE))? {
            Some(json) => {
                let items: Vec<ItemDefinition> =
                    serde_json::from_str(&json).map_err(|source| PlayError::Json {
                        path: root.join(ITEMS_FILE),
                        source,
                    })?;
                ItemCatalog::from_items(items)
            }
            None => ItemCatalog::new(),
        };
        let definitions = match read_optional(&root.join(INTERACTABLES_FILE))? {
            Some(json) => DefinitionLibrary::from_json(&json)?,
            None => DefinitionLibrary::new(),
        };
        let config = PlayConfig::load(&root.join(CONFIG_FILE))?;
        let dialogues = DirectorySource::new(root.join(DIALOGUE_DIR));
        debug!(
            root = %root.display(),
            items = items.len(),
            definitions = definitions.len(),
            "content pack loaded"
        );

        Ok(Self {
            root,
            items,
            definitions,
            config,
            dialogues,
        })
    }

    /// The content directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The dialogue source.
    pub fn dialogues(&self) -> &DirectorySource {
        &self.dialogues
    }

    /// Ids of every dialogue file. Empty when there is no dialogue directory.
    pub fn dialogue_ids(&self) -> PlayResult<Vec<String>> {
        if !self.dialogues.root().is_dir() {
            return Ok(Vec::new());
        }
        Ok(self.dialogues.ids()?)
    }

    /// Validate every dialogue, definition and cross reference.
    pub fn check(&self) -> PlayResult<CheckReport> {
        let mut report = CheckReport {
            definitions: self.definitions.len(),
            items: self.items.len(),
            ..CheckReport::default()
        };

        let ids = self.dialogue_ids()?;
        let known: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        report.dialogues = ids.len();
        for id in &ids {
            match self.dialogues.load(id) {
                Ok(graph) => self.check_graph(&graph, &known, &mut report),
                Err(err) => report.errors.push(err.to_string()),
            }
        }

        report.warnings.extend(self.definitions.issues());
        for id in self.definitions.ids() {
            let Some(definition) = self.definitions.get(id) else {
                continue;
            };
            let actions = definition
                .rules
                .iter()
                .flat_map(|r| r.actions.iter())
                .chain(definition.use_item_rules.iter().flat_map(|r| r.actions.iter()));
            for action in actions {
                match action {
                    Action::StartDialogue { dialogue_id } if !known.contains(dialogue_id.as_str()) => {
                        report
                            .errors
                            .push(format!("{id}: start_dialogue references missing dialogue '{dialogue_id}'"));
                    }
                    Action::AddInventoryItem { item_id } => self.check_item(id, item_id, &mut report),
                    _ => {}
                }
            }
            let conditions = definition
                .rules
                .iter()
                .flat_map(|r| r.when.iter())
                .chain(definition.use_item_rules.iter().flat_map(|r| r.when.iter()));
            for condition in conditions {
                if let Condition::HasInventoryItem { item_id, .. } = condition {
                    self.check_item(id, item_id, &mut report);
                }
            }
        }

        let config = &self.config;
        let dialogue_refs = config
            .start_dialogue
            .iter()
            .map(|d| ("start_dialogue", d))
            .chain(config.triggers.iter().map(|t| ("trigger", &t.dialogue_id)));
        for (source, dialogue_id) in dialogue_refs {
            if !known.contains(dialogue_id.as_str()) {
                report
                    .errors
                    .push(format!("{CONFIG_FILE}: {source} references missing dialogue '{dialogue_id}'"));
            }
        }
        for instance in &config.instances {
            if self.definitions.get(&instance.definition).is_none() {
                report.errors.push(format!(
                    "{CONFIG_FILE}: instance '{}' uses unknown definition '{}'",
                    instance.name, instance.definition
                ));
            }
        }

        Ok(report)
    }

    fn check_graph(&self, graph: &DialogueGraph, known: &BTreeSet<&str>, report: &mut CheckReport) {
        match graph.validate() {
            Ok(warnings) => report.warnings.extend(warnings),
            Err(errors) => report.errors.extend(errors.iter().map(ToString::to_string)),
        }
        let commands = graph.nodes.values().flat_map(|node| {
            node.commands
                .iter()
                .chain(node.choices.iter().flat_map(|c| c.commands.iter()))
        });
        for raw in commands {
            match DialogueCommand::parse(raw) {
                DialogueCommand::StartDialogue(target) if !known.contains(target.as_str()) => {
                    report.errors.push(format!(
                        "{}: dialogue command references missing dialogue '{target}'",
                        graph.dialogue_id
                    ));
                }
                _ => {}
            }
        }
    }

    fn check_item(&self, owner: &str, item_id: &str, report: &mut CheckReport) {
        if !item_id.is_empty() && self.items.get(item_id).is_none() {
            report
                .warnings
                .push(format!("{owner}: item '{item_id}' is not in {ITEMS_FILE}"));
        }
    }
}

fn read_optional(path: &Path) -> PlayResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(Some(json)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PlayError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn empty_directory_loads() {
        let dir = tempfile::tempdir().unwrap();
        let pack = ContentPack::load(dir.path()).unwrap();
        assert!(pack.items.is_empty());
        assert!(pack.definitions.is_empty());
        assert!(pack.dialogue_ids().unwrap().is_empty());
        assert!(pack.check().unwrap().is_ok());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ContentPack::load(dir.path().join("nope")),
            Err(PlayError::MissingContent(_))
        ));
    }

    #[test]
    fn loads_all_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ITEMS_FILE, r#"[{"id": "key", "name": "Iron key"}]"#);
        write(
            dir.path(),
            INTERACTABLES_FILE,
            r#"[{"id": "door", "rules": [{"actions": [{"type": "start_dialogue", "dialogue_id": "intro"}]}]}]"#,
        );
        write(dir.path(), "dialogues/intro.json", r#"{"nodes": {"start": {"text": "Hi"}}}"#);
        write(dir.path(), CONFIG_FILE, r#"{"start_dialogue": "intro"}"#);

        let pack = ContentPack::load(dir.path()).unwrap();
        assert_eq!(pack.items.get("key").map(|i| i.name.as_str()), Some("Iron key"));
        assert_eq!(pack.definitions.ids(), vec!["door"]);
        assert_eq!(pack.dialogue_ids().unwrap(), vec!["intro"]);
        assert_eq!(pack.config.start_dialogue.as_deref(), Some("intro"));

        let report = pack.check().unwrap();
        assert!(report.is_ok(), "{:?}", report.errors);
        assert_eq!(report.dialogues, 1);
    }

    #[test]
    fn check_finds_broken_references() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            INTERACTABLES_FILE,
            r#"[{"id": "door", "rules": [{"actions": [
                {"type": "start_dialogue", "dialogue_id": "ghost"},
                {"type": "add_inventory_item", "item_id": "crowbar"}
            ]}]}]"#,
        );
        write(
            dir.path(),
            "dialogues/intro.json",
            r#"{"nodes": {"start": {"text": "Hi", "nextNodeId": "gone",
                "commands": [{"command": "dialogue", "args": ["phantom"]}]}}}"#,
        );
        write(dir.path(), "dialogues/broken.json", "{");
        write(dir.path(), CONFIG_FILE, r#"{"triggers": [{"flag": "x", "dialogue_id": "nope"}]}"#);

        let report = ContentPack::load(dir.path()).unwrap().check().unwrap();
        assert!(!report.is_ok());
        let errors = report.errors.join("\n");
        assert!(errors.contains("ghost"));
        assert!(errors.contains("gone"));
        assert!(errors.contains("phantom"));
        assert!(errors.contains("broken"));
        assert!(errors.contains("nope"));
        assert!(report.warnings.iter().any(|w| w.contains("crowbar")));
    }
}
