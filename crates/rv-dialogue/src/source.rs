//! Where dialogue graphs come from.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DialogueError, DialogueResult};
use crate::graph::DialogueGraph;

/// Loads dialogue graphs by id.
pub trait DialogueSource {
    /// Load the graph named `id`.
    fn load(&self, id: &str) -> DialogueResult<DialogueGraph>;
}

/// Graphs held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    graphs: HashMap<String, DialogueGraph>,
}

impl MemorySource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a graph under its own dialogue id.
    pub fn with(mut self, graph: DialogueGraph) -> Self {
        self.insert(graph);
        self
    }

    /// Add a graph under its own dialogue id.
    pub fn insert(&mut self, graph: DialogueGraph) {
        self.graphs.insert(graph.dialogue_id.clone(), graph);
    }

    /// Number of graphs.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether the source is empty.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

impl DialogueSource for MemorySource {
    fn load(&self, id: &str) -> DialogueResult<DialogueGraph> {
        self.graphs
            .get(id)
            .cloned()
            .ok_or_else(|| DialogueError::NotFound(id.to_string()))
    }
}

/// Graphs stored as `<root>/<id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// A source reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory graphs are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ids of every `.json` file in the directory, sorted.
    pub fn ids(&self) -> DialogueResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| DialogueError::Io {
            id: self.root.display().to_string(),
            source,
        })?;
        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && !id.contains(['/', '\\'])
            && id != "."
            && id != "..";
        valid.then(|| self.root.join(format!("{id}.json")))
    }
}

impl DialogueSource for DirectorySource {
    fn load(&self, id: &str) -> DialogueResult<DialogueGraph> {
        let path = self
            .path_for(id)
            .ok_or_else(|| DialogueError::NotFound(id.to_string()))?;
        debug!(path = %path.display(), "loading dialogue");
        let json = fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => DialogueError::NotFound(id.to_string()),
            _ => DialogueError::Io {
                id: id.to_string(),
                source,
            },
        })?;
        DialogueGraph::from_json(id, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DialogueNode;

    #[test]
    fn memory_source_loads_by_id() {
        let source = MemorySource::new()
            .with(DialogueGraph::new("intro").with_node("start", DialogueNode::line("A", "Hi")));
        assert_eq!(source.load("intro").unwrap().len(), 1);
        assert!(matches!(source.load("nope"), Err(DialogueError::NotFound(_))));
    }

    #[test]
    fn directory_source_reads_json_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("intro.json"),
            r#"{"nodes": {"start": {"text": "Hi"}}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(source.ids().unwrap(), vec!["broken", "intro"]);

        let graph = source.load("intro").unwrap();
        assert_eq!(graph.dialogue_id, "intro");
        assert!(matches!(source.load("broken"), Err(DialogueError::Parse { .. })));
        assert!(matches!(source.load("missing"), Err(DialogueError::NotFound(_))));
        assert!(matches!(source.load("../intro"), Err(DialogueError::NotFound(_))));
    }
}
