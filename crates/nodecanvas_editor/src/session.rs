// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session persistence: the graph being edited survives restarts.

use crate::settings::APP_DIR_NAME;
use nodecanvas_graph::Graph;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Session file name
pub const SESSION_FILE_NAME: &str = "session.json";

/// Errors reading or writing the session
#[derive(Debug, Error)]
pub enum SessionError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("Invalid session data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Location of the saved session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store the session at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default session path, `<data dir>/nodecanvas/session.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join(SESSION_FILE_NAME))
    }

    /// Path of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved graph. `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Graph>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let graph: Graph = serde_json::from_str(&content)?;
        tracing::info!(
            "Restored session with {} node(s) and {} connection(s)",
            graph.node_count(),
            graph.connection_count()
        );
        Ok(Some(graph))
    }

    /// Save the graph, creating parent directories as needed
    pub fn save(&self, graph: &Graph) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(graph)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)?;
        tracing::info!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Delete the saved session. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool, SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Deleted session {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;
    use nodecanvas_graph::{Node, NodeCategory, NodeState};

    fn sample_graph() -> Graph {
        let mut graph = Graph::new("Session");
        let a = graph.add_node(Node::new(NodeCategory::Teal, Pos2::new(10.0, 20.0)));
        let b = graph.add_node(Node::new(NodeCategory::Orange, Pos2::new(300.0, 40.0)));
        graph.connect(a, b).unwrap();
        graph
    }

    #[test]
    fn test_missing_session_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join(SESSION_FILE_NAME));

        assert!(!store.path().is_file());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("data").join(SESSION_FILE_NAME));
        let graph = sample_graph();

        store.save(&graph).unwrap();
        assert!(store.path().is_file());

        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored.name, "Session");
        assert_eq!(
            restored.node_ids().collect::<Vec<_>>(),
            graph.node_ids().collect::<Vec<_>>()
        );
        let categories: Vec<_> = restored.nodes().map(|n| n.category).collect();
        assert_eq!(categories, vec![NodeCategory::Teal, NodeCategory::Orange]);
        assert_eq!(restored.nodes().next().unwrap().position, [10.0, 20.0]);
        assert!(restored.nodes().all(|n| n.state() == NodeState::Idle));
        assert_eq!(restored.connection_count(), 1);
    }

    #[test]
    fn test_reset_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join(SESSION_FILE_NAME));
        store.save(&sample_graph()).unwrap();

        assert!(store.reset().unwrap());
        assert!(!store.path().is_file());
        assert!(!store.reset().unwrap());
    }

    #[test]
    fn test_corrupt_session_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        std::fs::write(&path, "{ \"name\": 3 }").unwrap();

        assert!(matches!(
            SessionStore::new(path).load(),
            Err(SessionError::Json(_))
        ));
    }
}
