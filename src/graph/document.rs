//! Persisted graph document.
//!
//! The exported form of a session: `{ nodes, edges }` plus an optional
//! viewport for full-session snapshots. Import validates the whole document
//! before anything is built, so a document with a dangling edge is rejected
//! wholesale.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::node::{Edge, Node};
use super::store::{GraphStore, Viewport};
use crate::error::{EditorError, Result};

/// Graph document file extension
pub const DOCUMENT_FILE_EXTENSION: &str = "pipeline.json";

/// Current document format version
pub const DOCUMENT_VERSION: u32 = 1;

/// Serialized node/edge lists of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Document format version for future migration
    #[serde(default = "default_document_version")]
    pub version: u32,

    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    /// Present only in full-session snapshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

fn default_document_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for GraphDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: None,
        }
    }
}

impl GraphDocument {
    /// Export the graph in `store` (without the viewport).
    pub fn from_store(store: &GraphStore) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            nodes: store.nodes().to_vec(),
            edges: store.edges().to_vec(),
            viewport: None,
        }
    }

    /// Export the graph and the viewport.
    pub fn snapshot(store: &GraphStore) -> Self {
        Self {
            viewport: Some(store.viewport()),
            ..Self::from_store(store)
        }
    }

    /// Validate and build a store. A document that breaks any graph
    /// invariant is rejected as a whole.
    pub fn into_store(self) -> Result<GraphStore> {
        if self.version > DOCUMENT_VERSION {
            return Err(EditorError::Serialization(format!(
                "Unsupported document version {} (newest known is {})",
                self.version, DOCUMENT_VERSION
            )));
        }
        GraphStore::from_parts(self.nodes, self.edges, self.viewport.unwrap_or_default())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EditorError::Serialization(format!("Failed to read document {:?}: {}", path, e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            EditorError::Serialization(format!("Failed to parse document {:?}: {}", path, e))
        })
    }

    /// Save the document to disk as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| {
            EditorError::Serialization(format!("Failed to write document {:?}: {}", path, e))
        })?;

        tracing::debug!("Saved graph document to {:?}", path);
        Ok(())
    }
}
