//! Error handling for the pipeline canvas engine
//!
//! This module defines the error taxonomy shared by the graph store, the
//! editing engines and the persistence layer, plus a Result alias for use
//! throughout the crate.

use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Which end of the history a stack operation was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl std::fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryDirection::Undo => write!(f, "undo"),
            HistoryDirection::Redo => write!(f, "redo"),
        }
    }
}

/// Main error type for editor operations
#[derive(Error, Debug)]
pub enum EditorError {
    /// Placeholder expansion was rejected (unknown id, not a placeholder, or
    /// a kind the selection menu does not offer for the source)
    #[error("Invalid expansion target {id}: {reason}")]
    InvalidExpansionTarget { id: NodeId, reason: String },

    /// An edge references a node that does not exist
    #[error("Edge {edge} references missing node {missing}")]
    DanglingEdgeRejected { edge: EdgeId, missing: NodeId },

    /// Undo or redo was requested with an empty stack
    #[error("Nothing to {0}")]
    UnknownMutation(HistoryDirection),

    /// A node or edge id is already in use
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Re-parenting would make a node its own ancestor
    #[error("Cyclic containment: {node} cannot be placed inside {parent}")]
    CyclicContainment { node: NodeId, parent: NodeId },

    /// A node was used as a parent or container but is not container-kind
    #[error("Node {0} is not a container")]
    NotAContainer(NodeId),

    /// Lookup of a node id failed
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Lookup of an edge id failed
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// A drag operation was issued without a matching drag session
    #[error("Drag error: {0}")]
    Drag(String),

    /// Errors related to container size state
    #[error("Container error: {0}")]
    Container(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EditorError>,
    },
}

impl EditorError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EditorError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context wrappers and return the underlying error
    pub fn root(&self) -> &EditorError {
        match self {
            EditorError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error is a rejected user intent rather than a contract
    /// violation. Rejected intents leave the store untouched and are safe to
    /// ignore in the UI.
    pub fn is_rejected_intent(&self) -> bool {
        matches!(
            self.root(),
            EditorError::InvalidExpansionTarget { .. }
                | EditorError::UnknownMutation(_)
                | EditorError::DanglingEdgeRejected { .. }
        )
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Serialization(err.to_string())
    }
}

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EditorError::NodeNotFound(NodeId::from("node-7"));
        assert_eq!(err.to_string(), "Node not found: node-7");
    }

    #[test]
    fn test_error_with_context() {
        let err = EditorError::DuplicateId("node-1".to_string());
        let with_ctx = err.with_context("Failed to import document");
        assert!(with_ctx.to_string().contains("Failed to import document"));
        assert!(matches!(with_ctx.root(), EditorError::DuplicateId(_)));
    }

    #[test]
    fn test_dangling_edge_message() {
        let err = EditorError::DanglingEdgeRejected {
            edge: EdgeId::from("edge-3"),
            missing: NodeId::from("ghost"),
        };
        assert!(err.to_string().contains("edge-3"));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_rejected_intents() {
        assert!(EditorError::UnknownMutation(HistoryDirection::Undo).is_rejected_intent());
        assert!(EditorError::InvalidExpansionTarget {
            id: NodeId::from("p"),
            reason: "not found".to_string(),
        }
        .with_context("expand")
        .is_rejected_intent());
        assert!(!EditorError::CyclicContainment {
            node: NodeId::from("a"),
            parent: NodeId::from("b"),
        }
        .is_rejected_intent());
    }

    #[test]
    fn test_result_ext_context() {
        let res: Result<()> = Err(EditorError::Config("bad".to_string()));
        let err = res.context("loading editor.toml").unwrap_err();
        assert!(err.to_string().starts_with("loading editor.toml"));
    }
}
