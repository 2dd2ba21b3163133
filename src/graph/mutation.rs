//! Structural mutations understood by the graph store.
//!
//! The four canonical mutations (`AddNode`, `RemoveNode`, `AddEdge`,
//! `RemoveEdge`) are what callers issue. `UpdateNode`/`UpdateEdge` replace a
//! record wholesale, `Batch` groups several mutations into one atomic unit,
//! and `Restore`/`Discard` are the exact inverses the store hands back for
//! removals so undo puts records back in their original list slots.

use super::id::{EdgeId, NodeId};
use super::node::{Edge, Node};

/// Records taken out of the store together, with their list indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Removal {
    /// Removed nodes in ascending original index order.
    pub nodes: Vec<(usize, Node)>,
    /// Removed edges in ascending original index order.
    pub edges: Vec<(usize, Edge)>,
}

impl Removal {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|(_, n)| &n.id)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.iter().map(|(_, e)| &e.id)
    }
}

/// One reversible change to the graph store.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Append a node (top of the z-order).
    AddNode(Node),
    /// Remove a node, its descendants, and every edge touching them.
    RemoveNode(NodeId),
    /// Append an edge.
    AddEdge(Edge),
    /// Remove a single edge.
    RemoveEdge(EdgeId),
    /// Replace the node with the same id, keeping its list slot.
    UpdateNode(Node),
    /// Replace the edge with the same id, keeping its list slot.
    UpdateEdge(Edge),
    /// Reinsert previously removed records at their original slots.
    Restore(Removal),
    /// Remove exactly the listed records (inverse of `Restore`).
    Discard(Removal),
    /// Several mutations applied as one unit.
    Batch(Vec<Mutation>),
}

impl Mutation {
    /// Short name for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::AddNode(_) => "add-node",
            Mutation::RemoveNode(_) => "remove-node",
            Mutation::AddEdge(_) => "add-edge",
            Mutation::RemoveEdge(_) => "remove-edge",
            Mutation::UpdateNode(_) => "update-node",
            Mutation::UpdateEdge(_) => "update-edge",
            Mutation::Restore(_) => "restore",
            Mutation::Discard(_) => "discard",
            Mutation::Batch(_) => "batch",
        }
    }

    /// Whether applying this would change nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            Mutation::Batch(items) => items.iter().all(Mutation::is_noop),
            Mutation::Restore(r) | Mutation::Discard(r) => r.is_empty(),
            _ => false,
        }
    }
}
