//! Authoritative node/edge storage.
//!
//! The store owns two ordered lists (node order is z-order, last on top) and
//! the viewport transform. Reads are public; structural writes go through
//! [`GraphStore::apply`], which validates the graph invariants and returns
//! the exact inverse mutation. Only the history stack calls `apply`, which is
//! what keeps undo/redo correct.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::id::{EdgeId, NodeId};
use super::mutation::{Mutation, Removal};
use super::node::{Edge, Node};
use crate::error::{EditorError, Result};

/// Pan and zoom of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Nodes, edges and viewport of one editing session.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    viewport: Viewport,
    next_node: u64,
    next_edge: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw records, rejecting anything that breaks the
    /// graph invariants. Nothing is kept on failure.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>, viewport: Viewport) -> Result<Self> {
        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(node.id.clone()) {
                return Err(EditorError::DuplicateId(node.id.to_string()));
            }
        }
        let mut seen_edges = HashSet::new();
        for edge in &edges {
            if !seen_edges.insert(edge.id.clone()) {
                return Err(EditorError::DuplicateId(edge.id.to_string()));
            }
        }

        let store = Self {
            nodes,
            edges,
            viewport,
            next_node: 0,
            next_edge: 0,
        };

        for edge in &store.edges {
            store.check_endpoints(edge)?;
        }
        for node in &store.nodes {
            if let Some(parent) = &node.parent_id {
                store.check_parent(&node.id, parent)?;
            }
        }
        Ok(store)
    }

    // ==================== Reads ====================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_index(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge(id).is_some()
    }

    /// Direct children of `parent`, in z-order.
    pub fn children<'a>(&'a self, parent: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_ref() == Some(parent))
    }

    /// All nodes below `root` in the containment tree, breadth first.
    pub fn descendants(&self, root: &NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        let mut frontier = vec![root.clone()];
        while let Some(current) = frontier.pop() {
            for child in self.children(&current) {
                if &child.id != root && !out.contains(&child.id) {
                    out.push(child.id.clone());
                    frontier.push(child.id.clone());
                }
            }
        }
        out
    }

    /// Parent chain of `id`, nearest first. Stops early on a broken or
    /// cyclic chain.
    pub fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.node(id).and_then(|n| n.parent_id.clone());
        while let Some(parent) = current {
            if chain.contains(&parent) || &parent == id || chain.len() > self.nodes.len() {
                break;
            }
            current = self.node(&parent).and_then(|n| n.parent_id.clone());
            chain.push(parent);
        }
        chain
    }

    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.target_id == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source_id == id)
    }

    // ==================== Id allocation ====================

    /// Allocate an unused node id.
    pub fn fresh_node_id(&mut self) -> NodeId {
        loop {
            self.next_node += 1;
            let id = NodeId::numbered(self.next_node);
            if !self.contains_node(&id) {
                return id;
            }
        }
    }

    /// Allocate an unused edge id.
    pub fn fresh_edge_id(&mut self) -> EdgeId {
        loop {
            self.next_edge += 1;
            let id = EdgeId::numbered(self.next_edge);
            if !self.contains_edge(&id) {
                return id;
            }
        }
    }

    // ==================== Mutation ====================

    /// Validate and apply `mutation`, returning its inverse. On error the
    /// store is left exactly as it was.
    pub(crate) fn apply(&mut self, mutation: Mutation) -> Result<Mutation> {
        match mutation {
            Mutation::AddNode(node) => self.add_node(node),
            Mutation::RemoveNode(id) => self.remove_node(&id),
            Mutation::AddEdge(edge) => self.add_edge(edge),
            Mutation::RemoveEdge(id) => self.remove_edge(&id),
            Mutation::UpdateNode(node) => self.update_node(node),
            Mutation::UpdateEdge(edge) => self.update_edge(edge),
            Mutation::Restore(removal) => self.restore(removal),
            Mutation::Discard(removal) => {
                let nodes: Vec<NodeId> = removal.node_ids().cloned().collect();
                let edges: Vec<EdgeId> = removal.edge_ids().cloned().collect();
                self.discard(&nodes, &edges)
            }
            Mutation::Batch(items) => self.apply_batch(items),
        }
    }

    fn apply_batch(&mut self, items: Vec<Mutation>) -> Result<Mutation> {
        let mut inverses = Vec::with_capacity(items.len());
        for item in items {
            match self.apply(item) {
                Ok(inverse) => inverses.push(inverse),
                Err(e) => {
                    // Roll back the applied prefix so the batch is all-or-nothing
                    while let Some(inverse) = inverses.pop() {
                        if let Err(rollback) = self.apply(inverse) {
                            tracing::error!("Batch rollback failed: {}", rollback);
                        }
                    }
                    return Err(e);
                }
            }
        }
        inverses.reverse();
        Ok(Mutation::Batch(inverses))
    }

    fn add_node(&mut self, node: Node) -> Result<Mutation> {
        if self.contains_node(&node.id) {
            return Err(violation(EditorError::DuplicateId(node.id.to_string())));
        }
        if let Some(parent) = &node.parent_id {
            self.check_parent(&node.id, parent)?;
        }
        let id = node.id.clone();
        self.nodes.push(node);
        Ok(Mutation::RemoveNode(id))
    }

    fn remove_node(&mut self, id: &NodeId) -> Result<Mutation> {
        if !self.contains_node(id) {
            return Err(EditorError::NodeNotFound(id.clone()));
        }
        let mut ids = vec![id.clone()];
        ids.extend(self.descendants(id));
        let edges: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| ids.iter().any(|n| e.touches(n)))
            .map(|e| e.id.clone())
            .collect();
        self.discard(&ids, &edges)
    }

    fn add_edge(&mut self, edge: Edge) -> Result<Mutation> {
        if self.contains_edge(&edge.id) {
            return Err(violation(EditorError::DuplicateId(edge.id.to_string())));
        }
        self.check_endpoints(&edge)?;
        let id = edge.id.clone();
        self.edges.push(edge);
        Ok(Mutation::RemoveEdge(id))
    }

    fn remove_edge(&mut self, id: &EdgeId) -> Result<Mutation> {
        if !self.contains_edge(id) {
            return Err(EditorError::EdgeNotFound(id.clone()));
        }
        self.discard(&[], std::slice::from_ref(id))
    }

    fn update_node(&mut self, node: Node) -> Result<Mutation> {
        let index = self
            .node_index(&node.id)
            .ok_or_else(|| EditorError::NodeNotFound(node.id.clone()))?;
        if let Some(parent) = &node.parent_id {
            self.check_parent(&node.id, parent)?;
        }
        if !node.is_container() && self.children(&node.id).next().is_some() {
            return Err(violation(EditorError::NotAContainer(node.id.clone())));
        }
        let previous = std::mem::replace(&mut self.nodes[index], node);
        Ok(Mutation::UpdateNode(previous))
    }

    fn update_edge(&mut self, edge: Edge) -> Result<Mutation> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == edge.id)
            .ok_or_else(|| EditorError::EdgeNotFound(edge.id.clone()))?;
        self.check_endpoints(&edge)?;
        let previous = std::mem::replace(&mut self.edges[index], edge);
        Ok(Mutation::UpdateEdge(previous))
    }

    /// Remove exactly `node_ids` and `edge_ids`, remembering their slots.
    fn discard(&mut self, node_ids: &[NodeId], edge_ids: &[EdgeId]) -> Result<Mutation> {
        for id in node_ids {
            if !self.contains_node(id) {
                return Err(EditorError::NodeNotFound(id.clone()));
            }
        }
        for id in edge_ids {
            if !self.contains_edge(id) {
                return Err(EditorError::EdgeNotFound(id.clone()));
            }
        }
        // A surviving edge may not be left pointing at a removed node
        if let Some(edge) = self
            .edges
            .iter()
            .find(|e| !edge_ids.contains(&e.id) && node_ids.iter().any(|n| e.touches(n)))
        {
            let missing = if node_ids.contains(&edge.source_id) {
                edge.source_id.clone()
            } else {
                edge.target_id.clone()
            };
            return Err(violation(EditorError::DanglingEdgeRejected {
                edge: edge.id.clone(),
                missing,
            }));
        }

        let mut removal = Removal::default();

        let mut index = 0;
        let mut original = 0;
        while index < self.edges.len() {
            if edge_ids.contains(&self.edges[index].id) {
                removal.edges.push((original, self.edges.remove(index)));
            } else {
                index += 1;
            }
            original += 1;
        }

        let mut index = 0;
        let mut original = 0;
        while index < self.nodes.len() {
            if node_ids.contains(&self.nodes[index].id) {
                removal.nodes.push((original, self.nodes.remove(index)));
            } else {
                index += 1;
            }
            original += 1;
        }

        Ok(Mutation::Restore(removal))
    }

    fn restore(&mut self, removal: Removal) -> Result<Mutation> {
        for (_, node) in &removal.nodes {
            if self.contains_node(&node.id) {
                return Err(violation(EditorError::DuplicateId(node.id.to_string())));
            }
        }
        for (_, edge) in &removal.edges {
            if self.contains_edge(&edge.id) {
                return Err(violation(EditorError::DuplicateId(edge.id.to_string())));
            }
        }

        let inverse = Mutation::Discard(removal.clone());

        for (index, node) in removal.nodes {
            let at = index.min(self.nodes.len());
            self.nodes.insert(at, node);
        }
        for (index, edge) in removal.edges {
            let at = index.min(self.edges.len());
            self.edges.insert(at, edge);
        }
        Ok(inverse)
    }

    // ==================== Invariant checks ====================

    fn check_endpoints(&self, edge: &Edge) -> Result<()> {
        for endpoint in [&edge.source_id, &edge.target_id] {
            if !self.contains_node(endpoint) {
                return Err(EditorError::DanglingEdgeRejected {
                    edge: edge.id.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_parent(&self, node: &NodeId, parent: &NodeId) -> Result<()> {
        let parent_node = self
            .node(parent)
            .ok_or_else(|| EditorError::NodeNotFound(parent.clone()))?;
        if !parent_node.is_container() {
            return Err(violation(EditorError::NotAContainer(parent.clone())));
        }
        if parent == node || self.ancestors(parent).contains(node) {
            return Err(violation(EditorError::CyclicContainment {
                node: node.clone(),
                parent: parent.clone(),
            }));
        }
        Ok(())
    }
}

/// Report a contract violation before handing it back to the caller.
fn violation(err: EditorError) -> EditorError {
    tracing::error!("Graph invariant violation: {}", err);
    err
}
