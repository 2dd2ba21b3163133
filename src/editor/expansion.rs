//! Placeholder expansion.
//!
//! A placeholder is an open insertion point. Expanding it with a chosen kind
//! replaces it in place (same id, position, parent and constraints) by a
//! concrete node, then grows the pipeline:
//!
//! ```text
//!  [A] ──▶ ( + )            [A] ──▶ [B] ──▶ ( + )
//!                 expand B
//!                ────────▶        ╲
//!                                  ╲─▶ ( + )   branch slot, when A sits in
//!                                              a multi-slot container
//! ```
//!
//! Everything an expansion does is a single history entry.

use std::collections::HashMap;

use super::container::state_of;
use super::history::History;
use super::menu::{is_compatible, SelectionMenu};
use crate::config::{default_size, ContainerSettings, EditorConfig, LayoutSettings, NodeSizes};
use crate::error::{EditorError, Result};
use crate::geometry::fit_children;
use crate::graph::{Edge, EdgeId, EdgeKind, GraphStore, Mutation, Node, NodeData, NodeId, NodeKind};
use crate::types::{Point, Rect};

/// What an expansion created.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// The concrete node; it keeps the placeholder's id.
    pub node: NodeId,
    /// Edge from the concrete node to its downstream placeholder.
    pub edge: Option<EdgeId>,
    /// Every placeholder spawned: downstream first, then the entry point of a
    /// new container, then a branch slot.
    pub placeholders: Vec<NodeId>,
}

/// Turns placeholders into concrete nodes and lays out the next ones.
#[derive(Debug, Clone, Default)]
pub struct ExpansionEngine {
    layout: LayoutSettings,
    sizes: NodeSizes,
    containers: ContainerSettings,
}

impl ExpansionEngine {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            sizes: config.sizes.clone(),
            containers: config.containers.clone(),
        }
    }

    /// Kind of whatever feeds `placeholder`: the source of its first incoming
    /// edge, else the container it sits in, else nothing (an entry point).
    pub fn source_kind(store: &GraphStore, placeholder: &Node) -> Option<NodeKind> {
        feeder(store, &placeholder.id)
            .map(|n| n.kind)
            .or_else(|| {
                placeholder
                    .parent_id
                    .as_ref()
                    .and_then(|p| store.node(p))
                    .map(|p| p.kind)
            })
    }

    /// Kinds `id` may currently expand into.
    pub fn options(
        &self,
        store: &GraphStore,
        menu: &dyn SelectionMenu,
        id: &NodeId,
    ) -> Result<Vec<NodeKind>> {
        let placeholder = self.placeholder(store, id)?;
        let source = Self::source_kind(store, placeholder);
        Ok(menu
            .compatible_kinds(source)
            .into_iter()
            .filter(|k| !k.is_placeholder())
            .collect())
    }

    /// Expand placeholder `id` into a node of kind `chosen`.
    pub fn expand(
        &self,
        store: &mut GraphStore,
        history: &mut History,
        menu: &dyn SelectionMenu,
        id: &NodeId,
        chosen: NodeKind,
    ) -> Result<Expansion> {
        let placeholder = self.placeholder(store, id)?.clone();
        let source = Self::source_kind(store, &placeholder);
        if !is_compatible(menu, source, chosen) {
            let after = source.map_or("an entry point", |k| k.display_name());
            return Err(EditorError::InvalidExpansionTarget {
                id: id.clone(),
                reason: format!("{} is not offered after {}", chosen.display_name(), after),
            });
        }

        let mut concrete = placeholder.clone();
        concrete.kind = chosen;
        concrete.size = default_size(chosen, &self.sizes, &self.containers);
        concrete.data = NodeData::labeled(chosen.display_name());
        concrete.expanded = chosen.is_container().then_some(true);
        concrete.slot_cursor = 0;

        let mut mutations = vec![Mutation::UpdateNode(concrete.clone())];

        // Incoming placeholder edges now point at a real node
        for edge in store.incoming(id) {
            if edge.kind == EdgeKind::Placeholder {
                let mut rewired = edge.clone();
                rewired.kind = EdgeKind::Default;
                mutations.push(Mutation::UpdateEdge(rewired));
            }
        }

        let mut spawned: Vec<Node> = Vec::new();
        let mut new_edges: Vec<Edge> = Vec::new();
        let mut downstream_edge = None;

        if !menu.compatible_kinds(Some(chosen)).is_empty() {
            let position = self.next_position(store, &concrete);
            let next = self.placeholder_beside(store.fresh_node_id(), position, &concrete);
            let mut edge = Edge::new(
                store.fresh_edge_id(),
                concrete.id.clone(),
                next.id.clone(),
                EdgeKind::Placeholder,
            );
            edge.hidden = concrete.hidden;
            downstream_edge = Some(edge.id.clone());
            spawned.push(next);
            new_edges.push(edge);
        }

        if chosen.is_container() {
            let padding = self.layout.container_padding;
            let mut entry = Node::new(
                store.fresh_node_id(),
                NodeKind::Placeholder,
                Point::new(padding, padding),
                self.sizes.placeholder,
            )
            .with_parent(concrete.id.clone())
            .with_data(NodeData::labeled(NodeKind::Placeholder.display_name()));
            entry.hidden = concrete.hidden;
            entry.interactive = !concrete.hidden;
            spawned.push(entry);
        }

        let mut containers: HashMap<NodeId, Node> = HashMap::new();

        if let Some(feeder) = feeder(store, id).cloned() {
            if let Some((container, slot, position)) =
                self.branch_slot(store, &feeder, &concrete, &spawned)
            {
                let branch = self.placeholder_beside(store.fresh_node_id(), position, &feeder);
                let mut edge = Edge::new(
                    store.fresh_edge_id(),
                    feeder.id.clone(),
                    branch.id.clone(),
                    EdgeKind::Placeholder,
                );
                edge.hidden = branch.hidden;
                tracing::debug!(
                    "Branch placeholder {} in slot {} of {}",
                    branch.id,
                    slot,
                    container.id
                );
                spawned.push(branch);
                new_edges.push(edge);
                containers.insert(container.id.clone(), container);
            }
        }

        self.grow_containers(store, &concrete, &spawned, &mut containers);

        let placeholders: Vec<NodeId> = spawned.iter().map(|n| n.id.clone()).collect();
        mutations.extend(spawned.into_iter().map(Mutation::AddNode));
        mutations.extend(new_edges.into_iter().map(Mutation::AddEdge));
        mutations.extend(containers.into_values().map(Mutation::UpdateNode));

        history.apply(store, Mutation::Batch(mutations))?;
        tracing::info!(
            "Expanded placeholder {} into {} ({} new placeholders)",
            id,
            chosen.display_name(),
            placeholders.len()
        );

        Ok(Expansion {
            node: concrete.id,
            edge: downstream_edge,
            placeholders,
        })
    }

    fn placeholder<'a>(&self, store: &'a GraphStore, id: &NodeId) -> Result<&'a Node> {
        let node = store
            .node(id)
            .ok_or_else(|| EditorError::InvalidExpansionTarget {
                id: id.clone(),
                reason: "no such node".to_string(),
            })?;
        if !node.is_placeholder() {
            return Err(EditorError::InvalidExpansionTarget {
                id: id.clone(),
                reason: format!("{} is not a placeholder", node.kind.display_name()),
            });
        }
        Ok(node)
    }

    /// A placeholder sharing `sibling`'s parent, constraints and visibility.
    fn placeholder_beside(&self, id: NodeId, position: Point, sibling: &Node) -> Node {
        let mut node = Node::new(id, NodeKind::Placeholder, position, self.sizes.placeholder)
            .with_data(NodeData::labeled(NodeKind::Placeholder.display_name()));
        node.parent_id = sibling.parent_id.clone();
        node.constrain_to_parent = sibling.constrain_to_parent;
        node.extent_constrained = sibling.extent_constrained;
        node.hidden = sibling.hidden;
        node.interactive = sibling.interactive;
        node
    }

    /// Just past the concrete node along the chain axis. Inside a container
    /// the chain continues below the furthest sibling too.
    fn next_position(&self, store: &GraphStore, concrete: &Node) -> Point {
        let axis = self.layout.axis_for(concrete.parent_id.is_some());
        let mut far = concrete.local_rect().end(axis);
        if let Some(parent) = &concrete.parent_id {
            far = store
                .children(parent)
                .filter(|n| n.id != concrete.id)
                .map(|n| n.local_rect().end(axis))
                .fold(far, f64::max);
        }
        axis.with_coord(concrete.position, far + self.layout.gap)
    }

    /// Free slot for a branch placeholder fed by `feeder`, with the updated
    /// container record (cursor advanced).
    fn branch_slot(
        &self,
        store: &GraphStore,
        feeder: &Node,
        concrete: &Node,
        spawned: &[Node],
    ) -> Option<(Node, u32, Point)> {
        let container = store.node(feeder.parent_id.as_ref()?)?;
        let slots = container.kind.capabilities().slot_count;
        let used = store.outgoing(&feeder.id).count() as u32;
        if slots < 2 || used >= slots {
            return None;
        }

        let axis = self.layout.container_axis;
        let cross = axis.cross();
        let base = axis.with_coord(
            feeder.position,
            feeder.local_rect().end(axis) + self.layout.gap,
        );
        let stride = self.sizes.component.along(cross) + self.layout.gap;

        let occupied: Vec<Rect> = store
            .children(&container.id)
            .filter(|n| n.id != concrete.id)
            .chain(std::iter::once(concrete))
            .chain(spawned.iter().filter(|n| n.parent_id == feeder.parent_id))
            .map(Node::local_rect)
            .collect();

        (0..slots).find_map(|step| {
            let cursor = container.slot_cursor + step;
            let slot = cursor % slots;
            let position = base + cross.offset(f64::from(slot) * stride);
            let rect = Rect::new(position, self.sizes.placeholder);
            if occupied.iter().any(|r| r.intersects(&rect)) {
                return None;
            }
            let mut updated = container.clone();
            updated.slot_cursor = cursor + 1;
            Some((updated, slot, position))
        })
    }

    /// Enlarge expanded containers that received new children so everything
    /// fits with padding. Never shrinks.
    fn grow_containers(
        &self,
        store: &GraphStore,
        concrete: &Node,
        spawned: &[Node],
        containers: &mut HashMap<NodeId, Node>,
    ) {
        let mut parents: Vec<&NodeId> = spawned
            .iter()
            .chain(std::iter::once(concrete))
            .filter_map(|n| n.parent_id.as_ref())
            .filter(|p| *p != &concrete.id)
            .collect();
        parents.sort();
        parents.dedup();

        for parent in parents {
            let Some(current) = containers
                .get(parent)
                .cloned()
                .or_else(|| store.node(parent).cloned())
            else {
                continue;
            };
            if !state_of(&current, &self.containers).is_expanded() {
                continue;
            }

            let children = store
                .children(parent)
                .filter(|n| n.id != concrete.id)
                .chain(std::iter::once(concrete))
                .chain(spawned.iter())
                .filter(|n| n.parent_id.as_ref() == Some(parent))
                .map(Node::local_rect);
            let size = fit_children(children, self.layout.container_padding, current.size);
            if size != current.size {
                let mut grown = current;
                grown.size = size;
                tracing::debug!("Growing container {} to {}", grown.id, grown.size);
                containers.insert(parent.clone(), grown);
            }
        }
    }
}

/// Source node of the first edge into `id`.
fn feeder<'a>(store: &'a GraphStore, id: &NodeId) -> Option<&'a Node> {
    store
        .incoming(id)
        .next()
        .and_then(|e| store.node(&e.source_id))
}
