//! Drag resolution.
//!
//! While a node is dragged, [`DragResolver::on_drag_tick`] picks the drop
//! candidate under it without touching the graph. When the drag ends,
//! [`DragResolver::on_drag_end`] resolves to exactly one outcome:
//!
//! 1. **Merge** into a same-kind mergeable candidate (values are combined and
//!    the dragged node is removed)
//! 2. **Nest** into a container candidate (position converted to the
//!    container's local space)
//! 3. **Detach** from the current parent when dropped on nothing
//! 4. **Move** a top-level node dropped on nothing

use std::collections::HashSet;

use super::container::shows_children;
use super::history::History;
use crate::config::ContainerSettings;
use crate::error::{EditorError, Result};
use crate::geometry::{bounding_box, global_origin, to_global, to_local};
use crate::graph::{GraphStore, Mutation, Node, NodeId};
use crate::types::{Point, Rect};

/// State of the drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Node being dragged.
    pub node: NodeId,
    /// Pointer position minus the node's global origin at drag start.
    pub grab_offset: Point,
    /// Canvas-space box of the dragged node under the pointer.
    pub current: Rect,
    /// Node the dragged one would be dropped onto right now.
    pub candidate: Option<NodeId>,
}

/// How a drag ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DropResolution {
    /// Combined into `into`, whose value is now `value`.
    Merged { into: NodeId, value: f64 },
    /// Became a child of `parent`.
    Nested { parent: NodeId },
    /// Left `from` for the top level.
    Detached { from: NodeId },
    /// Plain reposition of a top-level node.
    Moved,
}

/// Tracks one drag at a time and turns its end into graph mutations.
#[derive(Debug, Clone, Default)]
pub struct DragResolver {
    containers: ContainerSettings,
    session: Option<DragSession>,
}

impl DragResolver {
    pub fn new(containers: ContainerSettings) -> Self {
        Self {
            containers,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Current drop candidate, for highlighting.
    pub fn candidate(&self) -> Option<&NodeId> {
        self.session.as_ref().and_then(|s| s.candidate.as_ref())
    }

    /// Start dragging `id` with the pointer at canvas point `pointer`.
    pub fn start_drag(&mut self, store: &GraphStore, id: &NodeId, pointer: Point) -> Result<()> {
        let current =
            bounding_box(store, id).ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        if let Some(node) = store.node(id) {
            if !node.interactive {
                return Err(EditorError::Drag(format!("{} is not interactive", id)));
            }
        }
        tracing::debug!("Drag started on {}", id);
        self.session = Some(DragSession {
            node: id.clone(),
            grab_offset: pointer - current.origin,
            current,
            candidate: None,
        });
        Ok(())
    }

    /// Follow the pointer; returns the candidate under the dragged node.
    pub fn drag_to(&mut self, store: &GraphStore, pointer: Point) -> Result<Option<NodeId>> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| EditorError::Drag("no drag in progress".to_string()))?;
        let node = session.node.clone();
        let pointer_box = Rect::new(pointer - session.grab_offset, session.current.size);
        Ok(self.on_drag_tick(store, &node, pointer_box))
    }

    /// Record where `dragged` is (`pointer_box`, canvas space) and pick the
    /// drop candidate. Never mutates the graph.
    pub fn on_drag_tick(
        &mut self,
        store: &GraphStore,
        dragged: &NodeId,
        pointer_box: Rect,
    ) -> Option<NodeId> {
        let candidate = find_candidate(store, dragged, pointer_box);
        match &mut self.session {
            Some(session) if &session.node == dragged => {
                session.current = pointer_box;
                session.candidate = candidate.clone();
            }
            _ => {
                let grab_offset = global_origin(store, dragged)
                    .map(|origin| pointer_box.origin - origin)
                    .unwrap_or(Point::ZERO);
                self.session = Some(DragSession {
                    node: dragged.clone(),
                    grab_offset,
                    current: pointer_box,
                    candidate: candidate.clone(),
                });
            }
        }
        candidate
    }

    /// Abort the drag; the graph was never touched.
    pub fn cancel_drag(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Resolve the end of the drag on `dragged` into one history entry.
    pub fn on_drag_end(
        &mut self,
        store: &mut GraphStore,
        history: &mut History,
        dragged: &NodeId,
    ) -> Result<DropResolution> {
        let session = match self.session.take() {
            Some(s) if &s.node == dragged => s,
            other => {
                self.session = other;
                return Err(EditorError::Drag(format!("no drag in progress for {}", dragged)));
            }
        };
        let node = store
            .node(dragged)
            .cloned()
            .ok_or_else(|| EditorError::NodeNotFound(dragged.clone()))?;
        let drop_at = session.current.origin;

        // The candidate may have vanished or changed since the last tick
        let target = session
            .candidate
            .as_ref()
            .and_then(|c| store.node(c))
            .filter(|t| is_eligible(store, &node, t))
            .cloned();

        let resolution = match target {
            Some(target) if node.kind.merges_into(target.kind) => {
                self.merge(store, history, node, target)?
            }
            Some(target) if target.is_container() => {
                self.nest(store, history, node, target, drop_at)?
            }
            _ => self.release(store, history, node, drop_at)?,
        };
        tracing::info!("Drag of {} resolved: {:?}", dragged, resolution);
        Ok(resolution)
    }

    fn merge(
        &self,
        store: &mut GraphStore,
        history: &mut History,
        node: Node,
        mut target: Node,
    ) -> Result<DropResolution> {
        let value = target.data.value.unwrap_or(0.0) + node.data.value.unwrap_or(0.0);
        target.data.value = Some(value);
        let into = target.id.clone();
        history.apply(
            store,
            Mutation::Batch(vec![
                Mutation::UpdateNode(target),
                Mutation::RemoveNode(node.id),
            ]),
        )?;
        Ok(DropResolution::Merged { into, value })
    }

    fn nest(
        &self,
        store: &mut GraphStore,
        history: &mut History,
        node: Node,
        target: Node,
        drop_at: Point,
    ) -> Result<DropResolution> {
        let visible = shows_children(&target, &self.containers);
        let mut nested = node.clone();
        nested.position = to_local(store, drop_at, Some(&target.id));
        nested.parent_id = Some(target.id.clone());
        nested.constrain_to_parent = true;
        nested.extent_constrained = visible;
        nested.hidden = !visible;
        nested.interactive = visible;

        let mut mutations = vec![Mutation::UpdateNode(nested)];
        if !visible {
            // Into a collapsed container: the dragged subtree goes dark too
            let subtree = store.descendants(&node.id);
            for id in &subtree {
                if let Some(child) = store.node(id) {
                    let mut hidden = child.clone();
                    hidden.hidden = true;
                    hidden.extent_constrained = false;
                    hidden.interactive = false;
                    mutations.push(Mutation::UpdateNode(hidden));
                }
            }
            let mut inside: HashSet<NodeId> = store.descendants(&target.id).into_iter().collect();
            inside.insert(node.id.clone());
            inside.extend(subtree);
            for edge in store.edges() {
                let internal =
                    inside.contains(&edge.source_id) && inside.contains(&edge.target_id);
                if !edge.hidden && internal {
                    let mut hidden = edge.clone();
                    hidden.hidden = true;
                    mutations.push(Mutation::UpdateEdge(hidden));
                }
            }
        }

        history.apply(store, Mutation::Batch(mutations))?;
        Ok(DropResolution::Nested { parent: target.id })
    }

    fn release(
        &self,
        store: &mut GraphStore,
        history: &mut History,
        node: Node,
        drop_at: Point,
    ) -> Result<DropResolution> {
        let mut released = node.clone();
        let resolution = match &node.parent_id {
            Some(parent) => {
                // Round-trip through the old parent's space so the node stays
                // exactly where it was dropped
                let local = to_local(store, drop_at, Some(parent));
                released.position = to_global(store, local, Some(parent));
                released.parent_id = None;
                released.constrain_to_parent = false;
                released.extent_constrained = false;
                released.hidden = false;
                released.interactive = true;
                DropResolution::Detached {
                    from: parent.clone(),
                }
            }
            None => {
                released.position = drop_at;
                DropResolution::Moved
            }
        };
        if released != node {
            history.apply(store, Mutation::UpdateNode(released))?;
        }
        Ok(resolution)
    }
}

/// Topmost visible node under `pointer_box` that `dragged` could be dropped
/// onto. Children draw above their ancestors, so a hit that contains another
/// hit loses to it regardless of list order. The dragged node and its own
/// subtree never qualify.
pub fn find_candidate(store: &GraphStore, dragged: &NodeId, pointer_box: Rect) -> Option<NodeId> {
    let node = store.node(dragged)?;
    let mut excluded: HashSet<NodeId> = store.descendants(dragged).into_iter().collect();
    excluded.insert(dragged.clone());

    let hits: Vec<&Node> = store
        .nodes()
        .iter()
        .rev()
        .filter(|t| !t.hidden && !excluded.contains(&t.id))
        .filter(|t| is_eligible(store, node, t))
        .filter(|t| {
            bounding_box(store, &t.id)
                .map(|b| b.intersects(&pointer_box))
                .unwrap_or(false)
        })
        .collect();

    hits.iter()
        .find(|hit| {
            !hits
                .iter()
                .any(|other| other.id != hit.id && store.ancestors(&other.id).contains(&hit.id))
        })
        .map(|t| t.id.clone())
}

/// Whether `target` accepts `dragged` as a merge or nest.
fn is_eligible(store: &GraphStore, dragged: &Node, target: &Node) -> bool {
    if target.id == dragged.id || store.ancestors(&target.id).contains(&dragged.id) {
        return false;
    }
    target.is_container() || dragged.kind.merges_into(target.kind)
}
