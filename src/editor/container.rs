//! Container lifecycle: collapse, expand, resize.
//!
//! A container is either collapsed (fixed small size, children hidden and
//! unconstrained) or expanded (persisted or default size, children shown and
//! re-constrained). Collapsing never removes anything; only sizes and the
//! `hidden` / `extentConstrained` / `interactive` flags change, so every
//! child comes back at its previous relative position.
//!
//! ```text
//!            toggle (persist size, shrink, hide subtree)
//! Expanded ─────────────────────────────────────────────► Collapsed
//!    ▲                                                        │
//!    └────────────────────────────────────────────────────────┘
//!            toggle (restore size, reveal subtree)
//! ```

use std::collections::{HashMap, HashSet};

use super::history::History;
use crate::config::{ContainerSettings, GeometryStore};
use crate::error::{EditorError, Result};
use crate::graph::{Edge, GraphStore, Mutation, Node, NodeId};
use crate::types::Size;

/// Size state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Collapsed,
    Expanded,
}

impl ContainerState {
    pub fn is_expanded(self) -> bool {
        self == ContainerState::Expanded
    }
}

/// State of `node`: the explicit flag wins, otherwise anything taller than
/// the collapsed height counts as expanded.
pub fn state_of(node: &Node, settings: &ContainerSettings) -> ContainerState {
    let expanded = node
        .expanded
        .unwrap_or(node.size.height > settings.collapsed_height);
    if expanded {
        ContainerState::Expanded
    } else {
        ContainerState::Collapsed
    }
}

/// Whether children placed in `container` right now would be visible.
pub fn shows_children(container: &Node, settings: &ContainerSettings) -> bool {
    !container.hidden && state_of(container, settings).is_expanded()
}

/// Drives collapse/expand/resize of container nodes.
#[derive(Debug, Clone, Default)]
pub struct ContainerManager {
    settings: ContainerSettings,
    /// Container records as they were when a live resize started.
    resizing: HashMap<NodeId, Node>,
}

impl ContainerManager {
    pub fn new(settings: ContainerSettings) -> Self {
        Self {
            settings,
            resizing: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// Current state of the container `id`.
    pub fn state(&self, store: &GraphStore, id: &NodeId) -> Result<ContainerState> {
        let node = container(store, id)?;
        Ok(state_of(node, &self.settings))
    }

    /// Flip the container between collapsed and expanded, returning the new
    /// state. The whole flip is one history entry.
    pub fn toggle(
        &mut self,
        store: &mut GraphStore,
        history: &mut History,
        geometry: &mut dyn GeometryStore,
        id: &NodeId,
    ) -> Result<ContainerState> {
        if self.resizing.contains_key(id) {
            return Err(EditorError::Container(format!("{} is being resized", id)));
        }
        let node = container(store, id)?.clone();
        match state_of(&node, &self.settings) {
            ContainerState::Expanded => {
                self.collapse(store, history, geometry, node)?;
                Ok(ContainerState::Collapsed)
            }
            ContainerState::Collapsed => {
                self.expand(store, history, geometry, node)?;
                Ok(ContainerState::Expanded)
            }
        }
    }

    fn collapse(
        &self,
        store: &mut GraphStore,
        history: &mut History,
        geometry: &mut dyn GeometryStore,
        node: Node,
    ) -> Result<()> {
        let subtree: HashSet<NodeId> = store.descendants(&node.id).into_iter().collect();
        let mut mutations = Vec::new();

        let mut collapsed = node.clone();
        collapsed.size = self.settings.collapsed_size();
        collapsed.expanded = Some(false);
        mutations.push(Mutation::UpdateNode(collapsed));

        for child in store.nodes().iter().filter(|n| subtree.contains(&n.id)) {
            if child.hidden && !child.extent_constrained && !child.interactive {
                continue;
            }
            let mut hidden = child.clone();
            hidden.hidden = true;
            hidden.extent_constrained = false;
            hidden.interactive = false;
            mutations.push(Mutation::UpdateNode(hidden));
        }

        mutations.extend(edge_visibility(store.edges(), &subtree, &subtree, true));

        history.apply(store, Mutation::Batch(mutations))?;
        // Remember the expanded size for the next expansion
        if let Err(e) = geometry.set(&node.id, node.size) {
            tracing::warn!("Failed to persist geometry of {}: {}", node.id, e);
        }
        tracing::info!("Collapsed container {} ({} nodes hidden)", node.id, subtree.len());
        Ok(())
    }

    fn expand(
        &self,
        store: &mut GraphStore,
        history: &mut History,
        geometry: &mut dyn GeometryStore,
        node: Node,
    ) -> Result<()> {
        let size = geometry
            .get(&node.id)
            .unwrap_or(self.settings.default_expanded);

        let mut mutations = Vec::new();
        let mut expanded = node.clone();
        expanded.size = size;
        expanded.expanded = Some(true);
        mutations.push(Mutation::UpdateNode(expanded));

        // A container that is itself hidden keeps its subtree hidden
        let revealed = if node.hidden {
            HashSet::new()
        } else {
            self.visible_subtree(store, &node.id)
        };
        for child in store.nodes().iter().filter(|n| revealed.contains(&n.id)) {
            let mut shown = child.clone();
            shown.hidden = false;
            shown.extent_constrained = child.constrain_to_parent;
            shown.interactive = true;
            if &shown != child {
                mutations.push(Mutation::UpdateNode(shown));
            }
        }

        let subtree: HashSet<NodeId> = store.descendants(&node.id).into_iter().collect();
        mutations.extend(edge_visibility(store.edges(), &subtree, &revealed, false));

        history.apply(store, Mutation::Batch(mutations))?;
        tracing::info!(
            "Expanded container {} to {} ({} nodes shown)",
            node.id,
            size,
            revealed.len()
        );
        Ok(())
    }

    /// Descendants of `id` that become visible when it expands: its children,
    /// and recursively the children of any expanded child container.
    fn visible_subtree(&self, store: &GraphStore, id: &NodeId) -> HashSet<NodeId> {
        let mut visible = HashSet::new();
        let mut frontier = vec![id.clone()];
        while let Some(current) = frontier.pop() {
            for child in store.children(&current) {
                if !visible.insert(child.id.clone()) {
                    continue;
                }
                if child.is_container() && state_of(child, &self.settings).is_expanded() {
                    frontier.push(child.id.clone());
                }
            }
        }
        visible
    }

    /// Begin a live resize. Called implicitly by the first [`Self::resize`].
    pub fn begin_resize(&mut self, store: &GraphStore, id: &NodeId) -> Result<()> {
        let node = container(store, id)?;
        if !state_of(node, &self.settings).is_expanded() {
            return Err(EditorError::Container(format!(
                "cannot resize collapsed container {}",
                id
            )));
        }
        self.resizing
            .entry(id.clone())
            .or_insert_with(|| node.clone());
        Ok(())
    }

    /// Apply one frame of a live resize. Nothing is recorded or persisted
    /// until [`Self::end_resize`].
    pub fn resize(
        &mut self,
        store: &mut GraphStore,
        history: &History,
        id: &NodeId,
        size: Size,
    ) -> Result<Size> {
        self.begin_resize(store, id)?;
        let mut node = container(store, id)?.clone();
        node.size = Size::new(
            size.width.max(self.settings.collapsed_width),
            size.height.max(self.settings.collapsed_height + 1.0),
        );
        node.expanded = Some(true);
        let applied = node.size;
        history.preview(store, Mutation::UpdateNode(node))?;
        Ok(applied)
    }

    /// Finish a live resize: persist the final size and record the whole
    /// gesture as one history entry.
    pub fn end_resize(
        &mut self,
        store: &GraphStore,
        history: &mut History,
        geometry: &mut dyn GeometryStore,
        id: &NodeId,
    ) -> Result<Size> {
        let original = self.resizing.remove(id).ok_or_else(|| {
            EditorError::Container(format!("no resize in progress for {}", id))
        })?;
        let current = container(store, id)?.clone();
        let size = current.size;
        if current != original {
            history.commit_applied(Mutation::UpdateNode(current), Mutation::UpdateNode(original));
        }
        if let Err(e) = geometry.set(id, size) {
            tracing::warn!("Failed to persist geometry of {}: {}", id, e);
        }
        tracing::debug!("Resized container {} to {}", id, size);
        Ok(size)
    }

    /// Abort a live resize and put the original size back.
    pub fn cancel_resize(
        &mut self,
        store: &mut GraphStore,
        history: &History,
        id: &NodeId,
    ) -> Result<()> {
        if let Some(original) = self.resizing.remove(id) {
            history.preview(store, Mutation::UpdateNode(original))?;
        }
        Ok(())
    }

    /// Drop every in-flight resize without touching the store (the store
    /// was replaced wholesale).
    pub fn reset(&mut self) {
        self.resizing.clear();
    }

    pub fn is_resizing(&self) -> bool {
        !self.resizing.is_empty()
    }

    /// Last persisted expanded size of `id`, if any.
    pub fn restore_geometry(&self, geometry: &dyn GeometryStore, id: &NodeId) -> Option<Size> {
        geometry.get(id)
    }
}

fn container<'a>(store: &'a GraphStore, id: &NodeId) -> Result<&'a Node> {
    let node = store
        .node(id)
        .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
    if !node.is_container() {
        return Err(EditorError::NotAContainer(id.clone()));
    }
    Ok(node)
}

/// Updates setting `hidden` on edges internal to `subtree`. When hiding,
/// every internal edge is hidden; when showing, only edges whose endpoints
/// are both in `visible` come back.
fn edge_visibility(
    edges: &[Edge],
    subtree: &HashSet<NodeId>,
    visible: &HashSet<NodeId>,
    hide: bool,
) -> Vec<Mutation> {
    edges
        .iter()
        .filter(|e| subtree.contains(&e.source_id) && subtree.contains(&e.target_id))
        .filter_map(|e| {
            let target = if hide {
                true
            } else {
                !(visible.contains(&e.source_id) && visible.contains(&e.target_id))
            };
            (e.hidden != target).then(|| {
                let mut edge = e.clone();
                edge.hidden = target;
                Mutation::UpdateEdge(edge)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryGeometryStore, MockGeometryStore};
    use crate::graph::{EdgeId, EdgeKind, NodeKind, Viewport};
    use crate::types::Point;

    fn group_with_children() -> GraphStore {
        let group = Node::new(
            NodeId::from("g"),
            NodeKind::Group,
            Point::new(0.0, 0.0),
            Size::new(400.0, 300.0),
        );
        let a = Node::new(
            NodeId::from("a"),
            NodeKind::Filter,
            Point::new(20.0, 20.0),
            Size::new(180.0, 60.0),
        )
        .with_parent(NodeId::from("g"));
        let b = Node::new(
            NodeId::from("b"),
            NodeKind::Sink,
            Point::new(20.0, 120.0),
            Size::new(180.0, 60.0),
        )
        .with_parent(NodeId::from("g"));
        let edge = Edge::new(
            EdgeId::from("ab"),
            NodeId::from("a"),
            NodeId::from("b"),
            EdgeKind::Default,
        );
        GraphStore::from_parts(vec![group, a, b], vec![edge], Viewport::default()).unwrap()
    }

    #[test]
    fn test_state_inference() {
        let settings = ContainerSettings::default();
        let mut node = Node::new(
            NodeId::from("g"),
            NodeKind::Group,
            Point::ZERO,
            Size::new(220.0, 60.0),
        );
        assert_eq!(state_of(&node, &settings), ContainerState::Collapsed);
        node.size.height = 61.0;
        assert_eq!(state_of(&node, &settings), ContainerState::Expanded);
        node.expanded = Some(false);
        assert_eq!(state_of(&node, &settings), ContainerState::Collapsed);
    }

    #[test]
    fn test_collapse_hides_children_and_internal_edges() {
        let mut store = group_with_children();
        let mut history = History::default();
        let mut geometry = MemoryGeometryStore::new();
        let mut manager = ContainerManager::default();
        let g = NodeId::from("g");

        let state = manager
            .toggle(&mut store, &mut history, &mut geometry, &g)
            .unwrap();
        assert_eq!(state, ContainerState::Collapsed);
        assert_eq!(store.node(&g).unwrap().size, Size::new(220.0, 60.0));
        assert_eq!(geometry.get(&g), Some(Size::new(400.0, 300.0)));
        for child in store.children(&g) {
            assert!(child.hidden);
            assert!(!child.extent_constrained);
        }
        assert!(store.edges()[0].hidden);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_round_trip_restores_everything() {
        let mut store = group_with_children();
        let before = store.nodes().to_vec();
        let before_edges = store.edges().to_vec();
        let mut history = History::default();
        let mut geometry = MemoryGeometryStore::new();
        let mut manager = ContainerManager::default();
        let g = NodeId::from("g");

        manager.toggle(&mut store, &mut history, &mut geometry, &g).unwrap();
        manager.toggle(&mut store, &mut history, &mut geometry, &g).unwrap();

        for (old, new) in before.iter().zip(store.nodes()) {
            assert_eq!(old.size, new.size);
            assert_eq!(old.position, new.position);
            assert_eq!(old.hidden, new.hidden);
            assert_eq!(old.extent_constrained, new.extent_constrained);
        }
        assert_eq!(store.edges(), &before_edges[..]);
    }

    #[test]
    fn test_expand_falls_back_to_default_size() {
        let mut store = GraphStore::from_parts(
            vec![Node::new(
                NodeId::from("g"),
                NodeKind::Branch,
                Point::ZERO,
                Size::new(220.0, 60.0),
            )],
            vec![],
            Viewport::default(),
        )
        .unwrap();
        let mut history = History::default();
        let mut manager = ContainerManager::default();

        let mut geometry = MockGeometryStore::new();
        geometry.expect_get().return_const(None::<Size>);

        let state = manager
            .toggle(&mut store, &mut history, &mut geometry, &NodeId::from("g"))
            .unwrap();
        assert_eq!(state, ContainerState::Expanded);
        assert_eq!(
            store.node(&NodeId::from("g")).unwrap().size,
            ContainerSettings::default().default_expanded
        );
    }

    #[test]
    fn test_live_resize_persists_only_on_end() {
        let mut store = group_with_children();
        let mut history = History::default();
        let mut manager = ContainerManager::default();
        let g = NodeId::from("g");

        let mut geometry = MockGeometryStore::new();
        geometry
            .expect_set()
            .times(1)
            .withf(|id, size| id.as_str() == "g" && *size == Size::new(500.0, 350.0))
            .returning(|_, _| Ok(()));

        manager
            .resize(&mut store, &history, &g, Size::new(450.0, 320.0))
            .unwrap();
        manager
            .resize(&mut store, &history, &g, Size::new(500.0, 350.0))
            .unwrap();
        assert_eq!(history.undo_len(), 0);

        let size = manager
            .end_resize(&store, &mut history, &mut geometry, &g)
            .unwrap();
        assert_eq!(size, Size::new(500.0, 350.0));
        assert_eq!(history.undo_len(), 1);

        history.undo(&mut store).unwrap();
        assert_eq!(store.node(&g).unwrap().size, Size::new(400.0, 300.0));
    }

    #[test]
    fn test_resize_end_records_even_when_persisting_fails() {
        let mut store = group_with_children();
        let mut history = History::default();
        let mut manager = ContainerManager::default();
        let g = NodeId::from("g");

        let mut geometry = MockGeometryStore::new();
        geometry
            .expect_set()
            .times(1)
            .returning(|_, _| Err(EditorError::Config("disk full".to_string())));

        manager
            .resize(&mut store, &history, &g, Size::new(800.0, 700.0))
            .unwrap();
        let size = manager
            .end_resize(&store, &mut history, &mut geometry, &g)
            .unwrap();
        assert_eq!(size, Size::new(800.0, 700.0));
        assert!(!manager.is_resizing());
        assert_eq!(history.undo_len(), 1);

        history.undo(&mut store).unwrap();
        assert_eq!(store.node(&g).unwrap().size, Size::new(400.0, 300.0));
    }

    #[test]
    fn test_resize_rejected_when_collapsed() {
        let mut store = group_with_children();
        let mut history = History::default();
        let mut geometry = MemoryGeometryStore::new();
        let mut manager = ContainerManager::default();
        let g = NodeId::from("g");
        manager.toggle(&mut store, &mut history, &mut geometry, &g).unwrap();

        assert!(manager
            .resize(&mut store, &history, &g, Size::new(500.0, 500.0))
            .is_err());
    }

    #[test]
    fn test_toggle_non_container() {
        let mut store = group_with_children();
        let mut history = History::default();
        let mut geometry = MemoryGeometryStore::new();
        let mut manager = ContainerManager::default();
        let err = manager
            .toggle(&mut store, &mut history, &mut geometry, &NodeId::from("a"))
            .unwrap_err();
        assert!(matches!(err, EditorError::NotAContainer(_)));
    }
}
