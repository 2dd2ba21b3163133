//! Editing engine for the pipeline canvas.
//!
//! [`Editor`] owns the graph store and the undo history and routes every
//! user gesture through one of the engines below. Each gesture becomes at
//! most one history entry, so a single undo always reverts a single gesture.
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!  gesture ─▶│ Editor                                       │
//!            │   ExpansionEngine   ContainerManager         │
//!            │   DragResolver      SelectionMenu (injected) │
//!            │           │                  │               │
//!            │           ▼                  ▼               │
//!            │        History ──apply──▶ GraphStore         │
//!            └──────────────────────────────────────────────┘
//!                                          │
//!                              GeometryStore (injected)
//! ```
//!
//! # Main Types
//!
//! - [`Editor`] - Facade over store, history and engines
//! - [`History`] - Linear undo/redo over [`Mutation`]s
//! - [`ExpansionEngine`] - Placeholder expansion and chain layout
//! - [`ContainerManager`] - Collapse/expand/resize of containers
//! - [`DragResolver`] - Drop candidate tracking and merge/nest/detach
//! - [`SelectionMenu`] - Kind compatibility lookup

pub mod container;
pub mod drag;
pub mod expansion;
pub mod history;
pub mod menu;

pub use container::{ContainerManager, ContainerState};
pub use drag::{DragResolver, DragSession, DropResolution};
pub use expansion::{Expansion, ExpansionEngine};
pub use history::{History, HistoryEntry};
pub use menu::{PipelineMenu, SelectionMenu};

use std::collections::HashMap;

use crate::config::{EditorConfig, GeometryStore, MemoryGeometryStore};
use crate::error::{EditorError, Result};
use crate::geometry::{canvas_to_screen, clamp_within, screen_to_canvas};
use crate::graph::{
    Edge, EdgeId, EdgeKind, GraphDocument, GraphStore, Mutation, Node, NodeData, NodeId, NodeKind,
    Viewport,
};
use crate::types::{Point, Rect, Size};

/// One editing session over one pipeline graph.
pub struct Editor {
    store: GraphStore,
    history: History,
    config: EditorConfig,
    expansion: ExpansionEngine,
    containers: ContainerManager,
    drag: DragResolver,
    menu: Box<dyn SelectionMenu>,
    geometry: Box<dyn GeometryStore>,
    /// Persisted sizes of containers removed through the editor, put back
    /// when an undo brings the container back.
    forgotten: HashMap<NodeId, Size>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("nodes", &self.store.nodes().len())
            .field("edges", &self.store.edges().len())
            .field("undo_depth", &self.history.undo_len())
            .field("redo_depth", &self.history.redo_len())
            .finish()
    }
}

impl Editor {
    /// Empty editor with the default menu and in-memory container geometry.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: GraphStore::new(),
            history: History::new(config.history.max_depth),
            expansion: ExpansionEngine::new(&config),
            containers: ContainerManager::new(config.containers.clone()),
            drag: DragResolver::new(config.containers.clone()),
            menu: Box::new(PipelineMenu),
            geometry: Box::new(MemoryGeometryStore::new()),
            forgotten: HashMap::new(),
            config,
        }
    }

    pub fn with_menu(mut self, menu: impl SelectionMenu + 'static) -> Self {
        self.menu = Box::new(menu);
        self
    }

    pub fn with_geometry_store(mut self, geometry: impl GeometryStore + 'static) -> Self {
        self.geometry = Box::new(geometry);
        self
    }

    // ==================== Accessors ====================

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.store.edge(id)
    }

    pub fn geometry_store(&self) -> &dyn GeometryStore {
        self.geometry.as_ref()
    }

    // ==================== Graph editing ====================

    /// Apply a raw mutation as one history entry.
    pub fn apply(&mut self, mutation: Mutation) -> Result<()> {
        self.ensure_idle()?;
        self.history.apply(&mut self.store, mutation)
    }

    /// Add a node of `kind` at `position` (local to `parent` when given).
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Point,
        parent: Option<&NodeId>,
    ) -> Result<NodeId> {
        self.ensure_idle()?;
        let id = self.store.fresh_node_id();
        let mut node = Node::new(id.clone(), kind, position, self.config.size_for(kind))
            .with_data(NodeData::labeled(kind.display_name()));
        if kind.is_container() {
            node.expanded = Some(true);
        }
        if let Some(parent) = parent {
            let container = self
                .store
                .node(parent)
                .ok_or_else(|| EditorError::NodeNotFound(parent.clone()))?;
            let visible = container::shows_children(container, self.containers.settings());
            node = node.with_parent(parent.clone());
            node.extent_constrained = visible;
            node.hidden = !visible;
            node.interactive = visible;
        }
        self.history.apply(&mut self.store, Mutation::AddNode(node))?;
        tracing::debug!("Added {} node {}", kind.display_name(), id);
        Ok(id)
    }

    /// Add an open placeholder.
    pub fn add_placeholder(&mut self, position: Point, parent: Option<&NodeId>) -> Result<NodeId> {
        self.add_node(NodeKind::Placeholder, position, parent)
    }

    /// Connect `source` to `target`. Edges into a placeholder are
    /// placeholder-kind.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId> {
        self.ensure_idle()?;
        let target_node = self.store.node(target);
        let kind = match target_node {
            Some(n) if n.is_placeholder() => EdgeKind::Placeholder,
            _ => EdgeKind::Default,
        };
        let hidden = [source, target]
            .iter()
            .any(|id| self.store.node(id).map(|n| n.hidden).unwrap_or(false));

        let id = self.store.fresh_edge_id();
        let mut edge = Edge::new(id.clone(), source.clone(), target.clone(), kind);
        edge.hidden = hidden;
        self.history.apply(&mut self.store, Mutation::AddEdge(edge))?;
        Ok(id)
    }

    /// Remove a node together with its subtree and every edge touching them.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<()> {
        self.ensure_idle()?;
        let mut removed = vec![id.clone()];
        removed.extend(self.store.descendants(id));
        let containers: Vec<NodeId> = removed
            .iter()
            .filter(|n| self.store.node(n).is_some_and(Node::is_container))
            .cloned()
            .collect();

        self.history
            .apply(&mut self.store, Mutation::RemoveNode(id.clone()))?;

        for container in containers {
            if let Some(size) = self.geometry.get(&container) {
                self.forgotten.insert(container.clone(), size);
            }
            if let Err(e) = self.geometry.remove(&container) {
                tracing::warn!("Failed to forget geometry of {}: {}", container, e);
            }
        }
        if self
            .drag
            .session()
            .is_some_and(|s| removed.contains(&s.node))
        {
            self.drag.cancel_drag();
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<()> {
        self.ensure_idle()?;
        self.history
            .apply(&mut self.store, Mutation::RemoveEdge(id.clone()))
    }

    /// Move a node to `position` in its parent's space. Extent-constrained
    /// nodes are clipped to the parent bounds.
    pub fn move_node(&mut self, id: &NodeId, position: Point) -> Result<Point> {
        self.ensure_idle()?;
        let mut node = self
            .store
            .node(id)
            .cloned()
            .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        let parent_size = node
            .parent_id
            .as_ref()
            .and_then(|p| self.store.node(p))
            .map(|p| p.size);
        node.position = match parent_size {
            Some(size) if node.extent_constrained => clamp_within(position, node.size, size),
            _ => position,
        };
        let applied = node.position;
        self.history.apply(&mut self.store, Mutation::UpdateNode(node))?;
        Ok(applied)
    }

    /// Replace a node's payload.
    pub fn set_data(&mut self, id: &NodeId, data: NodeData) -> Result<()> {
        self.ensure_idle()?;
        let mut node = self
            .store
            .node(id)
            .cloned()
            .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        node.data = data;
        self.history.apply(&mut self.store, Mutation::UpdateNode(node))
    }

    // ==================== Placeholder expansion ====================

    /// Kinds the placeholder `id` may expand into.
    pub fn expansion_options(&self, id: &NodeId) -> Result<Vec<NodeKind>> {
        self.expansion.options(&self.store, self.menu.as_ref(), id)
    }

    pub fn expand(&mut self, placeholder: &NodeId, chosen: NodeKind) -> Result<Expansion> {
        self.ensure_idle()?;
        self.expansion.expand(
            &mut self.store,
            &mut self.history,
            self.menu.as_ref(),
            placeholder,
            chosen,
        )
    }

    // ==================== Containers ====================

    pub fn container_state(&self, id: &NodeId) -> Result<ContainerState> {
        self.containers.state(&self.store, id)
    }

    pub fn toggle_container(&mut self, id: &NodeId) -> Result<ContainerState> {
        self.ensure_idle()?;
        self.containers.toggle(
            &mut self.store,
            &mut self.history,
            self.geometry.as_mut(),
            id,
        )
    }

    /// One frame of a live container resize.
    pub fn resize_container(&mut self, id: &NodeId, size: Size) -> Result<Size> {
        self.containers
            .resize(&mut self.store, &self.history, id, size)
    }

    /// Finish a live resize: persist and record it.
    pub fn end_resize(&mut self, id: &NodeId) -> Result<Size> {
        self.containers.end_resize(
            &self.store,
            &mut self.history,
            self.geometry.as_mut(),
            id,
        )
    }

    pub fn cancel_resize(&mut self, id: &NodeId) -> Result<()> {
        self.containers
            .cancel_resize(&mut self.store, &self.history, id)
    }

    /// Last persisted expanded size of `id`.
    pub fn restore_geometry(&self, id: &NodeId) -> Option<Size> {
        self.containers.restore_geometry(self.geometry.as_ref(), id)
    }

    // ==================== Dragging ====================

    pub fn start_drag(&mut self, id: &NodeId, pointer: Point) -> Result<()> {
        self.drag.start_drag(&self.store, id, pointer)
    }

    pub fn drag_to(&mut self, pointer: Point) -> Result<Option<NodeId>> {
        self.drag.drag_to(&self.store, pointer)
    }

    pub fn drag_tick(&mut self, id: &NodeId, pointer_box: Rect) -> Option<NodeId> {
        self.drag.on_drag_tick(&self.store, id, pointer_box)
    }

    pub fn end_drag(&mut self, id: &NodeId) -> Result<DropResolution> {
        self.ensure_idle()?;
        self.drag
            .on_drag_end(&mut self.store, &mut self.history, id)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel_drag();
    }

    pub fn drag_candidate(&self) -> Option<&NodeId> {
        self.drag.candidate()
    }

    // ==================== History ====================

    pub fn undo(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.history.undo(&mut self.store)?;
        self.sync_forgotten_geometry();
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.history.redo(&mut self.store)?;
        self.sync_forgotten_geometry();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Reject any history change while a live resize is pending; the
    /// resize is recorded against the store as it was when it started.
    fn ensure_idle(&self) -> Result<()> {
        if self.containers.is_resizing() {
            return Err(EditorError::Container(
                "finish the resize before editing further".to_string(),
            ));
        }
        Ok(())
    }

    /// Put back the persisted size of removed containers that undo/redo
    /// restored, and forget it again for those it removed.
    fn sync_forgotten_geometry(&mut self) {
        for (id, size) in &self.forgotten {
            let result = if self.store.contains_node(id) {
                if self.geometry.get(id).is_some() {
                    continue;
                }
                self.geometry.set(id, *size)
            } else {
                self.geometry.remove(id)
            };
            if let Err(e) = result {
                tracing::warn!("Failed to sync geometry of {}: {}", id, e);
            }
        }
    }

    // ==================== Viewport & documents ====================

    pub fn viewport(&self) -> Viewport {
        self.store.viewport()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.store.set_viewport(viewport);
    }

    /// Canvas-space position of a screen point under the current viewport.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        screen_to_canvas(self.store.viewport(), screen)
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        canvas_to_screen(self.store.viewport(), canvas)
    }

    /// Graph without the viewport.
    pub fn export_document(&self) -> GraphDocument {
        GraphDocument::from_store(&self.store)
    }

    /// Graph plus viewport.
    pub fn snapshot(&self) -> GraphDocument {
        GraphDocument::snapshot(&self.store)
    }

    /// Replace the whole graph. An invalid document is rejected and the
    /// current graph and history stay as they were.
    pub fn import_document(&mut self, document: GraphDocument) -> Result<()> {
        let viewport = document.viewport;
        let mut store = document.into_store()?;
        if viewport.is_none() {
            store.set_viewport(self.store.viewport());
        }
        tracing::info!(
            "Imported document with {} nodes and {} edges",
            store.nodes().len(),
            store.edges().len()
        );
        self.store = store;
        self.history.clear();
        self.forgotten.clear();
        self.drag.cancel_drag();
        self.containers.reset();
        Ok(())
    }
}
