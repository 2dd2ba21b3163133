//! # Pipeline Canvas: Graph-Editing Engine for Visual Pipeline Editors
//!
//! The engine behind a node-and-edge canvas where users assemble data
//! pipelines. It owns the graph, keeps every edit undoable and implements the
//! interactions that make such an editor pleasant to use: placeholders that
//! grow the pipeline as they are filled in, collapsible containers, and drag
//! gestures that merge, nest or detach nodes.
//!
//! ## Architecture
//!
//! - **Graph**: Ordered node/edge store with validated, invertible mutations
//! - **Geometry**: Local/global coordinate conversions and viewport mapping
//! - **Editor**: Undo history, placeholder expansion, container lifecycle and
//!   drag resolution behind one [`Editor`] facade
//! - **Config**: TOML editor settings and persisted container geometry
//!
//! ## Configuration
//!
//! Editor settings and container geometry are stored in the
//! platform-appropriate data directory under `dev.hxyulin.pipeline-canvas`:
//!
//! - **Linux**: `~/.local/share/dev.hxyulin.pipeline-canvas/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.pipeline-canvas/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.pipeline-canvas\`
//!
//! ## Example
//!
//! ```ignore
//! use pipeline_canvas::{config::EditorConfig, graph::NodeKind, Editor, Point};
//!
//! let mut editor = Editor::new(EditorConfig::load_or_default());
//! let entry = editor.add_placeholder(Point::ZERO, None)?;
//! let source = editor.expand(&entry, NodeKind::Source)?;
//! let filter = editor.expand(&source.placeholders[0], NodeKind::Filter)?;
//! editor.undo()?;
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod types;

// Re-export commonly used types
pub use config::{EditorConfig, FileGeometryStore, GeometryStore, MemoryGeometryStore};
pub use editor::{ContainerState, DropResolution, Editor, Expansion, SelectionMenu};
pub use error::{EditorError, Result};
pub use graph::{Edge, EdgeId, EdgeKind, GraphDocument, GraphStore, Node, NodeId, NodeKind};
pub use types::{LayoutAxis, Point, Rect, Size};
