//! Graph data model and store.
//!
//! Nodes and edges live in a single [`GraphStore`]. Engines read from it
//! freely but never hold their own copies of the node/edge lists, and every
//! structural write is a [`Mutation`] applied through the history stack.
//!
//! ```text
//! [Source] ──► [Filter] ──► [+]            top level, horizontal chain
//!
//! ┌ Group ─────────────┐
//! │ [Transform]        │                    children in local space,
//! │     │              │                    vertical chain
//! │    [+]             │
//! └────────────────────┘
//! ```

pub mod document;
pub mod id;
pub mod kind;
pub mod mutation;
pub mod node;
pub mod store;

pub use document::GraphDocument;
pub use id::{EdgeId, NodeId};
pub use kind::{Capabilities, EdgeKind, NodeKind};
pub use mutation::{Mutation, Removal};
pub use node::{Edge, Node, NodeData};
pub use store::{GraphStore, Viewport};
