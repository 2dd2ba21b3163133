//! Node and edge records held by the graph store.

use serde::{Deserialize, Serialize};

use super::id::{EdgeId, NodeId};
use super::kind::{EdgeKind, NodeKind};
use crate::types::{Point, Rect, Size};

/// Kind-specific payload. Opaque to the engine except for `value`, which
/// merging sums.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,
}

impl NodeData {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// A node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Position in the parent's local space, or canvas space without a parent.
    pub position: Point,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Effective clipping to the parent's bounds.
    #[serde(default)]
    pub extent_constrained: bool,
    /// Whether the node asked to be clipped when it joined its parent.
    /// `extent_constrained` is restored from this on re-expansion.
    #[serde(default)]
    pub constrain_to_parent: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_true")]
    pub interactive: bool,
    /// Explicit container state; `None` means infer from `size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    /// Next branch slot handed out by this container.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub slot_cursor: u32,
    #[serde(default)]
    pub data: NodeData,
}

fn default_true() -> bool {
    true
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl Node {
    /// Create a top-level, visible node.
    pub fn new(id: NodeId, kind: NodeKind, position: Point, size: Size) -> Self {
        Self {
            id,
            kind,
            position,
            size,
            parent_id: None,
            extent_constrained: false,
            constrain_to_parent: false,
            hidden: false,
            interactive: true,
            expanded: None,
            slot_cursor: 0,
            data: NodeData::default(),
        }
    }

    /// Place the node inside `parent`, clipped to its bounds.
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent_id = Some(parent);
        self.extent_constrained = true;
        self.constrain_to_parent = true;
        self
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    /// Bounding box in the node's own coordinate space (the parent's).
    pub fn local_rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind.is_placeholder()
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source_id: NodeId,
    pub target_id: NodeId,
    #[serde(default)]
    pub kind: EdgeKind,
    #[serde(default)]
    pub hidden: bool,
}

impl Edge {
    pub fn new(id: EdgeId, source_id: NodeId, target_id: NodeId, kind: EdgeKind) -> Self {
        Self {
            id,
            source_id,
            target_id,
            kind,
            hidden: false,
        }
    }

    /// Whether `node` is either endpoint.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source_id == node || &self.target_id == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_json_uses_camel_case() {
        let node = Node::new(
            NodeId::from("n1"),
            NodeKind::Filter,
            Point::new(1.0, 2.0),
            Size::new(10.0, 20.0),
        )
        .with_parent(NodeId::from("g1"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["parentId"], "g1");
        assert_eq!(json["extentConstrained"], true);
        assert!(json.get("slotCursor").is_none());
    }

    #[test]
    fn test_node_defaults_when_fields_missing() {
        let json = r#"{
            "id": "n1",
            "kind": "sink",
            "position": { "x": 0.0, "y": 0.0 },
            "size": { "width": 10.0, "height": 10.0 }
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert!(node.interactive);
        assert!(!node.hidden);
        assert!(node.parent_id.is_none());
        assert_eq!(node.data, NodeData::default());
    }

    #[test]
    fn test_edge_touches() {
        let edge = Edge::new(
            EdgeId::from("e"),
            NodeId::from("a"),
            NodeId::from("b"),
            EdgeKind::Default,
        );
        assert!(edge.touches(&NodeId::from("a")));
        assert!(edge.touches(&NodeId::from("b")));
        assert!(!edge.touches(&NodeId::from("c")));
    }
}
