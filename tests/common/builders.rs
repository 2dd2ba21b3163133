//! Test data builders for creating test graphs

use pipeline_canvas::graph::{
    Edge, EdgeId, EdgeKind, GraphDocument, Node, NodeData, NodeId, NodeKind,
};
use pipeline_canvas::{Point, Size};

/// Builder for creating test nodes
pub struct NodeBuilder {
    id: String,
    kind: NodeKind,
    position: Point,
    size: Option<Size>,
    parent: Option<String>,
    value: Option<f64>,
}

impl NodeBuilder {
    pub fn new(id: &str, kind: NodeKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            position: Point::ZERO,
            size: None,
            parent: None,
            value: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn build(self) -> Node {
        let size = self.size.unwrap_or(match self.kind {
            NodeKind::Placeholder => Size::new(40.0, 40.0),
            k if k.is_container() => Size::new(420.0, 300.0),
            _ => Size::new(180.0, 60.0),
        });
        let mut data = NodeData::labeled(self.kind.display_name());
        data.value = self.value;
        let mut node =
            Node::new(NodeId::from(self.id), self.kind, self.position, size).with_data(data);
        if let Some(parent) = self.parent {
            node = node.with_parent(NodeId::from(parent));
        }
        node
    }
}

/// Builder for creating test documents
#[derive(Default)]
pub struct DocumentBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node: NodeBuilder) -> Self {
        self.nodes.push(node.build());
        self
    }

    pub fn edge(mut self, id: &str, source: &str, target: &str) -> Self {
        let kind = match self.nodes.iter().find(|n| n.id.as_str() == target) {
            Some(n) if n.is_placeholder() => EdgeKind::Placeholder,
            _ => EdgeKind::Default,
        };
        self.edges.push(Edge::new(
            EdgeId::from(id),
            NodeId::from(source),
            NodeId::from(target),
            kind,
        ));
        self
    }

    pub fn build(self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes,
            edges: self.edges,
            ..GraphDocument::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = NodeBuilder::new("c", NodeKind::Constant)
            .at(10.0, 20.0)
            .parent("g")
            .value(3.0)
            .build();

        assert_eq!(node.id, NodeId::from("c"));
        assert_eq!(node.position, Point::new(10.0, 20.0));
        assert_eq!(node.parent_id, Some(NodeId::from("g")));
        assert_eq!(node.data.value, Some(3.0));
        assert!(node.extent_constrained);
    }

    #[test]
    fn test_document_builder_edge_kinds() {
        let doc = DocumentBuilder::new()
            .node(NodeBuilder::new("a", NodeKind::Source))
            .node(NodeBuilder::new("p", NodeKind::Placeholder))
            .edge("e", "a", "p")
            .build();
        assert_eq!(doc.edges[0].kind, EdgeKind::Placeholder);
    }
}
