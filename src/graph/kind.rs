//! Node and edge kinds with their capability table.
//!
//! Behavior that differs per node kind (merging, containment, branch slots)
//! is looked up through [`NodeKind::capabilities`] instead of being matched
//! on in each engine.

use serde::{Deserialize, Serialize};

/// Behavioral type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Open insertion point that materializes into a concrete node.
    Placeholder,

    // Component nodes
    /// Reads records from an external system.
    Source,
    /// Drops records that do not match a predicate.
    Filter,
    /// Maps each record to a new shape.
    Transform,
    /// Emits a fixed numeric value.
    Constant,
    /// Folds records into a running numeric value.
    Aggregate,
    /// Writes records to an external system.
    Sink,

    // Container nodes
    /// Groups a linear sub-pipeline.
    Group,
    /// Fans records out over several branches.
    Branch,
}

/// What a node kind is able to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Two nodes of this kind can be merged by dropping one onto the other.
    pub mergeable: bool,
    /// Nodes of this kind own children in a local coordinate space.
    pub container: bool,
    /// Number of outgoing branch slots offered to children of this container.
    pub slot_count: u32,
}

impl Capabilities {
    const COMPONENT: Capabilities = Capabilities {
        mergeable: false,
        container: false,
        slot_count: 0,
    };
}

impl NodeKind {
    /// Capability table lookup.
    pub const fn capabilities(self) -> Capabilities {
        match self {
            NodeKind::Constant | NodeKind::Aggregate => Capabilities {
                mergeable: true,
                ..Capabilities::COMPONENT
            },
            NodeKind::Group => Capabilities {
                mergeable: false,
                container: true,
                slot_count: 1,
            },
            NodeKind::Branch => Capabilities {
                mergeable: false,
                container: true,
                slot_count: 2,
            },
            NodeKind::Placeholder
            | NodeKind::Source
            | NodeKind::Filter
            | NodeKind::Transform
            | NodeKind::Sink => Capabilities::COMPONENT,
        }
    }

    pub fn is_placeholder(self) -> bool {
        self == NodeKind::Placeholder
    }

    pub fn is_container(self) -> bool {
        self.capabilities().container
    }

    pub fn is_mergeable(self) -> bool {
        self.capabilities().mergeable
    }

    /// Whether `self` dropped onto `target` combines into it.
    pub fn merges_into(self, target: NodeKind) -> bool {
        self == target && target.is_mergeable()
    }

    /// Get the display name for this node kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Placeholder => "Add Step",
            NodeKind::Source => "Source",
            NodeKind::Filter => "Filter",
            NodeKind::Transform => "Transform",
            NodeKind::Constant => "Constant",
            NodeKind::Aggregate => "Aggregate",
            NodeKind::Sink => "Sink",
            NodeKind::Group => "Group",
            NodeKind::Branch => "Branch",
        }
    }

    /// Get all concrete (non-placeholder) node kinds.
    pub fn all_concrete() -> &'static [NodeKind] {
        &[
            NodeKind::Source,
            NodeKind::Filter,
            NodeKind::Transform,
            NodeKind::Constant,
            NodeKind::Aggregate,
            NodeKind::Sink,
            NodeKind::Group,
            NodeKind::Branch,
        ]
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Visual/behavioral type of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Connection between two concrete nodes.
    #[default]
    Default,
    /// Connection into an open insertion point.
    Placeholder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_table() {
        assert!(NodeKind::Constant.is_mergeable());
        assert!(!NodeKind::Filter.is_mergeable());
        assert!(NodeKind::Group.is_container());
        assert_eq!(NodeKind::Branch.capabilities().slot_count, 2);
        assert_eq!(NodeKind::Group.capabilities().slot_count, 1);
        assert_eq!(NodeKind::Sink.capabilities().slot_count, 0);
    }

    #[test]
    fn test_merges_into_requires_same_kind() {
        assert!(NodeKind::Aggregate.merges_into(NodeKind::Aggregate));
        assert!(!NodeKind::Constant.merges_into(NodeKind::Aggregate));
        assert!(!NodeKind::Source.merges_into(NodeKind::Source));
    }

    #[test]
    fn test_all_concrete_excludes_placeholder() {
        assert!(!NodeKind::all_concrete().contains(&NodeKind::Placeholder));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&NodeKind::Aggregate).unwrap();
        assert_eq!(json, "\"aggregate\"");
        let kind: EdgeKind = serde_json::from_str("\"placeholder\"").unwrap();
        assert_eq!(kind, EdgeKind::Placeholder);
    }
}
