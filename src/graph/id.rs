//! Identity types for the graph store.
//!
//! Node and edge ids are opaque strings so that documents produced by other
//! tools round-trip unchanged. Ids allocated by the store follow the
//! `node-N` / `edge-N` pattern.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix for store-allocated node ids.
pub const NODE_ID_PREFIX: &str = "node";

/// Prefix for store-allocated edge ids.
pub const EDGE_ID_PREFIX: &str = "edge";

/// Unique id of a node in the store.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id for the `n`-th allocated node.
    pub fn numbered(n: u64) -> Self {
        Self(format!("{}-{}", NODE_ID_PREFIX, n))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique id of an edge in the store.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id for the `n`-th allocated edge.
    pub fn numbered(n: u64) -> Self {
        Self(format!("{}-{}", EDGE_ID_PREFIX, n))
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_ids() {
        assert_eq!(NodeId::numbered(3).as_str(), "node-3");
        assert_eq!(EdgeId::numbered(12).as_str(), "edge-12");
    }

    #[test]
    fn test_debug_and_display() {
        let id = NodeId::from("src");
        assert_eq!(format!("{}", id), "src");
        assert_eq!(format!("{:?}", id), "NodeId(src)");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&EdgeId::from("e1")).unwrap();
        assert_eq!(json, "\"e1\"");
        let back: EdgeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EdgeId::from("e1"));
    }
}
