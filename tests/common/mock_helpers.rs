//! Hand-written collaborators for integration tests

use pipeline_canvas::config::GeometryStore;
use pipeline_canvas::graph::NodeId;
use pipeline_canvas::{EditorError, Result, Size};
use std::collections::HashMap;

/// Geometry store whose writes always fail; reads see nothing.
#[derive(Debug, Default)]
pub struct FailingGeometryStore {
    pub attempts: usize,
}

impl GeometryStore for FailingGeometryStore {
    fn get(&self, _id: &NodeId) -> Option<Size> {
        None
    }

    fn set(&mut self, _id: &NodeId, _size: Size) -> Result<()> {
        self.attempts += 1;
        Err(EditorError::Config("geometry storage unavailable".to_string()))
    }

    fn remove(&mut self, _id: &NodeId) -> Result<()> {
        self.attempts += 1;
        Err(EditorError::Config("geometry storage unavailable".to_string()))
    }
}

/// Geometry store seeded with fixed sizes.
#[derive(Debug, Default)]
pub struct SeededGeometryStore {
    sizes: HashMap<NodeId, Size>,
}

impl SeededGeometryStore {
    pub fn with(mut self, id: &str, size: Size) -> Self {
        self.sizes.insert(NodeId::from(id), size);
        self
    }
}

impl GeometryStore for SeededGeometryStore {
    fn get(&self, id: &NodeId) -> Option<Size> {
        self.sizes.get(id).copied()
    }

    fn set(&mut self, id: &NodeId, size: Size) -> Result<()> {
        self.sizes.insert(id.clone(), size);
        Ok(())
    }

    fn remove(&mut self, id: &NodeId) -> Result<()> {
        self.sizes.remove(id);
        Ok(())
    }
}
