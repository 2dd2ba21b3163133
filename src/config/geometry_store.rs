//! Container geometry persistence
//!
//! The container lifecycle manager remembers the last expanded size of each
//! container so a collapse/expand cycle (or an app restart) restores it. The
//! manager only needs get/set/remove; [`MemoryGeometryStore`] keeps sizes for
//! one session and [`FileGeometryStore`] keeps them in the app data dir.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::ensure_app_data_dir;
use crate::error::{EditorError, Result, ResultExt};
use crate::graph::NodeId;
use crate::types::Size;

/// Geometry persistence filename
pub const GEOMETRY_FILE: &str = "container_geometry.json";

/// Keyed store of container sizes.
#[cfg_attr(test, mockall::automock)]
pub trait GeometryStore {
    fn get(&self, id: &NodeId) -> Option<Size>;
    fn set(&mut self, id: &NodeId, size: Size) -> Result<()>;
    fn remove(&mut self, id: &NodeId) -> Result<()>;
}

/// Session-scoped geometry store.
#[derive(Debug, Clone, Default)]
pub struct MemoryGeometryStore {
    sizes: HashMap<NodeId, Size>,
}

impl MemoryGeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl GeometryStore for MemoryGeometryStore {
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

/// On-disk layout of the geometry file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeometryFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    containers: HashMap<NodeId, Size>,
}

fn default_version() -> u32 {
    1
}

/// Geometry store backed by a JSON file, written through on every change.
#[derive(Debug, Clone)]
pub struct FileGeometryStore {
    path: PathBuf,
    sizes: HashMap<NodeId, Size>,
}

impl FileGeometryStore {
    /// Open (or start) the geometry file at `path`. An unreadable file is
    /// replaced with an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let sizes = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<GeometryFile>(&content) {
                Ok(file) => {
                    tracing::info!(
                        "Loaded {} container geometries from {:?}",
                        file.containers.len(),
                        path
                    );
                    file.containers
                }
                Err(e) => {
                    tracing::warn!("Failed to parse container geometry: {}, starting empty", e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, sizes }
    }

    /// Open the geometry file in the app data dir
    pub fn open_default() -> Result<Self> {
        let dir = ensure_app_data_dir()?;
        Ok(Self::open(dir.join(GEOMETRY_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let file = GeometryFile {
            version: 1,
            containers: self.sizes.clone(),
        };
        let content = serde_json::to_string_pretty(&file).map_err(|e| {
            EditorError::Config(format!("Failed to serialize container geometry: {}", e))
        })?;
        std::fs::write(&self.path, content).map_err(|e| {
            EditorError::Config(format!("Failed to write container geometry: {}", e))
        })?;
        tracing::debug!("Saved container geometry to {:?}", self.path);
        Ok(())
    }
}

impl GeometryStore for FileGeometryStore {
    fn get(&self, id: &NodeId) -> Option<Size> {
        self.sizes.get(id).copied()
    }

    fn set(&mut self, id: &NodeId, size: Size) -> Result<()> {
        self.sizes.insert(id.clone(), size);
        self.flush()
            .with_context(|| format!("Failed to persist geometry of {}", id))
    }

    fn remove(&mut self, id: &NodeId) -> Result<()> {
        if self.sizes.remove(id).is_some() {
            self.flush()
                .with_context(|| format!("Failed to forget geometry of {}", id))?;
        }
        Ok(())
    }
}
