//! Configuration module for the pipeline canvas
//!
//! This module handles editor configuration including:
//! - Editor settings (layout, node sizes, container sizes, history depth)
//!   stored as TOML
//! - Container geometry persistence across collapse/expand cycles and
//!   sessions
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.hxyulin.pipeline-canvas/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.pipeline-canvas/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.pipeline-canvas\`
//!
//! # Files
//!
//! - `editor.toml` - Editor settings
//! - `container_geometry.json` - Last expanded size of each container
//!
//! # Example
//!
//! ```ignore
//! use pipeline_canvas::config::{EditorConfig, FileGeometryStore};
//!
//! let config = EditorConfig::load_or_default();
//! let geometry = FileGeometryStore::open_default()?;
//! ```

pub mod geometry_store;
pub mod settings;

pub use geometry_store::{FileGeometryStore, GeometryStore, MemoryGeometryStore};
pub use settings::*;

#[cfg(test)]
pub use geometry_store::MockGeometryStore;

use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.hxyulin.pipeline-canvas";

/// Editor settings filename
pub const CONFIG_FILE: &str = "editor.toml";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        EditorError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            EditorError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the editor settings file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Editor Config ====================

/// Persistent editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version for future migration support
    #[serde(default = "default_config_version")]
    pub version: u32,

    #[serde(default)]
    pub layout: LayoutSettings,

    #[serde(default)]
    pub sizes: NodeSizes,

    #[serde(default)]
    pub containers: ContainerSettings,

    #[serde(default)]
    pub history: HistorySettings,
}

fn default_config_version() -> u32 {
    1
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            layout: LayoutSettings::default(),
            sizes: NodeSizes::default(),
            containers: ContainerSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

impl EditorConfig {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EditorError::Config(format!("Failed to read editor config {:?}: {}", path, e))
        })?;

        let config: EditorConfig = toml::from_str(&content).map_err(|e| {
            EditorError::Config(format!("Failed to parse editor config {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from the default location, returning defaults when the
    /// file is absent or unreadable
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                tracing::info!("Loaded editor config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load editor config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EditorError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| EditorError::Config(format!("Failed to serialize editor config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            EditorError::Config(format!("Failed to write editor config {:?}: {}", path, e))
        })
    }

    /// Save settings to the default location
    pub fn save_default(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save(dir.join(CONFIG_FILE))
    }

    /// Reject values the layout math cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.layout.gap < 0.0 || self.layout.container_padding < 0.0 {
            return Err(EditorError::Config(
                "layout gap and padding must not be negative".to_string(),
            ));
        }
        let sizes = [
            self.sizes.component,
            self.sizes.placeholder,
            self.containers.collapsed_size(),
            self.containers.default_expanded,
        ];
        if sizes.iter().any(|s| s.width <= 0.0 || s.height <= 0.0) {
            return Err(EditorError::Config(
                "node and container sizes must be positive".to_string(),
            ));
        }
        if self.containers.default_expanded.height <= self.containers.collapsed_height {
            return Err(EditorError::Config(
                "expanded container height must exceed the collapsed height".to_string(),
            ));
        }
        Ok(())
    }

    /// Default size of a freshly created node of `kind`
    pub fn size_for(&self, kind: crate::graph::NodeKind) -> crate::types::Size {
        settings::default_size(kind, &self.sizes, &self.containers)
    }
}
