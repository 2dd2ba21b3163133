//! Editor settings sections
//!
//! These sections make up [`super::EditorConfig`]. They control how
//! placeholder chains are laid out, how large each node kind is drawn, the
//! collapsed/expanded sizes of containers and how deep the undo history
//! goes.
//!
//! # Main Types
//!
//! - [`LayoutSettings`] - Chain axes, gaps and container padding
//! - [`NodeSizes`] - Default sizes of component and placeholder nodes
//! - [`ContainerSettings`] - Collapsed and default expanded container sizes
//! - [`HistorySettings`] - Undo depth

use serde::{Deserialize, Serialize};

use crate::graph::NodeKind;
use crate::types::{LayoutAxis, Size};

/// Default gap between chained nodes
pub const DEFAULT_GAP: f64 = 40.0;

/// Default padding kept between container children and the container border
pub const DEFAULT_CONTAINER_PADDING: f64 = 24.0;

/// Default width of a collapsed container
pub const DEFAULT_COLLAPSED_WIDTH: f64 = 220.0;

/// Default height of a collapsed container
pub const DEFAULT_COLLAPSED_HEIGHT: f64 = 60.0;

/// Default undo depth
pub const DEFAULT_HISTORY_DEPTH: usize = 200;

/// Placeholder chain layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Axis for chains of top-level nodes
    #[serde(default)]
    pub canvas_axis: LayoutAxis,

    /// Axis for chains inside a container
    #[serde(default = "default_container_axis")]
    pub container_axis: LayoutAxis,

    /// Gap between a node and the next one in a chain
    #[serde(default = "default_gap")]
    pub gap: f64,

    /// Space kept between children and the container's far borders
    #[serde(default = "default_container_padding")]
    pub container_padding: f64,
}

fn default_container_axis() -> LayoutAxis {
    LayoutAxis::Vertical
}

fn default_gap() -> f64 {
    DEFAULT_GAP
}

fn default_container_padding() -> f64 {
    DEFAULT_CONTAINER_PADDING
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            canvas_axis: LayoutAxis::Horizontal,
            container_axis: LayoutAxis::Vertical,
            gap: DEFAULT_GAP,
            container_padding: DEFAULT_CONTAINER_PADDING,
        }
    }
}

impl LayoutSettings {
    /// Chain axis for nodes inside `parent` (or on the canvas)
    pub fn axis_for(&self, in_container: bool) -> LayoutAxis {
        if in_container {
            self.container_axis
        } else {
            self.canvas_axis
        }
    }
}

/// Default node sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSizes {
    /// Size of every component node
    #[serde(default = "default_component_size")]
    pub component: Size,

    /// Size of a placeholder
    #[serde(default = "default_placeholder_size")]
    pub placeholder: Size,
}

fn default_component_size() -> Size {
    Size::new(180.0, 60.0)
}

fn default_placeholder_size() -> Size {
    Size::new(40.0, 40.0)
}

impl Default for NodeSizes {
    fn default() -> Self {
        Self {
            component: default_component_size(),
            placeholder: default_placeholder_size(),
        }
    }
}

/// Container size state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSettings {
    /// Width of a collapsed container
    #[serde(default = "default_collapsed_width")]
    pub collapsed_width: f64,

    /// Height of a collapsed container; taller containers start expanded
    #[serde(default = "default_collapsed_height")]
    pub collapsed_height: f64,

    /// Size applied on expansion when no geometry was persisted
    #[serde(default = "default_expanded_size")]
    pub default_expanded: Size,
}

fn default_collapsed_width() -> f64 {
    DEFAULT_COLLAPSED_WIDTH
}

fn default_collapsed_height() -> f64 {
    DEFAULT_COLLAPSED_HEIGHT
}

fn default_expanded_size() -> Size {
    Size::new(420.0, 300.0)
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            collapsed_width: DEFAULT_COLLAPSED_WIDTH,
            collapsed_height: DEFAULT_COLLAPSED_HEIGHT,
            default_expanded: default_expanded_size(),
        }
    }
}

impl ContainerSettings {
    pub fn collapsed_size(&self) -> Size {
        Size::new(self.collapsed_width, self.collapsed_height)
    }
}

/// Undo history limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Oldest entries are dropped beyond this depth
    #[serde(default = "default_history_depth")]
    pub max_depth: usize,
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Default size of a freshly created node of `kind`
pub fn default_size(kind: NodeKind, sizes: &NodeSizes, containers: &ContainerSettings) -> Size {
    if kind.is_placeholder() {
        sizes.placeholder
    } else if kind.is_container() {
        containers.default_expanded
    } else {
        sizes.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutSettings::default();
        assert_eq!(layout.axis_for(false), LayoutAxis::Horizontal);
        assert_eq!(layout.axis_for(true), LayoutAxis::Vertical);
        assert_eq!(layout.gap, DEFAULT_GAP);
    }

    #[test]
    fn test_default_size_by_kind() {
        let sizes = NodeSizes::default();
        let containers = ContainerSettings::default();
        assert_eq!(
            default_size(NodeKind::Placeholder, &sizes, &containers),
            Size::new(40.0, 40.0)
        );
        assert_eq!(
            default_size(NodeKind::Branch, &sizes, &containers),
            containers.default_expanded
        );
        assert_eq!(
            default_size(NodeKind::Sink, &sizes, &containers),
            sizes.component
        );
    }

    #[test]
    fn test_collapsed_size() {
        let containers = ContainerSettings::default();
        assert_eq!(containers.collapsed_size(), Size::new(220.0, 60.0));
    }
}
