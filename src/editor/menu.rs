//! Selection menu collaborator.
//!
//! Given the kind of the node feeding a placeholder, the menu lists which
//! kinds the placeholder may expand into. The engine treats it as a pure
//! lookup; any `Fn(Option<NodeKind>) -> Vec<NodeKind>` works as a menu.

use crate::graph::NodeKind;

/// Compatible expansion kinds per source kind.
#[cfg_attr(test, mockall::automock)]
pub trait SelectionMenu {
    /// Kinds offered for a placeholder fed by `source` (`None` for an entry
    /// point with no incoming edge).
    fn compatible_kinds(&self, source: Option<NodeKind>) -> Vec<NodeKind>;
}

impl<F> SelectionMenu for F
where
    F: Fn(Option<NodeKind>) -> Vec<NodeKind>,
{
    fn compatible_kinds(&self, source: Option<NodeKind>) -> Vec<NodeKind> {
        self(source)
    }
}

/// Whether `menu` offers `chosen` for `source`. Placeholders are never a
/// valid choice.
pub fn is_compatible(menu: &dyn SelectionMenu, source: Option<NodeKind>, chosen: NodeKind) -> bool {
    !chosen.is_placeholder() && menu.compatible_kinds(source).contains(&chosen)
}

/// Default compatibility table for data pipelines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineMenu;

impl SelectionMenu for PipelineMenu {
    fn compatible_kinds(&self, source: Option<NodeKind>) -> Vec<NodeKind> {
        use NodeKind::*;
        match source {
            None => vec![Source, Constant, Group, Branch],
            Some(Source | Filter | Transform | Group | Branch) => {
                vec![Filter, Transform, Aggregate, Sink, Group, Branch]
            }
            Some(Constant) => vec![Transform, Aggregate, Sink],
            Some(Aggregate) => vec![Filter, Transform, Sink],
            Some(Sink | Placeholder) => Vec::new(),
        }
    }
}
