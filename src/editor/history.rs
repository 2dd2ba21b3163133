//! Linear undo/redo history over graph mutations.
//!
//! Every structural change to the [`GraphStore`] goes through
//! [`History::apply`]. An entry keeps the mutation as issued plus the inverse
//! the store returned for it, so a cascading removal (node plus edges plus
//! descendants) is undone in one step.

use crate::error::{EditorError, HistoryDirection, Result};
use crate::graph::{GraphStore, Mutation};

/// One reversible unit of graph mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// The mutation as issued; re-applied on redo.
    pub forward: Mutation,
    /// What puts the store back; applied on undo.
    pub inverse: Mutation,
}

/// Undo and redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Apply `mutation` and record it. Clears the redo stack.
    pub fn apply(&mut self, store: &mut GraphStore, mutation: Mutation) -> Result<()> {
        if mutation.is_noop() {
            return Ok(());
        }
        let label = mutation.label();
        let inverse = store.apply(mutation.clone())?;
        tracing::debug!("Applied {} (undo depth {})", label, self.undo.len() + 1);
        self.push(HistoryEntry {
            forward: mutation,
            inverse,
        });
        Ok(())
    }

    /// Apply `mutation` without recording it. The returned inverse lets the
    /// caller fold the change into a later [`History::commit_applied`].
    pub fn preview(&self, store: &mut GraphStore, mutation: Mutation) -> Result<Mutation> {
        store.apply(mutation)
    }

    /// Record a change that was already applied with [`History::preview`].
    pub fn commit_applied(&mut self, forward: Mutation, inverse: Mutation) {
        if forward.is_noop() {
            return;
        }
        self.push(HistoryEntry { forward, inverse });
    }

    /// Revert the most recent entry.
    pub fn undo(&mut self, store: &mut GraphStore) -> Result<()> {
        let entry = self
            .undo
            .pop()
            .ok_or(EditorError::UnknownMutation(HistoryDirection::Undo))?;
        match store.apply(entry.inverse.clone()) {
            Ok(_) => {
                tracing::debug!("Undid {}", entry.forward.label());
                self.redo.push(entry);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Undo of {} failed: {}", entry.forward.label(), e);
                self.undo.push(entry);
                Err(e)
            }
        }
    }

    /// Re-apply the most recently undone entry.
    pub fn redo(&mut self, store: &mut GraphStore) -> Result<()> {
        let entry = self
            .redo
            .pop()
            .ok_or(EditorError::UnknownMutation(HistoryDirection::Redo))?;
        match store.apply(entry.forward.clone()) {
            Ok(inverse) => {
                tracing::debug!("Redid {}", entry.forward.label());
                self.undo.push(HistoryEntry {
                    forward: entry.forward,
                    inverse,
                });
                Ok(())
            }
            Err(e) => {
                tracing::error!("Redo of {} failed: {}", entry.forward.label(), e);
                self.redo.push(entry);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        self.undo.push(entry);
        if self.undo.len() > self.max_depth {
            let excess = self.undo.len() - self.max_depth;
            self.undo.drain(..excess);
        }
    }
}
