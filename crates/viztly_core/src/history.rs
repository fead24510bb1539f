//! Linear undo/redo history of structural and textual changes.

use crate::constants::DEFAULT_HISTORY_LIMIT;
use crate::error::OutlineError;
use crate::tree::{ItemId, Outline};

/// A reversible record of one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Rename {
        item: ItemId,
        old_name: String,
        new_name: String,
    },
    Remove {
        item: ItemId,
        parent: ItemId,
        position: usize,
        /// Selection computed when the item was removed; reused on redo.
        item_to_select_after: Option<ItemId>,
    },
    Add {
        item: ItemId,
        parent: ItemId,
        position: usize,
        previously_selected: ItemId,
    },
    Move {
        item: ItemId,
        old_parent: ItemId,
        old_index: usize,
        new_parent: ItemId,
        new_index: usize,
    },
}

impl Change {
    /// The item the change is about.
    pub fn item(&self) -> ItemId {
        match self {
            Change::Rename { item, .. }
            | Change::Remove { item, .. }
            | Change::Add { item, .. }
            | Change::Move { item, .. } => *item,
        }
    }

    /// Every handle the record would touch when replayed either way.
    pub fn referenced_items(&self) -> Vec<ItemId> {
        match self {
            Change::Rename { item, .. } => vec![*item],
            Change::Remove {
                item,
                parent,
                item_to_select_after,
                ..
            } => {
                let mut ids = vec![*item, *parent];
                ids.extend(*item_to_select_after);
                ids
            }
            Change::Add {
                item,
                parent,
                previously_selected,
                ..
            } => vec![*item, *parent, *previously_selected],
            Change::Move {
                item,
                old_parent,
                new_parent,
                ..
            } => vec![*item, *old_parent, *new_parent],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Change::Rename { .. } => "rename",
            Change::Remove { .. } => "remove",
            Change::Add { .. } => "add",
            Change::Move { .. } => "move",
        }
    }

    /// Replay the change forward.
    pub fn apply(&self, outline: &mut Outline) -> Result<(), OutlineError> {
        match self {
            Change::Rename { item, new_name, .. } => {
                outline[*item].title = new_name.clone();
            }
            Change::Remove { item, .. } => {
                outline.remove(*item)?;
            }
            Change::Add {
                item,
                parent,
                position,
                ..
            } => outline.add_at(*parent, *item, *position)?,
            Change::Move {
                item,
                new_parent,
                new_index,
                ..
            } => outline.add_at(*new_parent, *item, *new_index)?,
        }
        Ok(())
    }

    /// Apply the inverse of the change.
    pub fn revert(&self, outline: &mut Outline) -> Result<(), OutlineError> {
        match self {
            Change::Rename { item, old_name, .. } => {
                outline[*item].title = old_name.clone();
            }
            Change::Remove {
                item,
                parent,
                position,
                ..
            } => outline.add_at(*parent, *item, *position)?,
            Change::Add { item, .. } => {
                outline.remove(*item)?;
            }
            Change::Move {
                item,
                old_parent,
                old_index,
                ..
            } => outline.add_at(*old_parent, *item, *old_index)?,
        }
        Ok(())
    }
}

/// Ordered changes plus the count of those currently applied.
///
/// Changes at index `>= applied` are redoable; recording a new change drops
/// them.
#[derive(Debug)]
pub struct History {
    changes: Vec<Change>,
    applied: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// History keeping at most `limit` changes (minimum 1).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            changes: Vec::new(),
            applied: 0,
            limit: limit.max(1),
        }
    }

    /// Index of the last applied change, `None` when nothing is applied.
    pub fn current_index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.changes.len()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Append an already-applied change.
    ///
    /// # Returns
    /// Changes dropped by this call: the redoable tail, then the oldest
    /// entries pushed past the limit.
    pub fn record(&mut self, change: Change) -> Vec<Change> {
        let mut discarded: Vec<Change> = self.changes.drain(self.applied..).collect();
        tracing::debug!(
            kind = change.kind(),
            item = %change.item(),
            truncated = discarded.len(),
            "recording change"
        );
        self.changes.push(change);
        if self.changes.len() > self.limit {
            let overflow = self.changes.len() - self.limit;
            discarded.extend(self.changes.drain(..overflow));
        }
        self.applied = self.changes.len();
        discarded
    }

    /// Revert the last applied change.
    ///
    /// # Returns
    /// The reverted change, or `None` when nothing is applied.
    ///
    /// # Errors
    /// Propagates tree errors; the history cursor is left unchanged then.
    pub fn undo(&mut self, outline: &mut Outline) -> Result<Option<Change>, OutlineError> {
        let Some(index) = self.current_index() else {
            return Ok(None);
        };
        let change = self.changes[index].clone();
        change.revert(outline)?;
        self.applied = index;
        tracing::debug!(kind = change.kind(), item = %change.item(), "undo");
        Ok(Some(change))
    }

    /// Re-apply the next undone change.
    ///
    /// # Returns
    /// The re-applied change, or `None` when there is nothing to redo.
    pub fn redo(&mut self, outline: &mut Outline) -> Result<Option<Change>, OutlineError> {
        let Some(change) = self.changes.get(self.applied).cloned() else {
            return Ok(None);
        };
        change.apply(outline)?;
        self.applied += 1;
        tracing::debug!(kind = change.kind(), item = %change.item(), "redo");
        Ok(Some(change))
    }

    /// True when any kept change mentions `id`.
    pub fn references(&self, id: ItemId) -> bool {
        self.changes
            .iter()
            .any(|change| change.referenced_items().contains(&id))
    }

    pub fn clear(&mut self) {
        self.changes.clear();
        self.applied = 0;
    }
}
