//! Arena-backed outline tree.
//!
//! Items live in slots owned by [`Outline`] and refer to each other through
//! [`ItemId`] handles. A child stores its parent as a plain handle, so there
//! are no ownership cycles: detaching an item only unlinks it, and the slot
//! stays alive until [`Outline::release`] drops it.

mod traversal;

#[cfg(test)]
mod tests;

use crate::constants::ROOT_TITLE;
use crate::error::OutlineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Stable handle to an item slot in an [`Outline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    /// Slot index backing this handle.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout mode of an item's children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Tree,
    Board,
}

impl View {
    pub fn toggled(self) -> Self {
        match self {
            View::Tree => View::Board,
            View::Board => View::Tree,
        }
    }
}

/// A node of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    /// Whether children are expanded for navigation and rendering.
    pub is_open: bool,
    pub view: View,
    children: Vec<ItemId>,
    parent: Option<ItemId>,
}

impl Item {
    fn new(title: String) -> Self {
        Self {
            title,
            is_open: false,
            view: View::Tree,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Ordered child handles (sibling order).
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// True when the item is open and there is something to expand into.
    pub fn shows_children(&self) -> bool {
        self.is_open && !self.children.is_empty()
    }
}

/// The document: an arena of items plus the handle of the root.
#[derive(Debug, Clone)]
pub struct Outline {
    slots: Vec<Option<Item>>,
    root: ItemId,
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<ItemId> for Outline {
    type Output = Item;

    fn index(&self, id: ItemId) -> &Item {
        match self.get(id) {
            Some(item) => item,
            None => panic!("no live item for handle {id}"),
        }
    }
}

impl IndexMut<ItemId> for Outline {
    fn index_mut(&mut self, id: ItemId) -> &mut Item {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(item) => item,
            None => panic!("no live item for handle {id}"),
        }
    }
}

impl Outline {
    /// Create an outline holding only the root item.
    pub fn new() -> Self {
        Self::with_root_title(ROOT_TITLE)
    }

    pub fn with_root_title(title: impl Into<String>) -> Self {
        Self {
            slots: vec![Some(Item::new(title.into()))],
            root: ItemId(0),
        }
    }

    pub fn root(&self) -> ItemId {
        self.root
    }

    pub fn is_root(&self, id: ItemId) -> bool {
        id == self.root
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// True while the slot has not been released.
    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live slots, attached or not, including the root.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when following parent links from `id` ends at the root.
    pub fn is_reachable(&self, id: ItemId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.get(node).and_then(Item::parent);
        }
        false
    }

    fn live(&self, id: ItemId) -> Result<&Item, OutlineError> {
        self.get(id)
            .ok_or_else(|| OutlineError::invariant(format!("unknown item handle {id}")))
    }

    /// Allocate a detached item with no children.
    pub fn create_item(&mut self, title: impl Into<String>) -> ItemId {
        let id = ItemId(self.slots.len());
        self.slots.push(Some(Item::new(title.into())));
        id
    }

    /// Allocate an item and append it below the root.
    pub fn append_top_level(&mut self, title: impl Into<String>) -> ItemId {
        let id = self.create_item(title);
        let root = self.root;
        let end = self[root].children.len();
        self.splice(root, id, end);
        self[root].is_open = true;
        id
    }

    /// Allocate an item adopting `children` in the given order.
    ///
    /// The item starts open exactly when it has children. Children already
    /// attached elsewhere are detached first.
    pub fn create_item_with_children(
        &mut self,
        title: impl Into<String>,
        children: Vec<ItemId>,
    ) -> Result<ItemId, OutlineError> {
        for child in &children {
            self.live(*child)?;
            if self.is_root(*child) {
                return Err(OutlineError::invariant("the root cannot become a child"));
            }
        }
        let id = self.create_item(title);
        for child in children {
            self.insert_as_last_child(id, child)?;
        }
        let item = &mut self[id];
        item.is_open = item.has_children();
        Ok(id)
    }

    /// Ordered siblings of `id`, including `id` itself.
    ///
    /// # Errors
    /// Returns [`OutlineError::InvariantViolation`] for the root or a
    /// detached item, which have no sibling context.
    pub fn siblings_of(&self, id: ItemId) -> Result<&[ItemId], OutlineError> {
        let parent = self.live(id)?.parent.ok_or_else(|| {
            OutlineError::invariant(format!(
                "attempt to get context of '{}' which has no parent",
                self[id].title
            ))
        })?;
        Ok(self[parent].children())
    }

    /// Position of `id` among its siblings.
    pub fn index_in_parent(&self, id: ItemId) -> Option<usize> {
        let parent = self.get(id)?.parent?;
        self[parent].children.iter().position(|child| *child == id)
    }

    /// Detach `id` from its parent.
    ///
    /// A parent left without children is closed.
    ///
    /// # Returns
    /// The index the item occupied, or `None` when it was already detached.
    ///
    /// # Errors
    /// Returns [`OutlineError::InvariantViolation`] for the root or an
    /// unknown handle.
    pub fn remove(&mut self, id: ItemId) -> Result<Option<usize>, OutlineError> {
        self.live(id)?;
        if self.is_root(id) {
            return Err(OutlineError::invariant("the root item cannot be removed"));
        }
        Ok(self.detach(id))
    }

    fn detach(&mut self, id: ItemId) -> Option<usize> {
        let parent = self[id].parent.take()?;
        let siblings = &mut self[parent].children;
        let index = siblings.iter().position(|child| *child == id)?;
        siblings.remove(index);
        if siblings.is_empty() {
            self[parent].is_open = false;
        }
        Some(index)
    }

    /// Check that `item` may be placed under `parent` without a cycle.
    fn guard_insert(&self, parent: ItemId, item: ItemId) -> Result<(), OutlineError> {
        self.live(parent)?;
        self.live(item)?;
        if self.is_root(item) {
            return Err(OutlineError::invariant("the root item cannot be re-parented"));
        }
        if self.is_ancestor_or_self(item, parent) {
            return Err(OutlineError::invariant(format!(
                "inserting {item} under {parent} would make it its own ancestor"
            )));
        }
        Ok(())
    }

    fn splice(&mut self, parent: ItemId, item: ItemId, index: usize) {
        let siblings = &mut self[parent].children;
        let index = index.min(siblings.len());
        siblings.insert(index, item);
        self[item].parent = Some(parent);
    }

    pub fn insert_as_last_child(&mut self, parent: ItemId, item: ItemId) -> Result<(), OutlineError> {
        self.guard_insert(parent, item)?;
        if self[parent].children.last() == Some(&item) {
            return Ok(());
        }
        self.detach(item);
        let end = self[parent].children.len();
        self.splice(parent, item, end);
        Ok(())
    }

    /// Prepend `item`; the parent opens when this is its only child.
    pub fn insert_as_first_child(&mut self, parent: ItemId, item: ItemId) -> Result<(), OutlineError> {
        self.guard_insert(parent, item)?;
        if self[parent].children.first() == Some(&item) {
            return Ok(());
        }
        self.detach(item);
        self.splice(parent, item, 0);
        if self[parent].children.len() == 1 {
            self[parent].is_open = true;
        }
        Ok(())
    }

    pub fn insert_before(&mut self, anchor: ItemId, item: ItemId) -> Result<(), OutlineError> {
        self.insert_next_to(anchor, item, 0)
    }

    pub fn insert_after(&mut self, anchor: ItemId, item: ItemId) -> Result<(), OutlineError> {
        self.insert_next_to(anchor, item, 1)
    }

    fn insert_next_to(&mut self, anchor: ItemId, item: ItemId, offset: usize) -> Result<(), OutlineError> {
        self.siblings_of(anchor)?;
        let Some(parent) = self[anchor].parent else {
            return Err(OutlineError::invariant("anchor has no parent"));
        };
        if anchor == item {
            return Ok(());
        }
        self.guard_insert(parent, item)?;
        self.detach(item);
        let index = self
            .index_in_parent(anchor)
            .ok_or_else(|| OutlineError::invariant(format!("{anchor} missing from its parent")))?;
        self.splice(parent, item, index + offset);
        Ok(())
    }

    /// Splice `item` into `parent` at `index` and open the parent.
    ///
    /// The index is clamped to the child count. Used by history replay to
    /// restore exact positions.
    pub fn add_at(&mut self, parent: ItemId, item: ItemId, index: usize) -> Result<(), OutlineError> {
        self.guard_insert(parent, item)?;
        self.detach(item);
        self.splice(parent, item, index);
        self[parent].is_open = true;
        Ok(())
    }

    /// Count descendants visible through open chains.
    ///
    /// Closed items are counted but not descended into.
    pub fn count_open_descendants(&self, id: ItemId) -> usize {
        let mut count = 0;
        let mut stack: Vec<ItemId> = self[id].children.clone();
        while let Some(next) = stack.pop() {
            let item = &self[next];
            if item.is_open {
                stack.extend(item.children.iter().copied());
            }
            count += 1;
        }
        count
    }

    /// True when `candidate` is `of` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, candidate: ItemId, of: ItemId) -> bool {
        let mut current = Some(of);
        while let Some(node) = current {
            if node == candidate {
                return true;
            }
            current = self.get(node).and_then(Item::parent);
        }
        false
    }

    /// Depth below the root; top-level items are at depth 0.
    pub fn depth(&self, id: ItemId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).and_then(Item::parent);
        while let Some(node) = current {
            if node == self.root {
                break;
            }
            depth += 1;
            current = self.get(node).and_then(Item::parent);
        }
        depth
    }

    /// `id` and all of its descendants in pre-order, with depth relative to `id`.
    pub fn subtree(&self, id: ItemId) -> Vec<(ItemId, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(id, 0)];
        while let Some((next, depth)) = stack.pop() {
            out.push((next, depth));
            for child in self[next].children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    /// Drop the slots of a detached item and its descendants.
    ///
    /// # Errors
    /// Returns [`OutlineError::InvariantViolation`] when the item is still
    /// attached or is the root.
    pub fn release(&mut self, id: ItemId) -> Result<usize, OutlineError> {
        let item = self.live(id)?;
        if self.is_root(id) || item.parent.is_some() {
            return Err(OutlineError::invariant(format!(
                "cannot release attached item {id}"
            )));
        }
        let doomed: Vec<ItemId> = self.subtree(id).into_iter().map(|(node, _)| node).collect();
        for node in &doomed {
            self.slots[node.0] = None;
        }
        Ok(doomed.len())
    }
}
