//! Read-only navigation over the visible outline.
//!
//! "Up" and "down" walk the depth-first order of items whose ancestors are
//! all open, the same order a collapsed outline view shows line by line.

use super::{ItemId, Outline};

impl Outline {
    fn relative_sibling(&self, id: ItemId, forward: bool) -> Option<ItemId> {
        let parent = self.get(id)?.parent()?;
        let siblings = self[parent].children();
        let index = siblings.iter().position(|child| *child == id)?;
        if forward {
            siblings.get(index + 1).copied()
        } else {
            index.checked_sub(1).map(|prev| siblings[prev])
        }
    }

    pub fn previous_sibling(&self, id: ItemId) -> Option<ItemId> {
        self.relative_sibling(id, false)
    }

    pub fn following_sibling(&self, id: ItemId) -> Option<ItemId> {
        self.relative_sibling(id, true)
    }

    /// Deepest visible item at the tail of `id`'s subtree.
    pub fn last_nested(&self, id: ItemId) -> ItemId {
        let mut current = id;
        loop {
            let item = &self[current];
            match item.children().last() {
                Some(last) if item.is_open => current = *last,
                _ => return current,
            }
        }
    }

    /// The item shown directly above `id`.
    ///
    /// The previous sibling's deepest open tail when there is one, otherwise
    /// the parent unless the parent is the root.
    pub fn item_above(&self, id: ItemId) -> Option<ItemId> {
        if let Some(previous) = self.previous_sibling(id) {
            return Some(self.last_nested(previous));
        }
        let parent = self.get(id)?.parent()?;
        (!self.is_root(parent)).then_some(parent)
    }

    /// The item shown directly below `id`, or `None` at the end of the tree.
    pub fn item_below(&self, id: ItemId) -> Option<ItemId> {
        let item = self.get(id)?;
        if item.shows_children() {
            return item.children().first().copied();
        }
        self.following_item(id)
    }

    fn following_item(&self, id: ItemId) -> Option<ItemId> {
        let mut current = id;
        loop {
            if let Some(next) = self.following_sibling(current) {
                return Some(next);
            }
            current = self.get(current)?.parent()?;
        }
    }

    /// Selection target after `id` is removed: the item above, else the
    /// following sibling.
    pub fn item_to_select_after_removing(&self, id: ItemId) -> Option<ItemId> {
        self.item_above(id).or_else(|| self.following_sibling(id))
    }

    /// Items in visible depth-first order, with depth below the root.
    pub fn visible_items(&self) -> Vec<(ItemId, usize)> {
        self.visible_below(self.root())
    }

    /// Descendants of `id` in visible order; its children sit at depth 0
    /// whether or not `id` is open.
    pub fn visible_below(&self, id: ItemId) -> Vec<(ItemId, usize)> {
        let mut out = Vec::new();
        let mut stack: Vec<(ItemId, usize)> = self[id]
            .children()
            .iter()
            .rev()
            .map(|child| (*child, 0))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            if self[id].shows_children() {
                for child in self[id].children().iter().rev() {
                    stack.push((*child, depth + 1));
                }
            }
        }
        out
    }
}
