//! Caret over the title of the selected item.
//!
//! Positions count chars, not bytes, so multi-byte titles stay splittable.

use crate::tree::{ItemId, Outline};

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Selected item plus caret position in its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    item: ItemId,
    position: usize,
}

impl Cursor {
    pub fn new(item: ItemId) -> Self {
        Self { item, position: 0 }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Select `item`, reset the caret and open every ancestor below the root.
    pub fn move_to(&mut self, outline: &mut Outline, item: ItemId) {
        self.item = item;
        self.position = 0;
        let mut parent = outline.get(item).and_then(|node| node.parent());
        while let Some(node) = parent {
            if outline.is_root(node) {
                break;
            }
            outline[node].is_open = true;
            parent = outline[node].parent();
        }
    }

    /// Place the caret, clamped to the title length.
    pub fn set_position(&mut self, outline: &Outline, position: usize) {
        self.position = position.min(char_len(&outline[self.item].title));
    }

    pub fn move_to_start(&mut self) {
        self.position = 0;
    }

    pub fn move_to_end(&mut self, outline: &Outline) {
        self.position = char_len(&outline[self.item].title);
    }

    pub fn move_left(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn move_right(&mut self, outline: &Outline) {
        self.set_position(outline, self.position + 1);
    }

    /// Splice `text` into the title at the caret and advance past it.
    pub fn insert_text(&mut self, outline: &mut Outline, text: &str) {
        let title = &mut outline[self.item].title;
        let at = byte_offset(title, self.position);
        title.insert_str(at, text);
        self.position += char_len(text);
    }

    /// Delete the char before the caret; no-op at position 0.
    ///
    /// # Returns
    /// `true` when a char was removed.
    pub fn delete_backward(&mut self, outline: &mut Outline) -> bool {
        if self.position == 0 {
            return false;
        }
        let title = &mut outline[self.item].title;
        let at = byte_offset(title, self.position - 1);
        if at >= title.len() {
            return false;
        }
        title.remove(at);
        self.position -= 1;
        true
    }

    /// Jump past the next space after `position + 1`, or to the end.
    pub fn jump_word_forward(&mut self, outline: &Outline) {
        let title: Vec<char> = outline[self.item].title.chars().collect();
        let from = (self.position + 1).min(title.len());
        self.position = title[from..]
            .iter()
            .position(|ch| *ch == ' ')
            .map(|offset| from + offset + 1)
            .unwrap_or(title.len());
    }

    /// Jump to the start of the word before the caret, or to 0.
    pub fn jump_word_backward(&mut self, outline: &Outline) {
        if self.position == 0 {
            return;
        }
        let title: Vec<char> = outline[self.item].title.chars().collect();
        let until = (self.position - 1).min(title.len());
        self.position = title[..until]
            .iter()
            .rposition(|ch| *ch == ' ')
            .map(|space| space + 1)
            .unwrap_or(0);
    }
}
