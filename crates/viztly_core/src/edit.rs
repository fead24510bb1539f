//! In-flight title edits.

use crate::history::Change;
use crate::tree::{ItemId, Outline};

/// How the edited item came to be edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOrigin {
    /// The item was created for this edit; its Add change already covers it.
    FreshlyCreated,
    /// An existing title is being changed.
    ExistingEdit,
}

/// An insert-mode session over one item's title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    item: ItemId,
    original_title: String,
    origin: EditOrigin,
}

impl EditSession {
    pub fn begin(outline: &Outline, item: ItemId, origin: EditOrigin) -> Self {
        Self {
            item,
            original_title: outline[item].title.clone(),
            origin,
        }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn origin(&self) -> EditOrigin {
        self.origin
    }

    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    /// Close the session.
    ///
    /// # Returns
    /// A rename to record, or `None` for fresh items and unchanged titles.
    pub fn finish(self, outline: &Outline) -> Option<Change> {
        if self.origin == EditOrigin::FreshlyCreated {
            return None;
        }
        let current = outline.get(self.item)?.title.clone();
        if current == self.original_title {
            return None;
        }
        Some(Change::Rename {
            item: self.item,
            old_name: self.original_title,
            new_name: current,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_edit_yields_rename_only_when_changed() {
        let mut outline = Outline::new();
        let item = outline.create_item("before");

        let unchanged = EditSession::begin(&outline, item, EditOrigin::ExistingEdit);
        assert_eq!(unchanged.finish(&outline), None);

        let session = EditSession::begin(&outline, item, EditOrigin::ExistingEdit);
        outline[item].title = "after".to_string();
        assert_eq!(
            session.finish(&outline),
            Some(Change::Rename {
                item,
                old_name: "before".to_string(),
                new_name: "after".to_string(),
            })
        );
    }

    #[test]
    fn fresh_items_never_record_a_rename() {
        let mut outline = Outline::new();
        let item = outline.create_item("");
        let session = EditSession::begin(&outline, item, EditOrigin::FreshlyCreated);
        outline[item].title = "typed".to_string();
        assert_eq!(session.origin(), EditOrigin::FreshlyCreated);
        assert_eq!(session.finish(&outline), None);
    }
}
