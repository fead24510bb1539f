//! Modal command dispatch over the outline, cursor and history.
//!
//! [`Outliner`] is the whole mutable state of a session. One key event is
//! handled to completion before the next, which `&mut self` enforces.


use crate::constants::DEFAULT_FILE_NAME;
use crate::cursor::Cursor;
use crate::edit::{EditOrigin, EditSession};
use crate::error::OutlineError;
use crate::history::{Change, History};
use crate::host::{Clipboard, FileStore, MemoryClipboard, MemoryFiles};
use crate::keymap::{parse_script, Action, KeyEvent, Keymap, Mode, Placement};
use crate::persistence;
use crate::tree::{ItemId, Outline};

/// What happened to one key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A bound action ran to completion.
    Handled(Action),
    /// An unbound printable key was typed into the title.
    Inserted(char),
    /// Nothing is bound to the key in the current mode.
    Unbound,
    /// The action was abandoned with this error message.
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, DispatchOutcome::Failed(_))
    }
}

/// First top-level item, creating an empty one for an empty outline.
fn first_selectable(outline: &mut Outline) -> ItemId {
    let root = outline.root();
    match outline[root].children().first() {
        Some(first) => *first,
        None => outline.append_top_level(""),
    }
}

/// Outline, selection, history and mode of one editing session.
pub struct Outliner<C = MemoryClipboard, F = MemoryFiles> {
    outline: Outline,
    cursor: Cursor,
    /// Item whose subtree navigation is confined to; the root when unfocused.
    focused: ItemId,
    history: History,
    keymap: Keymap,
    mode: Mode,
    edit: Option<EditSession>,
    clipboard: C,
    files: F,
}

impl Outliner {
    /// Session backed by in-memory clipboard and files.
    pub fn in_memory(outline: Outline) -> Self {
        Self::new(outline, MemoryClipboard::default(), MemoryFiles::default())
    }
}

impl<C: Clipboard, F: FileStore> Outliner<C, F> {
    /// Start a session selecting the first top-level item.
    pub fn new(mut outline: Outline, clipboard: C, files: F) -> Self {
        let first = first_selectable(&mut outline);
        let mut cursor = Cursor::new(first);
        cursor.move_to(&mut outline, first);
        let focused = outline.root();
        Self {
            outline,
            cursor,
            focused,
            history: History::default(),
            keymap: Keymap::standard(),
            mode: Mode::Normal,
            edit: None,
            clipboard,
            files,
        }
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Replace the history with an empty one keeping at most `limit` changes.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = History::with_limit(limit);
        self
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn selected(&self) -> ItemId {
        self.cursor.item()
    }

    pub fn focused(&self) -> ItemId {
        self.focused
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut F {
        &mut self.files
    }

    /// One-line summary of mode, selection and caret.
    pub fn status_line(&self) -> String {
        format!(
            "{} | {} | {}",
            self.mode.as_str(),
            self.outline[self.selected()].title,
            self.cursor.position()
        )
    }

    /// Resolve `event` against the current mode and run the bound action.
    ///
    /// Failures are logged and returned as [`DispatchOutcome::Failed`] so
    /// the caller can keep feeding events.
    pub fn handle_key(&mut self, event: &KeyEvent) -> DispatchOutcome {
        let action = match self.keymap.resolve(self.mode, event) {
            Ok(action) => action,
            Err(err) => {
                tracing::warn!(chord = %event.chord(), error = %err, "key resolution failed");
                return DispatchOutcome::Failed(err.to_string());
            }
        };
        let Some(action) = action else {
            return self.type_char(event);
        };
        match self.perform(action) {
            Ok(()) => DispatchOutcome::Handled(action),
            Err(err) => {
                tracing::warn!(?action, error = %err, "action failed");
                DispatchOutcome::Failed(err.to_string())
            }
        }
    }

    /// Parse a key script and feed every event through [`Self::handle_key`].
    ///
    /// # Errors
    /// Returns [`OutlineError::Parse`] before any event runs when the script
    /// is malformed.
    pub fn run_script(&mut self, script: &str) -> Result<Vec<DispatchOutcome>, OutlineError> {
        let events = parse_script(script)?;
        Ok(events.iter().map(|event| self.handle_key(event)).collect())
    }

    /// Swap in a new document, dropping history and any open edit.
    pub fn replace_outline(&mut self, mut outline: Outline) {
        let first = first_selectable(&mut outline);
        self.edit = None;
        self.set_mode(Mode::Normal);
        self.history.clear();
        self.outline = outline;
        self.focused = self.outline.root();
        self.cursor = Cursor::new(first);
        self.select(first);
        tracing::info!(items = self.outline.live_count() - 1, "outline replaced");
    }

    fn type_char(&mut self, event: &KeyEvent) -> DispatchOutcome {
        if self.mode != Mode::Insert || self.edit.is_none() {
            return DispatchOutcome::Unbound;
        }
        let Some(ch) = event.printable() else {
            return DispatchOutcome::Unbound;
        };
        let mut buf = [0u8; 4];
        self.cursor
            .insert_text(&mut self.outline, ch.encode_utf8(&mut buf));
        DispatchOutcome::Inserted(ch)
    }

    fn perform(&mut self, action: Action) -> Result<(), OutlineError> {
        if self.edit.is_some() && !action.continues_edit() {
            self.commit_edit();
        }
        let selected = self.selected();
        match action {
            Action::SelectUp => self.navigate(self.outline.item_above(selected)),
            Action::SelectDown => {
                let below = if selected == self.focused {
                    self.outline[selected].children().first().copied()
                } else {
                    self.outline.item_below(selected)
                };
                self.navigate(below);
            }
            Action::CollapseOrSelectParent => {
                if self.outline[selected].is_open {
                    self.outline[selected].is_open = false;
                } else {
                    self.navigate(self.visible_parent(selected));
                }
            }
            Action::ExpandOrSelectFirstChild => {
                let item = &mut self.outline[selected];
                if item.has_children() && !item.is_open {
                    item.is_open = true;
                } else {
                    let first = item.children().first().copied();
                    self.navigate(first);
                }
            }
            Action::SelectParent => self.navigate(self.visible_parent(selected)),
            Action::SelectNextSibling => self.navigate(self.outline.following_sibling(selected)),
            Action::SelectPreviousSibling => {
                self.navigate(self.outline.previous_sibling(selected));
            }
            Action::SelectFirstChild => {
                if let Some(first) = self.outline[selected].children().first().copied() {
                    self.outline[selected].is_open = true;
                    self.navigate(Some(first));
                }
            }
            Action::FocusSelected => self.set_focus(selected),
            Action::FocusParent => {
                if let Some(parent) = self.outline.get(self.focused).and_then(|item| item.parent()) {
                    self.set_focus(parent);
                }
            }
            Action::MoveItemUp => self.shift_within_parent(selected, false)?,
            Action::MoveItemDown => self.shift_within_parent(selected, true)?,
            Action::MoveItemLeft => self.outdent(selected)?,
            Action::MoveItemRight => self.indent(selected)?,
            Action::Create(placement) => self.create(placement)?,
            Action::RemoveSelected => self.remove_selected()?,
            Action::ReplaceTitle => {
                self.begin_edit(EditOrigin::ExistingEdit);
                self.outline[selected].title.clear();
                self.cursor.move_to_start();
            }
            Action::EditAtStart => {
                self.begin_edit(EditOrigin::ExistingEdit);
                self.cursor.move_to_start();
            }
            Action::EditAtEnd => {
                self.begin_edit(EditOrigin::ExistingEdit);
                self.cursor.move_to_end(&self.outline);
            }
            Action::CaretLeft => self.cursor.move_left(),
            Action::CaretRight => self.cursor.move_right(&self.outline),
            Action::CaretToStart => self.cursor.move_to_start(),
            Action::CaretToEnd => self.cursor.move_to_end(&self.outline),
            Action::JumpWordForward => self.cursor.jump_word_forward(&self.outline),
            Action::JumpWordBackward => self.cursor.jump_word_backward(&self.outline),
            Action::DeleteBackward => {
                if self.edit.is_some() {
                    self.cursor.delete_backward(&mut self.outline);
                }
            }
            Action::Undo => self.undo()?,
            Action::Redo => self.redo()?,
            Action::ToggleView => {
                let item = &mut self.outline[selected];
                item.view = item.view.toggled();
            }
            Action::CopySubtree => {
                let text = persistence::serialize_subtree(&self.outline, selected);
                self.clipboard.write_text(&text)?;
            }
            Action::PasteItems => self.paste_items()?,
            Action::PasteText => self.paste_text()?,
            Action::SaveToFile => self.save_to_file()?,
            Action::LoadFromFile => self.load_from_file()?,
            Action::CommitEdit => self.commit_edit(),
            Action::CommitAndCreateSibling => {
                self.commit_edit();
                self.create(Placement::After)?;
            }
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = self.mode.as_str(), to = mode.as_str(), "mode change");
            self.mode = mode;
        }
    }

    /// Select `item`, widening the focus until it contains the item.
    fn select(&mut self, item: ItemId) {
        self.cursor.move_to(&mut self.outline, item);
        let root = self.outline.root();
        while self.focused != root && !self.in_focus(item) {
            let widened = self
                .outline
                .get(self.focused)
                .and_then(|focused| focused.parent())
                .unwrap_or(root);
            self.set_focus(widened);
        }
    }

    /// Follow a navigation target; targets outside the focus are ignored.
    fn navigate(&mut self, target: Option<ItemId>) {
        if let Some(item) = target.filter(|item| self.in_focus(*item)) {
            self.select(item);
        }
    }

    fn in_focus(&self, item: ItemId) -> bool {
        self.outline.is_ancestor_or_self(self.focused, item)
    }

    fn set_focus(&mut self, item: ItemId) {
        if self.focused != item {
            tracing::debug!(from = %self.focused, to = %item, "focus change");
            self.focused = item;
        }
    }

    fn is_selectable(&self, item: ItemId) -> bool {
        !self.outline.is_root(item) && self.outline.is_reachable(item)
    }

    fn visible_parent(&self, item: ItemId) -> Option<ItemId> {
        let parent = self.outline.get(item)?.parent()?;
        (!self.outline.is_root(parent)).then_some(parent)
    }

    fn begin_edit(&mut self, origin: EditOrigin) {
        self.edit = Some(EditSession::begin(&self.outline, self.selected(), origin));
        self.set_mode(Mode::Insert);
    }

    fn commit_edit(&mut self) {
        if let Some(session) = self.edit.take() {
            self.trim_leading_whitespace(session.item());
            if let Some(change) = session.finish(&self.outline) {
                self.record(change);
            }
        }
        self.set_mode(Mode::Normal);
    }

    /// Leading whitespace would read back as indentation.
    fn trim_leading_whitespace(&mut self, item: ItemId) {
        let title = &mut self.outline[item].title;
        let removed = title.len() - title.trim_start().len();
        if removed == 0 {
            return;
        }
        let removed_chars = title[..removed].chars().count();
        title.replace_range(..removed, "");
        if self.cursor.item() == item {
            let position = self.cursor.position().saturating_sub(removed_chars);
            self.cursor.set_position(&self.outline, position);
        }
    }

    fn record(&mut self, change: Change) {
        let discarded = self.history.record(change);
        if !discarded.is_empty() {
            self.release_discarded(&discarded);
        }
    }

    /// Topmost ancestor of an item that is no longer part of the tree.
    fn detached_top(&self, item: ItemId) -> Option<ItemId> {
        if !self.outline.contains(item) || self.outline.is_reachable(item) {
            return None;
        }
        let mut top = item;
        while let Some(parent) = self.outline[top].parent() {
            top = parent;
        }
        Some(top)
    }

    /// Free detached subtrees that no kept change can bring back.
    fn release_discarded(&mut self, discarded: &[Change]) {
        let mut candidates: Vec<ItemId> = discarded
            .iter()
            .flat_map(Change::referenced_items)
            .collect();
        candidates.sort();
        candidates.dedup();
        for item in candidates {
            let Some(top) = self.detached_top(item) else {
                continue;
            };
            let still_referenced = self
                .outline
                .subtree(top)
                .iter()
                .any(|(node, _)| self.history.references(*node));
            if still_referenced {
                continue;
            }
            match self.outline.release(top) {
                Ok(count) => tracing::debug!(item = %top, count, "released detached items"),
                Err(err) => tracing::warn!(item = %top, error = %err, "failed to release items"),
            }
        }
    }

    fn create(&mut self, placement: Placement) -> Result<(), OutlineError> {
        let anchor = self.selected();
        let item = self.outline.create_item("");
        let attached = match placement {
            Placement::After => self.outline.insert_after(anchor, item),
            Placement::Before => self.outline.insert_before(anchor, item),
            Placement::FirstChild => self.outline.insert_as_first_child(anchor, item),
        };
        if let Err(err) = attached {
            self.outline.release(item)?;
            return Err(err);
        }
        self.record_add(item, anchor)?;
        self.select(item);
        self.begin_edit(EditOrigin::FreshlyCreated);
        Ok(())
    }

    fn record_add(&mut self, item: ItemId, previously_selected: ItemId) -> Result<(), OutlineError> {
        let parent = self.outline[item]
            .parent()
            .ok_or_else(|| OutlineError::invariant(format!("added item {item} is detached")))?;
        let position = self
            .outline
            .index_in_parent(item)
            .ok_or_else(|| OutlineError::invariant(format!("{item} missing from its parent")))?;
        self.record(Change::Add {
            item,
            parent,
            position,
            previously_selected,
        });
        Ok(())
    }

    fn remove_selected(&mut self) -> Result<(), OutlineError> {
        let item = self.selected();
        let Some(next) = self.outline.item_to_select_after_removing(item) else {
            tracing::debug!(item = %item, "not removing the last remaining item");
            return Ok(());
        };
        let parent = self.outline[item]
            .parent()
            .ok_or_else(|| OutlineError::invariant(format!("selected item {item} is detached")))?;
        let position = self
            .outline
            .remove(item)?
            .ok_or_else(|| OutlineError::invariant(format!("selected item {item} is detached")))?;
        self.record(Change::Remove {
            item,
            parent,
            position,
            item_to_select_after: Some(next),
        });
        self.select(next);
        Ok(())
    }

    /// Reattach `item` at `new_index` of `new_parent` and record the move.
    fn move_item(&mut self, item: ItemId, new_parent: ItemId, new_index: usize) -> Result<(), OutlineError> {
        let (Some(old_parent), Some(old_index)) =
            (self.outline[item].parent(), self.outline.index_in_parent(item))
        else {
            return Err(OutlineError::invariant(format!("cannot move detached item {item}")));
        };
        self.outline.add_at(new_parent, item, new_index)?;
        let new_index = self
            .outline
            .index_in_parent(item)
            .ok_or_else(|| OutlineError::invariant(format!("{item} missing after move")))?;
        self.record(Change::Move {
            item,
            old_parent,
            old_index,
            new_parent,
            new_index,
        });
        Ok(())
    }

    fn shift_within_parent(&mut self, item: ItemId, forward: bool) -> Result<(), OutlineError> {
        let Some(parent) = self.outline[item].parent() else {
            return Ok(());
        };
        let count = self.outline[parent].children().len();
        let Some(index) = self.outline.index_in_parent(item) else {
            return Ok(());
        };
        let target = if forward {
            (index + 1 < count).then_some(index + 1)
        } else {
            index.checked_sub(1)
        };
        match target {
            Some(target) => self.move_item(item, parent, target),
            None => Ok(()),
        }
    }

    /// Make `item` the last child of its previous sibling.
    fn indent(&mut self, item: ItemId) -> Result<(), OutlineError> {
        let Some(previous) = self.outline.previous_sibling(item) else {
            return Ok(());
        };
        let end = self.outline[previous].children().len();
        self.move_item(item, previous, end)
    }

    /// Place `item` right after its parent, staying inside the focus.
    fn outdent(&mut self, item: ItemId) -> Result<(), OutlineError> {
        let Some(parent) = self.visible_parent(item) else {
            return Ok(());
        };
        if parent == self.focused {
            return Ok(());
        }
        let (Some(grandparent), Some(parent_index)) =
            (self.outline[parent].parent(), self.outline.index_in_parent(parent))
        else {
            return Ok(());
        };
        self.move_item(item, grandparent, parent_index + 1)
    }

    fn undo(&mut self) -> Result<(), OutlineError> {
        let Some(change) = self.history.undo(&mut self.outline)? else {
            return Ok(());
        };
        let target = match &change {
            Change::Add {
                previously_selected,
                ..
            } => Some(*previously_selected),
            other => Some(other.item()),
        };
        self.restore_selection(target);
        Ok(())
    }

    fn redo(&mut self) -> Result<(), OutlineError> {
        let Some(change) = self.history.redo(&mut self.outline)? else {
            return Ok(());
        };
        let target = match &change {
            Change::Remove {
                item_to_select_after,
                ..
            } => *item_to_select_after,
            other => Some(other.item()),
        };
        self.restore_selection(target);
        Ok(())
    }

    /// Select `target` when it is visible, else keep or repair the selection.
    fn restore_selection(&mut self, target: Option<ItemId>) {
        let current = self.selected();
        let next = match target.filter(|item| self.is_selectable(*item)) {
            Some(item) => item,
            None if self.is_selectable(current) => current,
            None => first_selectable(&mut self.outline),
        };
        self.select(next);
    }

    fn paste_items(&mut self) -> Result<(), OutlineError> {
        let Some(text) = self.clipboard.read_text()? else {
            return Ok(());
        };
        let items = persistence::parse_detached(&mut self.outline, &text)?;
        let mut anchor = self.selected();
        for item in items {
            self.outline.insert_after(anchor, item)?;
            self.record_add(item, anchor)?;
            anchor = item;
        }
        if anchor != self.selected() {
            self.select(anchor);
        }
        Ok(())
    }

    /// Insert the first clipboard line at the caret.
    fn paste_text(&mut self) -> Result<(), OutlineError> {
        if self.edit.is_none() {
            return Ok(());
        }
        let Some(text) = self.clipboard.read_text()? else {
            return Ok(());
        };
        let line: String = text
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|ch| !ch.is_control())
            .collect();
        if !line.is_empty() {
            self.cursor.insert_text(&mut self.outline, &line);
        }
        Ok(())
    }

    fn save_to_file(&mut self) -> Result<(), OutlineError> {
        let text = persistence::serialize(&self.outline);
        if self.files.save(DEFAULT_FILE_NAME, &text)? {
            tracing::info!(bytes = text.len(), "outline saved");
        } else {
            tracing::debug!("save dismissed");
        }
        Ok(())
    }

    fn load_from_file(&mut self) -> Result<(), OutlineError> {
        let Some(text) = self.files.open()? else {
            tracing::debug!("open dismissed");
            return Ok(());
        };
        let outline = persistence::parse(&text)?;
        self.replace_outline(outline);
        Ok(())
    }
}
