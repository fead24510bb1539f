//! Actions a key binding can trigger.

/// Where a freshly created item lands relative to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    After,
    Before,
    FirstChild,
}

/// Abstract commands consumed by [`crate::app::Outliner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    SelectUp,
    SelectDown,
    /// Close the item, or select its parent when already closed.
    CollapseOrSelectParent,
    /// Open the item, or select its first child when already open.
    ExpandOrSelectFirstChild,
    SelectParent,
    SelectNextSibling,
    SelectPreviousSibling,
    SelectFirstChild,
    /// Confine navigation to the selected item's subtree.
    FocusSelected,
    /// Widen the focus to the focused item's parent.
    FocusParent,

    MoveItemUp,
    MoveItemDown,
    MoveItemLeft,
    MoveItemRight,

    Create(Placement),
    RemoveSelected,
    ReplaceTitle,
    EditAtStart,
    EditAtEnd,

    CaretLeft,
    CaretRight,
    CaretToStart,
    CaretToEnd,
    JumpWordForward,
    JumpWordBackward,
    DeleteBackward,

    Undo,
    Redo,
    ToggleView,
    CopySubtree,
    PasteItems,
    PasteText,
    SaveToFile,
    LoadFromFile,

    /// Leave insert mode, recording the edit.
    CommitEdit,
    /// Commit, then create a sibling below and keep editing.
    CommitAndCreateSibling,
}

impl Action {
    /// True for actions that work inside an open title edit.
    ///
    /// Any other action commits the edit first.
    pub fn continues_edit(self) -> bool {
        matches!(
            self,
            Action::CaretLeft
                | Action::CaretRight
                | Action::CaretToStart
                | Action::CaretToEnd
                | Action::JumpWordForward
                | Action::JumpWordBackward
                | Action::DeleteBackward
                | Action::PasteText
                | Action::CommitEdit
                | Action::CommitAndCreateSibling
        )
    }

    /// Short human-readable description for binding listings.
    pub fn describe(self) -> &'static str {
        match self {
            Action::SelectUp => "select item above",
            Action::SelectDown => "select item below",
            Action::CollapseOrSelectParent => "close item or select parent",
            Action::ExpandOrSelectFirstChild => "open item or select first child",
            Action::SelectParent => "select parent",
            Action::SelectNextSibling => "select next sibling",
            Action::SelectPreviousSibling => "select previous sibling",
            Action::SelectFirstChild => "select first child",
            Action::FocusSelected => "focus item",
            Action::FocusParent => "focus parent",
            Action::MoveItemUp => "move item up",
            Action::MoveItemDown => "move item down",
            Action::MoveItemLeft => "move item out one level",
            Action::MoveItemRight => "move item into previous sibling",
            Action::Create(Placement::After) => "create item below",
            Action::Create(Placement::Before) => "create item above",
            Action::Create(Placement::FirstChild) => "create first child",
            Action::RemoveSelected => "remove item",
            Action::ReplaceTitle => "replace title",
            Action::EditAtStart => "edit at start",
            Action::EditAtEnd => "edit at end",
            Action::CaretLeft => "caret left",
            Action::CaretRight => "caret right",
            Action::CaretToStart => "caret to start",
            Action::CaretToEnd => "caret to end",
            Action::JumpWordForward => "next word",
            Action::JumpWordBackward => "previous word",
            Action::DeleteBackward => "delete char before caret",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::ToggleView => "toggle tree/board view",
            Action::CopySubtree => "copy item to clipboard",
            Action::PasteItems => "paste items below",
            Action::PasteText => "paste text at caret",
            Action::SaveToFile => "save to file",
            Action::LoadFromFile => "load from file",
            Action::CommitEdit => "finish editing",
            Action::CommitAndCreateSibling => "finish editing and add item below",
        }
    }
}
