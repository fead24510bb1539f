//! Built-in binding tables. Order is priority within a mode.

use super::{Action, Binding, KeyCode, Modifiers as M, Placement};

const fn letter(ch: char, modifiers: M, action: Action) -> Binding {
    Binding::new(KeyCode::Letter(ch), modifiers, action)
}

const fn key(code: KeyCode, modifiers: M, action: Action) -> Binding {
    Binding::new(code, modifiers, action)
}

const SHIFT_CTRL: M = M {
    ctrl: true,
    shift: true,
    ..M::NONE
};

pub(super) fn normal_bindings() -> Vec<Binding> {
    vec![
        letter('h', M::ALT, Action::MoveItemLeft),
        letter('j', M::ALT, Action::MoveItemDown),
        letter('k', M::ALT, Action::MoveItemUp),
        letter('l', M::ALT, Action::MoveItemRight),
        letter('h', M::CTRL, Action::SelectParent),
        letter('j', M::CTRL, Action::SelectNextSibling),
        letter('k', M::CTRL, Action::SelectPreviousSibling),
        letter('l', M::CTRL, Action::SelectFirstChild),
        letter('h', M::NONE, Action::CollapseOrSelectParent),
        letter('j', M::NONE, Action::SelectDown),
        letter('k', M::NONE, Action::SelectUp),
        letter('l', M::NONE, Action::ExpandOrSelectFirstChild),
        key(KeyCode::Down, M::NONE, Action::SelectDown),
        key(KeyCode::Up, M::NONE, Action::SelectUp),
        letter('f', M::SHIFT, Action::FocusParent),
        letter('f', M::NONE, Action::FocusSelected),
        letter('s', M::META, Action::SaveToFile),
        letter('l', M::META, Action::LoadFromFile),
        letter('o', M::NONE, Action::Create(Placement::After)),
        letter('o', M::SHIFT, Action::Create(Placement::Before)),
        letter('o', M::CTRL, Action::Create(Placement::FirstChild)),
        letter('d', M::NONE, Action::RemoveSelected),
        letter('r', M::NONE, Action::ReplaceTitle),
        letter('i', M::NONE, Action::EditAtStart),
        letter('a', M::NONE, Action::EditAtEnd),
        letter('w', M::NONE, Action::JumpWordForward),
        letter('b', M::NONE, Action::JumpWordBackward),
        key(KeyCode::Symbol('^'), M::NONE, Action::CaretToStart),
        key(KeyCode::Symbol('$'), M::NONE, Action::CaretToEnd),
        letter('u', M::NONE, Action::Undo),
        letter('r', M::CTRL, Action::Redo),
        letter('z', SHIFT_CTRL, Action::Redo),
        letter('v', M::NONE, Action::ToggleView),
        letter('y', M::NONE, Action::CopySubtree),
        letter('p', M::NONE, Action::PasteItems),
    ]
}

pub(super) fn insert_bindings() -> Vec<Binding> {
    vec![
        key(KeyCode::Escape, M::NONE, Action::CommitEdit),
        key(KeyCode::Enter, M::NONE, Action::CommitAndCreateSibling),
        key(KeyCode::Backspace, M::NONE, Action::DeleteBackward),
        key(KeyCode::Left, M::ALT, Action::JumpWordBackward),
        key(KeyCode::Right, M::ALT, Action::JumpWordForward),
        key(KeyCode::Left, M::NONE, Action::CaretLeft),
        key(KeyCode::Right, M::NONE, Action::CaretRight),
        key(KeyCode::Home, M::NONE, Action::CaretToStart),
        key(KeyCode::End, M::NONE, Action::CaretToEnd),
        letter('v', M::META, Action::PasteText),
        letter('v', M::CTRL, Action::PasteText),
    ]
}
