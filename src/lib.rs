//! Root crate facade for the viztly outliner core.

pub use viztly_core::{
    app, config, constants, cursor, edit, error, history, host, keymap, persistence, tree, Action,
    Change, Config, DispatchOutcome, History, Item, ItemId, KeyEvent, Keymap, Mode, Outline,
    OutlineError, Outliner, View,
};
