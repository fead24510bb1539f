//! Core library for viztly: outline tree, undo history and modal key dispatch.

/// Modal command dispatch and session state.
pub mod app;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Caret over the selected title.
pub mod cursor;
/// In-flight title edit sessions.
pub mod edit;
/// Error types.
pub mod error;
/// Undo/redo history.
pub mod history;
/// Clipboard and file collaborator traits.
pub mod host;
/// Key events, bindings and chord notation.
pub mod keymap;
/// Outline text format and keyed snapshots.
pub mod persistence;
/// Arena-backed outline tree and traversal.
pub mod tree;

#[cfg(test)]
mod env;

pub use app::{DispatchOutcome, Outliner};
pub use config::Config;
pub use error::OutlineError;
pub use history::{Change, History};
pub use keymap::{Action, KeyEvent, Keymap, Mode};
pub use tree::{Item, ItemId, Outline, View};
