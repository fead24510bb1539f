//! Shared constants used across viztly crates.

/// Suggested file name for saved outlines.
pub const DEFAULT_FILE_NAME: &str = "viztly.txt";

/// Title given to the implicit root item.
pub const ROOT_TITLE: &str = "Root";

/// Spaces per nesting level in the outline text format.
pub const INDENT_WIDTH: usize = 2;

/// Trailing token marking an item rendered as a board.
pub const BOARD_TOKEN: &str = "/board";
/// Trailing token marking a collapsed item.
pub const CLOSED_TOKEN: &str = "/closed";

/// Default number of undoable changes kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// Storage key for the autosaved outline snapshot.
pub const ITEMS_STORAGE_KEY: &str = "items";
