//! Error types for the outline model, key dispatch and persistence.
use thiserror::Error;

use crate::keymap::Mode;

/// Top-level error type for outline operations.
#[derive(Error, Debug)]
pub enum OutlineError {
    /// A tree operation was asked to do something the structure forbids.
    ///
    /// Reaching this means a selection or dispatch bug, not user error.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Ambiguous binding in {mode:?} mode for '{chord}'")]
    AmbiguousBinding { mode: Mode, chord: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The host cannot provide a capability (file system, clipboard).
    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OutlineError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
