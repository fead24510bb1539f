//! Collaborators the dispatcher calls out to: clipboard and file picker.
//!
//! A dismissed picker is not an error. `open` returns `Ok(None)` and
//! `save` returns `Ok(false)` so callers can leave state untouched.

use crate::error::OutlineError;

/// System clipboard access.
pub trait Clipboard {
    fn read_text(&mut self) -> Result<Option<String>, OutlineError>;
    fn write_text(&mut self, text: &str) -> Result<(), OutlineError>;
}

/// File picker plus the file read/write behind it.
pub trait FileStore {
    /// Ask the user for a file and return its contents.
    fn open(&mut self) -> Result<Option<String>, OutlineError>;
    /// Ask the user where to save `text`, suggesting `suggested_name`.
    fn save(&mut self, suggested_name: &str, text: &str) -> Result<bool, OutlineError>;
}

/// Process-local clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&mut self) -> Result<Option<String>, OutlineError> {
        Ok(self.contents.clone())
    }

    fn write_text(&mut self, text: &str) -> Result<(), OutlineError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// In-memory file store; an empty pending open acts as a dismissed picker.
#[derive(Debug, Default, Clone)]
pub struct MemoryFiles {
    /// Contents handed out by the next `open`.
    pub pending_open: Option<String>,
    /// Every accepted save as `(name, text)`.
    pub saved: Vec<(String, String)>,
    /// When set, `save` behaves as if the user dismissed the picker.
    pub dismiss_saves: bool,
}

impl FileStore for MemoryFiles {
    fn open(&mut self) -> Result<Option<String>, OutlineError> {
        Ok(self.pending_open.take())
    }

    fn save(&mut self, suggested_name: &str, text: &str) -> Result<bool, OutlineError> {
        if self.dismiss_saves {
            return Ok(false);
        }
        self.saved.push((suggested_name.to_string(), text.to_string()));
        Ok(true)
    }
}

/// Host without any file access.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFileAccess;

impl FileStore for NoFileAccess {
    fn open(&mut self) -> Result<Option<String>, OutlineError> {
        Err(OutlineError::Unsupported(
            "host has no file open picker".to_string(),
        ))
    }

    fn save(&mut self, _suggested_name: &str, _text: &str) -> Result<bool, OutlineError> {
        Err(OutlineError::Unsupported(
            "host has no file save picker".to_string(),
        ))
    }
}
