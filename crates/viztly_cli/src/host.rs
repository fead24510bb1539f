//! File store backed by paths given on the command line.

use std::fs;
use std::path::{Path, PathBuf};
use viztly_core::host::FileStore;
use viztly_core::OutlineError;

/// Headless stand-in for the open/save pickers.
///
/// A missing path plays the part of a dismissed picker.
#[derive(Debug, Default, Clone)]
pub struct DiskFiles {
    open_path: Option<PathBuf>,
    save_dir: Option<PathBuf>,
    last_saved: Option<PathBuf>,
}

impl DiskFiles {
    pub fn new(open_path: Option<PathBuf>, save_dir: Option<PathBuf>) -> Self {
        Self {
            open_path,
            save_dir,
            last_saved: None,
        }
    }

    /// Where the most recent save landed.
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }
}

impl FileStore for DiskFiles {
    fn open(&mut self) -> Result<Option<String>, OutlineError> {
        let Some(path) = &self.open_path else {
            return Ok(None);
        };
        let text = fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "opened outline file");
        Ok(Some(text))
    }

    fn save(&mut self, suggested_name: &str, text: &str) -> Result<bool, OutlineError> {
        let Some(dir) = &self.save_dir else {
            return Ok(false);
        };
        fs::create_dir_all(dir)?;
        let path = dir.join(suggested_name);
        let mut staging = path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        fs::write(&staging, text)?;
        fs::rename(&staging, &path)?;
        tracing::info!(path = %path.display(), "saved outline file");
        self.last_saved = Some(path);
        Ok(true)
    }
}
