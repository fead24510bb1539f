//! Keyed JSON snapshots of a whole outline.
//!
//! The stored form nests children inside their parent and leaves parent
//! links out; they are rebuilt top-down when a snapshot is restored.

use crate::error::OutlineError;
use crate::tree::{ItemId, Outline, View};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Serializable copy of an item and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub title: String,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub children: Vec<ItemSnapshot>,
}

impl Outline {
    /// Capture the reachable tree, root included.
    pub fn to_snapshot(&self) -> ItemSnapshot {
        self.snapshot_of(self.root())
    }

    fn snapshot_of(&self, id: ItemId) -> ItemSnapshot {
        let item = &self[id];
        ItemSnapshot {
            title: item.title.clone(),
            view: item.view,
            is_open: item.is_open,
            children: item
                .children()
                .iter()
                .map(|child| self.snapshot_of(*child))
                .collect(),
        }
    }

    /// Rebuild an outline, assigning each child's parent on the way down.
    pub fn from_snapshot(snapshot: &ItemSnapshot) -> Result<Self, OutlineError> {
        let mut outline = Outline::with_root_title(snapshot.title.clone());
        let root = outline.root();
        outline[root].view = snapshot.view;
        outline[root].is_open = snapshot.is_open;

        let mut stack: Vec<(ItemId, &ItemSnapshot)> = vec![(root, snapshot)];
        while let Some((parent, node)) = stack.pop() {
            for child in &node.children {
                let id = outline.create_item(child.title.clone());
                outline[id].view = child.view;
                outline[id].is_open = child.is_open;
                outline.insert_as_last_child(parent, id)?;
                stack.push((id, child));
            }
        }
        Ok(outline)
    }
}

fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Directory-backed map from a key to one outline snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, OutlineError> {
        if !valid_key(key) {
            return Err(OutlineError::Unsupported(format!(
                "storage key '{key}' must be non-empty ASCII letters, digits, '-' or '_'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Write `outline` under `key`, replacing any earlier snapshot.
    ///
    /// The file is written next to its target and renamed into place.
    pub fn save(&self, key: &str, outline: &Outline) -> Result<(), OutlineError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        let bytes = serde_json::to_vec(&outline.to_snapshot())?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &path)?;
        tracing::info!(key, path = %path.display(), "saved outline snapshot");
        Ok(())
    }

    /// Read the snapshot stored under `key`.
    ///
    /// # Returns
    /// `Ok(None)` when nothing was saved under the key.
    pub fn load(&self, key: &str) -> Result<Option<Outline>, OutlineError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot: ItemSnapshot = serde_json::from_slice(&bytes)?;
        let outline = Outline::from_snapshot(&snapshot)?;
        tracing::info!(key, items = outline.live_count() - 1, "loaded outline snapshot");
        Ok(Some(outline))
    }

    /// Delete the snapshot under `key`.
    ///
    /// # Returns
    /// `true` when a snapshot existed.
    pub fn remove(&self, key: &str) -> Result<bool, OutlineError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
