//! Result types for note resolution
//!
//! Read-models handed to the rendering layer.

use std::borrow::Cow;
use std::time::SystemTime;

use crate::storage::ConfinedPath;

/// A note that is served for editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub path: ConfinedPath,
    pub content: Vec<u8>,
    pub modified: Option<SystemTime>,
}

impl Note {
    /// Empty note for a path that does not exist yet.
    pub fn empty(path: ConfinedPath) -> Self {
        Self {
            path,
            content: Vec::new(),
            modified: None,
        }
    }

    pub fn filename(&self) -> &str {
        self.path.as_str()
    }

    /// Content as text, mainly for rendering.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// One visible child of a browsed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseEntry {
    pub name: String,
    pub path: ConfinedPath,
    pub is_dir: bool,
    /// Size in bytes, files only.
    pub size: Option<u64>,
}

/// Directory listing. `path` is `None` for the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseView {
    pub path: Option<ConfinedPath>,
    pub entries: Vec<BrowseEntry>,
}

impl BrowseView {
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Outcome of a successful GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NewNote(Note),
    Note(Note),
    Browse(BrowseView),
}
