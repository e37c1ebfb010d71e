//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::time::SystemTime;

/// Result of a stat operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEntry {
    Missing,
    File {
        size: u64,
        modified: Option<SystemTime>,
    },
    /// Children, sorted by name.
    Directory { entries: Vec<DirEntry> },
}

/// Kind of a listed child
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File {
        size: u64,
        modified: Option<SystemTime>,
    },
    Directory,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}
