//! Note resolution
//!
//! Runs a raw request path through the sanitizer, the storage and the content
//! gate, in that order. The resolver holds no mutable state and is meant to be
//! built once and shared.
//!
//! Saves are not serialized: two writes to the same path, or a write racing a
//! read, resolve as last-write-wins, and creating parent directories then
//! writing the file is not atomic.

use log::{info, warn};
use std::io::Read;

use crate::content::ContentGate;
use crate::error::NoteError;
use crate::error::handlers::handle_error;
use crate::notes::results::{BrowseEntry, BrowseView, Note, Resolution};
use crate::storage::{ConfinedPath, DirEntry, EntryKind, PathSanitizer, Storage, StorageEntry};

pub struct NoteResolver<S> {
    storage: S,
    sanitizer: PathSanitizer,
    gate: ContentGate,
}

impl<S: Storage> NoteResolver<S> {
    pub fn new(storage: S, sanitizer: PathSanitizer, gate: ContentGate) -> Self {
        Self {
            storage,
            sanitizer,
            gate,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn sanitizer(&self) -> &PathSanitizer {
        &self.sanitizer
    }

    /// Resolves a GET for `raw`.
    pub fn resolve(&self, raw: &str) -> Result<Resolution, NoteError> {
        self.try_resolve(raw)
            .inspect_err(|e| handle_error("resolve", e))
    }

    /// Lists the root directory. The root can be browsed but never edited.
    pub fn index(&self) -> Result<Resolution, NoteError> {
        let listing = self
            .storage
            .list_root()
            .map_err(NoteError::from)
            .inspect_err(|e| handle_error("index", e))?;
        Ok(Resolution::Browse(self.browse(None, listing)))
    }

    /// Saves the body read from `source` at `raw`, replacing any prior content.
    ///
    /// The path and the content are both checked before storage is touched.
    /// If the caller stops reading midway, nothing is written; a write that
    /// already reached storage is not rolled back.
    pub fn save<R: Read>(&self, raw: &str, source: R) -> Result<ConfinedPath, NoteError> {
        self.try_save(raw, source)
            .inspect_err(|e| handle_error("save", e))
    }

    fn sanitize(&self, raw: &str) -> Result<ConfinedPath, NoteError> {
        self.sanitizer.sanitize(raw).map_err(|reason| {
            warn!("Refusing path {:?}: {}", raw, reason);
            NoteError::InvalidPath(raw.to_string())
        })
    }

    fn try_resolve(&self, raw: &str) -> Result<Resolution, NoteError> {
        let path = self.sanitize(raw)?;

        match self.storage.stat(&path)? {
            StorageEntry::Missing => {
                info!("New note {}", path);
                Ok(Resolution::NewNote(Note::empty(path)))
            }
            StorageEntry::Directory { entries } => {
                let view = self.browse(Some(&path), entries);
                info!("Browsing {} ({} entries)", path, view.entries.len());
                Ok(Resolution::Browse(view))
            }
            StorageEntry::File { size, modified } => {
                self.gate
                    .check_size(size)
                    .map_err(|e| NoteError::from_content(path.as_str(), e))?;

                // The file may have grown since stat; the read stops one byte
                // past the limit.
                let content = self.storage.read(&path, self.gate.limit())?;
                self.gate
                    .check_size(content.len() as u64)
                    .and_then(|_| self.gate.require_text(&content))
                    .map_err(|e| NoteError::from_content(path.as_str(), e))?;

                info!("Opened note {} ({} bytes)", path, content.len());
                Ok(Resolution::Note(Note {
                    path,
                    content,
                    modified,
                }))
            }
        }
    }

    fn try_save<R: Read>(&self, raw: &str, source: R) -> Result<ConfinedPath, NoteError> {
        let path = self.sanitize(raw)?;

        let content = self
            .gate
            .enforce_size(source)
            .map_err(|e| NoteError::from_content(path.as_str(), e))?;
        self.gate
            .require_text(&content)
            .map_err(|e| NoteError::from_content(path.as_str(), e))?;

        if let StorageEntry::Directory { .. } = self.storage.stat(&path)? {
            return Err(NoteError::IsDirectory(path.to_string()));
        }

        self.storage.write(&path, &content)?;
        info!("Saved note {} ({} bytes)", path, content.len());
        Ok(path)
    }

    /// Builds the view of a directory, silently dropping children whose name
    /// would not pass the sanitizer.
    fn browse(&self, dir: Option<&ConfinedPath>, listing: Vec<DirEntry>) -> BrowseView {
        let entries = listing
            .into_iter()
            .filter_map(|entry| {
                let child = self.sanitizer.sanitize_child(&entry.name).ok()?;
                let path = match dir {
                    Some(dir) => dir.join_name(child.as_str()),
                    None => child,
                };
                let size = match entry.kind {
                    EntryKind::File { size, .. } => Some(size),
                    EntryKind::Directory => None,
                };
                Some(BrowseEntry {
                    is_dir: entry.is_dir(),
                    name: entry.name,
                    path,
                    size,
                })
            })
            .collect();

        BrowseView {
            path: dir.cloned(),
            entries,
        }
    }
}
