//! File system operations
//!
//! The storage capability used by the note resolver, and its local-directory
//! implementation. Only [`ConfinedPath`]s are accepted, so no operation can
//! address the root itself or anything above it.

use log::{debug, warn};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::storage::results::{DirEntry, EntryKind, StorageEntry};
use crate::storage::validation::ConfinedPath;

/// Narrow storage capability rooted at a fixed directory.
pub trait Storage: Send + Sync {
    /// Stat a path. A missing path is `StorageEntry::Missing`, not an error.
    fn stat(&self, path: &ConfinedPath) -> Result<StorageEntry, StorageError>;

    /// Read a file, stopping after `limit + 1` bytes so an oversized file is
    /// detectable without being loaded whole.
    fn read(&self, path: &ConfinedPath, limit: u64) -> Result<Vec<u8>, StorageError>;

    /// List a directory, sorted by name.
    fn list(&self, path: &ConfinedPath) -> Result<Vec<DirEntry>, StorageError>;

    /// List the root directory, sorted by name.
    fn list_root(&self) -> Result<Vec<DirEntry>, StorageError>;

    /// Replace the content of a file, creating missing parent directories
    /// below the root.
    fn write(&self, path: &ConfinedPath, data: &[u8]) -> Result<(), StorageError>;
}

/// Storage backed by a local directory.
///
/// The root is neither created nor checked; it belongs to the surrounding
/// process.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_dir_sorted(&self, real_path: &Path, virtual_path: &str) -> Result<Vec<DirEntry>, StorageError> {
        let entries = fs::read_dir(real_path).map_err(|e| StorageError::from_io(virtual_path, e))?;

        let mut listing = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::from_io(virtual_path, e))?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("Skipping non UTF-8 entry {:?} in {}", raw, virtual_path);
                    continue;
                }
            };

            // Follow symlinks so listing agrees with stat.
            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Skipping unreadable entry {} in {}: {}", name, virtual_path, e);
                    continue;
                }
            };

            let kind = if metadata.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File {
                    size: metadata.len(),
                    modified: metadata.modified().ok(),
                }
            };
            listing.push(DirEntry { name, kind });
        }

        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    /// Creates the parent directories of `path` one level at a time, so a
    /// missing root fails instead of being created.
    fn create_parents(&self, path: &ConfinedPath) -> Result<(), StorageError> {
        let segments: Vec<&str> = path.segments().collect();
        let mut current = self.root.clone();

        for segment in &segments[..segments.len() - 1] {
            current.push(segment);
            match fs::create_dir(&current) {
                Ok(()) => debug!("Created directory {}", current.display()),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && current.is_dir() => {}
                Err(e) => return Err(StorageError::from_io(path.as_str(), e)),
            }
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    fn stat(&self, path: &ConfinedPath) -> Result<StorageEntry, StorageError> {
        let real_path = path.to_real_path(&self.root);

        let metadata = match fs::metadata(&real_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StorageEntry::Missing),
            Err(e) => return Err(StorageError::from_io(path.as_str(), e)),
        };

        if metadata.is_dir() {
            let entries = self.read_dir_sorted(&real_path, path.as_str())?;
            return Ok(StorageEntry::Directory { entries });
        }

        Ok(StorageEntry::File {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    fn read(&self, path: &ConfinedPath, limit: u64) -> Result<Vec<u8>, StorageError> {
        let real_path = path.to_real_path(&self.root);

        let file = fs::File::open(&real_path).map_err(|e| StorageError::from_io(path.as_str(), e))?;
        let metadata = file.metadata().map_err(|e| StorageError::from_io(path.as_str(), e))?;
        if metadata.is_dir() {
            return Err(StorageError::IsDirectory(path.to_string()));
        }

        let mut content = Vec::new();
        file.take(limit.saturating_add(1))
            .read_to_end(&mut content)
            .map_err(|e| StorageError::from_io(path.as_str(), e))?;
        Ok(content)
    }

    fn list(&self, path: &ConfinedPath) -> Result<Vec<DirEntry>, StorageError> {
        let real_path = path.to_real_path(&self.root);
        self.read_dir_sorted(&real_path, path.as_str())
    }

    fn list_root(&self) -> Result<Vec<DirEntry>, StorageError> {
        self.read_dir_sorted(&self.root, "/")
    }

    fn write(&self, path: &ConfinedPath, data: &[u8]) -> Result<(), StorageError> {
        self.create_parents(path)?;

        let real_path = path.to_real_path(&self.root);
        if real_path.is_dir() {
            return Err(StorageError::IsDirectory(path.to_string()));
        }

        fs::write(&real_path, data).map_err(|e| StorageError::from_io(path.as_str(), e))?;
        debug!("Wrote {} bytes to {}", data.len(), real_path.display());
        Ok(())
    }
}
