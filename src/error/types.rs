//! Error types
//!
//! Defines domain-specific error types for each layer of the notes server.

use std::fmt;
use std::io;

/// Storage module errors
///
/// Every variant carries the root-relative path the operation was addressed to.
#[derive(Debug)]
pub enum StorageError {
    NotExist(String),
    PermissionDenied(String),
    IsDirectory(String),
    Other(String, io::Error),
}

impl StorageError {
    /// Classifies an I/O error raised while operating on `path`.
    pub fn from_io(path: &str, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                StorageError::NotExist(path.to_string())
            }
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(path.to_string()),
            io::ErrorKind::IsADirectory => StorageError::IsDirectory(path.to_string()),
            _ => StorageError::Other(path.to_string(), error),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotExist(p) => write!(f, "No such file or directory: {}", p),
            StorageError::PermissionDenied(p) => write!(f, "Permission denied: {}", p),
            StorageError::IsDirectory(p) => write!(f, "Is a directory: {}", p),
            StorageError::Other(p, e) => write!(f, "I/O error on {}: {}", p, e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Other(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Content gate errors
#[derive(Debug)]
pub enum ContentError {
    TooLarge { limit: u64 },
    UnsupportedType(&'static str),
    ReadFailed(io::Error),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::TooLarge { limit } => write!(f, "Content exceeds {} bytes", limit),
            ContentError::UnsupportedType(mime) => write!(f, "Unsupported content type: {}", mime),
            ContentError::ReadFailed(e) => write!(f, "Failed to read content: {}", e),
        }
    }
}

impl std::error::Error for ContentError {}

impl From<io::Error> for ContentError {
    fn from(error: io::Error) -> Self {
        ContentError::ReadFailed(error)
    }
}

/// Kind of a [`NoteError`], the only part of a failure that reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidPath,
    IsDirectory,
    TooLarge,
    UnsupportedType,
    NotFound,
    PermissionDenied,
    Io,
}

/// Errors produced while resolving or saving a note
#[derive(Debug)]
pub enum NoteError {
    InvalidPath(String),
    IsDirectory(String),
    TooLarge(String),
    UnsupportedType { path: String, mime: &'static str },
    NotFound(String),
    PermissionDenied(String),
    Io(String, io::Error),
}

impl NoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NoteError::InvalidPath(_) => ErrorKind::InvalidPath,
            NoteError::IsDirectory(_) => ErrorKind::IsDirectory,
            NoteError::TooLarge(_) => ErrorKind::TooLarge,
            NoteError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            NoteError::NotFound(_) => ErrorKind::NotFound,
            NoteError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            NoteError::Io(_, _) => ErrorKind::Io,
        }
    }

    /// Attaches the addressed path to a content gate failure.
    pub fn from_content(path: &str, error: ContentError) -> Self {
        match error {
            ContentError::TooLarge { .. } => NoteError::TooLarge(path.to_string()),
            ContentError::UnsupportedType(mime) => NoteError::UnsupportedType {
                path: path.to_string(),
                mime,
            },
            ContentError::ReadFailed(e) => NoteError::Io(path.to_string(), e),
        }
    }
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::InvalidPath(p) => write!(f, "Invalid path: {:?}", p),
            NoteError::IsDirectory(p) => write!(f, "Is a directory: {}", p),
            NoteError::TooLarge(p) => write!(f, "Note is too large: {}", p),
            NoteError::UnsupportedType { path, mime } => {
                write!(f, "Unsupported content type {} for {}", mime, path)
            }
            NoteError::NotFound(p) => write!(f, "Not found: {}", p),
            NoteError::PermissionDenied(p) => write!(f, "Permission denied: {}", p),
            NoteError::Io(p, e) => write!(f, "I/O error on {}: {}", p, e),
        }
    }
}

impl std::error::Error for NoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NoteError::Io(_, e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for NoteError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotExist(p) => NoteError::NotFound(p),
            StorageError::PermissionDenied(p) => NoteError::PermissionDenied(p),
            StorageError::IsDirectory(p) => NoteError::IsDirectory(p),
            StorageError::Other(p, e) => NoteError::Io(p, e),
        }
    }
}
