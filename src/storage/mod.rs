//! File system storage management
//!
//! Handles path confinement and file operations below the notes root.

pub mod filesystem;
pub mod results;
pub mod validation;

pub use filesystem::{LocalStorage, Storage};
pub use results::{DirEntry, EntryKind, StorageEntry};
pub use validation::{ConfinedPath, InvalidPath, PathSanitizer, SanitizerOptions};
