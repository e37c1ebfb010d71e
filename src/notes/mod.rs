//! Notes module
//!
//! Resolves GET and POST requests for notes into read-models or validated
//! writes, on top of the storage and content layers.

mod resolver;
mod results;

// Re-export public types and functions
pub use resolver::NoteResolver;
pub use results::{BrowseEntry, BrowseView, Note, Resolution};
