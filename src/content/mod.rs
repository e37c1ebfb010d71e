//! Content gate
//!
//! Decides whether a blob is an acceptable note: text, and no larger than the
//! note size ceiling. Both checks run on reads and on writes.

pub mod limit;
pub mod sniff;

pub use limit::{MAX_NOTE_SIZE, check_size, read_bounded};
pub use sniff::sniff;

use std::io::Read;

use crate::error::ContentError;

/// Coarse class of a blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    Text,
    Binary,
}

impl ContentClass {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("text/") {
            ContentClass::Text
        } else {
            ContentClass::Binary
        }
    }
}

/// Classify a blob by sniffing its prefix.
pub fn classify(data: &[u8]) -> ContentClass {
    ContentClass::from_mime(sniff(data))
}

#[derive(Debug, Clone)]
pub struct ContentGate {
    limit: u64,
}

impl Default for ContentGate {
    fn default() -> Self {
        Self {
            limit: MAX_NOTE_SIZE,
        }
    }
}

impl ContentGate {
    /// Gate with a custom ceiling. Servers use [`ContentGate::default`].
    pub fn with_limit(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn classify(&self, data: &[u8]) -> ContentClass {
        classify(data)
    }

    /// Read an incoming body, bounded by the ceiling.
    pub fn enforce_size<R: Read>(&self, source: R) -> Result<Vec<u8>, ContentError> {
        read_bounded(source, self.limit)
    }

    pub fn check_size(&self, len: u64) -> Result<(), ContentError> {
        check_size(len, self.limit)
    }

    /// Accept `data` only if it sniffs as text.
    pub fn require_text(&self, data: &[u8]) -> Result<(), ContentError> {
        let mime = sniff(data);
        match ContentClass::from_mime(mime) {
            ContentClass::Text => Ok(()),
            ContentClass::Binary => Err(ContentError::UnsupportedType(mime)),
        }
    }
}
