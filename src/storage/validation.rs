//! Path validation
//!
//! Turns untrusted request paths into [`ConfinedPath`]s. Cleaning is purely
//! lexical: the filesystem is never consulted.

use std::fmt;
use std::path::{Path, PathBuf};
use unicode_general_category::{GeneralCategory, get_general_category};

/// Characters the Windows path library treats as separators or volume prefixes.
const RESERVED_CHARS: &[char] = &['\\', ':'];

/// A root-relative path that cannot address anything outside the storage root.
///
/// Segments are non-empty, never `.` or `..`, and there is always at least
/// one, so the root itself is not representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfinedPath(String);

impl ConfinedPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Last segment of the path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Parent path, or `None` when the parent is the root.
    pub fn parent(&self) -> Option<ConfinedPath> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| ConfinedPath(parent.to_string()))
    }

    /// Appends an already validated child name.
    pub(crate) fn join_name(&self, name: &str) -> ConfinedPath {
        ConfinedPath(format!("{}/{}", self.0, name))
    }

    /// Real location of this path under `root`.
    pub fn to_real_path(&self, root: &Path) -> PathBuf {
        let mut real = root.to_path_buf();
        for segment in self.segments() {
            real.push(segment);
        }
        real
    }
}

impl fmt::Display for ConfinedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reasons a raw path is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPath {
    Root,
    NonPrintable,
    EscapesRoot,
    HiddenEntry,
    ReservedCharacter,
}

impl fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPath::Root => write!(f, "path designates the root"),
            InvalidPath::NonPrintable => write!(f, "path contains a non-printable character"),
            InvalidPath::EscapesRoot => write!(f, "path climbs above the root"),
            InvalidPath::HiddenEntry => write!(f, "path contains a hidden entry"),
            InvalidPath::ReservedCharacter => write!(f, "path contains a reserved character"),
        }
    }
}

impl std::error::Error for InvalidPath {}

/// Filters layered on top of the structural traversal check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizerOptions {
    /// Reject segments starting with `.`.
    pub hide_dotfiles: bool,
    /// With `hide_dotfiles`, still accept a hidden final segment when a path is
    /// addressed directly. Listings keep hiding dotfiles either way.
    pub hidden_leaf_addressable: bool,
    /// Reject `\` and `:` inside segments.
    pub reject_reserved_chars: bool,
}

impl Default for SanitizerOptions {
    fn default() -> Self {
        Self {
            hide_dotfiles: true,
            hidden_leaf_addressable: false,
            reject_reserved_chars: cfg!(windows),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathSanitizer {
    options: SanitizerOptions,
}

impl PathSanitizer {
    pub fn new(options: SanitizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SanitizerOptions {
        &self.options
    }

    /// Validates a path addressed directly by a client.
    pub fn sanitize(&self, raw: &str) -> Result<ConfinedPath, InvalidPath> {
        self.sanitize_with(raw, self.options.hidden_leaf_addressable)
    }

    /// Validates a single directory entry name. The name must already be in
    /// canonical form and is held to the strict dotfile rule.
    pub fn sanitize_child(&self, name: &str) -> Result<ConfinedPath, InvalidPath> {
        if name.contains('/') {
            return Err(InvalidPath::ReservedCharacter);
        }
        let confined = self.sanitize_with(name, false)?;
        if confined.as_str() != name {
            return Err(InvalidPath::Root);
        }
        Ok(confined)
    }

    fn sanitize_with(&self, raw: &str, allow_hidden_leaf: bool) -> Result<ConfinedPath, InvalidPath> {
        if !raw.chars().all(is_printable) {
            return Err(InvalidPath::NonPrintable);
        }

        let raw_segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();

        if self.options.hide_dotfiles {
            let last = raw_segments.len().saturating_sub(1);
            let hidden = raw_segments.iter().enumerate().any(|(i, segment)| {
                is_hidden(segment) && !(allow_hidden_leaf && i == last)
            });
            if hidden {
                return Err(InvalidPath::HiddenEntry);
            }
        }

        let cleaned = clean_segments(&raw_segments)?;

        if self.options.reject_reserved_chars
            && cleaned.iter().any(|s| s.contains(RESERVED_CHARS))
        {
            return Err(InvalidPath::ReservedCharacter);
        }

        if cleaned.is_empty() {
            return Err(InvalidPath::Root);
        }

        Ok(ConfinedPath(cleaned.join("/")))
    }
}

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
/// Controls, format characters, separators other than `' '`, private use,
/// surrogates and unassigned code points are not printable.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

fn is_hidden(segment: &str) -> bool {
    segment.starts_with('.') && segment != "." && segment != ".."
}

/// Lexically resolves `.` and `..` against an assumed root. Fails instead of
/// clamping when a `..` would leave the root.
fn clean_segments<'a>(segments: &[&'a str]) -> Result<Vec<&'a str>, InvalidPath> {
    let mut stack = Vec::with_capacity(segments.len());
    for &segment in segments {
        match segment {
            "." => {}
            ".." => {
                if stack.pop().is_none() {
                    return Err(InvalidPath::EscapesRoot);
                }
            }
            name => stack.push(name),
        }
    }
    Ok(stack)
}
