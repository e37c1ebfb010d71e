//! Error handlers
//!
//! Maps note errors onto HTTP responses. The underlying cause is logged here and
//! never sent to the client.

use crate::error::types::{ErrorKind, NoteError};
use axum::http::StatusCode;
use log::{error, warn};

/// Log a note error with its full cause
pub fn handle_error(op: &str, err: &NoteError) {
    match err.kind() {
        ErrorKind::Io | ErrorKind::PermissionDenied => error!("{} failed: {}", op, err),
        _ => warn!("{} rejected: {}", op, err),
    }
}

/// Convert error to HTTP status code
pub fn error_to_status(err: &NoteError) -> StatusCode {
    match err.kind() {
        ErrorKind::InvalidPath
        | ErrorKind::IsDirectory
        | ErrorKind::TooLarge
        | ErrorKind::UnsupportedType => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Short client-facing message for an error kind
pub fn error_message(op: &str, err: &NoteError) -> String {
    match err.kind() {
        ErrorKind::InvalidPath => format!("{} not possible", op),
        ErrorKind::IsDirectory => format!("{} not possible: is a directory", op),
        ErrorKind::TooLarge => format!("{} not possible: note is too large", op),
        ErrorKind::UnsupportedType => format!("{} not supported", op),
        ErrorKind::NotFound => format!("{} failed: not found", op),
        ErrorKind::PermissionDenied => format!("{} failed: permission denied", op),
        ErrorKind::Io => format!("{} failed", op),
    }
}
