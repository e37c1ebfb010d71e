//! HTTP protocol implementation
//!
//! Request handlers and HTML rendering for the notes server.

pub mod handlers;
pub mod responses;

pub use handlers::{handle_get, handle_index, handle_save, handle_save_root};
