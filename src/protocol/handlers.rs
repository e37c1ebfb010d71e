//! Request handlers module for the RAX notes server.
//!
//! Each handler hands the raw request path to the shared [`NoteResolver`] on
//! the blocking pool and turns the outcome into an HTTP response. Dropping a
//! handler future does not stop a save already running on the pool.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use std::io;
use std::sync::Arc;

use crate::error::NoteError;
use crate::error::handlers::{error_message, error_to_status, handle_error};
use crate::notes::{NoteResolver, Resolution};
use crate::protocol::responses::{href, html_response, render_browser, render_editor};
use crate::storage::Storage;

/// Name of the editor's textarea
const CONTENT_FIELD: &[u8] = b"content";

/// Extracts the raw bytes of the first `content` field of a urlencoded form.
/// Decoding is byte-exact: invalid UTF-8 is kept for the content gate to judge.
/// A form without the field yields an empty note.
pub fn form_content(body: &[u8]) -> Vec<u8> {
    body.split(|&b| b == b'&')
        .find_map(|pair| {
            let mut parts = pair.splitn(2, |&b| b == b'=');
            let name = parts.next()?;
            (decode_form_component(name) == CONTENT_FIELD)
                .then(|| decode_form_component(parts.next().unwrap_or_default()))
        })
        .unwrap_or_default()
}

fn decode_form_component(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    urlencoding::decode_binary(&spaced).into_owned()
}

/// Runs a resolver call on the blocking pool.
async fn run_blocking<T, F>(op: F) -> Result<T, NoteError>
where
    F: FnOnce() -> Result<T, NoteError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result,
        Err(e) => Err(NoteError::Io("<task>".into(), io::Error::other(e))),
    }
}

fn error_response(op: &str, err: &NoteError) -> Response {
    (error_to_status(err), error_message(op, err)).into_response()
}

fn resolution_response(result: Result<Resolution, NoteError>) -> Response {
    match result {
        Ok(Resolution::NewNote(note)) | Ok(Resolution::Note(note)) => {
            html_response(render_editor(&note))
        }
        Ok(Resolution::Browse(view)) => html_response(render_browser(&view)),
        Err(e) => error_response("edit", &e),
    }
}

/// Handles `GET /`: browse the notes root.
pub async fn handle_index<S: Storage + 'static>(
    State(resolver): State<Arc<NoteResolver<S>>>,
) -> Response {
    resolution_response(run_blocking(move || resolver.index()).await)
}

/// Handles `GET /{*path}`: open, create or browse a note.
pub async fn handle_get<S: Storage + 'static>(
    State(resolver): State<Arc<NoteResolver<S>>>,
    Path(path): Path<String>,
) -> Response {
    resolution_response(run_blocking(move || resolver.resolve(&path)).await)
}

/// Handles `POST /{*path}`: save the posted content, then send the client
/// back to the note.
pub async fn handle_save<S: Storage + 'static>(
    State(resolver): State<Arc<NoteResolver<S>>>,
    Path(path): Path<String>,
    body: Bytes,
) -> Response {
    let content = form_content(&body);
    let result = run_blocking(move || resolver.save(&path, content.as_slice())).await;
    match result {
        Ok(saved) => Redirect::to(&href(&saved)).into_response(),
        Err(e) => error_response("save", &e),
    }
}

/// Handles `POST /`: the root is never writable.
pub async fn handle_save_root() -> Response {
    let err = NoteError::InvalidPath("/".into());
    handle_error("save", &err);
    error_response("save", &err)
}
