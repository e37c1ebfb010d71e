//! HTTP response rendering
//!
//! Renders notes and directory listings as small HTML pages.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{Html, IntoResponse, Response};

use crate::notes::{BrowseView, Note};
use crate::storage::ConfinedPath;

/// Headers that keep browsers and proxies from caching note content
pub fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers
}

/// Link target for a confined path, percent-encoded per segment
pub fn href(path: &ConfinedPath) -> String {
    path.segments()
        .map(|segment| format!("/{}", urlencoding::encode(segment)))
        .collect()
}

/// Escape text for inclusion in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

pub fn render_editor(note: &Note) -> String {
    let target = href(&note.path);
    let body = format!(
        "<h1>{name}</h1>\n<form method=\"post\" action=\"{action}\">\n<textarea name=\"content\" rows=\"30\" cols=\"100\" autofocus>{content}</textarea>\n<p><button type=\"submit\">Save</button></p>\n</form>\n",
        name = escape_html(note.filename()),
        action = escape_html(&target),
        content = escape_html(&note.text()),
    );
    page(note.filename(), &body)
}

pub fn render_browser(view: &BrowseView) -> String {
    let title = match &view.path {
        Some(path) => format!("/{}", path),
        None => "/".to_string(),
    };

    let mut body = format!("<h1>{}</h1>\n<ul>\n", escape_html(&title));
    if let Some(path) = &view.path {
        let parent = path.parent().map(|p| href(&p)).unwrap_or_else(|| "/".to_string());
        body.push_str(&format!("<li><a href=\"{}\">..</a></li>\n", escape_html(&parent)));
    }
    for entry in &view.entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        body.push_str(&format!(
            "<li><a href=\"{}\">{}{}</a></li>\n",
            escape_html(&href(&entry.path)),
            escape_html(&entry.name),
            suffix
        ));
    }
    body.push_str("</ul>\n");
    page(&title, &body)
}

/// HTML page with no-cache headers
pub fn html_response(html: String) -> Response {
    (no_cache_headers(), Html(html)).into_response()
}
