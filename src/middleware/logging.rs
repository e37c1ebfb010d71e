//! Logging middleware
//!
//! Provides logger setup and per-request logging.

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use log::info;
use std::net::SocketAddr;
use std::time::Instant;

/// Setup logging for the server. `RUST_LOG` overrides the `info` default.
pub fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Log one line per request: client, method, target, status and duration
pub async fn log_request(request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} \"{} {} {:?}\" {} {}ms",
        client,
        method,
        uri,
        version,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );
    response
}
