//! RAX Notes Server - Entry Point
//!
//! Serves a directory of plain-text notes for editing in the browser.

use log::{error, info};
use std::process;

use rax_notes::middleware::setup_logging;
use rax_notes::server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    setup_logging();

    info!("Launching notes server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!("Server stopped: {}", e);
        process::exit(1);
    }
}
