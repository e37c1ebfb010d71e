use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::content::{ContentGate, MAX_NOTE_SIZE};
use crate::middleware::log_request;
use crate::notes::NoteResolver;
use crate::protocol::{handle_get, handle_index, handle_save, handle_save_root};
use super::config::ServerConfig;
use crate::storage::{LocalStorage, PathSanitizer, Storage};

/// Largest form body accepted. Percent-encoding can triple a note on the wire;
/// the content gate still applies the note ceiling after decoding.
pub const FORM_BODY_LIMIT: usize = 3 * MAX_NOTE_SIZE as usize + 1024;

pub struct Server {
    listener: TcpListener,
    router: Router,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listener and builds the resolver over the configured root.
    ///
    /// The notes root is not created; a missing root only produces a warning
    /// and every request touching storage will fail until it exists.
    pub async fn new(config: ServerConfig) -> io::Result<Self> {
        let address = config.listen_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => {
                info!("Server bound to {}", address);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", address, e);
                return Err(e);
            }
        };

        let root = config.notes_root_path();
        if root.is_dir() {
            info!("Serving notes from: {}", root.display());
        } else {
            warn!("Notes root {} is not a directory", root.display());
        }

        let resolver = NoteResolver::new(
            LocalStorage::new(root),
            PathSanitizer::new(config.sanitizer_options()),
            ContentGate::default(),
        );

        Ok(Self {
            listener,
            router: router(Arc::new(resolver)),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until Ctrl-C.
    pub async fn start(self) -> io::Result<()> {
        info!(
            "Starting RAX notes server on {} (notes root: {})",
            self.config.listen_address(),
            self.config.notes_root
        );

        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

/// Builds the HTTP routes over a shared resolver.
pub fn router<S: Storage + 'static>(resolver: Arc<NoteResolver<S>>) -> Router {
    Router::new()
        .route("/", get(handle_index::<S>).post(handle_save_root))
        .route("/{*path}", get(handle_get::<S>).post(handle_save::<S>))
        .layer(DefaultBodyLimit::max(FORM_BODY_LIMIT))
        .layer(middleware::from_fn(log_request))
        .with_state(resolver)
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running instead of shutting down at once.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
