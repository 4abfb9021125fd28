//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener and shut down gracefully

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::archive::{ArchiveRoot, ArchiverCommand, ProcessTracker, RelaySettings};
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::lifecycle::shutdown;

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub root: ArchiveRoot,
    pub archiver: ArchiverCommand,
    pub relay: RelaySettings,
    pub exit_grace: Duration,
    pub index_path: PathBuf,
    pub processes: ProcessTracker,
}

impl AppState {
    pub fn from_config(config: &ServiceConfig, processes: ProcessTracker) -> Self {
        Self {
            root: ArchiveRoot::new(config.archive.root_dir.clone()),
            archiver: ArchiverCommand::from_config(&config.archive),
            relay: RelaySettings::from_config(&config.archive, config.observability.logging),
            exit_grace: config.archive.exit_grace(),
            index_path: config.index.path.clone(),
            processes,
        }
    }
}

/// HTTP server for the archive service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    processes: ProcessTracker,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let processes = ProcessTracker::new();
        let state = Arc::new(AppState::from_config(&config, processes.clone()));
        let router = Self::build_router(state);
        Self {
            router,
            config,
            processes,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: Arc<AppState>) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id());

        Router::new()
            .route("/", get(handlers::index_handler))
            .route("/archive/", get(handlers::missing_identifier_handler))
            .route("/archive/{archive_hash}/", get(handlers::archive_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.archive.root_dir.display(),
            pacing = self.config.archive.pacing,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!(
            active_archivers = self.processes.active(),
            "HTTP server stopped"
        );
        Ok(())
    }

    /// Archiver accounting shared with every request.
    pub fn processes(&self) -> ProcessTracker {
        self.processes.clone()
    }
}
