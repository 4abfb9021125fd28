//! Streaming ZIP archive service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client                ┌──────────────────────────────────────────────┐
//!     GET /archive/x/       │                 ARCHIVE SERVICE              │
//!     ──────────────────────┼─▶ http::server ──▶ http::handlers            │
//!                           │                     │ ArchiveId::parse  (400)│
//!                           │                     │ ArchiveRoot::locate(404)│
//!                           │                     │ ArchiverCommand   (500)│
//!                           │                     ▼                        │
//!                           │   LifecycleGuard ◀─ spawned relay task       │
//!                           │        │               │                     │
//!                           │     zip -r - x ──stdout──▶ relay ──chunks──┐ │
//!     ◀─────────────────────┼────────────────────────────────────────────┘ │
//!     200 application/zip   │                                              │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use archive_stream::config::loader::load_config;
use archive_stream::config::validation::validate_config;
use archive_stream::config::ServiceConfig;
use archive_stream::lifecycle::signals::wait_for_signal;
use archive_stream::observability::{logging, metrics};
use archive_stream::{HttpServer, Shutdown};

/// Streams ZIP archives of photo directories.
#[derive(Parser, Debug)]
#[command(name = "archive-stream", version, long_about = None)]
struct Cli {
    /// Enable logging
    #[arg(short, long)]
    logging: bool,

    /// Directory holding the archives (default: test_photos)
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Enable the artificial delay between chunks
    #[arg(short, long)]
    timeout: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, e.g. 0.0.0.0:8080
    #[arg(short, long)]
    bind: Option<String>,

    /// HTML file served at /
    #[arg(long)]
    index: Option<PathBuf>,
}

impl Cli {
    /// CLI flags win over the configuration file.
    fn apply(&self, config: &mut ServiceConfig) {
        if self.logging {
            config.observability.logging = true;
        }
        if let Some(directory) = &self.directory {
            config.archive.root_dir = directory.clone();
        }
        if self.timeout {
            config.archive.pacing = true;
        }
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(index) = &self.index {
            config.index.path = index.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    cli.apply(&mut config);
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("invalid configuration: {}", error);
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    logging::init_logging(&config.observability);
    tracing::info!(?cli, "archive-stream v{} starting", env!("CARGO_PKG_VERSION"));

    if !config.archive.root_dir.is_dir() {
        tracing::warn!(
            root = %config.archive.root_dir.display(),
            "Archive root is not a directory; every archive request will 404"
        );
    }

    if config.observability.metrics_enabled {
        // Validated above.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
