//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Size of a single relayed chunk (500 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 500 * 1024;

/// Delay between chunks when pacing is enabled.
pub const DEFAULT_PACING_DELAY_MS: u64 = 5_000;

/// Root configuration for the archive service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Archive pipeline settings.
    pub archive: ArchiveConfig,

    /// Landing page settings.
    pub index: IndexConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Archive pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Directory whose subdirectories are served as archives.
    pub root_dir: PathBuf,

    /// Insert a fixed delay after every chunk written to the client.
    pub pacing: bool,

    /// Pacing delay in milliseconds.
    pub pacing_delay_ms: u64,

    /// Maximum number of bytes moved per chunk.
    pub chunk_size: usize,

    /// Archiver executable.
    pub program: String,

    /// Arguments passed before the archive identifier.
    pub args: Vec<String>,

    /// How long a finished stream waits for the archiver to exit.
    pub exit_grace_ms: u64,
}

impl ArchiveConfig {
    pub fn pacing_delay(&self) -> Option<Duration> {
        self.pacing
            .then(|| Duration::from_millis(self.pacing_delay_ms))
    }

    pub fn exit_grace(&self) -> Duration {
        Duration::from_millis(self.exit_grace_ms)
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("test_photos"),
            pacing: false,
            pacing_delay_ms: DEFAULT_PACING_DELAY_MS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            program: "zip".to_string(),
            args: vec!["-r".to_string(), "-".to_string()],
            exit_grace_ms: 5_000,
        }
    }
}

/// Static landing page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Path to the HTML file served at `/`.
    pub path: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("index.html"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Verbose logging (per-chunk events, request traces).
    pub logging: bool,

    /// Log level used when logging is enabled (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging: false,
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
