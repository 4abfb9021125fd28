//! Streaming ZIP archive service library.

pub mod archive;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use archive::{ArchiveError, ArchiveId, ProcessTracker};
pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
