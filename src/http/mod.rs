//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → handlers.rs
//!         GET /                   → static index page
//!         GET /archive/{id}/      → validate → spawn → stream body
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
