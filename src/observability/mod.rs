//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers and relay tasks produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Verbosity is decided once from config, never toggled at runtime
//! - Request ID flows through every log line of a request
//! - Metric macros are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
