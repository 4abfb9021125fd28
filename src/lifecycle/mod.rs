//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → server stops accepting → in-flight streams drain → exit
//!     aborted relay tasks drop their LifecycleGuard → archivers killed
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
