//! Streaming archive pipeline.
//!
//! # Data Flow
//! ```text
//! GET /archive/{id}/
//!     → id.rs (sanitize identifier, resolve under root)
//!     → process.rs (spawn archiver, stdout piped)
//!     → guard.rs (owns the child until the request task ends)
//!     → relay.rs (stdout → bounded channel → response body)
//!     → guard drop (kill if still running or failed, reap)
//! ```
//!
//! # Design Decisions
//! - Headers are committed only once the archiver is running
//! - At most one chunk is buffered between archiver and client
//! - Cleanup lives in exactly one place: `LifecycleGuard::drop`

pub mod error;
pub mod guard;
pub mod id;
pub mod process;
pub mod relay;
pub mod tracker;

pub use error::ArchiveError;
pub use guard::LifecycleGuard;
pub use id::{ArchiveId, ArchiveRoot};
pub use process::{ArchiveProcess, ArchiverCommand, ProcessStatus};
pub use relay::{relay, OutboundStream, RelayError, RelaySettings, RelaySummary};
pub use tracker::{ProcessSlot, ProcessTracker, StreamId};
