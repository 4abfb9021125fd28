//! Archiver process accounting.
//!
//! # Responsibilities
//! - Count archiver processes currently owned by a request
//! - Count every process ever spawned (for assertions and metrics)
//! - Generate unique stream IDs for log correlation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Global atomic counter for stream IDs.
/// Relaxed ordering is enough since only uniqueness matters.
static STREAM_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for one archive stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

impl StreamId {
    /// Generate a new unique stream ID.
    pub fn new() -> Self {
        Self(STREAM_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

/// Tracks archiver processes across all requests.
#[derive(Debug, Clone, Default)]
pub struct ProcessTracker {
    active: Arc<AtomicU64>,
    spawned: Arc<AtomicU64>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly spawned process. The returned slot releases it on drop.
    pub fn track(&self) -> ProcessSlot {
        self.spawned.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::set_active_processes(active);
        ProcessSlot {
            active: Arc::clone(&self.active),
            id: StreamId::new(),
        }
    }

    /// Processes that are still owned by a request (not yet reaped).
    pub fn active(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Processes spawned since startup.
    pub fn spawned_total(&self) -> u64 {
        self.spawned.load(Ordering::SeqCst)
    }
}

/// Accounting slot held for a process's lifetime.
#[derive(Debug)]
pub struct ProcessSlot {
    active: Arc<AtomicU64>,
    id: StreamId,
}

impl ProcessSlot {
    pub fn id(&self) -> StreamId {
        self.id
    }
}

impl Drop for ProcessSlot {
    fn drop(&mut self) {
        let active = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::set_active_processes(active);
        tracing::trace!(stream_id = %self.id, "Process slot released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_id_unique() {
        assert_ne!(StreamId::new(), StreamId::new());
    }

    #[test]
    fn tracker_counts() {
        let tracker = ProcessTracker::new();
        assert_eq!(tracker.active(), 0);

        let slot1 = tracker.track();
        let slot2 = tracker.track();
        assert_eq!(tracker.active(), 2);
        assert_ne!(slot1.id(), slot2.id());

        drop(slot1);
        assert_eq!(tracker.active(), 1);

        drop(slot2);
        assert_eq!(tracker.active(), 0);
        assert_eq!(tracker.spawned_total(), 2);
    }
}
