//! Scoped cleanup for archiver processes.
//!
//! A [`LifecycleGuard`] owns the child from the moment it is spawned until the
//! request task ends. Dropping the guard is the only cleanup path, so it runs
//! once whether the stream finished, failed, lost its client, or was aborted.

use std::io;

use crate::archive::{ArchiveId, ArchiveProcess, ProcessSlot, ProcessStatus, StreamId};

/// What the guard does with a process on drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CleanupAction {
    Leave,
    Terminate,
}

/// Only a clean zero exit is left alone.
pub(crate) fn cleanup_action(status: &io::Result<ProcessStatus>) -> CleanupAction {
    match status {
        Ok(status) if status.is_success() => CleanupAction::Leave,
        _ => CleanupAction::Terminate,
    }
}

/// Owns an archiver process and kills it on drop unless it exited cleanly.
#[derive(Debug)]
pub struct LifecycleGuard {
    process: Option<ArchiveProcess>,
    slot: Option<ProcessSlot>,
    id: ArchiveId,
}

impl LifecycleGuard {
    pub fn new(process: ArchiveProcess, slot: ProcessSlot, id: ArchiveId) -> Self {
        Self {
            process: Some(process),
            slot: Some(slot),
            id,
        }
    }

    pub fn process_mut(&mut self) -> Option<&mut ArchiveProcess> {
        self.process.as_mut()
    }

    pub fn stream_id(&self) -> Option<StreamId> {
        self.slot.as_ref().map(ProcessSlot::id)
    }

    pub fn identifier(&self) -> &ArchiveId {
        &self.id
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        let Some(mut process) = self.process.take() else {
            return;
        };
        let slot = self.slot.take();
        let stream_id = slot.as_ref().map(ProcessSlot::id);
        let status = process.status();

        match cleanup_action(&status) {
            CleanupAction::Leave => {
                tracing::debug!(
                    identifier = %self.id,
                    stream_id = ?stream_id,
                    pid = ?process.pid(),
                    "Archiver exited cleanly"
                );
            }
            CleanupAction::Terminate => {
                match process.terminate() {
                    Ok(()) => tracing::info!(
                        identifier = %self.id,
                        stream_id = ?stream_id,
                        pid = ?process.pid(),
                        status = ?status,
                        "Archiver terminated"
                    ),
                    // Usually means the child is already gone.
                    Err(e) => tracing::warn!(
                        identifier = %self.id,
                        stream_id = ?stream_id,
                        pid = ?process.pid(),
                        status = ?status,
                        error = %e,
                        "Failed to terminate archiver"
                    ),
                }
                reap(process, slot);
            }
        }
    }
}

/// Collect the killed child's exit status, then release its slot.
fn reap(process: ArchiveProcess, slot: Option<ProcessSlot>) {
    let pid = process.pid();
    let mut child = process.into_child();

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = child.wait().await {
                    tracing::warn!(pid = ?pid, error = %e, "Failed to reap archiver");
                }
                drop(slot);
            });
        }
        Err(_) => {
            let _ = child.try_wait();
            drop(slot);
        }
    }
}
