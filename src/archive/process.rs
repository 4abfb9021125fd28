//! Archiver process runner.
//!
//! # Responsibilities
//! - Spawn the archiver with the identifier as its last argument
//! - Expose stdout as an `AsyncRead` byte stream
//! - Report lifecycle state and kill on request
//!
//! # Design Decisions
//! - stdin and stderr are detached so the child can never block on them
//! - Status queries never block; waiting is explicit and bounded

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, ChildStdout, Command};

use crate::archive::{ArchiveError, ArchiveId};
use crate::config::ArchiveConfig;

/// Lifecycle state of an archiver process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    /// Exit code, or `None` when the process was killed by a signal.
    Exited(Option<i32>),
}

impl ProcessStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessStatus::Exited(Some(0)))
    }
}

impl From<ExitStatus> for ProcessStatus {
    fn from(status: ExitStatus) -> Self {
        ProcessStatus::Exited(status.code())
    }
}

/// Archiver invocation: `program args... <identifier>`.
#[derive(Debug, Clone)]
pub struct ArchiverCommand {
    program: String,
    args: Vec<String>,
}

impl ArchiverCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    /// Spawn the archiver inside `working_dir` for the directory named `id`.
    pub fn start(
        &self,
        working_dir: &Path,
        id: &ArchiveId,
    ) -> Result<ArchiveProcess, ArchiveError> {
        let spawn_error = |source| ArchiveError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(id.as_str())
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.start_kill();
            return Err(spawn_error(std::io::Error::other("archiver stdout not captured")));
        };
        let pid = child.id();

        tracing::debug!(
            program = %self.program,
            identifier = %id,
            pid = ?pid,
            "Archiver started"
        );

        Ok(ArchiveProcess { child, stdout, pid })
    }
}

/// A running (or finished) archiver child.
#[derive(Debug)]
pub struct ArchiveProcess {
    child: Child,
    stdout: ChildStdout,
    pid: Option<u32>,
}

impl ArchiveProcess {
    /// The archiver's standard output.
    pub fn output(&mut self) -> &mut ChildStdout {
        &mut self.stdout
    }

    /// PID recorded at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Non-blocking status check.
    pub fn status(&mut self) -> std::io::Result<ProcessStatus> {
        Ok(match self.child.try_wait()? {
            Some(status) => status.into(),
            None => ProcessStatus::Running,
        })
    }

    /// Best-effort kill. Fails if the process was already reaped.
    pub fn terminate(&mut self) -> std::io::Result<()> {
        self.child.start_kill()
    }

    /// Wait for exit, giving up after `grace`.
    pub async fn wait_with_grace(&mut self, grace: Duration) -> std::io::Result<ProcessStatus> {
        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(status) => Ok(status?.into()),
            Err(_) => Ok(ProcessStatus::Running),
        }
    }

    /// Hand back the raw child for reaping.
    pub(crate) fn into_child(self) -> Child {
        self.child
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn sh(script: &str) -> ArchiverCommand {
        ArchiverCommand::new("sh", vec!["-c".into(), script.into()])
    }

    #[tokio::test]
    async fn streams_stdout_and_passes_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let id = ArchiveId::parse("photos123").unwrap();
        // With `sh -c`, the trailing identifier becomes $0.
        let mut process = sh("printf 'hello %s' \"$0\"")
            .start(dir.path(), &id)
            .unwrap();
        assert!(process.pid().is_some());

        let mut out = String::new();
        process.output().read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "hello photos123");

        let status = process.wait_with_grace(Duration::from_secs(5)).await.unwrap();
        assert!(status.is_success());
        assert_eq!(process.status().unwrap(), ProcessStatus::Exited(Some(0)));
    }

    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("photos123")).unwrap();
        let id = ArchiveId::parse("photos123").unwrap();

        let mut process = sh("test -d \"$0\" && printf found")
            .start(dir.path(), &id)
            .unwrap();
        let mut out = String::new();
        process.output().read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "found");
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let id = ArchiveId::parse("photos123").unwrap();
        let err = ArchiverCommand::new("definitely-not-an-archiver", vec![])
            .start(dir.path(), &id)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Spawn { .. }));
    }

    #[tokio::test]
    async fn terminate_stops_running_process() {
        let dir = tempfile::tempdir().unwrap();
        let id = ArchiveId::parse("x").unwrap();
        let mut process = sh("sleep 30").start(dir.path(), &id).unwrap();
        assert_eq!(process.status().unwrap(), ProcessStatus::Running);

        process.terminate().unwrap();
        let status = process.wait_with_grace(Duration::from_secs(5)).await.unwrap();
        assert_eq!(status, ProcessStatus::Exited(None));
    }

    #[tokio::test]
    async fn non_zero_exit_reported() {
        let dir = tempfile::tempdir().unwrap();
        let id = ArchiveId::parse("x").unwrap();
        let mut process = sh("exit 12").start(dir.path(), &id).unwrap();
        let status = process.wait_with_grace(Duration::from_secs(5)).await.unwrap();
        assert_eq!(status, ProcessStatus::Exited(Some(12)));
        assert!(!status.is_success());
    }
}
