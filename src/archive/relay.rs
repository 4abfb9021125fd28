//! Chunk relay from archiver output to the response body.
//!
//! # Responsibilities
//! - Pull bounded chunks from any `AsyncRead` source
//! - Push them, in order, into the outbound response stream
//! - Optionally pace writes with a fixed delay
//! - Stop reading as soon as the client is gone
//!
//! # Design Decisions
//! - The outbound stream is a channel of capacity 1, so at most one chunk
//!   waits between the archiver and hyper
//! - Every suspension point also watches for the receiver being dropped

use std::io;
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::config::ArchiveConfig;

/// Items carried to the response body. An `Err` aborts the body.
pub type BodyItem = Result<Bytes, io::Error>;

/// Failure after the response headers were committed.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Reading the archiver output failed.
    #[error("failed to read archiver output: {0}")]
    Read(#[source] io::Error),

    /// The response body was dropped, i.e. the client went away.
    #[error("client disconnected")]
    Disconnected,
}

/// Per-relay settings, copied out of the immutable service config.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub chunk_size: usize,
    pub pacing: Option<Duration>,
    pub verbose: bool,
}

impl RelaySettings {
    pub fn from_config(config: &ArchiveConfig, verbose: bool) -> Self {
        Self {
            chunk_size: config.chunk_size,
            pacing: config.pacing_delay(),
            verbose,
        }
    }
}

/// What a completed relay moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaySummary {
    pub chunks: u64,
    pub bytes: u64,
}

/// Sending half of a response body.
#[derive(Debug, Clone)]
pub struct OutboundStream {
    tx: mpsc::Sender<BodyItem>,
}

impl OutboundStream {
    /// Create a stream and the body stream that drains it.
    pub fn channel() -> (Self, ReceiverStream<BodyItem>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, ReceiverStream::new(rx))
    }

    /// Write one chunk, waiting for room in the channel.
    pub async fn write(&self, chunk: Bytes) -> Result<(), RelayError> {
        self.tx
            .send(Ok(chunk))
            .await
            .map_err(|_| RelayError::Disconnected)
    }

    /// Abort the body so the client sees a truncated transfer, not a clean end.
    pub async fn abort(&self, error: io::Error) {
        let _ = self.tx.send(Err(error)).await;
    }

    /// Resolves once the receiving side has been dropped.
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

/// Move `source` into `outbound` chunk by chunk until end-of-stream.
pub async fn relay<R>(
    source: &mut R,
    outbound: &OutboundStream,
    settings: &RelaySettings,
) -> Result<RelaySummary, RelayError>
where
    R: AsyncRead + Unpin,
{
    let mut summary = RelaySummary::default();
    // Reclaims its allocation once hyper has released the previous chunk.
    let mut buf = BytesMut::new();

    loop {
        buf.reserve(settings.chunk_size);
        let mut window = (&mut buf).limit(settings.chunk_size);
        let read = tokio::select! {
            biased;
            _ = outbound.closed() => return Err(RelayError::Disconnected),
            read = source.read_buf(&mut window) => read.map_err(RelayError::Read)?,
        };
        if read == 0 {
            return Ok(summary);
        }
        let chunk = buf.split().freeze();

        if settings.verbose {
            tracing::info!(bytes = read, chunk = summary.chunks, "Sending archive chunk");
        } else {
            tracing::trace!(bytes = read, chunk = summary.chunks, "Sending archive chunk");
        }
        outbound.write(chunk).await?;
        summary.chunks += 1;
        summary.bytes += read as u64;

        if let Some(delay) = settings.pacing {
            tokio::select! {
                biased;
                _ = outbound.closed() => return Err(RelayError::Disconnected),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
