//! Request handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::Instrument;

use crate::archive::{
    relay, ArchiveError, ArchiveId, LifecycleGuard, OutboundStream, RelayError, RelaySettings,
};
use crate::http::server::AppState;
use crate::observability::metrics::{self, StreamOutcome};

const ZIP_CONTENT_TYPE: &str = "application/zip";
const ZIP_DISPOSITION: &str = "attachment; filename=\"archive.zip\"";

/// `GET /` - serve the landing page verbatim.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    // Served as stored; the page need not be UTF-8.
    match tokio::fs::read(&state.index_path).await {
        Ok(contents) => Html(contents).into_response(),
        Err(e) => {
            tracing::warn!(
                path = %state.index_path.display(),
                error = %e,
                "Index page unavailable"
            );
            (StatusCode::NOT_FOUND, "Index page not found").into_response()
        }
    }
}

/// `GET /archive/` - identifier absent.
pub async fn missing_identifier_handler() -> Response {
    let response = ArchiveError::Validation("identifier is empty").into_response();
    metrics::record_request(response.status().as_u16());
    response
}

/// `GET /archive/{archive_hash}/` - stream a ZIP of the named directory.
pub async fn archive_handler(
    State(state): State<Arc<AppState>>,
    Path(archive_hash): Path<String>,
) -> Response {
    let response = match start_archive(&state, &archive_hash).await {
        Ok(response) => response,
        Err(e) => {
            match &e {
                ArchiveError::Spawn { .. } => {
                    tracing::error!(identifier = %archive_hash, error = %e, "Archiver failed to start")
                }
                _ => tracing::info!(identifier = %archive_hash, error = %e, "Archive request rejected"),
            }
            e.into_response()
        }
    };
    metrics::record_request(response.status().as_u16());
    response
}

/// Validate, resolve and spawn. Headers are only built once the archiver runs.
async fn start_archive(state: &AppState, raw: &str) -> Result<Response, ArchiveError> {
    let id = ArchiveId::parse(raw)?;
    state.root.locate(&id).await?;

    let process = state.archiver.start(state.root.path(), &id)?;
    let guard = LifecycleGuard::new(process, state.processes.track(), id);
    let (outbound, body) = OutboundStream::channel();

    let span = tracing::info_span!(
        "archive",
        identifier = %guard.identifier(),
        stream_id = ?guard.stream_id(),
    );
    tokio::spawn(
        stream_archive(guard, outbound, state.relay.clone(), state.exit_grace).instrument(span),
    );

    Ok((
        [
            (header::CONTENT_TYPE, ZIP_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, ZIP_DISPOSITION),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

/// Drive one archive from spawn to end-of-stream.
///
/// `guard` is dropped when this returns, on every path.
async fn stream_archive(
    mut guard: LifecycleGuard,
    outbound: OutboundStream,
    settings: RelaySettings,
    exit_grace: Duration,
) {
    let started = Instant::now();
    let Some(process) = guard.process_mut() else {
        return;
    };

    let (outcome, bytes) = match relay(process.output(), &outbound, &settings).await {
        Ok(summary) => match process.wait_with_grace(exit_grace).await {
            Ok(status) if status.is_success() => {
                tracing::info!(
                    chunks = summary.chunks,
                    bytes = summary.bytes,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Archive sent"
                );
                (StreamOutcome::Completed, summary.bytes)
            }
            Ok(status) => {
                tracing::error!(status = ?status, bytes = summary.bytes, "Archiver did not finish cleanly");
                outbound
                    .abort(std::io::Error::other("archiver did not finish cleanly"))
                    .await;
                (StreamOutcome::Failed, summary.bytes)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to wait for archiver");
                outbound.abort(e).await;
                (StreamOutcome::Failed, summary.bytes)
            }
        },
        Err(RelayError::Disconnected) => {
            tracing::info!("Download was interrupted");
            (StreamOutcome::Disconnected, 0)
        }
        Err(RelayError::Read(e)) => {
            tracing::error!(error = %e, "Archive stream failed");
            outbound.abort(e).await;
            (StreamOutcome::Failed, 0)
        }
    };

    metrics::record_stream(outcome, bytes, started);
}
