//! Errors raised before the response is committed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure of an archive request that can still be reported as an HTTP status.
///
/// Anything that goes wrong after headers are sent is a
/// [`RelayError`](crate::archive::RelayError) instead.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Identifier is missing or could escape the archive root.
    #[error("invalid archive identifier: {0}")]
    Validation(&'static str),

    /// Identifier does not name a directory under the archive root.
    #[error("archive `{0}` does not exist")]
    NotFound(String),

    /// The archiver executable could not be launched.
    #[error("failed to start archiver `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ArchiveError::Validation(_) => StatusCode::BAD_REQUEST,
            ArchiveError::NotFound(_) => StatusCode::NOT_FOUND,
            ArchiveError::Spawn { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ArchiveError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ArchiveError::Validation(reason) => format!("Invalid archive identifier: {}", reason),
            ArchiveError::NotFound(_) => "Archive does not exist or has been deleted".to_string(),
            // Spawn details stay in the logs.
            ArchiveError::Spawn { .. } => "Failed to start archiving".to_string(),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ArchiveError::Validation("empty").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ArchiveError::NotFound("missing".into()).status(),
            StatusCode::NOT_FOUND
        );
        let spawn = ArchiveError::Spawn {
            program: "zip".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(spawn.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(spawn.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
