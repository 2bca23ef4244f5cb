//! Application error types

use capview_domain::IngestError;
use thiserror::Error;

use crate::ports::CaptureSourceError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The capture could not be decoded.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The capture could not be read.
    #[error("source error: {0}")]
    Source(#[from] CaptureSourceError),

    /// The search worker stopped or rejected a request.
    #[error("search worker error: {0}")]
    SearchWorker(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
