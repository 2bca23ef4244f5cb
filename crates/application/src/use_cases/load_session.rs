//! Load session use case.

use std::time::Instant;

use capview_domain::Session;

use crate::ApplicationResult;
use crate::ports::{CaptureDecoder, CaptureSource};

/// Output from loading a capture.
#[derive(Debug)]
pub struct LoadSessionOutput {
    /// The decoded session.
    pub session: Session,
    /// Size of the capture in bytes.
    pub bytes_read: usize,
}

/// Reads a capture and decodes it into a fresh session.
///
/// Any previously loaded session is meant to be dropped and replaced by the
/// returned one; sessions are never merged.
pub struct LoadSession<S, D> {
    source: S,
    decoder: D,
}

impl<S: CaptureSource, D: CaptureDecoder> LoadSession<S, D> {
    /// Creates a new `LoadSession` use case.
    #[must_use]
    pub const fn new(source: S, decoder: D) -> Self {
        Self { source, decoder }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// - Returns `ApplicationError::Source` if the capture cannot be read
    /// - Returns `ApplicationError::Ingest` if the capture is rejected
    pub async fn execute(&self, location: &str) -> ApplicationResult<LoadSessionOutput> {
        let file = self.source.read(location).await?;
        let started = Instant::now();

        let session = self.decoder.decode(&file.bytes, &file.name).inspect_err(|err| {
            tracing::warn!(file = %file.name, "capture rejected: {err}");
        })?;

        tracing::info!(
            file = %file.name,
            format = %session.format,
            entries = session.len(),
            warnings = session.warnings().len(),
            elapsed_ms = started.elapsed().as_millis(),
            "session loaded"
        );

        Ok(LoadSessionOutput {
            session,
            bytes_read: file.bytes.len(),
        })
    }
}
