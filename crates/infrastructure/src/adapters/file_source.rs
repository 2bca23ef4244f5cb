//! Capture source backed by the local file system.

use std::path::Path;

use async_trait::async_trait;
use capview_application::ports::{CaptureFile, CaptureSource, CaptureSourceError};
use tokio::fs;

/// Reads captures from disk using `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSource;

impl TokioFileSource {
    /// Creates a new `TokioFileSource`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CaptureSource for TokioFileSource {
    async fn read(&self, location: &str) -> Result<CaptureFile, CaptureSourceError> {
        let path = Path::new(location);
        let bytes = fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CaptureSourceError::NotFound(path.to_path_buf())
            } else {
                CaptureSourceError::Io(e)
            }
        })?;

        let name = path
            .file_name()
            .map_or_else(|| location.to_string(), |n| n.to_string_lossy().into_owned());

        tracing::debug!(file = %name, bytes = bytes.len(), "capture read");
        Ok(CaptureFile { name, bytes })
    }
}
