//! Capture source port
//!
//! Acquiring the file (upload, drag-drop, bundled demo) is outside the core;
//! this port is the seam where it plugs in.

use std::path::PathBuf;

use async_trait::async_trait;

/// Errors that can occur while acquiring a capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureSourceError {
    /// The capture does not exist.
    #[error("capture not found: {0}")]
    NotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw capture bytes with the name used as a format hint.
#[derive(Debug, Clone)]
pub struct CaptureFile {
    /// File name, including extension.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Port for reading capture files.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Reads the capture at `location`.
    ///
    /// # Errors
    /// Returns `CaptureSourceError::NotFound` if nothing exists at `location`.
    async fn read(&self, location: &str) -> Result<CaptureFile, CaptureSourceError>;
}
