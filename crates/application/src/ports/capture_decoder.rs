//! Capture decoder port

use capview_domain::{IngestResult, Session};

/// Turns raw capture bytes into a session.
///
/// Implementations must be all-or-nothing: either a complete session or an
/// error, never a truncated session.
pub trait CaptureDecoder: Send + Sync {
    /// Detects the format of `bytes` (using `file_name` as a hint) and decodes it.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestError`](capview_domain::IngestError) describing the
    /// first structural problem found.
    fn decode(&self, bytes: &[u8], file_name: &str) -> IngestResult<Session>;
}
