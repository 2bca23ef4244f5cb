//! Capture import.
//!
//! [`CaptureIngestor`] is the entry point: it validates the input with the
//! [`FormatDetector`] and hands it to the HAR or Burp decoder. Either a
//! complete session comes back or an error, never a partial session.

pub mod burp;
pub mod detect;
pub mod har;

use capview_application::ports::CaptureDecoder;
use capview_domain::{Header, IngestResult, Session, ViewerSettings};
use capview_domain::settings::DEFAULT_MAX_FILE_SIZE;

pub use burp::BurpDecoder;
pub use detect::{DetectedCapture, FormatDetector};
pub use har::HarDecoder;

/// MIME type used when a response does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Configuration for capture import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Maximum capture size in bytes (default: 50 MiB).
    pub max_file_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl From<&ViewerSettings> for IngestConfig {
    fn from(settings: &ViewerSettings) -> Self {
        Self {
            max_file_size: settings.max_file_size,
        }
    }
}

/// Detects the format of a capture and decodes it.
#[derive(Debug, Clone, Default)]
pub struct CaptureIngestor {
    config: IngestConfig,
}

impl CaptureIngestor {
    /// Create a new ingestor with default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new ingestor with custom config
    #[must_use]
    pub const fn with_config(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Validates and decodes a capture into a fresh session.
    ///
    /// # Errors
    ///
    /// Returns the first size, format or structural problem found.
    pub fn load_session(&self, bytes: &[u8], file_name: &str) -> IngestResult<Session> {
        let capture = FormatDetector::new(self.config.max_file_size).inspect(bytes, file_name)?;
        tracing::debug!(file = %file_name, format = %capture.format(), bytes = bytes.len(), "format detected");

        match capture {
            DetectedCapture::Har(document) => HarDecoder::new().decode_document(document, file_name),
            DetectedCapture::BurpXml => BurpDecoder::new().decode(bytes, file_name),
        }
    }
}

impl CaptureDecoder for CaptureIngestor {
    fn decode(&self, bytes: &[u8], file_name: &str) -> IngestResult<Session> {
        self.load_session(bytes, file_name)
    }
}

/// Builds raw message text: start line, header lines, blank line and body.
pub(crate) fn message_text(start_line: &str, headers: &[Header], body: &str) -> String {
    let mut text = start_line.to_string();
    for header in headers {
        text.push('\n');
        text.push_str(&header.to_string());
    }
    if !body.is_empty() {
        text.push_str("\n\n");
        text.push_str(body);
    }
    text
}

/// Replaces a blank method with `UNKNOWN`.
pub(crate) fn or_default_method(method: String) -> String {
    if method.trim().is_empty() {
        capview_domain::PlaceholderKind::Unknown.method().to_string()
    } else {
        method
    }
}

/// Replaces a blank URL with `/`.
pub(crate) fn or_default_url(url: String) -> String {
    if url.trim().is_empty() { "/".to_string() } else { url }
}
