//! Domain error types

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort loading a capture file.
///
/// No partial session is ever produced when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The input exceeds the configured size limit.
    #[error("file too large: {size} bytes exceeds maximum of {max} bytes")]
    FileTooLarge {
        /// Actual input size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// The file is neither a HAR nor a Burp XML export.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The HAR document does not have the expected shape.
    #[error("invalid HAR structure: {0}")]
    InvalidHarStructure(String),

    /// The Burp XML document does not have the expected shape.
    #[error("invalid Burp XML structure: {0}")]
    InvalidBurpStructure(String),

    /// A single HAR entry is missing a required field.
    #[error("invalid HAR entry at index {index}: {reason}")]
    InvalidHarEntry {
        /// Zero-based position of the offending entry.
        index: usize,
        /// What was missing or malformed.
        reason: String,
    },
}

/// Result type alias for ingestion.
pub type IngestResult<T> = Result<T, IngestError>;

/// Category of a recovered per-field decode problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeWarningKind {
    /// A base64 blob could not be decoded; the raw text was kept.
    Base64,
    /// A URL could not be parsed; it was kept verbatim.
    Url,
    /// A timestamp could not be parsed; it was kept verbatim.
    Timestamp,
    /// A JSON body could not be parsed for formatting.
    Json,
    /// A numeric field was not a number and was coerced to 0.
    Number,
    /// An XML item could not be read; a placeholder entry was used.
    Xml,
}

impl fmt::Display for DecodeWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 => write!(f, "base64"),
            Self::Url => write!(f, "url"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Json => write!(f, "json"),
            Self::Number => write!(f, "number"),
            Self::Xml => write!(f, "xml"),
        }
    }
}

/// A per-field problem that was recovered with a fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeWarning {
    /// What kind of value failed to decode.
    pub kind: DecodeWarningKind,
    /// Entry the problem belongs to, if any.
    pub entry_index: Option<usize>,
    /// Human-readable detail.
    pub detail: String,
}

impl DecodeWarning {
    /// Creates a warning and emits it as a `tracing` warning event.
    pub fn record(kind: DecodeWarningKind, entry_index: Option<usize>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::warn!(%kind, entry = ?entry_index, "{detail}");
        Self {
            kind,
            entry_index,
            detail,
        }
    }
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry_index {
            Some(index) => write!(f, "[{}] entry {}: {}", self.kind, index, self.detail),
            None => write!(f, "[{}] {}", self.kind, self.detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_messages() {
        let err = IngestError::FileTooLarge { size: 10, max: 5 };
        assert_eq!(err.to_string(), "file too large: 10 bytes exceeds maximum of 5 bytes");

        let err = IngestError::InvalidHarEntry {
            index: 3,
            reason: "missing request.url".to_string(),
        };
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_warning_display() {
        let warning = DecodeWarning::record(DecodeWarningKind::Base64, Some(2), "bad blob");
        assert_eq!(warning.to_string(), "[base64] entry 2: bad blob");
    }
}
