//! Format detection and structural validation.

use std::path::Path;

use capview_domain::{IngestError, IngestResult, SourceFormat};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::Value;

use crate::serialization::from_json_bytes;

/// Decides which decoder applies to a capture, rejecting bad input early.
#[derive(Debug, Clone, Copy)]
pub struct FormatDetector {
    max_file_size: usize,
}

impl FormatDetector {
    /// Creates a detector with the given size limit in bytes.
    #[must_use]
    pub const fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Detects and validates the format of `bytes`.
    ///
    /// Checks run in order: size, extension of `file_name`, then structure.
    /// The input is never modified.
    ///
    /// # Errors
    ///
    /// - `FileTooLarge` when `bytes` exceeds the limit
    /// - `UnsupportedFormat` for anything but `.har` and `.xml`
    /// - `InvalidHarStructure` / `InvalidBurpStructure` when the content
    ///   does not have the expected shape
    pub fn detect(&self, bytes: &[u8], file_name: &str) -> IngestResult<SourceFormat> {
        self.inspect(bytes, file_name).map(|capture| capture.format())
    }

    /// Like [`FormatDetector::detect`], but hands back the parsed HAR
    /// document so it is not parsed a second time.
    ///
    /// # Errors
    ///
    /// Same as [`FormatDetector::detect`].
    pub fn inspect(&self, bytes: &[u8], file_name: &str) -> IngestResult<DetectedCapture> {
        if bytes.len() > self.max_file_size {
            return Err(IngestError::FileTooLarge {
                size: bytes.len(),
                max: self.max_file_size,
            });
        }

        let format = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(SourceFormat::from_extension)
            .ok_or_else(|| IngestError::UnsupportedFormat(file_name.to_string()))?;

        match format {
            SourceFormat::Har => Ok(DetectedCapture::Har(validate_har(bytes)?)),
            SourceFormat::BurpXml => {
                validate_burp(bytes)?;
                Ok(DetectedCapture::BurpXml)
            }
        }
    }
}

/// A validated capture.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectedCapture {
    /// A HAR log, already parsed.
    Har(Value),
    /// A well-formed Burp XML export.
    BurpXml,
}

impl DetectedCapture {
    /// The source format.
    #[must_use]
    pub const fn format(&self) -> SourceFormat {
        match self {
            Self::Har(_) => SourceFormat::Har,
            Self::BurpXml => SourceFormat::BurpXml,
        }
    }
}

/// Checks that a HAR log has a non-empty `log.entries` array whose first
/// entry carries the required fields. Returns the parsed document.
pub(crate) fn validate_har(bytes: &[u8]) -> IngestResult<Value> {
    let document: Value =
        from_json_bytes(bytes).map_err(|e| IngestError::InvalidHarStructure(e.to_string()))?;

    let entries = document
        .pointer("/log/entries")
        .and_then(Value::as_array)
        .ok_or_else(|| IngestError::InvalidHarStructure("missing log.entries array".to_string()))?;

    let first = entries
        .first()
        .ok_or_else(|| IngestError::InvalidHarStructure("log.entries is empty".to_string()))?;

    if let Some(reason) = missing_har_field(first) {
        return Err(IngestError::InvalidHarStructure(format!("first entry: {reason}")));
    }
    Ok(document)
}

/// Describes the first required field `entry` lacks, if any.
pub(crate) fn missing_har_field(entry: &Value) -> Option<&'static str> {
    if !entry.pointer("/request/method").is_some_and(Value::is_string) {
        return Some("request.method is missing or not a string");
    }
    if !entry.pointer("/request/url").is_some_and(Value::is_string) {
        return Some("request.url is missing or not a string");
    }
    if !entry.pointer("/response/status").is_some_and(Value::is_number) {
        return Some("response.status is missing or not a number");
    }
    None
}

/// Checks that `bytes` is well-formed XML with at least one `<item>`.
pub(crate) fn validate_burp(bytes: &[u8]) -> IngestResult<()> {
    let mut reader = Reader::from_reader(bytes);
    let mut items = 0usize;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"item" {
                    items += 1;
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"item" => items += 1,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) if depth > 0 => {
                return Err(IngestError::InvalidBurpStructure(format!(
                    "unexpected end of input with {depth} unclosed element(s)"
                )));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(IngestError::InvalidBurpStructure(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
    }

    if items == 0 {
        return Err(IngestError::InvalidBurpStructure(
            "no <item> elements found".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HAR: &str = r#"{"log":{"entries":[{"request":{"method":"GET","url":"https://a.test/"},"response":{"status":200}}]}}"#;
    const BURP: &str = "<items><item><url>https://a.test/</url></item></items>";

    fn detector() -> FormatDetector {
        FormatDetector::new(1024)
    }

    #[test]
    fn test_detect_har_and_burp() {
        assert_eq!(detector().detect(HAR.as_bytes(), "a.har"), Ok(SourceFormat::Har));
        assert_eq!(
            detector().detect(BURP.as_bytes(), "export.XML"),
            Ok(SourceFormat::BurpXml)
        );
    }

    #[test]
    fn test_inspect_returns_parsed_har() {
        match detector().inspect(HAR.as_bytes(), "a.har") {
            Ok(DetectedCapture::Har(document)) => {
                assert!(document.pointer("/log/entries/0/request").is_some());
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(
            detector().inspect(BURP.as_bytes(), "a.xml"),
            Ok(DetectedCapture::BurpXml)
        );
    }

    #[test]
    fn test_size_checked_before_parsing() {
        let detector = FormatDetector::new(4);
        assert_eq!(
            detector.detect(b"not even json", "a.har"),
            Err(IngestError::FileTooLarge { size: 13, max: 4 })
        );
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            detector().detect(HAR.as_bytes(), "capture.json"),
            Err(IngestError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detector().detect(HAR.as_bytes(), "noextension"),
            Err(IngestError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invalid_har_structure() {
        for bad in [
            "not json",
            r#"{"log":{}}"#,
            r#"{"log":{"entries":[]}}"#,
            r#"{"log":{"entries":[{"request":{"method":"GET","url":"/"},"response":{"status":"200"}}]}}"#,
            r#"{"log":{"entries":[{"request":{"url":"/"},"response":{"status":200}}]}}"#,
        ] {
            assert!(
                matches!(
                    detector().detect(bad.as_bytes(), "a.har"),
                    Err(IngestError::InvalidHarStructure(_))
                ),
                "accepted: {bad}"
            );
        }
    }

    #[test]
    fn test_invalid_burp_structure() {
        for bad in [
            "<items></items>",
            "<items><item></items>",
            "plain text",
            "<items><item><url>https://a.test/</url></item><item><url>https://b.test/</url>",
            "<items><item><url>https://a.test/</url></item>",
        ] {
            assert!(
                matches!(
                    detector().detect(bad.as_bytes(), "a.xml"),
                    Err(IngestError::InvalidBurpStructure(_))
                ),
                "accepted: {bad}"
            );
        }
    }
}
