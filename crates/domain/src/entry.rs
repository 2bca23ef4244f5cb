//! Unified entry model.
//!
//! Both decoders produce [`Entry`] values. Entries are immutable once
//! decoded; user annotations live in the session's
//! [`AnnotationStore`](crate::annotation::AnnotationStore) keyed by
//! [`EntryId`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cookie::join_set_cookies;
use crate::encoding::decode_if_base64;
use crate::id::{EntryId, generate_entry_id};
use crate::url::{UrlParts, parse_url};

/// Protocol version assumed when a source omits it.
pub const DEFAULT_HTTP_VERSION: &str = "HTTP/1.1";

/// Which export format an entry (or session) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// HTTP Archive JSON.
    Har,
    /// Burp Suite XML export.
    BurpXml,
}

impl SourceFormat {
    /// Returns the format for a file extension, without the dot.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "har" => Some(Self::Har),
            "xml" => Some(Self::BurpXml),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Har => "HAR",
            Self::BurpXml => "Burp XML",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How a stored body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// The raw value is the text itself.
    #[default]
    Plain,
    /// The raw value is base64 of the body bytes.
    Base64,
}

/// A single header line, kept exactly as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name as it appeared in the source.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parses a `Name: value` line. Lines without a colon yield an empty value.
    ///
    /// HTTP/2 pseudo-headers such as `:authority: a.test` keep their leading
    /// colon in the name.
    #[must_use]
    pub fn parse_line(line: &str) -> Self {
        let line = line.trim();
        let separator = match line.strip_prefix(':') {
            Some(rest) => rest.find(':').map(|at| at + 1),
            None => line.find(':'),
        };
        match separator {
            Some(at) => Self::new(line[..at].trim(), line[at + 1..].trim()),
            None => Self::new(line, ""),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Finds the first header with the given name, ignoring ASCII case.
#[must_use]
pub fn find_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// A message body together with its storage encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Stored value.
    pub raw: String,
    /// Encoding of `raw`.
    pub encoding: BodyEncoding,
}

impl MessageBody {
    /// A plain-text body.
    #[must_use]
    pub fn plain(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            encoding: BodyEncoding::Plain,
        }
    }

    /// A base64-encoded body.
    #[must_use]
    pub fn base64(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            encoding: BodyEncoding::Base64,
        }
    }

    /// Returns the body text, decoding base64 when needed.
    ///
    /// Invalid base64 falls back to the stored value.
    #[must_use]
    pub fn decoded(&self) -> Cow<'_, str> {
        match self.encoding {
            BodyEncoding::Plain => Cow::Borrowed(&self.raw),
            BodyEncoding::Base64 => decode_if_base64(&self.raw),
        }
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// The request half of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// HTTP method, never empty.
    pub method: String,
    /// Absolute URL, never empty.
    pub url: String,
    /// Protocol version such as `HTTP/1.1`.
    pub protocol_version: String,
    /// Headers in source order.
    pub headers: Vec<Header>,
    /// Request body.
    pub body: MessageBody,
}

impl RequestRecord {
    /// Looks up a request header by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// The response half of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Status code, 0 when unknown.
    pub status_code: u16,
    /// Reason phrase.
    pub status_text: String,
    /// Protocol version such as `HTTP/1.1`.
    pub protocol_version: String,
    /// Headers in source order.
    pub headers: Vec<Header>,
    /// Response body.
    pub body: MessageBody,
    /// MIME type of the body.
    pub mime_type: String,
    /// Body length in bytes as reported by the source.
    pub content_length: u64,
}

impl ResponseRecord {
    /// Looks up a response header by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Full decoded message texts, computed once at decode time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCache {
    /// Raw request text: request line, headers, blank line, body.
    pub request: String,
    /// Raw response text, if a response was captured.
    pub response: Option<String>,
}

/// Burp-specific item metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurpDetails {
    /// `scheme://hostname` derived from the item URL.
    pub host: String,
    /// Path and query derived from the item URL.
    pub path: String,
    /// Server address from the `ip` attribute of `<host>`.
    pub ip: String,
    /// Port as exported.
    pub port: String,
    /// `http` or `https`.
    pub protocol: String,
    /// File extension Burp inferred for the URL.
    pub extension: String,
    /// Burp's own item comment.
    pub burp_comment: String,
}

/// HAR-specific entry metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarDetails {
    /// `serverIPAddress`, when recorded.
    pub server_ip: Option<String>,
    /// Total elapsed time in milliseconds.
    pub time_ms: f64,
    /// `postData.encoding` as declared (not applied).
    pub request_body_encoding: Option<String>,
    /// `content.encoding` as declared (not applied).
    pub response_body_encoding: Option<String>,
}

/// Why a placeholder entry was synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderKind {
    /// Method or URL were missing.
    Unknown,
    /// The item could not be read at all.
    Error,
}

impl PlaceholderKind {
    /// Method shown for this kind of placeholder.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Error => "ERROR",
        }
    }
}

/// Where an entry came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum EntryOrigin {
    /// A Burp `<item>`.
    Burp(BurpDetails),
    /// A HAR log entry.
    Har(HarDetails),
    /// Synthesized in place of an unreadable item.
    Placeholder {
        /// The reason for the placeholder.
        kind: PlaceholderKind,
    },
}

/// One captured request/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier.
    pub id: EntryId,
    /// Position in the source file.
    pub index: usize,
    /// Capture time as displayed.
    pub timestamp: String,
    /// The request.
    pub request: RequestRecord,
    /// The response, `None` when the request was never answered.
    pub response: Option<ResponseRecord>,
    /// Decoded message texts.
    pub decoded: DecodedCache,
    /// Source-specific metadata.
    pub origin: EntryOrigin,
}

/// MIME type and size of an entry's response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    /// MIME type, empty without a response.
    pub mime_type: String,
    /// Content length in bytes, 0 without a response.
    pub content_length: u64,
}

impl Entry {
    /// Builds a placeholder that keeps the session length consistent with
    /// the source when an item cannot be decoded.
    #[must_use]
    pub fn placeholder(index: usize, timestamp: impl Into<String>, kind: PlaceholderKind) -> Self {
        let timestamp = timestamp.into();
        let method = kind.method().to_string();
        let decoded = DecodedCache {
            request: format!("{method} / {DEFAULT_HTTP_VERSION}"),
            response: None,
        };
        Self {
            id: generate_entry_id(index, &timestamp),
            index,
            timestamp,
            request: RequestRecord {
                method,
                url: "/".to_string(),
                protocol_version: DEFAULT_HTTP_VERSION.to_string(),
                headers: Vec::new(),
                body: MessageBody::default(),
            },
            response: None,
            decoded,
            origin: EntryOrigin::Placeholder { kind },
        }
    }

    /// Returns true for synthesized placeholder entries.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.origin, EntryOrigin::Placeholder { .. })
    }

    /// Parsed pieces of the request URL.
    #[must_use]
    pub fn url_parts(&self) -> UrlParts {
        parse_url(&self.request.url)
    }

    /// Response MIME type and length.
    #[must_use]
    pub fn response_info(&self) -> ResponseInfo {
        self.response
            .as_ref()
            .map(|r| ResponseInfo {
                mime_type: r.mime_type.clone(),
                content_length: r.content_length,
            })
            .unwrap_or_default()
    }

    /// Request body as searchable text.
    ///
    /// A HAR body declared as base64 is decoded when it looks like base64.
    #[must_use]
    pub fn request_body_text(&self) -> Cow<'_, str> {
        match &self.origin {
            EntryOrigin::Har(details) if declares_base64(details.request_body_encoding.as_deref()) => {
                decode_if_base64(&self.request.body.raw)
            }
            _ => self.request.body.decoded(),
        }
    }

    /// Response body as searchable text, `None` without a response.
    #[must_use]
    pub fn response_body_text(&self) -> Option<Cow<'_, str>> {
        let response = self.response.as_ref()?;
        Some(match &self.origin {
            EntryOrigin::Har(details) if declares_base64(details.response_body_encoding.as_deref()) => {
                decode_if_base64(&response.body.raw)
            }
            _ => response.body.decoded(),
        })
    }

    /// Cookies set by the response, as `name=value` pairs joined with `"; "`.
    #[must_use]
    pub fn cookies(&self) -> String {
        self.response
            .as_ref()
            .map(|r| join_set_cookies(&r.headers))
            .unwrap_or_default()
    }
}

fn declares_base64(encoding: Option<&str>) -> bool {
    encoding.is_some_and(|e| e.trim().eq_ignore_ascii_case("base64"))
}

/// Capture time of an entry.
#[must_use]
pub fn entry_time(entry: &Entry) -> &str {
    &entry.timestamp
}

/// Stable id of an entry.
#[must_use]
pub const fn entry_id(entry: &Entry) -> &EntryId {
    &entry.id
}

/// Response MIME type and length of an entry.
#[must_use]
pub fn response_info(entry: &Entry) -> ResponseInfo {
    entry.response_info()
}

/// Cookies set by an entry's response.
#[must_use]
pub fn entry_cookies(entry: &Entry) -> String {
    entry.cookies()
}

/// Canonical reason phrase for a status code, empty when unknown.
#[must_use]
pub const fn reason_phrase(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        410 => "Gone",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_base64;
    use pretty_assertions::assert_eq;

    fn response_with_headers(headers: Vec<Header>) -> ResponseRecord {
        ResponseRecord {
            status_code: 200,
            status_text: "OK".to_string(),
            protocol_version: DEFAULT_HTTP_VERSION.to_string(),
            headers,
            body: MessageBody::plain("hello"),
            mime_type: "text/plain".to_string(),
            content_length: 5,
        }
    }

    #[test]
    fn test_placeholder_keeps_invariants() {
        let entry = Entry::placeholder(7, "", PlaceholderKind::Error);
        assert_eq!(entry.request.method, "ERROR");
        assert_eq!(entry.request.url, "/");
        assert_eq!(entry.index, 7);
        assert!(entry.is_placeholder());
        assert!(entry.response.is_none());

        let entry = Entry::placeholder(0, "", PlaceholderKind::Unknown);
        assert_eq!(entry.request.method, "UNKNOWN");
    }

    #[test]
    fn test_body_decoding() {
        let body = MessageBody::base64(encode_base64(b"{\"a\":1}"));
        assert_eq!(body.decoded(), "{\"a\":1}");

        let broken = MessageBody::base64("%%%");
        assert_eq!(broken.decoded(), "%%%");

        let plain = MessageBody::plain("abcd");
        assert_eq!(plain.decoded(), "abcd");
    }

    #[test]
    fn test_header_parse_line() {
        assert_eq!(
            Header::parse_line("Content-Type: application/json; charset=utf-8"),
            Header::new("Content-Type", "application/json; charset=utf-8")
        );
        assert_eq!(Header::parse_line("Broken"), Header::new("Broken", ""));
    }

    #[test]
    fn test_header_parse_pseudo_header() {
        assert_eq!(
            Header::parse_line(":authority: a.test"),
            Header::new(":authority", "a.test")
        );
        assert_eq!(Header::parse_line(":path: /x?y=1"), Header::new(":path", "/x?y=1"));
        assert_eq!(Header::parse_line(":status"), Header::new(":status", ""));
        assert_eq!(Header::parse_line("Host: a.test:8443"), Header::new("Host", "a.test:8443"));
    }

    #[test]
    fn test_har_declared_base64_body_text() {
        let encoded = encode_base64(b"hidden token");
        let mut entry = Entry::placeholder(0, "t", PlaceholderKind::Unknown);
        entry.request.body = MessageBody::plain(encoded.clone());
        entry.response = Some(ResponseRecord {
            body: MessageBody::plain(encoded.clone()),
            ..response_with_headers(Vec::new())
        });
        entry.origin = EntryOrigin::Har(HarDetails::default());
        assert_eq!(entry.request_body_text(), encoded.as_str());

        entry.origin = EntryOrigin::Har(HarDetails {
            request_body_encoding: Some("base64".to_string()),
            response_body_encoding: Some("Base64".to_string()),
            ..HarDetails::default()
        });
        assert_eq!(entry.request_body_text(), "hidden token");
        assert_eq!(entry.response_body_text().as_deref(), Some("hidden token"));

        entry.request.body = MessageBody::plain("not base64!");
        assert_eq!(entry.request_body_text(), "not base64!");
    }

    #[test]
    fn test_response_info_and_cookies() {
        let mut entry = Entry::placeholder(0, "t", PlaceholderKind::Unknown);
        assert_eq!(response_info(&entry), ResponseInfo::default());
        assert_eq!(entry_cookies(&entry), "");

        entry.response = Some(response_with_headers(vec![
            Header::new("Set-Cookie", "sid=abc; Path=/"),
            Header::new("Set-Cookie", "theme=dark; HttpOnly"),
        ]));
        assert_eq!(entry_cookies(&entry), "sid=abc; theme=dark");
        assert_eq!(response_info(&entry).content_length, 5);
        assert_eq!(entry_time(&entry), "t");
    }

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("HAR"), Some(SourceFormat::Har));
        assert_eq!(SourceFormat::from_extension("xml"), Some(SourceFormat::BurpXml));
        assert_eq!(SourceFormat::from_extension("json"), None);
    }

    #[test]
    fn test_reason_phrase() {
        assert_eq!(reason_phrase(200), "OK");
        assert_eq!(reason_phrase(404), "Not Found");
        assert_eq!(reason_phrase(599), "");
    }
}
