//! Display-ready reconstruction of captured HTTP messages.

use std::fmt;
use std::sync::LazyLock;

use capview_domain::{ContentLanguage, Entry, Header, ViewerSettings, find_header};
use regex::Regex;
use serde::Serialize;

use super::content::{beautify, detect_language};
use super::payload::split_payloads;

/// `METHOD scheme://authority[/path] VERSION`
static ORIGIN_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\s+[A-Za-z][A-Za-z0-9+.-]*://[^/\s?#]+(\S*)\s+(HTTP/\S+)$")
        .expect("valid regex")
});

/// Splits a raw message at the first blank line (`\r\n\r\n`, then `\n\n`).
///
/// Without a blank line everything is head and the body is empty.
#[must_use]
pub fn split_message(text: &str) -> (&str, &str) {
    for separator in ["\r\n\r\n", "\n\n"] {
        if let Some((head, body)) = text.split_once(separator) {
            return (head, body);
        }
    }
    (text, "")
}

/// Rewrites `GET https://host/path HTTP/1.1` as `GET /path HTTP/1.1`.
///
/// Lines that are not in absolute form are returned unchanged, so applying
/// this twice is the same as applying it once.
#[must_use]
pub fn strip_origin(request_line: &str) -> String {
    let trimmed = request_line.trim();
    ORIGIN_FORM.captures(trimmed).map_or_else(
        || request_line.to_string(),
        |caps| {
            let path = &caps[2];
            let path = if path.is_empty() {
                "/".to_string()
            } else if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            };
            format!("{} {} {}", &caps[1], path, &caps[3])
        },
    )
}

/// How messages are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pretty-print the body according to its language.
    pub beautify: bool,
    /// Spaces per JSON indentation level.
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            beautify: true,
            indent: 2,
        }
    }
}

impl From<&ViewerSettings> for RenderOptions {
    fn from(settings: &ViewerSettings) -> Self {
        Self {
            beautify: true,
            indent: settings.json_indent,
        }
    }
}

/// One message split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    /// Request or status line.
    pub start_line: String,
    /// Header lines in source order.
    pub headers: Vec<Header>,
    /// Body, beautified when requested.
    pub body: String,
    /// Detected body language.
    pub language: ContentLanguage,
}

impl RenderedMessage {
    /// Renders raw message text.
    #[must_use]
    pub fn parse(text: &str, options: RenderOptions) -> Self {
        let (head, body) = split_message(text);
        let mut lines = head.lines();
        let start_line = lines.next().unwrap_or_default().trim_end().to_string();
        let headers: Vec<Header> = lines
            .filter(|line| !line.trim().is_empty())
            .map(Header::parse_line)
            .collect();

        let language = detect_language(find_header(&headers, "content-type"), body);
        let body = if options.beautify {
            beautify(language, body, options.indent)
        } else {
            body.to_string()
        };

        Self {
            start_line,
            headers,
            body,
            language,
        }
    }

    /// The body cut into independent payloads, for the raw view.
    #[must_use]
    pub fn payloads(&self) -> Vec<String> {
        split_payloads(&self.body)
    }
}

impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start_line)?;
        for header in &self.headers {
            write!(f, "\n{header}")?;
        }
        if !self.body.is_empty() {
            write!(f, "\n\n{}", self.body)?;
        }
        Ok(())
    }
}

/// A request and its response, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructedExchange {
    /// The request, with the origin stripped from its request line.
    pub request: RenderedMessage,
    /// The response, `None` when none was received.
    pub response: Option<RenderedMessage>,
}

impl ReconstructedExchange {
    /// Reconstructs both messages of `entry` from its decoded text.
    #[must_use]
    pub fn from_entry(entry: &Entry, options: RenderOptions) -> Self {
        let mut request = RenderedMessage::parse(&entry.decoded.request, options);
        request.start_line = strip_origin(&request.start_line);

        let response = entry
            .decoded
            .response
            .as_deref()
            .map(|text| RenderedMessage::parse(text, options));

        Self { request, response }
    }
}
