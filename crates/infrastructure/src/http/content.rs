//! Content language detection and readability formatting.

use std::sync::LazyLock;

use capview_domain::ContentLanguage;
use regex::Regex;
use serde_json::Value;

use super::payload::split_payloads;
use crate::serialization::{from_json, to_json_pretty};

/// A complete opening tag, declaration or processing instruction at the start.
static LEADING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<[!?/]?[A-Za-z][^<>]*>").expect("valid regex"));

/// Tokens that make an otherwise unrecognized body look like code.
const CODE_TOKENS: [&str; 6] = ["{", ";", "function", "=>", "class", "import"];

/// Picks the display language for a body.
///
/// A recognized `Content-Type` wins; otherwise the body is sniffed.
#[must_use]
pub fn detect_language(content_type: Option<&str>, body: &str) -> ContentLanguage {
    content_type
        .and_then(|ct| ct.trim().parse::<mime::Mime>().ok())
        .and_then(|m| {
            ContentLanguage::from_mime_parts(
                m.type_().as_str(),
                m.subtype().as_str(),
                m.suffix().map(|s| s.as_str()),
            )
        })
        .unwrap_or_else(|| sniff_language(body))
}

/// Guesses the language of a body from its content alone.
#[must_use]
pub fn sniff_language(body: &str) -> ContentLanguage {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return ContentLanguage::Text;
    }
    if from_json::<Value>(trimmed).is_ok() {
        return ContentLanguage::Json;
    }
    if LEADING_TAG.is_match(trimmed) {
        let lower = trimmed.to_ascii_lowercase();
        return if lower.contains("<!doctype html") || lower.contains("<html") {
            ContentLanguage::Html
        } else {
            ContentLanguage::Xml
        };
    }
    if CODE_TOKENS.iter().any(|token| trimmed.contains(token)) {
        return ContentLanguage::JavaScript;
    }
    ContentLanguage::Text
}

/// Formats `body` for reading.
///
/// JSON is pretty-printed with `indent` spaces (each payload separately when
/// the body holds several); HTML and XML get a line break at tag boundaries.
/// Other languages, and bodies that fail to format, are returned unchanged.
#[must_use]
pub fn beautify(language: ContentLanguage, body: &str, indent: usize) -> String {
    match language {
        ContentLanguage::Json => beautify_json(body, indent).unwrap_or_else(|| {
            tracing::warn!(bytes = body.len(), "body is not valid JSON, showing it as is");
            body.to_string()
        }),
        ContentLanguage::Html | ContentLanguage::Xml => break_tags(body),
        _ => body.to_string(),
    }
}

fn pretty(text: &str, indent: usize) -> Option<String> {
    let value: Value = from_json(text).ok()?;
    to_json_pretty(&value, indent).ok()
}

fn beautify_json(body: &str, indent: usize) -> Option<String> {
    if body.trim().is_empty() {
        return Some(body.to_string());
    }
    if let Some(formatted) = pretty(body, indent) {
        return Some(formatted);
    }
    let payloads = split_payloads(body);
    if payloads.len() < 2 {
        return None;
    }
    payloads
        .iter()
        .map(|payload| pretty(payload, indent))
        .collect::<Option<Vec<_>>>()
        .map(|parts| parts.join("\n"))
}

/// Puts a line break before `<` and after `>` where they touch other text.
///
/// Markup is never validated or repaired.
fn break_tags(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + body.len() / 8);
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '<' && out.chars().next_back().is_some_and(|prev| !prev.is_whitespace()) {
            out.push('\n');
        }
        out.push(c);
        if c == '>' && chars.peek().is_some_and(|next| !next.is_whitespace()) {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_from_content_type() {
        assert_eq!(
            detect_language(Some("application/json; charset=utf-8"), ""),
            ContentLanguage::Json
        );
        assert_eq!(
            detect_language(Some("application/problem+json"), ""),
            ContentLanguage::Json
        );
        assert_eq!(detect_language(Some("TEXT/HTML"), ""), ContentLanguage::Html);
        assert_eq!(detect_language(Some("image/svg+xml"), ""), ContentLanguage::Xml);
        assert_eq!(
            detect_language(Some("application/javascript"), ""),
            ContentLanguage::JavaScript
        );
        assert_eq!(detect_language(Some("text/css"), ""), ContentLanguage::Css);
    }

    #[test]
    fn test_unrecognized_content_type_falls_back_to_sniffing() {
        assert_eq!(
            detect_language(Some("text/plain"), r#"{"a":1}"#),
            ContentLanguage::Json
        );
        assert_eq!(detect_language(Some("not a mime"), "hello"), ContentLanguage::Text);
        assert_eq!(detect_language(None, "<root><a/></root>"), ContentLanguage::Xml);
    }

    #[test]
    fn test_sniffing() {
        assert_eq!(sniff_language("<!DOCTYPE html><html></html>"), ContentLanguage::Html);
        assert_eq!(sniff_language("<note>hi</note>"), ContentLanguage::Xml);
        assert_eq!(sniff_language("const f = () => 1"), ContentLanguage::JavaScript);
        assert_eq!(sniff_language("plain words"), ContentLanguage::Text);
        assert_eq!(sniff_language("   "), ContentLanguage::Text);
    }

    #[test]
    fn test_sniffing_truncated_markup() {
        assert_eq!(
            sniff_language("<!DOCTYPE html><html><body><p>cut off mid"),
            ContentLanguage::Html
        );
        assert_eq!(sniff_language("<?xml version=\"1.0\"?><feed><entry"), ContentLanguage::Xml);
        assert_eq!(sniff_language("< 3 apples"), ContentLanguage::Text);
    }

    #[test]
    fn test_beautify_json() {
        assert_eq!(
            beautify(ContentLanguage::Json, r#"{"ok":true}"#, 2),
            "{\n  \"ok\": true\n}"
        );
        assert_eq!(
            beautify(ContentLanguage::Json, "{\"a\":1}\n{\"b\":2}", 2),
            "{\n  \"a\": 1\n}\n{\n  \"b\": 2\n}"
        );
    }

    #[test]
    fn test_beautify_invalid_json_returns_input() {
        assert_eq!(beautify(ContentLanguage::Json, "{oops", 2), "{oops");
    }

    #[test]
    fn test_beautify_markup() {
        assert_eq!(
            beautify(ContentLanguage::Html, "<p><b>hi</b></p>", 2),
            "<p>\n<b>\nhi\n</b>\n</p>"
        );
        assert_eq!(beautify(ContentLanguage::Xml, "<a>\n<b/>\n</a>", 2), "<a>\n<b/>\n</a>");
    }

    #[test]
    fn test_beautify_passthrough() {
        assert_eq!(beautify(ContentLanguage::Css, "a{b:c}", 2), "a{b:c}");
    }
}
