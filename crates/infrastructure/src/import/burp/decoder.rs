//! Burp Suite XML export decoder.

use capview_domain::encoding::{decode_base64_bytes, encode_base64};
use capview_domain::entry::DEFAULT_HTTP_VERSION;
use capview_domain::{
    BurpDetails, DecodeWarning, DecodeWarningKind, DecodedCache, Entry, EntryOrigin, Header,
    IngestError, IngestResult, MessageBody, PlaceholderKind, RequestRecord, ResponseRecord,
    Session, SourceFormat, find_header, generate_entry_id, reason_phrase, split_origin,
};
use chrono::{DateTime, NaiveDateTime};

use super::reader::{BurpBlob, BurpItem, read_document};
use crate::import::{DEFAULT_MIME_TYPE, or_default_method, or_default_url};

/// Display format for Burp timestamps.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Burp's own timestamp layout once the zone name is removed.
const BURP_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Decodes Burp Suite "Save items" XML exports.
///
/// Every `<item>` becomes exactly one entry, even when all of its tags are
/// missing; unreadable items become `ERROR` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct BurpDecoder;

impl BurpDecoder {
    /// Creates a new decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes an export into a session named after `file_name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBurpStructure` when the XML is malformed or has no
    /// `<item>` elements.
    pub fn decode(&self, bytes: &[u8], file_name: &str) -> IngestResult<Session> {
        let document = read_document(bytes)?;
        if document.items.is_empty() {
            return Err(IngestError::InvalidBurpStructure(
                "no <item> elements found".to_string(),
            ));
        }

        let mut warnings = Vec::new();
        let exported_at = document
            .export_time
            .map(|raw| format_timestamp(&raw, None, &mut warnings))
            .filter(|t| !t.is_empty());

        let entries: Vec<Entry> = document
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| build_entry(index, item, &mut warnings))
            .collect();

        tracing::debug!(entries = entries.len(), "decoded Burp export");
        Ok(Session::new(file_name, SourceFormat::BurpXml, entries)
            .with_exported_at(exported_at)
            .with_warnings(warnings))
    }
}

/// Reformats a Burp timestamp (`Thu Mar 05 16:23:39 CET 2020`) or an
/// RFC 3339 / RFC 2822 one. Anything else passes through unchanged.
pub(crate) fn format_timestamp(
    raw: &str,
    entry_index: Option<usize>,
    warnings: &mut Vec<DecodeWarning>,
) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Some(parsed) = parse_timestamp(raw) {
        return parsed.format(TIME_FORMAT).to_string();
    }
    warnings.push(DecodeWarning::record(
        DecodeWarningKind::Timestamp,
        entry_index,
        format!("unrecognized timestamp {raw:?}"),
    ));
    raw.to_string()
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let without_zone = match tokens.as_slice() {
        [day, month, date, time, _zone, year] => Some(format!("{day} {month} {date} {time} {year}")),
        [_, _, _, _, _] => Some(raw.to_string()),
        _ => None,
    };
    without_zone
        .and_then(|text| NaiveDateTime::parse_from_str(&text, BURP_TIME_FORMAT).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|t| t.naive_local()))
        .or_else(|| DateTime::parse_from_rfc2822(raw).ok().map(|t| t.naive_local()))
}

fn blob_bytes(
    blob: BurpBlob,
    index: usize,
    part: &str,
    warnings: &mut Vec<DecodeWarning>,
) -> Vec<u8> {
    if !blob.base64 {
        return blob.text.into_bytes();
    }
    match decode_base64_bytes(&blob.text) {
        Ok(bytes) => bytes,
        Err(e) => {
            warnings.push(DecodeWarning::record(
                DecodeWarningKind::Base64,
                Some(index),
                format!("{part} is not valid base64 ({e}), keeping raw text"),
            ));
            blob.text.into_bytes()
        }
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits a raw message into head and body at the first blank line.
fn split_head(message: &[u8]) -> (&[u8], &[u8]) {
    for separator in [&b"\r\n\r\n"[..], b"\n\n"] {
        if let Some(at) = find_bytes(message, separator) {
            return (&message[..at], &message[at + separator.len()..]);
        }
    }
    (message, &[])
}

fn body_from_bytes(bytes: &[u8]) -> MessageBody {
    match std::str::from_utf8(bytes) {
        Ok(text) => MessageBody::plain(text),
        Err(_) => MessageBody::base64(encode_base64(bytes)),
    }
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Header> {
    lines
        .filter(|line| !line.trim().is_empty())
        .map(Header::parse_line)
        .collect()
}

fn parse_number(
    raw: &str,
    field: &str,
    index: usize,
    warnings: &mut Vec<DecodeWarning>,
) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(DecodeWarning::record(
                DecodeWarningKind::Number,
                Some(index),
                format!("{field} {raw:?} is not a number, using 0"),
            ));
            Some(0)
        }
    }
}

/// MIME type for one of Burp's `<mimetype>` families.
fn burp_mime_family(family: &str) -> Option<&'static str> {
    match family.trim().to_ascii_uppercase().as_str() {
        "JSON" => Some("application/json"),
        "HTML" => Some("text/html"),
        "XML" => Some("application/xml"),
        "SCRIPT" => Some("application/javascript"),
        "CSS" => Some("text/css"),
        "TEXT" => Some("text/plain"),
        "PNG" => Some("image/png"),
        "JPEG" => Some("image/jpeg"),
        "GIF" => Some("image/gif"),
        "SVG" => Some("image/svg+xml"),
        _ => None,
    }
}

fn response_mime(headers: &[Header], family: &str, extension: &str) -> String {
    if let Some(content_type) = find_header(headers, "content-type") {
        return content_type
            .parse::<mime::Mime>()
            .map_or_else(
                |_| content_type.split(';').next().unwrap_or_default().trim().to_string(),
                |m| m.essence_str().to_string(),
            );
    }
    if let Some(mime) = burp_mime_family(family) {
        return mime.to_string();
    }
    mime_guess::from_ext(extension.trim())
        .first()
        .map_or_else(|| DEFAULT_MIME_TYPE.to_string(), |m| m.essence_str().to_string())
}

fn build_response(
    index: usize,
    item: &mut BurpItem,
    warnings: &mut Vec<DecodeWarning>,
) -> Option<(ResponseRecord, String)> {
    if item.response.text.trim().is_empty() {
        return None;
    }
    let bytes = blob_bytes(std::mem::take(&mut item.response), index, "response", warnings);
    let (head, body) = split_head(&bytes);
    let head = String::from_utf8_lossy(head);
    let mut lines = head.lines();

    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    let version = parts
        .next()
        .filter(|v| v.starts_with("HTTP/"))
        .unwrap_or(DEFAULT_HTTP_VERSION)
        .to_string();
    let line_code = parts.next().and_then(|code| code.trim().parse::<u16>().ok());
    let line_text = parts.next().map(str::trim).unwrap_or_default();

    let status_code = match parse_number(&item.status, "status", index, warnings) {
        Some(code) => u16::try_from(code).unwrap_or_default(),
        None => line_code.unwrap_or_default(),
    };
    let status_text = if line_text.is_empty() {
        reason_phrase(status_code).to_string()
    } else {
        line_text.to_string()
    };

    let content_length = parse_number(&item.response_length, "responselength", index, warnings)
        .or_else(|| parse_number(&item.content_length, "contentlength", index, warnings))
        .unwrap_or_default();

    let headers = parse_headers(lines);
    let mime_type = response_mime(&headers, &item.mime_type, &item.extension);

    let record = ResponseRecord {
        status_code,
        status_text,
        protocol_version: version,
        headers,
        body: body_from_bytes(body),
        mime_type,
        content_length,
    };
    Some((record, String::from_utf8_lossy(&bytes).into_owned()))
}

fn build_entry(index: usize, mut item: BurpItem, warnings: &mut Vec<DecodeWarning>) -> Entry {
    let timestamp = format_timestamp(&item.time, Some(index), warnings);

    if let Some(reason) = &item.unreadable {
        warnings.push(DecodeWarning::record(
            DecodeWarningKind::Xml,
            Some(index),
            format!("unreadable item: {reason}"),
        ));
        return Entry::placeholder(index, timestamp, PlaceholderKind::Error);
    }
    if item.method.trim().is_empty()
        && item.url.trim().is_empty()
        && item.request.text.trim().is_empty()
    {
        return Entry::placeholder(index, timestamp, PlaceholderKind::Unknown);
    }

    let request_bytes = blob_bytes(std::mem::take(&mut item.request), index, "request", warnings);
    let (head, body) = split_head(&request_bytes);
    let head = String::from_utf8_lossy(head);
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let line_method = request_line.next().unwrap_or_default();
    let line_version = request_line.nth(1).filter(|v| v.starts_with("HTTP/"));

    let method = if item.method.trim().is_empty() {
        line_method.to_string()
    } else {
        item.method.trim().to_string()
    };

    let request = RequestRecord {
        method: or_default_method(method),
        url: or_default_url(item.url.trim().to_string()),
        protocol_version: line_version.unwrap_or(DEFAULT_HTTP_VERSION).to_string(),
        headers: parse_headers(lines),
        body: body_from_bytes(body),
    };

    let (host, path) = if item.url.trim().is_empty() {
        (item.host.clone(), item.path.clone())
    } else {
        split_origin(item.url.trim()).unwrap_or_else(|(original, e)| {
            warnings.push(DecodeWarning::record(
                DecodeWarningKind::Url,
                Some(index),
                format!("cannot parse url {original:?}: {e}"),
            ));
            (original, String::new())
        })
    };

    let (response, response_text) = match build_response(index, &mut item, warnings) {
        Some((record, text)) => (Some(record), Some(text)),
        None => (None, None),
    };

    Entry {
        id: generate_entry_id(index, &timestamp),
        index,
        timestamp,
        request,
        response,
        decoded: DecodedCache {
            request: String::from_utf8_lossy(&request_bytes).into_owned(),
            response: response_text,
        },
        origin: EntryOrigin::Burp(BurpDetails {
            host,
            path,
            ip: item.ip,
            port: item.port,
            protocol: item.protocol,
            extension: item.extension,
            burp_comment: item.comment,
        }),
    }
}
