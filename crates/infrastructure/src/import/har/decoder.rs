//! HAR log decoder.

use capview_domain::entry::DEFAULT_HTTP_VERSION;
use capview_domain::{
    DecodeWarning, DecodeWarningKind, DecodedCache, Entry, EntryOrigin, HarDetails, Header,
    IngestError, IngestResult, MessageBody, RequestRecord, ResponseRecord, Session, SourceFormat,
    generate_entry_id, reason_phrase,
};
use serde_json::Value;

use super::types::{HarCreator, HarEntry, HarHeader};
use crate::import::detect::{missing_har_field, validate_har};
use crate::import::{DEFAULT_MIME_TYPE, message_text, or_default_method, or_default_url};

/// Decodes HAR 1.2 logs.
///
/// Every entry is validated before any is converted: a single entry without
/// `request.method`, `request.url` or a numeric `response.status` rejects the
/// whole file with [`IngestError::InvalidHarEntry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HarDecoder;

impl HarDecoder {
    /// Creates a new decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes a HAR document into a session named after its creator.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHarStructure` if the document shape is wrong, or
    /// `InvalidHarEntry` for the first entry that lacks a required field.
    pub fn decode(&self, bytes: &[u8], file_name: &str) -> IngestResult<Session> {
        self.decode_document(validate_har(bytes)?, file_name)
    }

    /// Decodes an already parsed HAR document.
    ///
    /// # Errors
    ///
    /// Same as [`HarDecoder::decode`].
    pub fn decode_document(&self, mut document: Value, file_name: &str) -> IngestResult<Session> {
        let creator = document
            .pointer("/log/creator")
            .cloned()
            .and_then(|value| serde_json::from_value::<HarCreator>(value).ok());

        let raw_entries = match document.pointer_mut("/log/entries").map(Value::take) {
            Some(Value::Array(entries)) => entries,
            _ => return Err(IngestError::InvalidHarStructure("missing log.entries array".to_string())),
        };

        let mut parsed = Vec::with_capacity(raw_entries.len());
        for (index, raw) in raw_entries.into_iter().enumerate() {
            if let Some(reason) = missing_har_field(&raw) {
                return Err(IngestError::InvalidHarEntry {
                    index,
                    reason: reason.to_string(),
                });
            }
            let entry: HarEntry = serde_json::from_value(raw).map_err(|e| IngestError::InvalidHarEntry {
                index,
                reason: e.to_string(),
            })?;
            parsed.push(entry);
        }

        let mut warnings = Vec::new();
        let entries: Vec<Entry> = parsed
            .into_iter()
            .enumerate()
            .map(|(index, entry)| build_entry(index, entry, &mut warnings))
            .collect();

        let name = creator
            .map(|c| format!("{} {}", c.name, c.version).trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| file_name.to_string());

        tracing::debug!(entries = entries.len(), session = %name, "decoded HAR log");
        Ok(Session::new(name, SourceFormat::Har, entries).with_warnings(warnings))
    }
}

fn to_headers(headers: Vec<HarHeader>) -> Vec<Header> {
    headers
        .into_iter()
        .map(|h| Header::new(h.name, h.value))
        .collect()
}

fn http_version(raw: String) -> String {
    if raw.trim().is_empty() {
        DEFAULT_HTTP_VERSION.to_string()
    } else {
        raw
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn status_code(raw: f64, index: usize, warnings: &mut Vec<DecodeWarning>) -> u16 {
    if raw.is_finite() && (1.0..=f64::from(u16::MAX)).contains(&raw) {
        return raw as u16;
    }
    if raw != 0.0 {
        warnings.push(DecodeWarning::record(
            DecodeWarningKind::Number,
            Some(index),
            format!("status {raw} out of range, using 0"),
        ));
    }
    0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn content_size(raw: Option<f64>) -> Option<u64> {
    raw.filter(|size| size.is_finite() && *size >= 0.0)
        .map(|size| size as u64)
}

fn build_entry(index: usize, har: HarEntry, warnings: &mut Vec<DecodeWarning>) -> Entry {
    let HarEntry {
        started_date_time,
        time,
        request,
        response,
        server_ip_address,
    } = har;

    let (request_body, request_encoding) = request
        .post_data
        .map(|p| (p.text.unwrap_or_default(), p.encoding))
        .unwrap_or_default();
    let response_body = response.content.text.unwrap_or_default();
    let response_encoding = response.content.encoding;

    for declared in [&request_encoding, &response_encoding].into_iter().flatten() {
        tracing::debug!(entry = index, encoding = %declared, "HAR body encoding recorded, not applied");
    }

    let request = RequestRecord {
        method: or_default_method(request.method),
        url: or_default_url(request.url),
        protocol_version: http_version(request.http_version),
        headers: to_headers(request.headers),
        body: MessageBody::plain(request_body),
    };

    let status = status_code(response.status, index, warnings);
    let status_text = if response.status_text.trim().is_empty() {
        reason_phrase(status).to_string()
    } else {
        response.status_text
    };
    let content_length = content_size(response.content.size).unwrap_or(response_body.len() as u64);
    let response = ResponseRecord {
        status_code: status,
        status_text,
        protocol_version: http_version(response.http_version),
        headers: to_headers(response.headers),
        mime_type: response
            .content
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        content_length,
        body: MessageBody::plain(response_body),
    };

    let decoded = DecodedCache {
        request: message_text(
            &format!("{} {} {}", request.method, request.url, request.protocol_version),
            &request.headers,
            &request.body.raw,
        ),
        response: Some(message_text(
            format!(
                "{} {} {}",
                response.protocol_version, response.status_code, response.status_text
            )
            .trim_end(),
            &response.headers,
            &response.body.raw,
        )),
    };

    Entry {
        id: generate_entry_id(index, &started_date_time),
        index,
        timestamp: started_date_time,
        request,
        response: Some(response),
        decoded,
        origin: EntryOrigin::Har(HarDetails {
            server_ip: server_ip_address.filter(|ip| !ip.is_empty()),
            time_ms: time,
            request_body_encoding: request_encoding,
            response_body_encoding: response_encoding,
        }),
    }
}
