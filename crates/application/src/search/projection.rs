//! Flattened, serializable projection of entries for the fuzzy search worker.

use capview_domain::{Annotation, Entry, EntryId, Session};
use serde::{Deserialize, Serialize};

/// Which part of an entry a projected field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// HTTP method.
    Method,
    /// Full request URL.
    Url,
    /// Host name.
    Host,
    /// Status code and reason.
    Status,
    /// Response MIME type.
    MimeType,
    /// User comment.
    Comment,
    /// Request and response headers.
    Headers,
    /// Decoded request body.
    RequestBody,
    /// Decoded response body.
    ResponseBody,
}

impl FieldKind {
    /// Relative weight of a match in this field.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Method | Self::Url | Self::Host | Self::Comment => 1.0,
            Self::Status | Self::MimeType | Self::Headers => 0.9,
            Self::RequestBody | Self::ResponseBody => 0.8,
        }
    }
}

/// One searchable field of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchField {
    /// Origin of the text.
    pub kind: FieldKind,
    /// The text.
    pub text: String,
}

/// Every searchable field of one entry, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Entry the document describes.
    pub entry_id: EntryId,
    /// Position of the entry in the session.
    pub index: usize,
    /// Non-empty fields.
    pub fields: Vec<SearchField>,
}

impl SearchDocument {
    /// Projects an entry, cutting bodies to `body_limit` bytes.
    #[must_use]
    pub fn project(entry: &Entry, annotation: &Annotation, body_limit: usize) -> Self {
        let mut fields = Vec::new();
        let mut push = |kind: FieldKind, text: String| {
            if !text.is_empty() {
                fields.push(SearchField { kind, text });
            }
        };

        push(FieldKind::Method, entry.request.method.clone());
        push(FieldKind::Url, entry.request.url.clone());
        push(FieldKind::Host, entry.url_parts().host);
        push(FieldKind::Comment, annotation.comment.clone());

        let mut headers: Vec<String> = entry.request.headers.iter().map(ToString::to_string).collect();
        push(
            FieldKind::RequestBody,
            truncate(&entry.request_body_text(), body_limit).to_string(),
        );

        if let Some(response) = &entry.response {
            push(
                FieldKind::Status,
                format!("{} {}", response.status_code, response.status_text)
                    .trim()
                    .to_string(),
            );
            push(FieldKind::MimeType, response.mime_type.clone());
            headers.extend(response.headers.iter().map(ToString::to_string));
            if let Some(body) = entry.response_body_text() {
                push(FieldKind::ResponseBody, truncate(&body, body_limit).to_string());
            }
        }
        push(FieldKind::Headers, headers.join("\n"));

        Self {
            entry_id: entry.id.clone(),
            index: entry.index,
            fields,
        }
    }
}

/// Projects every entry of a session, with its current annotation.
#[must_use]
pub fn project_session(session: &Session, body_limit: usize) -> Vec<SearchDocument> {
    session
        .entries()
        .iter()
        .map(|entry| SearchDocument::project(entry, &session.annotation(&entry.id), body_limit))
        .collect()
}

fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let end = text
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_bytes)
        .last()
        .unwrap_or(0);
    &text[..end]
}
