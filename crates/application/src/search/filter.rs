//! Substring filter over session entries.

use capview_domain::encoding::decode_if_base64;
use capview_domain::{Entry, Header, Session, ViewerSettings};

/// Case-insensitive substring filter.
///
/// Looks at the URL, host, comment, every request and response header name
/// and value, and the decoded request and response bodies.
#[derive(Debug, Clone, Copy)]
pub struct SearchFilter {
    min_query_len: usize,
}

impl SearchFilter {
    /// Creates a filter that ignores queries shorter than `min_query_len` characters.
    #[must_use]
    pub const fn new(min_query_len: usize) -> Self {
        Self { min_query_len }
    }

    /// Creates a filter from viewer settings.
    #[must_use]
    pub const fn from_settings(settings: &ViewerSettings) -> Self {
        Self::new(settings.min_query_len)
    }

    /// Returns the entries matching `query`, in session order.
    ///
    /// Queries below the minimum length return every entry.
    #[must_use]
    pub fn apply<'a>(&self, session: &'a Session, query: &str) -> Vec<&'a Entry> {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            return session.entries().iter().collect();
        }

        let needle = query.to_lowercase();
        session
            .entries()
            .iter()
            .filter(|entry| {
                let comment = session.annotations().comment(&entry.id);
                entry_matches(entry, comment, &needle)
            })
            .collect()
    }
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::from_settings(&ViewerSettings::default())
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn headers_match(headers: &[Header], needle: &str) -> bool {
    headers
        .iter()
        .any(|h| {
            contains(&h.name, needle)
                || contains(&h.value, needle)
                || contains(&decode_if_base64(&h.value), needle)
        })
}

/// Returns true if any searchable field of `entry` contains `needle`.
///
/// `needle` must already be lowercase.
#[must_use]
pub fn entry_matches(entry: &Entry, comment: &str, needle: &str) -> bool {
    if contains(&entry.request.url, needle)
        || contains(&entry.url_parts().host, needle)
        || contains(comment, needle)
        || headers_match(&entry.request.headers, needle)
        || contains(&entry.request_body_text(), needle)
    {
        return true;
    }

    entry.response.as_ref().is_some_and(|response| {
        headers_match(&response.headers, needle)
            || entry
                .response_body_text()
                .is_some_and(|body| contains(&body, needle))
    })
}
