//! Viewer Settings Domain Model
//!
//! Defines the tunables of the ingestion pipeline and the search engine.

use serde::{Deserialize, Serialize};

/// Largest capture accepted, in bytes (50 MiB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Viewer settings with sensible defaults for every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Maximum accepted capture size in bytes.
    pub max_file_size: usize,
    /// Spaces per indentation level when pretty-printing JSON.
    pub json_indent: usize,
    /// Queries shorter than this (in characters) match every entry.
    pub min_query_len: usize,
    /// Minimum Jaro-Winkler similarity for a fuzzy token match.
    pub fuzzy_threshold: f64,
    /// Maximum number of ranked fuzzy results.
    pub fuzzy_max_results: usize,
    /// Body bytes included in each fuzzy search document.
    pub fuzzy_body_limit: usize,
    /// Quiet period before a typed query is issued, in milliseconds.
    pub search_debounce_ms: u64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            json_indent: 2,
            min_query_len: 2,
            fuzzy_threshold: 0.82,
            fuzzy_max_results: 50,
            fuzzy_body_limit: 16 * 1024,
            search_debounce_ms: 200,
        }
    }
}

impl ViewerSettings {
    /// Creates settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the JSON indentation as a string of spaces.
    #[must_use]
    pub fn indent(&self) -> String {
        " ".repeat(self.json_indent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.max_file_size, 52_428_800);
        assert_eq!(settings.json_indent, 2);
        assert_eq!(settings.min_query_len, 2);
        assert_eq!(settings.indent(), "  ");
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{"json_indent": 4}"#;
        let settings: ViewerSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.json_indent, 4);
        assert_eq!(settings.min_query_len, 2);
    }
}
