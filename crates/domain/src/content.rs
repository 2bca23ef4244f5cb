//! Content language tags used for highlighting and formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display language of a message body.
///
/// The set is closed: unknown content types map to [`ContentLanguage::Text`],
/// which formats as a passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentLanguage {
    /// JSON documents.
    Json,
    /// HTML markup.
    Html,
    /// XML markup.
    Xml,
    /// JavaScript source.
    JavaScript,
    /// CSS stylesheets.
    Css,
    /// Markdown text.
    Markdown,
    /// YAML documents.
    Yaml,
    /// Anything else.
    #[default]
    Text,
}

impl ContentLanguage {
    /// Returns the highlighter tag for this language.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Xml => "xml",
            Self::JavaScript => "javascript",
            Self::Css => "css",
            Self::Markdown => "markdown",
            Self::Yaml => "yaml",
            Self::Text => "text",
        }
    }

    /// Maps a MIME type and subtype (with optional structured suffix) to a
    /// language. Returns `None` for types that need content sniffing.
    #[must_use]
    pub fn from_mime_parts(type_: &str, subtype: &str, suffix: Option<&str>) -> Option<Self> {
        let type_ = type_.to_ascii_lowercase();
        let subtype = subtype.to_ascii_lowercase();
        let suffix = suffix.map(str::to_ascii_lowercase);

        if subtype == "json" || suffix.as_deref() == Some("json") || subtype.ends_with("-json") {
            return Some(Self::Json);
        }
        if subtype == "html" || subtype == "xhtml" {
            return Some(Self::Html);
        }
        if subtype == "xml" || suffix.as_deref() == Some("xml") {
            return Some(Self::Xml);
        }
        if subtype.contains("javascript") || subtype.contains("ecmascript") {
            return Some(Self::JavaScript);
        }
        match (type_.as_str(), subtype.as_str()) {
            ("text", "css") => Some(Self::Css),
            (_, "markdown" | "x-markdown") => Some(Self::Markdown),
            (_, "yaml" | "x-yaml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for ContentLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_parts() {
        assert_eq!(
            ContentLanguage::from_mime_parts("application", "json", None),
            Some(ContentLanguage::Json)
        );
        assert_eq!(
            ContentLanguage::from_mime_parts("application", "problem", Some("json")),
            Some(ContentLanguage::Json)
        );
        assert_eq!(
            ContentLanguage::from_mime_parts("text", "HTML", None),
            Some(ContentLanguage::Html)
        );
        assert_eq!(
            ContentLanguage::from_mime_parts("image", "svg", Some("xml")),
            Some(ContentLanguage::Xml)
        );
        assert_eq!(
            ContentLanguage::from_mime_parts("application", "x-javascript", None),
            Some(ContentLanguage::JavaScript)
        );
        assert_eq!(
            ContentLanguage::from_mime_parts("text", "css", None),
            Some(ContentLanguage::Css)
        );
        assert_eq!(
            ContentLanguage::from_mime_parts("application", "x-yaml", None),
            Some(ContentLanguage::Yaml)
        );
        assert_eq!(ContentLanguage::from_mime_parts("text", "plain", None), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ContentLanguage::JavaScript.to_string(), "javascript");
        assert_eq!(ContentLanguage::default(), ContentLanguage::Text);
    }
}
