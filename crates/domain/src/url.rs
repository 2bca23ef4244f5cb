//! URL helpers used by decoders and display code.

use serde::{Deserialize, Serialize};
use url::Url;

/// Parsed pieces of a captured URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlParts {
    /// Host name without port.
    pub host: String,
    /// Path component, `/` when the URL has none.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
}

/// Splits a URL into host, path and query.
///
/// Unparsable URLs yield the whole input as `pathname` and an empty host,
/// so relative request targets still display sensibly.
#[must_use]
pub fn parse_url(input: &str) -> UrlParts {
    match Url::parse(input) {
        Ok(url) => UrlParts {
            host: url.host_str().unwrap_or_default().to_string(),
            pathname: url.path().to_string(),
            search: url.query().map(|q| format!("?{q}")).unwrap_or_default(),
        },
        Err(_) => UrlParts {
            host: String::new(),
            pathname: input.to_string(),
            search: String::new(),
        },
    }
}

/// Splits a URL into its origin (`scheme://hostname`) and request target.
///
/// The port is not part of the origin. When the URL cannot be parsed the
/// whole input is returned as origin and the target is empty.
///
/// # Errors
///
/// Returns the original string alongside the parse error so callers can
/// record a warning.
pub fn split_origin(input: &str) -> Result<(String, String), (String, url::ParseError)> {
    match Url::parse(input) {
        Ok(url) => {
            let host = match url.host_str() {
                Some(hostname) => format!("{}://{}", url.scheme(), hostname),
                None => return Ok((input.to_string(), String::new())),
            };
            let path = match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            };
            Ok((host, path))
        }
        Err(err) => Err((input.to_string(), err)),
    }
}
