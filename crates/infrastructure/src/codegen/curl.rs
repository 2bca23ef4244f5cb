//! curl command export.

use capview_domain::{ContentLanguage, Entry, Header, find_header};
use serde_json::Value;

use crate::http::split_message;
use crate::serialization::{from_json, to_json_compact};

/// Options for curl export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    /// Escape `\` and `'` inside `$'...'` values.
    ///
    /// Off by default, which reproduces the request bytes verbatim but
    /// yields a broken command when a value contains a single quote.
    pub escape_quotes: bool,
    /// One argument per line, joined with `\` continuations.
    pub pretty_format: bool,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            escape_quotes: false,
            pretty_format: true,
        }
    }
}

/// Builds a `curl` command that replays the captured request.
///
/// Method, headers and body come from the decoded request text; the URL is
/// the entry's absolute URL. `Content-Length` is left for curl to compute.
/// JSON bodies are compacted onto one line.
#[must_use]
pub fn to_curl(entry: &Entry, options: &CurlOptions) -> String {
    let (head, body) = split_message(&entry.decoded.request);
    let mut lines = head.lines();
    let method = lines
        .next()
        .and_then(|line| line.split_whitespace().next())
        .unwrap_or(entry.request.method.as_str());
    let headers: Vec<Header> = lines
        .filter(|line| !line.trim().is_empty())
        .map(Header::parse_line)
        .collect();

    let quote = |value: &str| ansi_c_quote(value, options.escape_quotes);

    let mut parts = vec!["curl".to_string(), format!("-X {}", quote(method))];

    for header in &headers {
        if header.name.eq_ignore_ascii_case("content-length") || header.name.starts_with(':') {
            continue;
        }
        parts.push(format!("-H {}", quote(&header.to_string())));
    }

    if !body.is_empty() {
        let data = if is_json(find_header(&headers, "content-type")) {
            compact_json(body).unwrap_or_else(|| body.to_string())
        } else {
            body.to_string()
        };
        parts.push(format!("--data-binary {}", quote(&data)));
    }

    parts.push(quote(&entry.request.url));

    if options.pretty_format {
        parts.join(" \\\n  ")
    } else {
        parts.join(" ")
    }
}

fn ansi_c_quote(value: &str, escape_quotes: bool) -> String {
    if escape_quotes {
        format!("$'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    } else {
        format!("$'{value}'")
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        ct.parse::<mime::Mime>().ok().and_then(|m| {
            ContentLanguage::from_mime_parts(
                m.type_().as_str(),
                m.subtype().as_str(),
                m.suffix().map(|s| s.as_str()),
            )
        }) == Some(ContentLanguage::Json)
            || ct.to_ascii_lowercase().contains("json")
    })
}

fn compact_json(body: &str) -> Option<String> {
    let value: Value = from_json(body).ok()?;
    to_json_compact(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use capview_domain::{
        DecodedCache, EntryOrigin, HarDetails, MessageBody, PlaceholderKind, RequestRecord,
        generate_entry_id,
    };
    use pretty_assertions::assert_eq;

    fn entry(decoded_request: &str, url: &str) -> Entry {
        Entry {
            id: generate_entry_id(0, ""),
            index: 0,
            timestamp: String::new(),
            request: RequestRecord {
                method: "POST".to_string(),
                url: url.to_string(),
                protocol_version: "HTTP/1.1".to_string(),
                headers: Vec::new(),
                body: MessageBody::default(),
            },
            response: None,
            decoded: DecodedCache {
                request: decoded_request.to_string(),
                response: None,
            },
            origin: EntryOrigin::Har(HarDetails::default()),
        }
    }

    #[test]
    fn test_curl_with_json_body() {
        let entry = entry(
            "POST /api HTTP/1.1\r\nHost: a.test\r\nContent-Type: application/json\r\nContent-Length: 17\r\nCookie: sid=1\r\n\r\n{ \"a\": [1, 2] }",
            "https://a.test/api",
        );

        assert_eq!(
            to_curl(&entry, &CurlOptions::default()),
            "curl \\\n  -X $'POST' \\\n  -H $'Host: a.test' \\\n  -H $'Content-Type: application/json' \\\n  -H $'Cookie: sid=1' \\\n  --data-binary $'{\"a\":[1,2]}' \\\n  $'https://a.test/api'"
        );
    }

    #[test]
    fn test_curl_single_line_without_body() {
        let entry = entry("GET / HTTP/1.1\nAccept: */*", "https://a.test/");
        let options = CurlOptions {
            pretty_format: false,
            ..CurlOptions::default()
        };
        assert_eq!(
            to_curl(&entry, &options),
            "curl -X $'GET' -H $'Accept: */*' $'https://a.test/'"
        );
    }

    #[test]
    fn test_quotes_unescaped_by_default() {
        let entry = entry("POST / HTTP/1.1\n\nit's", "https://a.test/");
        let options = CurlOptions {
            pretty_format: false,
            ..CurlOptions::default()
        };
        assert!(to_curl(&entry, &options).contains("--data-binary $'it's'"));
    }

    #[test]
    fn test_escape_quotes_option() {
        let entry = entry("POST / HTTP/1.1\nX-Path: C:\\tmp\n\nit's", "https://a.test/");
        let options = CurlOptions {
            escape_quotes: true,
            pretty_format: false,
        };
        let command = to_curl(&entry, &options);
        assert!(command.contains("-H $'X-Path: C:\\\\tmp'"));
        assert!(command.contains("--data-binary $'it\\'s'"));
    }

    #[test]
    fn test_non_json_body_kept_raw() {
        let entry = entry(
            "POST / HTTP/1.1\nContent-Type: application/x-www-form-urlencoded\n\na=1&b=2",
            "https://a.test/",
        );
        assert!(to_curl(&entry, &CurlOptions::default()).contains("--data-binary $'a=1&b=2'"));
    }

    #[test]
    fn test_pseudo_headers_skipped() {
        let entry = entry(
            "GET https://a.test/x HTTP/2\n:authority: a.test\n:method: GET\naccept: */*",
            "https://a.test/x",
        );
        let options = CurlOptions {
            pretty_format: false,
            ..CurlOptions::default()
        };
        assert_eq!(
            to_curl(&entry, &options),
            "curl -X $'GET' -H $'accept: */*' $'https://a.test/x'"
        );
    }

    #[test]
    fn test_placeholder() {
        let entry = Entry::placeholder(3, "", PlaceholderKind::Unknown);
        let options = CurlOptions {
            pretty_format: false,
            ..CurlOptions::default()
        };
        assert_eq!(to_curl(&entry, &options), "curl -X $'UNKNOWN' $'/'");
    }
}
