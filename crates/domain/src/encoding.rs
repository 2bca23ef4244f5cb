//! Base64 helpers shared by the decoders and the search engine.

use std::borrow::Cow;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

static BASE64_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").expect("valid regex"));

fn strip_whitespace(input: &str) -> Cow<'_, str> {
    if input.chars().any(char::is_whitespace) {
        Cow::Owned(input.chars().filter(|c| !c.is_whitespace()).collect())
    } else {
        Cow::Borrowed(input)
    }
}

/// Returns true if `input` matches the base64 alphabet and padding rules.
///
/// Line breaks are ignored, since exports often wrap long blobs.
#[must_use]
pub fn looks_like_base64(input: &str) -> bool {
    let compact = strip_whitespace(input);
    !compact.is_empty() && compact.len() % 4 == 0 && BASE64_PATTERN.is_match(&compact)
}

/// Decodes a base64 blob into raw bytes.
///
/// # Errors
///
/// Returns the underlying decode error when `input` is not valid base64.
pub fn decode_base64_bytes(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(strip_whitespace(input).as_bytes())
}

/// Decodes `input` if it looks like base64, otherwise returns it unchanged.
///
/// Bytes that are not valid UTF-8 are replaced lossily. A blob that passes
/// the character check but still fails to decode is returned unchanged.
#[must_use]
pub fn decode_if_base64(input: &str) -> Cow<'_, str> {
    if !looks_like_base64(input) {
        return Cow::Borrowed(input);
    }
    match decode_base64_bytes(input) {
        Ok(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
        Err(_) => Cow::Borrowed(input),
    }
}

/// Encodes bytes as standard padded base64.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
