//! Cookie extraction from captured responses.

use crate::entry::Header;

/// Iterates over the values of every `Set-Cookie` header, in order.
pub fn set_cookie_values(headers: &[Header]) -> impl Iterator<Item = &str> {
    headers
        .iter()
        .filter(|h| h.name.eq_ignore_ascii_case("set-cookie"))
        .map(|h| h.value.as_str())
}

/// Joins the first segment of every `Set-Cookie` header with `"; "`.
///
/// Attributes such as `Path` or `HttpOnly` are discarded.
#[must_use]
pub fn join_set_cookies(headers: &[Header]) -> String {
    set_cookie_values(headers)
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}
