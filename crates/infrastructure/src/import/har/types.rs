//! HAR 1.2 log types.
//!
//! Only the fields the viewer uses are declared. Every one of them is
//! read leniently: a missing, null or mistyped value becomes the field's
//! default instead of failing the entry. Required fields are checked on the
//! raw JSON beforehand.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};
use serde_json::Value;

/// Reads a field, falling back to its default on null or a type mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Name and version of the producing tool.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HarCreator {
    /// Tool name.
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    /// Tool version.
    #[serde(deserialize_with = "lenient")]
    pub version: String,
}

/// One request/response pair.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarEntry {
    /// Start time, ISO 8601.
    #[serde(deserialize_with = "lenient")]
    pub started_date_time: String,
    /// Total elapsed time in milliseconds.
    #[serde(deserialize_with = "lenient")]
    pub time: f64,
    /// The request.
    #[serde(deserialize_with = "lenient")]
    pub request: HarRequest,
    /// The response.
    #[serde(deserialize_with = "lenient")]
    pub response: HarResponse,
    /// Server IP address.
    #[serde(rename = "serverIPAddress", deserialize_with = "lenient")]
    pub server_ip_address: Option<String>,
}

/// A HAR request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarRequest {
    /// HTTP method.
    #[serde(deserialize_with = "lenient")]
    pub method: String,
    /// Absolute URL.
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    /// Protocol version, e.g. `HTTP/1.1`.
    #[serde(deserialize_with = "lenient")]
    pub http_version: String,
    /// Headers in wire order.
    #[serde(deserialize_with = "lenient")]
    pub headers: Vec<HarHeader>,
    /// Request body.
    #[serde(deserialize_with = "lenient")]
    pub post_data: Option<HarPostData>,
}

/// A HAR response.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarResponse {
    /// Status code.
    #[serde(deserialize_with = "lenient")]
    pub status: f64,
    /// Reason phrase.
    #[serde(deserialize_with = "lenient")]
    pub status_text: String,
    /// Protocol version.
    #[serde(deserialize_with = "lenient")]
    pub http_version: String,
    /// Headers in wire order.
    #[serde(deserialize_with = "lenient")]
    pub headers: Vec<HarHeader>,
    /// Response body.
    #[serde(deserialize_with = "lenient")]
    pub content: HarContent,
}

/// A header name/value pair.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HarHeader {
    /// Header name.
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    /// Header value.
    #[serde(deserialize_with = "lenient")]
    pub value: String,
}

/// Request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarPostData {
    /// MIME type of the body.
    #[serde(deserialize_with = "lenient")]
    pub mime_type: Option<String>,
    /// Body text.
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    /// Declared encoding, usually absent.
    #[serde(deserialize_with = "lenient")]
    pub encoding: Option<String>,
}

/// Response body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarContent {
    /// Body size in bytes. Absent or negative when unknown.
    #[serde(deserialize_with = "lenient")]
    pub size: Option<f64>,
    /// MIME type of the body.
    #[serde(deserialize_with = "lenient")]
    pub mime_type: Option<String>,
    /// Body text.
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    /// Declared encoding, usually absent.
    #[serde(deserialize_with = "lenient")]
    pub encoding: Option<String>,
}
