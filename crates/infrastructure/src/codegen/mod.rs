//! Command generation from captured requests.

mod curl;

pub use curl::{CurlOptions, to_curl};
