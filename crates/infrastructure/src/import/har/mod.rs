//! HAR (HTTP Archive) import.

mod decoder;
mod types;

pub use decoder::HarDecoder;
pub use types::{
    HarContent, HarCreator, HarEntry, HarHeader, HarPostData, HarRequest, HarResponse,
};
