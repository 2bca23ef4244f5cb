//! Capview Infrastructure - Decoders and adapters
//!
//! This crate provides the HAR and Burp XML decoders behind the
//! [`CaptureDecoder`](capview_application::ports::CaptureDecoder) port, the
//! HTTP message reconstructor, curl export, settings loading and the file
//! system capture source.

pub mod adapters;
pub mod codegen;
pub mod config;
pub mod http;
pub mod import;
pub mod serialization;

pub use adapters::TokioFileSource;
pub use codegen::{CurlOptions, to_curl};
pub use self::config::{SettingsError, load_settings};
pub use http::{
    ReconstructedExchange, RenderOptions, RenderedMessage, beautify, detect_language,
    split_message, split_payloads, strip_origin,
};
pub use import::{
    BurpDecoder, CaptureIngestor, DetectedCapture, FormatDetector, HarDecoder, IngestConfig,
};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_compact, to_json_pretty,
};
