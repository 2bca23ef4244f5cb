//! HTTP message reconstruction.
//!
//! This module provides:
//! - Head/body splitting and origin stripping for request lines
//! - Content language detection and beautifying
//! - Multi-payload body splitting

mod content;
mod message;
mod payload;

pub use content::{beautify, detect_language, sniff_language};
pub use message::{
    ReconstructedExchange, RenderOptions, RenderedMessage, split_message, strip_origin,
};
pub use payload::split_payloads;
