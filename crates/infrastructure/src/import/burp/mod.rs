//! Burp Suite XML import.

mod decoder;
mod reader;

pub use decoder::BurpDecoder;
