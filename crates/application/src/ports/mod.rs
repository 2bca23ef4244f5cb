//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod capture_decoder;
mod capture_source;

pub use capture_decoder::CaptureDecoder;
pub use capture_source::{CaptureFile, CaptureSource, CaptureSourceError};
