//! Adapters implementing application ports.

mod file_source;

pub use file_source::TokioFileSource;
