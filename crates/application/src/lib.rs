//! Capview Application - Use cases and search engine
//!
//! This crate holds the ports implemented by the infrastructure layer, the
//! session loading use case and the search engine (substring filter, fuzzy
//! ranking worker and query debouncing).

pub mod error;
pub mod ports;
pub mod search;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{CaptureDecoder, CaptureFile, CaptureSource, CaptureSourceError};
pub use search::{
    FieldKind, FuzzyMatcher, FuzzySearch, RankedHit, SearchDocument, SearchField, SearchFilter,
    debounce, entry_matches, project_session,
};
pub use use_cases::{LoadSession, LoadSessionOutput};
