//! Search engine: substring filter, fuzzy ranking and query debouncing.

mod debounce;
mod filter;
mod fuzzy;
mod projection;
mod worker;

pub use debounce::debounce;
pub use filter::{SearchFilter, entry_matches};
pub use fuzzy::{FuzzyMatcher, IndexedDocument, RankedHit};
pub use projection::{FieldKind, SearchDocument, SearchField, project_session};
pub use worker::{FuzzySearch, SearchCommand, SearchReply};
