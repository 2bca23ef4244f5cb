//! Capview Domain - Core capture types
//!
//! This crate defines the unified entry model shared by the HAR and Burp
//! decoders, the session container with its annotations, and the small
//! helpers every layer needs. All types here are pure Rust with no I/O.

pub mod annotation;
pub mod content;
pub mod cookie;
pub mod encoding;
pub mod entry;
pub mod error;
pub mod id;
pub mod session;
pub mod settings;
pub mod url;

pub use annotation::{Annotation, AnnotationStore, HighlightColor};
pub use content::ContentLanguage;
pub use cookie::join_set_cookies;
pub use entry::{
    BodyEncoding, BurpDetails, DecodedCache, Entry, EntryOrigin, HarDetails, Header, MessageBody,
    PlaceholderKind, RequestRecord, ResponseInfo, ResponseRecord, SourceFormat, entry_cookies,
    entry_id, entry_time, find_header, reason_phrase, response_info,
};
pub use error::{DecodeWarning, DecodeWarningKind, IngestError, IngestResult};
pub use id::{EntryId, generate_entry_id};
pub use session::{Selection, Session};
pub use settings::ViewerSettings;
pub use self::url::{UrlParts, parse_url, split_origin};
