//! Application use cases (business logic orchestration).

mod load_session;

pub use load_session::*;
