//! JSON serialization helpers.
//!
//! Pretty printing uses a configurable indent so every formatted body in
//! the viewer shares one style.

mod json;

pub use json::*;
