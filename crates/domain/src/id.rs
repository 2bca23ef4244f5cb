//! ID generation utilities.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for entry ids so they never collide with other v5 UUIDs.
const ENTRY_NAMESPACE: Uuid = Uuid::from_u128(0x6a1c_2f0e_93b4_4d2a_8e57_0c4b_d1f3_a9e2);

/// Stable identifier of an entry within a session.
///
/// Derived from the entry's position and timestamp, so decoding the same
/// file twice yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Generates the entry id for the entry at `index` with the given timestamp.
#[must_use]
pub fn generate_entry_id(index: usize, timestamp: &str) -> EntryId {
    let name = format!("{index}:{timestamp}");
    EntryId(Uuid::new_v5(&ENTRY_NAMESPACE, name.as_bytes()).to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_entry_id_format() {
        let id = generate_entry_id(0, "2024-01-01T00:00:00Z");
        assert_eq!(id.as_str().len(), 36);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_generate_entry_id_is_stable() {
        let a = generate_entry_id(4, "2024-01-01T00:00:00Z");
        let b = generate_entry_id(4, "2024-01-01T00:00:00Z");
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_timestamp_different_index() {
        let a = generate_entry_id(0, "");
        let b = generate_entry_id(1, "");
        assert_ne!(a, b);
    }
}
