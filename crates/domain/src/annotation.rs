//! User annotations: highlight colors and comments.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::EntryId;

/// Highlight palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    /// Red.
    Red,
    /// Orange.
    Orange,
    /// Yellow.
    Yellow,
    /// Green.
    Green,
    /// Cyan.
    Cyan,
    /// Blue.
    Blue,
    /// Purple.
    Purple,
    /// Pink.
    Pink,
}

impl HighlightColor {
    /// Every color, in palette order.
    pub const ALL: [Self; 8] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Cyan,
        Self::Blue,
        Self::Purple,
        Self::Pink,
    ];

    /// Lowercase color name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Cyan => "cyan",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HighlightColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown highlight color: {s}"))
    }
}

/// Annotation attached to one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Highlight color, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightColor>,
    /// Free-form comment, may be empty.
    #[serde(default)]
    pub comment: String,
}

impl Annotation {
    /// Returns true when neither a highlight nor a comment is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.highlight.is_none() && self.comment.is_empty()
    }
}

/// Annotations of a session, keyed by entry id.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    items: HashMap<EntryId, Annotation>,
}

impl AnnotationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the annotation of an entry, or `None` if it was never annotated.
    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&Annotation> {
        self.items.get(id)
    }

    /// Returns the comment of an entry, empty if none.
    #[must_use]
    pub fn comment(&self, id: &EntryId) -> &str {
        self.items.get(id).map_or("", |a| a.comment.as_str())
    }

    /// Returns the highlight of an entry.
    #[must_use]
    pub fn highlight(&self, id: &EntryId) -> Option<HighlightColor> {
        self.items.get(id).and_then(|a| a.highlight)
    }

    /// Sets or clears the highlight of an entry.
    pub fn set_highlight(&mut self, id: &EntryId, color: Option<HighlightColor>) {
        self.items.entry(id.clone()).or_default().highlight = color;
        self.prune(id);
    }

    /// Replaces the comment of an entry.
    pub fn set_comment(&mut self, id: &EntryId, comment: &str) {
        comment.clone_into(&mut self.items.entry(id.clone()).or_default().comment);
        self.prune(id);
    }

    /// Number of annotated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no entry is annotated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn prune(&mut self, id: &EntryId) {
        if self.items.get(id).is_some_and(Annotation::is_empty) {
            self.items.remove(id);
        }
    }
}
