//! Session container and selection bookkeeping.
//!
//! A [`Session`] is built once per loaded file and replaced wholesale when
//! another file is loaded. Entries never change after decoding; only the
//! annotation store is mutated, through [`Session::set_highlight`] and
//! [`Session::set_comment`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::annotation::{Annotation, AnnotationStore, HighlightColor};
use crate::entry::{Entry, SourceFormat};
use crate::error::DecodeWarning;
use crate::id::EntryId;

/// Set of selected entries, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<EntryId>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry to the selection.
    pub fn select(&mut self, id: EntryId) {
        self.ids.insert(id);
    }

    /// Removes an entry from the selection.
    pub fn deselect(&mut self, id: &EntryId) {
        self.ids.remove(id);
    }

    /// Flips the membership of an entry. Returns true if it is now selected.
    pub fn toggle(&mut self, id: &EntryId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns true if the entry is selected.
    #[must_use]
    pub fn contains(&self, id: &EntryId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over selected ids.
    pub fn iter(&self) -> impl Iterator<Item = &EntryId> {
        self.ids.iter()
    }
}

impl FromIterator<EntryId> for Selection {
    fn from_iter<T: IntoIterator<Item = EntryId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// All entries loaded from one capture file.
#[derive(Debug, Clone)]
pub struct Session {
    /// Display name (file name or exporting tool).
    pub name: String,
    /// Source format of the file.
    pub format: SourceFormat,
    /// Export timestamp recorded by the exporting tool, if any.
    pub exported_at: Option<String>,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
    entries: Vec<Entry>,
    annotations: AnnotationStore,
    warnings: Vec<DecodeWarning>,
}

impl Session {
    /// Creates a session from decoded entries.
    #[must_use]
    pub fn new(name: impl Into<String>, format: SourceFormat, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            format,
            exported_at: None,
            loaded_at: Utc::now(),
            entries,
            annotations: AnnotationStore::new(),
            warnings: Vec::new(),
        }
    }

    /// Sets the export timestamp.
    #[must_use]
    pub fn with_exported_at(mut self, exported_at: Option<String>) -> Self {
        self.exported_at = exported_at;
        self
    }

    /// Attaches the warnings recorded while decoding.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<DecodeWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Entries in source order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the session has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Looks up an entry by position.
    #[must_use]
    pub fn entry_at(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Per-field problems recovered during decoding.
    #[must_use]
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Annotation store.
    #[must_use]
    pub const fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    /// Annotation of one entry, defaulted when absent.
    #[must_use]
    pub fn annotation(&self, id: &EntryId) -> Annotation {
        self.annotations.get(id).cloned().unwrap_or_default()
    }

    /// Sets the highlight of `target`, or of the whole selection when
    /// `target` is part of it. Returns the number of entries updated.
    pub fn set_highlight(
        &mut self,
        target: &EntryId,
        color: Option<HighlightColor>,
        selection: &Selection,
    ) -> usize {
        let ids = self.edit_targets(target, selection);
        for id in &ids {
            self.annotations.set_highlight(id, color);
        }
        ids.len()
    }

    /// Sets the comment of `target`, or of the whole selection when
    /// `target` is part of it. Returns the number of entries updated.
    pub fn set_comment(&mut self, target: &EntryId, comment: &str, selection: &Selection) -> usize {
        let ids = self.edit_targets(target, selection);
        for id in &ids {
            self.annotations.set_comment(id, comment);
        }
        ids.len()
    }

    fn edit_targets(&self, target: &EntryId, selection: &Selection) -> Vec<EntryId> {
        if self.entry(target).is_none() {
            return Vec::new();
        }
        if selection.contains(target) {
            selection
                .iter()
                .filter(|id| self.entry(id).is_some())
                .cloned()
                .collect()
        } else {
            vec![target.clone()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::PlaceholderKind;
    use pretty_assertions::assert_eq;

    fn session_of(count: usize) -> Session {
        let entries = (0..count)
            .map(|i| Entry::placeholder(i, format!("t{i}"), PlaceholderKind::Unknown))
            .collect();
        Session::new("test", SourceFormat::Har, entries)
    }

    fn id_at(session: &Session, index: usize) -> EntryId {
        session.entries()[index].id.clone()
    }

    #[test]
    fn test_single_edit_outside_selection() {
        let mut session = session_of(3);
        let target = id_at(&session, 0);
        let selection: Selection = [id_at(&session, 1), id_at(&session, 2)].into_iter().collect();

        let updated = session.set_highlight(&target, Some(HighlightColor::Red), &selection);

        assert_eq!(updated, 1);
        assert_eq!(session.annotations().highlight(&target), Some(HighlightColor::Red));
        assert_eq!(session.annotations().highlight(&id_at(&session, 1)), None);
    }

    #[test]
    fn test_bulk_edit_inside_selection() {
        let mut session = session_of(3);
        let selection: Selection = [id_at(&session, 0), id_at(&session, 2)].into_iter().collect();
        let target = id_at(&session, 2);

        let updated = session.set_comment(&target, "suspicious", &selection);

        assert_eq!(updated, 2);
        assert_eq!(session.annotation(&id_at(&session, 0)).comment, "suspicious");
        assert_eq!(session.annotation(&id_at(&session, 1)).comment, "");
        assert_eq!(session.annotation(&id_at(&session, 2)).comment, "suspicious");
    }

    #[test]
    fn test_last_write_wins() {
        let mut session = session_of(1);
        let target = id_at(&session, 0);
        let selection = Selection::new();

        session.set_highlight(&target, Some(HighlightColor::Blue), &selection);
        session.set_highlight(&target, Some(HighlightColor::Pink), &selection);

        assert_eq!(session.annotation(&target).highlight, Some(HighlightColor::Pink));
    }

    #[test]
    fn test_unknown_entry_is_noop() {
        let mut session = session_of(1);
        let updated = session.set_comment(&EntryId::from("missing"), "x", &Selection::new());
        assert_eq!(updated, 0);
        assert!(session.annotations().is_empty());
    }

    #[test]
    fn test_selection_toggle() {
        let mut selection = Selection::new();
        let id = EntryId::from("a");
        assert!(selection.toggle(&id));
        assert!(selection.contains(&id));
        assert!(!selection.toggle(&id));
        assert!(selection.is_empty());
    }
}
