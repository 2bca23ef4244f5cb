//! Typo-tolerant ranking of search documents.

use std::cmp::Ordering;

use capview_domain::EntryId;
use serde::{Deserialize, Serialize};

use super::projection::{FieldKind, SearchDocument};

/// A ranked fuzzy search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    /// Matching entry.
    pub entry_id: EntryId,
    /// Position of the entry in the session.
    pub index: usize,
    /// Relevance in `0.0..=1.0`.
    pub score: f64,
}

/// A document with its fields lowercased once, up front.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    entry_id: EntryId,
    index: usize,
    fields: Vec<(FieldKind, String)>,
}

impl From<SearchDocument> for IndexedDocument {
    fn from(document: SearchDocument) -> Self {
        Self {
            entry_id: document.entry_id,
            index: document.index,
            fields: document
                .fields
                .into_iter()
                .map(|f| (f.kind, f.text.to_lowercase()))
                .collect(),
        }
    }
}

/// Scores documents against a query.
///
/// Every query term has to match some field, either as a substring (full
/// score) or as a word whose Jaro-Winkler similarity reaches the threshold.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    /// Creates a matcher with the given similarity threshold.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Scores one document, `None` when some term does not match.
    #[must_use]
    pub fn score(&self, document: &IndexedDocument, terms: &[String]) -> Option<f64> {
        if terms.is_empty() {
            return None;
        }
        let mut total = 0.0;
        for term in terms {
            total += self.best_term_score(document, term)?;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(total / terms.len() as f64)
    }

    fn best_term_score(&self, document: &IndexedDocument, term: &str) -> Option<f64> {
        document
            .fields
            .iter()
            .filter_map(|(kind, text)| {
                let similarity = if text.contains(term) {
                    1.0
                } else {
                    text.split(|c: char| !c.is_alphanumeric())
                        .filter(|word| !word.is_empty())
                        .map(|word| strsim::jaro_winkler(term, word))
                        .fold(0.0_f64, f64::max)
                };
                (similarity >= self.threshold).then(|| similarity * kind.weight())
            })
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    /// Ranks `documents` against `query`, best first, ties in session order.
    #[must_use]
    pub fn rank(&self, documents: &[IndexedDocument], query: &str, limit: usize) -> Vec<RankedHit> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

        let mut hits: Vec<RankedHit> = documents
            .iter()
            .filter_map(|doc| {
                self.score(doc, &terms).map(|score| RankedHit {
                    entry_id: doc.entry_id.clone(),
                    index: doc.index,
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        hits.truncate(limit);
        hits
    }
}
