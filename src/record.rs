//! Term records and the non-empty list the extractor hands back.
//!
//! A [`TermRecord`] is an immutable `term`/`explanation` pair. Each one also
//! carries a [`RecordId`] minted at construction so that list owners (the UI,
//! the [`SavedTermsStore`](crate::store::SavedTermsStore)) can remove a
//! specific entry. The id never takes part in equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use uuid::Uuid;

/// Opaque identity token for a [`TermRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Mint a fresh, random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A single explained term.
///
/// Serializes as `{"term": ..., "explanation": ...}`. Deserializing assigns a
/// new [`RecordId`].
///
/// # Example
///
/// ```
/// use term_extractor::TermRecord;
///
/// let a = TermRecord::new("LLM", "Large Language Model.");
/// let b = TermRecord::new("LLM", "Large Language Model.");
/// assert_eq!(a, b);
/// assert_ne!(a.id(), b.id());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRecord {
    #[serde(skip, default = "RecordId::generate")]
    id: RecordId,
    term: String,
    explanation: String,
}

impl TermRecord {
    pub fn new(term: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            term: term.into(),
            explanation: explanation.into(),
        }
    }

    /// Build a record from raw fragments, trimming both sides.
    ///
    /// Returns `None` when either side is empty after trimming.
    pub(crate) fn from_parts(term: &str, explanation: &str) -> Option<Self> {
        let term = term.trim();
        let explanation = explanation.trim();
        if term.is_empty() || explanation.is_empty() {
            return None;
        }
        Some(Self::new(term, explanation))
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

impl PartialEq for TermRecord {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term && self.explanation == other.explanation
    }
}

impl Eq for TermRecord {}

/// An ordered sequence of [`TermRecord`]s that is never empty.
///
/// The only constructors are [`TermList::single`] and
/// [`TermList::from_vec`], and no method removes elements, so every value of
/// this type holds at least one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TermRecord>", into = "Vec<TermRecord>")]
pub struct TermList(Vec<TermRecord>);

impl TermList {
    pub fn single(record: TermRecord) -> Self {
        Self(vec![record])
    }

    /// Wrap `records`, or return `None` if it is empty.
    pub fn from_vec(records: Vec<TermRecord>) -> Option<Self> {
        if records.is_empty() {
            None
        } else {
            Some(Self(records))
        }
    }

    /// The first record. Always present.
    pub fn first(&self) -> &TermRecord {
        &self.0[0]
    }

    pub fn into_vec(self) -> Vec<TermRecord> {
        self.0
    }
}

impl Deref for TermList {
    type Target = [TermRecord];

    fn deref(&self) -> &[TermRecord] {
        &self.0
    }
}

impl IntoIterator for TermList {
    type Item = TermRecord;
    type IntoIter = std::vec::IntoIter<TermRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TermList {
    type Item = &'a TermRecord;
    type IntoIter = std::slice::Iter<'a, TermRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TryFrom<Vec<TermRecord>> for TermList {
    type Error = &'static str;

    fn try_from(records: Vec<TermRecord>) -> std::result::Result<Self, Self::Error> {
        Self::from_vec(records).ok_or("term list must contain at least one record")
    }
}

impl From<TermList> for Vec<TermRecord> {
    fn from(list: TermList) -> Self {
        list.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_id() {
        let a = TermRecord::new("RAG", "Retrieval-augmented generation.");
        let b = TermRecord::new("RAG", "Retrieval-augmented generation.");
        assert_ne!(a.id(), b.id());
        assert_eq!(a, b);
    }

    #[test]
    fn clone_keeps_id() {
        let a = TermRecord::new("GPU", "Graphics processor.");
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn from_parts_trims_and_rejects_empty() {
        let r = TermRecord::from_parts("  LLM ", " A model. ").unwrap();
        assert_eq!(r.term(), "LLM");
        assert_eq!(r.explanation(), "A model.");
        assert!(TermRecord::from_parts("  ", "x").is_none());
        assert!(TermRecord::from_parts("x", "").is_none());
    }

    #[test]
    fn serializes_without_id() {
        let r = TermRecord::new("LLM", "A model.");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"term":"LLM","explanation":"A model."}"#);
    }

    #[test]
    fn deserialize_assigns_distinct_ids() {
        let json = r#"[{"term":"A","explanation":"x"},{"term":"A","explanation":"x"}]"#;
        let records: Vec<TermRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0], records[1]);
        assert_ne!(records[0].id(), records[1].id());
    }

    #[test]
    fn term_list_rejects_empty() {
        assert!(TermList::from_vec(Vec::new()).is_none());
        assert!(serde_json::from_str::<TermList>("[]").is_err());
    }

    #[test]
    fn term_list_preserves_order() {
        let list = TermList::from_vec(vec![
            TermRecord::new("B", "second letter"),
            TermRecord::new("A", "first letter"),
        ])
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.first().term(), "B");
        let terms: Vec<&str> = list.iter().map(|r| r.term()).collect();
        assert_eq!(terms, vec!["B", "A"]);
    }
}
