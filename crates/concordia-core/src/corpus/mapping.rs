//! Verse mapping and reverse lookup
//!
//! The mapping is the position-aligned metadata companion of the vector
//! index. A reverse index from `(book_title, chapter, verse)` to position
//! is built once at construction for context lookups; it is never updated
//! incrementally.

use std::collections::HashMap;

use super::verse::VerseRecord;

/// Ordered verse records plus the derived reverse index.
#[derive(Debug, Clone, Default)]
pub struct VerseMapping {
    records: Vec<VerseRecord>,
    reverse: HashMap<(String, String, String), usize>,
}

impl VerseMapping {
    /// Build a mapping from ordered records.
    ///
    /// When two records share the same `(book_title, chapter, verse)` key,
    /// the later position wins in the reverse index.
    pub fn from_records(records: Vec<VerseRecord>) -> Self {
        let mut reverse = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            reverse.insert(
                (
                    record.book_title.clone(),
                    record.chapter.clone(),
                    record.verse.clone(),
                ),
                position,
            );
        }
        Self { records, reverse }
    }

    /// Number of verses in the mapping
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at the given position, if in range
    pub fn get(&self, position: usize) -> Option<&VerseRecord> {
        self.records.get(position)
    }

    /// All records in index order
    pub fn records(&self) -> &[VerseRecord] {
        &self.records
    }

    /// Position of a verse by its `(book_title, chapter, verse)` key
    pub fn position_of(&self, book_title: &str, chapter: &str, verse: &str) -> Option<usize> {
        self.reverse
            .get(&(
                book_title.to_string(),
                chapter.to_string(),
                verse.to_string(),
            ))
            .copied()
    }

    /// Number of distinct books in the corpus
    pub fn book_count(&self) -> usize {
        let mut book_ids: Vec<i64> = self.records.iter().map(|r| r.book_id).collect();
        book_ids.sort_unstable();
        book_ids.dedup();
        book_ids.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
