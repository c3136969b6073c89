//! Context expansion around a matched verse
//!
//! Builds a small reading window for display: up to `radius` verses on each
//! side of a match, clamped to the edges of the mapping and never crossing
//! into another book.

use super::mapping::VerseMapping;
use super::verse::{ContextEntry, SearchResult};

/// Default number of verses shown on each side of a match
pub const DEFAULT_CONTEXT_RADIUS: usize = 2;

/// Expand a matched verse into its surrounding context window.
///
/// The window covers at most `radius` verses before and after the match,
/// bounded by the mapping edges and by `book_id` (a window never spans two
/// books). Exactly one entry is flagged `is_match`.
///
/// A result whose `(book_title, chapter, verse)` key is not in the mapping
/// yields a single-entry window holding the result itself.
pub fn expand_context(
    mapping: &VerseMapping,
    result: &SearchResult,
    radius: usize,
) -> Vec<ContextEntry> {
    let anchor = mapping
        .position_of(&result.book_title, &result.chapter, &result.verse)
        .and_then(|position| mapping.get(position).map(|record| (position, record)));

    let Some((position, matched)) = anchor else {
        return vec![ContextEntry {
            chapter: result.chapter.clone(),
            verse: result.verse.clone(),
            text: result.text.clone(),
            is_match: true,
        }];
    };

    let records = mapping.records();
    let book_id = matched.book_id;

    let mut start = position;
    while start > 0 && position - start < radius && records[start - 1].book_id == book_id {
        start -= 1;
    }

    let mut end = position;
    while end + 1 < records.len() && end - position < radius && records[end + 1].book_id == book_id
    {
        end += 1;
    }

    records[start..=end]
        .iter()
        .enumerate()
        .map(|(offset, record)| ContextEntry {
            chapter: record.chapter.clone(),
            verse: record.verse.clone(),
            text: record.text.clone(),
            is_match: start + offset == position,
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
