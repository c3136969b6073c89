//! Verse corpus types
//!
//! A corpus is an ordered list of verse records whose position is the
//! contract with the vector index: mapping entry `i` describes index row `i`.
//! Records are built once at ingestion and never mutated afterwards.

use serde::{Deserialize, Serialize};

// ============================================================================
// VERSE RECORD
// ============================================================================

/// One verse of the corpus, with its full location metadata.
///
/// Serialized field names match the on-disk mapping artifact; `source_id`
/// keeps the original SQLite rowid under the `rowid` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseRecord {
    /// Row id in the source database
    #[serde(rename = "rowid")]
    pub source_id: i64,
    /// Short book code (e.g. "GEN")
    pub book: String,
    /// Numeric book identifier, shared by all verses of one book
    pub book_id: i64,
    /// Human-readable book title (e.g. "La Genèse")
    pub book_title: String,
    /// Chapter label; empty for non-chaptered content
    pub chapter: String,
    /// Numeric chapter identifier
    pub chapter_id: i64,
    /// Human-readable chapter title
    pub chapter_title: String,
    /// Verse label; empty for headings and front matter
    pub verse: String,
    /// Verse text, possibly containing embedded newlines
    pub text: String,
}

// ============================================================================
// DERIVED TYPES
// ============================================================================

/// A single search hit: display fields plus the normalized relevance score.
///
/// Carries the original verse text, not the newline-flattened form used
/// for model scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Book title of the matched verse
    pub book_title: String,
    /// Chapter label
    pub chapter: String,
    /// Verse label
    pub verse: String,
    /// Original verse text
    pub text: String,
    /// Normalized relevance score in [0, 1]
    pub score: f32,
}

impl SearchResult {
    /// Format a human-readable reference like "Jean 3:16".
    ///
    /// Chapter and verse are appended only when present, so headings
    /// render as the bare book title.
    pub fn reference(&self) -> String {
        let mut reference = self.book_title.clone();
        if !self.chapter.is_empty() {
            reference.push(' ');
            reference.push_str(&self.chapter);
        }
        if !self.verse.is_empty() {
            reference.push(':');
            reference.push_str(&self.verse);
        }
        reference
    }
}

/// One line of a context window around a matched verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Chapter label
    pub chapter: String,
    /// Verse label
    pub verse: String,
    /// Verse text
    pub text: String,
    /// True only for the matched verse itself
    pub is_match: bool,
}

// ============================================================================
// TESTS
// ============================================================================
