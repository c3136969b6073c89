//! Corpus ingestion: fetch, filter, embed, index
//!
//! Reads the verse corpus from its SQLite source, drops non-content rows
//! (headings, front matter) with a length and word-count filter, embeds
//! the survivors, and persists the index/mapping artifact pair.
//!
//! Ingestion is a rebuild-from-scratch operation; there is no incremental
//! update path.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::corpus::VerseRecord;
use crate::embeddings::EmbeddingError;

#[cfg(feature = "vector-search")]
use crate::artifacts::{save_artifacts, ArtifactError, ArtifactPaths};
#[cfg(feature = "vector-search")]
use crate::corpus::VerseMapping;
#[cfg(feature = "vector-search")]
use crate::embeddings::TextEncoder;
#[cfg(feature = "vector-search")]
use crate::search::{VectorSearchError, VerseIndex, VerseIndexConfig};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum verse length in characters; shorter rows are structural noise
pub const MIN_TEXT_LENGTH: usize = 10;

/// Minimum word count; single-word rows are headings or numbering
pub const MIN_WORD_COUNT: usize = 3;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Ingestion error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Embedding error
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    /// Encoder violated its one-vector-per-text contract
    #[error("encoder returned {got} vectors for {expected} texts")]
    VectorCount { expected: usize, got: usize },
    /// Index error
    #[cfg(feature = "vector-search")]
    #[error("Index error: {0}")]
    Index(#[from] VectorSearchError),
    /// Artifact error
    #[cfg(feature = "vector-search")]
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
    /// Every row was filtered out
    #[error("no verses survived filtering; nothing to index")]
    EmptyCorpus,
}

/// Ingestion result type
pub type Result<T> = std::result::Result<T, IngestError>;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for corpus ingestion
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Minimum verse length in characters
    pub min_text_length: usize,
    /// Minimum word count
    pub min_word_count: usize,
    /// Prefix prepended to every passage before embedding
    /// (empty for MiniLM, "passage: " for E5-style models)
    pub passage_prefix: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_text_length: MIN_TEXT_LENGTH,
            min_word_count: MIN_WORD_COUNT,
            passage_prefix: String::new(),
        }
    }
}

/// Outcome of a completed ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct IngestReport {
    /// Rows fetched from the source database
    pub fetched: usize,
    /// Rows that survived filtering and were indexed
    pub indexed: usize,
}

// ============================================================================
// FETCH / FILTER
// ============================================================================

/// Read a column as text whatever its declared SQLite type.
///
/// The corpus database stores chapter and verse labels as INTEGER in some
/// editions and TEXT in others.
fn text_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<String> {
    use rusqlite::types::ValueRef;

    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}

/// Fetch every verse row from the source database, in rowid order.
pub fn fetch_verses(db_path: &Path) -> Result<Vec<VerseRecord>> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let mut stmt = conn.prepare(
        "SELECT rowid, book, book_id, book_title, chapter, chapter_id, \
         chapter_title, verse, text FROM verses",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(VerseRecord {
            source_id: row.get(0)?,
            book: text_column(row, 1)?,
            book_id: row.get(2)?,
            book_title: text_column(row, 3)?,
            chapter: text_column(row, 4)?,
            chapter_id: row.get(5)?,
            chapter_title: text_column(row, 6)?,
            verse: text_column(row, 7)?,
            text: text_column(row, 8)?,
        })
    })?;

    let verses = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    tracing::debug!(rows = verses.len(), "verses fetched");
    Ok(verses)
}

/// Drop non-content rows.
///
/// Keeps verses whose text has at least `min_text_length` characters and
/// `min_word_count` whitespace-separated words. Text is not trimmed first;
/// the thresholds apply to the stored form.
pub fn filter_verses(verses: Vec<VerseRecord>, config: &IngestConfig) -> Vec<VerseRecord> {
    verses
        .into_iter()
        .filter(|v| {
            v.text.chars().count() >= config.min_text_length
                && v.text.split_whitespace().count() >= config.min_word_count
        })
        .collect()
}

// ============================================================================
// INDEX BUILD
// ============================================================================

/// Embed every verse and build the vector index.
///
/// Index row `i` holds the embedding of `records[i]`; the caller builds the
/// mapping from the same slice so the positional contract holds.
#[cfg(feature = "vector-search")]
pub fn build_index<E: TextEncoder>(
    encoder: &E,
    records: &[VerseRecord],
    config: &IngestConfig,
) -> Result<VerseIndex> {
    let mut index =
        VerseIndex::with_config(VerseIndexConfig::with_dimensions(encoder.dimensions()))?;
    index.reserve(records.len())?;

    let passages: Vec<String> = records
        .iter()
        .map(|r| format!("{}{}", config.passage_prefix, r.text.replace('\n', " ")))
        .collect();
    let texts: Vec<&str> = passages.iter().map(String::as_str).collect();

    let vectors = encoder.encode(&texts)?;
    if vectors.len() != records.len() {
        return Err(IngestError::VectorCount {
            expected: records.len(),
            got: vectors.len(),
        });
    }

    for (position, vector) in vectors.iter().enumerate() {
        index.add(position, vector)?;
    }

    Ok(index)
}

/// Run the full ingestion: fetch, filter, embed, index, persist.
#[cfg(feature = "vector-search")]
pub fn run_ingest<E: TextEncoder>(
    db_path: &Path,
    encoder: &E,
    paths: &ArtifactPaths,
    config: &IngestConfig,
) -> Result<IngestReport> {
    let fetched = fetch_verses(db_path)?;
    let total = fetched.len();

    let kept = filter_verses(fetched, config);
    tracing::info!(
        fetched = total,
        kept = kept.len(),
        dropped = total - kept.len(),
        "corpus filtered"
    );

    if kept.is_empty() {
        return Err(IngestError::EmptyCorpus);
    }

    let index = build_index(encoder, &kept, config)?;
    let mapping = VerseMapping::from_records(kept);
    save_artifacts(&index, &mapping, paths)?;

    Ok(IngestReport {
        fetched: total,
        indexed: mapping.len(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
