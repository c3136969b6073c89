//! Two-stage retrieval pipeline
//!
//! Stage 1 narrows the corpus with approximate nearest-neighbor search over
//! verse embeddings; stage 2 rescores the survivors with a pairwise
//! relevance model. Final scores are sigmoid-normalized to [0, 1].
//!
//! The pipeline owns loaded artifacts plus the two model capabilities and
//! is shared read-only; one instance serves any number of queries.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::corpus::{expand_context, ContextEntry, SearchResult, VerseMapping, VerseRecord};
use crate::embeddings::{EmbeddingError, TextEncoder};
use crate::search::reranker::{RelevanceScorer, RerankerError};
use crate::search::score::normalize_scores;
use crate::search::vector::{VectorSearchError, VerseIndex};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default number of candidates fetched from the vector index
pub const DEFAULT_INDEX_TOP_K: usize = 20;

/// Default number of results returned after reranking
pub const DEFAULT_RERANK_TOP_K: usize = 5;

/// Default capacity of the query embedding cache
pub const DEFAULT_QUERY_CACHE_SIZE: usize = 100;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Pipeline error type. Capability failures bubble up unmodified.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Query embedding failed
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    /// Candidate scoring failed
    #[error("relevance scoring failed: {0}")]
    Scoring(#[from] RerankerError),
    /// Vector index lookup failed
    #[error("vector search failed: {0}")]
    Index(#[from] VectorSearchError),
    /// Encoder violated its one-vector-per-text contract
    #[error("encoder returned {got} vectors for {expected} texts")]
    VectorCount { expected: usize, got: usize },
    /// Scorer violated its one-score-per-pair contract
    #[error("scorer returned {got} scores for {expected} candidates")]
    ScoreCount { expected: usize, got: usize },
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the retrieval pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Prefix prepended to every query before embedding and scoring
    /// (empty for MiniLM, "query: " for E5-style models)
    pub query_prefix: String,
    /// Capacity of the query embedding cache
    pub cache_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            query_prefix: String::new(),
            cache_size: DEFAULT_QUERY_CACHE_SIZE,
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Two-stage search over an ingested verse corpus.
///
/// Generic over the embedding and scoring capabilities so tests can inject
/// deterministic stand-ins.
pub struct SearchPipeline<E, R> {
    encoder: E,
    scorer: R,
    index: VerseIndex,
    mapping: VerseMapping,
    query_prefix: String,
    /// Re-embedding the same query is pure, so cache hits are observably
    /// identical to misses
    query_cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl<E, R> SearchPipeline<E, R>
where
    E: TextEncoder,
    R: RelevanceScorer,
{
    /// Build a pipeline with the default configuration.
    pub fn new(encoder: E, scorer: R, index: VerseIndex, mapping: VerseMapping) -> Self {
        Self::with_config(encoder, scorer, index, mapping, PipelineConfig::default())
    }

    /// Build a pipeline with a custom configuration.
    ///
    /// The loader rejects misaligned artifacts outright; parts assembled by
    /// hand are accepted here, and index rows without a mapping entry are
    /// dropped per query.
    pub fn with_config(
        encoder: E,
        scorer: R,
        index: VerseIndex,
        mapping: VerseMapping,
        config: PipelineConfig,
    ) -> Self {
        if index.len() != mapping.len() {
            tracing::warn!(
                index = index.len(),
                mapping = mapping.len(),
                "index and mapping sizes differ; unmapped rows will be dropped"
            );
        }

        let cache_size = NonZeroUsize::new(config.cache_size).unwrap_or(NonZeroUsize::MIN);

        Self {
            encoder,
            scorer,
            index,
            mapping,
            query_prefix: config.query_prefix,
            query_cache: Mutex::new(LruCache::new(cache_size)),
        }
    }

    /// Number of searchable verses
    pub fn verse_count(&self) -> usize {
        self.mapping.len()
    }

    /// The verse mapping backing this pipeline
    pub fn mapping(&self) -> &VerseMapping {
        &self.mapping
    }

    /// Run a query through both retrieval stages.
    ///
    /// The query gets the configured prefix, then embedded newlines become
    /// spaces; that transformed string is used for both embedding and pair
    /// scoring. `index_top_k` bounds the stage-1 candidate set,
    /// `rerank_top_k` the final result count; the two are independent.
    ///
    /// Results are sorted by normalized score descending. The sort is
    /// stable: equal scores keep their stage-1 candidate order. Returned
    /// texts are the original verse texts, not the flattened scoring form.
    ///
    /// An empty index or an all-out-of-range candidate set yields an empty
    /// result, never an error.
    pub fn search(
        &self,
        query: &str,
        index_top_k: usize,
        rerank_top_k: usize,
    ) -> Result<Vec<SearchResult>, PipelineError> {
        let prefixed = format!("{}{}", self.query_prefix, query);
        let cleaned = prefixed.replace('\n', " ");

        let query_embedding = self.query_embedding(&cleaned)?;
        let matches = self.index.candidates(&query_embedding, index_top_k)?;

        let mut candidates: Vec<&VerseRecord> = Vec::with_capacity(matches.len());
        for (position, _) in matches {
            match self.mapping.get(position) {
                Some(record) => candidates.push(record),
                None => tracing::debug!(position, "index row has no mapping entry, dropped"),
            }
        }

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let flattened: Vec<String> = candidates
            .iter()
            .map(|record| record.text.replace('\n', " "))
            .collect();
        let texts: Vec<&str> = flattened.iter().map(String::as_str).collect();

        let raw_scores = self.scorer.predict(&cleaned, &texts)?;
        if raw_scores.len() != candidates.len() {
            return Err(PipelineError::ScoreCount {
                expected: candidates.len(),
                got: raw_scores.len(),
            });
        }
        let scores = normalize_scores(&raw_scores);

        let mut results: Vec<SearchResult> = candidates
            .iter()
            .zip(scores.iter())
            .map(|(record, &score)| SearchResult {
                book_title: record.book_title.clone(),
                chapter: record.chapter.clone(),
                verse: record.verse.clone(),
                text: record.text.clone(),
                score,
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(rerank_top_k);

        tracing::debug!(results = results.len(), "search complete");
        Ok(results)
    }

    /// Context window around a search hit, bounded to its book.
    pub fn context(&self, result: &SearchResult, radius: usize) -> Vec<ContextEntry> {
        expand_context(&self.mapping, result, radius)
    }

    /// Embed the transformed query, memoized across repeated queries.
    fn query_embedding(&self, cleaned: &str) -> Result<Vec<f32>, PipelineError> {
        if let Ok(mut cache) = self.query_cache.lock() {
            if let Some(hit) = cache.get(cleaned) {
                return Ok(hit.clone());
            }
        }

        let mut vectors = self.encoder.encode(&[cleaned])?;
        if vectors.len() != 1 {
            return Err(PipelineError::VectorCount {
                expected: 1,
                got: vectors.len(),
            });
        }
        let embedding = vectors.remove(0);

        if let Ok(mut cache) = self.query_cache.lock() {
            cache.put(cleaned.to_string(), embedding.clone());
        }

        Ok(embedding)
    }
}

// ============================================================================
// TESTS
// ============================================================================
