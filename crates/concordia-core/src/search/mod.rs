//! Search Module
//!
//! Two-stage semantic retrieval:
//! - Candidate generation with HNSW vector search (USearch)
//! - Cross-encoder reranking of candidates for precision
//! - Sigmoid score normalization and relevance labeling

mod reranker;
mod score;

#[cfg(feature = "vector-search")]
mod pipeline;
#[cfg(feature = "vector-search")]
mod vector;

pub use reranker::{LexicalScorer, RelevanceScorer, RerankerError};

#[cfg(feature = "embeddings")]
pub use reranker::FastembedReranker;

pub use score::{
    normalize_scores, relevance_label, sigmoid, RELEVANCE_THRESHOLD, SCORE_LABELS,
};

#[cfg(feature = "vector-search")]
pub use vector::{
    VectorSearchError, VerseIndex, VerseIndexConfig, VerseIndexStats, DEFAULT_CONNECTIVITY,
    DEFAULT_DIMENSIONS, DEFAULT_EXPANSION_ADD, DEFAULT_EXPANSION_SEARCH,
};

#[cfg(feature = "vector-search")]
pub use pipeline::{
    PipelineConfig, PipelineError, SearchPipeline, DEFAULT_INDEX_TOP_K, DEFAULT_QUERY_CACHE_SIZE,
    DEFAULT_RERANK_TOP_K,
};
