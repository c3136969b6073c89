//! # Concordia Core
//!
//! Semantic search engine for the French Bible (Segond 1910). Two-stage
//! retrieval over a fixed verse corpus:
//!
//! - **Semantic Embeddings**: Local fastembed (paraphrase-multilingual-MiniLM, 384 dimensions)
//! - **HNSW Vector Search**: USearch inner-product index over unit-length vectors
//! - **Cross-Encoder Reranking**: Jina reranker v2 rescores the candidate set
//! - **Score Normalization**: Sigmoid to [0, 1] with French relevance labels
//! - **Context Windows**: Surrounding verses, bounded to the matched book
//!
//! The corpus is ingested once from its SQLite source into a pair of on-disk
//! artifacts (HNSW index + JSON verse mapping); queries never touch the
//! database.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use concordia_core::{
//!     load_artifacts, ArtifactPaths, FastembedEncoder, FastembedReranker,
//!     SearchPipeline, VerseIndexConfig,
//! };
//!
//! let paths = ArtifactPaths::in_dir(data_dir, "bible");
//! let (index, mapping) = load_artifacts(&paths, VerseIndexConfig::default())?;
//!
//! let pipeline = SearchPipeline::new(
//!     FastembedEncoder::new()?,
//!     FastembedReranker::new()?,
//!     index,
//!     mapping,
//! );
//!
//! // Top 5 verses for a natural-language query
//! let results = pipeline.search("le pardon et la miséricorde", 20, 5)?;
//! for result in &results {
//!     println!("[{:.3}] {} {}", result.score, result.reference(), result.text);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `embeddings` (default): Local embedding and reranking models via fastembed
//! - `vector-search` (default): HNSW vector index, pipeline, and artifacts via USearch
//! - `bundled-sqlite` (default): Compile SQLite into the binary
//! - `full`: `embeddings` + `vector-search`

#![cfg_attr(docsrs, feature(doc_cfg))]
// Only warn about missing docs for public items exported from the crate root
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod corpus;
pub mod embeddings;
pub mod ingest;
pub mod search;

#[cfg(feature = "vector-search")]
#[cfg_attr(docsrs, doc(cfg(feature = "vector-search")))]
pub mod artifacts;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Corpus types
pub use corpus::{
    expand_context, ContextEntry, SearchResult, VerseMapping, VerseRecord,
    DEFAULT_CONTEXT_RADIUS,
};

// Embedding layer
pub use embeddings::{l2_normalize, EmbeddingError, TextEncoder};

#[cfg(feature = "embeddings")]
pub use embeddings::{EncoderConfig, FastembedEncoder, BATCH_SIZE};

// Search layer
pub use search::{
    normalize_scores, relevance_label, sigmoid, LexicalScorer, RelevanceScorer, RerankerError,
    RELEVANCE_THRESHOLD, SCORE_LABELS,
};

#[cfg(feature = "embeddings")]
pub use search::FastembedReranker;

#[cfg(feature = "vector-search")]
pub use search::{
    PipelineConfig, PipelineError, SearchPipeline, VectorSearchError, VerseIndex,
    VerseIndexConfig, VerseIndexStats, DEFAULT_INDEX_TOP_K, DEFAULT_RERANK_TOP_K,
};

// Artifacts
#[cfg(feature = "vector-search")]
pub use artifacts::{
    artifact_stats, load_artifacts, save_artifacts, ArtifactError, ArtifactPaths,
};

// Ingestion
pub use ingest::{
    fetch_verses, filter_verses, IngestConfig, IngestError, IngestReport, MIN_TEXT_LENGTH,
    MIN_WORD_COUNT,
};

#[cfg(feature = "vector-search")]
pub use ingest::{build_index, run_ingest};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default corpus artifact stem inside a data directory
pub const DEFAULT_CORPUS_STEM: &str = "bible";

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        expand_context, relevance_label, ContextEntry, IngestConfig, SearchResult, TextEncoder,
        VerseMapping, VerseRecord,
    };

    #[cfg(feature = "embeddings")]
    pub use crate::{FastembedEncoder, FastembedReranker};

    #[cfg(feature = "vector-search")]
    pub use crate::{
        load_artifacts, run_ingest, ArtifactPaths, PipelineConfig, SearchPipeline, VerseIndex,
        VerseIndexConfig,
    };
}
