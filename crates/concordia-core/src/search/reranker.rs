//! Pairwise relevance scoring
//!
//! Second stage of retrieval: every `(query, candidate)` pair gets a raw
//! relevance score from a [`RelevanceScorer`]. Scores are unbounded logits;
//! the pipeline normalizes them with a sigmoid afterwards.
//!
//! Two implementations: a fastembed cross-encoder for production, and a
//! BM25-flavored lexical scorer that needs no model download.

use std::sync::Arc;

#[cfg(feature = "embeddings")]
use std::sync::Mutex;

#[cfg(feature = "embeddings")]
use fastembed::{RerankInitOptions, RerankerModel, TextRerank};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Reranker error types
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum RerankerError {
    /// Failed to initialize the reranker model
    ModelInit(String),
    /// Failed to score the batch
    ScoringFailed(String),
}

impl std::fmt::Display for RerankerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RerankerError::ModelInit(e) => write!(f, "Reranker initialization failed: {}", e),
            RerankerError::ScoringFailed(e) => write!(f, "Scoring failed: {}", e),
        }
    }
}

impl std::error::Error for RerankerError {}

// ============================================================================
// SCORER TRAIT
// ============================================================================

/// Capability to score `(query, text)` pairs for relevance.
///
/// Contract: exactly one raw score per input text, in input order. Scores
/// are unbounded (higher = more relevant); callers normalize them.
pub trait RelevanceScorer {
    /// Score every text against the query in one batched call.
    fn predict(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>, RerankerError>;
}

impl<T: RelevanceScorer + ?Sized> RelevanceScorer for Arc<T> {
    fn predict(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>, RerankerError> {
        (**self).predict(query, texts)
    }
}

// ============================================================================
// CROSS-ENCODER SCORER
// ============================================================================

/// Cross-encoder scorer backed by a local fastembed reranker model.
///
/// The default model is Jina Reranker v2 base (multilingual), which scores
/// French query/verse pairs. `rerank` needs `&mut self`, so the model sits
/// behind a `Mutex`.
#[cfg(feature = "embeddings")]
#[cfg_attr(docsrs, doc(cfg(feature = "embeddings")))]
pub struct FastembedReranker {
    model: Mutex<TextRerank>,
}

#[cfg(feature = "embeddings")]
impl FastembedReranker {
    /// Load the default multilingual cross-encoder.
    ///
    /// Downloads the model on first use. Call this at startup, not in
    /// tests or hot paths.
    pub fn new() -> Result<Self, RerankerError> {
        // Variant name spelled as fastembed exports it
        Self::with_model(RerankerModel::JINARerankerV2BaseMultiligual)
    }

    /// Load a specific fastembed reranker model.
    pub fn with_model(model: RerankerModel) -> Result<Self, RerankerError> {
        let cache_dir = crate::embeddings::model_cache_dir();
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            tracing::warn!("Failed to create cache directory {:?}: {}", cache_dir, e);
        }

        let options = RerankInitOptions::new(model)
            .with_show_download_progress(true)
            .with_cache_dir(cache_dir);

        let model =
            TextRerank::try_new(options).map_err(|e| RerankerError::ModelInit(e.to_string()))?;

        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

#[cfg(feature = "embeddings")]
impl RelevanceScorer for FastembedReranker {
    fn predict(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>, RerankerError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut model = self
            .model
            .lock()
            .map_err(|e| RerankerError::ScoringFailed(format!("Model lock poisoned: {}", e)))?;

        let reranked = model
            .rerank(query, texts, false, None)
            .map_err(|e| RerankerError::ScoringFailed(e.to_string()))?;

        // fastembed returns results sorted by score; restore input order
        let mut scores = vec![0.0_f32; texts.len()];
        for result in reranked {
            if let Some(slot) = scores.get_mut(result.index) {
                *slot = result.score;
            }
        }

        Ok(scores)
    }
}

// ============================================================================
// LEXICAL SCORER
// ============================================================================

/// BM25-inspired term overlap scorer.
///
/// Always available: no model files, deterministic. Scores are shifted so
/// that zero term overlap maps below the sigmoid midpoint after
/// normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

/// BM25 term frequency saturation
const K1: f32 = 1.2;
/// BM25 length normalization strength
const B: f32 = 0.75;
/// Typical verse length in characters
const AVG_DOC_LEN: f32 = 120.0;
/// Per-term overlap lives in [0, K1 + 1]; shift its midpoint to zero
const LOGIT_CENTER: f32 = 0.5;
/// Spread of the recentered logit
const LOGIT_SCALE: f32 = 4.0;

impl LexicalScorer {
    /// Create a lexical scorer.
    pub fn new() -> Self {
        Self
    }

    fn term_overlap(query: &str, document: &str) -> f32 {
        let query_lower = query.to_lowercase();
        let query_terms: Vec<&str> = query_lower.split_whitespace().collect();
        let doc_lower = document.to_lowercase();
        let doc_len = document.len() as f32;

        if doc_len == 0.0 || query_terms.is_empty() {
            return 0.0;
        }

        let mut score = 0.0;
        for term in &query_terms {
            let tf = doc_lower.matches(term).count() as f32;
            if tf > 0.0 {
                let numerator = tf * (K1 + 1.0);
                let denominator = tf + K1 * (1.0 - B + B * (doc_len / AVG_DOC_LEN));
                score += numerator / denominator;
            }
        }

        score / query_terms.len() as f32
    }
}

impl RelevanceScorer for LexicalScorer {
    fn predict(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>, RerankerError> {
        Ok(texts
            .iter()
            .map(|text| (Self::term_overlap(query, text) - LOGIT_CENTER) * LOGIT_SCALE)
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
