//! Text embedding capability
//!
//! The engine treats "turn text into a vector" as an opaque capability
//! behind the [`TextEncoder`] trait. The production implementation runs
//! fastembed locally (see [`FastembedEncoder`]); tests inject deterministic
//! encoders instead.

#[cfg(feature = "embeddings")]
#[cfg_attr(docsrs, doc(cfg(feature = "embeddings")))]
mod encoder;

#[cfg(feature = "embeddings")]
pub use encoder::{EncoderConfig, FastembedEncoder, BATCH_SIZE};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Embedding error types
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum EmbeddingError {
    /// Failed to initialize the embedding model
    ModelInit(String),
    /// Failed to encode text
    EncodingFailed(String),
    /// Invalid input
    InvalidInput(String),
}

impl std::fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingError::ModelInit(e) => write!(f, "Model initialization failed: {}", e),
            EmbeddingError::EncodingFailed(e) => write!(f, "Encoding failed: {}", e),
            EmbeddingError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
        }
    }
}

impl std::error::Error for EmbeddingError {}

// ============================================================================
// ENCODER TRAIT
// ============================================================================

/// Capability to embed texts as dense vectors.
///
/// Contract: one output vector per input text, in input order, and every
/// vector is L2-normalized to unit length (so inner product equals cosine
/// similarity). Implementations are responsible for their own batching.
pub trait TextEncoder {
    /// Encode a batch of texts into unit-length vectors.
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimensionality of the produced vectors.
    fn dimensions(&self) -> usize;
}

// ============================================================================
// VECTOR HELPERS
// ============================================================================

/// L2-normalize a vector to unit length. Zero vectors pass through unchanged.
#[inline]
pub fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

/// Cache directory for downloaded model files.
///
/// Uses the CONCORDIA_CACHE_PATH env var when set, otherwise the platform
/// cache directory.
#[cfg(feature = "embeddings")]
pub(crate) fn model_cache_dir() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("CONCORDIA_CACHE_PATH") {
        return std::path::PathBuf::from(path);
    }

    if let Some(proj_dirs) = directories::ProjectDirs::from("org", "concordia", "concordia") {
        return proj_dirs.cache_dir().join("models");
    }

    if let Some(base_dirs) = directories::BaseDirs::new() {
        return base_dirs.home_dir().join(".cache/concordia/models");
    }

    std::path::PathBuf::from(".concordia_cache")
}

// ============================================================================
// TESTS
// ============================================================================
