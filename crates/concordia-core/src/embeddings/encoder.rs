//! Local fastembed encoder
//!
//! Runs sentence embedding models via fastembed v5 (ONNX inference, no
//! external API). The default model is multilingual MiniLM, which handles
//! French scripture well at 384 dimensions.

use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::{l2_normalize, model_cache_dir, EmbeddingError, TextEncoder};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Batch size for embedding generation
pub const BATCH_SIZE: usize = 64;

/// Dimensions of the default embedding model
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the fastembed encoder
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// fastembed model to load
    pub model: EmbeddingModel,
    /// Expected output dimensions of the model
    pub dimensions: usize,
    /// Show a download progress bar on first model fetch
    pub show_download_progress: bool,
    /// Override the model cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model: EmbeddingModel::ParaphraseMLMiniLML12V2,
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            show_download_progress: true,
            cache_dir: None,
        }
    }
}

// ============================================================================
// ENCODER
// ============================================================================

/// Text encoder backed by a local fastembed model.
///
/// fastembed's `embed` needs `&mut self`, so the model sits behind a
/// `Mutex`; concurrent callers serialize on inference.
pub struct FastembedEncoder {
    model: Mutex<TextEmbedding>,
    dimensions: usize,
}

impl FastembedEncoder {
    /// Load the default multilingual MiniLM encoder.
    ///
    /// Downloads the model on first use. Call this at startup, not in
    /// tests or hot paths.
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::with_config(EncoderConfig::default())
    }

    /// Load an encoder with a custom model configuration.
    pub fn with_config(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        let cache_dir = config.cache_dir.clone().unwrap_or_else(model_cache_dir);
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            tracing::warn!("Failed to create cache directory {:?}: {}", cache_dir, e);
        }

        let options = InitOptions::new(config.model.clone())
            .with_show_download_progress(config.show_download_progress)
            .with_cache_dir(cache_dir);

        let model = TextEmbedding::try_new(options).map_err(|e| {
            EmbeddingError::ModelInit(format!(
                "Failed to initialize embedding model {:?}: {}. \
                Ensure ONNX runtime is available and model files can be downloaded.",
                config.model, e
            ))
        })?;

        Ok(Self {
            model: Mutex::new(model),
            dimensions: config.dimensions,
        })
    }
}

impl TextEncoder for FastembedEncoder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut model = self
            .model
            .lock()
            .map_err(|e| EmbeddingError::EncodingFailed(format!("Model lock poisoned: {}", e)))?;

        let mut all_vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            let embeddings = model
                .embed(chunk.to_vec(), None)
                .map_err(|e| EmbeddingError::EncodingFailed(e.to_string()))?;

            for embedding in embeddings {
                if embedding.len() != self.dimensions {
                    return Err(EmbeddingError::EncodingFailed(format!(
                        "model produced {} dimensions, expected {}",
                        embedding.len(),
                        self.dimensions
                    )));
                }
                all_vectors.push(l2_normalize(embedding));
            }

            tracing::debug!(
                encoded = all_vectors.len(),
                total = texts.len(),
                "embedding batch complete"
            );
        }

        Ok(all_vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ============================================================================
// TESTS
// ============================================================================
