//! HNSW vector index over the verse corpus
//!
//! Wraps USearch configured for inner-product search. All stored vectors
//! are L2-normalized, so inner product equals cosine similarity. Keys are
//! mapping positions: index row `i` holds the embedding of verse `i`.
//!
//! The index is populated once at ingestion and read-only at serve time.

use std::path::Path;

use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Dimensions of the default embedding model (multilingual MiniLM)
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Default HNSW graph connectivity (neighbors kept per node)
pub const DEFAULT_CONNECTIVITY: usize = 16;

/// Default candidate-list width while building the graph
pub const DEFAULT_EXPANSION_ADD: usize = 128;

/// Default candidate-list width while querying the graph
pub const DEFAULT_EXPANSION_SEARCH: usize = 64;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors surfaced by the verse index
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum VectorSearchError {
    /// Index construction was rejected by usearch
    IndexCreation(String),
    /// A vector could not be inserted
    IndexAdd(String),
    /// Candidate lookup failed
    IndexSearch(String),
    /// Saving or loading the serialized graph failed
    IndexPersistence(String),
    /// Vector length does not match the configured dimensions
    InvalidDimensions(usize, usize),
}

impl std::fmt::Display for VectorSearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexCreation(e) => write!(f, "Index construction failed: {}", e),
            Self::IndexAdd(e) => write!(f, "Vector insert failed: {}", e),
            Self::IndexSearch(e) => write!(f, "Candidate lookup failed: {}", e),
            Self::IndexPersistence(e) => write!(f, "Index persistence failed: {}", e),
            Self::InvalidDimensions(expected, got) => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for VectorSearchError {}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Tuning knobs for the verse index
#[derive(Debug, Clone)]
pub struct VerseIndexConfig {
    /// Embedding dimensionality
    pub dimensions: usize,
    /// Neighbors kept per HNSW node
    pub connectivity: usize,
    /// Candidate-list width during insertion
    pub expansion_add: usize,
    /// Candidate-list width during lookup
    pub expansion_search: usize,
}

impl Default for VerseIndexConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            connectivity: DEFAULT_CONNECTIVITY,
            expansion_add: DEFAULT_EXPANSION_ADD,
            expansion_search: DEFAULT_EXPANSION_SEARCH,
        }
    }
}

impl VerseIndexConfig {
    /// Config for a given embedding dimensionality, defaults elsewhere
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    fn options(&self) -> IndexOptions {
        IndexOptions {
            dimensions: self.dimensions,
            // Inner product over unit vectors = cosine similarity
            metric: MetricKind::IP,
            quantization: ScalarKind::F32,
            connectivity: self.connectivity,
            expansion_add: self.expansion_add,
            expansion_search: self.expansion_search,
            multi: false,
        }
    }
}

/// Snapshot of index size and shape
#[derive(Debug, Clone)]
pub struct VerseIndexStats {
    /// Verse embeddings currently stored
    pub indexed_vectors: usize,
    /// Embedding dimensionality
    pub dimensions: usize,
    /// Neighbors kept per HNSW node
    pub connectivity: usize,
    /// Bytes the serialized graph occupies
    pub serialized_bytes: usize,
}

// ============================================================================
// VERSE INDEX
// ============================================================================

/// Position-keyed HNSW index of verse embeddings
pub struct VerseIndex {
    index: Index,
    config: VerseIndexConfig,
}

// usearch::Index has no Debug impl, so derive is unavailable
impl std::fmt::Debug for VerseIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerseIndex")
            .field("len", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VerseIndex {
    /// Create an empty index with default configuration
    pub fn new() -> Result<Self, VectorSearchError> {
        Self::with_config(VerseIndexConfig::default())
    }

    /// Create an empty index with custom configuration
    pub fn with_config(config: VerseIndexConfig) -> Result<Self, VectorSearchError> {
        let index = Index::new(&config.options())
            .map_err(|e| VectorSearchError::IndexCreation(e.to_string()))?;

        Ok(Self { index, config })
    }

    /// Number of vectors in the index
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// Whether the index holds no vectors yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Embedding dimensionality the index expects
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// Reserve capacity for a number of vectors.
    /// usearch requires reserve() before add() to avoid segfaults.
    pub fn reserve(&self, capacity: usize) -> Result<(), VectorSearchError> {
        self.index.reserve(capacity).map_err(|e| {
            VectorSearchError::IndexCreation(format!("Capacity reserve failed: {}", e))
        })
    }

    /// Add a vector at a mapping position.
    ///
    /// Positions are expected to be added in mapping order at ingestion;
    /// the index itself does not enforce contiguity.
    pub fn add(&mut self, position: usize, vector: &[f32]) -> Result<(), VectorSearchError> {
        if vector.len() != self.config.dimensions {
            return Err(VectorSearchError::InvalidDimensions(
                self.config.dimensions,
                vector.len(),
            ));
        }

        // Grow capacity ahead of the add when needed
        let occupied = self.index.size();
        let capacity = self.index.capacity();
        if occupied >= capacity {
            self.reserve((capacity * 2).max(16))?;
        }

        self.index
            .add(position as u64, vector)
            .map_err(|e| VectorSearchError::IndexAdd(e.to_string()))
    }

    /// Nearest candidates for a query vector, best first.
    ///
    /// Returns `(position, similarity)` pairs where similarity is the
    /// inner product recovered from the index distance. At most `limit`
    /// pairs, fewer when the index is smaller.
    pub fn candidates(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<(usize, f32)>, VectorSearchError> {
        if query.len() != self.config.dimensions {
            return Err(VectorSearchError::InvalidDimensions(
                self.config.dimensions,
                query.len(),
            ));
        }

        if self.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let matches = self
            .index
            .search(query, limit)
            .map_err(|e| VectorSearchError::IndexSearch(e.to_string()))?;

        let pairs = matches
            .keys
            .iter()
            .zip(matches.distances.iter())
            .map(|(&key, &distance)| (key as usize, 1.0 - distance))
            .collect();

        Ok(pairs)
    }

    /// Write the serialized graph to `path`
    pub fn save(&self, path: &Path) -> Result<(), VectorSearchError> {
        let path_str = path.to_str().ok_or_else(|| {
            VectorSearchError::IndexPersistence("Path is not valid UTF-8".to_string())
        })?;

        self.index
            .save(path_str)
            .map_err(|e| VectorSearchError::IndexPersistence(e.to_string()))
    }

    /// Read a serialized graph from `path` into a fresh index
    pub fn load(path: &Path, config: VerseIndexConfig) -> Result<Self, VectorSearchError> {
        let path_str = path.to_str().ok_or_else(|| {
            VectorSearchError::IndexPersistence("Path is not valid UTF-8".to_string())
        })?;

        let index = Index::new(&config.options())
            .map_err(|e| VectorSearchError::IndexCreation(e.to_string()))?;

        index
            .load(path_str)
            .map_err(|e| VectorSearchError::IndexPersistence(e.to_string()))?;

        Ok(Self { index, config })
    }

    /// Current size and shape of the index
    pub fn stats(&self) -> VerseIndexStats {
        VerseIndexStats {
            indexed_vectors: self.len(),
            dimensions: self.config.dimensions,
            connectivity: self.config.connectivity,
            serialized_bytes: self.index.serialized_length(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
