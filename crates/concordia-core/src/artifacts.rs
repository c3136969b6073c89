//! Ingestion artifact persistence
//!
//! An ingested corpus is two files sharing a stem: the serialized HNSW
//! index (`<stem>.usearch`) and the verse mapping (`<stem>_mapping.json`,
//! a JSON array of verse records in index-row order). The pair is only
//! meaningful together; loading verifies they describe the same corpus.

use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::{VerseMapping, VerseRecord};
use crate::search::{VerseIndex, VerseIndexConfig, VerseIndexStats, VectorSearchError};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Artifact error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Mapping (de)serialization error
    #[error("Mapping serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Index error
    #[error("Index error: {0}")]
    Index(#[from] VectorSearchError),
    /// Index and mapping disagree on corpus size
    #[error("Artifacts misaligned: index has {index} vectors, mapping has {mapping} records")]
    Misaligned { index: usize, mapping: usize },
}

/// Artifact result type
pub type Result<T> = std::result::Result<T, ArtifactError>;

// ============================================================================
// ARTIFACT PATHS
// ============================================================================

/// On-disk locations of one ingested corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Serialized HNSW index
    pub index: PathBuf,
    /// Verse mapping JSON
    pub mapping: PathBuf,
}

impl ArtifactPaths {
    /// Conventional paths for a corpus stem inside a data directory.
    pub fn in_dir(dir: &Path, stem: &str) -> Self {
        Self {
            index: dir.join(format!("{stem}.usearch")),
            mapping: dir.join(format!("{stem}_mapping.json")),
        }
    }

    /// True when both files are present.
    pub fn exist(&self) -> bool {
        self.index.exists() && self.mapping.exists()
    }
}

// ============================================================================
// SAVE / LOAD
// ============================================================================

/// Persist an index and its mapping as a pair.
///
/// Parent directories are created as needed. The pair is rejected here if
/// the sizes already disagree, so a bad build never reaches disk.
pub fn save_artifacts(
    index: &VerseIndex,
    mapping: &VerseMapping,
    paths: &ArtifactPaths,
) -> Result<()> {
    if index.len() != mapping.len() {
        return Err(ArtifactError::Misaligned {
            index: index.len(),
            mapping: mapping.len(),
        });
    }

    for path in [&paths.index, &paths.mapping] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
    }

    index.save(&paths.index)?;

    let json = serde_json::to_string(mapping.records())?;
    fs::write(&paths.mapping, json)?;

    tracing::info!(
        index = %paths.index.display(),
        mapping = %paths.mapping.display(),
        verses = mapping.len(),
        "artifacts saved"
    );
    Ok(())
}

/// Load an ingested corpus from disk.
///
/// Fails if either file is missing, unreadable, or if the two halves
/// disagree on corpus size. A misaligned pair would silently return wrong
/// verses for every query, so the mismatch is fatal at load time.
pub fn load_artifacts(
    paths: &ArtifactPaths,
    config: VerseIndexConfig,
) -> Result<(VerseIndex, VerseMapping)> {
    let index = VerseIndex::load(&paths.index, config)?;

    let json = fs::read_to_string(&paths.mapping)?;
    let records: Vec<VerseRecord> = serde_json::from_str(&json)?;
    let mapping = VerseMapping::from_records(records);

    if index.len() != mapping.len() {
        return Err(ArtifactError::Misaligned {
            index: index.len(),
            mapping: mapping.len(),
        });
    }

    tracing::info!(verses = mapping.len(), "artifacts loaded");
    Ok((index, mapping))
}

/// Stats of a stored index without loading its mapping.
pub fn artifact_stats(paths: &ArtifactPaths, config: VerseIndexConfig) -> Result<VerseIndexStats> {
    let index = VerseIndex::load(&paths.index, config)?;
    Ok(index.stats())
}

// ============================================================================
// TESTS
// ============================================================================
