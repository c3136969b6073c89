//! Embedding model profiles
//!
//! Each profile bundles a fastembed model with its dimensionality, the
//! prefix conventions it was trained with, and a distinct artifact stem so
//! indexes built with different models never collide on disk.

use fastembed::EmbeddingModel;

/// A selectable embedding model with its conventions.
pub struct ModelProfile {
    /// Name used on the command line
    pub name: &'static str,
    /// fastembed model identifier
    pub model: EmbeddingModel,
    /// Embedding dimensionality
    pub dimensions: usize,
    /// Prefix prepended to queries ("" for MiniLM, "query: " for E5)
    pub query_prefix: &'static str,
    /// Prefix prepended to passages at ingestion
    pub passage_prefix: &'static str,
    /// Artifact stem inside the data directory
    pub stem: &'static str,
}

/// paraphrase-multilingual-MiniLM-L12-v2: compact, French-capable, 384d
pub const MINILM: ModelProfile = ModelProfile {
    name: "minilm",
    model: EmbeddingModel::ParaphraseMLMiniLML12V2,
    dimensions: 384,
    query_prefix: "",
    passage_prefix: "",
    stem: "bible",
};

/// multilingual-e5-large: heavier alternative, 1024d, prefix-trained
pub const E5_LARGE: ModelProfile = ModelProfile {
    name: "e5-large",
    model: EmbeddingModel::MultilingualE5Large,
    dimensions: 1024,
    query_prefix: "query: ",
    passage_prefix: "passage: ",
    stem: "bible_e5",
};

/// All selectable profiles, default first
pub const ALL: [&ModelProfile; 2] = [&MINILM, &E5_LARGE];

/// Resolve a profile by its command-line name.
pub fn lookup(name: &str) -> Option<&'static ModelProfile> {
    ALL.iter()
        .copied()
        .find(|profile| profile.name.eq_ignore_ascii_case(name))
}

// ============================================================================
// TESTS
// ============================================================================
