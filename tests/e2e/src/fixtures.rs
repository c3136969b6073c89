//! Test Data Factory
//!
//! Deterministic encoders, scorers, and corpus builders for end-to-end
//! tests. The encoder only answers for registered texts, so a test fails
//! loudly when the pipeline embeds anything other than the transformed
//! query it expected.

use std::collections::HashMap;

use concordia_core::{
    l2_normalize, EmbeddingError, RelevanceScorer, RerankerError, TextEncoder, VerseIndex,
    VerseIndexConfig, VerseMapping, VerseRecord,
};

/// Embedding width used by every fixture
pub const DIMS: usize = 8;

// ============================================================================
// MODEL STAND-INS
// ============================================================================

/// Encoder that returns vectors registered per exact input text.
#[derive(Default)]
pub struct RegisteredEncoder {
    vectors: HashMap<String, Vec<f32>>,
}

impl RegisteredEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vector for one exact text; it is unit-normalized here.
    #[must_use]
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), l2_normalize(vector));
        self
    }
}

impl TextEncoder for RegisteredEncoder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts
            .iter()
            .map(|text| {
                self.vectors.get(*text).cloned().ok_or_else(|| {
                    EmbeddingError::InvalidInput(format!("no vector registered for {text:?}"))
                })
            })
            .collect()
    }

    fn dimensions(&self) -> usize {
        DIMS
    }
}

/// Encoder that folds text bytes into a unit vector.
///
/// Works on arbitrary text, unlike [`RegisteredEncoder`], and embeds
/// identical strings identically, so a query equal to an indexed passage
/// always lands on that passage first.
pub struct FoldEncoder;

impl TextEncoder for FoldEncoder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0_f32; DIMS];
                for (i, byte) in text.bytes().enumerate() {
                    v[i % DIMS] += f32::from(byte) / 255.0;
                }
                l2_normalize(v)
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        DIMS
    }
}

/// Scorer that looks up raw scores by candidate text, defaulting to zero.
pub struct MapScorer {
    scores: HashMap<String, f32>,
}

impl MapScorer {
    pub fn new(entries: &[(&str, f32)]) -> Self {
        Self {
            scores: entries
                .iter()
                .map(|(text, score)| (text.to_string(), *score))
                .collect(),
        }
    }
}

impl RelevanceScorer for MapScorer {
    fn predict(&self, _query: &str, texts: &[&str]) -> Result<Vec<f32>, RerankerError> {
        Ok(texts
            .iter()
            .map(|text| self.scores.get(*text).copied().unwrap_or(0.0))
            .collect())
    }
}

/// Scorer that gives every candidate the same raw score.
#[derive(Clone, Copy)]
pub struct ConstScorer(pub f32);

impl RelevanceScorer for ConstScorer {
    fn predict(&self, _query: &str, texts: &[&str]) -> Result<Vec<f32>, RerankerError> {
        Ok(vec![self.0; texts.len()])
    }
}

// ============================================================================
// CORPUS BUILDERS
// ============================================================================

/// Build one verse record with sensible defaults.
pub fn verse(
    position: usize,
    book_id: i64,
    book_title: &str,
    chapter: &str,
    verse: &str,
    text: &str,
) -> VerseRecord {
    VerseRecord {
        source_id: position as i64 + 1,
        book: book_title.chars().take(3).collect::<String>().to_uppercase(),
        book_id,
        book_title: book_title.to_string(),
        chapter: chapter.to_string(),
        chapter_id: chapter.parse().unwrap_or(0),
        chapter_title: String::new(),
        verse: verse.to_string(),
        text: text.to_string(),
    }
}

/// Unit vector along one of the fixture axes.
pub fn axis(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIMS];
    v[i % DIMS] = 1.0;
    v
}

/// Two-book corpus: five verses of Genesis, three of Exodus.
///
/// Each verse sits on its own axis, so a query vector built from
/// [`axis`] components fully controls the candidate order.
pub fn two_book_corpus() -> Vec<VerseRecord> {
    vec![
        verse(0, 1, "La Genèse", "1", "1", "Au commencement, Dieu créa les cieux et la terre."),
        verse(1, 1, "La Genèse", "1", "2", "La terre était informe et vide."),
        verse(2, 1, "La Genèse", "1", "3", "Dieu dit: Que la lumière soit! Et la lumière fut."),
        verse(3, 1, "La Genèse", "1", "4", "Dieu vit que la lumière était bonne."),
        verse(4, 1, "La Genèse", "1", "5", "Dieu appela la lumière jour, et les ténèbres nuit."),
        verse(5, 2, "L'Exode", "1", "1", "Voici les noms des fils d'Israël venus en Égypte."),
        verse(6, 2, "L'Exode", "1", "2", "Ruben, Siméon, Lévi et Juda."),
        verse(7, 2, "L'Exode", "1", "3", "Issacar, Zabulon et Benjamin."),
    ]
}

/// Index the given records on their fixture axes and build the mapping.
pub fn indexed_corpus(records: Vec<VerseRecord>) -> (VerseIndex, VerseMapping) {
    let mut index = VerseIndex::with_config(VerseIndexConfig::with_dimensions(DIMS))
        .expect("fixture index creation");
    for (position, _) in records.iter().enumerate() {
        index
            .add(position, &axis(position))
            .expect("fixture index add");
    }
    (index, VerseMapping::from_records(records))
}
