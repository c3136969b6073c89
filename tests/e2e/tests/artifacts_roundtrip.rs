//! Artifact persistence across process boundaries
//!
//! A pipeline answering from freshly built parts and one answering from
//! reloaded artifacts must be indistinguishable, and a corrupted pair must
//! be refused at load time rather than mis-serve queries.

use concordia_core::{
    load_artifacts, save_artifacts, ArtifactError, ArtifactPaths, SearchPipeline,
    VerseIndexConfig, VerseRecord,
};
use concordia_e2e_tests::fixtures::{
    axis, indexed_corpus, two_book_corpus, ConstScorer, RegisteredEncoder, DIMS,
};

#[test]
fn test_reloaded_pipeline_answers_identically() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path(), "bible");

    let (index, mapping) = indexed_corpus(two_book_corpus());
    save_artifacts(&index, &mapping, &paths).unwrap();

    let encoder = || RegisteredEncoder::new().with("lumière", axis(2));

    let before = SearchPipeline::new(encoder(), ConstScorer(1.5), index, mapping)
        .search("lumière", 5, 5)
        .unwrap();

    let (loaded_index, loaded_mapping) =
        load_artifacts(&paths, VerseIndexConfig::with_dimensions(DIMS)).unwrap();
    let after = SearchPipeline::new(encoder(), ConstScorer(1.5), loaded_index, loaded_mapping)
        .search("lumière", 5, 5)
        .unwrap();

    assert_eq!(before, after);
    assert_eq!(before[0].text, "Dieu dit: Que la lumière soit! Et la lumière fut.");
}

#[test]
fn test_mapping_preserves_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path(), "bible");

    let corpus = two_book_corpus();
    let original = corpus.clone();
    let (index, mapping) = indexed_corpus(corpus);
    save_artifacts(&index, &mapping, &paths).unwrap();

    let (_, loaded) = load_artifacts(&paths, VerseIndexConfig::with_dimensions(DIMS)).unwrap();

    for (position, expected) in original.iter().enumerate() {
        assert_eq!(loaded.get(position), Some(expected));
    }
}

#[test]
fn test_mapping_artifact_uses_rowid_key() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path(), "bible");

    let (index, mapping) = indexed_corpus(two_book_corpus());
    save_artifacts(&index, &mapping, &paths).unwrap();

    let json = std::fs::read_to_string(&paths.mapping).unwrap();
    let values: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();

    assert_eq!(values.len(), 8);
    assert!(values.iter().all(|v| v.get("rowid").is_some()));
    assert!(values.iter().all(|v| v.get("source_id").is_none()));
}

#[test]
fn test_truncated_mapping_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path(), "bible");

    let (index, mapping) = indexed_corpus(two_book_corpus());
    save_artifacts(&index, &mapping, &paths).unwrap();

    // Drop half the records from the mapping file
    let json = std::fs::read_to_string(&paths.mapping).unwrap();
    let mut records: Vec<VerseRecord> = serde_json::from_str(&json).unwrap();
    records.truncate(4);
    std::fs::write(&paths.mapping, serde_json::to_string(&records).unwrap()).unwrap();

    let err = load_artifacts(&paths, VerseIndexConfig::with_dimensions(DIMS)).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::Misaligned { index: 8, mapping: 4 }
    ));
}

#[test]
fn test_garbled_mapping_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path(), "bible");

    let (index, mapping) = indexed_corpus(two_book_corpus());
    save_artifacts(&index, &mapping, &paths).unwrap();

    std::fs::write(&paths.mapping, "{not json").unwrap();

    let err = load_artifacts(&paths, VerseIndexConfig::with_dimensions(DIMS)).unwrap_err();
    assert!(matches!(err, ArtifactError::Json(_)));
}
