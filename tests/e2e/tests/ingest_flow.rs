//! Ingest-to-query journey
//!
//! Seeds a SQLite verse database, runs the full ingestion (fetch, filter,
//! embed, index, persist), then loads the artifacts and answers queries
//! through the pipeline with the lexical scorer. No model downloads.

use std::path::Path;

use rusqlite::Connection;

use concordia_core::{
    fetch_verses, load_artifacts, run_ingest, ArtifactPaths, IngestConfig, IngestError,
    LexicalScorer, SearchPipeline, VerseIndexConfig,
};
use concordia_e2e_tests::fixtures::{FoldEncoder, DIMS};

fn seed_corpus_db(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE verses (
            book TEXT, book_id INTEGER, book_title TEXT,
            chapter INTEGER, chapter_id INTEGER, chapter_title TEXT,
            verse INTEGER, text TEXT
        );
        INSERT INTO verses VALUES
            ('GEN', 1, 'La Genèse', 1, 1, 'La création', 1,
             'Au commencement, Dieu créa les cieux et la terre.'),
            ('GEN', 1, 'La Genèse', 1, 1, 'La création', 2,
             'La terre était informe et vide.'),
            ('GEN', 1, 'La Genèse', 1, 1, 'La création', 3,
             'Dieu dit: Que la lumière soit! Et la lumière fut.'),
            ('GEN', 1, 'La Genèse', NULL, 1, NULL, NULL, 'Titre'),
            ('EXO', 2, 'L''Exode', 1, 51, '', 1,
             'Voici les noms des fils d''Israël venus en Égypte.'),
            ('EXO', 2, 'L''Exode', 1, 51, '', 2,
             'Ruben, Siméon, Lévi et Juda vinrent chacun avec sa famille.');",
    )
    .unwrap();
}

#[test]
fn test_ingest_then_search_journey() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("bible.db");
    seed_corpus_db(&db);
    let paths = ArtifactPaths::in_dir(&dir.path().join("data"), "bible");

    // Ingest: the one-word heading row is filtered out
    let report = run_ingest(&db, &FoldEncoder, &paths, &IngestConfig::default()).unwrap();
    assert_eq!(report.fetched, 6);
    assert_eq!(report.indexed, 5);
    assert!(paths.exist());

    // Load and query
    let (index, mapping) =
        load_artifacts(&paths, VerseIndexConfig::with_dimensions(DIMS)).unwrap();
    assert_eq!(index.len(), 5);
    assert!(mapping.position_of("La Genèse", "", "").is_none());

    let pipeline = SearchPipeline::new(FoldEncoder, LexicalScorer::default(), index, mapping);

    // A query equal to an indexed verse embeds identically to it, so it
    // must come back first, and full term overlap scores high
    let results = pipeline
        .search("La terre était informe et vide.", 5, 3)
        .unwrap();
    assert_eq!(results[0].text, "La terre était informe et vide.");
    assert_eq!(results[0].book_title, "La Genèse");
    assert_eq!(results[0].verse, "2");
    assert!(results[0].score > 0.5);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));

    // Context on the hit stays inside Genesis
    let context = pipeline.context(&results[0], 2);
    assert!(!context.is_empty());
    assert_eq!(context.iter().filter(|c| c.is_match).count(), 1);
}

#[test]
fn test_reingest_overwrites_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("bible.db");
    seed_corpus_db(&db);
    let paths = ArtifactPaths::in_dir(dir.path(), "bible");

    run_ingest(&db, &FoldEncoder, &paths, &IngestConfig::default()).unwrap();

    // Stricter filter on the second run: only the longest verses survive
    let config = IngestConfig {
        min_word_count: 7,
        ..Default::default()
    };
    let report = run_ingest(&db, &FoldEncoder, &paths, &config).unwrap();
    assert!(report.indexed < 5);

    let (index, mapping) =
        load_artifacts(&paths, VerseIndexConfig::with_dimensions(DIMS)).unwrap();
    assert_eq!(index.len(), report.indexed);
    assert_eq!(mapping.len(), report.indexed);
}

#[test]
fn test_ingest_empty_db_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("bible.db");
    let conn = Connection::open(&db).unwrap();
    conn.execute_batch(
        "CREATE TABLE verses (
            book TEXT, book_id INTEGER, book_title TEXT,
            chapter INTEGER, chapter_id INTEGER, chapter_title TEXT,
            verse INTEGER, text TEXT
        );",
    )
    .unwrap();
    drop(conn);

    let paths = ArtifactPaths::in_dir(dir.path(), "bible");
    let err = run_ingest(&db, &FoldEncoder, &paths, &IngestConfig::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyCorpus));
}

#[test]
fn test_fetch_preserves_rowid_order() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("bible.db");
    seed_corpus_db(&db);

    let verses = fetch_verses(&db).unwrap();
    assert_eq!(verses.len(), 6);
    let ids: Vec<i64> = verses.iter().map(|v| v.source_id).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
}
