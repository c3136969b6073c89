//! Live corpus tests
//!
//! Run the real models against a real verse database:
//!
//! ```text
//! CONCORDIA_CORPUS_DB=/path/to/bible.db \
//!   cargo test -p concordia-e2e-tests --test live_corpus -- --ignored
//! ```
//!
//! First execution downloads the embedding and reranker models and embeds
//! the full corpus; expect minutes, not seconds.

use std::path::PathBuf;

use concordia_core::{
    load_artifacts, run_ingest, ArtifactPaths, FastembedEncoder, FastembedReranker, IngestConfig,
    LexicalScorer, SearchPipeline, VerseIndexConfig, DEFAULT_INDEX_TOP_K, DEFAULT_RERANK_TOP_K,
};

fn corpus_db() -> Option<PathBuf> {
    std::env::var_os("CONCORDIA_CORPUS_DB").map(PathBuf::from)
}

#[test]
#[ignore = "needs CONCORDIA_CORPUS_DB and model downloads"]
fn test_live_ingest_and_search() {
    let Some(db) = corpus_db() else {
        eprintln!("CONCORDIA_CORPUS_DB not set; nothing to do");
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path(), "bible");

    let encoder = FastembedEncoder::new().unwrap();
    let report = run_ingest(&db, &encoder, &paths, &IngestConfig::default()).unwrap();
    assert!(report.indexed > 0);
    assert!(report.indexed <= report.fetched);

    let (index, mapping) =
        load_artifacts(&paths, VerseIndexConfig::default()).unwrap();
    let reranker = FastembedReranker::new().unwrap();
    let pipeline = SearchPipeline::new(encoder, reranker, index, mapping);

    let results = pipeline
        .search(
            "Dieu créa le ciel et la terre",
            DEFAULT_INDEX_TOP_K,
            DEFAULT_RERANK_TOP_K,
        )
        .unwrap();

    assert!(!results.is_empty());
    assert!(results.len() <= DEFAULT_RERANK_TOP_K);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    assert!(results
        .iter()
        .all(|r| !r.book_title.is_empty() && !r.text.is_empty()));

    // A creation query should surface Genesis among the top hits
    assert!(results.iter().any(|r| r.book_title.contains("Gen")));

    // Context of the top hit stays within one book
    let context = pipeline.context(&results[0], 2);
    assert!(!context.is_empty());
    assert_eq!(context.iter().filter(|c| c.is_match).count(), 1);
}

#[test]
#[ignore = "needs CONCORDIA_CORPUS_DB and model downloads"]
fn test_live_thematic_query_spans_books() {
    let Some(db) = corpus_db() else {
        eprintln!("CONCORDIA_CORPUS_DB not set; nothing to do");
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path(), "bible");

    let encoder = FastembedEncoder::new().unwrap();
    run_ingest(&db, &encoder, &paths, &IngestConfig::default()).unwrap();

    let (index, mapping) =
        load_artifacts(&paths, VerseIndexConfig::default()).unwrap();
    let reranker = FastembedReranker::new().unwrap();
    let pipeline = SearchPipeline::new(encoder, reranker, index, mapping);

    let results = pipeline
        .search("le pardon et la miséricorde", DEFAULT_INDEX_TOP_K, DEFAULT_RERANK_TOP_K)
        .unwrap();

    assert!(!results.is_empty());
    assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));
}

#[test]
#[ignore = "needs CONCORDIA_CORPUS_DB; models not required"]
fn test_live_corpus_filter_rates() {
    let Some(db) = corpus_db() else {
        eprintln!("CONCORDIA_CORPUS_DB not set; nothing to do");
        return;
    };

    let verses = concordia_core::fetch_verses(&db).unwrap();
    let kept = concordia_core::filter_verses(verses.clone(), &IngestConfig::default());

    assert!(!kept.is_empty());
    assert!(kept.len() <= verses.len());
    // Filtering removes headings and numbering, not the corpus
    assert!(kept.len() * 2 > verses.len());

    // The cheap scorer should still prefer overlapping verses; a smoke
    // check that the lexical fallback behaves on real text
    let scorer = LexicalScorer::default();
    let sample: Vec<&str> = kept.iter().take(10).map(|v| v.text.as_str()).collect();
    let scores =
        concordia_core::RelevanceScorer::predict(&scorer, &kept[0].text, &sample).unwrap();
    assert_eq!(scores.len(), sample.len());
}
