//! Model comparison benchmark
//!
//! Ingests the corpus under every model profile, runs a fixed French query
//! set through the full two-stage pipeline, and prints a side-by-side
//! comparison with per-query latencies. The cross-encoder is shared across
//! profiles since reranking is model-agnostic.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use concordia_core::{
    load_artifacts, run_ingest, ArtifactPaths, FastembedReranker, IngestConfig, PipelineConfig,
    SearchPipeline, SearchResult, VerseIndexConfig, DEFAULT_INDEX_TOP_K, DEFAULT_RERANK_TOP_K,
};

use crate::profiles::{self, ModelProfile};
use crate::{build_encoder, resolve_data_dir};

// ============================================================================
// QUERY SET
// ============================================================================

/// One benchmark query with the retrieval difficulty it probes.
struct BenchQuery {
    category: &'static str,
    text: &'static str,
}

/// Fixed query set spanning topical, theological, and narrative retrieval.
/// Written without accents so results are comparable across tokenizers.
const QUERIES: [BenchQuery; 10] = [
    BenchQuery {
        category: "basic_topic",
        text: "Que dit la Bible sur l'amour de Dieu",
    },
    BenchQuery {
        category: "complex_theology",
        text: "Comment la grace divine opere-t-elle dans la redemption des pecheurs",
    },
    BenchQuery {
        category: "proper_noun",
        text: "Quelles sont les paroles de Moise devant le buisson ardent",
    },
    BenchQuery {
        category: "poetic_language",
        text: "Les images poetiques de la nature dans les Psaumes de louange",
    },
    BenchQuery {
        category: "cross_testament",
        text: "La promesse d'un messie dans les propheties et son accomplissement",
    },
    BenchQuery {
        category: "moral_teaching",
        text: "Comment la Bible enseigne-t-elle le pardon envers ses ennemis",
    },
    BenchQuery {
        category: "narrative_event",
        text: "Le recit de la multiplication des pains par Jesus",
    },
    BenchQuery {
        category: "wisdom_literature",
        text: "La sagesse et la crainte de Dieu dans les Proverbes de Salomon",
    },
    BenchQuery {
        category: "eschatology",
        text: "Les signes de la fin des temps dans l'Apocalypse de Jean",
    },
    BenchQuery {
        category: "daily_life",
        text: "Que dit la Bible sur le travail et la perseverance quotidienne",
    },
];

const COL_WIDTH: usize = 48;

// ============================================================================
// PHASES
// ============================================================================

struct IngestStats {
    size_mb: f64,
    vector_count: usize,
    model_load: f64,
    ingest_time: f64,
    skipped: bool,
}

struct QueryOutcome {
    latency: f64,
    results: Vec<SearchResult>,
}

/// Run the full benchmark: ingest, query, display.
pub fn run_bench(
    db: &Path,
    data_dir: Option<PathBuf>,
    force_ingest: bool,
    skip_ingest: bool,
) -> anyhow::Result<()> {
    let dir = resolve_data_dir(data_dir)?;

    // Phase 1: Ingest
    let mut ingest_stats = Vec::new();
    for profile in profiles::ALL {
        let paths = ArtifactPaths::in_dir(&dir, profile.stem);
        let stats = if skip_ingest {
            if !paths.exist() {
                anyhow::bail!(
                    "[{}] artifacts missing under {}; run without --skip-ingest",
                    profile.name,
                    dir.display()
                );
            }
            skipped_stats(&paths)?
        } else {
            ingest_profile(db, profile, &paths, force_ingest)?
        };
        ingest_stats.push(stats);
    }

    // Phase 2: Query, with one cross-encoder shared across profiles
    tracing::info!("loading cross-encoder (shared)");
    let reranker = Arc::new(FastembedReranker::new()?);

    let mut all_outcomes = Vec::new();
    for profile in profiles::ALL {
        tracing::info!(model = profile.name, "running queries");
        all_outcomes.push(query_profile(profile, &dir, Arc::clone(&reranker))?);
    }

    // Phase 3: Display
    display(&ingest_stats, &all_outcomes);
    Ok(())
}

fn index_size_mb(paths: &ArtifactPaths) -> anyhow::Result<f64> {
    Ok(std::fs::metadata(&paths.index)?.len() as f64 / (1024.0 * 1024.0))
}

fn skipped_stats(paths: &ArtifactPaths) -> anyhow::Result<IngestStats> {
    let json = std::fs::read_to_string(&paths.mapping)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&json)?;
    Ok(IngestStats {
        size_mb: index_size_mb(paths)?,
        vector_count: records.len(),
        model_load: 0.0,
        ingest_time: 0.0,
        skipped: true,
    })
}

fn ingest_profile(
    db: &Path,
    profile: &ModelProfile,
    paths: &ArtifactPaths,
    force: bool,
) -> anyhow::Result<IngestStats> {
    if paths.exist() && !force {
        let stats = skipped_stats(paths)?;
        tracing::info!(
            model = profile.name,
            size_mb = stats.size_mb,
            "artifacts exist, skipping ingest"
        );
        return Ok(stats);
    }

    let t0 = Instant::now();
    let encoder = build_encoder(profile)?;
    let model_load = t0.elapsed().as_secs_f64();
    tracing::info!(model = profile.name, seconds = model_load, "model loaded");

    let config = IngestConfig {
        passage_prefix: profile.passage_prefix.to_string(),
        ..Default::default()
    };
    let t0 = Instant::now();
    let report = run_ingest(db, &encoder, paths, &config)?;
    let ingest_time = t0.elapsed().as_secs_f64();
    tracing::info!(
        model = profile.name,
        seconds = ingest_time,
        vectors = report.indexed,
        "index built"
    );

    Ok(IngestStats {
        size_mb: index_size_mb(paths)?,
        vector_count: report.indexed,
        model_load,
        ingest_time,
        skipped: false,
    })
}

fn query_profile(
    profile: &'static ModelProfile,
    dir: &Path,
    reranker: Arc<FastembedReranker>,
) -> anyhow::Result<Vec<QueryOutcome>> {
    let paths = ArtifactPaths::in_dir(dir, profile.stem);
    let (index, mapping) =
        load_artifacts(&paths, VerseIndexConfig::with_dimensions(profile.dimensions))?;
    let encoder = build_encoder(profile)?;
    let pipeline = SearchPipeline::with_config(
        encoder,
        reranker,
        index,
        mapping,
        PipelineConfig {
            query_prefix: profile.query_prefix.to_string(),
            ..Default::default()
        },
    );

    let mut outcomes = Vec::with_capacity(QUERIES.len());
    for query in &QUERIES {
        let t0 = Instant::now();
        let results = pipeline.search(query.text, DEFAULT_INDEX_TOP_K, DEFAULT_RERANK_TOP_K)?;
        let latency = t0.elapsed().as_secs_f64();
        tracing::info!(
            model = profile.name,
            category = query.category,
            latency,
            "query done"
        );
        outcomes.push(QueryOutcome { latency, results });
    }
    Ok(outcomes)
}

// ============================================================================
// DISPLAY
// ============================================================================

fn display(ingest_stats: &[IngestStats], all_outcomes: &[Vec<QueryOutcome>]) {
    let sep = "=".repeat(100);

    // Ingest summary
    println!();
    println!("{sep}");
    println!("INGEST SUMMARY");
    println!("{sep}");
    for (profile, stats) in profiles::ALL.iter().zip(ingest_stats) {
        let status = if stats.skipped { "skipped" } else { "built" };
        println!(
            "  {:>8}: {:6.1} MB | {} vectors | model_load={:.1}s | ingest={:.1}s ({status})",
            profile.name, stats.size_mb, stats.vector_count, stats.model_load, stats.ingest_time
        );
    }

    // Per-query comparison
    for (i, query) in QUERIES.iter().enumerate() {
        println!();
        println!("{sep}");
        let latencies = profiles::ALL
            .iter()
            .zip(all_outcomes)
            .map(|(profile, outcomes)| format!("{}={:.3}s", profile.name, outcomes[i].latency))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("Query {} [{}]: {}", i + 1, query.category, query.text);
        println!("Latency: {latencies}");
        println!("{sep}");

        let header = profiles::ALL
            .iter()
            .map(|profile| format!("{:^width$}", profile.name, width = COL_WIDTH))
            .collect::<Vec<_>>()
            .join(" | ");
        let divider = profiles::ALL
            .iter()
            .map(|_| "-".repeat(COL_WIDTH))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("     {header}");
        println!("     {divider}");

        let max_rows = all_outcomes
            .iter()
            .map(|outcomes| outcomes[i].results.len())
            .max()
            .unwrap_or(0);
        for rank in 0..max_rows {
            let row = all_outcomes
                .iter()
                .map(|outcomes| match outcomes[i].results.get(rank) {
                    Some(result) => {
                        let entry = format!("[{:.3}] {}", result.score, result.reference());
                        format!("{entry:<width$}", width = COL_WIDTH)
                    }
                    None => " ".repeat(COL_WIDTH),
                })
                .collect::<Vec<_>>()
                .join(" | ");
            println!("  {}. {row}", rank + 1);
        }
    }

    // Summary statistics
    println!();
    println!("{sep}");
    println!("SUMMARY");
    println!("{sep}");
    for (profile, outcomes) in profiles::ALL.iter().zip(all_outcomes) {
        let avg_latency =
            outcomes.iter().map(|o| o.latency).sum::<f64>() / outcomes.len() as f64;
        let avg_top1 = outcomes
            .iter()
            .map(|o| o.results.first().map_or(0.0, |r| f64::from(r.score)))
            .sum::<f64>()
            / outcomes.len() as f64;
        println!(
            "  {:>8}: avg_latency={avg_latency:.3}s | avg_top1_score={avg_top1:.3}",
            profile.name
        );
    }
    println!();
}

// ============================================================================
// TESTS
// ============================================================================
