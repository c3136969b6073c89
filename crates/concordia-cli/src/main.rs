//! Concordia CLI
//!
//! Command-line interface for semantic search over the French Bible:
//! ingest the verse corpus, query it, compare model profiles, and inspect
//! artifacts.

mod bench;
mod profiles;
mod sanitize;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

use concordia_core::{
    load_artifacts, relevance_label, ArtifactPaths, EncoderConfig, FastembedEncoder,
    FastembedReranker, IngestConfig, PipelineConfig, SearchPipeline, VerseIndexConfig,
    DEFAULT_CONTEXT_RADIUS, DEFAULT_INDEX_TOP_K, DEFAULT_RERANK_TOP_K, RELEVANCE_THRESHOLD,
};

use crate::profiles::ModelProfile;
use crate::sanitize::sanitize_query;

/// Concordia - French Bible Semantic Search
#[derive(Parser)]
#[command(name = "concordia")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Semantic search over the French Bible (Segond 1910)")]
#[command(
    long_about = "Two-stage semantic search over the French Bible.\n\nVerses are retrieved with an HNSW vector index, rescored with a cross-encoder, and returned with [0, 1] relevance scores."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build search artifacts from the verse database
    Ingest {
        /// Path to the SQLite verse database
        db: PathBuf,

        /// Embedding model profile (minilm, e5-large)
        #[arg(long, default_value = "minilm")]
        model: String,

        /// Directory for index and mapping artifacts
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Rebuild even if artifacts already exist
        #[arg(long)]
        force: bool,
    },

    /// Search the ingested corpus
    Search {
        /// Natural-language query (French)
        query: String,

        /// Embedding model profile (minilm, e5-large)
        #[arg(long, default_value = "minilm")]
        model: String,

        /// Directory holding the artifacts
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Number of results to return
        #[arg(long, default_value_t = DEFAULT_RERANK_TOP_K)]
        top_k: usize,

        /// Candidate pool size for the vector-search stage
        #[arg(long, default_value_t = DEFAULT_INDEX_TOP_K)]
        candidates: usize,

        /// Show surrounding verses for each result
        #[arg(long)]
        context: bool,

        /// Drop results scoring below this threshold
        #[arg(long)]
        min_score: Option<f32>,

        /// Emit results as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Compare embedding model profiles over a fixed query set
    Bench {
        /// Path to the SQLite verse database
        db: PathBuf,

        /// Directory for per-model artifacts
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Rebuild indexes even if they exist
        #[arg(long)]
        force_ingest: bool,

        /// Skip the ingest phase (artifacts must exist)
        #[arg(long)]
        skip_ingest: bool,
    },

    /// Show statistics for an ingested corpus
    Stats {
        /// Embedding model profile (minilm, e5-large)
        #[arg(long, default_value = "minilm")]
        model: String,

        /// Directory holding the artifacts
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logging goes to stderr; stdout carries results and JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            db,
            model,
            data_dir,
            force,
        } => run_ingest(db, model, data_dir, force),
        Commands::Search {
            query,
            model,
            data_dir,
            top_k,
            candidates,
            context,
            min_score,
            json,
        } => run_search(query, model, data_dir, top_k, candidates, context, min_score, json),
        Commands::Bench {
            db,
            data_dir,
            force_ingest,
            skip_ingest,
        } => bench::run_bench(&db, data_dir, force_ingest, skip_ingest),
        Commands::Stats { model, data_dir } => run_stats(model, data_dir),
    }
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

pub(crate) fn resolve_profile(name: &str) -> anyhow::Result<&'static ModelProfile> {
    profiles::lookup(name).ok_or_else(|| {
        let known: Vec<&str> = profiles::ALL.iter().map(|p| p.name).collect();
        anyhow::anyhow!("unknown model '{name}' (available: {})", known.join(", "))
    })
}

pub(crate) fn resolve_data_dir(data_dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir);
    }
    ProjectDirs::from("org", "concordia", "concordia")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("could not determine a data directory; pass --data-dir"))
}

pub(crate) fn build_encoder(profile: &ModelProfile) -> anyhow::Result<FastembedEncoder> {
    let config = EncoderConfig {
        model: profile.model.clone(),
        dimensions: profile.dimensions,
        ..Default::default()
    };
    Ok(FastembedEncoder::with_config(config)?)
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Run ingest command
fn run_ingest(
    db: PathBuf,
    model: String,
    data_dir: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    let profile = resolve_profile(&model)?;
    let dir = resolve_data_dir(data_dir)?;
    let paths = ArtifactPaths::in_dir(&dir, profile.stem);

    println!("{}", "=== Concordia Ingest ===".cyan().bold());
    println!("{}: {}", "Database".white().bold(), db.display());
    println!("{}: {}", "Model".white().bold(), profile.name);
    println!();

    if paths.exist() && !force {
        println!(
            "{}",
            "Artifacts already exist, nothing to do (use --force to rebuild).".yellow()
        );
        return Ok(());
    }

    let encoder = build_encoder(profile)?;
    let config = IngestConfig {
        passage_prefix: profile.passage_prefix.to_string(),
        ..Default::default()
    };

    let report = concordia_core::run_ingest(&db, &encoder, &paths, &config)?;

    println!("{}: {}", "Fetched".white().bold(), report.fetched);
    println!("{}: {}", "Indexed".white().bold(), report.indexed);
    println!(
        "{}: {}",
        "Filtered out".white().bold(),
        report.fetched - report.indexed
    );
    println!("{}: {}", "Index".white().bold(), paths.index.display());
    println!("{}: {}", "Mapping".white().bold(), paths.mapping.display());
    println!();
    println!("{}", "Ingest complete.".green().bold());
    Ok(())
}

/// Run search command
#[allow(clippy::too_many_arguments)]
fn run_search(
    raw_query: String,
    model: String,
    data_dir: Option<PathBuf>,
    top_k: usize,
    candidates: usize,
    context: bool,
    min_score: Option<f32>,
    json: bool,
) -> anyhow::Result<()> {
    let query = sanitize_query(&raw_query);
    if query.is_empty() {
        anyhow::bail!("query is empty after sanitization");
    }

    let profile = resolve_profile(&model)?;
    let dir = resolve_data_dir(data_dir)?;
    let paths = ArtifactPaths::in_dir(&dir, profile.stem);
    if !paths.exist() {
        anyhow::bail!(
            "no ingested corpus for model '{}' under {} (run `concordia ingest` first)",
            profile.name,
            dir.display()
        );
    }

    let (index, mapping) =
        load_artifacts(&paths, VerseIndexConfig::with_dimensions(profile.dimensions))?;
    let encoder = build_encoder(profile)?;
    let reranker = FastembedReranker::new()?;
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

    let mut results = pipeline.search(&query, candidates, top_k)?;
    if let Some(threshold) = min_score {
        results.retain(|r| r.score >= threshold);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("{}", "=== Concordia Search ===".cyan().bold());
    println!("{}: {}", "Query".white().bold(), query);
    println!();

    if results.is_empty() {
        println!("{}", "No results.".dimmed());
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        let score = format!("[{:.3}]", result.score);
        let score = if result.score >= RELEVANCE_THRESHOLD {
            score.green().bold()
        } else {
            score.yellow()
        };
        println!(
            "{}. {} {}  {}",
            rank + 1,
            score,
            result.reference().white().bold(),
            format!("({})", relevance_label(result.score)).dimmed(),
        );
        println!("   {}", result.text);

        if context {
            for entry in pipeline.context(result, DEFAULT_CONTEXT_RADIUS) {
                if entry.is_match {
                    continue;
                }
                println!(
                    "      {}  {}",
                    format!("{}:{}", entry.chapter, entry.verse).dimmed(),
                    entry.text.dimmed()
                );
            }
        }
        println!();
    }

    Ok(())
}

/// Run stats command
fn run_stats(model: String, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let profile = resolve_profile(&model)?;
    let dir = resolve_data_dir(data_dir)?;
    let paths = ArtifactPaths::in_dir(&dir, profile.stem);
    if !paths.exist() {
        anyhow::bail!(
            "no ingested corpus for model '{}' under {}",
            profile.name,
            dir.display()
        );
    }

    let (index, mapping) =
        load_artifacts(&paths, VerseIndexConfig::with_dimensions(profile.dimensions))?;
    let stats = index.stats();

    println!("{}", "=== Concordia Corpus Statistics ===".cyan().bold());
    println!();
    println!("{}: {}", "Model".white().bold(), profile.name);
    println!("{}: {}", "Indexed Verses".white().bold(), stats.indexed_vectors);
    println!("{}: {}", "Books".white().bold(), mapping.book_count());
    println!("{}: {}", "Dimensions".white().bold(), stats.dimensions);
    println!("{}: {}", "Connectivity".white().bold(), stats.connectivity);
    println!(
        "{}: {:.1} MB",
        "Index Size".white().bold(),
        stats.serialized_bytes as f64 / (1024.0 * 1024.0)
    );
    println!("{}: {}", "Artifacts".white().bold(), dir.display());
    Ok(())
}
