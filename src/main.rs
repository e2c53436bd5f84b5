//! # cv-corpus CLI (`cvc`)
//!
//! The `cvc` binary drives the corpus pipeline: chunk documents into JSONL
//! records, embed and index them in Qdrant, then search or ask questions
//! against the indexed corpus.
//!
//! ## Usage
//!
//! ```bash
//! cvc --config ./config/cvc.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cvc chunk <file>` | Chunk one CV/blog/README document into JSONL |
//! | `cvc batch <dir>` | Chunk every matching document in a directory |
//! | `cvc qa <file>` | Chunk a Q&A markdown file (one chunk per question) |
//! | `cvc blog <file>` | Chunk a blog export (JSON array of posts) |
//! | `cvc github <file>` | Chunk a GitHub export (JSON array of documents) |
//! | `cvc stats <file>` | Summarize a JSONL record file |
//! | `cvc embed <file>` | Embed records and upsert them into Qdrant |
//! | `cvc search "<query>"` | Semantic search over the indexed corpus |
//! | `cvc ask "<question>"` | Answer a question grounded in retrieved chunks |
//!
//! ## Examples
//!
//! ```bash
//! # Chunk a CV and inspect the result
//! cvc chunk cv.pdf --profile cv --source cv
//! cvc stats cv.chunks.jsonl
//!
//! # Embed and index
//! cvc embed cv.chunks.jsonl --recreate
//!
//! # Ask recruiter-style questions
//! cvc search "kubernetes experience"
//! cvc ask "What did they work on most recently?"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cv_corpus::{ask, blog, config, embed_cmd, github, ingest, qa, search, stats};

/// cv-corpus CLI — chunking, embedding, and retrieval for a personal-CV
/// chatbot corpus.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; the offline chunking commands fall back to built-in defaults when
/// the file does not exist.
#[derive(Parser)]
#[command(
    name = "cvc",
    about = "cv-corpus — chunking, embedding, and retrieval pipeline for a personal-CV chatbot",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/cvc.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Chunk a single document into JSONL records.
    ///
    /// Loads the file (PDF, markdown, or plain text), runs the selected
    /// chunking profile, and writes one JSON record per line.
    Chunk {
        /// Document to chunk.
        input: PathBuf,

        /// Chunking profile: `cv`, `blog`, or `readme`.
        #[arg(long, default_value = "cv")]
        profile: String,

        /// Source label for record ids. Defaults to the slugified file stem.
        #[arg(long)]
        source: Option<String>,

        /// Output JSONL path. Defaults to `<input>.chunks.jsonl`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Show chunk counts without writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Chunk every matching document under a directory into one JSONL file.
    ///
    /// Include/exclude globs come from the `[batch]` config section. A file
    /// that fails to load is reported and skipped; the batch continues.
    Batch {
        /// Directory to scan.
        dir: PathBuf,

        /// Chunking profile applied to every file: `cv`, `blog`, or `readme`.
        #[arg(long, default_value = "cv")]
        profile: String,

        /// Combined output JSONL path.
        #[arg(long, default_value = "corpus.chunks.jsonl")]
        output: PathBuf,
    },

    /// Chunk a Q&A markdown file — one chunk per `## question` header.
    Qa {
        /// Q&A document (markdown or plain text).
        input: PathBuf,

        /// Source label for record ids. Defaults to the slugified file stem.
        #[arg(long)]
        source: Option<String>,

        /// Output JSONL path. Defaults to `<input>.chunks.jsonl`.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Chunk a blog export: a JSON array of posts with title and content.
    Blog {
        /// Blog export file (JSON).
        input: PathBuf,

        /// Output JSONL path. Defaults to `<input>.chunks.jsonl`.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Chunk a GitHub export: a JSON array of repository/README documents.
    Github {
        /// GitHub export file (JSON).
        input: PathBuf,

        /// Output JSONL path. Defaults to `<input>.chunks.jsonl`.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Summarize a JSONL record file: counts, word spread, type breakdown.
    Stats {
        /// JSONL record file.
        input: PathBuf,
    },

    /// Embed chunk records and upsert them into Qdrant.
    ///
    /// Requires `[embedding]` and `[qdrant]` to be configured, plus
    /// `OPENAI_API_KEY` (and optionally `QDRANT_API_KEY`) in the
    /// environment. Rerunning overwrites points in place.
    Embed {
        /// JSONL record file produced by the chunking commands.
        input: PathBuf,

        /// Override the batch size from config (texts per API call).
        #[arg(long)]
        batch_size: Option<usize>,

        /// Drop and recreate the collection before upserting.
        #[arg(long)]
        recreate: bool,

        /// Show counts without calling any API.
        #[arg(long)]
        dry_run: bool,
    },

    /// Search the indexed corpus and print ranked passages.
    Search {
        /// The search query.
        query: String,

        /// Restrict results to one chunk type (e.g. `experience`, `skills`).
        #[arg(long)]
        kind: Option<String>,

        /// Maximum number of results (defaults to `retrieval.top_k`).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Answer a question using retrieved chunks as grounding context.
    Ask {
        /// The question to answer.
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Chunk {
            input,
            profile,
            source,
            output,
            dry_run,
        } => {
            ingest::run_chunk(&cfg, &input, &profile, source, output, dry_run)?;
        }
        Commands::Batch {
            dir,
            profile,
            output,
        } => {
            ingest::run_batch(&cfg, &dir, &profile, &output)?;
        }
        Commands::Qa {
            input,
            source,
            output,
        } => {
            qa::run_qa(&input, source, output)?;
        }
        Commands::Blog { input, output } => {
            blog::run_blog(&input, output, cfg.chunking.blog.bounds())?;
        }
        Commands::Github { input, output } => {
            github::run_github(&input, output, cfg.chunking.readme.bounds())?;
        }
        Commands::Stats { input } => {
            stats::run_stats(&input)?;
        }
        Commands::Embed {
            input,
            batch_size,
            recreate,
            dry_run,
        } => {
            embed_cmd::run_embed(&cfg, &input, batch_size, recreate, dry_run).await?;
        }
        Commands::Search { query, kind, limit } => {
            search::run_search(&cfg, &query, kind, limit).await?;
        }
        Commands::Ask { question } => {
            ask::run_ask(&cfg, &question).await?;
        }
    }

    Ok(())
}
