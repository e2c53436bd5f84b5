//! GitHub repository chunking.
//!
//! Consumes a JSON export of repository documents (summary text assembled
//! from repo metadata, plus README contents) and produces chunk records.
//! Summaries are usually small enough to stay whole; READMEs are cleaned of
//! markdown noise and run through the header-based section pipeline.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::chunk::{chunk_document, ChunkProfile};
use crate::models::{word_count, ChunkKind, ChunkRecord, Passage};
use crate::records;
use crate::split::{split_by_size, Bounds};

static BADGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!\[[^\]]*\]\([^)]*\)\]\([^)]*\)").expect("valid badge regex")
});
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid image regex"));
static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid code-block regex"));

/// One document from a GitHub export: either a repository summary or a
/// README.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub repo_name: String,
    #[serde(default)]
    pub repo_url: String,
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Chunk a repository summary. Summaries are concise by construction, so
/// most stay a single chunk; oversized ones are size-split.
pub fn chunk_repository_summary(text: &str, repo_name: &str, bounds: Bounds) -> Vec<Passage> {
    if word_count(text) <= bounds.max_words {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        return vec![Passage::new(
            trimmed.to_string(),
            repo_name.to_string(),
            ChunkKind::RepositorySummary,
            String::new(),
        )];
    }
    split_by_size(text, repo_name, ChunkKind::RepositorySummary, bounds)
}

/// Chunk a README: replace badges, images, and fenced code with short
/// placeholders, then split on markdown headers and size-bound each section.
pub fn chunk_readme(text: &str, bounds: Bounds) -> Vec<Passage> {
    let cleaned = clean_readme(text);
    chunk_document(&cleaned, &ChunkProfile::readme(bounds))
}

fn clean_readme(text: &str) -> String {
    let text = BADGE.replace_all(text, "[Badge]");
    let text = IMAGE.replace_all(&text, "[Image]");
    let text = CODE_BLOCK.replace_all(&text, "[Code Block]");
    text.into_owned()
}

/// Chunk one export document into assembled records. Unknown document types
/// are reported and yield nothing, so one odd entry never sinks the batch.
pub fn chunk_github_document(doc: &GithubDocument, bounds: Bounds) -> Vec<ChunkRecord> {
    let (passages, label) = match doc.doc_type.as_str() {
        "repository" => (
            chunk_repository_summary(&doc.text, &doc.repo_name, bounds),
            format!("github-{}", doc.repo_name),
        ),
        "readme" => (
            chunk_readme(&doc.text, bounds),
            format!("github-{}-readme", doc.repo_name),
        ),
        other => {
            eprintln!(
                "Warning: unknown document type '{}' for {}",
                other, doc.repo_name
            );
            return Vec::new();
        }
    };

    let mut metadata = doc.metadata.clone();
    metadata.insert("type".to_string(), serde_json::json!(doc.doc_type));
    metadata.insert("repo_name".to_string(), serde_json::json!(doc.repo_name));
    metadata.insert("repo_url".to_string(), serde_json::json!(doc.repo_url));

    records::assemble(passages, &label, &metadata)
}

/// `cvc github` — chunk a GitHub export (JSON array of documents) into
/// JSONL records. A document that fails to parse is reported and skipped.
pub fn run_github(input: &Path, output: Option<PathBuf>, bounds: Bounds) -> Result<()> {
    let output = output.unwrap_or_else(|| input.with_extension("chunks.jsonl"));
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("Failed to parse GitHub export (expected a JSON array)")?;

    let mut all_records = Vec::new();
    let mut documents = 0usize;
    let mut skipped = 0usize;

    for (i, value) in values.into_iter().enumerate() {
        let doc: GithubDocument = match serde_json::from_value(value) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("Warning: skipping document {}: {}", i, e);
                skipped += 1;
                continue;
            }
        };
        documents += 1;
        all_records.extend(chunk_github_document(&doc, bounds));
    }

    records::write_jsonl(&all_records, &output)?;

    println!("github {}", input.display());
    println!("  documents processed: {}", documents);
    if skipped > 0 {
        println!("  documents skipped: {}", skipped);
    }
    println!("  chunks written: {}", all_records.len());
    println!("  output: {}", output.display());
    println!("ok");
    Ok(())
}
