//! Single-document and batch chunking commands.
//!
//! `cvc chunk` turns one document into a JSONL record file; `cvc batch`
//! walks a directory and processes every matching file into a combined
//! file. Batch processing is per-document fault tolerant: a file that fails
//! to load or parse is reported and skipped, and the rest of the batch
//! continues.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::blog::slugify;
use crate::chunk::{chunk_document, ChunkProfile};
use crate::config::Config;
use crate::loader;
use crate::models::ChunkRecord;
use crate::records;

/// Resolve a profile name from the CLI into a configured [`ChunkProfile`].
pub fn profile_for(config: &Config, name: &str) -> Result<ChunkProfile> {
    match name {
        "cv" => Ok(ChunkProfile::cv(config.chunking.cv.bounds())),
        "blog" => Ok(ChunkProfile::blog(config.chunking.blog.bounds())),
        "readme" => Ok(ChunkProfile::readme(config.chunking.readme.bounds())),
        other => bail!("Unknown profile: '{}'. Use cv, blog, or readme.", other),
    }
}

/// `cvc chunk` — chunk a single document into JSONL records.
pub fn run_chunk(
    config: &Config,
    input: &Path,
    profile_name: &str,
    source: Option<String>,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let profile = profile_for(config, profile_name)?;
    let text = loader::load_document(input)?;
    let passages = chunk_document(&text, &profile);

    if dry_run {
        let total_words: usize = passages.iter().map(|p| p.word_count).sum();
        println!("chunk {} (dry-run)", input.display());
        println!("  profile: {}", profile_name);
        println!("  chunks: {}", passages.len());
        println!("  total words: {}", total_words);
        return Ok(());
    }

    let label = source.unwrap_or_else(|| default_label(input));
    let metadata = document_metadata(input, profile_name, &profile);
    let recs = records::assemble(passages, &label, &metadata);

    let output = output.unwrap_or_else(|| input.with_extension("chunks.jsonl"));
    records::write_jsonl(&recs, &output)?;

    println!("chunk {}", input.display());
    println!("  profile: {}", profile_name);
    println!("  source label: {}", label);
    println!("  chunks written: {}", recs.len());
    println!("  output: {}", output.display());
    println!("ok");
    Ok(())
}

/// `cvc batch` — chunk every matching document under a directory into one
/// combined JSONL file.
pub fn run_batch(
    config: &Config,
    dir: &Path,
    profile_name: &str,
    output: &Path,
) -> Result<()> {
    let profile = profile_for(config, profile_name)?;
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let include_set = build_globset(&config.batch.include_globs)?;
    let exclude_set = build_globset(&config.batch.exclude_globs)?;

    let mut files: Vec<(PathBuf, String)> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }
        files.push((path.to_path_buf(), rel_str));
    }

    // Sort for deterministic ordering
    files.sort_by(|a, b| a.1.cmp(&b.1));

    let mut all_records: Vec<ChunkRecord> = Vec::new();
    let mut processed = 0usize;
    let mut skipped = 0usize;

    for (path, rel_str) in &files {
        let text = match loader::load_document(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Warning: skipping {}: {}", rel_str, e);
                skipped += 1;
                continue;
            }
        };

        let passages = chunk_document(&text, &profile);
        let label = batch_label(rel_str);
        let metadata = document_metadata(path, profile_name, &profile);
        all_records.extend(records::assemble(passages, &label, &metadata));
        processed += 1;
    }

    records::write_jsonl(&all_records, output)?;

    println!("batch {}", dir.display());
    println!("  profile: {}", profile_name);
    println!("  files found: {}", files.len());
    println!("  files processed: {}", processed);
    println!("  files skipped: {}", skipped);
    println!("  chunks written: {}", all_records.len());
    println!("  output: {}", output.display());
    println!("ok");
    Ok(())
}

/// Source label for a single document: slugified file stem.
pub(crate) fn default_label(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let slug = slugify(&stem);
    if slug.is_empty() {
        "document".to_string()
    } else {
        slug
    }
}

/// Source label for a batch entry: slugified relative path (sans extension),
/// so files in different subdirectories keep distinct labels.
fn batch_label(rel_path: &str) -> String {
    let without_ext = match rel_path.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => rel_path,
    };
    let slug = slugify(without_ext);
    if slug.is_empty() {
        "document".to_string()
    } else {
        slug
    }
}

fn document_metadata(
    input: &Path,
    profile_name: &str,
    profile: &ChunkProfile,
) -> BTreeMap<String, serde_json::Value> {
    let mut metadata = BTreeMap::new();
    metadata.insert(
        "filename".to_string(),
        serde_json::json!(input.file_name().map(|n| n.to_string_lossy().to_string())),
    );
    metadata.insert("profile".to_string(), serde_json::json!(profile_name));
    metadata.insert(
        "target_words".to_string(),
        serde_json::json!(profile.bounds.target_words),
    );
    metadata.insert(
        "max_words".to_string(),
        serde_json::json!(profile.bounds.max_words),
    );
    metadata
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob: {}", pattern))?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_profile_is_rejected() {
        let err = profile_for(&Config::default(), "resume").unwrap_err();
        assert!(err.to_string().contains("Unknown profile"));
    }

    #[test]
    fn labels_are_slugified() {
        assert_eq!(default_label(Path::new("/tmp/My CV (2024).md")), "my-cv-2024");
        assert_eq!(batch_label("posts/Hello World.md"), "posts-hello-world");
        assert_eq!(batch_label("no_extension"), "no-extension");
    }
}
