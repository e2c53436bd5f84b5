//! Blog post chunking.
//!
//! Consumes a JSON export of blog posts (title, content, url, date, tags —
//! the shape produced by an RSS/Medium export step) and chunks each post
//! with the header-based blog profile. Every record carries the post
//! metadata so retrieval can cite the article it came from.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::chunk::{chunk_document, ChunkProfile};
use crate::models::ChunkRecord;
use crate::records;
use crate::split::Bounds;

static ARTIFACT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:share this:|like this:|related articles?:|tags?:|categories?:|filed under:).*$")
        .expect("valid artifact regex")
});
static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// One post from a blog export file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogPost {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub content: String,
}

/// Remove platform boilerplate lines (share links, tag lists) that survive
/// feed extraction.
pub fn strip_artifacts(content: &str) -> String {
    ARTIFACT_LINE.replace_all(content, "").into_owned()
}

/// Lowercased, dash-separated identifier derived from a post title.
pub fn slugify(title: &str) -> String {
    NON_ALNUM
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Chunk a single blog post into assembled records. The slugified title is
/// the source label, so ids look like `how-to-build-a-rag-system-0`.
pub fn chunk_blog_post(post: &BlogPost, bounds: Bounds) -> Vec<ChunkRecord> {
    let content = strip_artifacts(&post.content);
    let passages = chunk_document(&content, &ChunkProfile::blog(bounds));

    let mut label = slugify(&post.title);
    if label.is_empty() {
        label = "post".to_string();
    }

    let mut metadata = std::collections::BTreeMap::new();
    metadata.insert("title".to_string(), serde_json::json!(post.title));
    metadata.insert("author".to_string(), serde_json::json!(post.author));
    metadata.insert("url".to_string(), serde_json::json!(post.url));
    metadata.insert(
        "published_date".to_string(),
        serde_json::json!(post.published_date.map(|d| d.to_rfc3339())),
    );
    metadata.insert("tags".to_string(), serde_json::json!(post.tags));
    metadata.insert("source_type".to_string(), serde_json::json!("blog"));
    metadata.insert(
        "processing_method".to_string(),
        serde_json::json!("blog_chunker"),
    );

    records::assemble(passages, &label, &metadata)
}

/// `cvc blog` — chunk a blog export (JSON array of posts) into JSONL
/// records. A post that fails to parse is reported and skipped.
pub fn run_blog(input: &Path, output: Option<PathBuf>, bounds: Bounds) -> Result<()> {
    let output = output.unwrap_or_else(|| input.with_extension("chunks.jsonl"));
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("Failed to parse blog export (expected a JSON array)")?;

    let mut all_records = Vec::new();
    let mut posts = 0usize;
    let mut skipped = 0usize;

    for (i, value) in values.into_iter().enumerate() {
        let post: BlogPost = match serde_json::from_value(value) {
            Ok(post) => post,
            Err(e) => {
                eprintln!("Warning: skipping post {}: {}", i, e);
                skipped += 1;
                continue;
            }
        };
        posts += 1;
        all_records.extend(chunk_blog_post(&post, bounds));
    }

    records::write_jsonl(&all_records, &output)?;

    println!("blog {}", input.display());
    println!("  posts processed: {}", posts);
    if skipped > 0 {
        println!("  posts skipped: {}", skipped);
    }
    println!("  chunks written: {}", all_records.len());
    println!("  output: {}", output.display());
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChunkKind;

    fn bounds() -> Bounds {
        Bounds {
            target_words: 200,
            max_words: 400,
            min_words: 10,
        }
    }

    #[test]
    fn slugify_produces_stable_labels() {
        assert_eq!(slugify("How to Build a RAG System"), "how-to-build-a-rag-system");
        assert_eq!(slugify("  Rust & Me!  "), "rust-me");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn artifacts_are_stripped() {
        let content = "Real opening paragraph.\nShare this: twitter facebook\nTags: rust, ai\nReal closing paragraph.";
        let cleaned = strip_artifacts(content);
        assert!(cleaned.contains("Real opening paragraph."));
        assert!(cleaned.contains("Real closing paragraph."));
        assert!(!cleaned.contains("twitter"));
        assert!(!cleaned.to_lowercase().contains("tags:"));
    }

    #[test]
    fn post_chunks_carry_metadata_and_slug_ids() {
        let post = BlogPost {
            title: "Shipping a Side Project".to_string(),
            author: "A. Writer".to_string(),
            url: "https://example.com/post".to_string(),
            published_date: None,
            tags: vec!["rust".to_string()],
            content: "## The Idea\nthe opening section describes where the project came \
                      from and what problem it was meant to solve for readers\n\n\
                      ## The Build\nthe second section walks through the implementation \
                      choices and the tradeoffs made along the way to launch"
                .to_string(),
        };
        let records = chunk_blog_post(&post, bounds());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "shipping-a-side-project-0");
        assert!(records.iter().all(|r| r.chunk_type == ChunkKind::Content));
        assert_eq!(records[0].metadata["title"], "Shipping a Side Project");
        assert_eq!(records[0].metadata["source_type"], "blog");
    }

    #[test]
    fn empty_content_yields_no_records() {
        let post = BlogPost {
            title: "Empty".to_string(),
            author: String::new(),
            url: String::new(),
            published_date: None,
            tags: Vec::new(),
            content: String::new(),
        };
        assert!(chunk_blog_post(&post, bounds()).is_empty());
    }
}
