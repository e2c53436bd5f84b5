//! Semantic search over the embedded corpus.
//!
//! Embeds the query with the configured provider, searches Qdrant, and
//! prints ranked passages. [`retrieve`] is shared with the ask command.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::embedding;
use crate::qdrant::{QdrantStore, ScoredHit};

/// Embed a query and return the top matching chunks above the configured
/// score threshold.
pub async fn retrieve(
    config: &Config,
    query: &str,
    limit: Option<usize>,
    kind: Option<&str>,
) -> Result<Vec<ScoredHit>> {
    if !config.embedding.is_enabled() {
        bail!("Search requires embeddings. Set [embedding] provider in config.");
    }

    let provider = embedding::create_provider(&config.embedding)?;
    let vector = embedding::embed_query(provider.as_ref(), &config.embedding, query).await?;

    let store = QdrantStore::from_config(&config.qdrant)?;
    store
        .search(
            &vector,
            limit.unwrap_or(config.retrieval.top_k),
            config.retrieval.min_score,
            kind,
        )
        .await
}

pub async fn run_search(
    config: &Config,
    query: &str,
    kind: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let hits = retrieve(config, query, limit, kind.as_deref()).await?;
    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "{}. [{:.3}] {} ({})",
            i + 1,
            hit.score,
            hit.record.heading,
            hit.record.chunk_type
        );
        println!(
            "   source: {}   words: {}",
            hit.record.source, hit.record.word_count
        );
        println!("   {}", snippet(&hit.record.text, 160));
        println!();
    }
    Ok(())
}

/// Single-line preview of a chunk body, truncated on a char boundary.
fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let truncated: String = flat.chars().take(max_chars).collect();
        format!("{}…", truncated)
    }
}
