//! The `cvc embed` command: read chunk records from JSONL, embed them, and
//! upsert the vectors into Qdrant.
//!
//! A failing batch is reported and skipped so one transient API error never
//! throws away the rest of the run; rerunning is safe because point ids are
//! deterministic.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config::Config;
use crate::embedding;
use crate::qdrant::{self, Point, QdrantStore};
use crate::records;

pub async fn run_embed(
    config: &Config,
    input: &Path,
    batch_size_override: Option<usize>,
    recreate: bool,
    dry_run: bool,
) -> Result<()> {
    if !config.embedding.is_enabled() {
        bail!("Embedding provider is disabled. Set [embedding] provider in config.");
    }

    let all_records = records::read_jsonl(input)?;
    if all_records.is_empty() {
        println!("embed {}", input.display());
        println!("  no records found");
        return Ok(());
    }

    if dry_run {
        let total_words: usize = all_records.iter().map(|r| r.word_count).sum();
        println!("embed {} (dry-run)", input.display());
        println!("  records to embed: {}", all_records.len());
        println!("  total words: {}", total_words);
        return Ok(());
    }

    let provider = embedding::create_provider(&config.embedding)?;
    let store = QdrantStore::from_config(&config.qdrant)?;
    store.ensure_collection(provider.dims(), recreate).await?;

    let batch_size = batch_size_override
        .unwrap_or(config.embedding.batch_size)
        .max(1);

    let total = all_records.len();
    let mut embedded = 0u64;
    let mut failed = 0u64;

    for batch in all_records.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|r| r.text.clone()).collect();

        match embedding::embed_texts(provider.as_ref(), &config.embedding, &texts).await {
            Ok(vectors) => {
                let mut points = Vec::with_capacity(batch.len());
                for (record, vector) in batch.iter().zip(vectors) {
                    points.push(Point {
                        id: qdrant::point_id(&record.id),
                        vector,
                        payload: serde_json::to_value(record)?,
                    });
                }
                match store.upsert(points).await {
                    Ok(()) => embedded += batch.len() as u64,
                    Err(e) => {
                        eprintln!("Warning: upsert batch failed: {}", e);
                        failed += batch.len() as u64;
                    }
                }
            }
            Err(e) => {
                eprintln!("Warning: embedding batch failed: {}", e);
                failed += batch.len() as u64;
            }
        }
    }

    let points_total = store.count().await.unwrap_or(0);

    println!("embed {}", input.display());
    println!("  records: {}", total);
    println!("  embedded: {}", embedded);
    println!("  failed: {}", failed);
    println!("  collection points: {}", points_total);
    println!("ok");
    Ok(())
}
