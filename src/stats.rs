//! Chunk-file statistics.
//!
//! Quick summary of a JSONL record file: counts, word-count spread, and
//! per-type/per-source breakdowns. Useful for eyeballing chunking quality
//! before paying for embeddings.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::ChunkRecord;
use crate::records;

pub fn run_stats(input: &Path) -> Result<()> {
    let all_records = records::read_jsonl(input)?;

    println!("stats {}", input.display());
    if all_records.is_empty() {
        println!("  no records");
        return Ok(());
    }

    let total_words: usize = all_records.iter().map(|r| r.word_count).sum();
    let min_words = all_records.iter().map(|r| r.word_count).min().unwrap_or(0);
    let max_words = all_records.iter().map(|r| r.word_count).max().unwrap_or(0);

    println!("  chunks:      {}", all_records.len());
    println!("  total words: {}", total_words);
    println!("  avg words:   {}", total_words / all_records.len());
    println!("  min/max:     {} / {}", min_words, max_words);

    println!();
    println!("  by type:");
    for (kind, count) in kind_counts(&all_records) {
        println!("    {:<20} {:>6}", kind, count);
    }

    let sources = source_counts(&all_records);
    if sources.len() > 1 {
        println!();
        println!("  by source:");
        for (source, count) in sources {
            println!("    {:<20} {:>6}", source, count);
        }
    }

    Ok(())
}

fn kind_counts(records: &[ChunkRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.chunk_type.to_string()).or_insert(0) += 1;
    }
    counts
}

fn source_counts(records: &[ChunkRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.source.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChunkKind, Passage};
    use std::collections::BTreeMap as Map;

    #[test]
    fn counts_group_by_kind_and_source() {
        let passages = vec![
            Passage::new("a b c".into(), "A".into(), ChunkKind::Skills, String::new()),
            Passage::new("d e".into(), "B".into(), ChunkKind::Skills, String::new()),
            Passage::new("f g".into(), "C".into(), ChunkKind::General, String::new()),
        ];
        let recs = records::assemble(passages, "cv", &Map::new());
        let kinds = kind_counts(&recs);
        assert_eq!(kinds["skills"], 2);
        assert_eq!(kinds["general"], 1);
        assert_eq!(source_counts(&recs)["cv"], 3);
    }
}
