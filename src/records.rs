//! Record assembly and JSONL interchange.
//!
//! The line-delimited record file is the contract between the chunking and
//! embedding stages: one self-contained JSON object per line, so the
//! embedding step can stream records and survive a bad line without losing
//! the rest of the file.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::models::{ChunkRecord, Passage};

/// Attach ids and shared metadata to passages, in emission order.
///
/// Ids are `"{source_label}-{index}"` with a 0-based index local to this
/// document; callers processing several documents together must keep source
/// labels unique across them.
pub fn assemble(
    passages: Vec<Passage>,
    source_label: &str,
    metadata: &BTreeMap<String, Value>,
) -> Vec<ChunkRecord> {
    passages
        .into_iter()
        .enumerate()
        .map(|(index, passage)| ChunkRecord {
            id: format!("{}-{}", source_label, index),
            chunk_index: index,
            text: passage.text,
            source: source_label.to_string(),
            heading: passage.heading,
            chunk_type: passage.kind,
            word_count: passage.word_count,
            parent_heading: passage.parent_heading,
            metadata: metadata.clone(),
        })
        .collect()
}

/// Write records to a JSONL file, creating parent directories as needed.
pub fn write_jsonl(records: &[ChunkRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    for record in records {
        let line = serde_json::to_string(record)?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read records from a JSONL file. A malformed line is reported with its
/// line number and skipped; the rest of the file is still loaded.
pub fn read_jsonl(path: &Path) -> Result<Vec<ChunkRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ChunkRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => eprintln!("Warning: skipping line {}: {}", line_no + 1, e),
        }
    }
    Ok(records)
}
