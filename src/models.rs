//! Core data types shared across the chunking and retrieval pipeline.
//!
//! These types represent the sections, passages, and chunk records that flow
//! from a raw document through the chunkers to the embedding stage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of passage categories.
///
/// The first six describe CV sections; the rest tag passages produced by the
/// blog, Q&A, and GitHub front ends. Wire names are snake_case and match the
/// JSONL interchange format consumed by the embedding stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Experience,
    Education,
    Skills,
    Projects,
    Personal,
    General,
    Content,
    Qa,
    RepositorySummary,
    ReadmeSection,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Experience => "experience",
            ChunkKind::Education => "education",
            ChunkKind::Skills => "skills",
            ChunkKind::Projects => "projects",
            ChunkKind::Personal => "personal",
            ChunkKind::General => "general",
            ChunkKind::Content => "content",
            ChunkKind::Qa => "qa",
            ChunkKind::RepositorySummary => "repository_summary",
            ChunkKind::ReadmeSection => "readme_section",
        }
    }
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structurally delimited region of a document, prior to sub-chunking.
#[derive(Debug, Clone)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// A retrieval-sized passage produced by a sub-chunker, before record
/// assembly attaches an id and source label.
///
/// `word_count` is fixed at construction and never recomputed.
/// `parent_heading` is the heading of the enclosing section, kept for
/// provenance only; empty when the passage has no enclosing section.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub text: String,
    pub heading: String,
    pub kind: ChunkKind,
    pub word_count: usize,
    pub parent_heading: String,
}

impl Passage {
    pub fn new(text: String, heading: String, kind: ChunkKind, parent_heading: String) -> Self {
        let word_count = word_count(&text);
        Passage {
            text,
            heading,
            kind,
            word_count,
            parent_heading,
        }
    }
}

/// One line of the JSONL interchange format between chunking and embedding.
///
/// Each record is self-contained and encodable independently of the others,
/// so the embedding stage can stream the file and recover from partial
/// failures line by line. The metadata map is informational and never
/// interpreted by downstream logic; `BTreeMap` keeps serialization
/// byte-stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: String,
    pub chunk_index: usize,
    pub text: String,
    pub source: String,
    pub heading: String,
    pub chunk_type: ChunkKind,
    pub word_count: usize,
    #[serde(default)]
    pub parent_heading: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Count of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names_are_snake_case() {
        let json = serde_json::to_string(&ChunkKind::RepositorySummary).unwrap();
        assert_eq!(json, "\"repository_summary\"");
        let back: ChunkKind = serde_json::from_str("\"readme_section\"").unwrap();
        assert_eq!(back, ChunkKind::ReadmeSection);
    }

    #[test]
    fn passage_word_count_fixed_at_creation() {
        let p = Passage::new(
            "one two  three".to_string(),
            "Heading".to_string(),
            ChunkKind::General,
            String::new(),
        );
        assert_eq!(p.word_count, 3);
    }

    #[test]
    fn record_roundtrips_through_json() {
        let mut metadata = BTreeMap::new();
        metadata.insert("filename".to_string(), serde_json::json!("cv.pdf"));
        let record = ChunkRecord {
            id: "cv-0".to_string(),
            chunk_index: 0,
            text: "Some passage text".to_string(),
            source: "cv".to_string(),
            heading: "Profile".to_string(),
            chunk_type: ChunkKind::Personal,
            word_count: 3,
            parent_heading: "Profile".to_string(),
            metadata,
        };
        let line = serde_json::to_string(&record).unwrap();
        let back: ChunkRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, record);
    }
}
