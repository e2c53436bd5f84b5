//! Q&A document chunking.
//!
//! FAQ-style documents mark each question with a `##` header; every
//! question-answer pair becomes exactly one chunk, with the question as the
//! heading and a `Q: … / A: …` body.

use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::loader;
use crate::models::{ChunkKind, Passage};
use crate::normalize::normalize;
use crate::records;

static QA_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## +([^\n]+)$").expect("valid qa header regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const INTERROGATIVES: &[&str] = &["what", "how", "why", "where", "when", "who", "which"];

/// Chunk a Q&A document: one passage per `## question` header. Text before
/// the first header is introductory and ignored. Documents without headers
/// yield an empty vector.
pub fn chunk_qa(text: &str) -> Vec<Passage> {
    let cleaned = normalize(text);

    let headers: Vec<(usize, usize, String)> = QA_HEADER
        .captures_iter(&cleaned)
        .map(|caps| {
            let whole = caps.get(0).expect("match group 0");
            (whole.start(), whole.end(), caps[1].trim().to_string())
        })
        .collect();

    let mut passages = Vec::new();
    for (i, (_, header_end, raw_question)) in headers.iter().enumerate() {
        let answer_end = headers
            .get(i + 1)
            .map(|next| next.0)
            .unwrap_or(cleaned.len());
        let answer = cleaned[*header_end..answer_end].trim();
        let question = clean_question(raw_question);

        let body = format!("Q: {}\n\nA: {}", question, answer);
        passages.push(Passage::new(
            body,
            question,
            ChunkKind::Qa,
            String::new(),
        ));
    }
    passages
}

/// Normalize question whitespace and add a missing `?` when the text reads
/// like a question.
fn clean_question(question: &str) -> String {
    let question = WHITESPACE.replace_all(question.trim(), " ").to_string();
    if question.is_empty() || question.ends_with('?') {
        return question;
    }
    let lowered = question.to_lowercase();
    if INTERROGATIVES.iter().any(|w| lowered.contains(w)) {
        format!("{}?", question)
    } else {
        question
    }
}

/// `cvc qa` — chunk a Q&A markdown file into JSONL records.
pub fn run_qa(input: &Path, source: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let text = loader::load_document(input)?;
    let passages = chunk_qa(&text);

    if passages.is_empty() {
        println!("qa {}", input.display());
        println!("  no Q&A pairs found (questions must use ## headers)");
        return Ok(());
    }

    let source = source.unwrap_or_else(|| crate::ingest::default_label(input));
    let output = output.unwrap_or_else(|| input.with_extension("chunks.jsonl"));

    let mut metadata = BTreeMap::new();
    metadata.insert(
        "filename".to_string(),
        serde_json::json!(input.file_name().map(|n| n.to_string_lossy().to_string())),
    );
    metadata.insert(
        "processing_method".to_string(),
        serde_json::json!("qa_chunker"),
    );

    let records = records::assemble(passages, &source, &metadata);
    records::write_jsonl(&records, &output)?;

    println!("qa {}", input.display());
    println!("  pairs written: {}", records.len());
    println!("  output: {}", output.display());
    println!("ok");
    Ok(())
}
