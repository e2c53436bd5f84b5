//! Library-level properties of the chunking pipeline.

use cv_corpus::chunk::{chunk_document, ChunkProfile};
use cv_corpus::models::ChunkKind;
use cv_corpus::normalize::normalize;
use cv_corpus::split::Bounds;

fn cv_bounds() -> Bounds {
    Bounds {
        target_words: 100,
        max_words: 150,
        min_words: 15,
    }
}

fn blog_bounds() -> Bounds {
    Bounds {
        target_words: 40,
        max_words: 60,
        min_words: 10,
    }
}

/// A blog-shaped document with enough paragraphs to force size splitting.
fn long_blog_post() -> String {
    let mut text = String::from("## Deep Dive\n");
    for i in 0..12 {
        text.push_str(&format!(
            "Paragraph number {} talks about one more aspect of the system in a dozen \
             or so carefully chosen words that add up.\n\n",
            i
        ));
    }
    text
}

#[test]
fn size_bound_holds_for_every_chunk_but_the_last() {
    let chunks = chunk_document(&long_blog_post(), &ChunkProfile::blog(blog_bounds()));
    assert!(chunks.len() > 2, "expected several chunks");
    for chunk in chunks.iter().take(chunks.len() - 1) {
        assert!(
            chunk.word_count <= blog_bounds().max_words,
            "chunk '{}' over budget at {} words",
            chunk.heading,
            chunk.word_count
        );
    }
    assert!(chunks.iter().all(|c| c.word_count >= 1));
}

#[test]
fn no_paragraph_content_is_lost() {
    let text = long_blog_post();
    let chunks = chunk_document(&text, &ChunkProfile::blog(blog_bounds()));
    let joined = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    for i in 0..12 {
        let marker = format!("Paragraph number {} talks", i);
        assert!(joined.contains(&marker), "missing paragraph {}", i);
    }
}

#[test]
fn chunks_appear_in_source_order() {
    let text = long_blog_post();
    let chunks = chunk_document(&text, &ChunkProfile::blog(blog_bounds()));
    let normalized = normalize(&text);

    let mut last_pos = 0usize;
    for chunk in &chunks {
        // The first line of each chunk is a literal substring of the
        // normalized source.
        let first_line = chunk.text.lines().next().unwrap();
        let pos = normalized[last_pos..]
            .find(first_line)
            .map(|p| p + last_pos)
            .unwrap_or_else(|| panic!("chunk start not found after {}: {}", last_pos, first_line));
        assert!(pos >= last_pos);
        last_pos = pos;
    }
}

#[test]
fn repeated_runs_are_identical() {
    let text = long_blog_post();
    let profile = ChunkProfile::blog(blog_bounds());
    let first = chunk_document(&text, &profile);
    for _ in 0..4 {
        assert_eq!(chunk_document(&text, &profile), first);
    }
}

#[test]
fn every_chunk_kind_is_in_the_closed_set() {
    let allowed = [
        "experience",
        "education",
        "skills",
        "projects",
        "personal",
        "general",
        "content",
        "qa",
        "repository_summary",
        "readme_section",
    ];

    let cv = "Professional Experience\nAcme Analytics | 2020-2023\nBuilt streaming data \
              pipelines and dashboards that served thousands of internal users every day\n\
              Globex Systems | 2017-2020\nMaintained billing and invoicing services while \
              improving deployment automation and observability tooling across many teams\n\
              \nMYSTERY HEADING HERE\nan unrecognized heading must still classify to the \
              general category rather than failing or inventing a new kind";
    let chunks = chunk_document(cv, &ChunkProfile::cv(cv_bounds()));
    assert!(!chunks.is_empty());
    for chunk in &chunks {
        let wire = serde_json::to_string(&chunk.kind).unwrap();
        let wire = wire.trim_matches('"');
        assert!(allowed.contains(&wire), "unexpected kind: {}", wire);
    }
    assert!(chunks.iter().any(|c| c.kind == ChunkKind::General));
}
