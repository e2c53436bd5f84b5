//! Size-bounded splitting.
//!
//! The universal fallback for any section without stronger structural cues:
//! greedily packs paragraphs (or lines, or sentences) into chunks bounded by
//! a maximum word budget.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{word_count, ChunkKind, Passage};

static PARA_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("valid paragraph regex"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?]+)\s+").expect("valid sentence regex"));

/// Word-count bounds for one document profile.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub target_words: usize,
    pub max_words: usize,
    pub min_words: usize,
}

/// Split text into passages no larger than `bounds.max_words`.
///
/// Paragraphs are the packing unit; when the text has no blank lines, lines
/// are used instead. A single unit that alone exceeds the budget is split
/// into sentences and packed the same way. A new chunk starts only once the
/// running buffer already holds `min_words`, except that the final buffer is
/// always emitted as long as it has at least one word — losing trailing
/// content is worse than one undersized chunk.
///
/// Multi-chunk output gets "(Part 2)", "(Part 3)", … heading suffixes.
/// Empty or all-whitespace input yields an empty vector.
pub fn split_by_size(text: &str, heading: &str, kind: ChunkKind, bounds: Bounds) -> Vec<Passage> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let (units, sep) = packing_units(text);
    let mut pieces: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut buf_words = 0usize;

    for unit in units {
        let unit_words = word_count(unit);

        if unit_words > bounds.max_words {
            if !buf.is_empty() {
                pieces.push(std::mem::take(&mut buf));
                buf_words = 0;
            }
            pack_sentences(unit, bounds.max_words, &mut pieces);
            continue;
        }

        if buf_words + unit_words > bounds.max_words && buf_words >= bounds.min_words {
            pieces.push(std::mem::take(&mut buf));
            buf_words = 0;
        }
        if !buf.is_empty() {
            buf.push_str(sep);
        }
        buf.push_str(unit);
        buf_words += unit_words;
    }

    if !buf.is_empty() {
        pieces.push(buf);
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            Passage::new(piece, part_heading(heading, i), kind, heading.to_string())
        })
        .collect()
}

/// Heading for the `index`-th chunk of a section: bare for the first,
/// "(Part N)" suffixed from the second on.
pub fn part_heading(heading: &str, index: usize) -> String {
    if index == 0 {
        heading.to_string()
    } else {
        format!("{} (Part {})", heading, index + 1)
    }
}

/// Choose packing units: blank-line paragraphs when present, otherwise
/// individual lines.
fn packing_units(text: &str) -> (Vec<&str>, &'static str) {
    let paragraphs: Vec<&str> = PARA_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.len() > 1 {
        return (paragraphs, "\n\n");
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() > 1 {
        return (lines, "\n");
    }

    (paragraphs, "\n\n")
}

/// Greedily pack sentences into chunks bounded by `max_words`. Used for a
/// paragraph too large to pack whole; here the floor is simply a non-empty
/// buffer, since sentence granularity is already as fine as we go.
fn pack_sentences(text: &str, max_words: usize, pieces: &mut Vec<String>) {
    let mut buf = String::new();
    let mut buf_words = 0usize;

    for sentence in split_sentences(text) {
        let sentence_words = word_count(sentence);
        if buf_words + sentence_words > max_words && !buf.is_empty() {
            pieces.push(std::mem::take(&mut buf));
            buf_words = 0;
        }
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(sentence);
        buf_words += sentence_words;
    }

    if !buf.is_empty() {
        pieces.push(buf);
    }
}

/// Split on sentence-ending punctuation followed by whitespace, keeping the
/// punctuation with the sentence it closes.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;

    for caps in SENTENCE_END.captures_iter(text) {
        let punct = caps.get(1).expect("punctuation group");
        let whole = caps.get(0).expect("match group 0");
        let sentence = text[start..punct.end()].trim();
        if !sentence.is_empty() {
            out.push(sentence);
        }
        start = whole.end();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        target_words: 10,
        max_words: 20,
        min_words: 5,
    };

    fn para(n: usize, tag: &str) -> String {
        (0..n).map(|i| format!("{}{}", tag, i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(split_by_size("", "H", ChunkKind::General, BOUNDS).is_empty());
        assert!(split_by_size("  \n \n ", "H", ChunkKind::General, BOUNDS).is_empty());
    }

    #[test]
    fn small_text_is_a_single_chunk_with_bare_heading() {
        let chunks = split_by_size("just a few words here", "About", ChunkKind::General, BOUNDS);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].heading, "About");
        assert_eq!(chunks[0].parent_heading, "About");
        assert_eq!(chunks[0].word_count, 5);
    }

    #[test]
    fn packs_paragraphs_up_to_the_budget() {
        let text = format!("{}\n\n{}\n\n{}", para(12, "a"), para(12, "b"), para(12, "c"));
        let chunks = split_by_size(&text, "Notes", ChunkKind::Content, BOUNDS);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.word_count <= BOUNDS.max_words, "chunk over budget");
        }
        assert_eq!(chunks[0].heading, "Notes");
        assert_eq!(chunks[1].heading, "Notes (Part 2)");
    }

    #[test]
    fn final_small_buffer_is_still_emitted() {
        let text = format!("{}\n\ntiny tail", para(19, "w"));
        let chunks = split_by_size(&text, "Notes", ChunkKind::General, BOUNDS);
        let last = chunks.last().unwrap();
        assert_eq!(last.text, "tiny tail");
        assert!(last.word_count >= 1);
    }

    #[test]
    fn falls_back_to_lines_when_no_blank_lines() {
        let text = (0..8)
            .map(|i| para(6, &format!("l{}x", i)))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = split_by_size(&text, "List", ChunkKind::General, BOUNDS);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.word_count <= BOUNDS.max_words);
        }
    }

    #[test]
    fn oversized_paragraph_is_split_on_sentences() {
        let sentences: Vec<String> = (0..6).map(|i| format!("Sentence number {} has five words.", i)).collect();
        let text = sentences.join(" ");
        let chunks = split_by_size(&text, "Story", ChunkKind::Content, BOUNDS);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.word_count <= BOUNDS.max_words);
        }
        // No content lost: every sentence appears somewhere.
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
        for s in &sentences {
            assert!(joined.contains(s.as_str()));
        }
    }

    #[test]
    fn chunks_preserve_source_order() {
        let text = format!("{}\n\n{}\n\n{}", para(12, "a"), para(12, "b"), para(12, "c"));
        let chunks = split_by_size(&text, "Notes", ChunkKind::General, BOUNDS);
        assert!(chunks[0].text.contains("a0"));
        assert!(chunks.last().unwrap().text.contains("c11"));
    }

    #[test]
    fn part_heading_numbering() {
        assert_eq!(part_heading("Skills", 0), "Skills");
        assert_eq!(part_heading("Skills", 1), "Skills (Part 2)");
        assert_eq!(part_heading("Skills", 4), "Skills (Part 5)");
    }
}
