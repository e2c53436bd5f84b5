//! Document chunking pipeline.
//!
//! Raw text flows normalize → section split → classify → sub-chunk. The
//! category sub-chunkers look for entry-level boundaries (individual jobs,
//! degrees, bullet groups); whenever structure is too weak to trust, they
//! fall back to the size-bounded splitter, which is the single universal
//! fallback for every document type.
//!
//! Everything here is pure and synchronous: strings in, passages out, no
//! I/O and no shared state.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::classify::classify;
use crate::models::{word_count, ChunkKind, Passage, Section};
use crate::normalize::normalize;
use crate::sections::{split_sections, SectionRules};
use crate::split::{part_heading, split_by_size, Bounds};

// Entry boundaries within an experience section: bold titles,
// "Company | 2020" lines, bare date ranges, "Company, Location" lines.
static EXP_BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*\*[^*\n]+\*\*").expect("valid bold regex"));
static EXP_PIPE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[A-Z][^|\n]*\|[ ]*\d{4}").expect("valid pipe-date regex"));
static EXP_DATE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d{4} ?[-–] ?\d{4}").expect("valid date-range regex"));
static EXP_COMPANY_LOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[A-Z][A-Za-z &,]+, ?[A-Z]").expect("valid company regex"));

// Entry boundaries within an education section: bold titles, institution
// lines, degree-type lines.
static EDU_INSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[A-Z][^|\n]*(?:University|College|Institute)[^|\n]*")
        .expect("valid institution regex")
});
static EDU_DEGREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:Bachelor|Master|PhD|BSc|MSc|BA|MA)\b[^\n]*").expect("valid degree regex")
});

static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold-span regex"));
static DEGREE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Bachelor|Master|PhD|BSc|MSc|BA|MA)\b[^|\n]*").expect("valid degree-span regex")
});

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[•*-] ").expect("valid bullet regex"));
static BULLET_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[•*-][ ]*").expect("valid bullet-split regex"));

/// How sections of a document are turned into passages.
#[derive(Debug, Clone, Copy)]
pub enum ProfileMode {
    /// Classify each section heading and dispatch to a category sub-chunker.
    Cv,
    /// Size-split every section under a fixed kind (blog posts, READMEs).
    Flat(ChunkKind),
}

/// Per-document-type chunking configuration: word bounds, section detection
/// rules, and the sub-chunking mode.
#[derive(Debug, Clone)]
pub struct ChunkProfile {
    pub bounds: Bounds,
    pub rules: SectionRules,
    pub mode: ProfileMode,
}

impl ChunkProfile {
    pub fn cv(bounds: Bounds) -> Self {
        ChunkProfile {
            bounds,
            rules: SectionRules::cv(),
            mode: ProfileMode::Cv,
        }
    }

    pub fn blog(bounds: Bounds) -> Self {
        ChunkProfile {
            bounds,
            rules: SectionRules::headers_only("Introduction", bounds.min_words),
            mode: ProfileMode::Flat(ChunkKind::Content),
        }
    }

    pub fn readme(bounds: Bounds) -> Self {
        ChunkProfile {
            bounds,
            rules: SectionRules::headers_only("Introduction", bounds.min_words),
            mode: ProfileMode::Flat(ChunkKind::ReadmeSection),
        }
    }
}

/// Chunk one document into ordered passages.
///
/// Passages are non-overlapping, follow source order, and stay within the
/// profile's word bounds apart from the documented final-chunk leniency.
/// Degenerate input yields an empty vector, never an error.
pub fn chunk_document(text: &str, profile: &ChunkProfile) -> Vec<Passage> {
    let cleaned = normalize(text);
    if cleaned.is_empty() {
        return Vec::new();
    }

    let mut passages = Vec::new();
    for section in split_sections(&cleaned, &profile.rules) {
        match profile.mode {
            ProfileMode::Cv => passages.extend(chunk_section(&section, profile.bounds)),
            ProfileMode::Flat(kind) => passages.extend(split_by_size(
                &section.body,
                &section.heading,
                kind,
                profile.bounds,
            )),
        }
    }
    passages
}

/// Dispatch a classified CV section to its sub-chunker.
fn chunk_section(section: &Section, bounds: Bounds) -> Vec<Passage> {
    match classify(&section.heading) {
        ChunkKind::Experience => chunk_experience(&section.body, &section.heading, bounds),
        ChunkKind::Education => chunk_education(&section.body, &section.heading, bounds),
        ChunkKind::Skills => chunk_skills(&section.body, &section.heading, bounds),
        kind => split_by_size(&section.body, &section.heading, kind, bounds),
    }
}

/// Split an experience section into per-role passages.
pub fn chunk_experience(body: &str, heading: &str, bounds: Bounds) -> Vec<Passage> {
    let mut boundaries = BTreeSet::new();
    for re in [&EXP_BOLD, &EXP_PIPE_DATE, &EXP_DATE_RANGE, &EXP_COMPANY_LOC] {
        for m in re.find_iter(body) {
            boundaries.insert(m.start());
        }
    }
    chunk_entries(
        body,
        heading,
        ChunkKind::Experience,
        boundaries,
        extract_experience_title,
        bounds,
    )
}

/// Split an education section into per-degree passages.
pub fn chunk_education(body: &str, heading: &str, bounds: Bounds) -> Vec<Passage> {
    let mut boundaries = BTreeSet::new();
    for re in [&EXP_BOLD, &EDU_INSTITUTION, &EDU_DEGREE] {
        for m in re.find_iter(body) {
            boundaries.insert(m.start());
        }
    }
    chunk_entries(
        body,
        heading,
        ChunkKind::Education,
        boundaries,
        extract_education_title,
        bounds,
    )
}

/// Shared entry-splitting strategy for experience and education sections.
///
/// With fewer than two boundary cues there is not enough structure to trust,
/// so the section falls through to the size-bounded splitter. Otherwise the
/// body is cut at every boundary; the span before the first boundary is kept
/// as a leading segment so no content silently disappears. Segments under
/// the minimum word floor are dropped as noise.
fn chunk_entries(
    body: &str,
    heading: &str,
    kind: ChunkKind,
    boundaries: BTreeSet<usize>,
    extract_title: fn(&str) -> String,
    bounds: Bounds,
) -> Vec<Passage> {
    if boundaries.len() < 2 {
        return split_by_size(body, heading, kind, bounds);
    }

    let mut starts: Vec<usize> = boundaries.into_iter().collect();
    if starts.first().copied() != Some(0) {
        starts.insert(0, 0);
    }

    let mut passages = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(body.len());
        let segment = body[start..end].trim();
        if word_count(segment) < bounds.min_words {
            continue;
        }
        passages.push(Passage::new(
            segment.to_string(),
            extract_title(segment),
            kind,
            heading.to_string(),
        ));
    }
    passages
}

/// Split a skills section at bullet markers and re-pack the items under the
/// word budget. Sections without bullets fall back to size splitting.
pub fn chunk_skills(body: &str, heading: &str, bounds: Bounds) -> Vec<Passage> {
    if !BULLET_LINE.is_match(body) {
        return split_by_size(body, heading, ChunkKind::Skills, bounds);
    }

    let mut items: Vec<&str> = Vec::new();
    for raw in BULLET_SPLIT.split(body) {
        let item = strip_bullet(raw.trim());
        if !item.is_empty() {
            items.push(item);
        }
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut buf_words = 0usize;

    for item in items {
        let candidate = if buf.is_empty() {
            format!("• {}", item)
        } else {
            format!("{}\n• {}", buf, item)
        };
        if word_count(&candidate) > bounds.max_words && buf_words >= bounds.min_words {
            pieces.push(std::mem::take(&mut buf));
            buf = format!("• {}", item);
        } else {
            buf = candidate;
        }
        buf_words = word_count(&buf);
    }
    if !buf.is_empty() {
        pieces.push(buf);
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            Passage::new(
                piece,
                part_heading(heading, i),
                ChunkKind::Skills,
                heading.to_string(),
            )
        })
        .collect()
}

fn strip_bullet(item: &str) -> &str {
    for prefix in ["• ", "* ", "- "] {
        if let Some(rest) = item.strip_prefix(prefix) {
            return rest.trim();
        }
    }
    item
}

/// Pull a role title out of an experience segment: first bold span, else the
/// company half of a "Company | dates" line, else the first short line.
fn extract_experience_title(segment: &str) -> String {
    for line in segment.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = BOLD_SPAN.captures(line) {
            return caps[1].trim().to_string();
        }
        if line.contains('|') && line.chars().any(|c| c.is_ascii_digit()) {
            return line.split('|').next().unwrap_or(line).trim().to_string();
        }
        if word_count(line) <= 10 {
            return line.to_string();
        }
    }
    "Position".to_string()
}

/// Pull a title out of an education segment: bold span, degree phrase,
/// institution line, else the first reasonably short line.
fn extract_education_title(segment: &str) -> String {
    for line in segment.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = BOLD_SPAN.captures(line) {
            return caps[1].trim().to_string();
        }
        if let Some(m) = DEGREE_SPAN.find(line) {
            return m.as_str().trim().to_string();
        }
        let lowered = line.to_lowercase();
        if lowered.contains("university") || lowered.contains("college") {
            return line.to_string();
        }
        if word_count(line) <= 15 {
            return line.to_string();
        }
    }
    "Education".to_string()
}
