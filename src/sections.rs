//! Structural section detection.
//!
//! A document is cut into labeled sections by locating structural markers:
//! horizontal rules, bold-only lines, markdown headers, all-caps lines, and
//! inline occurrences of common resume section names. Each marker family is
//! an independent matcher; [`find_markers`] merges all matches and sorts them
//! by position, which is the only step correctness depends on.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{word_count, Section};

/// Minimum word count for a span to survive as a section. Anything shorter
/// is treated as noise or a lone heading with no body.
pub const DEFAULT_MIN_SECTION_WORDS: usize = 10;

static RULE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[-=*]{3,}$").expect("valid rule regex"));
static BOLD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*\*([^*\n]+)\*\*$").expect("valid bold regex"));
static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6} +([^\n]+)$").expect("valid header regex"));
static CAPS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([A-Z][A-Z &/]{7,})$").expect("valid caps regex"));

/// Resume section names matched case-insensitively as whole words anywhere
/// in the text. Longer names come first so the alternation prefers them over
/// contained shorter names ("Professional Experience" over "Experience").
static SECTION_NAMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(publications & presentations|professional experience|academic background|core competencies|technical skills|work experience|key projects|qualifications|publications|volunteering|experience|leadership|education|projects|skills)\b",
    )
    .expect("valid section-name regex")
});

/// Which marker families are active, plus the label for content that
/// precedes the first marker. CVs use every family; blog posts and READMEs
/// are split on markdown headers only.
#[derive(Debug, Clone)]
pub struct SectionRules {
    pub leading_heading: String,
    pub min_section_words: usize,
    pub detect_rules: bool,
    pub detect_bold: bool,
    pub detect_headers: bool,
    pub detect_caps: bool,
    pub detect_keywords: bool,
}

impl SectionRules {
    pub fn cv() -> Self {
        SectionRules {
            leading_heading: "Profile".to_string(),
            min_section_words: DEFAULT_MIN_SECTION_WORDS,
            detect_rules: true,
            detect_bold: true,
            detect_headers: true,
            detect_caps: true,
            detect_keywords: true,
        }
    }

    /// Header-only splitting, used by the blog and README profiles.
    pub fn headers_only(leading_heading: &str, min_section_words: usize) -> Self {
        SectionRules {
            leading_heading: leading_heading.to_string(),
            min_section_words,
            detect_rules: false,
            detect_bold: false,
            detect_headers: true,
            detect_caps: false,
            detect_keywords: false,
        }
    }
}

/// A structural marker found in the text. `heading` is empty for markers
/// that separate without labeling (horizontal rules).
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub start: usize,
    pub end: usize,
    pub heading: String,
}

/// Collect markers from every active matcher and sort them by position.
///
/// The sort is stable and keyed on the start offset alone, so ties keep the
/// fixed matcher order; output is deterministic for identical input.
pub fn find_markers(text: &str, rules: &SectionRules) -> Vec<Marker> {
    let mut markers = Vec::new();

    if rules.detect_rules {
        for m in RULE_LINE.find_iter(text) {
            markers.push(Marker {
                start: m.start(),
                end: m.end(),
                heading: String::new(),
            });
        }
    }
    if rules.detect_bold {
        for caps in BOLD_LINE.captures_iter(text) {
            let whole = caps.get(0).expect("match group 0");
            markers.push(Marker {
                start: whole.start(),
                end: whole.end(),
                heading: caps[1].trim().to_string(),
            });
        }
    }
    if rules.detect_headers {
        for caps in HEADER_LINE.captures_iter(text) {
            let whole = caps.get(0).expect("match group 0");
            markers.push(Marker {
                start: whole.start(),
                end: whole.end(),
                heading: caps[1].trim().to_string(),
            });
        }
    }
    if rules.detect_caps {
        for caps in CAPS_LINE.captures_iter(text) {
            let whole = caps.get(0).expect("match group 0");
            markers.push(Marker {
                start: whole.start(),
                end: whole.end(),
                heading: caps[1].trim().to_string(),
            });
        }
    }
    if rules.detect_keywords {
        for m in SECTION_NAMES.find_iter(text) {
            markers.push(Marker {
                start: m.start(),
                end: m.end(),
                heading: m.as_str().to_string(),
            });
        }
    }

    markers.sort_by_key(|m| m.start);
    markers
}

/// Partition text into labeled sections at marker boundaries.
///
/// The heading nearest above a span labels it; content before the first
/// labeled marker gets the rules' leading heading. Spans below the minimum
/// word threshold are dropped. With no markers at all the whole text becomes
/// a single section under the leading heading.
pub fn split_sections(text: &str, rules: &SectionRules) -> Vec<Section> {
    let markers = find_markers(text, rules);

    let mut sections = Vec::new();
    let mut pos = 0usize;
    let mut heading = rules.leading_heading.clone();

    for marker in &markers {
        if marker.start > pos {
            push_span(&mut sections, &text[pos..marker.start], &heading, rules);
        }
        if !marker.heading.is_empty() {
            heading = marker.heading.clone();
        }
        // Markers can overlap (a caps line that is also a section name);
        // position only ever moves forward.
        pos = pos.max(marker.end);
    }

    if pos < text.len() {
        push_span(&mut sections, &text[pos..], &heading, rules);
    }

    sections
}

fn push_span(sections: &mut Vec<Section>, span: &str, heading: &str, rules: &SectionRules) {
    let body = span.trim();
    if word_count(body) < rules.min_section_words {
        return;
    }
    sections.push(Section {
        heading: heading.to_string(),
        body: body.to_string(),
    });
}
