//! Text normalization applied before structural analysis.
//!
//! Strips markdown table syntax and collapses whitespace while preserving
//! line structure, so the section splitter can still see headings, bullets,
//! and blank-line paragraph breaks. Idempotent by construction.

use regex::Regex;
use std::sync::LazyLock;

static TABLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\|.*\|[ \t]*$\n?").expect("valid table regex"));
static HORIZONTAL_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid whitespace regex"));
static SPACE_AROUND_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\n ?").expect("valid newline regex"));
static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-line regex"));

/// Clean raw document text extracted from PDFs or markdown.
///
/// Pipe-delimited table rows (including `|---|---|` separator rows) are
/// removed, runs of spaces and tabs collapse to a single space, and runs of
/// two or more blank lines collapse to exactly one blank line. Never fails;
/// degenerate input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let text = TABLE_LINE.replace_all(raw, "");
    let text = HORIZONTAL_RUNS.replace_all(&text, " ");
    let text = SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_horizontal_whitespace() {
        assert_eq!(normalize("a  b\tc"), "a b c");
    }

    #[test]
    fn collapses_blank_line_runs_to_one_blank_line() {
        assert_eq!(normalize("para one\n\n\n\npara two"), "para one\n\npara two");
    }

    #[test]
    fn strips_table_rows_and_separators() {
        let input = "Before\n| Name | Role |\n|------|------|\n| Ada | Engineer |\nAfter";
        assert_eq!(normalize(input), "Before\nAfter");
    }

    #[test]
    fn preserves_single_newlines() {
        assert_eq!(normalize("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn idempotent() {
        let input = "| a | b |\n\n\nSome   text\n\n\n\nmore\t\ttext\n";
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn empty_and_whitespace_input_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n\t \n"), "");
    }
}
