//! Document loading.
//!
//! All file I/O for the chunking commands lives here: the chunkers
//! themselves only ever see strings. PDFs go through `pdf-extract`;
//! markdown and plain text are read as-is.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load a document's text content based on its file extension.
///
/// Supported: `.pdf` (text extraction), `.md`, `.markdown`, `.txt`.
pub fn load_document(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => pdf_extract::extract_text(path)
            .with_context(|| format!("Failed to extract text from {}", path.display())),
        "md" | "markdown" | "txt" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        other => bail!(
            "Unsupported file format '.{}' for {} (expected .pdf, .md, .markdown, or .txt)",
            other,
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_markdown_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cv.md");
        std::fs::write(&path, "# CV\ncontent here").unwrap();
        assert_eq!(load_document(&path).unwrap(), "# CV\ncontent here");
    }

    #[test]
    fn rejects_unknown_extensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cv.docx");
        std::fs::write(&path, "whatever").unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn invalid_pdf_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cv.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();
        assert!(load_document(&path).is_err());
    }
}
