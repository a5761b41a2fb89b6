//! Text extraction from documents
//!
//! Extraction is layout blind: each page is linearized to plain text and
//! pages are joined in order. Failures never propagate; they become a short
//! diagnostic string so comparisons can proceed uniformly.

mod title_block;
mod pdf;

pub use title_block::auto_description;
pub use pdf::PdfTextExtractor;

use crate::error::ExtractError;
use std::path::Path;
use tracing::{debug, warn};

/// Prefix of the diagnostic text returned when extraction fails
pub const EXTRACTION_ERROR_PREFIX: &str = "Error reading PDF";

/// Source of per-page text for a document
pub trait TextExtractor {
    /// Text of every page, in page order
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// Extract the text of a document, reading at most `max_pages` pages.
/// A limit of zero reads every page.
///
/// Every page with text is followed by a newline; pages without text add
/// nothing. On failure the result is `Error reading PDF: <cause>`.
pub fn extract_text(extractor: &dyn TextExtractor, path: &Path, max_pages: Option<usize>) -> String {
    let pages = match extractor.extract_pages(path) {
        Ok(pages) => pages,
        Err(e) => {
            warn!("Text extraction failed for {:?}: {}", path, e);
            return format!("{}: {}", EXTRACTION_ERROR_PREFIX, e);
        }
    };

    let limit = match max_pages {
        Some(n) if n > 0 => n,
        _ => pages.len(),
    };
    let mut text = String::new();

    for page in pages.iter().take(limit) {
        if page.trim().is_empty() {
            continue;
        }
        text.push_str(page);
        text.push('\n');
    }

    debug!(
        "Extracted {} chars from {} of {} pages of {:?}",
        text.len(),
        limit.min(pages.len()),
        pages.len(),
        path
    );
    text
}

/// Suggested description built from the first page of a document
pub fn describe(extractor: &dyn TextExtractor, path: &Path) -> String {
    match extractor.extract_pages(path) {
        Ok(pages) => pages.first().map(|p| auto_description(p)).unwrap_or_default(),
        Err(e) => {
            debug!("No description for {:?}: {}", path, e);
            String::new()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeExtractor;
    use super::*;

    #[test]
    fn test_pages_joined_in_order() {
        let extractor = FakeExtractor::default().with("a.pdf", &["uno", "", "dos", "tres"]);
        assert_eq!(extract_text(&extractor, Path::new("a.pdf"), None), "uno\ndos\ntres\n");
    }

    #[test]
    fn test_max_pages() {
        let extractor = FakeExtractor::default().with("a.pdf", &["uno", "dos", "tres"]);
        assert_eq!(extract_text(&extractor, Path::new("a.pdf"), Some(2)), "uno\ndos\n");
        assert_eq!(extract_text(&extractor, Path::new("a.pdf"), Some(10)), "uno\ndos\ntres\n");
    }

    #[test]
    fn test_zero_max_pages_reads_everything() {
        let extractor = FakeExtractor::default().with("a.pdf", &["uno", "dos", "tres"]);
        assert_eq!(extract_text(&extractor, Path::new("a.pdf"), Some(0)), "uno\ndos\ntres\n");
    }

    #[test]
    fn test_failure_is_diagnostic_text() {
        let extractor = FakeExtractor::default();
        let text = extract_text(&extractor, Path::new("broken.pdf"), None);
        assert!(text.starts_with("Error reading PDF: "));
        assert!(text.contains("unsupported document"));
    }

    #[test]
    fn test_describe_uses_first_page() {
        let extractor =
            FakeExtractor::default().with("a.pdf", &["PLANO: LOSA DE CIMENTACION", "PROYECTO: OTRO"]);
        assert_eq!(
            describe(&extractor, Path::new("a.pdf")),
            "Plano: LOSA DE CIMENTACION"
        );
        assert_eq!(describe(&extractor, Path::new("missing.pdf")), "");
    }
}
