//! PDF text extraction via pdf-extract

use super::TextExtractor;
use crate::error::ExtractError;
use std::path::Path;
use tracing::{debug, error};

/// Extractor for PDF files
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let bytes = std::fs::read(path)?;
        debug!("Extracting PDF {:?} ({} bytes)", path, bytes.len());

        // pdf-extract can panic on malformed fonts and glyph tables
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })) {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractError::Parse(e.to_string())),
            Err(_) => {
                error!("PDF extraction panicked for {:?}", path);
                Err(ExtractError::Panicked)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_text;

    #[test]
    fn test_missing_file() {
        let result = PdfTextExtractor::new().extract_pages(Path::new("/no/such/file.pdf"));
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    #[test]
    fn test_not_a_pdf_yields_diagnostic() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, "plain text, not a PDF").unwrap();

        let text = extract_text(&PdfTextExtractor::new(), &path, None);
        assert!(text.starts_with("Error reading PDF: "));
    }
}
