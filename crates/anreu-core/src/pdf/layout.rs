//! Layout-ordered text extraction using pdf-extract.

use tracing::debug;

use super::{Result, TextSource, guard_panics};
use crate::error::PdfError;

/// Primary backend: positions glyphs on the page and emits text in reading order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutTextSource;

impl LayoutTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for LayoutTextSource {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>> {
        let pages = guard_panics(self.name(), || {
            pdf_extract::extract_text_from_mem_by_pages(data)
                .map_err(|e| PdfError::TextExtraction(e.to_string()))
        })?;

        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("pdf-extract extracted {} pages", pages.len());
        Ok(pages)
    }
}
