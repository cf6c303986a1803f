//! Content-stream text extraction using lopdf.

use lopdf::Document;
use tracing::{debug, trace};

use super::{Result, TextSource, guard_panics};
use crate::error::PdfError;

/// Reads text operators straight out of each page's content stream.
///
/// Less layout-aware than [`super::LayoutTextSource`] but tolerant of
/// documents the layout engine cannot interpret.
pub struct ContentStreamTextSource {
    try_empty_password: bool,
}

impl ContentStreamTextSource {
    /// Create a new content-stream backend.
    pub fn new() -> Self {
        Self {
            try_empty_password: true,
        }
    }

    /// Set whether encrypted documents are opened with an empty user password.
    pub fn with_empty_password(mut self, enabled: bool) -> Self {
        self.try_empty_password = enabled;
        self
    }

    fn load(&self, data: &[u8]) -> Result<Document> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if !self.try_empty_password || doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        Ok(doc)
    }
}

impl Default for ContentStreamTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for ContentStreamTextSource {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>> {
        guard_panics(self.name(), || self.read_pages(data))
    }
}

impl ContentStreamTextSource {
    fn read_pages(&self, data: &[u8]) -> Result<Vec<String>> {
        let doc = self.load(data)?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        let mut texts = Vec::with_capacity(pages.len());
        for page_num in pages.keys() {
            let text = doc
                .extract_text(&[*page_num])
                .map_err(|e| PdfError::TextExtraction(format!("page {}: {}", page_num, e)))?;
            trace!("lopdf page {}: {} chars", page_num, text.len());
            texts.push(text);
        }

        debug!("lopdf extracted {} pages", texts.len());
        Ok(texts)
    }
}
