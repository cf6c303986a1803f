//! PDF text backends.

mod content;
mod layout;

pub use content::ContentStreamTextSource;
pub use layout::LayoutTextSource;

use std::panic::{self, AssertUnwindSafe};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A backend that yields the text of each page of a document.
pub trait TextSource: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Extract text page by page, in page order.
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>>;
}

/// Run a backend call, turning a panic into a [`PdfError::TextExtraction`].
///
/// Both PDF libraries panic on some malformed fonts and streams.
pub(crate) fn guard_panics<T>(backend: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|_| PdfError::TextExtraction(format!("{} panicked", backend)))?
}
