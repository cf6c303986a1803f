//! Error types for the anreu-core library.

use thiserror::Error;

/// Errors raised by a single text backend.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised when no usable text could be obtained from a document.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The document could not be read at all.
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),

    /// The primary backend failed and fallback is disabled.
    #[error("{source_name} failed: {error}")]
    PrimaryFailed {
        source_name: &'static str,
        error: PdfError,
    },

    /// The secondary backend raised after the primary failed or came back blank.
    #[error("{primary_name}: {primary}; {secondary_name} failed: {secondary}")]
    BothFailed {
        primary_name: &'static str,
        primary: String,
        secondary_name: &'static str,
        secondary: PdfError,
    },

    /// Backends succeeded but yielded only whitespace.
    #[error("document contains no readable text")]
    Empty,
}

/// Configuration loading and saving errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
