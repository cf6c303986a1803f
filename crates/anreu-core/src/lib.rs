//! Core library for ANREU transfer receipt extraction.
//!
//! This crate provides:
//! - PDF text acquisition with a primary and a fallback backend
//! - Rule-based extraction of serial range, vintage, project and account fields
//! - A confidence gate that rejects partially read receipts

pub mod acquisition;
pub mod error;
pub mod models;
pub mod pdf;
pub mod receipt;

pub use acquisition::{AcquiredText, FallbackAcquirer};
pub use error::{AcquisitionError, ConfigError, PdfError};
pub use models::config::AnreuConfig;
pub use models::record::{Digits, Field, FieldValue, Outcome, Rejection, TransferRecord};
pub use pdf::{ContentStreamTextSource, LayoutTextSource, TextSource};
pub use receipt::{Confidence, Extraction, ExtractionObserver, ReceiptExtractor, ReceiptParser};
