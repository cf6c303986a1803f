//! Transfer receipt field extraction module.

mod extractor;
pub mod gate;
pub mod observer;
mod parser;
pub mod rules;

pub use extractor::{Extraction, ReceiptExtractor, confidence_of};
pub use gate::{CONFIDENCE_THRESHOLD, Confidence};
pub use observer::{ExtractionObserver, NullObserver, TracingObserver};
pub use parser::{FieldMatch, FieldReport, ReceiptParser, RuleInspection};
