//! The extraction pipeline: acquire, parse, score, gate.

use std::path::Path;

use tracing::debug;

use super::gate::{self, Confidence};
use super::observer::{ExtractionObserver, TracingObserver};
use super::parser::{FieldReport, ReceiptParser};
use crate::acquisition::FallbackAcquirer;
use crate::error::AcquisitionError;
use crate::models::config::AnreuConfig;
use crate::models::record::{Outcome, Rejection};

/// An [`Outcome`] together with the score behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub outcome: Outcome,
    /// `None` when no text was acquired.
    pub confidence: Option<Confidence>,
}

/// Turns a document into an [`Outcome`].
///
/// Never returns an error and never hands out a partially filled record:
/// every failure becomes a [`Rejection`].
pub struct ReceiptExtractor {
    acquirer: FallbackAcquirer,
    parser: ReceiptParser,
    observer: Box<dyn ExtractionObserver>,
}

impl ReceiptExtractor {
    /// Create an extractor with default backends and a tracing observer.
    pub fn new() -> Self {
        Self {
            acquirer: FallbackAcquirer::default(),
            parser: ReceiptParser::new(),
            observer: Box::new(TracingObserver::new()),
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &AnreuConfig) -> Self {
        Self {
            acquirer: FallbackAcquirer::from_config(&config.acquisition),
            parser: ReceiptParser::new(),
            observer: Box::new(TracingObserver::new().with_records(config.output.log_records)),
        }
    }

    /// Replace the text acquirer.
    pub fn with_acquirer(mut self, acquirer: FallbackAcquirer) -> Self {
        self.acquirer = acquirer;
        self
    }

    /// Replace the observer.
    pub fn with_observer(mut self, observer: impl ExtractionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Process a document file.
    pub fn extract_path(&self, path: &Path) -> Outcome {
        self.process_path(path).outcome
    }

    /// Process a plain-text file holding already-extracted document text.
    pub fn extract_text_path(&self, path: &Path) -> Outcome {
        self.process_text_path(path).outcome
    }

    /// Process document bytes.
    pub fn extract_bytes(&self, data: &[u8]) -> Outcome {
        self.process_bytes(data).outcome
    }

    /// Process text that was already extracted from a document.
    pub fn extract_text(&self, text: &str) -> Outcome {
        self.process_text(text).outcome
    }

    /// Like [`Self::extract_path`], keeping the confidence.
    pub fn process_path(&self, path: &Path) -> Extraction {
        debug!("Processing file: {}", path.display());
        match std::fs::read(path) {
            Ok(data) => self.process_bytes(&data),
            Err(e) => self.acquisition_failed(&AcquisitionError::Read(e)),
        }
    }

    /// Like [`Self::extract_text_path`], keeping the confidence.
    pub fn process_text_path(&self, path: &Path) -> Extraction {
        match std::fs::read(path) {
            Ok(data) => self.process_text(&String::from_utf8_lossy(&data)),
            Err(e) => self.acquisition_failed(&AcquisitionError::Read(e)),
        }
    }

    /// Like [`Self::extract_bytes`], keeping the confidence.
    pub fn process_bytes(&self, data: &[u8]) -> Extraction {
        match self.acquirer.acquire(data) {
            Ok(acquired) => {
                self.observer.on_acquired(&acquired);
                self.score(&acquired.text)
            }
            Err(e) => self.acquisition_failed(&e),
        }
    }

    /// Like [`Self::extract_text`], keeping the confidence.
    pub fn process_text(&self, text: &str) -> Extraction {
        if text.trim().is_empty() {
            return self.acquisition_failed(&AcquisitionError::Empty);
        }
        self.score(text)
    }

    /// Run the rules without gating. Useful for diagnostics.
    pub fn assess(&self, text: &str) -> FieldReport {
        self.parser.parse(text)
    }

    fn score(&self, text: &str) -> Extraction {
        let report = self.parser.parse(text);
        let confidence = report.confidence;
        self.observer.on_scored(&report.record, confidence);

        let outcome = gate::gate(report.record, confidence);
        match &outcome {
            Outcome::Accepted(record) => self.observer.on_accepted(record, confidence),
            Outcome::Rejected(rejection) => self.observer.on_rejected(*rejection, Some(confidence)),
        }
        Extraction {
            outcome,
            confidence: Some(confidence),
        }
    }

    fn acquisition_failed(&self, error: &AcquisitionError) -> Extraction {
        self.observer.on_acquisition_failed(error);
        self.observer.on_rejected(Rejection::AcquisitionFailed, None);
        Extraction {
            outcome: Outcome::Rejected(Rejection::AcquisitionFailed),
            confidence: None,
        }
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Confidence of a text without running the gate.
pub fn confidence_of(text: &str) -> Confidence {
    ReceiptParser::new().parse(text).confidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::error::PdfError;
    use crate::models::record::{Digits, TransferRecord};
    use crate::pdf::testing::make_pdf;
    use crate::pdf::{Result as PdfResult, TextSource};
    use crate::receipt::observer::NullObserver;
    use pretty_assertions::assert_eq;

    const COMPLETE: &str = "Transfer Date: 2024-01-01
From Account: Seller Pty Ltd (ACC123)
To Account: Buyer Pty Ltd (ACC456)
ACCU1000000 to ACCU1000099
Vintage: 2024
Project ID: CAR-2024-001
Facility: XYZ Reforestation Project";

    struct FakeSource {
        pages: Option<Vec<String>>,
    }

    impl TextSource for FakeSource {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn page_texts(&self, _data: &[u8]) -> PdfResult<Vec<String>> {
            self.pages
                .clone()
                .ok_or_else(|| PdfError::Parse("Invalid PDF format".to_string()))
        }
    }

    fn pages(text: &str) -> Box<dyn TextSource> {
        Box::new(FakeSource {
            pages: Some(vec![text.to_string()]),
        })
    }

    fn failing() -> Box<dyn TextSource> {
        Box::new(FakeSource { pages: None })
    }

    fn extractor(primary: Box<dyn TextSource>, secondary: Box<dyn TextSource>) -> ReceiptExtractor {
        ReceiptExtractor::new()
            .with_acquirer(FallbackAcquirer::new(primary, secondary))
            .with_observer(NullObserver)
    }

    #[derive(Default, Clone)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
        scored: Arc<Mutex<Option<TransferRecord>>>,
    }

    impl ExtractionObserver for Recorder {
        fn on_acquisition_failed(&self, _error: &AcquisitionError) {
            self.events.lock().unwrap().push("acquisition_failed".into());
        }

        fn on_acquired(&self, acquired: &crate::acquisition::AcquiredText) {
            self.events.lock().unwrap().push(format!("acquired:{}", acquired.source));
        }

        fn on_scored(&self, record: &TransferRecord, confidence: Confidence) {
            self.events.lock().unwrap().push(format!("scored:{}", confidence.found));
            *self.scored.lock().unwrap() = Some(record.clone());
        }

        fn on_accepted(&self, _record: &TransferRecord, _confidence: Confidence) {
            self.events.lock().unwrap().push("accepted".into());
        }

        fn on_rejected(&self, rejection: Rejection, _confidence: Option<Confidence>) {
            self.events.lock().unwrap().push(format!("rejected:{:?}", rejection));
        }
    }

    #[test]
    fn test_complete_document() {
        let outcome = extractor(pages(COMPLETE), failing()).extract_bytes(b"");

        assert_eq!(
            outcome,
            Outcome::Accepted(TransferRecord {
                serial_start: Some(Digits::from(1000000u64)),
                serial_end: Some(Digits::from(1000099u64)),
                vintage: Some(2024),
                project_id: Some("CAR-2024-001".to_string()),
                facility: Some("XYZ Reforestation Project".to_string()),
                from_account: Some("Seller Pty Ltd (ACC123)".to_string()),
                to_account: Some("Buyer Pty Ltd (ACC456)".to_string()),
            })
        );
    }

    #[test]
    fn test_empty_document() {
        let outcome = extractor(pages(""), pages("   \n\t   ")).extract_bytes(b"");

        assert_eq!(outcome, Outcome::Rejected(Rejection::AcquisitionFailed));
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"error":"Failed to extract text from PDF"}"#
        );
    }

    #[test]
    fn test_malformed_document() {
        let outcome = extractor(failing(), failing()).extract_bytes(b"");
        assert_eq!(outcome, Outcome::Rejected(Rejection::AcquisitionFailed));
    }

    #[test]
    fn test_sparse_document() {
        let outcome = extractor(pages("ACCU1000000 to ACCU1000099\nVintage: 2024"), pages(""))
            .extract_bytes(b"");

        assert_eq!(outcome, Outcome::Rejected(Rejection::LowConfidence));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap()["error"],
            "Low confidence — manual review required"
        );
    }

    #[test]
    fn test_secondary_used_when_primary_raises() {
        let text = "ACCU1000000 to ACCU1000099
Vintage: 2024
CAR-2024-001
Facility: Test Facility
From Account: Test From
To Account: Test To";
        let outcome = extractor(failing(), pages(text)).extract_bytes(b"");

        assert_eq!(outcome.record().unwrap().serial_start, Some(Digits::from(1000000u64)));
        assert_eq!(outcome.record().unwrap().to_account.as_deref(), Some("Test To"));
    }

    #[test]
    fn test_single_missing_field_rejected() {
        let without_vintage = COMPLETE.replace("Vintage: 2024\n", "");
        let outcome = extractor(pages(&without_vintage), failing()).extract_bytes(b"");
        assert_eq!(outcome, Outcome::Rejected(Rejection::LowConfidence));

        let without_serials = COMPLETE.replace("ACCU1000000 to ACCU1000099\n", "");
        let outcome = extractor(pages(&without_serials), failing()).extract_bytes(b"");
        assert_eq!(outcome, Outcome::Rejected(Rejection::LowConfidence));
    }

    #[test]
    fn test_hyphen_separator_rejected() {
        let text = COMPLETE.replace(" to ", " - ");
        let outcome = extractor(pages(&text), failing()).extract_bytes(b"");
        assert_eq!(outcome, Outcome::Rejected(Rejection::LowConfidence));
    }

    #[test]
    fn test_ocr_typos_rejected() {
        let text = COMPLETE
            .replace("Vintage: 2024", "Vintage: 2O24")
            .replace("CAR-2024-001", "CAR-2024-OO1");
        let outcome = extractor(pages(&text), failing()).extract_bytes(b"");
        assert_eq!(outcome, Outcome::Rejected(Rejection::LowConfidence));
    }

    #[test]
    fn test_different_layout_rejected() {
        let text = "ANREU Transfer Certificate

Serial Numbers: ACCU2000000 - ACCU2000199
Vintage Year: 2023
Project: CAR-2023-002
Location: ABC Carbon Project
Seller: Company A (ACC789)
Buyer: Company B (ACC012)";
        let outcome = extractor(pages(text), failing()).extract_bytes(b"");
        assert_eq!(outcome, Outcome::Rejected(Rejection::LowConfidence));
    }

    #[test]
    fn test_case_insensitive_labels() {
        let text = "transfer date: 2024-01-01
FROM ACCOUNT: Seller Pty Ltd (ACC123)
TO ACCOUNT: Buyer Pty Ltd (ACC456)
accu1000000 to accu1000099
VINTAGE: 2024
project id: CAR-2024-001
FACILITY: xyz reforestation project";
        let outcome = extractor(pages(text), failing()).extract_bytes(b"");

        let record = outcome.record().unwrap();
        assert_eq!(record.serial_start, Some(Digits::from(1000000u64)));
        assert_eq!(record.vintage, Some(2024));
        assert_eq!(record.facility.as_deref(), Some("xyz reforestation project"));
    }

    #[test]
    fn test_lowercase_project_id_rejected() {
        let text = COMPLETE.replace("CAR-2024-001", "car-2024-001");
        let outcome = extractor(pages(&text), failing()).extract_bytes(b"");
        assert_eq!(outcome, Outcome::Rejected(Rejection::LowConfidence));
    }

    #[test]
    fn test_multiline_values_keep_first_line() {
        let text = "Transfer Date: 2024-01-01
From Account: Seller Pty Ltd
(ACC123)
To Account: Buyer Pty Ltd
(ACC456)
ACCU1000000 to ACCU1000099
Vintage: 2024
Project ID: CAR-2024-001
Facility: XYZ Reforestation
Project";
        let outcome = extractor(pages(text), failing()).extract_bytes(b"");

        let record = outcome.record().unwrap();
        assert_eq!(record.facility.as_deref(), Some("XYZ Reforestation"));
        assert_eq!(record.from_account.as_deref(), Some("Seller Pty Ltd"));
        assert_eq!(record.to_account.as_deref(), Some("Buyer Pty Ltd"));
    }

    #[test]
    fn test_observer_sees_partial_record() {
        let recorder = Recorder::default();
        let extractor = ReceiptExtractor::new()
            .with_acquirer(FallbackAcquirer::new(
                pages("ACCU1000000 to ACCU1000099\nVintage: 2024"),
                failing(),
            ))
            .with_observer(recorder.clone());

        let outcome = extractor.extract_bytes(b"");

        assert!(outcome.record().is_none());
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![
                "acquired:fake".to_string(),
                "scored:3".to_string(),
                "rejected:LowConfidence".to_string(),
            ]
        );
        let scored = recorder.scored.lock().unwrap().clone().unwrap();
        assert_eq!(scored.vintage, Some(2024));
        assert_eq!(scored.serial_end, Some(Digits::from(1000099u64)));
    }

    #[test]
    fn test_observer_on_acquisition_failure() {
        let recorder = Recorder::default();
        let extractor = ReceiptExtractor::new()
            .with_acquirer(FallbackAcquirer::new(failing(), failing()))
            .with_observer(recorder.clone());

        extractor.extract_bytes(b"");

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![
                "acquisition_failed".to_string(),
                "rejected:AcquisitionFailed".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_text_whitespace_is_acquisition_failure() {
        let extractor = ReceiptExtractor::new().with_observer(NullObserver);
        assert_eq!(
            extractor.extract_text(" \n\t "),
            Outcome::Rejected(Rejection::AcquisitionFailed)
        );
        assert!(extractor.extract_text(COMPLETE).is_accepted());
    }

    #[test]
    fn test_missing_file_is_acquisition_failure() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = ReceiptExtractor::new().extract_path(&dir.path().join("missing.pdf"));
        assert_eq!(outcome, Outcome::Rejected(Rejection::AcquisitionFailed));
    }

    #[test]
    fn test_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.txt");
        std::fs::write(&path, COMPLETE).unwrap();

        let extractor = ReceiptExtractor::new().with_observer(NullObserver);
        assert!(extractor.extract_text_path(&path).is_accepted());
        assert_eq!(
            extractor.extract_text_path(&dir.path().join("missing.txt")),
            Outcome::Rejected(Rejection::AcquisitionFailed)
        );
    }

    #[test]
    fn test_garbage_file_is_acquisition_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("malformed.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        assert_eq!(
            ReceiptExtractor::new().extract_path(&path),
            Outcome::Rejected(Rejection::AcquisitionFailed)
        );
    }

    #[test]
    fn test_real_pdf_sparse() {
        let pdf = make_pdf(&[&["ACCU1000000 to ACCU1000099", "Vintage: 2024"]]);
        let outcome = ReceiptExtractor::new().extract_bytes(&pdf);
        assert_eq!(outcome, Outcome::Rejected(Rejection::LowConfidence));
    }

    #[test]
    fn test_serials_beyond_u64_accepted() {
        let text = COMPLETE.replace(
            "ACCU1000000 to ACCU1000099",
            "ACCU99999999999999999999 to ACCU99999999999999999999",
        );
        let outcome = extractor(pages(&text), failing()).extract_bytes(b"");

        let record = outcome.record().unwrap();
        assert_eq!(
            record.serial_start.as_ref().map(Digits::as_str),
            Some("99999999999999999999")
        );
        assert!(
            serde_json::to_string(&outcome)
                .unwrap()
                .contains(r#""serial_end":99999999999999999999"#)
        );
    }

    #[test]
    fn test_blank_trailing_facility_counts_as_found() {
        let text = "From Account: Seller Pty Ltd (ACC123)
To Account: Buyer Pty Ltd (ACC456)
ACCU1000000 to ACCU1000099
Vintage: 2024
Project ID: CAR-2024-001
Facility: \n";
        let outcome = extractor(pages(text), failing()).extract_bytes(b"");

        let record = outcome.record().unwrap();
        assert_eq!(record.facility.as_deref(), Some(""));
    }

    #[test]
    fn test_process_keeps_confidence() {
        let extractor = extractor(pages("ACCU1 to ACCU2\nVintage: 2024"), failing());
        let extraction = extractor.process_bytes(b"");
        assert_eq!(extraction.outcome, Outcome::Rejected(Rejection::LowConfidence));
        assert_eq!(extraction.confidence.map(|c| c.found), Some(3));

        let extraction = extractor.process_text(COMPLETE);
        assert!(extraction.outcome.is_accepted());
        assert_eq!(extraction.confidence.map(|c| c.found), Some(7));

        let extraction = extractor.process_text("   ");
        assert_eq!(extraction.outcome, Outcome::Rejected(Rejection::AcquisitionFailed));
        assert_eq!(extraction.confidence, None);
    }

    #[test]
    fn test_confidence_of() {
        assert_eq!(confidence_of(COMPLETE).found, 7);
        assert_eq!(confidence_of("Vintage: 2024").found, 1);
    }

    #[test]
    fn test_extractor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReceiptExtractor>();
    }
}
