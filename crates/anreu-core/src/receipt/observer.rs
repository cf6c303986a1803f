//! Outcome observers.
//!
//! The extractor reports what happened through an injected
//! [`ExtractionObserver`] rather than logging on its own. Observers see the
//! partial record of a rejected document; callers never do.

use tracing::{error, info, warn};

use super::gate::Confidence;
use crate::acquisition::AcquiredText;
use crate::error::AcquisitionError;
use crate::models::record::{Field, Rejection, TransferRecord};

/// Receives extraction events. Every method defaults to doing nothing.
pub trait ExtractionObserver: Send + Sync {
    fn on_acquisition_failed(&self, _error: &AcquisitionError) {}

    fn on_acquired(&self, _acquired: &AcquiredText) {}

    /// Called with the computed record before the gate decides.
    fn on_scored(&self, _record: &TransferRecord, _confidence: Confidence) {}

    fn on_accepted(&self, _record: &TransferRecord, _confidence: Confidence) {}

    fn on_rejected(&self, _rejection: Rejection, _confidence: Option<Confidence>) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ExtractionObserver for NullObserver {}

/// Emits events as `tracing` records.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    log_records: bool,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self { log_records: true }
    }

    /// Set whether record contents are included in log events.
    pub fn with_records(mut self, enabled: bool) -> Self {
        self.log_records = enabled;
        self
    }

    fn record_json(&self, record: &TransferRecord) -> String {
        if !self.log_records {
            return String::from("<redacted>");
        }
        serde_json::to_string(record).unwrap_or_default()
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionObserver for TracingObserver {
    fn on_acquisition_failed(&self, error: &AcquisitionError) {
        error!(%error, "Error extracting text from PDF");
    }

    fn on_acquired(&self, acquired: &AcquiredText) {
        info!(
            source = acquired.source,
            pages = acquired.page_count,
            chars = acquired.text.len(),
            "Acquired document text"
        );
    }

    fn on_scored(&self, record: &TransferRecord, confidence: Confidence) {
        if confidence.passes() {
            return;
        }
        let missing: Vec<&str> = record.missing_fields().into_iter().map(Field::name).collect();
        warn!(
            confidence = %confidence,
            missing = ?missing,
            record = %self.record_json(record),
            "Partial extraction"
        );
    }

    fn on_accepted(&self, record: &TransferRecord, confidence: Confidence) {
        info!(confidence = %confidence, "Extraction confidence");
        info!("{}", self.record_json(record));
    }

    fn on_rejected(&self, rejection: Rejection, confidence: Option<Confidence>) {
        match confidence {
            Some(confidence) => warn!(confidence = %confidence, "{}", rejection),
            None => warn!("{}", rejection),
        }
    }
}
