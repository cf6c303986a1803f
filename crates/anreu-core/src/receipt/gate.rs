//! Confidence scoring and the acceptance gate.

use serde::Serialize;

use crate::models::record::{Field, Outcome, Rejection, TransferRecord};

/// Minimum confidence, in percent, for a record to be accepted.
pub const CONFIDENCE_THRESHOLD: f64 = 90.0;

/// Share of expected fields that were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Confidence {
    pub found: usize,
    pub total: usize,
}

impl Confidence {
    /// Score a record. All fields weigh the same.
    pub fn of(record: &TransferRecord) -> Self {
        Self {
            found: record.found_count(),
            total: Field::ALL.len(),
        }
    }

    pub fn percent(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.found as f64 / self.total as f64 * 100.0
    }

    pub fn passes(self) -> bool {
        self.percent() >= CONFIDENCE_THRESHOLD
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}% ({}/{})", self.percent(), self.found, self.total)
    }
}

/// Apply the gate: the whole record, or a low-confidence rejection.
pub fn gate(record: TransferRecord, confidence: Confidence) -> Outcome {
    if confidence.passes() {
        Outcome::Accepted(record)
    } else {
        Outcome::Rejected(Rejection::LowConfidence)
    }
}
