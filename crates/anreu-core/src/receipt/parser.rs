//! Record assembly from the field rule table.

use std::time::Instant;

use tracing::{debug, trace};

use super::gate::Confidence;
use super::rules::{ExtractionMatch, FIELD_RULES, FieldExtractor};
use crate::models::record::{Field, FieldValue, TransferRecord};

/// First-match result of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub field: Field,
    pub matched: Option<ExtractionMatch<FieldValue>>,
}

/// Everything the rules recovered from a text.
#[derive(Debug, Clone)]
pub struct FieldReport {
    /// Assembled record; all seven slots, filled or not.
    pub record: TransferRecord,
    /// Per-field matches, in record order.
    pub matches: Vec<FieldMatch>,
    /// Score of the record.
    pub confidence: Confidence,
    /// Time spent running the rules.
    pub processing_time_ms: u64,
}

/// Diagnostics for one rule: the pattern, the winning match and how many
/// matches the text contains in total.
#[derive(Debug, Clone)]
pub struct RuleInspection {
    pub field: Field,
    pub pattern: &'static str,
    pub first: Option<ExtractionMatch<FieldValue>>,
    pub total_matches: usize,
}

/// Runs [`FIELD_RULES`] over text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptParser;

impl ReceiptParser {
    pub fn new() -> Self {
        Self
    }

    /// Run every rule and assemble the record.
    pub fn parse(&self, text: &str) -> FieldReport {
        let start = Instant::now();
        let mut record = TransferRecord::default();
        let mut matches = Vec::with_capacity(FIELD_RULES.len());

        for rule in FIELD_RULES.iter() {
            let matched = rule.extract(text);
            match &matched {
                Some(m) => {
                    trace!("{} matched {:?}", rule.field, m.source);
                    record.set(rule.field, m.value.clone());
                }
                None => trace!("{} not found", rule.field),
            }
            matches.push(FieldMatch {
                field: rule.field,
                matched,
            });
        }

        let confidence = Confidence::of(&record);
        debug!("Parsed {} chars, {}", text.len(), confidence);

        FieldReport {
            record,
            matches,
            confidence,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Report every rule's pattern and match counts.
    pub fn inspect(&self, text: &str) -> Vec<RuleInspection> {
        FIELD_RULES
            .iter()
            .map(|rule| RuleInspection {
                field: rule.field,
                pattern: rule.pattern.as_str(),
                first: rule.extract(text),
                total_matches: rule.extract_all(text).len(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Digits;
    use pretty_assertions::assert_eq;

    const COMPLETE: &str = "Transfer Date: 2024-01-01
From Account: Seller Pty Ltd (ACC123)
To Account: Buyer Pty Ltd (ACC456)
ACCU1000000 to ACCU1000099
Vintage: 2024
Project ID: CAR-2024-001
Facility: XYZ Reforestation Project";

    #[test]
    fn test_parse_complete() {
        let report = ReceiptParser::new().parse(COMPLETE);

        assert_eq!(
            report.record,
            TransferRecord {
                serial_start: Some(Digits::from(1000000u64)),
                serial_end: Some(Digits::from(1000099u64)),
                vintage: Some(2024),
                project_id: Some("CAR-2024-001".to_string()),
                facility: Some("XYZ Reforestation Project".to_string()),
                from_account: Some("Seller Pty Ltd (ACC123)".to_string()),
                to_account: Some("Buyer Pty Ltd (ACC456)".to_string()),
            }
        );
        assert_eq!(report.confidence.found, 7);
        assert!(report.matches.iter().all(|m| m.matched.is_some()));
    }

    #[test]
    fn test_parse_nothing() {
        let report = ReceiptParser::new().parse("Some text without required fields");

        assert_eq!(report.record, TransferRecord::default());
        assert_eq!(report.matches.len(), 7);
        assert_eq!(report.confidence.found, 0);
    }

    #[test]
    fn test_inspect_counts_all_matches() {
        let text = "Vintage: 2023\nVintage: 2024\nFacility: A";
        let inspections = ReceiptParser::new().inspect(text);

        let vintage = inspections.iter().find(|i| i.field == Field::Vintage).unwrap();
        assert_eq!(vintage.total_matches, 2);
        assert_eq!(vintage.first.as_ref().unwrap().value, FieldValue::Integer(Digits::from(2023u64)));

        let project = inspections.iter().find(|i| i.field == Field::ProjectId).unwrap();
        assert_eq!(project.total_matches, 0);
        assert!(project.first.is_none());
    }
}
