//! Rule-based field extractors for ANREU transfer receipts.
//!
//! Every field is described by one [`FieldRule`] in [`FIELD_RULES`]: a field
//! name, a pattern, the capture group holding the value and how to coerce it.
//! Rules are independent and only ever look at the first match.

pub mod patterns;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::record::{Digits, Field, FieldValue};
use patterns::{FACILITY, FROM_ACCOUNT, PROJECT_ID, SERIAL_RANGE, TO_ACCOUNT, VINTAGE};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span of the value's capture group in the source text.
    pub position: Option<(usize, usize)>,
    /// Full text of the pattern match.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// How a captured string becomes a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Decimal digits to an unsigned integer of any length; leading zeros are ignored.
    Integer,
    /// Surrounding whitespace removed. An empty result is still a value.
    Trimmed,
    /// Taken as matched.
    Verbatim,
}

impl Coercion {
    pub fn apply(self, raw: &str) -> Option<FieldValue> {
        match self {
            Coercion::Integer => Digits::parse(raw).map(FieldValue::Integer),
            Coercion::Trimmed => Some(FieldValue::Text(raw.trim().to_string())),
            Coercion::Verbatim => Some(FieldValue::Text(raw.to_string())),
        }
    }
}

/// One row of the extraction table.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: Field,
    pub pattern: &'static Regex,
    pub group: usize,
    pub coercion: Coercion,
}

impl FieldRule {
    pub fn new(field: Field, pattern: &'static Regex, group: usize, coercion: Coercion) -> Self {
        Self {
            field,
            pattern,
            group,
            coercion,
        }
    }

    fn from_captures(&self, caps: &Captures<'_>) -> Option<ExtractionMatch<FieldValue>> {
        let group = caps.get(self.group)?;
        let value = self.coercion.apply(group.as_str())?;
        Some(ExtractionMatch::new(value, &caps[0]).with_position(group.start(), group.end()))
    }
}

impl FieldExtractor for FieldRule {
    type Output = ExtractionMatch<FieldValue>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        // First match only; a first match that fails coercion is not retried further on.
        let caps = self.pattern.captures(text)?;
        self.from_captures(&caps)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| self.from_captures(&caps))
            .collect()
    }
}

lazy_static! {
    /// The extraction table, in record order.
    pub static ref FIELD_RULES: [FieldRule; 7] = [
        FieldRule::new(Field::SerialStart, &SERIAL_RANGE, 1, Coercion::Integer),
        FieldRule::new(Field::SerialEnd, &SERIAL_RANGE, 2, Coercion::Integer),
        FieldRule::new(Field::Vintage, &VINTAGE, 1, Coercion::Integer),
        FieldRule::new(Field::ProjectId, &PROJECT_ID, 1, Coercion::Verbatim),
        FieldRule::new(Field::Facility, &FACILITY, 1, Coercion::Trimmed),
        FieldRule::new(Field::FromAccount, &FROM_ACCOUNT, 1, Coercion::Trimmed),
        FieldRule::new(Field::ToAccount, &TO_ACCOUNT, 1, Coercion::Trimmed),
    ];
}

/// Look up the rule for a field.
pub fn rule_for(field: Field) -> &'static FieldRule {
    FIELD_RULES
        .iter()
        .find(|rule| rule.field == field)
        .unwrap_or_else(|| unreachable!("every field has a rule"))
}
