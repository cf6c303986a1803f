//! Transfer record and extraction outcome models.

use serde::de::Error as _;
use serde::ser::{Error as _, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fields recovered from an ANREU transfer receipt.
///
/// All seven keys are always serialized; an absent value is `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// First unit serial number in the transferred range.
    pub serial_start: Option<Digits>,

    /// Last unit serial number in the transferred range.
    pub serial_end: Option<Digits>,

    /// Year the units were issued.
    pub vintage: Option<u16>,

    /// Project identifier (`LLL-NNNN-NNN`).
    pub project_id: Option<String>,

    /// Facility or project name.
    pub facility: Option<String>,

    /// Source account name.
    pub from_account: Option<String>,

    /// Destination account name.
    pub to_account: Option<String>,
}

/// Names a single field of a [`TransferRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    SerialStart,
    SerialEnd,
    Vintage,
    ProjectId,
    Facility,
    FromAccount,
    ToAccount,
}

impl Field {
    /// Every field, in record order.
    pub const ALL: [Field; 7] = [
        Field::SerialStart,
        Field::SerialEnd,
        Field::Vintage,
        Field::ProjectId,
        Field::Facility,
        Field::FromAccount,
        Field::ToAccount,
    ];

    /// The record key for this field.
    pub fn name(self) -> &'static str {
        match self {
            Field::SerialStart => "serial_start",
            Field::SerialEnd => "serial_end",
            Field::Vintage => "vintage",
            Field::ProjectId => "project_id",
            Field::Facility => "facility",
            Field::FromAccount => "from_account",
            Field::ToAccount => "to_account",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-negative integer of any length, kept as canonical decimal digits.
///
/// Serializes as a JSON number, however many digits it has.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digits(String);

impl Digits {
    /// Parse ASCII decimal digits. Leading zeros are dropped.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let canonical = raw.trim_start_matches('0');
        Some(Self(if canonical.is_empty() {
            "0".to_string()
        } else {
            canonical.to_string()
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for Digits {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl std::fmt::Display for Digits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Digits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number: serde_json::Number = self.0.parse().map_err(S::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Digits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        Digits::parse(&number.to_string())
            .ok_or_else(|| D::Error::custom(format!("not a non-negative integer: {}", number)))
    }
}

/// A typed value produced by a field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(Digits),
    Text(String),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl TransferRecord {
    /// Store a value into the slot named by `field`.
    ///
    /// Serials take integers of any length. A vintage above `u16::MAX` leaves
    /// the slot empty. A text value offered to an integer slot, or the
    /// reverse, is ignored.
    pub fn set(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::SerialStart, FieldValue::Integer(n)) => self.serial_start = Some(n),
            (Field::SerialEnd, FieldValue::Integer(n)) => self.serial_end = Some(n),
            (Field::Vintage, FieldValue::Integer(n)) => {
                self.vintage = n.to_u64().and_then(|n| u16::try_from(n).ok())
            }
            (Field::ProjectId, FieldValue::Text(s)) => self.project_id = Some(s),
            (Field::Facility, FieldValue::Text(s)) => self.facility = Some(s),
            (Field::FromAccount, FieldValue::Text(s)) => self.from_account = Some(s),
            (Field::ToAccount, FieldValue::Text(s)) => self.to_account = Some(s),
            _ => {}
        }
    }

    /// Whether `field` holds a value.
    pub fn is_present(&self, field: Field) -> bool {
        match field {
            Field::SerialStart => self.serial_start.is_some(),
            Field::SerialEnd => self.serial_end.is_some(),
            Field::Vintage => self.vintage.is_some(),
            Field::ProjectId => self.project_id.is_some(),
            Field::Facility => self.facility.is_some(),
            Field::FromAccount => self.from_account.is_some(),
            Field::ToAccount => self.to_account.is_some(),
        }
    }

    /// Number of fields holding a value.
    pub fn found_count(&self) -> usize {
        Field::ALL.iter().filter(|f| self.is_present(**f)).count()
    }

    /// Fields without a value, in record order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| !self.is_present(*f))
            .collect()
    }
}

/// Why a document was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No usable text could be acquired from the document.
    AcquisitionFailed,
    /// Too few fields were recovered to trust the result.
    LowConfidence,
}

impl Rejection {
    /// The caller-facing message. These strings are part of the contract.
    pub fn message(self) -> &'static str {
        match self {
            Rejection::AcquisitionFailed => "Failed to extract text from PDF",
            Rejection::LowConfidence => "Low confidence — manual review required",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Rejection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rejection", 1)?;
        state.serialize_field("error", self.message())?;
        state.end()
    }
}

/// Result of processing one document: a complete record or a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Accepted(TransferRecord),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// The accepted record, if any.
    pub fn record(&self) -> Option<&TransferRecord> {
        match self {
            Outcome::Accepted(record) => Some(record),
            Outcome::Rejected(_) => None,
        }
    }

    /// The rejection, if any.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(rejection) => Some(*rejection),
        }
    }
}
