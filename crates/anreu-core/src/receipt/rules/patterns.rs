//! Regex patterns for ANREU transfer receipt fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Serial range: "ACCU1000000 to ACCU1000099". Only the word "to" separates.
    pub static ref SERIAL_RANGE: Regex = Regex::new(
        r"(?i)ACCU([0-9]+)\s*to\s*ACCU([0-9]+)"
    ).unwrap();

    pub static ref VINTAGE: Regex = Regex::new(
        r"(?i)Vintage[:\s]*([0-9]{4})"
    ).unwrap();

    // Case-sensitive, no label required
    pub static ref PROJECT_ID: Regex = Regex::new(
        r"([A-Z]{3}-[0-9]{4}-[0-9]{3})"
    ).unwrap();

    // Labeled single-line values
    pub static ref FACILITY: Regex = Regex::new(
        r"(?i)Facility[:\s]*(.+?)(?:\n|$)"
    ).unwrap();

    pub static ref FROM_ACCOUNT: Regex = Regex::new(
        r"(?i)From Account[:\s]*(.+?)(?:\n|$)"
    ).unwrap();

    pub static ref TO_ACCOUNT: Regex = Regex::new(
        r"(?i)To Account[:\s]*(.+?)(?:\n|$)"
    ).unwrap();
}
