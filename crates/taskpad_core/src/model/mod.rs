//! Domain model for notes and tasks.
//!
//! # Responsibility
//! - Define the canonical records persisted by the store.
//! - Own identifier parsing and the line codec shared by editor and store.
//!
//! # Invariants
//! - Identifiers are positive SQLite row ids and never reused in-process.
//! - Note content is plain line-oriented text; no markup semantics.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod lines;
pub mod note;
pub mod task;

/// Text supplied where a record id was expected is not a positive integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIdentifier(pub String);

impl Display for InvalidIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid id: `{}`", self.0)
    }
}

impl Error for InvalidIdentifier {}

/// Parses user-supplied id text into a row id.
///
/// Surrounding whitespace is ignored. Zero, negative and non-numeric input
/// are rejected.
pub fn parse_record_id(text: &str) -> Result<i64, InvalidIdentifier> {
    let trimmed = text.trim();
    match trimmed.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(InvalidIdentifier(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_record_id;

    #[test]
    fn parse_record_id_accepts_positive_integers() {
        assert_eq!(parse_record_id(" 42 ").unwrap(), 42);
    }

    #[test]
    fn parse_record_id_rejects_garbage_and_non_positive() {
        assert!(parse_record_id("abc").is_err());
        assert!(parse_record_id("0").is_err());
        assert!(parse_record_id("-3").is_err());
        assert!(parse_record_id("").is_err());
    }
}
