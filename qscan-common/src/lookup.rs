//! Token-to-record lookup
//!
//! Resolves a scanned or typed token against the loaded roster. A token
//! matches a record when it equals the record's card number or employee ID
//! (both sides whitespace-trimmed, otherwise byte-for-byte exact). The scan
//! is linear and stops at the first hit, so duplicate identifiers resolve
//! deterministically to the earliest-imported record. Roster sizes are
//! operator scale (hundreds to low thousands); no index structure needed.

use crate::records::Record;
use thiserror::Error;

/// Lookup failure, carried back to the caller as a value
///
/// `EmptyDataset` and `NotFound` warrant different operator messages, so
/// they stay distinct variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No Excel data uploaded. Please upload an Excel file first.")]
    EmptyDataset,

    #[error("\"{0}\" not found as an Employee ID or Card Number.")]
    NotFound(String),
}

/// Resolve a query token to at most one record.
///
/// Returns the first record (in roster order) whose card number or employee
/// ID equals the trimmed query. `NotFound` carries the trimmed query text
/// for display.
pub fn resolve<'a>(records: &'a [Record], query: &str) -> Result<&'a Record, LookupError> {
    if records.is_empty() {
        return Err(LookupError::EmptyDataset);
    }

    let trimmed = query.trim();

    records
        .iter()
        .find(|r| r.card_number.trim() == trimmed || r.employee_id.trim() == trimmed)
        .ok_or_else(|| LookupError::NotFound(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(employee_id: &str, card_number: &str) -> Record {
        Record {
            employee_id: employee_id.to_string(),
            employee_name: format!("emp {}", employee_id),
            card_number: card_number.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_dataset_rejected_regardless_of_query() {
        assert_eq!(resolve(&[], "4412"), Err(LookupError::EmptyDataset));
        assert_eq!(resolve(&[], ""), Err(LookupError::EmptyDataset));
        assert_eq!(resolve(&[], "   "), Err(LookupError::EmptyDataset));
    }

    #[test]
    fn test_match_by_card_number_with_whitespace_trim() {
        let set = vec![record("1", "4412")];
        let found = resolve(&set, "  4412 ").unwrap();
        assert_eq!(found.card_number, "4412");
    }

    #[test]
    fn test_match_by_employee_id() {
        let set = vec![record("E-007", "999")];
        let found = resolve(&set, "E-007").unwrap();
        assert_eq!(found.employee_id, "E-007");
    }

    #[test]
    fn test_first_match_wins_across_identifier_fields() {
        // First record matches on employee ID, second on card number;
        // roster order breaks the tie.
        let set = vec![record("100", "555"), record("200", "100")];
        let found = resolve(&set, "100").unwrap();
        assert_eq!(found.employee_id, "100");
        assert_eq!(found.card_number, "555");
    }

    #[test]
    fn test_first_match_wins_within_one_field() {
        let set = vec![record("dup", "1"), record("dup", "2")];
        let found = resolve(&set, "dup").unwrap();
        assert_eq!(found.card_number, "1");
    }

    #[test]
    fn test_not_found_carries_trimmed_query() {
        let set = vec![record("1", "2")];
        assert_eq!(
            resolve(&set, " nope "),
            Err(LookupError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_match_is_case_sensitive_exact() {
        let set = vec![record("ABC", "1")];
        assert!(resolve(&set, "abc").is_err());
        assert!(resolve(&set, "AB").is_err());
        assert!(resolve(&set, "ABC").is_ok());
    }

    #[test]
    fn test_empty_scanned_token_simply_fails_to_match() {
        // A scanned token may trim to empty; it falls through to NotFound
        let set = vec![record("1", "2")];
        assert_eq!(resolve(&set, "   "), Err(LookupError::NotFound(String::new())));
    }

    #[test]
    fn test_stored_identifier_whitespace_is_trimmed_too() {
        let set = vec![record(" 100 ", "x")];
        assert!(resolve(&set, "100").is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LookupError::EmptyDataset.to_string(),
            "No Excel data uploaded. Please upload an Excel file first."
        );
        assert_eq!(
            LookupError::NotFound("4412".into()).to_string(),
            "\"4412\" not found as an Employee ID or Card Number."
        );
    }
}
