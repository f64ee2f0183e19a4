//! Canonical record model and row normalizer
//!
//! The importer hands this module raw spreadsheet rows as JSON objects
//! (column header -> raw cell value). Normalization maps each row onto the
//! fixed seven-field record shape; every field is always present and always
//! a string, with the empty string standing in for anything missing or
//! malformed. Identifiers stay text end-to-end so leading zeros and mixed
//! formats survive.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed key for the locally cached roster payload
pub const STORAGE_KEY: &str = "smart_qr_employees_v2";

/// Expected column headers in the roster workbook (exact casing).
///
/// `Empoyee_ID` is the spelling the roster template actually ships with;
/// it is preserved deliberately.
pub mod headers {
    pub const EMPLOYEE_ID: &str = "Empoyee_ID";
    pub const EMPLOYEE_NAME: &str = "Employee_Name";
    pub const MEAL_TYPE: &str = "Meal_Type";
    pub const COMPANY_NAME: &str = "Company_Name";
    pub const CAMP_ALLOCATION: &str = "Camp_Allocation";
    pub const ACCESS_CARD: &str = "Access_Card";
    pub const CARD_NUMBER: &str = "Card_Number";
}

/// One canonical personnel record
///
/// Serialized field names match the shared JSON payload exchanged with the
/// remote store and the local cache. A missing field on decode takes the
/// same empty-string sentinel the normalizer uses, so a record is never
/// partially constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Record {
    pub employee_id: String,
    pub employee_name: String,
    pub meal_type: String,
    pub company_name: String,
    pub camp_allocation: String,
    pub access_card: String,
    pub card_number: String,
}

/// The full ordered roster, import order preserved
pub type RecordSet = Vec<Record>;

/// Render one raw cell as text.
///
/// Strings pass through unchanged, numbers and booleans use their natural
/// base-10/display form, null or an absent column becomes the empty string.
fn cell_to_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Normalize one raw row into a canonical record. Never fails; the worst
/// outcome for any single field is an empty string.
pub fn normalize_row(row: &Map<String, Value>) -> Record {
    Record {
        employee_id: cell_to_text(row.get(headers::EMPLOYEE_ID)),
        employee_name: cell_to_text(row.get(headers::EMPLOYEE_NAME)),
        meal_type: cell_to_text(row.get(headers::MEAL_TYPE)),
        company_name: cell_to_text(row.get(headers::COMPANY_NAME)),
        camp_allocation: cell_to_text(row.get(headers::CAMP_ALLOCATION)),
        access_card: cell_to_text(row.get(headers::ACCESS_CARD)),
        card_number: cell_to_text(row.get(headers::CARD_NUMBER)),
    }
}

/// Normalize an imported row sequence. Applied independently per row;
/// output order matches input row order exactly.
pub fn normalize_rows(rows: &[Map<String, Value>]) -> RecordSet {
    rows.iter().map(normalize_row).collect()
}
