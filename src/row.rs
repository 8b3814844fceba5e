//! # Customer Rows
//!
//! One validated customer record, read from a JSON array of objects.
//!
//! Column names are trimmed and lowercased before matching. Missing columns
//! become empty strings; non-string JSON scalars are stringified and `null`
//! is empty. Unknown columns are ignored.
//!
//! ```
//! use cardgen::row::CustomerRow;
//!
//! let json = r#"{"ID": "7", " Name ": "Asha Rao", "loan_amount": 150000}"#;
//! let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json).unwrap();
//! let row = CustomerRow::from_json_object(&object);
//! assert_eq!(row.id, "7");
//! assert_eq!(row.name, "Asha Rao");
//! assert_eq!(row.loan_amount, "150000");
//! assert_eq!(row.emi_id(), "7");
//! ```

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CardError;

/// Identifier used when a row has no `id`.
pub const UNKNOWN_ID: &str = "unknown";

/// A customer row with every column the cards read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub language: String,
    pub loan_amount: String,
    pub emi_amount: String,
    pub due_date: String,
    pub bank_name: String,
    pub branch_name: String,
    pub ifsc: String,
    pub phone_number: String,
    pub bank_logo_path: Option<String>,
    pub account_holder: Option<String>,
    pub account_number: Option<String>,
    pub emi_id: Option<String>,
}

impl CustomerRow {
    /// Build a row from (column, value) pairs.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut row = CustomerRow::default();
        for (key, value) in fields {
            row.set(key.as_ref(), value.as_ref());
        }
        row
    }

    /// Build a row from one JSON object.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        Self::from_fields(object.iter().map(|(k, v)| (k.as_str(), scalar_to_string(v))))
    }

    fn set(&mut self, key: &str, value: &str) {
        let value = value.trim().to_string();
        let optional = if value.is_empty() {
            None
        } else {
            Some(value.clone())
        };

        match key.trim().to_ascii_lowercase().as_str() {
            "id" => self.id = value,
            "name" => self.name = value,
            "language" => self.language = value,
            "loan_amount" => self.loan_amount = value,
            "emi_amount" => self.emi_amount = value,
            "due_date" => self.due_date = value,
            "bank_name" => self.bank_name = value,
            "branch_name" => self.branch_name = value,
            "ifsc" => self.ifsc = value,
            "phone_number" => self.phone_number = value,
            "bank_logo_path" => self.bank_logo_path = optional,
            "account_holder" => self.account_holder = optional,
            "account_number" => self.account_number = optional,
            "emi_id" => self.emi_id = optional,
            _ => {}
        }
    }

    /// EMI identifier, falling back to the row id.
    pub fn emi_id(&self) -> &str {
        self.emi_id.as_deref().unwrap_or(&self.id)
    }

    /// Account holder, falling back to the customer name.
    pub fn account_holder(&self) -> &str {
        self.account_holder.as_deref().unwrap_or(&self.name)
    }

    /// Row id made safe for use in a file name.
    ///
    /// Path separators and other unsafe characters become `_`; an empty id
    /// becomes [`UNKNOWN_ID`].
    pub fn file_id(&self) -> String {
        let cleaned: String = self
            .id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let cleaned = cleaned.trim_matches('.');
        if cleaned.is_empty() {
            UNKNOWN_ID.to_string()
        } else {
            cleaned.to_string()
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse rows from JSON text: an array of objects.
pub fn parse_rows(json: &str) -> Result<Vec<CustomerRow>, CardError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| CardError::Input(format!("Invalid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(CardError::Input(
                "Expected a JSON array of row objects".to_string(),
            ));
        }
    };

    let rows = items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(object) => Ok(CustomerRow::from_json_object(object)),
            _ => Err(CardError::Input(format!("Row {} is not an object", i))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(CardError::NoRows);
    }
    Ok(rows)
}

/// Read and parse rows from a JSON file.
pub fn load_rows(path: &Path) -> Result<Vec<CustomerRow>, CardError> {
    let json = fs::read_to_string(path)
        .map_err(|e| CardError::Input(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_rows(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_keys_are_empty() {
        let row = CustomerRow::from_fields([("id", "9")]);
        assert_eq!(row.id, "9");
        assert_eq!(row.name, "");
        assert_eq!(row.loan_amount, "");
        assert_eq!(row.bank_logo_path, None);
    }

    #[test]
    fn test_keys_are_normalised() {
        let row = CustomerRow::from_fields([(" Phone_Number ", " +919876543210 "), ("IFSC", "SBIN0001234")]);
        assert_eq!(row.phone_number, "+919876543210");
        assert_eq!(row.ifsc, "SBIN0001234");
    }

    #[test]
    fn test_optional_fields_empty_is_none() {
        let row = CustomerRow::from_fields([("emi_id", "  "), ("account_holder", "R. Kumar")]);
        assert_eq!(row.emi_id, None);
        assert_eq!(row.account_holder.as_deref(), Some("R. Kumar"));
    }

    #[test]
    fn test_fallbacks() {
        let row = CustomerRow::from_fields([("id", "12"), ("name", "Meena")]);
        assert_eq!(row.emi_id(), "12");
        assert_eq!(row.account_holder(), "Meena");

        let row = CustomerRow::from_fields([("id", "12"), ("emi_id", "EMI-77")]);
        assert_eq!(row.emi_id(), "EMI-77");
    }

    #[test]
    fn test_file_id_sanitised() {
        assert_eq!(CustomerRow::from_fields([("id", "7")]).file_id(), "7");
        assert_eq!(CustomerRow::from_fields([("id", "../etc/x")]).file_id(), "_etc_x");
        assert_eq!(CustomerRow::from_fields([("id", "")]).file_id(), UNKNOWN_ID);
        assert_eq!(CustomerRow::from_fields([("id", "..")]).file_id(), UNKNOWN_ID);
    }

    #[test]
    fn test_parse_rows_scalars() {
        let rows = parse_rows(r#"[{"id": 7, "loan_amount": 150000.5, "emi_id": null, "name": "A"}]"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[0].loan_amount, "150000.5");
        assert_eq!(rows[0].emi_id, None);
    }

    #[test]
    fn test_parse_rows_empty_is_error() {
        assert!(matches!(parse_rows("[]"), Err(CardError::NoRows)));
    }

    #[test]
    fn test_parse_rows_rejects_non_array() {
        assert!(matches!(parse_rows(r#"{"id": "1"}"#), Err(CardError::Input(_))));
        assert!(matches!(parse_rows("[1, 2]"), Err(CardError::Input(_))));
        assert!(matches!(parse_rows("not json"), Err(CardError::Input(_))));
    }

    #[test]
    fn test_load_rows_missing_file() {
        let err = load_rows(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CardError::Input(_)));
    }
}
