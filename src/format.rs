//! Field value formatting: currency amounts and due dates.
//!
//! Both degrade to [`NOT_AVAILABLE`] instead of failing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder for values that are missing or unparseable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Input formats accepted for due dates, tried in order.
const DATE_INPUT_FORMATS: &[&str] = &["%d-%b-%Y", "%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Output format for due dates (e.g. `05-Nov-2025`).
const DATE_OUTPUT_FORMAT: &str = "%d-%b-%Y";

/// Digit grouping for the integer part of an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// Lakh/crore grouping: `1,50,00,000`.
    #[default]
    Indian,
    /// Thousands grouping: `15,000,000`.
    Western,
}

/// How amounts are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping: Grouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "\u{20b9}".to_string(),
            grouping: Grouping::Indian,
        }
    }
}

impl CurrencyFormat {
    /// Format a raw amount, or `None` if it is not a finite number.
    ///
    /// The value is rounded to a whole number; there are no decimal places.
    /// Existing comma separators in the input are ignored.
    pub fn format(&self, raw: &str) -> Option<String> {
        let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
        if cleaned.is_empty() {
            return None;
        }
        let value: f64 = cleaned.parse().ok()?;
        if !value.is_finite() {
            return None;
        }

        let rounded = value.round();
        let digits = format!("{:.0}", rounded.abs());
        let sign = if rounded < 0.0 { "-" } else { "" };
        Some(format!("{}{}{}", sign, self.symbol, group_digits(&digits, self.grouping)))
    }

    /// Format a raw amount, falling back to [`NOT_AVAILABLE`].
    pub fn format_or_na(&self, raw: &str) -> String {
        self.format(raw).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Insert commas into a string of ASCII digits.
pub fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let group = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}

/// Parse a due date in any accepted format and render it canonically.
pub fn format_due_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.format(DATE_OUTPUT_FORMAT).to_string())
}
