//! Column classification helpers
//!
//! Nothing here looks at a declared schema: columns are classified from their name
//! and from the values records actually hold.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use nomina_parser::keys;
use serde::{Deserialize, Serialize};

/// Token whose presence in a column name marks a date column
pub const DATE_TOKEN: &str = "fecha";

/// How a column is filtered, sorted and formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Date,
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

/// Case-insensitive name test for date columns
pub fn is_date_column(key: &str) -> bool {
    key.to_lowercase().contains(DATE_TOKEN)
}

/// Header text shown to people: deduction and other-payment prefixes removed
pub fn display_label(key: &str) -> &str {
    key.strip_prefix(keys::DEDUCTION_PREFIX)
        .or_else(|| key.strip_prefix(keys::OTHER_PAYMENT_PREFIX))
        .unwrap_or(key)
}

/// Parse a date cell into a comparable timestamp.
///
/// Accepts plain dates, ISO timestamps without offset and RFC 3339.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Format an amount with thousands separators and two decimals (`1,234.50`)
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
