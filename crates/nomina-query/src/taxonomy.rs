//! Column taxonomy
//!
//! Reconciles the keys of heterogeneous records into one header sequence:
//!
//! ```text
//! lead (fixed) → perceptions (sorted) → deductions (sorted) → other payments (sorted) → trail (fixed)
//! ```
//!
//! The derivation is a pure function of the record set and is recomputed from
//! scratch whenever that set changes.

use crate::column::{is_date_column, parse_date, ColumnKind};
use nomina_parser::{keys, Record};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Well-known headers that open the table, in display order
pub const LEAD_HEADERS: [&str; 11] = [
    keys::UUID,
    keys::FECHA_TIMBRADO,
    keys::FECHA_INICIAL_PAGO,
    keys::FECHA_FINAL_PAGO,
    keys::FECHA_PAGO,
    keys::RFC_RECEPTOR,
    keys::NOMBRE_RECEPTOR,
    keys::TIPO_NOMINA,
    keys::TOTAL_PERCEPCIONES,
    keys::TOTAL_DEDUCCIONES,
    keys::TOTAL_OTROS_PAGOS,
];

/// Well-known headers that close the table, in display order
pub const TRAIL_HEADERS: [&str; 4] = [
    keys::NUM_DIAS_PAGADOS,
    keys::TIPO_DE_COMPROBANTE,
    keys::VERSION,
    keys::TOTAL,
];

/// Bucket a key falls into, by name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnGroup {
    Lead,
    Perception,
    Deduction,
    OtherPayment,
    Trail,
}

impl ColumnGroup {
    /// Classify a key; `None` for keys that are never displayed (e.g. `fileName`)
    pub fn of(key: &str) -> Option<Self> {
        if LEAD_HEADERS.contains(&key) {
            Some(Self::Lead)
        } else if TRAIL_HEADERS.contains(&key) {
            Some(Self::Trail)
        } else if key.contains(keys::TAXED_SUFFIX) || key.contains(keys::EXEMPT_SUFFIX) {
            Some(Self::Perception)
        } else if key.starts_with(keys::DEDUCTION_PREFIX) {
            Some(Self::Deduction)
        } else if key.starts_with(keys::OTHER_PAYMENT_PREFIX) {
            Some(Self::OtherPayment)
        } else {
            None
        }
    }
}

/// Ordered, deduplicated headers for a set of records.
///
/// Only keys that at least one record holds are returned.
pub fn ordered_headers<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    let union: BTreeSet<&str> = records.into_iter().flat_map(|r| r.keys()).collect();

    LEAD_HEADERS
        .iter()
        .copied()
        .chain(group(&union, ColumnGroup::Perception))
        .chain(group(&union, ColumnGroup::Deduction))
        .chain(group(&union, ColumnGroup::OtherPayment))
        .chain(TRAIL_HEADERS.iter().copied())
        .filter(|k| union.contains(k))
        .map(str::to_string)
        .collect()
}

/// Keys of one variable group; BTreeSet iteration is already lexicographic
fn group<'u>(
    union: &'u BTreeSet<&'u str>,
    wanted: ColumnGroup,
) -> impl Iterator<Item = &'u str> + 'u {
    union
        .iter()
        .copied()
        .filter(move |k| ColumnGroup::of(k) == Some(wanted))
}

/// Header list plus per-column classification for a record collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Taxonomy {
    headers: Vec<String>,
    kinds: HashMap<String, ColumnKind>,
    date_options: HashMap<String, Vec<String>>,
}

impl Taxonomy {
    /// Derive the taxonomy of `records`
    pub fn resolve(records: &[Record]) -> Self {
        let headers = ordered_headers(records);
        let mut kinds = HashMap::with_capacity(headers.len());
        let mut date_options = HashMap::new();

        for header in &headers {
            let kind = classify(records, header);
            if kind == ColumnKind::Date {
                date_options.insert(header.clone(), distinct_dates(records, header));
            }
            kinds.insert(header.clone(), kind);
        }

        Self {
            headers,
            kinds,
            date_options,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Kind of `key`; unknown keys are text
    pub fn kind(&self, key: &str) -> ColumnKind {
        self.kinds.get(key).copied().unwrap_or(ColumnKind::Text)
    }

    /// Distinct values of a date column, oldest first; empty for other columns
    pub fn date_options(&self, key: &str) -> &[String] {
        self.date_options
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Headers with their kinds, in display order
    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.headers.iter().map(|h| (h.as_str(), self.kind(h)))
    }
}

/// Date by name; otherwise numeric when the first record holding the key stores a number
fn classify(records: &[Record], key: &str) -> ColumnKind {
    if is_date_column(key) {
        return ColumnKind::Date;
    }

    match records.iter().find_map(|r| r.get(key)) {
        Some(value) if value.is_number() => ColumnKind::Numeric,
        _ => ColumnKind::Text,
    }
}

fn distinct_dates(records: &[Record], key: &str) -> Vec<String> {
    let mut values: Vec<String> = records
        .iter()
        .filter_map(|r| r.get(key))
        .filter(|v| !v.is_blank())
        .map(|v| v.to_text())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // unparsable values are never less than parsable ones
    values.sort_by(|a, b| match (parse_date(a), parse_date(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    values
}
