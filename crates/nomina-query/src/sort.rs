//! Single-key row ordering
//!
//! Absent values always sort last, whatever the direction. Date columns compare
//! parsed timestamps, numbers compare numerically, everything else uses a
//! locale-style text collation.

use crate::column::{is_date_column, parse_date};
use nomina_parser::{keys, CellValue, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Orient a value comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Active sort: one column and a direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::asc(keys::FECHA_INICIAL_PAGO)
    }
}

impl SortSpec {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Sort requested on `key`: flips to descending when `key` is already sorted
    /// ascending, otherwise sorts ascending.
    pub fn toggled(&self, key: &str) -> Self {
        if self.key == key && self.direction == SortDirection::Asc {
            Self::desc(key)
        } else {
            Self::asc(key)
        }
    }

    /// Compare two rows under this spec
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (a.get(&self.key), b.get(&self.key)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => self.direction.apply(compare_values(&self.key, x, y)),
        }
    }
}

/// Compare two present values of column `key`.
///
/// If either side of a date comparison fails to parse, the pair is equal.
pub fn compare_values(key: &str, a: &CellValue, b: &CellValue) -> Ordering {
    if is_date_column(key) {
        return match (parse_date(&a.to_text()), parse_date(&b.to_text())) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        };
    }

    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => collate(&a.to_text(), &b.to_text()),
    }
}

/// Text collation: case- and accent-insensitive first, then accents, then case
/// (lowercase before uppercase), then code points.
pub fn collate(a: &str, b: &str) -> Ordering {
    let base = |s: &str| -> Vec<char> { s.chars().flat_map(char::to_lowercase).map(fold_accent).collect() };
    let lower = |s: &str| -> Vec<char> { s.chars().flat_map(char::to_lowercase).collect() };

    base(a)
        .cmp(&base(b))
        .then_with(|| lower(a).cmp(&lower(b)))
        .then_with(|| {
            let case = |s: &str| -> Vec<bool> { s.chars().map(char::is_uppercase).collect() };
            case(a).cmp(&case(b))
        })
        .then_with(|| a.cmp(b))
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Stable merge sort that tolerates comparators which are not a total order.
///
/// `slice::sort_by` may panic on such comparators, and unparsable dates compare
/// equal to everything.
pub(crate) fn stable_sort_by<T: Copy>(items: &mut Vec<T>, cmp: impl Fn(&T, &T) -> Ordering) {
    if items.len() < 2 {
        return;
    }

    let mut buffer = items.clone();
    let mut width = 1;
    while width < items.len() {
        let mut start = 0;
        while start < items.len() {
            let mid = (start + width).min(items.len());
            let end = (start + 2 * width).min(items.len());
            let (mut i, mut j, mut k) = (start, mid, start);
            while i < mid && j < end {
                // take from the right only when strictly smaller, which keeps the sort stable
                if cmp(&items[j], &items[i]) == Ordering::Less {
                    buffer[k] = items[j];
                    j += 1;
                } else {
                    buffer[k] = items[i];
                    i += 1;
                }
                k += 1;
            }
            buffer[k..k + (mid - i)].copy_from_slice(&items[i..mid]);
            k += mid - i;
            buffer[k..k + (end - j)].copy_from_slice(&items[j..end]);
            start = end;
        }
        std::mem::swap(items, &mut buffer);
        width *= 2;
    }
}
