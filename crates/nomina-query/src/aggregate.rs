//! Column totals over the current view

use crate::engine::View;
use nomina_parser::CellValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// Label shown in the first cell of a totals row
pub const TOTALS_LABEL: &str = "Totales";

/// Per-column sums of a view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Totals {
    sums: BTreeMap<String, f64>,
}

impl Totals {
    /// Sum every header whose value in the first row of the view is a number.
    ///
    /// Rows lacking the column contribute zero. An empty view has no totals.
    pub fn compute(view: &View, headers: &[String]) -> Self {
        let Some(first) = view.first() else {
            return Self::default();
        };

        let sums = headers
            .iter()
            .filter(|h| first.get(h).is_some_and(CellValue::is_number))
            .map(|h| {
                let sum = view.iter().map(|row| cell_amount(row.get(h))).sum();
                (h.clone(), sum)
            })
            .collect();

        Self { sums }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.sums.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }
}

/// Numeric contribution of a cell; numeric-looking text counts, anything else is zero
fn cell_amount(value: Option<&CellValue>) -> f64 {
    match value {
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Query;
    use nomina_parser::Record;

    fn headers(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_sums_numeric_columns_with_absent_as_zero() {
        let records = vec![
            Record::new().with("UUID", "a").with("D-002 ISR", 100.0).with("Total", 10.0),
            Record::new().with("UUID", "b").with("Total", 5.5),
            Record::new().with("UUID", "c").with("D-002 ISR", 250.0).with("Total", 1.0),
        ];
        let view = Query::default().execute(&records);

        let totals = Totals::compute(&view, &headers(&["UUID", "D-002 ISR", "Total"]));

        assert_eq!(totals.get("D-002 ISR"), Some(350.0));
        assert_eq!(totals.get("Total"), Some(16.5));
        assert_eq!(totals.get("UUID"), None);
    }

    #[test]
    fn test_classification_follows_first_view_row() {
        let records = vec![
            Record::new().with("UUID", "a"),
            Record::new().with("UUID", "b").with("D-002 ISR", 100.0),
        ];
        let view = Query::default().execute(&records);

        let totals = Totals::compute(&view, &headers(&["UUID", "D-002 ISR"]));
        assert!(totals.is_empty());
    }

    #[test]
    fn test_empty_view_has_no_totals() {
        let records: Vec<Record> = Vec::new();
        let view = Query::default().execute(&records);
        assert!(Totals::compute(&view, &headers(&["Total"])).is_empty());
    }
}
