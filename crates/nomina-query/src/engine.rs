//! Query engine
//!
//! Execution flow:
//! 1. Keep records that satisfy every filter predicate
//! 2. Stable-sort the survivors by the active sort spec, if any
//! 3. Return the rows as a fresh view borrowing the collection
//!
//! The engine never mutates the collection; every change to records, filters or
//! sort re-runs the whole query.

use crate::filter::FilterSet;
use crate::sort::{stable_sort_by, SortSpec};
use nomina_parser::Record;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Filter and sort state applied to a record collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub filters: FilterSet,
    pub sort: Option<SortSpec>,
}

impl Query {
    pub fn new(filters: FilterSet, sort: Option<SortSpec>) -> Self {
        Self { filters, sort }
    }

    /// Filter, then sort
    pub fn execute<'a>(&self, records: &'a [Record]) -> View<'a> {
        let mut rows: Vec<&'a Record> = records
            .iter()
            .filter(|record| self.filters.matches(record))
            .collect();

        if let Some(spec) = &self.sort {
            stable_sort_by(&mut rows, |a, b| spec.compare(a, b));
        }

        debug!(
            total = records.len(),
            visible = rows.len(),
            sort = self.sort.as_ref().map(|s| s.key.as_str()),
            "query executed"
        );

        View { rows }
    }
}

/// Filtered and sorted rows of a record collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> View<'a> {
    /// View over every record in collection order
    pub fn all(records: &'a [Record]) -> Self {
        Self {
            rows: records.iter().collect(),
        }
    }

    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&'a Record> {
        self.rows.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }
}
