//! Session state
//!
//! A session owns the loaded record collection together with the filters and
//! sort applied to it. Loading a batch replaces all of it at once; clearing
//! returns to the initial state. Derived data (taxonomy, view, totals, export
//! table) is recomputed from the owned state on request.

use crate::loader::BatchOutcome;
use nomina_parser::Record;
use nomina_query::{
    ExportProjector, ExportTable, FilterSet, FilterValue, Query, SortSpec, Taxonomy, Totals, View,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    records: Vec<Record>,
    taxonomy: Taxonomy,
    query: Query,
    default_sort: Option<SortSpec>,
    error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty session sorted by period start, ascending
    pub fn new() -> Self {
        Self::with_default_sort(Some(SortSpec::default()))
    }

    /// Empty session whose fresh batches start with `sort`
    pub fn with_default_sort(sort: Option<SortSpec>) -> Self {
        Self {
            records: Vec::new(),
            taxonomy: Taxonomy::default(),
            query: Query::new(FilterSet::new(), sort.clone()),
            default_sort: sort,
            error: None,
        }
    }

    /// Swap in a freshly loaded batch.
    ///
    /// Records, filters and sort are all replaced; the batch summary becomes the
    /// session error, if any document failed.
    pub fn replace_batch(&mut self, outcome: BatchOutcome) {
        let error = outcome.summary();
        let taxonomy = Taxonomy::resolve(&outcome.records);

        debug!(
            records = outcome.records.len(),
            columns = taxonomy.len(),
            "session replaced"
        );

        *self = Self {
            records: outcome.records,
            taxonomy,
            query: Query::new(FilterSet::new(), self.default_sort.clone()),
            default_sort: self.default_sort.take(),
            error,
        };
    }

    /// Drop records, filters, sort and error
    pub fn clear(&mut self) {
        *self = Self::with_default_sort(self.default_sort.take());
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn filters(&self) -> &FilterSet {
        &self.query.filters
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.query.sort.as_ref()
    }

    /// Summary of the last batch's failures
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: FilterValue) {
        self.query.filters.set(key, value);
    }

    pub fn toggle_choice(&mut self, key: &str, option: &str) {
        self.query.filters.toggle_choice(key, option);
    }

    /// Select every date option of `key`, or none when all are selected
    pub fn toggle_all_dates(&mut self, key: &str) {
        let options = self.taxonomy.date_options(key).to_vec();
        self.query.filters.toggle_all(key, &options);
    }

    pub fn clear_filters(&mut self) {
        self.query.filters.clear_all();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.query.sort = sort;
    }

    /// Header click: flip direction on the active column, otherwise sort ascending
    pub fn toggle_sort(&mut self, key: &str) {
        let next = match &self.query.sort {
            Some(current) => current.toggled(key),
            None => SortSpec::asc(key),
        };
        self.query.sort = Some(next);
    }

    /// Visible rows
    pub fn view(&self) -> View<'_> {
        self.query.execute(&self.records)
    }

    /// Sums of the visible rows over every known header
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.view(), self.taxonomy.headers())
    }

    /// Spreadsheet table of the visible rows
    pub fn export(&self, projector: &ExportProjector) -> ExportTable {
        projector.project(&self.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{BatchLoader, Document};
    use nomina_parser::test_utils::CfdiBuilder;
    use nomina_query::SortDirection;

    fn loaded(documents: &[Document]) -> Session {
        let mut session = Session::new();
        session.replace_batch(BatchLoader::new().load_documents(documents));
        session
    }

    fn two_receipts() -> Vec<Document> {
        vec![
            Document::new(
                "a.xml",
                CfdiBuilder::new()
                    .uuid("A")
                    .period("2024-01-16", "2024-01-31", "2024-01-31")
                    .build(),
            ),
            Document::new(
                "b.xml",
                CfdiBuilder::new()
                    .uuid("B")
                    .period("2024-01-01", "2024-01-15", "2024-01-15")
                    .build(),
            ),
        ]
    }

    #[test]
    fn test_fresh_session_sorts_by_period_start() {
        let session = loaded(&two_receipts());
        assert_eq!(session.sort(), Some(&SortSpec::default()));

        let first = session.view().first().and_then(|r| r.get("UUID")).cloned();
        assert_eq!(first.map(|v| v.to_text()), Some("B".to_string()));
    }

    #[test]
    fn test_new_batch_resets_filters_and_sort() {
        let mut session = loaded(&two_receipts());
        session.set_filter("UUID", FilterValue::Text("a".to_string()));
        session.toggle_sort("Total");
        assert_eq!(session.view().len(), 1);

        session.replace_batch(BatchLoader::new().load_documents(&two_receipts()));

        assert!(session.filters().is_unconstrained());
        assert_eq!(session.sort(), Some(&SortSpec::default()));
        assert_eq!(session.view().len(), 2);
    }

    #[test]
    fn test_toggle_sort_twice_flips_direction() {
        let mut session = Session::new();
        session.toggle_sort("FechaInicialPago");
        assert_eq!(
            session.sort().map(|s| s.direction),
            Some(SortDirection::Desc)
        );
        session.toggle_sort("FechaInicialPago");
        assert_eq!(session.sort().map(|s| s.direction), Some(SortDirection::Asc));

        session.set_sort(None);
        session.toggle_sort("Total");
        assert_eq!(session.sort(), Some(&SortSpec::asc("Total")));
    }

    #[test]
    fn test_toggle_all_dates_uses_taxonomy_options() {
        let mut session = loaded(&two_receipts());
        session.toggle_all_dates("FechaPago");
        assert_eq!(
            session.filters().get("FechaPago"),
            Some(&FilterValue::Choices(vec![
                "2024-01-15".to_string(),
                "2024-01-31".to_string()
            ]))
        );
        assert_eq!(session.view().len(), 2);

        session.toggle_choice("FechaPago", "2024-01-15");
        assert_eq!(session.view().len(), 1);
    }

    #[test]
    fn test_clear_returns_to_initial_state() {
        let mut documents = two_receipts();
        documents.push(Document::new("bad.xml", "<nope"));
        let mut session = loaded(&documents);
        assert!(session.error().is_some());

        session.clear();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_custom_default_sort_survives_batches() {
        let mut session = Session::with_default_sort(Some(SortSpec::desc("Total")));
        session.replace_batch(BatchLoader::new().load_documents(&two_receipts()));
        assert_eq!(session.sort(), Some(&SortSpec::desc("Total")));

        session.clear();
        assert_eq!(session.sort(), Some(&SortSpec::desc("Total")));
    }
}
