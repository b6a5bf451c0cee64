//! Nomina Query
//!
//! Everything that happens to a record collection after extraction:
//! - [`Taxonomy`]: ordered headers and per-column kinds
//! - [`Query`]: filter predicates plus an optional single-key sort, producing a [`View`]
//! - [`Totals`]: per-column sums of a view
//! - [`ExportProjector`]: typed spreadsheet table for a view
//!
//! All of it is pure and recomputed from the collection on every change.

pub mod aggregate;
pub mod column;
pub mod engine;
pub mod export;
pub mod filter;
pub mod sort;
pub mod taxonomy;

pub use aggregate::{Totals, TOTALS_LABEL};
pub use column::{display_label, format_amount, is_date_column, parse_date, ColumnKind};
pub use engine::{Query, View};
pub use export::{
    export_file_name, ExportCell, ExportColumn, ExportProjector, ExportTable, HeaderStyle,
    DEFAULT_BASE_NAME, MAX_COLUMN_WIDTH, NUMBER_FORMAT, SHEET_NAME,
};
pub use filter::{FilterSet, FilterValue};
pub use sort::{compare_values, SortDirection, SortSpec};
pub use taxonomy::{ordered_headers, ColumnGroup, Taxonomy, LEAD_HEADERS, TRAIL_HEADERS};
