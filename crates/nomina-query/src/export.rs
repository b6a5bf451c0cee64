//! Spreadsheet projection of a view
//!
//! Turns the visible rows into a typed table (labels, cell kinds, width hints and
//! header style) that a workbook writer can emit without knowing anything about
//! payroll records.

use crate::column::{display_label, format_amount};
use crate::engine::View;
use crate::taxonomy::ordered_headers;
use chrono::NaiveDate;
use nomina_parser::CellValue;
use serde::Serialize;

/// Upper bound for a column width hint, in characters
pub const MAX_COLUMN_WIDTH: usize = 60;

/// Extra characters added to the widest cell of a column
pub const WIDTH_PADDING: usize = 2;

/// Display format of numeric cells
pub const NUMBER_FORMAT: &str = "#,##0.00";

pub const SHEET_NAME: &str = "Nóminas";

/// Base name used when the caller does not provide one
pub const DEFAULT_BASE_NAME: &str = "datos_nomina";

/// Header row styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderStyle {
    pub bold: bool,
    /// RGB font color
    pub font_color: u32,
    /// RGB fill color
    pub fill_color: u32,
    pub centered: bool,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            bold: true,
            font_color: 0xFFFFFF,
            fill_color: 0x4F46E5,
            centered: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportColumn {
    /// Record key the column reads
    pub key: String,
    /// Header text written to the sheet
    pub label: String,
    pub is_numeric: bool,
    /// Width hint in characters
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportCell {
    Number(f64),
    Text(String),
    Empty,
}

impl ExportCell {
    /// Characters the cell takes once formatted
    fn display_width(&self) -> usize {
        match self {
            Self::Number(n) => format_amount(*n).chars().count(),
            Self::Text(s) => s.chars().count(),
            Self::Empty => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportTable {
    pub sheet_name: String,
    pub columns: Vec<ExportColumn>,
    pub rows: Vec<Vec<ExportCell>>,
    pub header_style: HeaderStyle,
    pub number_format: String,
}

impl ExportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds an [`ExportTable`] from a view
#[derive(Debug, Clone, Copy)]
pub struct ExportProjector {
    max_width: usize,
}

impl Default for ExportProjector {
    fn default() -> Self {
        Self {
            max_width: MAX_COLUMN_WIDTH,
        }
    }
}

impl ExportProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    /// Project the rows of `view`, in view order.
    ///
    /// Headers are derived from the visible rows only, so columns that no visible
    /// row holds are left out.
    pub fn project(&self, view: &View) -> ExportTable {
        let headers = ordered_headers(view.iter());

        let numeric: Vec<bool> = headers
            .iter()
            .map(|h| {
                view.iter()
                    .find_map(|row| row.get(h))
                    .is_some_and(CellValue::is_number)
            })
            .collect();

        let rows: Vec<Vec<ExportCell>> = view
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .zip(&numeric)
                    .map(|(h, &is_numeric)| match row.get(h) {
                        Some(CellValue::Number(n)) if is_numeric => ExportCell::Number(*n),
                        Some(value) => ExportCell::Text(value.to_text()),
                        None => ExportCell::Empty,
                    })
                    .collect()
            })
            .collect();

        let columns = headers
            .iter()
            .zip(&numeric)
            .enumerate()
            .map(|(idx, (key, &is_numeric))| {
                let label = display_label(key).to_string();
                let widest = rows
                    .iter()
                    .map(|r| r[idx].display_width())
                    .chain(std::iter::once(label.chars().count()))
                    .max()
                    .unwrap_or_default();

                ExportColumn {
                    key: key.clone(),
                    label,
                    is_numeric,
                    width: (widest + WIDTH_PADDING).min(self.max_width),
                }
            })
            .collect();

        ExportTable {
            sheet_name: SHEET_NAME.to_string(),
            columns,
            rows,
            header_style: HeaderStyle::default(),
            number_format: NUMBER_FORMAT.to_string(),
        }
    }
}

/// Workbook file name: `{base}_{YYYY-MM-DD}.xlsx`, with the default base when blank
pub fn export_file_name(base: &str, date: NaiveDate) -> String {
    let base = base.trim();
    let base = if base.is_empty() { DEFAULT_BASE_NAME } else { base };
    format!("{}_{}.xlsx", base, date.format("%Y-%m-%d"))
}
