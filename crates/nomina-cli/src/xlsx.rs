//! Workbook writer for projected export tables

use anyhow::{Context, Result};
use nomina_query::{ExportCell, ExportTable, HeaderStyle};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};
use std::path::Path;
use tracing::debug;

fn header_format(style: &HeaderStyle) -> Format {
    let mut format = Format::new()
        .set_font_color(Color::RGB(style.font_color))
        .set_background_color(Color::RGB(style.fill_color));
    if style.bold {
        format = format.set_bold();
    }
    if style.centered {
        format = format
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
    }
    format
}

/// Write `table` as a single-sheet workbook at `path`
pub fn write_workbook(table: &ExportTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&table.sheet_name)?;

    let header = header_format(&table.header_style);
    let number = Format::new().set_num_format(&table.number_format);

    for (idx, column) in table.columns.iter().enumerate() {
        let col = u16::try_from(idx).context("Too many columns for a worksheet")?;
        worksheet.write_string_with_format(0, col, &column.label, &header)?;
        worksheet.set_column_width(col, column.width as f64)?;
    }

    for (row_idx, cells) in table.rows.iter().enumerate() {
        let row = u32::try_from(row_idx + 1).context("Too many rows for a worksheet")?;
        for (idx, cell) in cells.iter().enumerate() {
            let col = u16::try_from(idx).context("Too many columns for a worksheet")?;
            match cell {
                ExportCell::Number(n) => {
                    worksheet.write_number_with_format(row, col, *n, &number)?;
                }
                ExportCell::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                ExportCell::Empty => {}
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook: {}", path.display()))?;

    debug!(
        path = %path.display(),
        rows = table.rows.len(),
        columns = table.columns.len(),
        "workbook written"
    );
    Ok(())
}
