// Output formatting for the receipt view
//
// Provides different output formats: table (human), JSON (machines), CSV (export)

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use nomina_parser::CellValue;
use nomina_pipeline::Session;
use nomina_query::{display_label, format_amount, ColumnKind, TOTALS_LABEL};

use crate::cli::OutputFormat;
use crate::config::ViewConfig;

/// Renders the visible rows of a session
pub trait OutputFormatter {
    fn format(&self, session: &Session) -> Result<String>;
}

/// Formatter for a CLI output format
pub fn formatter_for(
    format: OutputFormat,
    config: &ViewConfig,
    include_header: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Table => {
            Box::new(TableFormatter::new().with_max_width(config.max_cell_width))
        }
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv if include_header => Box::new(CsvFormatter::new()),
        OutputFormat::Csv => Box::new(CsvFormatter::new().without_header()),
    }
}

/// Cell text as shown to people: amounts with separators and two decimals
fn display_value(value: Option<&CellValue>) -> String {
    match value {
        Some(CellValue::Number(n)) => format_amount(*n),
        Some(CellValue::Text(s)) => s.clone(),
        None => String::new(),
    }
}

// ============================================================================
// Table Formatter (Human-Readable)
// ============================================================================

/// Table formatter with a totals footer row
pub struct TableFormatter {
    max_column_width: usize,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            max_column_width: 40,
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    fn truncate(&self, s: String) -> String {
        if s.chars().count() > self.max_column_width {
            let kept: String = s
                .chars()
                .take(self.max_column_width.saturating_sub(3))
                .collect();
            format!("{}...", kept)
        } else {
            s
        }
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableFormatter {
    fn format(&self, session: &Session) -> Result<String> {
        let view = session.view();
        if view.is_empty() {
            return Ok(format!("\n{} No receipts to show\n", "ℹ".cyan()));
        }

        let taxonomy = session.taxonomy();
        let headers = taxonomy.headers();
        let alignment = |key: &str| {
            if taxonomy.kind(key) == ColumnKind::Numeric {
                CellAlignment::Right
            } else {
                CellAlignment::Left
            }
        };

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(headers.iter().map(|h| {
            Cell::new(display_label(h))
                .fg(comfy_table::Color::Cyan)
                .set_alignment(alignment(h))
        }));

        for row in view.iter() {
            table.add_row(headers.iter().map(|h| {
                Cell::new(self.truncate(display_value(row.get(h)))).set_alignment(alignment(h))
            }));
        }

        let totals = session.totals();
        table.add_row(headers.iter().enumerate().map(|(idx, h)| {
            let text = match totals.get(h) {
                _ if idx == 0 => TOTALS_LABEL.to_string(),
                Some(sum) => format_amount(sum),
                None => String::new(),
            };
            Cell::new(text)
                .add_attribute(comfy_table::Attribute::Bold)
                .set_alignment(alignment(h))
        }));

        let footer = format!(
            "{} {} of {} receipts",
            "✓".green(),
            view.len(),
            session.records().len()
        );

        Ok(format!("\n{}\n{}\n", table, footer))
    }
}

// ============================================================================
// JSON Formatter (Machine-Readable)
// ============================================================================

/// JSON formatter: headers, rows in view order and totals
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, session: &Session) -> Result<String> {
        let view = session.view();
        let output = serde_json::json!({
            "headers": session.taxonomy().headers(),
            "rows": view.rows(),
            "row_count": view.len(),
            "totals": session.totals(),
        });

        if self.pretty {
            Ok(serde_json::to_string_pretty(&output)?)
        } else {
            Ok(serde_json::to_string(&output)?)
        }
    }
}

// ============================================================================
// CSV Formatter (Export-Friendly)
// ============================================================================

/// CSV formatter; raw values, one column per header
pub struct CsvFormatter {
    include_header: bool,
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self {
            include_header: true,
        }
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CsvFormatter {
    fn format(&self, session: &Session) -> Result<String> {
        let view = session.view();
        if view.is_empty() {
            return Ok(String::new());
        }

        let headers = session.taxonomy().headers();
        let mut writer = csv::Writer::from_writer(vec![]);

        if self.include_header {
            writer.write_record(headers.iter().map(|h| display_label(h)))?;
        }

        for row in view.iter() {
            writer.write_record(
                headers
                    .iter()
                    .map(|h| row.get(h).map(CellValue::to_text).unwrap_or_default()),
            )?;
        }

        let bytes = writer.into_inner()?;
        Ok(String::from_utf8(bytes)?)
    }
}
