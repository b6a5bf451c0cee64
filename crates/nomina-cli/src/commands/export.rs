use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use colored::Colorize;
use nomina_query::{export_file_name, ExportProjector};
use std::path::PathBuf;
use tracing::info;

use crate::cli::ViewArgs;
use crate::commands::load_session;
use crate::config::CliConfig;
use crate::xlsx::write_workbook;

/// Write the filtered and sorted receipts to a workbook
pub async fn execute(
    config: CliConfig,
    view: ViewArgs,
    output_dir: Option<PathBuf>,
    name: Option<String>,
) -> Result<()> {
    let session = load_session(&config, &view).await?;

    let projector = ExportProjector::new().with_max_width(config.export.max_column_width);
    let table = session.export(&projector);
    if table.is_empty() {
        bail!("Nothing to export: no receipts match the current filters");
    }

    let path = output_path(&config, output_dir, name, Utc::now().date_naive());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    write_workbook(&table, &path)?;
    info!("Exported {} receipts to {}", table.rows.len(), path.display());

    println!(
        "{} Exported {} receipts to {}",
        "Success:".green().bold(),
        table.rows.len(),
        path.display()
    );

    Ok(())
}

/// Workbook path; flags win over configuration
fn output_path(
    config: &CliConfig,
    output_dir: Option<PathBuf>,
    name: Option<String>,
    date: NaiveDate,
) -> PathBuf {
    let dir = output_dir
        .or_else(|| config.export.output_dir.clone())
        .unwrap_or_default();
    let base = name.unwrap_or_else(|| config.export.base_name.clone());
    dir.join(export_file_name(&base, date))
}
