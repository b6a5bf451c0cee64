use anyhow::Result;

use crate::cli::{OutputFormat, ViewArgs};
use crate::commands::load_session;
use crate::config::CliConfig;
use crate::formatting::formatter_for;

/// Print the filtered and sorted receipts
pub async fn execute(
    config: CliConfig,
    view: ViewArgs,
    format: OutputFormat,
    no_header: bool,
) -> Result<()> {
    let session = load_session(&config, &view).await?;

    let output = formatter_for(format, &config.view, !no_header).format(&session)?;
    print!("{}", output);

    Ok(())
}
