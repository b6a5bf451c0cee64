use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use nomina_pipeline::{BatchLoader, Session};
use std::path::PathBuf;

use crate::commands::{collect_inputs, warn_on_partial_batch};
use crate::config::CliConfig;

/// List the columns of a batch with their kind and, for date columns, the
/// values available for selection
pub async fn execute(config: CliConfig, paths: Vec<PathBuf>) -> Result<()> {
    let inputs = collect_inputs(&paths)?;
    if inputs.is_empty() {
        bail!("No receipts found in the given paths");
    }

    let mut session = Session::with_default_sort(config.view.sort_spec());
    session.replace_batch(BatchLoader::new().load_paths(&inputs).await);

    warn_on_partial_batch(&session);

    println!("{}", render(&session));
    Ok(())
}

fn render(session: &Session) -> Table {
    let taxonomy = session.taxonomy();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Column", "Kind", "Values"]);

    for (key, kind) in taxonomy.columns() {
        table.add_row(vec![
            key.to_string(),
            kind.as_str().to_string(),
            taxonomy.date_options(key).join(", "),
        ]);
    }
    table
}
