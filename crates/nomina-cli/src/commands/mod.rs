pub mod columns;
pub mod config;
pub mod export;
pub mod show;

use anyhow::{bail, Result};
use colored::Colorize;
use nomina_pipeline::{BatchLoader, Session};
use nomina_query::{SortDirection, SortSpec};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::cli::ViewArgs;
use crate::config::CliConfig;

/// Extension picked up when a directory is given as input
const RECEIPT_EXTENSION: &str = "xml";

/// Expand directories into their `*.xml` files; other paths are kept as given
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = receipts_in(path);
            debug!("{} receipts found in {}", found.len(), path.display());
            found.sort();
            inputs.extend(found);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

fn receipts_in(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_receipt(path))
        .collect()
}

fn is_receipt(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(RECEIPT_EXTENSION))
}

/// Split a `KEY=VALUE` argument
pub fn parse_key_value(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => bail!("Invalid filter '{}': expected KEY=VALUE", raw),
    }
}

/// Load the inputs of `args` into a session with its filters and sort applied.
///
/// Documents that fail are reported on stderr; the rest are kept.
pub async fn load_session(config: &CliConfig, args: &ViewArgs) -> Result<Session> {
    let inputs = collect_inputs(&args.paths)?;
    if inputs.is_empty() {
        bail!("No receipts found in the given paths");
    }

    let outcome = BatchLoader::new().load_paths(&inputs).await;

    let mut session = Session::with_default_sort(config.view.sort_spec());
    session.replace_batch(outcome);

    warn_on_partial_batch(&session);
    apply_view_args(&mut session, args)?;
    Ok(session)
}

/// Print the batch summary on stderr when some documents failed
pub fn warn_on_partial_batch(session: &Session) {
    if let Some(error) = session.error() {
        eprintln!("{} {}", "Warning:".yellow().bold(), error);
    }
}

/// Replace the filters of a loaded session with `--filter` and `--date`, then
/// apply `--sort` and `--desc`
pub fn apply_view_args(session: &mut Session, args: &ViewArgs) -> Result<()> {
    session.clear_filters();

    for raw in &args.filters {
        let (key, needle) = parse_key_value(raw)?;
        session.set_filter(key, nomina_query::FilterValue::Text(needle));
    }

    let mut dates: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for raw in &args.dates {
        let (key, value) = parse_key_value(raw)?;
        dates.entry(key).or_default().push(value);
    }
    for (key, values) in dates {
        session.set_filter(key, nomina_query::FilterValue::Choices(values));
    }

    if let Some(key) = &args.sort {
        let direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        session.set_sort(Some(SortSpec {
            key: key.clone(),
            direction,
        }));
    }

    Ok(())
}
