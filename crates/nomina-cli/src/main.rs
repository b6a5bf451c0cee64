use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nomina_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (defaults < file < env); flags are applied per command
    let config = config::CliConfig::load(cli.config.clone())?;

    // Initialize logging: flag, then config/env, then warn. RUST_LOG still wins.
    let level = cli.requested_level().unwrap_or_else(|| config.log_level());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("Effective log level: {}", level);

    match cli.command {
        Commands::Show {
            view,
            format,
            no_header,
        } => commands::show::execute(config, view, format, no_header).await?,

        Commands::Export {
            view,
            output_dir,
            name,
        } => commands::export::execute(config, view, output_dir, name).await?,

        Commands::Columns { paths } => commands::columns::execute(config, paths).await?,

        Commands::Config(cmd) => commands::config::execute(config, cmd).await?,
    }

    Ok(())
}
