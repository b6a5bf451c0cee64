use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table with a totals row
    #[default]
    Table,
    /// JSON for programmatic consumption
    Json,
    /// CSV for spreadsheets and scripts
    Csv,
}

#[derive(Parser)]
#[command(name = "nomina")]
#[command(about = "nomina - browse, filter and export CFDI payroll receipts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value or defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/nomina/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Level requested on the command line, if any
    pub fn requested_level(&self) -> Option<LevelFilter> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.into()),
            (None, true) => Some(LevelFilter::DEBUG),
            (None, false) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the filtered and sorted receipts
    Show {
        #[command(flatten)]
        view: ViewArgs,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Omit the header line (csv format)
        #[arg(long)]
        no_header: bool,
    },

    /// Write the filtered and sorted receipts to an .xlsx workbook
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Directory for the workbook (defaults to config, then the current directory)
        #[arg(short = 'o', long)]
        output_dir: Option<PathBuf>,

        /// Base file name; the export date and extension are appended
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// List the columns found in the receipts
    Columns {
        /// Receipt files or directories containing *.xml files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Inputs, filters and sort shared by `show` and `export`
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Receipt files or directories containing *.xml files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Case-insensitive substring filter (can be repeated)
    /// Format: KEY=TEXT
    #[arg(long = "filter", value_name = "KEY=TEXT")]
    pub filters: Vec<String>,

    /// Exact date selection; repeat to select several values
    /// Format: KEY=VALUE
    #[arg(long = "date", value_name = "KEY=VALUE")]
    pub dates: Vec<String>,

    /// Column to sort by (defaults to the configured sort)
    #[arg(short = 's', long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize a new config file
    Init {
        /// Path for the config file (defaults to ~/.config/nomina/config.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite existing config file
        #[arg(short = 'F', long)]
        force: bool,
    },

    /// Show the current effective configuration
    Show {
        /// Output format (toml, json)
        #[arg(short = 'f', long, default_value = "toml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_arguments() {
        let cli = Cli::try_parse_from([
            "nomina",
            "show",
            "a.xml",
            "dir",
            "--filter",
            "Nombre Receptor=ana",
            "--date",
            "FechaPago=2024-01-15",
            "--sort",
            "Total",
            "--desc",
            "-f",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Show {
                view,
                format,
                no_header,
            } => {
                assert_eq!(view.paths.len(), 2);
                assert_eq!(view.filters, ["Nombre Receptor=ana"]);
                assert_eq!(view.dates, ["FechaPago=2024-01-15"]);
                assert_eq!(view.sort.as_deref(), Some("Total"));
                assert!(view.desc);
                assert_eq!(format, OutputFormat::Json);
                assert!(!no_header);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["nomina", "show", "a.xml", "--desc"]).is_err());
    }

    #[test]
    fn test_requested_level() {
        let cli = Cli::try_parse_from(["nomina", "-v", "columns", "a.xml"]).unwrap();
        assert_eq!(cli.requested_level(), Some(LevelFilter::DEBUG));

        let cli = Cli::try_parse_from(["nomina", "-v", "-l", "error", "columns", "a.xml"]).unwrap();
        assert_eq!(cli.requested_level(), Some(LevelFilter::ERROR));

        let cli = Cli::try_parse_from(["nomina", "columns", "a.xml"]).unwrap();
        assert_eq!(cli.requested_level(), None);
    }
}
