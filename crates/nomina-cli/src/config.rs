use anyhow::{Context, Result};
use nomina_query::{SortDirection, SortSpec, DEFAULT_BASE_NAME, MAX_COLUMN_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// Skip the user config file entirely (used by tests)
pub const TEST_MODE_ENV: &str = "NOMINA_TEST_MODE";
/// Override for `export.output_dir`
pub const EXPORT_DIR_ENV: &str = "NOMINA_EXPORT_DIR";
/// Override for `logging.level`
pub const LOG_LEVEL_ENV: &str = "NOMINA_LOG_LEVEL";

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Workbook export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Table view settings
    #[serde(default)]
    pub view: ViewConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Base file name; the export date and `.xlsx` are appended
    #[serde(default = "default_base_name")]
    pub base_name: String,

    /// Directory workbooks are written to (current directory when unset)
    pub output_dir: Option<PathBuf>,

    /// Upper bound for column width hints
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,
}

/// View configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Column a fresh batch is sorted by; empty keeps file order
    #[serde(default = "default_sort_key")]
    pub default_sort: String,

    /// Direction of the default sort
    #[serde(default)]
    pub default_direction: SortDirection,

    /// Longest cell shown by the table format before it is cut with "..."
    #[serde(default = "default_max_cell_width")]
    pub max_cell_width: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when no flag is given (off, error, warn, info, debug, trace)
    pub level: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_name: default_base_name(),
            output_dir: None,
            max_column_width: default_max_column_width(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort_key(),
            default_direction: SortDirection::default(),
            max_cell_width: default_max_cell_width(),
        }
    }
}

fn default_base_name() -> String {
    DEFAULT_BASE_NAME.to_string()
}

fn default_max_column_width() -> usize {
    MAX_COLUMN_WIDTH
}

fn default_max_cell_width() -> usize {
    40
}

fn default_sort_key() -> String {
    SortSpec::default().key
}

impl ViewConfig {
    /// Sort applied to a fresh batch
    pub fn sort_spec(&self) -> Option<SortSpec> {
        let key = self.default_sort.trim();
        if key.is_empty() {
            return None;
        }
        Some(SortSpec {
            key: key.to_string(),
            direction: self.default_direction,
        })
    }
}

impl CliConfig {
    /// Load configuration with precedence: defaults < file < env
    ///
    /// Command line flags are applied on top by the commands themselves.
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        if let Ok(dir) = std::env::var(EXPORT_DIR_ENV) {
            config.export.output_dir = Some(PathBuf::from(dir));
        }
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            config.logging.level = Some(level);
        }

        Ok(config)
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("nomina");
        Ok(config_dir.join("config.toml"))
    }

    /// Configured log level; unparsable values fall back to `warn`
    pub fn log_level(&self) -> LevelFilter {
        self.logging
            .level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::WARN)
    }

    /// Create a new config file with example values
    pub fn create_example(path: &Path) -> Result<()> {
        let example = r#"# nomina CLI Configuration
# Location: ~/.config/nomina/config.toml

[export]
# Base file name of exported workbooks; "_YYYY-MM-DD.xlsx" is appended
base_name = "datos_nomina"

# Directory workbooks are written to
# Default: current directory (NOMINA_EXPORT_DIR overrides)
# output_dir = "/home/user/Documents/nominas"

# Upper bound for column widths, in characters
max_column_width = 60

[view]
# Column a freshly loaded batch is sorted by; "" keeps file order
default_sort = "FechaInicialPago"

# "asc" or "desc"
default_direction = "asc"

# Longest cell shown by `nomina show` before it is cut
max_cell_width = 40

[logging]
# off, error, warn, info, debug, trace (NOMINA_LOG_LEVEL overrides)
level = "warn"
"#;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, example).context("Failed to write config file")?;

        Ok(())
    }

    /// Load config from file or return default
    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        if std::env::var(TEST_MODE_ENV).is_ok() && config_file.is_none() {
            return Ok(Self::default());
        }

        let path = config_file
            .or_else(|| Self::default_config_path().ok())
            .filter(|p| p.exists());

        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config as TOML")
    }

    /// Display the current configuration as JSON
    pub fn display_as_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config as JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.export.base_name, "datos_nomina");
        assert_eq!(config.export.max_column_width, 60);
        assert_eq!(config.view.sort_spec(), Some(SortSpec::asc("FechaInicialPago")));
        assert_eq!(config.view.max_cell_width, 40);
        assert_eq!(config.log_level(), LevelFilter::WARN);
    }

    #[test]
    fn test_create_example_round_trips() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("nested").join("config.toml");

        CliConfig::create_example(&config_path).unwrap();

        let contents = std::fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("nomina CLI Configuration"));
        let parsed = CliConfig::from_file(&config_path).unwrap();
        assert_eq!(parsed.export, ExportConfig::default());
        assert_eq!(parsed.view, ViewConfig::default());
        assert_eq!(parsed.logging.level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[view]\ndefault_sort = \"Total\"\ndefault_direction = \"desc\"\n",
        )
        .unwrap();

        let config = CliConfig::from_file(&config_path).unwrap();
        assert_eq!(config.view.sort_spec(), Some(SortSpec::desc("Total")));
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn test_empty_default_sort_disables_sorting() {
        let view = ViewConfig {
            default_sort: "  ".to_string(),
            default_direction: SortDirection::Asc,
            ..ViewConfig::default()
        };
        assert_eq!(view.sort_spec(), None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        std::fs::write(&config_path, "[export\nbase_name = 1").unwrap();

        let err = CliConfig::from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_log_level_parsing() {
        let mut config = CliConfig::default();
        config.logging.level = Some("debug".to_string());
        assert_eq!(config.log_level(), LevelFilter::DEBUG);

        config.logging.level = Some("loud".to_string());
        assert_eq!(config.log_level(), LevelFilter::WARN);
    }

    #[test]
    fn test_display_formats() {
        let config = CliConfig::default();
        let toml_str = config.display_as_toml().unwrap();
        assert!(toml_str.contains("[export]"));
        assert!(toml_str.contains("base_name"));

        let json_str = config.display_as_json().unwrap();
        assert!(json_str.contains("\"view\""));
        assert!(json_str.contains("\"default_sort\""));
    }
}
