//! Configuration management for mysqlsh
//!
//! Configuration is read from a TOML file (default `~/.mysqlsh/config.toml`).
//! A missing file yields the defaults.
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::parser::mysql::{ServerVersion, SqlMode};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings that affect parsing
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion behaviour
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// History configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Object names offered as completions
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server version, e.g. "8.0.33"
    #[serde(default = "default_server_version")]
    pub version: String,

    /// Comma separated SQL mode list
    #[serde(default)]
    pub sql_mode: String,

    /// Schema used for unqualified object names
    #[serde(default)]
    pub default_schema: Option<String>,
}

/// Completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Trace every automaton state visited during collection
    #[serde(default)]
    pub show_debug_output: bool,

    /// Log the collected token and rule candidates
    #[serde(default)]
    pub show_result: bool,

    /// Include the rule stack in debug output
    #[serde(default)]
    pub show_rule_stack: bool,

    /// Include transitions in debug output
    #[serde(default)]
    pub debug_output_with_transitions: bool,

    /// Render keywords in upper case
    #[serde(default = "default_uppercase_keywords")]
    pub uppercase_keywords: bool,

    /// Maximum number of suggestions returned
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

/// Display and output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (table, json, plain)
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII table, one row per suggestion category
    Table,

    /// Pretty-printed JSON
    Json,

    /// One suggestion per line
    Plain,
}

/// Command history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Static object catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub schemas: Vec<SchemaConfig>,

    /// Accounts as `name@host`
    #[serde(default)]
    pub users: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub name: String,

    #[serde(default)]
    pub tables: Vec<TableConfig>,

    #[serde(default)]
    pub views: Vec<TableConfig>,

    #[serde(default)]
    pub functions: Vec<String>,

    #[serde(default)]
    pub procedures: Vec<String>,
}

/// Table or view with its columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,

    #[serde(default)]
    pub columns: Vec<String>,
}

// Default value functions
fn default_server_version() -> String {
    ServerVersion::default().to_string()
}

fn default_uppercase_keywords() -> bool {
    true
}

fn default_max_suggestions() -> usize {
    100
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_color_output() -> bool {
    true
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mysqlsh_history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: default_server_version(),
            sql_mode: String::new(),
            default_schema: None,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            show_debug_output: false,
            show_result: false,
            show_rule_stack: false,
            debug_output_with_transitions: false,
            uppercase_keywords: default_uppercase_keywords(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color_output: default_color_output(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `path`, or from the default path when `None`
    ///
    /// A missing file is not an error; defaults are returned instead.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !path.exists() {
            tracing::debug!("No configuration file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mysqlsh")
            .join("config.toml")
    }

    /// Save configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize configuration to TOML text
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Generic(e.to_string()).into())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server_version()?;
        self.sql_mode()?;

        if self.completion.max_suggestions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.max_suggestions".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        for schema in &self.catalog.schemas {
            if schema.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "catalog.schemas.name".to_string(),
                    value: schema.name.clone(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Parsed server version
    pub fn server_version(&self) -> Result<ServerVersion> {
        Ok(self.server.version.parse()?)
    }

    /// Parsed SQL mode
    pub fn sql_mode(&self) -> Result<SqlMode> {
        Ok(self.server.sql_mode.parse()?)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Plain => "plain",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(ConfigError::InvalidValue {
                field: "format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}
