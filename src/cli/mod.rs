//! Command-line interface for mysqlsh
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Overriding configuration with session arguments
//! - One-shot subcommands (complete, version, completion, config)

mod completion;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::Result;

pub use completion::{generate_completion, render_completion};

/// MySQL Shell SQL completion explorer
#[derive(Parser, Debug)]
#[command(
    name = "mysqlsh",
    version,
    about = "Grammar-driven MySQL code completion",
    long_about = "Completes MySQL statements by walking the grammar automaton at the caret.
Without a subcommand an interactive explorer starts: press Tab while typing, or
enter a line to list every completion at its end."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Default schema for unqualified object names
    #[arg(short = 'D', long, value_name = "NAME", global = true)]
    pub schema: Option<String>,

    /// Server version the grammar is checked against, e.g. 8.0.33
    #[arg(long, value_name = "VERSION", global = true)]
    pub server_version: Option<String>,

    /// Comma separated SQL mode, e.g. ANSI_QUOTES
    #[arg(long, value_name = "MODES", global = true)]
    pub sql_mode: Option<String>,

    /// Output format (table, json, plain)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace every automaton state)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for mysqlsh
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Complete a statement once and print the suggestions
    Complete {
        /// SQL text to complete
        #[arg(value_name = "SQL")]
        sql: String,

        /// Caret byte offset (defaults to the end of the text)
        #[arg(long, value_name = "OFFSET")]
        cursor: Option<usize>,

        /// Print raw grammar candidates instead of suggestions
        #[arg(long)]
        raw: bool,
    },

    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,

        /// List catalog schema names, one per line
        #[arg(long)]
        list_schemas: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Self::load_config(&args)?;

        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// An invalid file falls back to the defaults. Invalid argument values
    /// are reported, since the user typed them.
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config_path = args.config_file.as_deref();
        let mut config = Config::load_from_file(config_path)?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args)?;

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Override configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) -> Result<()> {
        Self::apply_server_args(config, args)?;
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);
        Ok(())
    }

    /// Apply server-related CLI arguments to configuration
    fn apply_server_args(config: &mut Config, args: &CliArgs) -> Result<()> {
        if let Some(schema) = &args.schema {
            config.server.default_schema = Some(schema.clone());
        }

        if let Some(version) = &args.server_version {
            config.server.version = version.clone();
            config.server_version()?;
        }

        if let Some(mode) = &args.sql_mode {
            config.server.sql_mode = mode.clone();
            config.sql_mode()?;
        }

        Ok(())
    }

    /// Apply display-related CLI arguments to configuration
    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if let Some(format_str) = &args.format {
            config.display.format = Self::parse_output_format(format_str);
        }

        if args.no_color {
            config.display.color_output = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };

        if args.very_verbose {
            config.completion.show_debug_output = true;
            config.completion.show_result = true;
        }
    }

    /// Parse output format string
    fn parse_output_format(format_str: &str) -> OutputFormat {
        format_str.parse().unwrap_or_else(|_| {
            eprintln!("Warning: Unknown format '{}', using table", format_str);
            OutputFormat::Table
        })
    }

    /// Handle subcommands that need no completion engine
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config {
                show,
                validate,
                list_schemas,
            }) => {
                self.handle_config_command(*show, *validate, *list_schemas)?;
                Ok(true)
            }
            Some(Commands::Complete { .. }) | None => Ok(false),
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("mysqlsh version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
        println!(
            "Default server version: {}",
            crate::parser::mysql::ServerVersion::default()
        );
    }

    /// Handle config subcommand
    fn handle_config_command(&self, show: bool, validate: bool, list_schemas: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        if list_schemas {
            for schema in &self.config.catalog.schemas {
                println!("{}", schema.name);
            }
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Print banner with version and session settings
    pub fn print_banner(&self) {
        if !self.args.quiet {
            println!("mysqlsh {} completion explorer", env!("CARGO_PKG_VERSION"));
            println!(
                "Server version {}, type \\help for commands.",
                self.config.server.version
            );
        }
    }
}
