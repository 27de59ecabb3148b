//! Explorer command parser
//!
//! Lines starting with a backslash change the session or control the
//! explorer:
//! - \use [schema]
//! - \sql_mode [modes]
//! - \version <x.y.z>
//! - \format <table|json|plain>
//! - \raw <sql>
//! - \help, \quit
//!
//! Any other line is SQL to complete at its end.

use crate::config::OutputFormat;
use crate::error::{Result, ShellError};
use crate::parser::mysql::{ServerVersion, SqlMode};

/// A parsed explorer line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Complete the SQL text at its end
    Complete(String),

    /// Show raw grammar candidates at the end of the SQL text
    Raw(String),

    /// Set or clear the default schema
    Use(Option<String>),

    /// Replace the session SQL mode
    SqlMode(SqlMode),

    /// Replace the server version
    Version(ServerVersion),

    /// Change the output format
    Format(OutputFormat),

    Help,

    Exit,
}

impl ReplCommand {
    /// Parse an input line
    pub fn parse(input: &str) -> Result<Self> {
        let Some(command) = input.trim_start().strip_prefix('\\') else {
            return Ok(ReplCommand::Complete(input.to_string()));
        };

        // Trailing spaces matter to \raw, the caret sits after them
        let (name, rest) = command
            .split_once(char::is_whitespace)
            .unwrap_or((command, ""));
        let argument = rest.trim();

        match name {
            "quit" | "exit" | "q" => Ok(ReplCommand::Exit),
            "help" | "h" | "?" => Ok(ReplCommand::Help),
            "use" | "u" => Ok(ReplCommand::Use(
                (!argument.is_empty()).then(|| Self::schema_name(argument)),
            )),
            "sql_mode" => Ok(ReplCommand::SqlMode(argument.parse()?)),
            "version" => {
                if argument.is_empty() {
                    return Err(ShellError::Generic("Usage: \\version <x.y.z>".to_string()));
                }
                Ok(ReplCommand::Version(argument.parse()?))
            }
            "format" => Ok(ReplCommand::Format(argument.parse()?)),
            "raw" => Ok(ReplCommand::Raw(rest.trim_start().to_string())),
            _ => Err(ShellError::Generic(format!(
                "Unknown command: \\{}. Type \\help for available commands.",
                name
            ))),
        }
    }

    /// Schema name with surrounding back ticks removed
    fn schema_name(argument: &str) -> String {
        argument
            .strip_prefix('`')
            .and_then(|name| name.strip_suffix('`'))
            .unwrap_or(argument)
            .to_string()
    }
}
