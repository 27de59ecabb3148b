//! Explorer command execution
//!
//! Runs a parsed [`ReplCommand`] against the completion engine and the
//! session settings it shares with the line editor.

use std::sync::Arc;

use tracing::{debug, info};

use super::command::ReplCommand;
use super::completion::{CompletionEngine, CompletionResult, RawCandidates};

const HELP_TEXT: &str = "\
Type SQL to list the completions at the end of the line.

Commands:
  \\use [schema]          Set or clear the default schema
  \\sql_mode [modes]      Replace the SQL mode (comma separated, empty clears)
  \\version <x.y.z>       Complete for another server version
  \\format <fmt>          Output format: table, json or plain
  \\raw <sql>             Show raw grammar candidates at the end of <sql>
  \\help                  Show this help
  \\quit                  Leave the explorer

Press Tab for completions while typing.";

/// Data produced by an explorer command
#[derive(Debug, Clone)]
pub enum ResultData {
    /// Completions at the end of a line
    Completions(CompletionResult),

    /// Raw grammar candidates at the end of a line
    Candidates(RawCandidates),

    /// Text message
    Message(String),

    /// No data
    None,
}

/// Executes explorer commands
pub struct CommandExecutor {
    engine: Arc<CompletionEngine>,
}

impl CommandExecutor {
    pub fn new(engine: Arc<CompletionEngine>) -> Self {
        Self { engine }
    }

    /// Execute a command
    ///
    /// Setting changes go to the shared session, so the line editor's
    /// completer sees them on the next keystroke.
    pub fn execute(&self, command: ReplCommand) -> crate::error::Result<ResultData> {
        let state = self.engine.state();

        match command {
            ReplCommand::Complete(sql) => {
                debug!(sql = %sql, "completing at end of line");
                let result = self.engine.complete(&sql, sql.len())?;
                Ok(ResultData::Completions(result))
            }
            ReplCommand::Raw(sql) => {
                let candidates = self.engine.candidates(&sql, sql.len())?;
                Ok(ResultData::Candidates(candidates))
            }
            ReplCommand::Use(schema) => {
                let message = match &schema {
                    Some(name) => format!("Default schema set to {}", name),
                    None => "Default schema cleared".to_string(),
                };
                info!(schema = ?schema, "default schema changed");
                state.set_schema(schema);
                Ok(ResultData::Message(message))
            }
            ReplCommand::SqlMode(mode) => {
                state.set_sql_mode(mode);
                let message = if mode.is_empty() {
                    "SQL mode cleared".to_string()
                } else {
                    format!("SQL mode set to {}", mode)
                };
                Ok(ResultData::Message(message))
            }
            ReplCommand::Version(version) => {
                state.set_server_version(version);
                Ok(ResultData::Message(format!(
                    "Completing for server version {}",
                    version
                )))
            }
            ReplCommand::Format(format) => {
                state.set_format(format);
                Ok(ResultData::Message(format!("Output format set to {}", format)))
            }
            ReplCommand::Help => Ok(ResultData::Message(HELP_TEXT.to_string())),
            ReplCommand::Exit => Ok(ResultData::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CatalogConfig, CompletionConfig, OutputFormat, SchemaConfig, TableConfig,
    };
    use crate::parser::mysql::{ServerVersion, SqlMode};
    use crate::repl::SharedState;
    use crate::repl::completion::{StaticCatalog, SuggestionKind};

    fn executor() -> CommandExecutor {
        let catalog = CatalogConfig {
            schemas: vec![SchemaConfig {
                name: "sakila".to_string(),
                tables: vec![TableConfig {
                    name: "actor".to_string(),
                    columns: vec!["actor_id".to_string(), "first_name".to_string()],
                }],
                ..Default::default()
            }],
            users: Vec::new(),
        };
        let engine = CompletionEngine::new(
            Arc::new(StaticCatalog::new(catalog)),
            SharedState::new(Some("sakila".to_string())),
            CompletionConfig::default(),
        );
        CommandExecutor::new(Arc::new(engine))
    }

    fn run(executor: &CommandExecutor, line: &str) -> ResultData {
        executor.execute(ReplCommand::parse(line).unwrap()).unwrap()
    }

    #[test]
    fn test_complete_at_end_of_line() {
        let executor = executor();
        let ResultData::Completions(result) = run(&executor, "SELECT * FROM ac") else {
            panic!("expected completions");
        };
        assert_eq!(result.replace_start, 14);
        assert!(
            result
                .suggestions
                .iter()
                .any(|pair| pair.display == "actor" && pair.kind == SuggestionKind::Table)
        );
    }

    #[test]
    fn test_raw_candidates() {
        let executor = executor();
        let ResultData::Candidates(candidates) = run(&executor, "\\raw USE ") else {
            panic!("expected candidates");
        };
        assert!(candidates.rules.contains_key("schemaRef"));
    }

    #[test]
    fn test_use_updates_state() {
        let executor = executor();
        run(&executor, "\\use world");
        assert_eq!(executor.engine.state().get_schema().as_deref(), Some("world"));

        let ResultData::Message(message) = run(&executor, "\\use") else {
            panic!("expected message");
        };
        assert_eq!(message, "Default schema cleared");
        assert_eq!(executor.engine.state().get_schema(), None);
    }

    #[test]
    fn test_session_settings() {
        let executor = executor();
        run(&executor, "\\sql_mode ANSI");
        run(&executor, "\\version 5.7.44");
        run(&executor, "\\format json");

        let state = executor.engine.state();
        assert!(state.get_sql_mode().contains(SqlMode::ANSI_QUOTES));
        assert_eq!(state.get_server_version(), ServerVersion::new(5, 7, 44));
        assert_eq!(state.get_format(), OutputFormat::Json);
    }

    #[test]
    fn test_help_and_exit() {
        let executor = executor();
        let ResultData::Message(help) = run(&executor, "\\help") else {
            panic!("expected help text");
        };
        assert!(help.contains("\\raw"));
        assert!(matches!(run(&executor, "\\quit"), ResultData::None));
    }
}
