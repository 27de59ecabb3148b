//! MySQL Shell SQL Completion Library
//!
//! Grammar-driven code completion for MySQL: a generic completion core
//! that walks a grammar automaton to find the tokens and rules possible
//! at a caret, a MySQL grammar built for it, and an engine mapping those
//! candidates to keywords and object names.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting for suggestions and raw candidates
//! - `parser`: Automaton, completion core and the MySQL grammar
//! - `repl`: Completion engine and the interactive explorer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mysqlsh::config::Config;
//! use mysqlsh::repl::SharedState;
//! use mysqlsh::repl::completion::{CompletionEngine, StaticCatalog};
//!
//! fn main() -> mysqlsh::Result<()> {
//!     let config = Config::default();
//!     let state = SharedState::new(Some("sakila".to_string()));
//!     let engine = CompletionEngine::new(
//!         Arc::new(StaticCatalog::new(config.catalog.clone())),
//!         state,
//!         config.completion.clone(),
//!     );
//!
//!     let result = engine.complete("SELECT * FROM ", 14)?;
//!     for pair in result.suggestions {
//!         println!("{} ({})", pair.display, pair.kind);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod repl;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ShellError};
pub use formatter::Formatter;
pub use repl::completion::{CompletionEngine, CompletionResult};
pub use repl::{ReplEngine, SharedState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
