//! Interactive completion explorer
//!
//! This module provides the line editor and everything plugged into it:
//! - Tab completion and inline hints backed by the completion engine
//! - Syntax highlighting driven by the MySQL lexer
//! - A prompt showing the default schema, server version and SQL mode
//! - Backslash commands that change the session or show raw candidates

pub mod completion;

mod command;
mod completer;
mod engine;
mod executor;
mod highlighter;
mod hinter;
mod prompt;
mod shared_state;

pub use command::ReplCommand;
pub use completer::SqlCompleter;
pub use engine::ReplEngine;
pub use executor::{CommandExecutor, ResultData};
pub use highlighter::SqlHighlighter;
pub use hinter::SqlHinter;
pub use prompt::SqlPrompt;
pub use shared_state::SharedState;
