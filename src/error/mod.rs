//! Error handling module for the completion shell.
//!
//! This module provides the crate-wide error type and its specific kinds:
//! - Grammar construction errors raised while building an automaton
//! - Completion request errors (cursor placement, session settings)
//! - Configuration loading and validation errors
//!
//! # Example
//!
//! ```rust,no_run
//! use mysqlsh::error::{CompletionError, Result};
//!
//! fn check_cursor(sql: &str, cursor: usize) -> Result<()> {
//!     if cursor > sql.len() {
//!         return Err(CompletionError::CursorOutOfRange {
//!             cursor,
//!             length: sql.len(),
//!         }
//!         .into());
//!     }
//!     Ok(())
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CompletionError, ConfigError, GrammarError, Result, ShellError};
