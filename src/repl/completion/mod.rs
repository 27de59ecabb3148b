//! SQL completion for the mysqlsh explorer
//!
//! The grammar walk in [`crate::parser::code_completion`] reports which
//! tokens and which reference rules may appear at the caret. This module
//! turns that into suggestions a user can accept.
//!
//! # Architecture
//!
//! - **Scanner**: locates the caret token and the word typed so far
//! - **References**: tables, aliases, labels and variables in the input
//! - **Context**: maps a rule candidate to the kind of name it wants
//! - **Provider**: fetches schema object names and built-in lists
//! - **Engine**: orchestrates the entire completion flow
//!
//! # Examples
//!
//! ```no_run
//! use mysqlsh::config::{CatalogConfig, CompletionConfig};
//! use mysqlsh::repl::completion::{CompletionEngine, StaticCatalog};
//! use mysqlsh::repl::SharedState;
//! use std::sync::Arc;
//!
//! let shared_state = SharedState::new(Some("sakila".to_string()));
//! let provider = Arc::new(StaticCatalog::new(CatalogConfig::default()));
//! let engine = CompletionEngine::new(provider, shared_state, CompletionConfig::default());
//!
//! // Complete "SELECT * FROM act" with the cursor at the end
//! let result = engine.complete("SELECT * FROM act", 17).unwrap();
//! // Suggests tables and views starting with "act"
//! ```

mod context;
mod engine;
mod provider;
mod references;
mod scanner;

pub use engine::{
    CompletionEngine, CompletionPair, CompletionResult, RawCandidates, SuggestionKind,
    quote_identifier,
};
pub use provider::{MetadataProvider, StaticCatalog};

#[cfg(test)]
mod tests;
