//! Grammar-driven code completion
//!
//! Given a parser positioned over a token stream and a caret token index,
//! [`CodeCompletionCore`] determines which tokens and which grammar rules
//! could appear at the caret. Callers decide how rule candidates map to
//! concrete suggestions (schema names, columns, ...).
//!
//! # Examples
//!
//! ```no_run
//! use mysqlsh::parser::code_completion::{CodeCompletionCore, FollowSetCache};
//! use mysqlsh::parser::mysql::{MySqlParser, ServerVersion, SqlMode};
//!
//! let cache = FollowSetCache::new();
//! let parser =
//!     MySqlParser::from_sql("SELECT ", ServerVersion::default(), SqlMode::empty()).unwrap();
//! let core = CodeCompletionCore::new(&parser, &cache);
//! let candidates = core.collect_candidates(1, None);
//! assert!(!candidates.tokens.is_empty());
//! ```

mod candidates;
mod follow_sets;
mod walker;


pub use candidates::CandidatesCollection;
pub use follow_sets::{FollowSetCache, FollowSetWithPath, FollowSetsHolder, following_tokens};
pub use walker::CodeCompletionCore;
