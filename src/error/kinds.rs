use std::{fmt, io};

use crate::parser::TokenType;

/// Crate-wide `Result` type using [`ShellError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Top-level error type for shell operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum ShellError {
    /// Grammar construction errors.
    Grammar(GrammarError),

    /// Completion request errors.
    Completion(CompletionError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// JSON serialization errors.
    Json(serde_json::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Errors raised while assembling a grammar automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A rule was referenced but never given a body.
    UndefinedRule(String),

    /// A rule body was defined twice.
    DuplicateRule(String),

    /// A rule index outside the declared rules.
    UnknownRuleIndex(usize),

    /// A token type outside the vocabulary.
    InvalidToken { rule: String, token: TokenType },

    /// The grammar declares no rules.
    Empty,
}

/// Errors raised for a single completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Cursor is past the end of the input.
    CursorOutOfRange { cursor: usize, length: usize },

    /// Cursor splits a multi-byte character.
    CursorNotOnCharBoundary(usize),

    /// Start rule index unknown to the grammar.
    UnknownStartRule(usize),

    /// Server version string could not be parsed.
    InvalidServerVersion(String),

    /// Unknown SQL mode name.
    InvalidSqlMode(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Generic configuration problem.
    Generic(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Grammar(e) => write!(f, "Grammar error: {e}"),
            ShellError::Completion(e) => write!(f, "Completion error: {e}"),
            ShellError::Config(e) => write!(f, "Configuration error: {e}"),
            ShellError::Io(e) => write!(f, "I/O error: {e}"),
            ShellError::Json(e) => write!(f, "JSON error: {e}"),
            ShellError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UndefinedRule(name) => write!(f, "Rule '{name}' has no definition"),
            GrammarError::DuplicateRule(name) => write!(f, "Rule '{name}' is defined twice"),
            GrammarError::UnknownRuleIndex(index) => write!(f, "Unknown rule index {index}"),
            GrammarError::InvalidToken { rule, token } => {
                write!(f, "Token type {token} in rule '{rule}' is not in the vocabulary")
            }
            GrammarError::Empty => write!(f, "Grammar has no rules"),
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::CursorOutOfRange { cursor, length } => {
                write!(f, "Cursor {cursor} is beyond the end of the input ({length} bytes)")
            }
            CompletionError::CursorNotOnCharBoundary(cursor) => {
                write!(f, "Cursor {cursor} is not on a character boundary")
            }
            CompletionError::UnknownStartRule(index) => {
                write!(f, "Unknown start rule index {index}")
            }
            CompletionError::InvalidServerVersion(version) => {
                write!(f, "Invalid server version: {version}")
            }
            CompletionError::InvalidSqlMode(mode) => write!(f, "Unknown SQL mode: {mode}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ShellError {}
impl std::error::Error for GrammarError {}
impl std::error::Error for CompletionError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to ShellError ========================= */

impl From<io::Error> for ShellError {
    fn from(err: io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        ShellError::Json(err)
    }
}

impl From<GrammarError> for ShellError {
    fn from(err: GrammarError) -> Self {
        ShellError::Grammar(err)
    }
}

impl From<CompletionError> for ShellError {
    fn from(err: CompletionError) -> Self {
        ShellError::Completion(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::Config(err)
    }
}

impl From<String> for ShellError {
    fn from(msg: String) -> Self {
        ShellError::Generic(msg)
    }
}

impl From<&str> for ShellError {
    fn from(msg: &str) -> Self {
        ShellError::Generic(msg.to_owned())
    }
}
