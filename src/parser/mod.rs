//! Grammar model and parsers for the completion shell
//!
//! A grammar is held as an augmented transition network (ATN) together with
//! its vocabulary and rule names. The completion core only needs read access
//! to those tables plus the token stream and a way to evaluate semantic
//! predicates, which is what the [`Parser`] trait exposes.
//!
//! # Architecture
//!
//! - `token`: token model, buffered token stream and vocabulary
//! - `interval_set`: token-type sets used as transition labels
//! - `atn`: states and transitions
//! - `builder`: compiles rule expressions into an ATN
//! - `code_completion`: candidate collection over an ATN
//! - `mysql`: MySQL lexer, grammar and parser
//!
//! # Examples
//!
//! ```no_run
//! use mysqlsh::parser::mysql::{MySqlParser, ServerVersion, SqlMode};
//! use mysqlsh::parser::Parser;
//!
//! let parser =
//!     MySqlParser::from_sql("SELECT * FROM t", ServerVersion::default(), SqlMode::empty()).unwrap();
//! assert_eq!(parser.grammar_name(), "MySQL");
//! ```

pub mod atn;
pub mod builder;
pub mod code_completion;
pub mod interval_set;
pub mod mysql;
pub mod token;

pub use atn::{Atn, AtnState, RuleIndex, StateId, StateType, Transition};
pub use interval_set::IntervalSet;
pub use token::{
    DEFAULT_CHANNEL, EOF, EPSILON, HIDDEN_CHANNEL, INVALID_TYPE, MIN_USER_TOKEN_TYPE, Token,
    TokenStream, TokenType, Vocabulary,
};

/// Compiled grammar tables
#[derive(Debug, Clone)]
pub struct Grammar {
    pub name: String,
    pub atn: Atn,
    pub vocabulary: Vocabulary,
    pub rule_names: Vec<String>,
}

impl Grammar {
    pub fn rule_index(&self, name: &str) -> Option<RuleIndex> {
        self.rule_names.iter().position(|rule| rule == name)
    }

    pub fn rule_name(&self, index: RuleIndex) -> &str {
        self.rule_names
            .get(index)
            .map(String::as_str)
            .unwrap_or("<unknown>")
    }
}

/// Read-only view of a parser as needed for candidate collection
pub trait Parser {
    fn grammar(&self) -> &Grammar;

    fn token_stream(&self) -> &TokenStream;

    /// Evaluate semantic predicate `pred_index` declared in `rule_index`
    fn sempred(&self, rule_index: RuleIndex, pred_index: usize) -> bool;

    fn atn(&self) -> &Atn {
        &self.grammar().atn
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.grammar().vocabulary
    }

    fn rule_names(&self) -> &[String] {
        &self.grammar().rule_names
    }

    /// Identity used to key shared follow-set caches
    fn grammar_name(&self) -> &str {
        &self.grammar().name
    }
}

/// Where a collection run starts: which rule, at which stream token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    pub rule_index: RuleIndex,
    pub start_token_index: usize,
}

impl RuleContext {
    pub fn new(rule_index: RuleIndex, start_token_index: usize) -> Self {
        Self {
            rule_index,
            start_token_index,
        }
    }
}
