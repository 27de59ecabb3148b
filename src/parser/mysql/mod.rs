//! MySQL dialect: lexer, grammar and parser
//!
//! The parser does not build a parse tree. It holds a token stream plus the
//! session settings that grammar predicates depend on (server version and
//! SQL mode), which is all the completion core needs.

pub mod grammar;
pub mod lexer;
pub mod tokens;

use std::fmt;
use std::str::FromStr;

use crate::error::{CompletionError, GrammarError};
use crate::parser::{Grammar, Parser, RuleIndex, TokenStream};

pub use grammar::{GRAMMAR_NAME, mysql_grammar};
pub use lexer::MySqlLexer;

/// Semantic predicates referenced by the grammar
pub mod predicates {
    pub const SERVER_VERSION_AT_LEAST_80000: usize = 0;
    pub const SERVER_VERSION_BELOW_80000: usize = 1;
    pub const ANSI_QUOTES: usize = 2;
    pub const NOT_ANSI_QUOTES: usize = 3;
}

/// Server version as `major * 10000 + minor * 100 + patch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion(pub u32);

impl ServerVersion {
    pub const DEFAULT: ServerVersion = ServerVersion(80033);

    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self(major * 10000 + minor * 100 + patch)
    }

    pub fn major(&self) -> u32 {
        self.0 / 10000
    }

    pub fn minor(&self) -> u32 {
        self.0 / 100 % 100
    }

    pub fn patch(&self) -> u32 {
        self.0 % 100
    }
}

impl Default for ServerVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for ServerVersion {
    type Err = CompletionError;

    /// Accepts `8.0.33`, `5.7`, `8.0.33-log` or the numeric form `80033`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CompletionError::InvalidServerVersion(s.to_string());
        let trimmed = s.trim();
        let core = trimmed.split(['-', ' ']).next().unwrap_or_default();

        if !core.contains('.') {
            return core.parse::<u32>().map(ServerVersion).map_err(|_| invalid());
        }

        let parts: Vec<u32> = core
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [major, minor] if *minor < 100 => Ok(Self::new(*major, *minor, 0)),
            [major, minor, patch] if *minor < 100 && *patch < 100 => {
                Ok(Self::new(*major, *minor, *patch))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}

/// SQL mode flags relevant to lexing and parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SqlMode(u32);

/// Server modes accepted but without effect on completion
const INERT_MODES: &[&str] = &[
    "ALLOW_INVALID_DATES",
    "ERROR_FOR_DIVISION_BY_ZERO",
    "NO_AUTO_VALUE_ON_ZERO",
    "NO_DIR_IN_CREATE",
    "NO_ENGINE_SUBSTITUTION",
    "NO_UNSIGNED_SUBTRACTION",
    "NO_ZERO_DATE",
    "NO_ZERO_IN_DATE",
    "ONLY_FULL_GROUP_BY",
    "PAD_CHAR_TO_FULL_LENGTH",
    "REAL_AS_FLOAT",
    "STRICT_ALL_TABLES",
    "STRICT_TRANS_TABLES",
    "TIME_TRUNCATE_FRACTIONAL",
    "TRADITIONAL",
];

impl SqlMode {
    pub const ANSI_QUOTES: SqlMode = SqlMode(1);
    pub const PIPES_AS_CONCAT: SqlMode = SqlMode(1 << 1);
    pub const IGNORE_SPACE: SqlMode = SqlMode(1 << 2);
    pub const NO_BACKSLASH_ESCAPES: SqlMode = SqlMode(1 << 3);
    pub const HIGH_NOT_PRECEDENCE: SqlMode = SqlMode(1 << 4);

    /// `ANSI` as the server expands it (the inert parts dropped)
    pub const ANSI: SqlMode =
        SqlMode(Self::ANSI_QUOTES.0 | Self::PIPES_AS_CONCAT.0 | Self::IGNORE_SPACE.0);

    const NAMED: [(&'static str, SqlMode); 5] = [
        ("ANSI_QUOTES", Self::ANSI_QUOTES),
        ("PIPES_AS_CONCAT", Self::PIPES_AS_CONCAT),
        ("IGNORE_SPACE", Self::IGNORE_SPACE),
        ("NO_BACKSLASH_ESCAPES", Self::NO_BACKSLASH_ESCAPES),
        ("HIGH_NOT_PRECEDENCE", Self::HIGH_NOT_PRECEDENCE),
    ];

    pub const fn empty() -> Self {
        SqlMode(0)
    }

    pub fn contains(&self, other: SqlMode) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: SqlMode) {
        self.0 |= other.0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for SqlMode {
    type Output = SqlMode;

    fn bitor(self, rhs: SqlMode) -> SqlMode {
        SqlMode(self.0 | rhs.0)
    }
}

impl FromStr for SqlMode {
    type Err = CompletionError;

    /// Parse a comma separated mode list as reported by `@@sql_mode`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mode = SqlMode::empty();
        for name in s.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let upper = name.to_uppercase();
            if upper == "ANSI" {
                mode.insert(SqlMode::ANSI);
            } else if let Some((_, flag)) = Self::NAMED.iter().find(|(known, _)| *known == upper) {
                mode.insert(*flag);
            } else if !INERT_MODES.contains(&upper.as_str()) {
                return Err(CompletionError::InvalidSqlMode(name.to_string()));
            }
        }
        Ok(mode)
    }
}

impl fmt::Display for SqlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join(","))
    }
}

/// Parser over a MySQL token stream
#[derive(Debug, Clone)]
pub struct MySqlParser {
    grammar: &'static Grammar,
    tokens: TokenStream,
    server_version: ServerVersion,
    sql_mode: SqlMode,
}

impl MySqlParser {
    pub fn new(
        tokens: TokenStream,
        server_version: ServerVersion,
        sql_mode: SqlMode,
    ) -> Result<Self, GrammarError> {
        Ok(Self {
            grammar: mysql_grammar()?,
            tokens,
            server_version,
            sql_mode,
        })
    }

    /// Lex `sql` under `sql_mode` and wrap the result
    pub fn from_sql(
        sql: &str,
        server_version: ServerVersion,
        sql_mode: SqlMode,
    ) -> Result<Self, GrammarError> {
        Self::new(
            MySqlLexer::token_stream(sql, sql_mode),
            server_version,
            sql_mode,
        )
    }

    pub fn server_version(&self) -> ServerVersion {
        self.server_version
    }

    pub fn sql_mode(&self) -> SqlMode {
        self.sql_mode
    }
}

impl Parser for MySqlParser {
    fn grammar(&self) -> &Grammar {
        self.grammar
    }

    fn token_stream(&self) -> &TokenStream {
        &self.tokens
    }

    fn sempred(&self, _rule_index: RuleIndex, pred_index: usize) -> bool {
        match pred_index {
            predicates::SERVER_VERSION_AT_LEAST_80000 => self.server_version.0 >= 80000,
            predicates::SERVER_VERSION_BELOW_80000 => self.server_version.0 < 80000,
            predicates::ANSI_QUOTES => self.sql_mode.contains(SqlMode::ANSI_QUOTES),
            predicates::NOT_ANSI_QUOTES => !self.sql_mode.contains(SqlMode::ANSI_QUOTES),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_version() {
        assert_eq!("8.0.33".parse::<ServerVersion>().unwrap(), ServerVersion(80033));
        assert_eq!("5.7".parse::<ServerVersion>().unwrap(), ServerVersion(50700));
        assert_eq!(
            "8.0.33-log".parse::<ServerVersion>().unwrap(),
            ServerVersion(80033)
        );
        assert_eq!("50744".parse::<ServerVersion>().unwrap(), ServerVersion(50744));
    }

    #[test]
    fn test_invalid_server_version() {
        assert!("eight".parse::<ServerVersion>().is_err());
        assert!("8.x.1".parse::<ServerVersion>().is_err());
        assert!("8.0.1.2".parse::<ServerVersion>().is_err());
    }

    #[test]
    fn test_server_version_display() {
        assert_eq!(ServerVersion(80033).to_string(), "8.0.33");
        assert_eq!(ServerVersion::new(5, 7, 44).to_string(), "5.7.44");
    }

    #[test]
    fn test_parse_sql_mode() {
        let mode: SqlMode = "ONLY_FULL_GROUP_BY,ansi_quotes, STRICT_TRANS_TABLES"
            .parse()
            .unwrap();
        assert!(mode.contains(SqlMode::ANSI_QUOTES));
        assert!(!mode.contains(SqlMode::PIPES_AS_CONCAT));
        assert_eq!(mode.to_string(), "ANSI_QUOTES");
    }

    #[test]
    fn test_ansi_mode_expands() {
        let mode: SqlMode = "ANSI".parse().unwrap();
        assert!(mode.contains(SqlMode::ANSI_QUOTES));
        assert!(mode.contains(SqlMode::PIPES_AS_CONCAT));
        assert!(mode.contains(SqlMode::IGNORE_SPACE));
    }

    #[test]
    fn test_unknown_sql_mode() {
        assert_eq!(
            "NO_SUCH_MODE".parse::<SqlMode>(),
            Err(CompletionError::InvalidSqlMode("NO_SUCH_MODE".to_string()))
        );
        assert!("".parse::<SqlMode>().unwrap().is_empty());
    }

    #[test]
    fn test_predicates_follow_settings() {
        let parser =
            MySqlParser::from_sql("SELECT 1", ServerVersion(50744), SqlMode::ANSI_QUOTES).unwrap();
        assert!(!parser.sempred(0, predicates::SERVER_VERSION_AT_LEAST_80000));
        assert!(parser.sempred(0, predicates::SERVER_VERSION_BELOW_80000));
        assert!(parser.sempred(0, predicates::ANSI_QUOTES));
        assert!(!parser.sempred(0, predicates::NOT_ANSI_QUOTES));
    }
}
