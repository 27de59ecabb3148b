//! Caret location and token-level context around it
//!
//! Everything here works on the lexed token stream only; no grammar is
//! involved. The grammar walk answers "what may come next", these helpers
//! answer "what did the user already write around the caret".

use std::ops::Range;

use crate::parser::mysql::lexer::unquote;
use crate::parser::mysql::tokens::*;
use crate::parser::{Token, TokenStream, TokenType};

/// Completion point resolved against a token stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    /// Token the candidates are collected for
    pub token_index: usize,
    /// Text typed so far, without an opening quote
    pub prefix: String,
    /// Byte offset where an accepted suggestion starts
    pub replace_start: usize,
    /// The word being typed opened with a back tick
    pub quoted: bool,
}

/// Tokens a partially typed word can be lexed as
fn is_word(token_type: TokenType) -> bool {
    is_identifier_like(token_type) || token_type == SINGLE_QUOTED_TEXT
}

/// Tokens that name an object without being a keyword
pub fn is_name(token_type: TokenType) -> bool {
    matches!(
        token_type,
        IDENTIFIER | BACK_TICK_QUOTED_ID | DOUBLE_QUOTED_TEXT
    )
}

/// Find the caret token for a byte offset
///
/// A word token touching the cursor from the left is the caret and its
/// typed part is the prefix. Otherwise the caret is the first
/// default-channel token ending after the cursor, which is EOF at the end
/// of the input.
pub fn locate_caret(stream: &TokenStream, source: &str, cursor: usize) -> Caret {
    let tokens = stream.tokens();

    if let Some(token) = tokens.iter().find(|token| {
        token.is_default_channel()
            && is_word(token.token_type)
            && token.start < cursor
            && cursor <= token.stop
    }) {
        let typed = source.get(token.start..cursor).unwrap_or_default();
        let quoted = typed.starts_with('`');
        let prefix = typed.trim_start_matches(['`', '"', '\'']).to_string();
        return Caret {
            token_index: token.token_index,
            prefix,
            replace_start: token.start,
            quoted,
        };
    }

    let token_index = tokens
        .iter()
        .find(|token| token.is_default_channel() && (token.stop > cursor || token.is_eof()))
        .map_or(stream.eof_index(), |token| token.token_index);

    Caret {
        token_index,
        prefix: String::new(),
        replace_start: cursor,
        quoted: false,
    }
}

/// Names joined by dots directly before the caret, outermost first
///
/// `sakila.actor.|` yields `["sakila", "actor"]`. At most two qualifiers
/// are collected.
pub fn qualifiers_before(stream: &TokenStream, caret_index: usize) -> Vec<String> {
    let mut qualifiers = Vec::new();
    let mut index = caret_index;

    while qualifiers.len() < 2 {
        let Some(dot) = stream.previous_default(index) else {
            break;
        };
        if dot.token_type != DOT_SYMBOL {
            break;
        }
        let Some(name) = stream.previous_default(dot.token_index) else {
            break;
        };
        if !is_identifier_like(name.token_type) {
            break;
        }
        qualifiers.insert(0, unquote(&name.text));
        index = name.token_index;
    }

    qualifiers
}

/// Variable sigil (`@` or `@@`) the caret directly follows
///
/// For `@@` a `GLOBAL.` or `SESSION.` scope in between is skipped.
pub fn variable_sigil(stream: &TokenStream, caret_index: usize) -> Option<TokenType> {
    let previous = stream.previous_default(caret_index)?;
    match previous.token_type {
        AT_SIGN_SYMBOL | AT_AT_SIGN_SYMBOL => Some(previous.token_type),
        DOT_SYMBOL => {
            let scope = stream.previous_default(previous.token_index)?;
            if !matches!(scope.token_type, GLOBAL_SYMBOL | SESSION_SYMBOL) {
                return None;
            }
            let sigil = stream.previous_default(scope.token_index)?;
            (sigil.token_type == AT_AT_SIGN_SYMBOL).then_some(AT_AT_SIGN_SYMBOL)
        }
        _ => None,
    }
}

/// Whether the caret word is separated by space from a complete object name
///
/// Reference rules reported there only describe continuations of that
/// name (`actor.x`), not a new object. `tbl.*` counts as a complete name.
pub fn follows_complete_name(stream: &TokenStream, caret: &Caret) -> bool {
    let Some(previous) = stream.previous_default(caret.token_index) else {
        return false;
    };
    if previous.stop >= caret.replace_start {
        return false;
    }
    match previous.token_type {
        MULT_OPERATOR => stream
            .previous_default(previous.token_index)
            .is_some_and(|token| token.token_type == DOT_SYMBOL),
        token_type => is_name(token_type),
    }
}

/// Token index range of the statement containing the caret
///
/// Statements are separated by semicolons; the range excludes them.
pub fn statement_bounds(stream: &TokenStream, caret_index: usize) -> Range<usize> {
    let tokens = stream.tokens();
    let caret_index = caret_index.min(stream.eof_index());

    let start = tokens[..caret_index]
        .iter()
        .rposition(|token| token.token_type == SEMICOLON_SYMBOL)
        .map_or(0, |index| index + 1);
    let end = tokens[caret_index..]
        .iter()
        .position(|token| token.token_type == SEMICOLON_SYMBOL || token.is_eof())
        .map_or(tokens.len(), |offset| caret_index + offset);

    start..end
}

/// Default-channel tokens in `range`
pub fn default_tokens(stream: &TokenStream, range: Range<usize>) -> impl Iterator<Item = &Token> {
    stream.tokens()[range]
        .iter()
        .filter(|token| token.is_default_channel())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::mysql::{MySqlLexer, SqlMode};

    fn stream(sql: &str) -> TokenStream {
        MySqlLexer::token_stream(sql, SqlMode::empty())
    }

    fn caret(sql: &str, cursor: usize) -> Caret {
        locate_caret(&stream(sql), sql, cursor)
    }

    #[test]
    fn test_caret_at_end_after_space() {
        let sql = "SELECT * FROM ";
        let caret = caret(sql, sql.len());
        let tokens = stream(sql);
        assert_eq!(caret.token_index, tokens.eof_index());
        assert_eq!(caret.prefix, "");
        assert_eq!(caret.replace_start, 14);
    }

    #[test]
    fn test_caret_on_partial_word() {
        let sql = "SELECT * FROM act";
        let caret = caret(sql, sql.len());
        assert_eq!(caret.prefix, "act");
        assert_eq!(caret.replace_start, 14);
        assert_eq!(stream(sql).get(caret.token_index).unwrap().text, "act");
    }

    #[test]
    fn test_caret_in_middle_of_word() {
        let caret = caret("SELECT * FROM actor", 16);
        assert_eq!(caret.prefix, "ac");
        assert_eq!(caret.replace_start, 14);
    }

    #[test]
    fn test_caret_on_keyword_being_typed() {
        let caret = caret("SEL", 3);
        assert_eq!(caret.token_index, 0);
        assert_eq!(caret.prefix, "SEL");
    }

    #[test]
    fn test_caret_inside_whitespace() {
        let sql = "SELECT  FROM actor";
        let caret = caret(sql, 7);
        let tokens = stream(sql);
        assert_eq!(tokens.get(caret.token_index).unwrap().token_type, FROM_SYMBOL);
        assert_eq!(caret.prefix, "");
        assert_eq!(caret.replace_start, 7);
    }

    #[test]
    fn test_caret_after_dot() {
        let sql = "SELECT a.";
        let caret = caret(sql, sql.len());
        assert_eq!(caret.token_index, stream(sql).eof_index());
        assert_eq!(caret.replace_start, sql.len());
    }

    #[test]
    fn test_caret_on_back_tick_word() {
        let caret = caret("SELECT * FROM `act", 18);
        assert_eq!(caret.prefix, "act");
        assert!(caret.quoted);
        assert_eq!(caret.replace_start, 14);
    }

    #[test]
    fn test_qualifiers() {
        let sql = "SELECT sakila.actor.";
        let tokens = stream(sql);
        assert_eq!(
            qualifiers_before(&tokens, tokens.eof_index()),
            vec!["sakila", "actor"]
        );

        let sql = "SELECT * FROM `sakila`.ac";
        let tokens = stream(sql);
        let caret = locate_caret(&tokens, sql, sql.len());
        assert_eq!(qualifiers_before(&tokens, caret.token_index), vec!["sakila"]);

        let sql = "SELECT * FROM ";
        let tokens = stream(sql);
        assert!(qualifiers_before(&tokens, tokens.eof_index()).is_empty());
    }

    #[test]
    fn test_variable_sigil() {
        let tokens = stream("SELECT @");
        assert_eq!(variable_sigil(&tokens, tokens.eof_index()), Some(AT_SIGN_SYMBOL));

        let tokens = stream("SELECT @@");
        assert_eq!(
            variable_sigil(&tokens, tokens.eof_index()),
            Some(AT_AT_SIGN_SYMBOL)
        );

        let tokens = stream("SELECT @@session.");
        assert_eq!(
            variable_sigil(&tokens, tokens.eof_index()),
            Some(AT_AT_SIGN_SYMBOL)
        );

        let tokens = stream("SELECT a.");
        assert_eq!(variable_sigil(&tokens, tokens.eof_index()), None);
    }

    #[test]
    fn test_follows_complete_name() {
        let sql = "SELECT * FROM actor ";
        let tokens = stream(sql);
        let caret = locate_caret(&tokens, sql, sql.len());
        assert!(follows_complete_name(&tokens, &caret));

        let sql = "SELECT * FROM actor";
        let tokens = stream(sql);
        let caret = locate_caret(&tokens, sql, sql.len());
        assert!(!follows_complete_name(&tokens, &caret));

        let sql = "SELECT * FROM actor a";
        let tokens = stream(sql);
        let caret = locate_caret(&tokens, sql, sql.len());
        assert!(follows_complete_name(&tokens, &caret));

        let sql = "SELECT a.* ";
        let tokens = stream(sql);
        let caret = locate_caret(&tokens, sql, sql.len());
        assert!(follows_complete_name(&tokens, &caret));

        let sql = "SELECT * ";
        let tokens = stream(sql);
        let caret = locate_caret(&tokens, sql, sql.len());
        assert!(!follows_complete_name(&tokens, &caret));

        let sql = "SELECT * FROM ";
        let tokens = stream(sql);
        let caret = locate_caret(&tokens, sql, sql.len());
        assert!(!follows_complete_name(&tokens, &caret));
    }

    #[test]
    fn test_statement_bounds() {
        let sql = "USE a; SELECT * FROM t; SHOW TABLES";
        let tokens = stream(sql);
        let caret = locate_caret(&tokens, sql, 10);
        let range = statement_bounds(&tokens, caret.token_index);
        let texts: Vec<&str> = default_tokens(&tokens, range)
            .map(|token| token.text.as_str())
            .collect();
        assert_eq!(texts, vec!["SELECT", "*", "FROM", "t"]);
    }
}
