//! MySQL token types
//!
//! Keyword tokens carry a `_SYMBOL` suffix and no literal name; the keyword
//! text is the symbolic name without that suffix. Operators and punctuation
//! carry their quoted literal.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::parser::{TokenType, Vocabulary};

macro_rules! mysql_tokens {
    ($($name:ident = $value:literal $(=> $literal:literal)?),* $(,)?) => {
        $(pub const $name: TokenType = $value;)*

        /// `(type, symbolic name, literal name)` for every token type
        pub const TOKEN_TABLE: &[(TokenType, &str, Option<&str>)] = &[
            $(($value, stringify!($name), mysql_tokens!(@literal $($literal)?))),*
        ];
    };
    (@literal $literal:literal) => { Some($literal) };
    (@literal) => { None };
}

mysql_tokens! {
    ALL_SYMBOL = 1,
    AND_SYMBOL = 2,
    AS_SYMBOL = 3,
    ASC_SYMBOL = 4,
    AVG_SYMBOL = 5,
    BEGIN_SYMBOL = 6,
    BETWEEN_SYMBOL = 7,
    BY_SYMBOL = 8,
    CALL_SYMBOL = 9,
    COLLATE_SYMBOL = 10,
    COLUMNS_SYMBOL = 11,
    COUNT_SYMBOL = 12,
    CROSS_SYMBOL = 13,
    CURRENT_USER_SYMBOL = 14,
    DATABASE_SYMBOL = 15,
    DATABASES_SYMBOL = 16,
    DEFAULT_SYMBOL = 17,
    DELETE_SYMBOL = 18,
    DESC_SYMBOL = 19,
    DISTINCT_SYMBOL = 20,
    DROP_SYMBOL = 21,
    DUAL_SYMBOL = 22,
    END_SYMBOL = 23,
    EXISTS_SYMBOL = 24,
    FALSE_SYMBOL = 25,
    FROM_SYMBOL = 26,
    FUNCTION_SYMBOL = 27,
    GLOBAL_SYMBOL = 28,
    GROUP_SYMBOL = 29,
    HAVING_SYMBOL = 30,
    IF_SYMBOL = 31,
    IGNORE_SYMBOL = 32,
    IN_SYMBOL = 33,
    INNER_SYMBOL = 34,
    INSERT_SYMBOL = 35,
    INTO_SYMBOL = 36,
    IS_SYMBOL = 37,
    ITERATE_SYMBOL = 38,
    JOIN_SYMBOL = 39,
    LEAVE_SYMBOL = 40,
    LEFT_SYMBOL = 41,
    LIKE_SYMBOL = 42,
    LIMIT_SYMBOL = 43,
    MAX_SYMBOL = 44,
    MIN_SYMBOL = 45,
    NAMES_SYMBOL = 46,
    NOT_SYMBOL = 47,
    NOW_SYMBOL = 48,
    NULL_SYMBOL = 49,
    OFFSET_SYMBOL = 50,
    ON_SYMBOL = 51,
    OR_SYMBOL = 52,
    ORDER_SYMBOL = 53,
    OUTER_SYMBOL = 54,
    PROCEDURE_SYMBOL = 55,
    RECURSIVE_SYMBOL = 56,
    RIGHT_SYMBOL = 57,
    SCHEMA_SYMBOL = 58,
    SELECT_SYMBOL = 59,
    SESSION_SYMBOL = 60,
    SET_SYMBOL = 61,
    SHOW_SYMBOL = 62,
    SQL_CACHE_SYMBOL = 63,
    SQL_NO_CACHE_SYMBOL = 64,
    SUM_SYMBOL = 65,
    TABLE_SYMBOL = 66,
    TABLES_SYMBOL = 67,
    TRUE_SYMBOL = 68,
    UPDATE_SYMBOL = 69,
    USE_SYMBOL = 70,
    USER_SYMBOL = 71,
    USING_SYMBOL = 72,
    VALUES_SYMBOL = 73,
    VIEW_SYMBOL = 74,
    WHERE_SYMBOL = 75,
    WITH_SYMBOL = 76,
    XOR_SYMBOL = 77,

    EQUAL_OPERATOR = 78 => "'='",
    NOT_EQUAL_OPERATOR = 79 => "'<>'",
    LESS_THAN_OPERATOR = 80 => "'<'",
    LESS_OR_EQUAL_OPERATOR = 81 => "'<='",
    GREATER_THAN_OPERATOR = 82 => "'>'",
    GREATER_OR_EQUAL_OPERATOR = 83 => "'>='",
    PLUS_OPERATOR = 84 => "'+'",
    MINUS_OPERATOR = 85 => "'-'",
    MULT_OPERATOR = 86 => "'*'",
    DIV_OPERATOR = 87 => "'/'",
    LOGICAL_AND_OPERATOR = 88 => "'&&'",
    LOGICAL_OR_OPERATOR = 89 => "'||'",
    LOGICAL_NOT_OPERATOR = 90 => "'!'",
    CONCAT_PIPES_SYMBOL = 91,
    DOT_SYMBOL = 92 => "'.'",
    COMMA_SYMBOL = 93 => "','",
    SEMICOLON_SYMBOL = 94 => "';'",
    COLON_SYMBOL = 95 => "':'",
    OPEN_PAR_SYMBOL = 96 => "'('",
    CLOSE_PAR_SYMBOL = 97 => "')'",
    AT_SIGN_SYMBOL = 98 => "'@'",
    AT_AT_SIGN_SYMBOL = 99 => "'@@'",

    INT_NUMBER = 100,
    DECIMAL_NUMBER = 101,
    SINGLE_QUOTED_TEXT = 102,
    DOUBLE_QUOTED_TEXT = 103,
    BACK_TICK_QUOTED_ID = 104,
    IDENTIFIER = 105,

    WHITESPACE = 106,
    BLOCK_COMMENT = 107,
    LINE_COMMENT = 108,
    INVALID_INPUT = 109,
}

pub const KEYWORD_SUFFIX: &str = "_SYMBOL";

static KEYWORDS: LazyLock<HashMap<&'static str, TokenType>> = LazyLock::new(|| {
    TOKEN_TABLE
        .iter()
        .filter(|(token_type, _, _)| *token_type <= XOR_SYMBOL)
        .filter_map(|(token_type, name, _)| {
            name.strip_suffix(KEYWORD_SUFFIX)
                .map(|keyword| (keyword, *token_type))
        })
        .collect()
});

static VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(|| Vocabulary::from_table(TOKEN_TABLE));

pub fn vocabulary() -> &'static Vocabulary {
    &VOCABULARY
}

/// Keyword token for an (upper-cased) word
pub fn keyword_token(word: &str) -> Option<TokenType> {
    KEYWORDS.get(word).copied()
}

pub fn is_keyword(token_type: TokenType) -> bool {
    (ALL_SYMBOL..=XOR_SYMBOL).contains(&token_type)
}

/// Keyword text of a keyword token, e.g. `ORDER` for `ORDER_SYMBOL`
pub fn keyword_text(token_type: TokenType) -> Option<&'static str> {
    if !is_keyword(token_type) {
        return None;
    }
    TOKEN_TABLE
        .iter()
        .find(|(candidate, _, _)| *candidate == token_type)
        .and_then(|(_, name, _)| name.strip_suffix(KEYWORD_SUFFIX))
}

/// Tokens that can start or continue a name
pub fn is_identifier_like(token_type: TokenType) -> bool {
    matches!(token_type, IDENTIFIER | BACK_TICK_QUOTED_ID | DOUBLE_QUOTED_TEXT)
        || is_keyword(token_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_token("SELECT"), Some(SELECT_SYMBOL));
        assert_eq!(keyword_token("SQL_NO_CACHE"), Some(SQL_NO_CACHE_SYMBOL));
        assert_eq!(keyword_token("select"), None);
        assert_eq!(keyword_token("CONCAT_PIPES"), None);
    }

    #[test]
    fn test_keyword_text() {
        assert_eq!(keyword_text(ORDER_SYMBOL), Some("ORDER"));
        assert_eq!(keyword_text(CURRENT_USER_SYMBOL), Some("CURRENT_USER"));
        assert_eq!(keyword_text(COMMA_SYMBOL), None);
    }

    #[test]
    fn test_vocabulary_names() {
        let vocabulary = vocabulary();
        assert_eq!(vocabulary.display_name(COMMA_SYMBOL), "','");
        assert_eq!(vocabulary.display_name(SELECT_SYMBOL), "SELECT_SYMBOL");
        assert_eq!(vocabulary.max_token_type(), INVALID_INPUT);
    }

    #[test]
    fn test_token_table_is_dense() {
        for (index, (token_type, _, _)) in TOKEN_TABLE.iter().enumerate() {
            assert_eq!(*token_type, index as TokenType + 1);
        }
    }
}
