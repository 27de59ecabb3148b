//! MySQL lexer for error-tolerant tokenization
//!
//! This lexer is designed to be extremely forgiving and never panic.
//! It handles incomplete input gracefully, which is essential for
//! completing statements while they are being typed.
//!
//! # Design Principles
//!
//! - **Never panic** - always return a valid token stream
//! - **Never reject input** - unknown characters become `INVALID_INPUT` tokens
//! - **Keep everything** - whitespace and comments go to the hidden channel
//! - **Unterminated quotes run to the end of input**

use super::SqlMode;
use super::tokens::*;
use crate::parser::{EOF, Token, TokenStream, TokenType};

/// MySQL lexer - error-tolerant tokenizer
pub struct MySqlLexer<'a> {
    source: &'a str,
    input: Vec<(usize, char)>,
    pos: usize,
    sql_mode: SqlMode,
}

impl<'a> MySqlLexer<'a> {
    /// Create a new lexer from input string
    pub fn new(source: &'a str, sql_mode: SqlMode) -> Self {
        Self {
            source,
            input: source.char_indices().collect(),
            pos: 0,
            sql_mode,
        }
    }

    /// Tokenize the entire input, including hidden tokens and EOF
    pub fn tokenize(source: &str, sql_mode: SqlMode) -> Vec<Token> {
        let mut lexer = MySqlLexer::new(source, sql_mode);
        let mut tokens = Vec::new();

        loop {
            let token = lexer.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Tokenize straight into an indexed stream
    pub fn token_stream(source: &str, sql_mode: SqlMode) -> TokenStream {
        TokenStream::new(Self::tokenize(source, sql_mode))
    }

    /// Get the next token
    fn next_token(&mut self) -> Token {
        let start = self.pos;

        if self.is_at_end() {
            return self.make(EOF, start);
        }

        let ch = self.current_char();

        match ch {
            c if c.is_whitespace() => {
                self.skip_whitespace();
                self.make(WHITESPACE, start).hidden()
            }

            // Single-character tokens
            '*' => self.single(MULT_OPERATOR, start),
            '+' => self.single(PLUS_OPERATOR, start),
            ',' => self.single(COMMA_SYMBOL, start),
            '(' => self.single(OPEN_PAR_SYMBOL, start),
            ')' => self.single(CLOSE_PAR_SYMBOL, start),
            ';' => self.single(SEMICOLON_SYMBOL, start),
            ':' => self.single(COLON_SYMBOL, start),
            '=' => self.single(EQUAL_OPERATOR, start),

            '.' => {
                if self.peek_char().is_ascii_digit() {
                    self.scan_number(start)
                } else {
                    self.single(DOT_SYMBOL, start)
                }
            }

            // Operators (possibly two characters)
            '!' => {
                self.advance();
                if self.current_char() == '=' {
                    self.advance();
                    self.make(NOT_EQUAL_OPERATOR, start)
                } else {
                    self.make(LOGICAL_NOT_OPERATOR, start)
                }
            }
            '>' => {
                self.advance();
                if self.current_char() == '=' {
                    self.advance();
                    self.make(GREATER_OR_EQUAL_OPERATOR, start)
                } else {
                    self.make(GREATER_THAN_OPERATOR, start)
                }
            }
            '<' => {
                self.advance();
                if self.current_char() == '=' {
                    self.advance();
                    self.make(LESS_OR_EQUAL_OPERATOR, start)
                } else if self.current_char() == '>' {
                    self.advance();
                    self.make(NOT_EQUAL_OPERATOR, start)
                } else {
                    self.make(LESS_THAN_OPERATOR, start)
                }
            }
            '&' => {
                self.advance();
                if self.current_char() == '&' {
                    self.advance();
                    self.make(LOGICAL_AND_OPERATOR, start)
                } else {
                    self.make(INVALID_INPUT, start)
                }
            }
            '|' => {
                self.advance();
                if self.current_char() == '|' {
                    self.advance();
                    let token_type = if self.sql_mode.contains(SqlMode::PIPES_AS_CONCAT) {
                        CONCAT_PIPES_SYMBOL
                    } else {
                        LOGICAL_OR_OPERATOR
                    };
                    self.make(token_type, start)
                } else {
                    self.make(INVALID_INPUT, start)
                }
            }
            '@' => {
                self.advance();
                if self.current_char() == '@' {
                    self.advance();
                    self.make(AT_AT_SIGN_SYMBOL, start)
                } else {
                    self.make(AT_SIGN_SYMBOL, start)
                }
            }

            // Comments
            '-' => {
                if self.peek_char() == '-' && self.char_at(self.pos + 2).is_none_or(char::is_whitespace)
                {
                    self.skip_line();
                    self.make(LINE_COMMENT, start).hidden()
                } else {
                    self.single(MINUS_OPERATOR, start)
                }
            }
            '#' => {
                self.skip_line();
                self.make(LINE_COMMENT, start).hidden()
            }
            '/' => {
                if self.peek_char() == '*' {
                    self.scan_block_comment(start)
                } else {
                    self.single(DIV_OPERATOR, start)
                }
            }

            // Quoted text and identifiers
            '\'' => self.scan_quoted('\'', SINGLE_QUOTED_TEXT, start),
            '"' => self.scan_quoted('"', DOUBLE_QUOTED_TEXT, start),
            '`' => self.scan_quoted('`', BACK_TICK_QUOTED_ID, start),

            // Numbers
            '0'..='9' => self.scan_number(start),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' || c == '$' => self.scan_identifier(start),

            // Unknown character - don't panic, just return it
            _ => self.single(INVALID_INPUT, start),
        }
    }

    /// Scan quoted text; doubled quotes and (unless disabled) backslashes escape
    fn scan_quoted(&mut self, quote: char, token_type: TokenType, start: usize) -> Token {
        self.advance(); // Skip opening quote

        let backslash_escapes =
            quote != '`' && !self.sql_mode.contains(SqlMode::NO_BACKSLASH_ESCAPES);

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch == '\\' && backslash_escapes {
                self.advance();
                self.advance();
            } else if ch == quote {
                self.advance();
                if self.current_char() == quote && !self.is_at_end() {
                    self.advance();
                } else {
                    break;
                }
            } else {
                self.advance();
            }
        }

        self.make(token_type, start)
    }

    /// Scan a number (integer or decimal)
    fn scan_number(&mut self, start: usize) -> Token {
        let mut token_type = INT_NUMBER;

        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            self.advance();
        }

        // Handle decimal point
        if self.current_char() == '.' && self.peek_char().is_ascii_digit() {
            token_type = DECIMAL_NUMBER;
            self.advance();
            while !self.is_at_end() && self.current_char().is_ascii_digit() {
                self.advance();
            }
        }

        // Names may start with digits, e.g. `1st_quarter`
        if self.current_char().is_alphabetic() || self.current_char() == '_' {
            return self.scan_identifier(start);
        }

        self.make(token_type, start)
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self, start: usize) -> Token {
        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                self.advance();
            } else {
                break;
            }
        }

        let word = self.text(start).to_uppercase();
        let token_type = keyword_token(&word).unwrap_or(IDENTIFIER);
        self.make(token_type, start)
    }

    fn scan_block_comment(&mut self, start: usize) -> Token {
        self.advance();
        self.advance();
        while !self.is_at_end() {
            if self.current_char() == '*' && self.peek_char() == '/' {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        self.make(BLOCK_COMMENT, start).hidden()
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.current_char() != '\n' {
            self.advance();
        }
    }

    fn single(&mut self, token_type: TokenType, start: usize) -> Token {
        self.advance();
        self.make(token_type, start)
    }

    fn make(&self, token_type: TokenType, start: usize) -> Token {
        let start_offset = self.offset(start);
        let stop_offset = self.offset(self.pos);
        Token::new(
            token_type,
            start_offset,
            stop_offset,
            &self.source[start_offset..stop_offset],
        )
    }

    fn text(&self, start: usize) -> &'a str {
        &self.source[self.offset(start)..self.offset(self.pos)]
    }

    /// Byte offset of the character at `pos`
    fn offset(&self, pos: usize) -> usize {
        self.input
            .get(pos)
            .map_or(self.source.len(), |(offset, _)| *offset)
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos).map(|(_, ch)| *ch)
    }

    /// Get current character
    fn current_char(&self) -> char {
        self.char_at(self.pos).unwrap_or('\0')
    }

    /// Peek at next character
    fn peek_char(&self) -> char {
        self.char_at(self.pos + 1).unwrap_or('\0')
    }

    /// Advance position
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

/// Strip quotes from an identifier token text, undoubling embedded quotes
pub fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(quote @ ('`' | '"' | '\'')) => {
            let inner = text[1..].strip_suffix(quote).unwrap_or(&text[1..]);
            let doubled: String = [quote, quote].iter().collect();
            inner.replace(&doubled, &quote.to_string())
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(sql: &str, mode: SqlMode) -> Vec<TokenType> {
        MySqlLexer::tokenize(sql, mode)
            .into_iter()
            .filter(Token::is_default_channel)
            .map(|token| token.token_type)
            .collect()
    }

    #[test]
    fn test_tokenize_simple_select() {
        assert_eq!(
            types("SELECT * FROM users", SqlMode::empty()),
            vec![SELECT_SYMBOL, MULT_OPERATOR, FROM_SYMBOL, IDENTIFIER, EOF]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            types("select Distinct", SqlMode::empty()),
            vec![SELECT_SYMBOL, DISTINCT_SYMBOL, EOF]
        );
    }

    #[test]
    fn test_whitespace_and_comments_are_hidden() {
        let tokens = MySqlLexer::tokenize("SELECT /* c */ 1 -- tail\n# more", SqlMode::empty());
        let hidden: Vec<TokenType> = tokens
            .iter()
            .filter(|t| !t.is_default_channel())
            .map(|t| t.token_type)
            .collect();

        assert_eq!(
            hidden,
            vec![
                WHITESPACE,
                BLOCK_COMMENT,
                WHITESPACE,
                WHITESPACE,
                LINE_COMMENT,
                WHITESPACE,
                LINE_COMMENT
            ]
        );
    }

    #[test]
    fn test_double_dash_without_space_is_minus() {
        assert_eq!(
            types("1--2", SqlMode::empty()),
            vec![INT_NUMBER, MINUS_OPERATOR, MINUS_OPERATOR, INT_NUMBER, EOF]
        );
    }

    #[test]
    fn test_tokenize_partial_input() {
        let tokens = MySqlLexer::tokenize("SELECT * FR", SqlMode::empty());
        let last = &tokens[tokens.len() - 2];
        assert_eq!(last.token_type, IDENTIFIER);
        assert_eq!(last.text, "FR");
        assert_eq!((last.start, last.stop), (9, 11));
    }

    #[test]
    fn test_pipes_depend_on_sql_mode() {
        assert_eq!(
            types("a || b", SqlMode::empty())[1],
            LOGICAL_OR_OPERATOR
        );
        assert_eq!(
            types("a || b", SqlMode::PIPES_AS_CONCAT)[1],
            CONCAT_PIPES_SYMBOL
        );
    }

    #[test]
    fn test_quoted_text() {
        let tokens = MySqlLexer::tokenize("'it''s' \"a\\\"b\" `we``ird`", SqlMode::empty());
        let texts: Vec<(&str, TokenType)> = tokens
            .iter()
            .filter(|t| t.is_default_channel() && !t.is_eof())
            .map(|t| (t.text.as_str(), t.token_type))
            .collect();

        assert_eq!(
            texts,
            vec![
                ("'it''s'", SINGLE_QUOTED_TEXT),
                ("\"a\\\"b\"", DOUBLE_QUOTED_TEXT),
                ("`we``ird`", BACK_TICK_QUOTED_ID)
            ]
        );
    }

    #[test]
    fn test_no_backslash_escapes() {
        let tokens = MySqlLexer::tokenize("'a\\' b", SqlMode::NO_BACKSLASH_ESCAPES);
        assert_eq!(tokens[0].text, "'a\\'");
        assert_eq!(tokens[0].token_type, SINGLE_QUOTED_TEXT);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let tokens = MySqlLexer::tokenize("SELECT `my tab", SqlMode::empty());
        assert_eq!(tokens[2].token_type, BACK_TICK_QUOTED_ID);
        assert_eq!(tokens[2].text, "`my tab");
        assert!(tokens[3].is_eof());
    }

    #[test]
    fn test_variables_and_operators() {
        assert_eq!(
            types("@a = @@global.x <= 1.5 <> !", SqlMode::empty()),
            vec![
                AT_SIGN_SYMBOL,
                IDENTIFIER,
                EQUAL_OPERATOR,
                AT_AT_SIGN_SYMBOL,
                GLOBAL_SYMBOL,
                DOT_SYMBOL,
                IDENTIFIER,
                LESS_OR_EQUAL_OPERATOR,
                DECIMAL_NUMBER,
                NOT_EQUAL_OPERATOR,
                LOGICAL_NOT_OPERATOR,
                EOF
            ]
        );
    }

    #[test]
    fn test_byte_offsets_with_multibyte_text() {
        let tokens = MySqlLexer::tokenize("SELECT 'é' FROM", SqlMode::empty());
        let from = tokens
            .iter()
            .find(|t| t.token_type == FROM_SYMBOL)
            .unwrap();
        assert_eq!(from.start, 12);
        assert_eq!(from.text, "FROM");
    }

    #[test]
    fn test_unknown_characters_never_fail() {
        assert_eq!(
            types("SELECT ~ ?", SqlMode::empty()),
            vec![SELECT_SYMBOL, INVALID_INPUT, INVALID_INPUT, EOF]
        );
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("`we``ird`"), "we`ird");
        assert_eq!(unquote("`open"), "open");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("'x'"), "x");
    }
}
