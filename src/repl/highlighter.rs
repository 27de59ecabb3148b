//! Syntax highlighter for SQL input
//!
//! Styling follows the MySQL lexer, so the session SQL mode decides whether
//! a double quoted word is a string or an identifier.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use super::shared_state::SharedState;
use crate::parser::Token;
use crate::parser::mysql::{MySqlLexer, SqlMode};
use crate::parser::mysql::tokens::*;

/// Lexer-driven SQL highlighter
pub struct SqlHighlighter {
    shared_state: SharedState,
    enabled: bool,
}

impl SqlHighlighter {
    /// Create a new syntax highlighter
    pub fn new(shared_state: SharedState, enabled: bool) -> Self {
        Self {
            shared_state,
            enabled,
        }
    }

    fn style(token: &Token, ansi_quotes: bool) -> Style {
        match token.token_type {
            t if is_keyword(t) => Color::Blue.bold(),
            DOUBLE_QUOTED_TEXT if ansi_quotes => Color::Green.normal(),
            SINGLE_QUOTED_TEXT | DOUBLE_QUOTED_TEXT => Color::Yellow.normal(),
            INT_NUMBER | DECIMAL_NUMBER => Color::Magenta.normal(),
            BACK_TICK_QUOTED_ID => Color::Green.normal(),
            BLOCK_COMMENT | LINE_COMMENT => Color::DarkGray.dimmed(),
            OPEN_PAR_SYMBOL | CLOSE_PAR_SYMBOL => Color::Cyan.normal(),
            DOT_SYMBOL | COMMA_SYMBOL | SEMICOLON_SYMBOL => Color::DarkGray.normal(),
            AT_SIGN_SYMBOL | AT_AT_SIGN_SYMBOL => Color::Cyan.bold(),
            INVALID_INPUT => Color::Red.normal(),
            _ => Style::default(),
        }
    }
}

impl Highlighter for SqlHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        // Explorer commands are not SQL
        if !self.enabled || line.trim_start().starts_with('\\') {
            let style = if self.enabled {
                Color::Green.bold()
            } else {
                Style::default()
            };
            styled.push((style, line.to_string()));
            return styled;
        }

        let sql_mode = self.shared_state.get_sql_mode();
        let ansi_quotes = sql_mode.contains(SqlMode::ANSI_QUOTES);
        let mut offset = 0;
        for token in MySqlLexer::tokenize(line, sql_mode) {
            if token.is_eof() {
                break;
            }
            // Gaps hold nothing the lexer keeps, push them verbatim
            if token.start > offset {
                styled.push((Style::default(), line[offset..token.start].to_string()));
            }
            styled.push((Self::style(&token, ansi_quotes), line[token.start..token.stop].to_string()));
            offset = token.stop;
        }
        if offset < line.len() {
            styled.push((Style::default(), line[offset..].to_string()));
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(highlighter: &SqlHighlighter, line: &str) -> Vec<(Style, String)> {
        highlighter.highlight(line, line.len()).buffer
    }

    #[test]
    fn test_highlight_preserves_text() {
        let highlighter = SqlHighlighter::new(SharedState::new(None), true);
        let line = "SELECT `a`, 'x' FROM t -- done";
        let text: String = segments(&highlighter, line)
            .into_iter()
            .map(|(_, text)| text)
            .collect();
        assert_eq!(text, line);
    }

    #[test]
    fn test_keywords_are_bold_blue() {
        let highlighter = SqlHighlighter::new(SharedState::new(None), true);
        let styled = segments(&highlighter, "SELECT 1");
        assert_eq!(styled[0], (Color::Blue.bold(), "SELECT".to_string()));
        assert!(styled.contains(&(Color::Magenta.normal(), "1".to_string())));
    }

    #[test]
    fn test_double_quotes_follow_sql_mode() {
        let state = SharedState::new(None);
        let highlighter = SqlHighlighter::new(state.clone(), true);
        let quoted = "\"actor\"".to_string();

        assert!(segments(&highlighter, "SELECT \"actor\"")
            .contains(&(Color::Yellow.normal(), quoted.clone())));

        state.set_sql_mode(SqlMode::ANSI_QUOTES);
        assert!(segments(&highlighter, "SELECT \"actor\"")
            .contains(&(Color::Green.normal(), quoted)));
    }

    #[test]
    fn test_disabled_is_plain() {
        let highlighter = SqlHighlighter::new(SharedState::new(None), false);
        let styled = segments(&highlighter, "SELECT 1");
        assert_eq!(styled, vec![(Style::default(), "SELECT 1".to_string())]);
    }

    #[test]
    fn test_explorer_command() {
        let highlighter = SqlHighlighter::new(SharedState::new(None), true);
        let styled = segments(&highlighter, "\\use sakila");
        assert_eq!(styled, vec![(Color::Green.bold(), "\\use sakila".to_string())]);
    }
}
