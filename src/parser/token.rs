//! Token model shared by lexers, parsers and the completion core

use std::fmt;

/// Numeric token type as used in automaton labels
pub type TokenType = i32;

pub const EOF: TokenType = -1;
pub const EPSILON: TokenType = -2;
pub const INVALID_TYPE: TokenType = 0;
pub const MIN_USER_TOKEN_TYPE: TokenType = 1;

pub const DEFAULT_CHANNEL: usize = 0;
pub const HIDDEN_CHANNEL: usize = 1;

/// Lexed token with its position in the source text
///
/// `start` and `stop` are byte offsets; `stop` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub channel: usize,
    pub token_index: usize,
    pub start: usize,
    pub stop: usize,
    pub text: String,
}

impl Token {
    pub fn new(token_type: TokenType, start: usize, stop: usize, text: impl Into<String>) -> Self {
        Self {
            token_type,
            channel: DEFAULT_CHANNEL,
            token_index: 0,
            start,
            stop,
            text: text.into(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.channel = HIDDEN_CHANNEL;
        self
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == EOF
    }

    pub fn is_default_channel(&self) -> bool {
        self.channel == DEFAULT_CHANNEL
    }

    /// Whether `offset` lies within `[start, stop]`
    pub fn touches(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.stop
    }
}

/// Indexed, buffered token sequence always terminated by EOF
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|token| !token.is_eof()) {
            let end = tokens.last().map_or(0, |token| token.stop);
            tokens.push(Token::new(EOF, end, end, ""));
        }
        for (index, token) in tokens.iter_mut().enumerate() {
            token.token_index = index;
        }
        Self { tokens }
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn eof_index(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    /// Closest default-channel token before `index`
    pub fn previous_default(&self, index: usize) -> Option<&Token> {
        self.tokens[..index.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|token| token.is_default_channel())
    }

    /// Closest default-channel token after `index`
    pub fn next_default(&self, index: usize) -> Option<&Token> {
        self.tokens
            .iter()
            .skip(index + 1)
            .find(|token| token.is_default_channel())
    }
}

/// Literal and symbolic names per token type
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    literal_names: Vec<Option<String>>,
    symbolic_names: Vec<Option<String>>,
}

impl Vocabulary {
    pub fn new(literal_names: Vec<Option<String>>, symbolic_names: Vec<Option<String>>) -> Self {
        Self {
            literal_names,
            symbolic_names,
        }
    }

    /// Build from `(type, symbolic, literal)` rows
    pub fn from_table(rows: &[(TokenType, &str, Option<&str>)]) -> Self {
        let size = rows
            .iter()
            .map(|(token_type, _, _)| *token_type)
            .max()
            .unwrap_or(0)
            .max(0) as usize
            + 1;
        let mut literal_names = vec![None; size];
        let mut symbolic_names = vec![None; size];
        for (token_type, symbolic, literal) in rows {
            if *token_type < 0 {
                continue;
            }
            let slot = *token_type as usize;
            symbolic_names[slot] = Some(symbolic.to_string());
            literal_names[slot] = literal.map(str::to_string);
        }
        Self::new(literal_names, symbolic_names)
    }

    pub fn max_token_type(&self) -> TokenType {
        self.literal_names.len().max(self.symbolic_names.len()) as TokenType - 1
    }

    pub fn literal_name(&self, token_type: TokenType) -> Option<&str> {
        usize::try_from(token_type)
            .ok()
            .and_then(|slot| self.literal_names.get(slot))
            .and_then(|name| name.as_deref())
    }

    pub fn symbolic_name(&self, token_type: TokenType) -> Option<&str> {
        if token_type == EOF {
            return Some("EOF");
        }
        usize::try_from(token_type)
            .ok()
            .and_then(|slot| self.symbolic_names.get(slot))
            .and_then(|name| name.as_deref())
    }

    /// Literal name if present, then symbolic name, then the number
    pub fn display_name(&self, token_type: TokenType) -> String {
        if token_type == EOF {
            return "<EOF>".to_string();
        }
        if token_type == EPSILON {
            return "<EPSILON>".to_string();
        }
        self.literal_name(token_type)
            .or_else(|| self.symbolic_name(token_type))
            .map(str::to_string)
            .unwrap_or_else(|| token_type.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[@{},{}:{}='{}',<{}>]",
            self.token_index, self.start, self.stop, self.text, self.token_type
        )
    }
}
