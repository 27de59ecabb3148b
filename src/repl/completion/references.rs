//! Table references, labels and variables written around the caret
//!
//! A single forward pass over the statement tokens, driven by a small state
//! machine. It is error tolerant: unexpected tokens end the current
//! reference and the machine waits for the next FROM/JOIN/UPDATE/INTO.

use std::ops::Range;

use super::scanner::{default_tokens, is_name};
use crate::parser::mysql::lexer::unquote;
use crate::parser::mysql::tokens::*;
use crate::parser::{Token, TokenStream};

/// A table named in a statement, with its alias if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReference {
    pub schema: Option<String>,
    pub table: String,
    pub alias: Option<String>,
}

impl TableReference {
    fn new(table: String) -> Self {
        Self {
            schema: None,
            table,
            alias: None,
        }
    }

    /// Whether `qualifier` designates this reference
    ///
    /// An alias hides the table name, as in SQL itself.
    pub fn matches(&self, qualifier: &str) -> bool {
        match &self.alias {
            Some(alias) => alias.eq_ignore_ascii_case(qualifier),
            None => self.table.eq_ignore_ascii_case(qualifier),
        }
    }

    /// The name other parts of the statement use for this table
    pub fn visible_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}

/// Positions inside a table reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    /// After FROM, JOIN, UPDATE, INTO or a list comma
    ExpectTable,
    /// After `name` or `schema.name`
    AfterTable,
    /// After `name.`
    AfterDot,
    /// After AS
    ExpectAlias,
    AfterAlias,
}

struct ReferenceScanner {
    state: ScanState,
    /// A comma continues the table list (FROM and UPDATE)
    in_list: bool,
    pending: Option<TableReference>,
    references: Vec<TableReference>,
}

impl ReferenceScanner {
    fn new() -> Self {
        Self {
            state: ScanState::Idle,
            in_list: false,
            pending: None,
            references: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if let Some(reference) = self.pending.take() {
            self.references.push(reference);
        }
    }

    fn next(&mut self, token: &Token) {
        use ScanState::*;

        let token_type = token.token_type;
        if matches!(
            token_type,
            FROM_SYMBOL | JOIN_SYMBOL | UPDATE_SYMBOL | INTO_SYMBOL
        ) {
            self.flush();
            self.in_list = matches!(token_type, FROM_SYMBOL | UPDATE_SYMBOL);
            self.state = ExpectTable;
            return;
        }

        self.state = match (self.state, token_type) {
            (ExpectTable, t) if is_name(t) => {
                self.pending = Some(TableReference::new(unquote(&token.text)));
                AfterTable
            }
            (AfterTable, DOT_SYMBOL) => AfterDot,
            (AfterTable, AS_SYMBOL) => ExpectAlias,
            (AfterTable | ExpectAlias, t) if is_name(t) => {
                if let Some(reference) = self.pending.as_mut() {
                    reference.alias = Some(unquote(&token.text));
                }
                AfterAlias
            }
            (AfterDot, t) if is_name(t) => {
                if let Some(reference) = self.pending.as_mut() {
                    let schema = std::mem::replace(&mut reference.table, unquote(&token.text));
                    reference.schema = Some(schema);
                }
                AfterTable
            }
            (AfterDot, _) => {
                // `schema.` without a table yet
                self.pending = None;
                Idle
            }
            (AfterTable | AfterAlias, COMMA_SYMBOL) => {
                self.flush();
                if self.in_list { ExpectTable } else { Idle }
            }
            _ => {
                self.flush();
                Idle
            }
        };
    }

    fn finish(mut self) -> Vec<TableReference> {
        if self.state == ScanState::AfterDot {
            self.pending = None;
        }
        self.flush();
        self.references
    }
}

/// Table references of the statement tokens in `range`
///
/// `skip` excludes a token from the scan, normally the word being typed.
pub fn table_references(
    stream: &TokenStream,
    range: Range<usize>,
    skip: Option<usize>,
) -> Vec<TableReference> {
    let mut scanner = ReferenceScanner::new();
    for token in default_tokens(stream, range) {
        if Some(token.token_index) == skip {
            continue;
        }
        scanner.next(token);
    }
    scanner.finish()
}

/// Labels of the `BEGIN ... END` blocks enclosing the caret, outermost first
pub fn labels_in_scope(stream: &TokenStream, caret_index: usize) -> Vec<String> {
    let tokens: Vec<&Token> = default_tokens(stream, 0..caret_index.min(stream.len())).collect();
    let mut blocks: Vec<Option<String>> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        match token.token_type {
            BEGIN_SYMBOL => {
                let label = match index.checked_sub(2).map(|start| &tokens[start..index]) {
                    Some([name, colon])
                        if colon.token_type == COLON_SYMBOL && is_name(name.token_type) =>
                    {
                        Some(unquote(&name.text))
                    }
                    _ => None,
                };
                blocks.push(label);
            }
            END_SYMBOL => {
                blocks.pop();
            }
            _ => {}
        }
    }

    blocks.into_iter().flatten().collect()
}

/// User variable names written anywhere in the input, except at `skip`
///
/// `@` glued to a preceding name is a `user@host` separator, not a variable.
pub fn user_variables(stream: &TokenStream, skip: Option<usize>) -> Vec<String> {
    let tokens: Vec<&Token> = default_tokens(stream, 0..stream.len()).collect();
    let mut variables = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.token_type != AT_SIGN_SYMBOL {
            continue;
        }
        let glued = index
            .checked_sub(1)
            .and_then(|previous| tokens.get(previous))
            .is_some_and(|previous| previous.stop == token.start && !is_keyword(previous.token_type));
        if glued {
            continue;
        }
        let Some(name) = tokens.get(index + 1) else {
            continue;
        };
        if Some(name.token_index) == skip {
            continue;
        }
        if is_name(name.token_type) || name.token_type == SINGLE_QUOTED_TEXT {
            let variable = unquote(&name.text);
            if !variables.contains(&variable) {
                variables.push(variable);
            }
        }
    }

    variables
}

/// Character set named by `SET NAMES <charset>` in the statement
pub fn names_charset(stream: &TokenStream, range: Range<usize>) -> Option<String> {
    let tokens: Vec<&Token> = default_tokens(stream, range).collect();
    tokens.windows(2).find_map(|pair| match pair {
        [names, charset]
            if names.token_type == NAMES_SYMBOL
                && (is_name(charset.token_type) || charset.token_type == SINGLE_QUOTED_TEXT) =>
        {
            Some(unquote(&charset.text))
        }
        _ => None,
    })
}
