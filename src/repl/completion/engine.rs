//! Completion engine - orchestrates the completion flow
//!
//! Lexing, caret location, the grammar walk and the mapping of its
//! candidates to names all meet here:
//!
//! 1. Lex with the session SQL mode and locate the caret token
//! 2. Collect token and rule candidates at the caret
//! 3. Turn keyword tokens into (compound) keywords
//! 4. Turn rule candidates into contexts and fetch their names
//! 5. Filter by the typed prefix, order by kind, cap the list

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use super::context::{CompletionContext, REFERENCE_RULES, SILENT_RULES};
use super::provider::{self, MetadataProvider, filter_by_prefix};
use super::references::{self, TableReference};
use super::scanner::{self, Caret};
use crate::config::CompletionConfig;
use crate::error::{CompletionError, Result};
use crate::parser::code_completion::{CandidatesCollection, CodeCompletionCore};
use crate::parser::mysql::tokens::{EQUAL_OPERATOR, INVALID_INPUT, keyword_text, keyword_token};
use crate::parser::mysql::{MySqlParser, ServerVersion};
use crate::parser::{EOF, Parser, TokenStream, TokenType};
use crate::repl::SharedState;

/// What a suggestion names; also its display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Column,
    Alias,
    Table,
    View,
    Schema,
    Function,
    RuntimeFunction,
    Procedure,
    UserVariable,
    SystemVariable,
    User,
    Label,
    Charset,
    Collation,
    Keyword,
}

impl SuggestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionKind::Column => "column",
            SuggestionKind::Alias => "alias",
            SuggestionKind::Table => "table",
            SuggestionKind::View => "view",
            SuggestionKind::Schema => "schema",
            SuggestionKind::Function => "function",
            SuggestionKind::RuntimeFunction => "runtime_function",
            SuggestionKind::Procedure => "procedure",
            SuggestionKind::UserVariable => "user_variable",
            SuggestionKind::SystemVariable => "system_variable",
            SuggestionKind::User => "user",
            SuggestionKind::Label => "label",
            SuggestionKind::Charset => "charset",
            SuggestionKind::Collation => "collation",
            SuggestionKind::Keyword => "keyword",
        }
    }

    /// Kinds naming SQL identifiers, back-tick quoted when necessary
    fn is_identifier(&self) -> bool {
        matches!(
            self,
            SuggestionKind::Column
                | SuggestionKind::Alias
                | SuggestionKind::Table
                | SuggestionKind::View
                | SuggestionKind::Schema
                | SuggestionKind::Function
                | SuggestionKind::Procedure
                | SuggestionKind::UserVariable
                | SuggestionKind::Label
        )
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&CompletionContext> for SuggestionKind {
    fn from(context: &CompletionContext) -> Self {
        match context {
            CompletionContext::Schemas => SuggestionKind::Schema,
            CompletionContext::Tables { .. } => SuggestionKind::Table,
            CompletionContext::Views { .. } => SuggestionKind::View,
            CompletionContext::Columns { .. } => SuggestionKind::Column,
            CompletionContext::TableAliases => SuggestionKind::Alias,
            CompletionContext::Functions { .. } => SuggestionKind::Function,
            CompletionContext::RuntimeFunctions => SuggestionKind::RuntimeFunction,
            CompletionContext::Procedures { .. } => SuggestionKind::Procedure,
            CompletionContext::SystemVariables => SuggestionKind::SystemVariable,
            CompletionContext::UserVariables => SuggestionKind::UserVariable,
            CompletionContext::Users => SuggestionKind::User,
            CompletionContext::Labels => SuggestionKind::Label,
            CompletionContext::Charsets => SuggestionKind::Charset,
            CompletionContext::Collations => SuggestionKind::Collation,
        }
    }
}

/// Completion pair representing a candidate suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionPair {
    /// Display text for the candidate
    pub display: String,
    /// Replacement text to insert
    pub replacement: String,
    pub kind: SuggestionKind,
}

/// Suggestions for one cursor position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    /// Byte offset where the replacement starts; it ends at the cursor
    pub replace_start: usize,
    /// Text typed between `replace_start` and the cursor, unquoted
    pub prefix: String,
    pub suggestions: Vec<CompletionPair>,
}

/// Grammar candidates at the caret with display names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawCandidates {
    pub caret_token_index: usize,
    pub tokens: BTreeMap<String, Vec<String>>,
    pub rules: BTreeMap<String, Vec<String>>,
}

/// Operators, punctuation, literals, identifiers, EOF and invalid input
fn ignored_tokens() -> HashSet<TokenType> {
    (EQUAL_OPERATOR..=INVALID_INPUT).chain([EOF]).collect()
}

/// Back-tick quote `name`, doubling embedded back ticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || name.chars().all(|c| c.is_ascii_digit())
        || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        || keyword_token(&name.to_uppercase()).is_some()
}

/// Names the statement around the caret already mentions
struct Scope<'a> {
    stream: &'a TokenStream,
    caret: &'a Caret,
    statement: Range<usize>,
    references: Vec<TableReference>,
    default_schema: Option<String>,
    server_version: ServerVersion,
}

/// Main completion engine
pub struct CompletionEngine {
    provider: Arc<dyn MetadataProvider>,
    state: SharedState,
    options: CompletionConfig,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `provider` - Source of schema object names
    /// * `state` - Session settings and the shared follow-set cache
    /// * `options` - Debug flags, keyword case and result cap
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        state: SharedState,
        options: CompletionConfig,
    ) -> Self {
        Self {
            provider,
            state,
            options,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Complete `sql` at byte offset `cursor`
    ///
    /// # Errors
    /// Returns an error if the cursor is outside the input or splits a
    /// character.
    pub fn complete(&self, sql: &str, cursor: usize) -> Result<CompletionResult> {
        let (parser, caret) = self.prepare(sql, cursor)?;
        let candidates = self.collect(&parser, &caret);
        let stream = parser.token_stream();

        let mut names: BTreeMap<SuggestionKind, Vec<String>> = BTreeMap::new();
        if !caret.quoted {
            names.insert(SuggestionKind::Keyword, self.keywords(&candidates));
        }

        if scanner::follows_complete_name(stream, &caret) {
            trace!("caret follows a complete name, rule candidates skipped");
        } else if !candidates.rules.is_empty() {
            let qualifiers = scanner::qualifiers_before(stream, caret.token_index);
            let sigil = scanner::variable_sigil(stream, caret.token_index);
            let scope = self.scope(stream, &caret, parser.server_version());

            for rule in candidates.rules.keys() {
                for context in CompletionContext::for_rule(*rule, &qualifiers, sigil) {
                    trace!(?context, "fetching names");
                    names
                        .entry(SuggestionKind::from(&context))
                        .or_default()
                        .extend(self.names_for(&context, &scope));
                }
            }
        }

        let mut seen = HashSet::new();
        let suggestions: Vec<CompletionPair> = names
            .into_iter()
            .flat_map(|(kind, names)| {
                filter_by_prefix(&names, &caret.prefix)
                    .into_iter()
                    .map(move |name| (kind, name))
            })
            .map(|(kind, name)| Self::pair(kind, name, caret.quoted))
            .filter(|pair| seen.insert(pair.replacement.clone()))
            .take(self.options.max_suggestions)
            .collect();

        debug!(
            count = suggestions.len(),
            prefix = %caret.prefix,
            "completion finished"
        );

        Ok(CompletionResult {
            replace_start: caret.replace_start,
            prefix: caret.prefix,
            suggestions,
        })
    }

    /// Raw grammar candidates at `cursor`, named for display
    pub fn candidates(&self, sql: &str, cursor: usize) -> Result<RawCandidates> {
        let (parser, caret) = self.prepare(sql, cursor)?;
        let collection = self.collect(&parser, &caret);
        let grammar = parser.grammar();
        let vocabulary = parser.vocabulary();

        let tokens = collection
            .tokens
            .iter()
            .map(|(token, following)| {
                (
                    vocabulary.display_name(*token),
                    following
                        .iter()
                        .map(|token| vocabulary.display_name(*token))
                        .collect(),
                )
            })
            .collect();
        let rules = collection
            .rules
            .iter()
            .map(|(rule, path)| {
                (
                    grammar.rule_name(*rule).to_string(),
                    path.iter()
                        .map(|rule| grammar.rule_name(*rule).to_string())
                        .collect(),
                )
            })
            .collect();

        Ok(RawCandidates {
            caret_token_index: caret.token_index,
            tokens,
            rules,
        })
    }

    fn prepare(&self, sql: &str, cursor: usize) -> Result<(MySqlParser, Caret)> {
        if cursor > sql.len() {
            return Err(CompletionError::CursorOutOfRange {
                cursor,
                length: sql.len(),
            }
            .into());
        }
        if !sql.is_char_boundary(cursor) {
            return Err(CompletionError::CursorNotOnCharBoundary(cursor).into());
        }

        let parser = MySqlParser::from_sql(
            sql,
            self.state.get_server_version(),
            self.state.get_sql_mode(),
        )?;
        let caret = scanner::locate_caret(parser.token_stream(), sql, cursor);
        debug!(
            caret = caret.token_index,
            replace_start = caret.replace_start,
            "located caret"
        );
        Ok((parser, caret))
    }

    fn collect(&self, parser: &MySqlParser, caret: &Caret) -> CandidatesCollection {
        let mut core = CodeCompletionCore::new(parser, self.state.follow_sets());
        core.ignored_tokens = ignored_tokens();
        core.preferred_rules = REFERENCE_RULES
            .iter()
            .chain(SILENT_RULES)
            .copied()
            .collect();
        core.show_result = self.options.show_result;
        core.show_debug_output = self.options.show_debug_output;
        core.show_rule_stack = self.options.show_rule_stack;
        core.debug_output_with_transitions = self.options.debug_output_with_transitions;

        core.collect_candidates(caret.token_index, None)
    }

    /// Keyword candidates, joined with their fixed continuation
    fn keywords(&self, candidates: &CandidatesCollection) -> Vec<String> {
        candidates
            .tokens
            .iter()
            .filter_map(|(token, following)| {
                let first = keyword_text(*token)?;
                let words: Vec<&str> = std::iter::once(first)
                    .chain(following.iter().map_while(|token| keyword_text(*token)))
                    .collect();
                let keyword = words.join(" ");
                Some(if self.options.uppercase_keywords {
                    keyword
                } else {
                    keyword.to_lowercase()
                })
            })
            .collect()
    }

    fn scope<'a>(
        &self,
        stream: &'a TokenStream,
        caret: &'a Caret,
        server_version: ServerVersion,
    ) -> Scope<'a> {
        let statement = scanner::statement_bounds(stream, caret.token_index);
        let typed_word = (!caret.prefix.is_empty() || caret.quoted).then_some(caret.token_index);
        let references = references::table_references(stream, statement.clone(), typed_word);
        trace!(?references, "statement references");

        Scope {
            stream,
            caret,
            statement,
            references,
            default_schema: self.state.get_schema(),
            server_version,
        }
    }

    fn names_for(&self, context: &CompletionContext, scope: &Scope<'_>) -> Vec<String> {
        let default_schema = scope.default_schema.as_deref();
        match context {
            CompletionContext::Schemas => self.provider.schemas(),
            CompletionContext::Tables { schema } => {
                self.in_schema(schema.as_deref().or(default_schema), |schema| {
                    self.provider.tables(schema)
                })
            }
            CompletionContext::Views { schema } => {
                self.in_schema(schema.as_deref().or(default_schema), |schema| {
                    self.provider.views(schema)
                })
            }
            CompletionContext::Columns { schema, table } => {
                self.columns(schema.as_deref(), table.as_deref(), scope)
            }
            CompletionContext::TableAliases => scope
                .references
                .iter()
                .map(|reference| reference.visible_name().to_string())
                .collect(),
            CompletionContext::Functions { schema } => {
                self.in_schema(schema.as_deref().or(default_schema), |schema| {
                    self.provider.functions(schema)
                })
            }
            CompletionContext::RuntimeFunctions => provider::runtime_functions(),
            CompletionContext::Procedures { schema } => {
                self.in_schema(schema.as_deref().or(default_schema), |schema| {
                    self.provider.procedures(schema)
                })
            }
            CompletionContext::SystemVariables => provider::system_variables(),
            CompletionContext::UserVariables => {
                references::user_variables(scope.stream, Some(scope.caret.token_index))
            }
            CompletionContext::Users => self.provider.users(),
            CompletionContext::Labels => {
                references::labels_in_scope(scope.stream, scope.caret.token_index)
            }
            CompletionContext::Charsets => provider::charsets(),
            CompletionContext::Collations => {
                let charset = references::names_charset(scope.stream, scope.statement.clone());
                provider::collations(scope.server_version, charset.as_deref())
            }
        }
    }

    /// Run `fetch` for one schema, or for every schema when none is known
    fn in_schema(&self, schema: Option<&str>, fetch: impl Fn(&str) -> Vec<String>) -> Vec<String> {
        match schema {
            Some(schema) => fetch(schema),
            None => self
                .provider
                .schemas()
                .iter()
                .flat_map(|schema| fetch(schema.as_str()))
                .collect(),
        }
    }

    fn columns(&self, schema: Option<&str>, table: Option<&str>, scope: &Scope<'_>) -> Vec<String> {
        match (schema, table) {
            (Some(schema), Some(table)) => self.provider.columns(schema, table),
            (_, Some(qualifier)) => {
                match scope
                    .references
                    .iter()
                    .find(|reference| reference.matches(qualifier))
                {
                    Some(reference) => self.reference_columns(reference, scope),
                    None => self.table_columns(None, qualifier, scope),
                }
            }
            _ if scope.references.is_empty() => {
                let Some(schema) = scope.default_schema.as_deref() else {
                    return Vec::new();
                };
                self.provider
                    .tables(schema)
                    .iter()
                    .flat_map(|table| self.provider.columns(schema, table))
                    .collect()
            }
            _ => scope
                .references
                .iter()
                .flat_map(|reference| self.reference_columns(reference, scope))
                .collect(),
        }
    }

    fn reference_columns(&self, reference: &TableReference, scope: &Scope<'_>) -> Vec<String> {
        self.table_columns(reference.schema.as_deref(), &reference.table, scope)
    }

    /// Columns of `table`, looked up in the default schema when unqualified
    ///
    /// Without a default schema the first schema having such a table wins.
    fn table_columns(&self, schema: Option<&str>, table: &str, scope: &Scope<'_>) -> Vec<String> {
        if let Some(schema) = schema.or(scope.default_schema.as_deref()) {
            return self.provider.columns(schema, table);
        }
        self.provider
            .schemas()
            .iter()
            .map(|schema| self.provider.columns(schema, table))
            .find(|columns| !columns.is_empty())
            .unwrap_or_default()
    }

    fn pair(kind: SuggestionKind, name: String, quoted: bool) -> CompletionPair {
        let replacement = if kind.is_identifier() && (quoted || needs_quoting(&name)) {
            quote_identifier(&name)
        } else {
            name.clone()
        };
        CompletionPair {
            display: name,
            replacement,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("first name"), "`first name`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_needs_quoting() {
        assert!(!needs_quoting("actor"));
        assert!(!needs_quoting("film_2024"));
        assert!(needs_quoting("first name"));
        assert!(needs_quoting("select"));
        assert!(needs_quoting("2024"));
        assert!(needs_quoting(""));
    }

    #[test]
    fn test_identifier_kinds_are_quoted() {
        let pair = CompletionEngine::pair(SuggestionKind::Table, "order".to_string(), false);
        assert_eq!(pair.replacement, "`order`");
        assert_eq!(pair.display, "order");

        let pair = CompletionEngine::pair(SuggestionKind::Keyword, "ORDER BY".to_string(), false);
        assert_eq!(pair.replacement, "ORDER BY");

        let pair = CompletionEngine::pair(SuggestionKind::Column, "title".to_string(), true);
        assert_eq!(pair.replacement, "`title`");
    }

    #[test]
    fn test_kind_order() {
        assert!(SuggestionKind::Column < SuggestionKind::Table);
        assert!(SuggestionKind::Collation < SuggestionKind::Keyword);
        assert_eq!(SuggestionKind::RuntimeFunction.to_string(), "runtime_function");
    }

    #[test]
    fn test_ignored_tokens_cover_non_keywords() {
        let ignored = ignored_tokens();
        assert!(ignored.contains(&EOF));
        assert!(ignored.contains(&crate::parser::mysql::tokens::IDENTIFIER));
        assert!(!ignored.contains(&crate::parser::mysql::tokens::SELECT_SYMBOL));
    }
}
