//! Completion context definitions
//!
//! A rule candidate from the grammar walk says *what kind* of name may
//! appear at the caret. Combined with the qualifiers typed before the caret
//! it becomes one or more [`CompletionContext`]s, each naming a single
//! source of suggestions.

use crate::parser::mysql::grammar::*;
use crate::parser::mysql::tokens::{AT_AT_SIGN_SYMBOL, AT_SIGN_SYMBOL};
use crate::parser::{RuleIndex, TokenType};

/// A single source of name suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    Schemas,

    /// Tables of a schema, the default schema when `None`
    Tables { schema: Option<String> },

    Views { schema: Option<String> },

    /// Columns of one table, or of every table the statement references
    Columns {
        schema: Option<String>,
        table: Option<String>,
    },

    /// Aliases and table names referenced by the statement
    TableAliases,

    /// Stored functions of a schema
    Functions { schema: Option<String> },

    /// Built-in functions
    RuntimeFunctions,

    Procedures { schema: Option<String> },

    SystemVariables,

    /// `@name` variables already written in the input
    UserVariables,

    Users,

    /// Labels of the enclosing blocks
    Labels,

    Charsets,

    Collations,
}

/// Preferred rules whose candidates map to suggestions
pub const REFERENCE_RULES: &[RuleIndex] = &[
    RULE_SCHEMA_REF,
    RULE_TABLE_REF,
    RULE_VIEW_REF,
    RULE_TABLE_WILD,
    RULE_COLUMN_REF,
    RULE_FUNCTION_REF,
    RULE_RUNTIME_FUNCTION_CALL,
    RULE_PROCEDURE_REF,
    RULE_USER_VARIABLE,
    RULE_SYSTEM_VARIABLE,
    RULE_SET_SYSTEM_VARIABLE,
    RULE_USER,
    RULE_LABEL_REF,
    RULE_CHARSET_NAME,
    RULE_COLLATION_NAME,
];

/// Preferred rules that only hide their tokens
///
/// A plain identifier (new alias, new label) has nothing to suggest, but
/// the identifier keywords it accepts should not show up as keywords.
pub const SILENT_RULES: &[RuleIndex] = &[RULE_IDENTIFIER, RULE_LABEL];

impl CompletionContext {
    /// Contexts for a rule candidate
    ///
    /// `qualifiers` are the dotted names typed right before the caret,
    /// outermost first. `sigil` is the `@`/`@@` token the caret follows.
    pub fn for_rule(rule: RuleIndex, qualifiers: &[String], sigil: Option<TokenType>) -> Vec<Self> {
        use CompletionContext::*;

        let owned = |index: usize| qualifiers.get(index).cloned();

        match (rule, qualifiers.len()) {
            (RULE_SCHEMA_REF, 0) => vec![Schemas],

            (RULE_TABLE_REF, 0) => vec![
                Schemas,
                Tables { schema: None },
                Views { schema: None },
            ],
            (RULE_TABLE_REF, 1) => vec![
                Tables { schema: owned(0) },
                Views { schema: owned(0) },
            ],

            (RULE_VIEW_REF, 0) => vec![Schemas, Views { schema: None }],
            (RULE_VIEW_REF, 1) => vec![Views { schema: owned(0) }],

            (RULE_TABLE_WILD, 0) => vec![TableAliases],
            (RULE_TABLE_WILD, 1) => vec![Tables { schema: owned(0) }],

            (RULE_COLUMN_REF, 0) => vec![
                Columns {
                    schema: None,
                    table: None,
                },
                TableAliases,
            ],
            (RULE_COLUMN_REF, 1) => vec![
                Columns {
                    schema: None,
                    table: owned(0),
                },
                Tables { schema: owned(0) },
            ],
            (RULE_COLUMN_REF, 2) => vec![Columns {
                schema: owned(0),
                table: owned(1),
            }],

            (RULE_FUNCTION_REF, 0) => vec![RuntimeFunctions, Functions { schema: None }],
            (RULE_FUNCTION_REF, 1) => vec![Functions { schema: owned(0) }],
            (RULE_RUNTIME_FUNCTION_CALL, 0) => vec![RuntimeFunctions],

            (RULE_PROCEDURE_REF, 0) => vec![Procedures { schema: None }, Schemas],
            (RULE_PROCEDURE_REF, 1) => vec![Procedures { schema: owned(0) }],

            (RULE_USER_VARIABLE, _) if sigil == Some(AT_SIGN_SYMBOL) => vec![UserVariables],
            (RULE_SYSTEM_VARIABLE, _) if sigil == Some(AT_AT_SIGN_SYMBOL) => {
                vec![SystemVariables]
            }
            (RULE_SET_SYSTEM_VARIABLE, 0) => vec![SystemVariables],

            (RULE_USER, 0) => vec![Users],
            (RULE_LABEL_REF, 0) => vec![Labels],
            (RULE_CHARSET_NAME, 0) => vec![Charsets],
            (RULE_COLLATION_NAME, 0) => vec![Collations],

            _ => Vec::new(),
        }
    }
}
