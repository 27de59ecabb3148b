//! MySQL grammar subset used for completion
//!
//! Rule names follow the upstream MySQL grammar so that rule candidates
//! read the same way (`columnRef`, `tableRef`, ...). The subset covers the
//! statements an interactive session types most: queries, DML, `USE`,
//! `SHOW`, `DROP`, `SET`, `CALL` and labeled `BEGIN ... END` blocks.

use std::sync::LazyLock;

use super::predicates;
use super::tokens::*;
use crate::error::GrammarError;
use crate::parser::builder::{Expr, GrammarBuilder, alt, opt, pred, rule, seq, set, star, tok};
use crate::parser::{EOF, Grammar, RuleIndex, TokenType};

pub const GRAMMAR_NAME: &str = "MySQL";

macro_rules! mysql_rules {
    ($($name:ident = $value:literal => $text:literal),* $(,)?) => {
        $(pub const $name: RuleIndex = $value;)*

        pub const RULE_NAMES: &[&str] = &[$($text),*];
    };
}

mysql_rules! {
    RULE_QUERY = 0 => "query",
    RULE_SIMPLE_STATEMENT = 1 => "simpleStatement",
    RULE_SELECT_STATEMENT = 2 => "selectStatement",
    RULE_WITH_CLAUSE = 3 => "withClause",
    RULE_COMMON_TABLE_EXPRESSION = 4 => "commonTableExpression",
    RULE_SELECT_OPTION = 5 => "selectOption",
    RULE_SELECT_ITEM_LIST = 6 => "selectItemList",
    RULE_SELECT_ITEM = 7 => "selectItem",
    RULE_SELECT_ALIAS = 8 => "selectAlias",
    RULE_FROM_CLAUSE = 9 => "fromClause",
    RULE_TABLE_REFERENCE_LIST = 10 => "tableReferenceList",
    RULE_TABLE_REFERENCE = 11 => "tableReference",
    RULE_JOINED_TABLE = 12 => "joinedTable",
    RULE_JOIN_SPECIFICATION = 13 => "joinSpecification",
    RULE_TABLE_FACTOR = 14 => "tableFactor",
    RULE_SINGLE_TABLE = 15 => "singleTable",
    RULE_DERIVED_TABLE = 16 => "derivedTable",
    RULE_TABLE_ALIAS = 17 => "tableAlias",
    RULE_WHERE_CLAUSE = 18 => "whereClause",
    RULE_GROUP_BY_CLAUSE = 19 => "groupByClause",
    RULE_HAVING_CLAUSE = 20 => "havingClause",
    RULE_ORDER_CLAUSE = 21 => "orderClause",
    RULE_ORDER_LIST = 22 => "orderList",
    RULE_ORDER_EXPRESSION = 23 => "orderExpression",
    RULE_LIMIT_CLAUSE = 24 => "limitClause",
    RULE_EXPR = 25 => "expr",
    RULE_PREDICATE_EXPR = 26 => "predicateExpr",
    RULE_COMP_OP = 27 => "compOp",
    RULE_BIT_EXPR = 28 => "bitExpr",
    RULE_SIMPLE_EXPR = 29 => "simpleExpr",
    RULE_RUNTIME_FUNCTION_CALL = 30 => "runtimeFunctionCall",
    RULE_FUNCTION_CALL = 31 => "functionCall",
    RULE_EXPR_LIST = 32 => "exprList",
    RULE_LITERAL = 33 => "literal",
    RULE_TEXT_LITERAL = 34 => "textLiteral",
    RULE_INSERT_STATEMENT = 35 => "insertStatement",
    RULE_UPDATE_STATEMENT = 36 => "updateStatement",
    RULE_UPDATE_ELEMENT = 37 => "updateElement",
    RULE_DELETE_STATEMENT = 38 => "deleteStatement",
    RULE_USE_COMMAND = 39 => "useCommand",
    RULE_SHOW_STATEMENT = 40 => "showStatement",
    RULE_DROP_STATEMENT = 41 => "dropStatement",
    RULE_IF_EXISTS = 42 => "ifExists",
    RULE_SET_STATEMENT = 43 => "setStatement",
    RULE_SET_ASSIGNMENT = 44 => "setAssignment",
    RULE_SET_SYSTEM_VARIABLE = 45 => "setSystemVariable",
    RULE_CALL_STATEMENT = 46 => "callStatement",
    RULE_LABELED_BLOCK = 47 => "labeledBlock",
    RULE_BLOCK_STATEMENT = 48 => "blockStatement",
    RULE_LEAVE_STATEMENT = 49 => "leaveStatement",
    RULE_ITERATE_STATEMENT = 50 => "iterateStatement",
    RULE_LABEL = 51 => "label",
    RULE_LABEL_REF = 52 => "labelRef",
    RULE_SCHEMA_REF = 53 => "schemaRef",
    RULE_TABLE_REF = 54 => "tableRef",
    RULE_VIEW_REF = 55 => "viewRef",
    RULE_TABLE_WILD = 56 => "tableWild",
    RULE_COLUMN_REF = 57 => "columnRef",
    RULE_FUNCTION_REF = 58 => "functionRef",
    RULE_PROCEDURE_REF = 59 => "procedureRef",
    RULE_USER_VARIABLE = 60 => "userVariable",
    RULE_SYSTEM_VARIABLE = 61 => "systemVariable",
    RULE_USER = 62 => "user",
    RULE_TEXT_OR_IDENTIFIER = 63 => "textOrIdentifier",
    RULE_CHARSET_NAME = 64 => "charsetName",
    RULE_COLLATION_NAME = 65 => "collationName",
    RULE_IDENTIFIER_LIST = 66 => "identifierList",
    RULE_IDENTIFIER = 67 => "identifier",
    RULE_IDENTIFIER_KEYWORD = 68 => "identifierKeyword",
}

static GRAMMAR: LazyLock<Result<Grammar, GrammarError>> = LazyLock::new(build);

/// The compiled MySQL grammar, built on first use
pub fn mysql_grammar() -> Result<&'static Grammar, GrammarError> {
    GRAMMAR.as_ref().map_err(Clone::clone)
}

/// `head (separator head)*`
fn list(head: Expr, separator: TokenType) -> Expr {
    seq(vec![head.clone(), star(seq(vec![tok(separator), head]))])
}

/// `identifier (DOT identifier)?`
fn qualified() -> Expr {
    seq(vec![
        rule(RULE_IDENTIFIER),
        opt(seq(vec![tok(DOT_SYMBOL), rule(RULE_IDENTIFIER)])),
    ])
}

fn build() -> Result<Grammar, GrammarError> {
    let mut builder = GrammarBuilder::new(GRAMMAR_NAME, vocabulary().clone());
    for (index, name) in RULE_NAMES.iter().enumerate() {
        if builder.rule(name) != index {
            return Err(GrammarError::DuplicateRule(name.to_string()));
        }
    }

    let from_or_in = || set(&[FROM_SYMBOL, IN_SYMBOL]);
    let parenthesized = |inner| seq(vec![tok(OPEN_PAR_SYMBOL), inner, tok(CLOSE_PAR_SYMBOL)]);

    let rules = vec![
        (
            RULE_QUERY,
            seq(vec![
                opt(rule(RULE_SIMPLE_STATEMENT)),
                star(seq(vec![
                    tok(SEMICOLON_SYMBOL),
                    opt(rule(RULE_SIMPLE_STATEMENT)),
                ])),
                tok(EOF),
            ]),
        ),
        (
            RULE_SIMPLE_STATEMENT,
            alt(vec![
                rule(RULE_SELECT_STATEMENT),
                rule(RULE_INSERT_STATEMENT),
                rule(RULE_UPDATE_STATEMENT),
                rule(RULE_DELETE_STATEMENT),
                rule(RULE_USE_COMMAND),
                rule(RULE_SHOW_STATEMENT),
                rule(RULE_DROP_STATEMENT),
                rule(RULE_SET_STATEMENT),
                rule(RULE_CALL_STATEMENT),
                rule(RULE_LABELED_BLOCK),
            ]),
        ),
        (
            RULE_SELECT_STATEMENT,
            seq(vec![
                opt(rule(RULE_WITH_CLAUSE)),
                tok(SELECT_SYMBOL),
                star(rule(RULE_SELECT_OPTION)),
                rule(RULE_SELECT_ITEM_LIST),
                opt(rule(RULE_FROM_CLAUSE)),
                opt(rule(RULE_WHERE_CLAUSE)),
                opt(rule(RULE_GROUP_BY_CLAUSE)),
                opt(rule(RULE_HAVING_CLAUSE)),
                opt(rule(RULE_ORDER_CLAUSE)),
                opt(rule(RULE_LIMIT_CLAUSE)),
            ]),
        ),
        (
            RULE_WITH_CLAUSE,
            seq(vec![
                pred(predicates::SERVER_VERSION_AT_LEAST_80000),
                tok(WITH_SYMBOL),
                opt(tok(RECURSIVE_SYMBOL)),
                list(rule(RULE_COMMON_TABLE_EXPRESSION), COMMA_SYMBOL),
            ]),
        ),
        (
            RULE_COMMON_TABLE_EXPRESSION,
            seq(vec![
                rule(RULE_IDENTIFIER),
                opt(parenthesized(rule(RULE_IDENTIFIER_LIST))),
                tok(AS_SYMBOL),
                parenthesized(rule(RULE_SELECT_STATEMENT)),
            ]),
        ),
        (
            RULE_SELECT_OPTION,
            alt(vec![
                tok(DISTINCT_SYMBOL),
                tok(ALL_SYMBOL),
                tok(SQL_NO_CACHE_SYMBOL),
                seq(vec![
                    pred(predicates::SERVER_VERSION_BELOW_80000),
                    tok(SQL_CACHE_SYMBOL),
                ]),
            ]),
        ),
        (
            RULE_SELECT_ITEM_LIST,
            seq(vec![
                alt(vec![rule(RULE_SELECT_ITEM), tok(MULT_OPERATOR)]),
                star(seq(vec![tok(COMMA_SYMBOL), rule(RULE_SELECT_ITEM)])),
            ]),
        ),
        (
            RULE_SELECT_ITEM,
            alt(vec![
                rule(RULE_TABLE_WILD),
                seq(vec![rule(RULE_EXPR), opt(rule(RULE_SELECT_ALIAS))]),
            ]),
        ),
        (
            RULE_SELECT_ALIAS,
            seq(vec![
                opt(tok(AS_SYMBOL)),
                alt(vec![rule(RULE_IDENTIFIER), rule(RULE_TEXT_LITERAL)]),
            ]),
        ),
        (
            RULE_FROM_CLAUSE,
            seq(vec![
                tok(FROM_SYMBOL),
                alt(vec![tok(DUAL_SYMBOL), rule(RULE_TABLE_REFERENCE_LIST)]),
            ]),
        ),
        (
            RULE_TABLE_REFERENCE_LIST,
            list(rule(RULE_TABLE_REFERENCE), COMMA_SYMBOL),
        ),
        (
            RULE_TABLE_REFERENCE,
            seq(vec![
                rule(RULE_TABLE_FACTOR),
                star(rule(RULE_JOINED_TABLE)),
            ]),
        ),
        (
            RULE_JOINED_TABLE,
            alt(vec![
                seq(vec![
                    opt(alt(vec![tok(INNER_SYMBOL), tok(CROSS_SYMBOL)])),
                    tok(JOIN_SYMBOL),
                    rule(RULE_TABLE_FACTOR),
                    opt(rule(RULE_JOIN_SPECIFICATION)),
                ]),
                seq(vec![
                    alt(vec![tok(LEFT_SYMBOL), tok(RIGHT_SYMBOL)]),
                    opt(tok(OUTER_SYMBOL)),
                    tok(JOIN_SYMBOL),
                    rule(RULE_TABLE_FACTOR),
                    rule(RULE_JOIN_SPECIFICATION),
                ]),
            ]),
        ),
        (
            RULE_JOIN_SPECIFICATION,
            alt(vec![
                seq(vec![tok(ON_SYMBOL), rule(RULE_EXPR)]),
                seq(vec![
                    tok(USING_SYMBOL),
                    parenthesized(rule(RULE_IDENTIFIER_LIST)),
                ]),
            ]),
        ),
        (
            RULE_TABLE_FACTOR,
            alt(vec![rule(RULE_SINGLE_TABLE), rule(RULE_DERIVED_TABLE)]),
        ),
        (
            RULE_SINGLE_TABLE,
            seq(vec![rule(RULE_TABLE_REF), opt(rule(RULE_TABLE_ALIAS))]),
        ),
        (
            RULE_DERIVED_TABLE,
            seq(vec![
                parenthesized(rule(RULE_SELECT_STATEMENT)),
                rule(RULE_TABLE_ALIAS),
            ]),
        ),
        (
            RULE_TABLE_ALIAS,
            seq(vec![opt(tok(AS_SYMBOL)), rule(RULE_IDENTIFIER)]),
        ),
        (
            RULE_WHERE_CLAUSE,
            seq(vec![tok(WHERE_SYMBOL), rule(RULE_EXPR)]),
        ),
        (
            RULE_GROUP_BY_CLAUSE,
            seq(vec![
                tok(GROUP_SYMBOL),
                tok(BY_SYMBOL),
                rule(RULE_ORDER_LIST),
            ]),
        ),
        (
            RULE_HAVING_CLAUSE,
            seq(vec![tok(HAVING_SYMBOL), rule(RULE_EXPR)]),
        ),
        (
            RULE_ORDER_CLAUSE,
            seq(vec![
                tok(ORDER_SYMBOL),
                tok(BY_SYMBOL),
                rule(RULE_ORDER_LIST),
            ]),
        ),
        (
            RULE_ORDER_LIST,
            list(rule(RULE_ORDER_EXPRESSION), COMMA_SYMBOL),
        ),
        (
            RULE_ORDER_EXPRESSION,
            seq(vec![
                rule(RULE_EXPR),
                opt(alt(vec![tok(ASC_SYMBOL), tok(DESC_SYMBOL)])),
            ]),
        ),
        (
            RULE_LIMIT_CLAUSE,
            seq(vec![
                tok(LIMIT_SYMBOL),
                tok(INT_NUMBER),
                opt(seq(vec![
                    alt(vec![tok(COMMA_SYMBOL), tok(OFFSET_SYMBOL)]),
                    tok(INT_NUMBER),
                ])),
            ]),
        ),
        (
            RULE_EXPR,
            seq(vec![
                opt(alt(vec![tok(NOT_SYMBOL), tok(LOGICAL_NOT_OPERATOR)])),
                rule(RULE_PREDICATE_EXPR),
                star(seq(vec![
                    alt(vec![
                        tok(AND_SYMBOL),
                        tok(OR_SYMBOL),
                        tok(XOR_SYMBOL),
                        tok(LOGICAL_AND_OPERATOR),
                        tok(LOGICAL_OR_OPERATOR),
                    ]),
                    opt(tok(NOT_SYMBOL)),
                    rule(RULE_PREDICATE_EXPR),
                ])),
            ]),
        ),
        (
            RULE_PREDICATE_EXPR,
            seq(vec![
                rule(RULE_BIT_EXPR),
                opt(alt(vec![
                    seq(vec![rule(RULE_COMP_OP), rule(RULE_BIT_EXPR)]),
                    seq(vec![
                        tok(IS_SYMBOL),
                        opt(tok(NOT_SYMBOL)),
                        alt(vec![
                            tok(NULL_SYMBOL),
                            tok(TRUE_SYMBOL),
                            tok(FALSE_SYMBOL),
                        ]),
                    ]),
                    seq(vec![
                        opt(tok(NOT_SYMBOL)),
                        alt(vec![
                            seq(vec![
                                tok(IN_SYMBOL),
                                parenthesized(alt(vec![
                                    rule(RULE_SELECT_STATEMENT),
                                    rule(RULE_EXPR_LIST),
                                ])),
                            ]),
                            seq(vec![tok(LIKE_SYMBOL), rule(RULE_BIT_EXPR)]),
                            seq(vec![
                                tok(BETWEEN_SYMBOL),
                                rule(RULE_BIT_EXPR),
                                tok(AND_SYMBOL),
                                rule(RULE_BIT_EXPR),
                            ]),
                        ]),
                    ]),
                ])),
            ]),
        ),
        (
            RULE_COMP_OP,
            set(&[
                EQUAL_OPERATOR,
                NOT_EQUAL_OPERATOR,
                LESS_THAN_OPERATOR,
                LESS_OR_EQUAL_OPERATOR,
                GREATER_THAN_OPERATOR,
                GREATER_OR_EQUAL_OPERATOR,
            ]),
        ),
        (
            RULE_BIT_EXPR,
            seq(vec![
                rule(RULE_SIMPLE_EXPR),
                star(seq(vec![
                    set(&[
                        PLUS_OPERATOR,
                        MINUS_OPERATOR,
                        MULT_OPERATOR,
                        DIV_OPERATOR,
                        CONCAT_PIPES_SYMBOL,
                    ]),
                    rule(RULE_SIMPLE_EXPR),
                ])),
            ]),
        ),
        (
            RULE_SIMPLE_EXPR,
            alt(vec![
                rule(RULE_LITERAL),
                rule(RULE_RUNTIME_FUNCTION_CALL),
                rule(RULE_FUNCTION_CALL),
                rule(RULE_COLUMN_REF),
                rule(RULE_USER_VARIABLE),
                rule(RULE_SYSTEM_VARIABLE),
                parenthesized(alt(vec![
                    rule(RULE_SELECT_STATEMENT),
                    rule(RULE_EXPR),
                ])),
                seq(vec![
                    tok(EXISTS_SYMBOL),
                    parenthesized(rule(RULE_SELECT_STATEMENT)),
                ]),
                seq(vec![tok(MINUS_OPERATOR), rule(RULE_SIMPLE_EXPR)]),
            ]),
        ),
        (
            RULE_RUNTIME_FUNCTION_CALL,
            alt(vec![
                seq(vec![
                    tok(COUNT_SYMBOL),
                    parenthesized(alt(vec![
                        tok(MULT_OPERATOR),
                        seq(vec![opt(tok(DISTINCT_SYMBOL)), rule(RULE_EXPR)]),
                    ])),
                ]),
                seq(vec![
                    set(&[SUM_SYMBOL, AVG_SYMBOL, MIN_SYMBOL, MAX_SYMBOL]),
                    parenthesized(seq(vec![
                        opt(tok(DISTINCT_SYMBOL)),
                        rule(RULE_EXPR),
                    ])),
                ]),
                seq(vec![
                    tok(NOW_SYMBOL),
                    tok(OPEN_PAR_SYMBOL),
                    tok(CLOSE_PAR_SYMBOL),
                ]),
                seq(vec![
                    tok(CURRENT_USER_SYMBOL),
                    opt(seq(vec![tok(OPEN_PAR_SYMBOL), tok(CLOSE_PAR_SYMBOL)])),
                ]),
            ]),
        ),
        (
            RULE_FUNCTION_CALL,
            seq(vec![
                rule(RULE_FUNCTION_REF),
                parenthesized(opt(rule(RULE_EXPR_LIST))),
            ]),
        ),
        (RULE_EXPR_LIST, list(rule(RULE_EXPR), COMMA_SYMBOL)),
        (
            RULE_LITERAL,
            alt(vec![
                rule(RULE_TEXT_LITERAL),
                tok(INT_NUMBER),
                tok(DECIMAL_NUMBER),
                tok(NULL_SYMBOL),
                tok(TRUE_SYMBOL),
                tok(FALSE_SYMBOL),
            ]),
        ),
        (
            RULE_TEXT_LITERAL,
            alt(vec![
                tok(SINGLE_QUOTED_TEXT),
                seq(vec![
                    pred(predicates::NOT_ANSI_QUOTES),
                    tok(DOUBLE_QUOTED_TEXT),
                ]),
            ]),
        ),
        (
            RULE_INSERT_STATEMENT,
            seq(vec![
                tok(INSERT_SYMBOL),
                opt(tok(IGNORE_SYMBOL)),
                opt(tok(INTO_SYMBOL)),
                rule(RULE_TABLE_REF),
                opt(parenthesized(opt(list(
                    rule(RULE_COLUMN_REF),
                    COMMA_SYMBOL,
                )))),
                alt(vec![
                    seq(vec![
                        tok(VALUES_SYMBOL),
                        list(
                            parenthesized(opt(rule(RULE_EXPR_LIST))),
                            COMMA_SYMBOL,
                        ),
                    ]),
                    rule(RULE_SELECT_STATEMENT),
                ]),
            ]),
        ),
        (
            RULE_UPDATE_STATEMENT,
            seq(vec![
                tok(UPDATE_SYMBOL),
                rule(RULE_TABLE_REFERENCE_LIST),
                tok(SET_SYMBOL),
                list(rule(RULE_UPDATE_ELEMENT), COMMA_SYMBOL),
                opt(rule(RULE_WHERE_CLAUSE)),
                opt(rule(RULE_ORDER_CLAUSE)),
                opt(rule(RULE_LIMIT_CLAUSE)),
            ]),
        ),
        (
            RULE_UPDATE_ELEMENT,
            seq(vec![
                rule(RULE_COLUMN_REF),
                tok(EQUAL_OPERATOR),
                alt(vec![rule(RULE_EXPR), tok(DEFAULT_SYMBOL)]),
            ]),
        ),
        (
            RULE_DELETE_STATEMENT,
            seq(vec![
                tok(DELETE_SYMBOL),
                tok(FROM_SYMBOL),
                rule(RULE_TABLE_REF),
                opt(rule(RULE_TABLE_ALIAS)),
                opt(rule(RULE_WHERE_CLAUSE)),
                opt(rule(RULE_ORDER_CLAUSE)),
                opt(rule(RULE_LIMIT_CLAUSE)),
            ]),
        ),
        (
            RULE_USE_COMMAND,
            seq(vec![tok(USE_SYMBOL), rule(RULE_SCHEMA_REF)]),
        ),
        (
            RULE_SHOW_STATEMENT,
            seq(vec![
                tok(SHOW_SYMBOL),
                alt(vec![
                    tok(DATABASES_SYMBOL),
                    seq(vec![
                        tok(TABLES_SYMBOL),
                        opt(seq(vec![from_or_in(), rule(RULE_SCHEMA_REF)])),
                    ]),
                    seq(vec![
                        tok(COLUMNS_SYMBOL),
                        from_or_in(),
                        rule(RULE_TABLE_REF),
                        opt(seq(vec![from_or_in(), rule(RULE_SCHEMA_REF)])),
                    ]),
                ]),
            ]),
        ),
        (
            RULE_DROP_STATEMENT,
            seq(vec![
                tok(DROP_SYMBOL),
                alt(vec![
                    seq(vec![
                        alt(vec![tok(DATABASE_SYMBOL), tok(SCHEMA_SYMBOL)]),
                        opt(rule(RULE_IF_EXISTS)),
                        rule(RULE_SCHEMA_REF),
                    ]),
                    seq(vec![
                        tok(TABLE_SYMBOL),
                        opt(rule(RULE_IF_EXISTS)),
                        list(rule(RULE_TABLE_REF), COMMA_SYMBOL),
                    ]),
                    seq(vec![
                        tok(VIEW_SYMBOL),
                        opt(rule(RULE_IF_EXISTS)),
                        list(rule(RULE_VIEW_REF), COMMA_SYMBOL),
                    ]),
                    seq(vec![
                        tok(PROCEDURE_SYMBOL),
                        opt(rule(RULE_IF_EXISTS)),
                        rule(RULE_PROCEDURE_REF),
                    ]),
                    seq(vec![
                        tok(FUNCTION_SYMBOL),
                        opt(rule(RULE_IF_EXISTS)),
                        rule(RULE_FUNCTION_REF),
                    ]),
                    seq(vec![
                        tok(USER_SYMBOL),
                        opt(rule(RULE_IF_EXISTS)),
                        list(rule(RULE_USER), COMMA_SYMBOL),
                    ]),
                ]),
            ]),
        ),
        (
            RULE_IF_EXISTS,
            seq(vec![tok(IF_SYMBOL), tok(EXISTS_SYMBOL)]),
        ),
        (
            RULE_SET_STATEMENT,
            seq(vec![
                tok(SET_SYMBOL),
                alt(vec![
                    seq(vec![
                        tok(NAMES_SYMBOL),
                        rule(RULE_CHARSET_NAME),
                        opt(seq(vec![
                            tok(COLLATE_SYMBOL),
                            rule(RULE_COLLATION_NAME),
                        ])),
                    ]),
                    list(rule(RULE_SET_ASSIGNMENT), COMMA_SYMBOL),
                ]),
            ]),
        ),
        (
            RULE_SET_ASSIGNMENT,
            seq(vec![
                alt(vec![
                    rule(RULE_USER_VARIABLE),
                    rule(RULE_SYSTEM_VARIABLE),
                    seq(vec![
                        opt(alt(vec![tok(GLOBAL_SYMBOL), tok(SESSION_SYMBOL)])),
                        rule(RULE_SET_SYSTEM_VARIABLE),
                    ]),
                ]),
                tok(EQUAL_OPERATOR),
                rule(RULE_EXPR),
            ]),
        ),
        (RULE_SET_SYSTEM_VARIABLE, qualified()),
        (
            RULE_CALL_STATEMENT,
            seq(vec![
                tok(CALL_SYMBOL),
                rule(RULE_PROCEDURE_REF),
                opt(parenthesized(opt(rule(RULE_EXPR_LIST)))),
            ]),
        ),
        (
            RULE_LABELED_BLOCK,
            seq(vec![
                opt(seq(vec![rule(RULE_LABEL), tok(COLON_SYMBOL)])),
                tok(BEGIN_SYMBOL),
                star(seq(vec![
                    rule(RULE_BLOCK_STATEMENT),
                    tok(SEMICOLON_SYMBOL),
                ])),
                tok(END_SYMBOL),
                opt(rule(RULE_LABEL_REF)),
            ]),
        ),
        (
            RULE_BLOCK_STATEMENT,
            alt(vec![
                rule(RULE_SIMPLE_STATEMENT),
                rule(RULE_LEAVE_STATEMENT),
                rule(RULE_ITERATE_STATEMENT),
            ]),
        ),
        (
            RULE_LEAVE_STATEMENT,
            seq(vec![tok(LEAVE_SYMBOL), rule(RULE_LABEL_REF)]),
        ),
        (
            RULE_ITERATE_STATEMENT,
            seq(vec![tok(ITERATE_SYMBOL), rule(RULE_LABEL_REF)]),
        ),
        (RULE_LABEL, rule(RULE_IDENTIFIER)),
        (RULE_LABEL_REF, rule(RULE_IDENTIFIER)),
        (RULE_SCHEMA_REF, rule(RULE_IDENTIFIER)),
        (RULE_TABLE_REF, qualified()),
        (RULE_VIEW_REF, qualified()),
        (
            RULE_TABLE_WILD,
            seq(vec![
                rule(RULE_IDENTIFIER),
                tok(DOT_SYMBOL),
                opt(seq(vec![rule(RULE_IDENTIFIER), tok(DOT_SYMBOL)])),
                tok(MULT_OPERATOR),
            ]),
        ),
        (
            RULE_COLUMN_REF,
            seq(vec![
                rule(RULE_IDENTIFIER),
                opt(seq(vec![
                    tok(DOT_SYMBOL),
                    rule(RULE_IDENTIFIER),
                    opt(seq(vec![tok(DOT_SYMBOL), rule(RULE_IDENTIFIER)])),
                ])),
            ]),
        ),
        (RULE_FUNCTION_REF, qualified()),
        (RULE_PROCEDURE_REF, qualified()),
        (
            RULE_USER_VARIABLE,
            seq(vec![tok(AT_SIGN_SYMBOL), rule(RULE_TEXT_OR_IDENTIFIER)]),
        ),
        (
            RULE_SYSTEM_VARIABLE,
            seq(vec![
                tok(AT_AT_SIGN_SYMBOL),
                opt(seq(vec![
                    alt(vec![tok(GLOBAL_SYMBOL), tok(SESSION_SYMBOL)]),
                    tok(DOT_SYMBOL),
                ])),
                rule(RULE_IDENTIFIER),
            ]),
        ),
        (
            RULE_USER,
            alt(vec![
                seq(vec![
                    rule(RULE_TEXT_OR_IDENTIFIER),
                    opt(seq(vec![
                        tok(AT_SIGN_SYMBOL),
                        rule(RULE_TEXT_OR_IDENTIFIER),
                    ])),
                ]),
                seq(vec![
                    tok(CURRENT_USER_SYMBOL),
                    opt(seq(vec![tok(OPEN_PAR_SYMBOL), tok(CLOSE_PAR_SYMBOL)])),
                ]),
            ]),
        ),
        (
            RULE_TEXT_OR_IDENTIFIER,
            alt(vec![rule(RULE_IDENTIFIER), rule(RULE_TEXT_LITERAL)]),
        ),
        (
            RULE_CHARSET_NAME,
            alt(vec![rule(RULE_TEXT_OR_IDENTIFIER), tok(DEFAULT_SYMBOL)]),
        ),
        (RULE_COLLATION_NAME, rule(RULE_TEXT_OR_IDENTIFIER)),
        (
            RULE_IDENTIFIER_LIST,
            list(rule(RULE_IDENTIFIER), COMMA_SYMBOL),
        ),
        (
            RULE_IDENTIFIER,
            alt(vec![
                tok(IDENTIFIER),
                tok(BACK_TICK_QUOTED_ID),
                seq(vec![
                    pred(predicates::ANSI_QUOTES),
                    tok(DOUBLE_QUOTED_TEXT),
                ]),
                rule(RULE_IDENTIFIER_KEYWORD),
            ]),
        ),
        (
            RULE_IDENTIFIER_KEYWORD,
            set(&[
                COLUMNS_SYMBOL,
                DATABASES_SYMBOL,
                GLOBAL_SYMBOL,
                OFFSET_SYMBOL,
                SESSION_SYMBOL,
                TABLES_SYMBOL,
                USER_SYMBOL,
            ]),
        ),
    ];

    for (index, body) in rules {
        builder.define(index, body)?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::StateType;

    #[test]
    fn test_grammar_builds() {
        let grammar = mysql_grammar().unwrap();
        assert_eq!(grammar.name, GRAMMAR_NAME);
        assert_eq!(grammar.rule_names.len(), RULE_NAMES.len());
        assert_eq!(grammar.atn.max_token_type, INVALID_INPUT);
    }

    #[test]
    fn test_rule_constants_match_names() {
        let grammar = mysql_grammar().unwrap();
        assert_eq!(grammar.rule_index("columnRef"), Some(RULE_COLUMN_REF));
        assert_eq!(grammar.rule_index("query"), Some(RULE_QUERY));
        assert_eq!(grammar.rule_name(RULE_IDENTIFIER_KEYWORD), "identifierKeyword");
    }

    #[test]
    fn test_every_rule_has_start_and_stop() {
        let grammar = mysql_grammar().unwrap();
        for rule in 0..grammar.atn.rule_count() {
            let start = grammar.atn.start_state(rule).unwrap();
            let stop = grammar.atn.stop_state(rule).unwrap();
            assert_eq!(grammar.atn.state(start).state_type, StateType::RuleStart);
            assert_eq!(grammar.atn.state(stop).state_type, StateType::RuleStop);
            assert!(grammar.atn.state(stop).transitions.is_empty());
        }
    }
}
