//! End-to-end completion tests against a small sakila/world catalog

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{CompletionEngine, CompletionResult, StaticCatalog, SuggestionKind};
use crate::config::{CatalogConfig, CompletionConfig, SchemaConfig, TableConfig};
use crate::error::{CompletionError, ShellError};
use crate::parser::mysql::{ServerVersion, SqlMode};
use crate::repl::SharedState;

fn table(name: &str, columns: &[&str]) -> TableConfig {
    TableConfig {
        name: name.to_string(),
        columns: columns.iter().map(|column| column.to_string()).collect(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn catalog() -> CatalogConfig {
    CatalogConfig {
        schemas: vec![
            SchemaConfig {
                name: "sakila".to_string(),
                tables: vec![
                    table("actor", &["actor_id", "first_name", "last_name", "last_update"]),
                    table("film", &["film_id", "title", "description", "release_year"]),
                    table("film_actor", &["actor_id", "film_id", "last_update"]),
                    table("payment", &["payment_id", "customer_id", "amount"]),
                ],
                views: vec![table("actor_info", &["actor_id", "first_name", "film_info"])],
                functions: strings(&["get_customer_balance", "inventory_in_stock"]),
                procedures: strings(&["film_in_stock", "rewards_report"]),
            },
            SchemaConfig {
                name: "world".to_string(),
                tables: vec![
                    table("city", &["ID", "Name", "CountryCode", "Population"]),
                    table("country", &["Code", "Name", "Continent"]),
                ],
                ..Default::default()
            },
        ],
        users: strings(&["root@localhost", "app@%"]),
    }
}

fn options() -> CompletionConfig {
    CompletionConfig {
        max_suggestions: 500,
        ..CompletionConfig::default()
    }
}

fn engine_with(version: ServerVersion, mode: SqlMode) -> CompletionEngine {
    let state = SharedState::with_config(
        Some("sakila".to_string()),
        version,
        mode,
        &Default::default(),
    );
    CompletionEngine::new(Arc::new(StaticCatalog::new(catalog())), state, options())
}

fn engine() -> CompletionEngine {
    engine_with(ServerVersion::default(), SqlMode::empty())
}

/// Complete at the `|` marker
fn complete_at(engine: &CompletionEngine, marked: &str) -> CompletionResult {
    let cursor = marked.find('|').unwrap();
    let sql = marked.replacen('|', "", 1);
    engine.complete(&sql, cursor).unwrap()
}

fn of_kind(result: &CompletionResult, kind: SuggestionKind) -> BTreeSet<String> {
    result
        .suggestions
        .iter()
        .filter(|pair| pair.kind == kind)
        .map(|pair| pair.display.clone())
        .collect()
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn keywords(result: &CompletionResult) -> BTreeSet<String> {
    of_kind(result, SuggestionKind::Keyword)
}

#[test]
fn test_columns_of_table_after_caret() {
    let result = complete_at(&engine(), "SELECT | FROM actor");

    assert_eq!(
        of_kind(&result, SuggestionKind::Column),
        set(&["actor_id", "first_name", "last_name", "last_update"])
    );
    assert_eq!(of_kind(&result, SuggestionKind::Alias), set(&["actor"]));
    assert!(keywords(&result).contains("DISTINCT"));
    assert_eq!(result.suggestions[0].kind, SuggestionKind::Column);
    assert_eq!(result.replace_start, 7);
}

#[test]
fn test_qualified_columns_use_alias() {
    let result = complete_at(&engine(), "SELECT a.| FROM actor a JOIN film f");

    assert_eq!(
        of_kind(&result, SuggestionKind::Column),
        set(&["actor_id", "first_name", "last_name", "last_update"])
    );
    assert!(result
        .suggestions
        .iter()
        .all(|pair| pair.kind == SuggestionKind::Column));
}

#[test]
fn test_schema_qualified_table() {
    let result = complete_at(&engine(), "SELECT * FROM sakila.|");

    assert_eq!(
        of_kind(&result, SuggestionKind::Table),
        set(&["actor", "film", "film_actor", "payment"])
    );
    assert_eq!(of_kind(&result, SuggestionKind::View), set(&["actor_info"]));
    assert!(of_kind(&result, SuggestionKind::Schema).is_empty());
}

#[test]
fn test_tables_of_other_schema() {
    let result = complete_at(&engine(), "SELECT * FROM world.c|");

    assert_eq!(of_kind(&result, SuggestionKind::Table), set(&["city", "country"]));
    assert_eq!(result.prefix, "c");
    assert_eq!(result.replace_start, 20);
}

#[test]
fn test_table_prefix() {
    let result = complete_at(&engine(), "SELECT * FROM act|");

    assert_eq!(result.suggestions[0].display, "actor");
    assert_eq!(result.suggestions[0].kind, SuggestionKind::Table);
    assert_eq!(of_kind(&result, SuggestionKind::View), set(&["actor_info"]));
    assert_eq!(result.replace_start, 14);
}

#[test]
fn test_use_suggests_schemas() {
    let result = complete_at(&engine(), "USE |");

    assert_eq!(of_kind(&result, SuggestionKind::Schema), set(&["sakila", "world"]));
    assert!(keywords(&result).is_empty());
}

#[test]
fn test_system_variables() {
    let result = complete_at(&engine(), "SELECT @@|");

    assert!(!result.suggestions.is_empty());
    assert!(result
        .suggestions
        .iter()
        .all(|pair| pair.kind == SuggestionKind::SystemVariable));
    assert!(of_kind(&result, SuggestionKind::SystemVariable).contains("autocommit"));

    let result = complete_at(&engine(), "SELECT @@session.sql|");
    assert_eq!(
        of_kind(&result, SuggestionKind::SystemVariable),
        set(&["sql_mode", "sql_safe_updates", "sql_select_limit"])
    );
}

#[test]
fn test_user_variables_come_from_input() {
    let result = complete_at(&engine(), "SET @total = 1; SELECT @|");

    assert_eq!(of_kind(&result, SuggestionKind::UserVariable), set(&["total"]));
}

#[test]
fn test_leave_suggests_enclosing_label() {
    let result = complete_at(&engine(), "outer_loop: BEGIN LEAVE |");

    assert_eq!(of_kind(&result, SuggestionKind::Label), set(&["outer_loop"]));
}

#[test]
fn test_keywords_after_table() {
    let result = complete_at(&engine(), "SELECT * FROM actor |");
    let keywords = keywords(&result);

    for expected in ["WHERE", "ORDER BY", "GROUP BY", "JOIN", "INNER JOIN", "LIMIT", "AS"] {
        assert!(keywords.contains(expected), "missing {expected}");
    }
    assert!(of_kind(&result, SuggestionKind::Table).is_empty());
    assert!(of_kind(&result, SuggestionKind::Schema).is_empty());
}

#[test]
fn test_keywords_never_include_ignored_tokens() {
    let engine = engine();
    for marked in ["SELECT * FROM actor |", "SELECT |", "|", "UPDATE actor SET |"] {
        let result = complete_at(&engine, marked);
        assert!(keywords(&result)
            .iter()
            .all(|keyword| keyword.chars().all(|c| c.is_ascii_uppercase() || c == '_' || c == ' ')));

        let sql = marked.replacen('|', "", 1);
        let raw = engine.candidates(&sql, marked.find('|').unwrap()).unwrap();
        for ignored in ["','", "';'", "'('", "'*'", "<EOF>", "IDENTIFIER", "INT_NUMBER"] {
            assert!(!raw.tokens.contains_key(ignored), "{ignored} offered for {marked}");
        }
    }
}

#[test]
fn test_keyword_prefix() {
    let result = complete_at(&engine(), "SELECT * FROM actor WH|");

    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].replacement, "WHERE");
    assert_eq!(result.replace_start, 20);
}

#[test]
fn test_lowercase_keywords() {
    let state = SharedState::new(None);
    let options = CompletionConfig {
        uppercase_keywords: false,
        ..options()
    };
    let engine = CompletionEngine::new(Arc::new(StaticCatalog::new(catalog())), state, options);

    let result = complete_at(&engine, "sel|");
    assert_eq!(keywords(&result), set(&["select"]));
}

#[test]
fn test_statement_start_depends_on_version() {
    let modern = complete_at(&engine(), "|");
    assert!(keywords(&modern).contains("WITH"));
    assert!(keywords(&modern).contains("DELETE FROM"));

    let legacy = complete_at(&engine_with(ServerVersion::new(5, 7, 44), SqlMode::empty()), "|");
    assert!(!keywords(&legacy).contains("WITH"));
    assert!(keywords(&legacy).contains("SELECT"));
}

#[test]
fn test_sql_cache_depends_on_version() {
    let modern = complete_at(&engine(), "SELECT |");
    assert!(!keywords(&modern).contains("SQL_CACHE"));
    assert!(keywords(&modern).contains("SQL_NO_CACHE"));

    let legacy = complete_at(
        &engine_with(ServerVersion::new(5, 7, 44), SqlMode::empty()),
        "SELECT |",
    );
    assert!(keywords(&legacy).contains("SQL_CACHE"));
}

#[test]
fn test_version_switch_invalidates_cache() {
    let engine = engine();
    assert!(keywords(&complete_at(&engine, "|")).contains("WITH"));

    engine.state().set_server_version(ServerVersion::new(5, 7, 44));
    assert!(!keywords(&complete_at(&engine, "|")).contains("WITH"));

    engine.state().set_server_version(ServerVersion::default());
    assert!(keywords(&complete_at(&engine, "|")).contains("WITH"));
}

#[test]
fn test_ansi_quotes_change_double_quoted_meaning() {
    let sql = "SELECT * FROM \"actor\" |";

    let plain = complete_at(&engine(), sql);
    assert!(plain.suggestions.is_empty());

    let ansi = complete_at(&engine_with(ServerVersion::default(), SqlMode::ANSI_QUOTES), sql);
    assert!(keywords(&ansi).contains("WHERE"));
}

#[test]
fn test_columns_scoped_to_current_statement() {
    let result = complete_at(&engine(), "SELECT * FROM film; SELECT | FROM actor");

    let columns = of_kind(&result, SuggestionKind::Column);
    assert!(columns.contains("first_name"));
    assert!(!columns.contains("title"));
}

#[test]
fn test_columns_without_references_use_default_schema() {
    let result = complete_at(&engine(), "SELECT tit|");

    assert_eq!(of_kind(&result, SuggestionKind::Column), set(&["title"]));
}

#[test]
fn test_insert_column_list() {
    let result = complete_at(&engine(), "INSERT INTO payment (|");

    assert_eq!(
        of_kind(&result, SuggestionKind::Column),
        set(&["payment_id", "customer_id", "amount"])
    );
}

#[test]
fn test_update_set_columns() {
    let result = complete_at(&engine(), "UPDATE film SET rel|");

    assert_eq!(of_kind(&result, SuggestionKind::Column), set(&["release_year"]));
}

#[test]
fn test_collations_follow_charset() {
    let result = complete_at(&engine(), "SET NAMES utf8mb4 COLLATE |");
    let collations = of_kind(&result, SuggestionKind::Collation);

    assert!(collations.contains("utf8mb4_0900_ai_ci"));
    assert!(collations.iter().all(|name| name.starts_with("utf8mb4_")));
}

#[test]
fn test_charsets_after_set_names() {
    let result = complete_at(&engine(), "SET NAMES utf8|");

    assert_eq!(
        of_kind(&result, SuggestionKind::Charset),
        set(&["utf8mb3", "utf8mb4"])
    );
}

#[test]
fn test_set_offers_system_variables_without_sigil() {
    let result = complete_at(&engine(), "SET GLOBAL max_c|");

    assert_eq!(
        of_kind(&result, SuggestionKind::SystemVariable),
        set(&["max_connections"])
    );
}

#[test]
fn test_drop_user_suggests_accounts() {
    let result = complete_at(&engine(), "DROP USER |");

    assert_eq!(
        of_kind(&result, SuggestionKind::User),
        set(&["root@localhost", "app@%"])
    );
    assert!(keywords(&result).contains("IF EXISTS"));
}

#[test]
fn test_call_suggests_procedures() {
    let result = complete_at(&engine(), "CALL |");
    assert_eq!(
        of_kind(&result, SuggestionKind::Procedure),
        set(&["film_in_stock", "rewards_report"])
    );
    assert_eq!(of_kind(&result, SuggestionKind::Schema), set(&["sakila", "world"]));

    let result = complete_at(&engine(), "CALL world.|");
    assert!(result.suggestions.is_empty());
}

#[test]
fn test_functions_in_expressions() {
    let result = complete_at(&engine(), "SELECT inv|");
    assert_eq!(
        of_kind(&result, SuggestionKind::Function),
        set(&["inventory_in_stock"])
    );

    let result = complete_at(&engine(), "SELECT COU|");
    assert!(of_kind(&result, SuggestionKind::RuntimeFunction).contains("COUNT"));
}

#[test]
fn test_back_tick_prefix_quotes_replacement() {
    let result = complete_at(&engine(), "SELECT * FROM `act|");

    assert_eq!(result.prefix, "act");
    assert_eq!(result.replace_start, 14);
    assert_eq!(result.suggestions[0].replacement, "`actor`");
    assert!(keywords(&result).is_empty());
}

#[test]
fn test_result_cap() {
    let options = CompletionConfig {
        max_suggestions: 3,
        ..options()
    };
    let engine = CompletionEngine::new(
        Arc::new(StaticCatalog::new(catalog())),
        SharedState::new(Some("sakila".to_string())),
        options,
    );

    assert_eq!(complete_at(&engine, "SELECT |").suggestions.len(), 3);
}

#[test]
fn test_no_duplicates() {
    let result = complete_at(&engine(), "SELECT |");
    let unique: BTreeSet<&String> = result
        .suggestions
        .iter()
        .map(|pair| &pair.replacement)
        .collect();

    assert_eq!(unique.len(), result.suggestions.len());
}

#[test]
fn test_repeated_completion_is_stable() {
    let engine = engine();
    let first = complete_at(&engine, "SELECT a.| FROM actor a");
    let second = complete_at(&engine, "SELECT a.| FROM actor a");

    assert_eq!(first, second);
}

#[test]
fn test_raw_candidates() {
    let raw = engine().candidates("USE ", 4).unwrap();

    assert_eq!(raw.caret_token_index, 2);
    assert_eq!(raw.rules.get("schemaRef"), Some(&strings(&["simpleStatement", "useCommand"])));
    assert!(raw.tokens.is_empty());
}

#[test]
fn test_cursor_out_of_range() {
    let result = engine().complete("SELECT", 100);

    assert!(matches!(
        result,
        Err(ShellError::Completion(CompletionError::CursorOutOfRange {
            cursor: 100,
            length: 6
        }))
    ));
}

#[test]
fn test_cursor_inside_character() {
    let result = engine().complete("SELECT 'é'", 9);

    assert!(matches!(
        result,
        Err(ShellError::Completion(CompletionError::CursorNotOnCharBoundary(9)))
    ));
}

#[test]
fn test_candidates_survive_follow_set_rebuild() {
    let engine = engine();
    let sql = "SELECT a.first_name FROM actor a WHERE ";
    let before = engine.candidates(sql, sql.len()).unwrap();
    assert!(!before.rules.is_empty());

    engine.state().set_sql_mode(SqlMode::ANSI_QUOTES);
    engine.state().set_sql_mode(SqlMode::empty());
    assert_eq!(engine.state().follow_sets().generation(), 2);

    assert_eq!(engine.candidates(sql, sql.len()).unwrap(), before);
}
