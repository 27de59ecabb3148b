//! Object-name sources for completion suggestions
//!
//! Schema objects come from a [`MetadataProvider`]; runtime functions,
//! system variables, character sets and collations are built in.

use std::cmp::Ordering;

use crate::config::{CatalogConfig, SchemaConfig, TableConfig};
use crate::parser::mysql::ServerVersion;

/// Trait for fetching schema object names
pub trait MetadataProvider: Send + Sync {
    /// All schema names
    fn schemas(&self) -> Vec<String>;

    /// Base tables of a schema
    fn tables(&self, schema: &str) -> Vec<String>;

    /// Views of a schema
    fn views(&self, schema: &str) -> Vec<String>;

    /// Columns of a table or view
    fn columns(&self, schema: &str, table: &str) -> Vec<String>;

    /// Stored functions of a schema
    fn functions(&self, schema: &str) -> Vec<String>;

    /// Stored procedures of a schema
    fn procedures(&self, schema: &str) -> Vec<String>;

    /// Accounts as `name@host`
    fn users(&self) -> Vec<String>;
}

/// Provider backed by the `[catalog]` configuration section
///
/// Name lookups ignore ASCII case.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalog: CatalogConfig,
}

impl StaticCatalog {
    pub fn new(catalog: CatalogConfig) -> Self {
        Self { catalog }
    }

    fn schema(&self, name: &str) -> Option<&SchemaConfig> {
        self.catalog
            .schemas
            .iter()
            .find(|schema| schema.name.eq_ignore_ascii_case(name))
    }

    fn relation(&self, schema: &str, name: &str) -> Option<&TableConfig> {
        self.schema(schema).and_then(|schema| {
            schema
                .tables
                .iter()
                .chain(&schema.views)
                .find(|table| table.name.eq_ignore_ascii_case(name))
        })
    }
}

fn names(tables: &[TableConfig]) -> Vec<String> {
    tables.iter().map(|table| table.name.clone()).collect()
}

impl MetadataProvider for StaticCatalog {
    fn schemas(&self) -> Vec<String> {
        self.catalog
            .schemas
            .iter()
            .map(|schema| schema.name.clone())
            .collect()
    }

    fn tables(&self, schema: &str) -> Vec<String> {
        self.schema(schema)
            .map(|schema| names(&schema.tables))
            .unwrap_or_default()
    }

    fn views(&self, schema: &str) -> Vec<String> {
        self.schema(schema)
            .map(|schema| names(&schema.views))
            .unwrap_or_default()
    }

    fn columns(&self, schema: &str, table: &str) -> Vec<String> {
        self.relation(schema, table)
            .map(|table| table.columns.clone())
            .unwrap_or_default()
    }

    fn functions(&self, schema: &str) -> Vec<String> {
        self.schema(schema)
            .map(|schema| schema.functions.clone())
            .unwrap_or_default()
    }

    fn procedures(&self, schema: &str) -> Vec<String> {
        self.schema(schema)
            .map(|schema| schema.procedures.clone())
            .unwrap_or_default()
    }

    fn users(&self) -> Vec<String> {
        self.catalog.users.clone()
    }
}

const RUNTIME_FUNCTIONS: &[&str] = &[
    "ABS", "ASCII", "AVG", "BIT_LENGTH", "CAST", "CEIL", "CEILING", "CHAR_LENGTH", "COALESCE",
    "CONCAT", "CONCAT_WS", "CONVERT", "COUNT", "CURDATE", "CURRENT_DATE", "CURRENT_TIME",
    "CURRENT_TIMESTAMP", "CURRENT_USER", "CURTIME", "DATABASE", "DATE", "DATE_ADD",
    "DATE_FORMAT", "DATE_SUB", "DATEDIFF", "DAY", "DAYNAME", "DAYOFWEEK", "EXP", "FLOOR",
    "FORMAT", "FOUND_ROWS", "FROM_UNIXTIME", "GREATEST", "GROUP_CONCAT", "HEX", "HOUR",
    "IFNULL", "INSTR", "JSON_ARRAY", "JSON_CONTAINS", "JSON_EXTRACT", "JSON_OBJECT",
    "JSON_UNQUOTE", "LAST_INSERT_ID", "LCASE", "LEAST", "LENGTH", "LN", "LOCATE", "LOG",
    "LOWER", "LPAD", "LTRIM", "MAX", "MD5", "MIN", "MINUTE", "MOD", "MONTH", "MONTHNAME", "NOW",
    "NULLIF", "PI", "POSITION", "POW", "POWER", "QUARTER", "RAND", "REPEAT", "REPLACE",
    "REVERSE", "ROUND", "ROW_COUNT", "RPAD", "RTRIM", "SECOND", "SHA1", "SHA2", "SIGN", "SLEEP",
    "SPACE", "SQRT", "STR_TO_DATE", "STRCMP", "SUBSTR", "SUBSTRING", "SUBSTRING_INDEX", "SUM",
    "SYSDATE", "TIME", "TIME_FORMAT", "TIMEDIFF", "TIMESTAMP", "TIMESTAMPDIFF", "TO_DAYS",
    "TRIM", "TRUNCATE", "UCASE", "UNHEX", "UNIX_TIMESTAMP", "UPPER", "USER", "UTC_DATE",
    "UTC_TIMESTAMP", "UUID", "VERSION", "WEEK", "WEEKDAY", "YEAR",
];

const SYSTEM_VARIABLES: &[&str] = &[
    "auto_increment_increment",
    "auto_increment_offset",
    "autocommit",
    "character_set_client",
    "character_set_connection",
    "character_set_database",
    "character_set_results",
    "character_set_server",
    "collation_connection",
    "collation_database",
    "collation_server",
    "datadir",
    "default_storage_engine",
    "explicit_defaults_for_timestamp",
    "foreign_key_checks",
    "group_concat_max_len",
    "hostname",
    "innodb_buffer_pool_size",
    "innodb_lock_wait_timeout",
    "interactive_timeout",
    "lock_wait_timeout",
    "long_query_time",
    "max_allowed_packet",
    "max_connections",
    "max_execution_time",
    "net_read_timeout",
    "net_write_timeout",
    "port",
    "read_only",
    "server_id",
    "slow_query_log",
    "sort_buffer_size",
    "sql_mode",
    "sql_safe_updates",
    "sql_select_limit",
    "time_zone",
    "transaction_isolation",
    "unique_checks",
    "version",
    "version_comment",
    "wait_timeout",
];

const CHARSETS: &[&str] = &[
    "armscii8", "ascii", "big5", "binary", "cp1250", "cp1251", "cp1256", "cp1257", "cp850",
    "cp852", "cp866", "cp932", "dec8", "eucjpms", "euckr", "gb18030", "gb2312", "gbk", "geostd8",
    "greek", "hebrew", "hp8", "keybcs2", "koi8r", "koi8u", "latin1", "latin2", "latin5",
    "latin7", "macce", "macroman", "sjis", "swe7", "tis620", "ucs2", "ujis", "utf16", "utf16le",
    "utf32", "utf8mb3", "utf8mb4",
];

const COLLATIONS: &[&str] = &[
    "ascii_bin",
    "ascii_general_ci",
    "binary",
    "gbk_bin",
    "gbk_chinese_ci",
    "latin1_bin",
    "latin1_general_ci",
    "latin1_swedish_ci",
    "sjis_japanese_ci",
    "ucs2_general_ci",
    "utf16_general_ci",
    "utf32_general_ci",
    "utf8mb3_bin",
    "utf8mb3_general_ci",
    "utf8mb3_unicode_ci",
    "utf8mb4_0900_ai_ci",
    "utf8mb4_0900_as_cs",
    "utf8mb4_0900_bin",
    "utf8mb4_bin",
    "utf8mb4_general_ci",
    "utf8mb4_unicode_ci",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Built-in function names
pub fn runtime_functions() -> Vec<String> {
    owned(RUNTIME_FUNCTIONS)
}

/// Well-known server variables
pub fn system_variables() -> Vec<String> {
    owned(SYSTEM_VARIABLES)
}

pub fn charsets() -> Vec<String> {
    owned(CHARSETS)
}

/// Collations known to `version`, optionally limited to one character set
pub fn collations(version: ServerVersion, charset: Option<&str>) -> Vec<String> {
    COLLATIONS
        .iter()
        .filter(|name| version.0 >= 80000 || !name.contains("_0900_"))
        .filter(|name| {
            charset.is_none_or(|charset| {
                name.strip_prefix(charset)
                    .is_some_and(|rest| rest.starts_with('_'))
            })
        })
        .map(|name| name.to_string())
        .collect()
}

/// Filter a list of strings by prefix and sort intelligently
///
/// Matching ignores case. Exact matches come first, then shorter names,
/// then alphabetical order.
pub fn filter_by_prefix(items: &[String], prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    let mut filtered: Vec<String> = if prefix.is_empty() {
        items.to_vec()
    } else {
        items
            .iter()
            .filter(|item| item.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    };

    filtered.sort_by(|a, b| {
        if !prefix.is_empty() {
            let a_exact = a.to_lowercase() == prefix;
            let b_exact = b.to_lowercase() == prefix;
            if a_exact && !b_exact {
                return Ordering::Less;
            }
            if !a_exact && b_exact {
                return Ordering::Greater;
            }
        }

        let len_cmp = a.len().cmp(&b.len());
        if len_cmp != Ordering::Equal {
            return len_cmp;
        }

        a.cmp(b)
    });
    filtered.dedup();

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> StaticCatalog {
        StaticCatalog::new(CatalogConfig {
            schemas: vec![SchemaConfig {
                name: "sakila".to_string(),
                tables: vec![TableConfig {
                    name: "actor".to_string(),
                    columns: vec!["actor_id".to_string(), "first_name".to_string()],
                }],
                views: vec![TableConfig {
                    name: "actor_info".to_string(),
                    columns: vec!["film_info".to_string()],
                }],
                functions: vec!["inventory_in_stock".to_string()],
                procedures: vec!["rewards_report".to_string()],
            }],
            users: vec!["root@localhost".to_string()],
        })
    }

    #[test]
    fn test_catalog_lookups() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.schemas(), vec!["sakila"]);
        assert_eq!(catalog.tables("SAKILA"), vec!["actor"]);
        assert_eq!(catalog.views("sakila"), vec!["actor_info"]);
        assert_eq!(catalog.columns("sakila", "Actor").len(), 2);
        assert_eq!(catalog.columns("sakila", "actor_info"), vec!["film_info"]);
        assert_eq!(catalog.procedures("sakila"), vec!["rewards_report"]);
        assert_eq!(catalog.users(), vec!["root@localhost"]);
    }

    #[test]
    fn test_unknown_schema_is_empty() {
        let catalog = create_test_catalog();
        assert!(catalog.tables("world").is_empty());
        assert!(catalog.columns("sakila", "film").is_empty());
        assert!(catalog.functions("world").is_empty());
    }

    #[test]
    fn test_filter_by_prefix_ignores_case() {
        let items = owned(&["actor", "Address", "category"]);
        assert_eq!(filter_by_prefix(&items, "A"), vec!["actor", "Address"]);
        assert_eq!(filter_by_prefix(&items, "cat"), vec!["category"]);
    }

    #[test]
    fn test_filter_by_prefix_ordering() {
        let items = owned(&["film_text", "film", "film_actor", "film_category"]);
        let filtered = filter_by_prefix(&items, "film");
        assert_eq!(filtered[0], "film");
        assert_eq!(filtered[1], "film_text");
        assert_eq!(filtered[2], "film_actor");
    }

    #[test]
    fn test_filter_empty_prefix_keeps_all() {
        let items = owned(&["b", "a", "a"]);
        assert_eq!(filter_by_prefix(&items, ""), vec!["a", "b"]);
    }

    #[test]
    fn test_collations_follow_version_and_charset() {
        let modern = collations(ServerVersion(80033), Some("utf8mb4"));
        assert!(modern.contains(&"utf8mb4_0900_ai_ci".to_string()));
        assert!(modern.iter().all(|name| name.starts_with("utf8mb4_")));

        let legacy = collations(ServerVersion(50744), None);
        assert!(!legacy.iter().any(|name| name.contains("_0900_")));
        assert!(legacy.contains(&"latin1_swedish_ci".to_string()));
    }

    #[test]
    fn test_builtin_lists() {
        assert!(runtime_functions().contains(&"CONCAT".to_string()));
        assert!(system_variables().contains(&"autocommit".to_string()));
        assert!(charsets().contains(&"utf8mb4".to_string()));
    }
}
