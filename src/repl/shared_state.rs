use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::config::{DisplayConfig, OutputFormat};
use crate::parser::code_completion::FollowSetCache;
use crate::parser::mysql::{GRAMMAR_NAME, ServerVersion, SqlMode};

/// Session settings shared between the REPL, the completer and the engine.
#[derive(Debug, Clone)]
pub struct SharedState {
    /// Schema unqualified names resolve against
    pub default_schema: Arc<RwLock<Option<String>>>,

    /// Server version the grammar predicates check
    pub server_version: Arc<RwLock<ServerVersion>>,

    /// SQL mode used for lexing and predicates
    pub sql_mode: Arc<RwLock<SqlMode>>,

    /// Output format setting
    pub output_format: Arc<RwLock<OutputFormat>>,

    /// Color output setting
    pub color_enabled: Arc<RwLock<bool>>,

    /// Follow sets computed under the current version and mode
    follow_sets: Arc<FollowSetCache>,
}

impl SharedState {
    /// Create a new shared state.
    ///
    /// * `default_schema` - Initial default schema
    pub fn new(default_schema: Option<String>) -> Self {
        Self::with_config(
            default_schema,
            ServerVersion::default(),
            SqlMode::empty(),
            &DisplayConfig::default(),
        )
    }

    /// Create a new shared state with session and display settings.
    pub fn with_config(
        default_schema: Option<String>,
        server_version: ServerVersion,
        sql_mode: SqlMode,
        display_config: &DisplayConfig,
    ) -> Self {
        Self {
            default_schema: Arc::new(RwLock::new(default_schema)),
            server_version: Arc::new(RwLock::new(server_version)),
            sql_mode: Arc::new(RwLock::new(sql_mode)),
            output_format: Arc::new(RwLock::new(display_config.format)),
            color_enabled: Arc::new(RwLock::new(display_config.color_output)),
            follow_sets: Arc::new(FollowSetCache::new()),
        }
    }

    /// Get the default schema.
    pub fn get_schema(&self) -> Option<String> {
        self.default_schema
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set the default schema.
    pub fn set_schema(&self, schema: Option<String>) {
        *self
            .default_schema
            .write()
            .unwrap_or_else(PoisonError::into_inner) = schema;
    }

    /// Get the server version.
    pub fn get_server_version(&self) -> ServerVersion {
        *self
            .server_version
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the server version; cached follow sets depend on it.
    pub fn set_server_version(&self, version: ServerVersion) {
        let mut current = self
            .server_version
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if *current != version {
            *current = version;
            self.invalidate_follow_sets();
        }
    }

    /// Get the SQL mode.
    pub fn get_sql_mode(&self) -> SqlMode {
        *self.sql_mode.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the SQL mode; cached follow sets depend on it.
    pub fn set_sql_mode(&self, mode: SqlMode) {
        let mut current = self.sql_mode.write().unwrap_or_else(PoisonError::into_inner);
        if *current != mode {
            *current = mode;
            self.invalidate_follow_sets();
        }
    }

    /// Get current output format.
    pub fn get_format(&self) -> OutputFormat {
        *self
            .output_format
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Set output format.
    pub fn set_format(&self, format: OutputFormat) {
        *self
            .output_format
            .write()
            .unwrap_or_else(PoisonError::into_inner) = format;
    }

    /// Get current color setting.
    pub fn get_color_enabled(&self) -> bool {
        *self
            .color_enabled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Set color output.
    pub fn set_color_enabled(&self, enabled: bool) {
        *self
            .color_enabled
            .write()
            .unwrap_or_else(PoisonError::into_inner) = enabled;
    }

    /// Follow-set cache shared by every engine built on this state.
    pub fn follow_sets(&self) -> &FollowSetCache {
        &self.follow_sets
    }

    fn invalidate_follow_sets(&self) {
        debug!(grammar = GRAMMAR_NAME, "clearing cached follow sets");
        self.follow_sets.clear(Some(GRAMMAR_NAME));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::code_completion::CodeCompletionCore;
    use crate::parser::mysql::MySqlParser;

    fn warm_cache(state: &SharedState) {
        let parser =
            MySqlParser::from_sql("SELECT ", state.get_server_version(), state.get_sql_mode())
                .unwrap();
        CodeCompletionCore::new(&parser, state.follow_sets()).collect_candidates(1, None);
    }

    #[test]
    fn test_schema_is_shared_between_clones() {
        let state = SharedState::new(None);
        let clone = state.clone();
        clone.set_schema(Some("sakila".to_string()));
        assert_eq!(state.get_schema().as_deref(), Some("sakila"));
    }

    #[test]
    fn test_mode_change_clears_follow_sets() {
        let state = SharedState::new(None);
        warm_cache(&state);
        assert!(state.follow_sets().cached_states(GRAMMAR_NAME) > 0);

        state.set_sql_mode(SqlMode::ANSI_QUOTES);
        assert_eq!(state.follow_sets().cached_states(GRAMMAR_NAME), 0);
        assert_eq!(state.get_sql_mode(), SqlMode::ANSI_QUOTES);
    }

    #[test]
    fn test_same_version_keeps_follow_sets() {
        let state = SharedState::new(None);
        warm_cache(&state);
        let cached = state.follow_sets().cached_states(GRAMMAR_NAME);

        state.set_server_version(ServerVersion::default());
        assert_eq!(state.follow_sets().cached_states(GRAMMAR_NAME), cached);

        state.set_server_version(ServerVersion::new(5, 7, 44));
        assert_eq!(state.follow_sets().cached_states(GRAMMAR_NAME), 0);
    }
}
