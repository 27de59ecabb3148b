//! Custom prompt implementation for mysqlsh

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use crate::parser::mysql::{ServerVersion, SqlMode};

/// Prompt showing the default schema, server version and SQL mode
pub struct SqlPrompt {
    schema: Option<String>,
    server_version: ServerVersion,
    sql_mode: SqlMode,
}

impl SqlPrompt {
    /// Create a new prompt
    ///
    /// # Arguments
    /// * `schema` - Default schema, if any
    /// * `server_version` - Version the grammar is checked against
    /// * `sql_mode` - Session SQL mode, shown on the right when set
    pub fn new(schema: Option<String>, server_version: ServerVersion, sql_mode: SqlMode) -> Self {
        Self {
            schema,
            server_version,
            sql_mode,
        }
    }
}

impl Prompt for SqlPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let schema = self.schema.as_deref().unwrap_or("(none)");
        format!("mysql {} {}> ", self.server_version, schema).into()
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        if self.sql_mode.is_empty() {
            "".into()
        } else {
            format!("[{}]", self.sql_mode).into()
        }
    }

    /// Empty since the left prompt carries the indicator
    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "    -> ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_with_schema() {
        let prompt = SqlPrompt::new(
            Some("sakila".to_string()),
            ServerVersion::new(8, 0, 33),
            SqlMode::empty(),
        );
        assert_eq!(prompt.render_prompt_left(), "mysql 8.0.33 sakila> ");
    }

    #[test]
    fn test_prompt_without_schema() {
        let prompt = SqlPrompt::new(None, ServerVersion::new(5, 7, 44), SqlMode::empty());
        assert_eq!(prompt.render_prompt_left(), "mysql 5.7.44 (none)> ");
    }

    #[test]
    fn test_right_prompt_shows_sql_mode() {
        let prompt = SqlPrompt::new(None, ServerVersion::default(), SqlMode::empty());
        assert_eq!(prompt.render_prompt_right(), "");

        let prompt = SqlPrompt::new(None, ServerVersion::default(), SqlMode::ANSI_QUOTES);
        assert_eq!(prompt.render_prompt_right(), "[ANSI_QUOTES]");
    }

    #[test]
    fn test_indicator_empty() {
        let prompt = SqlPrompt::new(None, ServerVersion::default(), SqlMode::empty());
        assert_eq!(prompt.render_prompt_indicator(PromptEditMode::Default), "");
    }

    #[test]
    fn test_multiline_indicator() {
        let prompt = SqlPrompt::new(None, ServerVersion::default(), SqlMode::empty());
        assert_eq!(prompt.render_prompt_multiline_indicator(), "    -> ");
    }
}
