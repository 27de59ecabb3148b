//! Hinter for reedline - inline hints from history, then from completion

use std::sync::Arc;

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History};

use super::completion::CompletionEngine;

/// SQL hinter for reedline
pub struct SqlHinter {
    engine: Arc<CompletionEngine>,
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl SqlHinter {
    pub fn new(engine: Arc<CompletionEngine>) -> Self {
        Self {
            engine,
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }

    fn from_history(line: &str, history: &dyn History) -> Option<String> {
        let item = history
            .search(reedline::SearchQuery::last_with_prefix(
                line.to_string(),
                None,
            ))
            .ok()?
            .into_iter()
            .next()?;

        let history_line = item.command_line.as_str();
        (history_line.len() > line.len() && history_line.starts_with(line))
            .then(|| history_line[line.len()..].to_string())
    }

    /// Rest of the top suggestion when a word is being typed
    fn from_completion(&self, line: &str) -> Option<String> {
        let result = self.engine.complete(line, line.len()).ok()?;
        if result.prefix.is_empty() {
            return None;
        }
        let typed = &line[result.replace_start..];
        let top = result.suggestions.first()?;

        let head = top.replacement.get(..typed.len())?;
        (top.replacement.len() > typed.len() && head.eq_ignore_ascii_case(typed))
            .then(|| top.replacement[typed.len()..].to_string())
    }
}

impl Hinter for SqlHinter {
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        // Only hint at the end of a non-empty command line
        if pos != line.len() || line.trim().is_empty() || line.trim_start().starts_with('\\') {
            return String::new();
        }

        let Some(hint) = Self::from_history(line, history).or_else(|| self.from_completion(line))
        else {
            return String::new();
        };
        self.current_hint = hint;

        if use_ansi_coloring {
            self.style.paint(&self.current_hint).to_string()
        } else {
            self.current_hint.clone()
        }
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }

    /// Hint text up to the next word boundary
    fn next_hint_token(&self) -> String {
        let hint = self.current_hint.as_str();
        let leading = hint.len() - hint.trim_start().len();
        let end = hint[leading..]
            .find(char::is_whitespace)
            .map_or(hint.len(), |index| leading + index);
        hint[..end].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, CompletionConfig, SchemaConfig, TableConfig};
    use crate::repl::SharedState;
    use crate::repl::completion::StaticCatalog;
    use reedline::FileBackedHistory;

    fn create_test_hinter() -> SqlHinter {
        let catalog = CatalogConfig {
            schemas: vec![SchemaConfig {
                name: "sakila".to_string(),
                tables: vec![TableConfig {
                    name: "actor".to_string(),
                    columns: vec!["actor_id".to_string()],
                }],
                ..Default::default()
            }],
            users: Vec::new(),
        };
        let engine = CompletionEngine::new(
            Arc::new(StaticCatalog::new(catalog)),
            SharedState::new(Some("sakila".to_string())),
            CompletionConfig::default(),
        );
        SqlHinter::new(Arc::new(engine))
    }

    fn create_test_history() -> Box<dyn History> {
        Box::new(FileBackedHistory::new(100).unwrap())
    }

    #[test]
    fn test_empty_line_no_hint() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        assert_eq!(hinter.handle("", 0, history.as_ref(), false, "/tmp"), "");
    }

    #[test]
    fn test_cursor_not_at_end_no_hint() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        assert_eq!(hinter.handle("SELECT * FROM act", 3, history.as_ref(), false, "/tmp"), "");
    }

    #[test]
    fn test_completion_hint() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        let hint = hinter.handle("SELECT * FROM act", 17, history.as_ref(), false, "/tmp");
        assert_eq!(hint, "or");
        assert_eq!(hinter.complete_hint(), "or");
    }

    #[test]
    fn test_no_hint_without_word() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        assert_eq!(hinter.handle("SELECT * FROM ", 14, history.as_ref(), false, "/tmp"), "");
    }

    #[test]
    fn test_next_hint_token() {
        let mut hinter = create_test_hinter();
        hinter.current_hint = "ER BY title".to_string();
        assert_eq!(hinter.next_hint_token(), "ER");
    }
}
