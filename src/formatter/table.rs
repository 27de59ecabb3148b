//! Table formatting for completion results using tabled
//!
//! Suggestions are grouped one row per kind, in display order. Raw
//! candidates get one row per token or rule candidate.

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::repl::completion::{CompletionResult, RawCandidates, SuggestionKind};

/// Maximum width for the suggestion column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 72;

/// Table formatter for completion output
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyle,

    /// Enable colored output
    use_colors: bool,
}

/// Available table styles
#[derive(Debug, Clone, Copy)]
pub enum TableStyle {
    /// Modern style with box drawing characters
    Modern,
    /// ASCII style with basic characters
    Ascii,
    /// Markdown style
    Markdown,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self::with_colors(false)
    }

    /// Create a new table formatter with color support
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::Modern,
            use_colors,
        }
    }

    /// Set the table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum width of the wide column
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// Format suggestions, one row per kind
    pub fn format_result(&self, result: &CompletionResult) -> String {
        if result.suggestions.is_empty() {
            return "(no suggestions)".to_string();
        }

        let mut rows: Vec<(SuggestionKind, Vec<&str>)> = Vec::new();
        for pair in &result.suggestions {
            match rows.last_mut() {
                Some((kind, names)) if *kind == pair.kind => names.push(&pair.display),
                _ => rows.push((pair.kind, vec![&pair.display])),
            }
        }

        let mut builder = Builder::default();
        builder.push_record(["Kind", "Count", "Suggestions"]);
        for (kind, names) in rows {
            builder.push_record([
                kind.label().to_string(),
                names.len().to_string(),
                names.join(", "),
            ]);
        }

        let table = self.finish(builder.build(), 2);
        format!(
            "{}\nprefix: '{}', replace from byte {}",
            table, result.prefix, result.replace_start
        )
    }

    /// Format raw candidates, tokens first
    pub fn format_candidates(&self, candidates: &RawCandidates) -> String {
        if candidates.tokens.is_empty() && candidates.rules.is_empty() {
            return "(no candidates)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["Type", "Candidate", "Following / Rule path"]);
        for (token, following) in &candidates.tokens {
            builder.push_record(["token".to_string(), token.clone(), following.join(" ")]);
        }
        for (rule, path) in &candidates.rules {
            builder.push_record(["rule".to_string(), rule.clone(), path.join(" > ")]);
        }

        let table = self.finish(builder.build(), 2);
        format!("{}\ncaret token: {}", table, candidates.caret_token_index)
    }

    /// Style the table and wrap its wide column
    fn finish(&self, mut table: Table, wide_column: usize) -> String {
        self.apply_style(&mut table);
        table.with(
            Modify::new(Columns::new(wide_column..=wide_column))
                .with(Width::wrap(self.max_column_width)),
        );
        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        table.to_string()
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Markdown => table.with(Style::markdown()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::completion::CompletionPair;
    use std::collections::BTreeMap;

    fn pair(display: &str, kind: SuggestionKind) -> CompletionPair {
        CompletionPair {
            display: display.to_string(),
            replacement: display.to_string(),
            kind,
        }
    }

    fn sample_result() -> CompletionResult {
        CompletionResult {
            replace_start: 14,
            prefix: "a".to_string(),
            suggestions: vec![
                pair("actor", SuggestionKind::Table),
                pair("address", SuggestionKind::Table),
                pair("actor_info", SuggestionKind::View),
                pair("AS", SuggestionKind::Keyword),
            ],
        }
    }

    #[test]
    fn test_format_empty_result() {
        let formatter = TableFormatter::new();
        let output = formatter.format_result(&CompletionResult::default());
        assert_eq!(output, "(no suggestions)");
    }

    #[test]
    fn test_rows_grouped_by_kind() {
        let formatter = TableFormatter::new().with_style(TableStyle::Ascii);
        let output = formatter.format_result(&sample_result());

        assert!(output.contains("actor, address"));
        assert!(output.contains("view"));
        assert!(output.contains("keyword"));
        assert!(output.ends_with("prefix: 'a', replace from byte 14"));
        assert_eq!(output.lines().filter(|line| line.contains("table")).count(), 1);
    }

    #[test]
    fn test_markdown_style() {
        let formatter = TableFormatter::new().with_style(TableStyle::Markdown);
        let output = formatter.format_result(&sample_result());
        assert!(output.lines().next().unwrap().starts_with('|'));
    }

    #[test]
    fn test_long_rows_wrap() {
        let formatter = TableFormatter::new().with_max_column_width(10);
        let output = formatter.format_result(&sample_result());
        assert!(!output.contains("actor, address"));
        assert!(output.contains("actor"));
    }

    #[test]
    fn test_format_candidates() {
        let mut tokens = BTreeMap::new();
        tokens.insert("ORDER".to_string(), vec!["BY".to_string()]);
        let mut rules = BTreeMap::new();
        rules.insert(
            "tableRef".to_string(),
            vec!["simpleStatement".to_string(), "selectStatement".to_string()],
        );
        let candidates = RawCandidates {
            caret_token_index: 7,
            tokens,
            rules,
        };

        let output = TableFormatter::new().format_candidates(&candidates);
        assert!(output.contains("ORDER"));
        assert!(output.contains("simpleStatement > selectStatement"));
        assert!(output.ends_with("caret token: 7"));
    }

    #[test]
    fn test_format_empty_candidates() {
        let output = TableFormatter::new().format_candidates(&RawCandidates::default());
        assert_eq!(output, "(no candidates)");
    }
}
