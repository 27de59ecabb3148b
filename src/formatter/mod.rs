//! Output formatting for completion results
//!
//! This module renders what the completion engine produces:
//! - Table formatting, one row per suggestion kind
//! - JSON formatting (pretty printed, optionally colored)
//! - Plain formatting, one suggestion per line

mod json;
mod table;

pub use json::JsonFormatter;
pub use table::{TableFormatter, TableStyle};

use crate::config::{DisplayConfig, OutputFormat};
use crate::error::Result;
use crate::repl::completion::{CompletionResult, RawCandidates};

/// Main formatter for completion output
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Enable colored output
    use_colors: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            use_colors,
        }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.format, config.color_output)
    }

    /// Format suggestions according to the configured format
    pub fn format_result(&self, result: &CompletionResult) -> Result<String> {
        match self.format_type {
            OutputFormat::Table => Ok(TableFormatter::with_colors(self.use_colors).format_result(result)),
            OutputFormat::Json => self.json().format(result),
            OutputFormat::Plain => Ok(result
                .suggestions
                .iter()
                .map(|pair| pair.replacement.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format raw grammar candidates according to the configured format
    pub fn format_candidates(&self, candidates: &RawCandidates) -> Result<String> {
        match self.format_type {
            OutputFormat::Table => {
                Ok(TableFormatter::with_colors(self.use_colors).format_candidates(candidates))
            }
            OutputFormat::Json => self.json().format(candidates),
            OutputFormat::Plain => {
                let tokens = candidates.tokens.iter().map(|(token, following)| {
                    std::iter::once(token.as_str())
                        .chain(following.iter().map(String::as_str))
                        .collect::<Vec<_>>()
                        .join(" ")
                });
                let rules = candidates
                    .rules
                    .iter()
                    .map(|(rule, path)| format!("{} <- {}", rule, path.join(" > ")));
                Ok(tokens.chain(rules).collect::<Vec<_>>().join("\n"))
            }
        }
    }

    fn json(&self) -> JsonFormatter {
        JsonFormatter::new(true, self.use_colors, 2)
    }

    /// Set output format
    pub fn set_format(&mut self, format_type: OutputFormat) {
        self.format_type = format_type;
    }

    /// Enable or disable colors
    pub fn set_colors(&mut self, enabled: bool) {
        self.use_colors = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::completion::{CompletionPair, SuggestionKind};
    use std::collections::BTreeMap;

    fn sample_result() -> CompletionResult {
        CompletionResult {
            replace_start: 20,
            prefix: "WH".to_string(),
            suggestions: vec![CompletionPair {
                display: "WHERE".to_string(),
                replacement: "WHERE".to_string(),
                kind: SuggestionKind::Keyword,
            }],
        }
    }

    fn sample_candidates() -> RawCandidates {
        let mut tokens = BTreeMap::new();
        tokens.insert("GROUP".to_string(), vec!["BY".to_string()]);
        tokens.insert("WHERE".to_string(), Vec::new());
        let mut rules = BTreeMap::new();
        rules.insert("schemaRef".to_string(), vec!["useCommand".to_string()]);
        RawCandidates {
            caret_token_index: 3,
            tokens,
            rules,
        }
    }

    #[test]
    fn test_plain_result() {
        let formatter = Formatter::new(OutputFormat::Plain, false);
        assert_eq!(formatter.format_result(&sample_result()).unwrap(), "WHERE");
    }

    #[test]
    fn test_plain_candidates() {
        let formatter = Formatter::new(OutputFormat::Plain, false);
        let output = formatter.format_candidates(&sample_candidates()).unwrap();
        assert_eq!(output, "GROUP BY\nWHERE\nschemaRef <- useCommand");
    }

    #[test]
    fn test_json_result() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_result(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["prefix"], "WH");
        assert_eq!(value["suggestions"][0]["kind"], "keyword");
    }

    #[test]
    fn test_set_format() {
        let mut formatter = Formatter::from_config(&DisplayConfig::default());
        assert!(formatter.format_result(&sample_result()).unwrap().contains("keyword"));

        formatter.set_format(OutputFormat::Plain);
        formatter.set_colors(false);
        assert_eq!(formatter.format_result(&sample_result()).unwrap(), "WHERE");
    }
}
