//! Completer for reedline - provides completion suggestions

use std::sync::Arc;

use reedline::{Completer, Span, Suggestion};
use tracing::warn;

use super::completion::CompletionEngine;

/// SQL completer for reedline
pub struct SqlCompleter {
    /// Completion engine for intelligent suggestions
    completion_engine: Arc<CompletionEngine>,
}

impl SqlCompleter {
    /// Create a new SQL completer
    ///
    /// # Arguments
    /// * `completion_engine` - Engine shared with the hinter
    pub fn new(completion_engine: Arc<CompletionEngine>) -> Self {
        Self { completion_engine }
    }
}

impl Completer for SqlCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if line.trim_start().starts_with('\\') {
            return Vec::new();
        }

        let result = match self.completion_engine.complete(line, pos) {
            Ok(result) => result,
            Err(e) => {
                warn!("completion failed: {}", e);
                return Vec::new();
            }
        };

        result
            .suggestions
            .into_iter()
            .map(|pair| Suggestion {
                value: pair.replacement,
                description: Some(pair.kind.to_string()),
                span: Span::new(result.replace_start, pos),
                append_whitespace: true,
                ..Default::default()
            })
            .collect()
    }
}
