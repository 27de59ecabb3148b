use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::error::{Result, ShellError};

use super::command::ReplCommand;
use super::completer::SqlCompleter;
use super::completion::CompletionEngine;
use super::highlighter::SqlHighlighter;
use super::hinter::SqlHinter;
use super::prompt::SqlPrompt;
use super::shared_state::SharedState;

const COMPLETION_MENU: &str = "completion_menu";

/// REPL engine for the interactive completion explorer
pub struct ReplEngine {
    /// Line editor for command input
    editor: Reedline,

    /// Session settings shown in the prompt
    shared_state: SharedState,

    /// Whether to continue running
    running: bool,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `shared_state` - Session settings shared with the engine
    /// * `engine` - Completion engine behind Tab, hints and commands
    /// * `history_config` - History configuration
    /// * `highlighting_enabled` - Enable syntax highlighting
    pub fn new(
        shared_state: SharedState,
        engine: Arc<CompletionEngine>,
        history_config: &HistoryConfig,
        highlighting_enabled: bool,
    ) -> Result<Self> {
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let menu = ColumnarMenu::default().with_name(COMPLETION_MENU);

        let editor = Reedline::create()
            .with_history(Self::history(history_config)?)
            .with_completer(Box::new(SqlCompleter::new(engine.clone())))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
            .with_hinter(Box::new(SqlHinter::new(engine)))
            .with_highlighter(Box::new(SqlHighlighter::new(
                shared_state.clone(),
                highlighting_enabled,
            )))
            .with_edit_mode(Box::new(Emacs::new(keybindings)));

        Ok(Self {
            editor,
            shared_state,
            running: true,
        })
    }

    /// File backed when persistent, in memory otherwise
    fn history(config: &HistoryConfig) -> Result<Box<FileBackedHistory>> {
        if config.persist {
            match FileBackedHistory::with_file(config.max_size, config.file_path.clone()) {
                Ok(history) => return Ok(Box::new(history)),
                Err(e) => warn!(
                    path = %config.file_path.display(),
                    "history file unavailable, keeping history in memory: {}",
                    e
                ),
            }
        }

        FileBackedHistory::new(config.max_size)
            .map(Box::new)
            .map_err(|e| ShellError::Generic(format!("History error: {}", e)))
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line, empty on Ctrl-C, None on Ctrl-D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let prompt = SqlPrompt::new(
            self.shared_state.get_schema(),
            self.shared_state.get_server_version(),
            self.shared_state.get_sql_mode(),
        );

        match self.editor.read_line(&prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlD => {
                debug!("end of input");
                Ok(None)
            }
            // Ctrl-C drops the current line only
            _ => Ok(Some(String::new())),
        }
    }

    /// Process user input and parse into command
    pub fn process_input(&mut self, input: &str) -> Result<ReplCommand> {
        let command = ReplCommand::parse(input)?;
        if command == ReplCommand::Exit {
            self.stop();
        }
        Ok(command)
    }

    /// Stop the REPL
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Check if REPL is still running
    pub fn is_running(&self) -> bool {
        self.running
    }
}
