//! MySQL Shell code completion - Rust Edition
//!
//! Grammar-driven completion for MySQL statements, usable one-shot from
//! the command line or through an interactive explorer.
//!
//! # Usage
//!
//! ```bash
//! # Interactive explorer
//! mysqlsh -D sakila
//!
//! # One-shot completion
//! mysqlsh complete "SELECT * FROM " --format json
//! ```

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use mysqlsh::cli::{CliInterface, Commands};
use mysqlsh::error::Result;
use mysqlsh::formatter::Formatter;
use mysqlsh::repl::completion::{CompletionEngine, StaticCatalog};
use mysqlsh::repl::{CommandExecutor, ReplCommand, ReplEngine, ResultData, SharedState};

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or start the explorer
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    let engine = create_completion_engine(&cli)?;

    if let Some(Commands::Complete { sql, cursor, raw }) = &cli.args().command {
        return run_complete(&cli, &engine, sql, cursor.unwrap_or(sql.len()), *raw);
    }

    cli.print_banner();

    run_interactive_mode(&cli, engine)
}

/// Build the completion engine from the effective configuration
fn create_completion_engine(cli: &CliInterface) -> Result<Arc<CompletionEngine>> {
    let config = cli.config();
    let shared_state = SharedState::with_config(
        config.server.default_schema.clone(),
        config.server_version()?,
        config.sql_mode()?,
        &config.display,
    );

    let catalog = StaticCatalog::new(config.catalog.clone());
    Ok(Arc::new(CompletionEngine::new(
        Arc::new(catalog),
        shared_state,
        config.completion.clone(),
    )))
}

/// Complete once and print the result
fn run_complete(
    cli: &CliInterface,
    engine: &CompletionEngine,
    sql: &str,
    cursor: usize,
    raw: bool,
) -> Result<()> {
    let formatter = Formatter::from_config(&cli.config().display);

    let output = if raw {
        formatter.format_candidates(&engine.candidates(sql, cursor)?)?
    } else {
        formatter.format_result(&engine.complete(sql, cursor)?)?
    };

    println!("{}", output);
    Ok(())
}

/// Run the interactive explorer
fn run_interactive_mode(cli: &CliInterface, engine: Arc<CompletionEngine>) -> Result<()> {
    let shared_state = engine.state().clone();
    let mut repl = ReplEngine::new(
        shared_state.clone(),
        engine.clone(),
        &cli.config().history,
        cli.config().display.color_output,
    )?;
    let executor = CommandExecutor::new(engine);

    run_repl_loop(&mut repl, &executor, &shared_state)?;

    println!("Goodbye!");
    Ok(())
}

/// Main REPL loop
fn run_repl_loop(
    repl: &mut ReplEngine,
    executor: &CommandExecutor,
    shared_state: &SharedState,
) -> Result<()> {
    while repl.is_running() {
        let input = match repl.read_line()? {
            Some(line) if !line.trim().is_empty() => line,
            Some(_) => continue,
            None => break,
        };

        let command = match repl.process_input(&input) {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if command == ReplCommand::Exit {
            break;
        }

        execute_and_display(executor, shared_state, command);
    }

    Ok(())
}

/// Execute command and display result
fn execute_and_display(executor: &CommandExecutor, shared_state: &SharedState, command: ReplCommand) {
    match executor.execute(command) {
        Ok(data) => display_result(shared_state, &data),
        Err(e) => eprintln!("{}", e),
    }
}

/// Display result with the session's current format
fn display_result(shared_state: &SharedState, data: &ResultData) {
    let formatter = Formatter::new(shared_state.get_format(), shared_state.get_color_enabled());

    let output = match data {
        ResultData::Completions(result) => formatter.format_result(result),
        ResultData::Candidates(candidates) => formatter.format_candidates(candidates),
        ResultData::Message(message) => Ok(message.clone()),
        ResultData::None => return,
    };

    match output {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("Format error: {}", e),
    }
}

/// Initialize logging system from the effective log level
///
/// `RUST_LOG` directives take precedence. Logs go to stderr so completion
/// output can be piped.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
