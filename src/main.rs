//! repindex CLI - repository indexer
//!
//! Usage: repindex <REPOSITORY_PATH> [options]

mod cli;
mod context_cmd;
mod index_cmd;

use anyhow::Result;
use cli::Cli;
use repindex::clipboard::Clipboard;
use repindex::validation::validate_repository;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let root = cli.repository_path.clone();
    let config = cli.into_config(&root)?;

    let clipboard = if config.copy_to_clipboard {
        Clipboard::detect()
    } else {
        None
    };

    if config.is_context_mode() {
        context_cmd::run_context(&config, clipboard.as_ref())
    } else {
        index_cmd::run_index(&config, clipboard.as_ref())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = validate_repository(&cli.repository_path) {
        eprintln!("Error: {}", e);
        return ExitCode::from(1);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
