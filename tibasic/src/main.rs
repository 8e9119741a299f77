//! TI-BASIC Interpreter CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tibasic::config::RunConfig;
use tibasic::error::{report_error, report_runtime_error};
use tibasic::interp::{Interpreter, StdConsole};
use tibasic::repl::Repl;
use tibasic::source::read_source;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tibasic", version, about = "TI-BASIC calculator program interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program
    Run {
        /// Program file
        file: PathBuf,
        /// Abort after this many statements
        #[arg(long)]
        max_steps: Option<u64>,
    },
    /// Start an interactive session
    Repl {
        /// Do not read or write the history file
        #[arg(long)]
        no_history: bool,
        /// Abort an input after this many statements
        #[arg(long)]
        max_steps: Option<u64>,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Program file
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Program file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Command::Run { file, max_steps } => {
            run_file(&file, RunConfig::new().step_limit(max_steps))
        }
        Command::Repl {
            no_history,
            max_steps,
        } => start_repl(RunConfig::new().step_limit(max_steps).history(!no_history)),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Load and parse a file, reporting any failure. Returns the source with the program.
fn load(path: &Path) -> Option<(String, String, tibasic::ast::Program)> {
    let filename = path.display().to_string();
    let source = match read_source(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {e}");
            return None;
        }
    };
    match tibasic::parser::parse_source(&filename, &source) {
        Ok(program) => Some((filename, source, program)),
        Err(e) => {
            report_error(&filename, &source, &e);
            None
        }
    }
}

fn run_file(path: &Path, config: RunConfig) -> bool {
    let Some((filename, source, program)) = load(path) else {
        return false;
    };
    tracing::debug!(file = %filename, "running");

    let mut interpreter = Interpreter::with_config(StdConsole, config);
    match interpreter.run(&program) {
        Ok(()) => true,
        Err(e) => {
            report_runtime_error(&filename, &source, &e);
            false
        }
    }
}

fn start_repl(config: RunConfig) -> bool {
    let result = Repl::new(config)
        .map_err(|e| e.to_string())
        .and_then(|mut repl| repl.run().map_err(|e| e.to_string()));
    match result {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: {e}");
            false
        }
    }
}

fn parse_file(path: &Path) -> bool {
    let Some((_, _, program)) = load(path) else {
        return false;
    };
    match serde_json::to_string_pretty(&program) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            eprintln!("Error: {e}");
            false
        }
    }
}

fn tokenize_file(path: &Path) -> bool {
    let filename = path.display().to_string();
    let source = match read_source(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {e}");
            return false;
        }
    };

    match tibasic::lexer::tokenize(&source) {
        Ok(tokens) => {
            for (tok, span) in &tokens {
                println!("{:?} @ {}..{}", tok, span.start, span.end);
            }
            true
        }
        Err(e) => {
            report_error(&filename, &source, &e);
            false
        }
    }
}
