//! REPL (Read-Eval-Print Loop) for TI-BASIC
//!
//! Variables persist between inputs. An input that opens a block without
//! closing it is continued on the following lines.

use crate::ast::{ChainId, Stmt};
use crate::config::RunConfig;
use crate::error::{report_error, report_runtime_error};
use crate::interp::{Console, EditorConsole, Interpreter, evaluate};
use crate::parser::{is_incomplete, parse_source};
use std::io;
use std::path::PathBuf;

const PROMPT: &str = "> ";
const CONTINUE_PROMPT: &str = "... ";
const HISTORY_FILE: &str = ".tibasic_history";
const REPL_NAME: &str = "<repl>";

/// REPL state
pub struct Repl {
    interpreter: Interpreter<EditorConsole>,
    history_path: Option<PathBuf>,
    pending: String,
}

impl Repl {
    /// Create a new REPL
    pub fn new(config: RunConfig) -> rustyline::Result<Self> {
        let mut console = EditorConsole::new()?;

        let history_path = if config.history {
            dirs_home().map(|h| h.join(HISTORY_FILE))
        } else {
            None
        };
        if let Some(path) = &history_path {
            console.load_history(path);
        }

        Ok(Repl {
            interpreter: Interpreter::with_config(console, config),
            history_path,
            pending: String::new(),
        })
    }

    /// Run the REPL until `:quit` or end of input
    pub fn run(&mut self) -> io::Result<()> {
        println!("TI-BASIC REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            let prompt = if self.pending.is_empty() {
                PROMPT
            } else {
                CONTINUE_PROMPT
            };

            match self.interpreter.console_mut().read_line(prompt) {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() && self.pending.is_empty() {
                        continue;
                    }
                    self.interpreter.console_mut().add_history(line);

                    if self.pending.is_empty() && is_command(line) {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.feed(line);
                }
                Ok(None) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    println!("^C");
                    self.pending.clear();
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            self.interpreter.console_mut().save_history(path);
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :). Returns true to exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" => {
                self.print_help();
                false
            }
            ":vars" => {
                self.print_vars();
                false
            }
            ":reset" => {
                self.interpreter.reset();
                println!("Variables reset.");
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn print_help(&self) {
        println!("TI-BASIC REPL Commands:");
        println!("  :help, :h       Show this help");
        println!("  :quit, :q       Exit the REPL");
        println!("  :vars           Show variables that differ from their defaults");
        println!("  :reset          Reset all variables");
        println!("  :clear          Clear the screen");
        println!();
        println!("You can enter:");
        println!("  - Expressions: 1+2*3, L₁(1), {{1,2,3}}");
        println!("  - Statements: 5→A, Disp A, Prompt B");
        println!("  - Blocks, across several lines: For(I,1,3) ... End");
        println!("  - Several statements separated by ':'");
    }

    fn print_vars(&self) {
        let vars = self.vars_listing();
        if vars.is_empty() {
            println!("All variables have their default values.");
        }
        for line in vars {
            println!("  {line}");
        }
    }

    /// One `name = value` line per variable that differs from its default
    fn vars_listing(&self) -> Vec<String> {
        self.interpreter
            .environment()
            .modified()
            .into_iter()
            .map(|(name, value)| format!("{name} = {value}"))
            .collect()
    }

    /// Append a line to the pending input and run it once it forms a whole program
    fn feed(&mut self, line: &str) {
        if !self.pending.is_empty() {
            self.pending.push('\n');
        }
        self.pending.push_str(line);

        let source = std::mem::take(&mut self.pending);
        if !self.eval_input(&source) {
            self.pending = source;
        }
    }

    /// Parse and run one input. Returns false if it leaves a block open.
    fn eval_input(&mut self, source: &str) -> bool {
        let program = match parse_source(REPL_NAME, source) {
            Ok(program) => program,
            Err(err) if is_incomplete(&err) => return false,
            Err(err) => {
                report_error(REPL_NAME, source, &err);
                return true;
            }
        };

        // A lone expression echoes its value, like the home screen
        if program.len() == 1
            && let [stmt] = program.chain(ChainId::ROOT)
            && let Stmt::Expr(expr) = &stmt.node
        {
            match evaluate(self.interpreter.environment(), expr) {
                Ok(value) => println!("{value}"),
                Err(err) => report_runtime_error(REPL_NAME, source, &err),
            }
            return true;
        }

        if let Err(err) = self.interpreter.run(&program) {
            report_runtime_error(REPL_NAME, source, &err);
        }
        true
    }
}

/// REPL commands are `:` followed by a lowercase word. Calculator statements
/// may also start with `:` but never with a lowercase letter.
fn is_command(line: &str) -> bool {
    line.strip_prefix(':')
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_lowercase())
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Value;

    fn repl() -> Repl {
        Repl::new(RunConfig::new().history(false)).unwrap()
    }

    fn var(repl: &Repl, name: &str) -> Value {
        repl.interpreter.environment().get(name).unwrap()
    }

    #[test]
    fn test_repl_new_without_history() {
        assert!(repl().history_path.is_none());
    }

    #[test]
    fn test_handle_command_quit() {
        let mut repl = repl();
        assert!(repl.handle_command(":quit"));
        assert!(repl.handle_command(":q"));
        assert!(repl.handle_command(":exit"));
    }

    #[test]
    fn test_handle_command_non_exiting() {
        let mut repl = repl();
        assert!(!repl.handle_command(":help"));
        assert!(!repl.handle_command(":h"));
        assert!(!repl.handle_command(":vars"));
        assert!(!repl.handle_command(":clear"));
        assert!(!repl.handle_command(":unknown"));
    }

    #[test]
    fn test_is_command() {
        assert!(is_command(":help"));
        assert!(is_command(":q"));
        assert!(!is_command(":Disp 1"));
        assert!(!is_command("Disp 1"));
        assert!(!is_command(":"));
    }

    #[test]
    fn test_variables_persist_between_inputs() {
        let mut repl = repl();
        repl.feed("5→A");
        repl.feed("A*2→B");
        assert_eq!(var(&repl, "B"), Value::Number(10.0));
    }

    #[test]
    fn test_reset_command() {
        let mut repl = repl();
        repl.feed("5→A");
        assert!(!repl.handle_command(":reset"));
        assert_eq!(var(&repl, "A"), Value::Number(0.0));
    }

    #[test]
    fn test_open_block_waits_for_end() {
        let mut repl = repl();
        repl.feed("For(I,1,3)");
        assert_eq!(repl.pending, "For(I,1,3)");
        repl.feed("S+I→S");
        repl.feed("End");
        assert!(repl.pending.is_empty());
        assert_eq!(var(&repl, "S"), Value::Number(6.0));
    }

    #[test]
    fn test_eval_input_errors_do_not_panic() {
        let mut repl = repl();
        assert!(repl.eval_input("1+"));
        assert!(repl.eval_input("⌊NOPE+1"));
        assert!(repl.eval_input("Goto Q"));
    }

    #[test]
    fn test_lone_expression_does_not_assign() {
        let mut repl = repl();
        assert!(repl.eval_input("1+2"));
        assert!(repl.interpreter.environment().modified().is_empty());
    }

    #[test]
    fn test_vars_listing() {
        let mut repl = repl();
        assert!(repl.vars_listing().is_empty());
        repl.feed("5→A");
        repl.feed("{2,3}→L₂");
        let vars = repl.vars_listing();
        assert!(vars.contains(&"A = 5.0".to_string()));
        assert!(vars.contains(&"L₂ = {2.0, 3.0}".to_string()));
        assert_eq!(vars.len(), 2);

        repl.handle_command(":reset");
        assert!(repl.vars_listing().is_empty());
    }
}
