//! Line-oriented console used by `Disp`, `Prompt` and `Input`

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Blocking line source and line sink
pub trait Console {
    /// Show `prompt` and block for one line. `Ok(None)` means the input is closed.
    /// The returned line has no trailing line terminator.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Emit one line of program output
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Process stdin/stdout
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_terminator(line)))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{line}")
    }
}

/// Terminal console backed by a rustyline editor
pub struct EditorConsole {
    editor: DefaultEditor,
}

impl EditorConsole {
    pub fn new() -> rustyline::Result<Self> {
        Ok(EditorConsole {
            editor: DefaultEditor::new()?,
        })
    }

    pub fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    pub fn load_history(&mut self, path: &Path) {
        let _ = self.editor.load_history(path);
    }

    pub fn save_history(&mut self, path: &Path) {
        if let Err(err) = self.editor.save_history(path) {
            tracing::warn!(path = %path.display(), "could not save history: {err}");
        }
    }
}

impl Console for EditorConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => {
                Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"))
            }
            Err(ReadlineError::Io(err)) => Err(err),
            Err(err) => Err(io::Error::other(err.to_string())),
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{line}")
    }
}

/// Scripted input and captured output, for driving programs without a terminal
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    /// Lines written by the program
    pub output: Vec<String>,
    /// Prompts shown, one per line read
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedConsole {
            input: input.into_iter().map(Into::into).collect(),
            output: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// Output joined with newlines
    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }
}

fn strip_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
