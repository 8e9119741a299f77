//! Program file loading

use crate::error::{Result, SourceError};
use std::path::Path;

/// Read a program file. Each line is trimmed; lines are rejoined with `\n`.
pub fn read_source(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SourceError::io_error(format!("{}: {e}", path.display())))?;
    Ok(normalize(&text))
}

/// Trim every line of `text`
pub fn normalize(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}
