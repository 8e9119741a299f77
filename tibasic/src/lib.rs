//! TI-BASIC Interpreter Library
//!
//! Lexer, parser and tree-walking interpreter for the TI-83/84 calculator
//! BASIC dialect: numbers, lists, `If`/`While`/`For(` blocks and `Lbl`/`Goto`.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod source;
pub mod util;

pub use ast::Span;
pub use error::{Result, SourceError};
