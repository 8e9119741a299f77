//! Tree-walking interpreter
//!
//! [`Interpreter`] owns the variable [`Environment`] and a [`Console`] for
//! `Disp`/`Prompt`/`Input`. Expressions are pure; only statements mutate state.

mod console;
mod env;
mod error;
mod eval;
mod exec;
mod list;
mod value;

pub use console::{Console, EditorConsole, ScriptedConsole, StdConsole};
pub use env::{Environment, LIST_NAMES, number_names};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{evaluate, evaluate_number};
pub use exec::{Flow, Interpreter};
pub use list::NumList;
pub use value::Value;
