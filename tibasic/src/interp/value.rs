//! Runtime values for the interpreter

use super::list::NumList;
use std::fmt;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit floating point; also the encoding of booleans (1.0 / 0.0)
    Number(f64),
    /// Numeric list
    List(NumList),
}

pub const TRUE: f64 = 1.0;
pub const FALSE: f64 = 0.0;

impl Value {
    pub fn list(items: Vec<f64>) -> Self {
        Value::List(NumList::new(items))
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Number(if b { TRUE } else { FALSE })
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::List(_) => "list",
        }
    }

    /// Try to convert to f64
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::List(_) => None,
        }
    }
}

/// Truthiness of the numeric boolean encoding
pub fn is_true(n: f64) -> bool {
    n != FALSE
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Debug formatting keeps the trailing `.0` on whole numbers
            Value::Number(n) => write!(f, "{n:?}"),
            Value::List(list) => write!(f, "{list}"),
        }
    }
}
