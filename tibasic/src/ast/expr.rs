//! Expression AST nodes

use super::Spanned;
use serde::{Deserialize, Serialize};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Numeric literal
    Literal(f64),

    /// Variable reference: `A`, `L₁`, `⌊ABC`
    Var(String),

    /// List element read: `L₁(2)`
    Element {
        name: String,
        index: Box<Spanned<Expr>>,
    },

    /// List construction: `{1, 2, A}`
    List(Vec<Spanned<Expr>>),

    /// Arithmetic or comparison
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },

    /// `and` / `or`, evaluated without short-circuit
    Logical {
        left: Box<Spanned<Expr>>,
        op: LogicOp,
        right: Box<Spanned<Expr>>,
    },

    /// Unary plus or minus
    Unary {
        op: UnOp,
        expr: Box<Spanned<Expr>>,
    },

    /// Parenthesized expression
    Grouping(Box<Spanned<Expr>>),
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,

    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl BinOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Gt | BinOp::Ge | BinOp::Lt | BinOp::Le | BinOp::Eq | BinOp::Ne
        )
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
            BinOp::Gt => ">",
            BinOp::Ge => "≥",
            BinOp::Lt => "<",
            BinOp::Le => "≤",
            BinOp::Eq => "=",
            BinOp::Ne => "≠",
        };
        write!(f, "{s}")
    }
}

/// Logical operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicOp {
    And,
    Or,
}

impl std::fmt::Display for LogicOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicOp::And => write!(f, "and"),
            LogicOp::Or => write!(f, "or"),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    /// `+x`
    Plus,
    /// `-x`
    Neg,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Plus => write!(f, "+"),
            UnOp::Neg => write!(f, "-"),
        }
    }
}
