//! Statement AST nodes

use super::{ChainId, Expr, Spanned};
use serde::{Deserialize, Serialize};

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Bare expression evaluated for effect
    Expr(Spanned<Expr>),

    /// `Disp e1, e2, ...`
    Disp(Vec<Spanned<Expr>>),

    /// `value→target`
    Assign {
        value: Spanned<Expr>,
        target: AssignTarget,
    },

    /// `Prompt A, B, ...`
    Prompt(Vec<Spanned<String>>),

    /// `Input "TEXT", A` (prompt is `None` for a bare `Input A`)
    Input {
        prompt: Option<String>,
        name: Spanned<String>,
    },

    /// `If cond` with a then chain and an optional else chain
    If {
        cond: Spanned<Expr>,
        then_chain: ChainId,
        else_chain: Option<ChainId>,
    },

    /// `While cond ... End`
    While { cond: Spanned<Expr>, body: ChainId },

    /// `For(var, start, end[, step]) ... End`
    For {
        var: Spanned<String>,
        start: Spanned<Expr>,
        end: Spanned<Expr>,
        step: Option<Spanned<Expr>>,
        body: ChainId,
    },

    /// `Lbl NAME`
    Label(String),

    /// `Goto NAME`
    Goto(String),

    /// `Stop`
    Stop,
}

/// Destination of a store (`→`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    /// Whole variable: `→A`, `→L₁`
    Var(Spanned<String>),
    /// One list element: `→L₁(3)`
    Element {
        name: Spanned<String>,
        index: Spanned<Expr>,
    },
}
