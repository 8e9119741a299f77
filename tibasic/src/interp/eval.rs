//! Expression evaluator
//!
//! Reduces an expression tree to a [`Value`] against a borrowed
//! [`Environment`]. Evaluation never writes to the environment.

use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::list::NumList;
use super::value::{Value, is_true};
use crate::ast::{BinOp, Expr, LogicOp, Spanned, UnOp};

/// Stack growth parameters for deeply nested expressions
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Evaluate `expr`. Faults carry the span of the innermost failing expression.
pub fn evaluate(env: &Environment, expr: &Spanned<Expr>) -> InterpResult<Value> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
        eval_inner(env, expr).map_err(|e| e.at(expr.span))
    })
}

/// Evaluate `expr` and require a number
pub fn evaluate_number(env: &Environment, expr: &Spanned<Expr>, context: &str) -> InterpResult<f64> {
    let value = evaluate(env, expr)?;
    value
        .as_number()
        .ok_or_else(|| RuntimeError::type_error(context, "number", value.type_name()).at(expr.span))
}

fn eval_inner(env: &Environment, expr: &Spanned<Expr>) -> InterpResult<Value> {
    match &expr.node {
        Expr::Literal(n) => Ok(Value::Number(*n)),

        Expr::Var(name) => env.get(name),

        Expr::Element { name, index } => {
            let index = evaluate(env, index)?;
            env.get_list_element(name, &index).map(Value::Number)
        }

        Expr::List(items) => {
            let items = items
                .iter()
                .map(|item| evaluate_number(env, item, "list element"))
                .collect::<InterpResult<Vec<_>>>()?;
            Ok(Value::List(NumList::new(items)))
        }

        Expr::Binary { left, op, right } => {
            let context = format!("operator '{op}'");
            let left = evaluate_number(env, left, &context)?;
            let right = evaluate_number(env, right, &context)?;
            Ok(eval_binary(*op, left, right))
        }

        Expr::Logical { left, op, right } => {
            // Both sides are evaluated before either is tested
            let left = evaluate(env, left)?;
            let right = evaluate(env, right)?;
            let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
                let got = if left.as_number().is_none() { &left } else { &right };
                return Err(RuntimeError::type_error(
                    &format!("operator '{op}'"),
                    "numbers",
                    got.type_name(),
                ));
            };
            let result = match op {
                LogicOp::And => is_true(l) && is_true(r),
                LogicOp::Or => is_true(l) || is_true(r),
            };
            Ok(Value::from_bool(result))
        }

        Expr::Unary { op, expr: inner } => {
            let n = evaluate_number(env, inner, &format!("unary '{op}'"))?;
            Ok(Value::Number(match op {
                UnOp::Plus => n,
                UnOp::Neg => -n,
            }))
        }

        Expr::Grouping(inner) => evaluate(env, inner),
    }
}

fn eval_binary(op: BinOp, left: f64, right: f64) -> Value {
    match op {
        BinOp::Add => Value::Number(left + right),
        BinOp::Sub => Value::Number(left - right),
        BinOp::Mul => Value::Number(left * right),
        BinOp::Div => Value::Number(left / right),
        BinOp::Pow => Value::Number(left.powf(right)),
        BinOp::Gt => Value::from_bool(left > right),
        BinOp::Ge => Value::from_bool(left >= right),
        BinOp::Lt => Value::from_bool(left < right),
        BinOp::Le => Value::from_bool(left <= right),
        BinOp::Eq => Value::from_bool(left == right),
        BinOp::Ne => Value::from_bool(left != right),
    }
}
