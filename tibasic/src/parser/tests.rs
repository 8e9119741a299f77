//! Parser tests for the calculator dialect

use crate::ast::{AssignTarget, BinOp, ChainId, Expr, LogicOp, Program, Stmt, UnOp};
use crate::parser::{is_incomplete, parse_expression, parse_source};

/// Helper to parse a program and return the AST
fn parse_program(source: &str) -> crate::Result<Program> {
    parse_source("test.8xp", source)
}

/// Helper to parse and expect success
fn parse_ok(source: &str) -> Program {
    parse_program(source).expect("Parse should succeed")
}

/// Helper to check if parsing fails
fn parse_fails(source: &str) -> bool {
    parse_program(source).is_err()
}

/// Top-level statements, without spans
fn top(program: &Program) -> Vec<&Stmt> {
    program.chain(ChainId::ROOT).iter().map(|s| &s.node).collect()
}

fn expr(source: &str) -> Expr {
    parse_expression(source).expect("expression should parse").node
}

// ============================================
// Simple statements
// ============================================

#[test]
fn test_parse_empty_program() {
    let program = parse_ok("");
    assert!(program.is_empty());
    assert!(parse_ok("\n\n::\n").is_empty());
}

#[test]
fn test_parse_store_and_disp() {
    let program = parse_ok("5→A:Disp A");
    let stmts = top(&program);
    assert_eq!(stmts.len(), 2);
    match stmts[0] {
        Stmt::Assign {
            value,
            target: AssignTarget::Var(name),
        } => {
            assert_eq!(value.node, Expr::Literal(5.0));
            assert_eq!(name.node, "A");
        }
        other => panic!("Expected Assign, got {other:?}"),
    }
    assert!(matches!(stmts[1], Stmt::Disp(exprs) if exprs.len() == 1));
}

#[test]
fn test_parse_ascii_store_arrow() {
    let program = parse_ok("2->B");
    assert!(matches!(top(&program)[0], Stmt::Assign { .. }));
}

#[test]
fn test_parse_store_to_list_element() {
    let program = parse_ok("1→L1(2)");
    match top(&program)[0] {
        Stmt::Assign {
            target: AssignTarget::Element { name, index },
            ..
        } => {
            assert_eq!(name.node, "L₁");
            assert_eq!(index.node, Expr::Literal(2.0));
        }
        other => panic!("Expected element Assign, got {other:?}"),
    }
}

#[test]
fn test_parse_store_to_element_without_closing_paren() {
    let program = parse_ok("1→L₂(3\nDisp L₂");
    assert_eq!(top(&program).len(), 2);
}

#[test]
fn test_parse_disp_many_and_none() {
    let program = parse_ok("Disp 1,A,L₁\nDisp");
    let stmts = top(&program);
    assert!(matches!(stmts[0], Stmt::Disp(exprs) if exprs.len() == 3));
    assert!(matches!(stmts[1], Stmt::Disp(exprs) if exprs.is_empty()));
}

#[test]
fn test_parse_prompt() {
    let program = parse_ok("Prompt A,B,⌊XS");
    match top(&program)[0] {
        Stmt::Prompt(names) => {
            let names: Vec<&str> = names.iter().map(|n| n.node.as_str()).collect();
            assert_eq!(names, vec!["A", "B", "⌊XS"]);
        }
        other => panic!("Expected Prompt, got {other:?}"),
    }
}

#[test]
fn test_parse_input_with_and_without_prompt() {
    let program = parse_ok("Input \"AGE\",A\nInput B");
    let stmts = top(&program);
    assert!(matches!(
        stmts[0],
        Stmt::Input { prompt: Some(p), name } if p == "AGE" && name.node == "A"
    ));
    assert!(matches!(stmts[1], Stmt::Input { prompt: None, .. }));
}

#[test]
fn test_parse_labels_goto_stop() {
    let program = parse_ok("Lbl A1\nGoto A1\nStop");
    let stmts = top(&program);
    assert_eq!(stmts[0], &Stmt::Label("A1".into()));
    assert_eq!(stmts[1], &Stmt::Goto("A1".into()));
    assert_eq!(stmts[2], &Stmt::Stop);
}

#[test]
fn test_parse_expression_statement() {
    let program = parse_ok("A+1");
    assert!(matches!(top(&program)[0], Stmt::Expr(_)));
}

// ============================================
// Blocks
// ============================================

#[test]
fn test_parse_if_then_else_end() {
    let program = parse_ok("If A=1\nThen\nDisp 1\nDisp 2\nElse\nDisp 3\nEnd\nDisp 4");
    let stmts = top(&program);
    assert_eq!(stmts.len(), 2);
    match stmts[0] {
        Stmt::If {
            then_chain,
            else_chain: Some(else_chain),
            ..
        } => {
            assert_eq!(program.chain(*then_chain).len(), 2);
            assert_eq!(program.chain(*else_chain).len(), 1);
        }
        other => panic!("Expected If/Else, got {other:?}"),
    }
}

#[test]
fn test_parse_if_then_on_one_line() {
    let program = parse_ok("If A:Then:Disp 1:End");
    match top(&program)[0] {
        Stmt::If {
            then_chain,
            else_chain: None,
            ..
        } => assert_eq!(program.chain(*then_chain).len(), 1),
        other => panic!("Expected If, got {other:?}"),
    }
}

#[test]
fn test_parse_single_statement_if() {
    let program = parse_ok("If A>2\nDisp A\nDisp 0");
    let stmts = top(&program);
    assert_eq!(stmts.len(), 2);
    match stmts[0] {
        Stmt::If { then_chain, .. } => {
            assert_eq!(program.chain(*then_chain).len(), 1);
        }
        other => panic!("Expected If, got {other:?}"),
    }
}

#[test]
fn test_parse_while() {
    let program = parse_ok("While A<5\nA+1→A\nEnd");
    match top(&program)[0] {
        Stmt::While { body, .. } => assert_eq!(program.chain(*body).len(), 1),
        other => panic!("Expected While, got {other:?}"),
    }
}

#[test]
fn test_parse_for_with_and_without_step() {
    let program = parse_ok("For(A,1,5,2)\nDisp A\nEnd\nFor(B,1,3\nEnd");
    let stmts = top(&program);
    assert!(matches!(stmts[0], Stmt::For { step: Some(_), .. }));
    match stmts[1] {
        Stmt::For {
            var, step: None, body, ..
        } => {
            assert_eq!(var.node, "B");
            assert!(program.chain(*body).is_empty());
        }
        other => panic!("Expected For, got {other:?}"),
    }
}

#[test]
fn test_parse_nested_blocks_get_own_chains() {
    let program = parse_ok("While 1\nIf A\nThen\nGoto X\nEnd\nEnd\nLbl X");
    assert_eq!(program.chains.len(), 3);
    assert_eq!(top(&program).len(), 2);
}

#[test]
fn test_parse_block_header_span() {
    let program = parse_ok("While A<5\nEnd");
    let stmt = &program.chain(ChainId::ROOT)[0];
    assert_eq!(stmt.span.start, 0);
    assert_eq!(stmt.span.end, "While A<5".len());
}

// ============================================
// Errors
// ============================================

#[test]
fn test_parse_missing_end() {
    assert!(parse_fails("While 1\nDisp 1"));
    assert!(parse_fails("If 1\nThen\nDisp 1"));
    assert!(parse_fails("For(A,1,2\nDisp A"));
}

#[test]
fn test_parse_stray_end_and_else() {
    assert!(parse_fails("Disp 1\nEnd"));
    assert!(parse_fails("Else"));
    assert!(parse_fails("Then"));
}

#[test]
fn test_parse_if_without_statement() {
    assert!(parse_fails("If 1"));
}

#[test]
fn test_parse_trailing_garbage() {
    assert!(parse_fails("Disp 1 2"));
    assert!(parse_fails("5→A B"));
}

#[test]
fn test_parse_store_to_non_variable() {
    assert!(parse_fails("5→6"));
}

#[test]
fn test_parse_missing_end_message() {
    let err = parse_program("While 1\nDisp 1").unwrap_err();
    assert!(err.message().contains("missing its `End`"));
    assert!(is_incomplete(&err));
    assert!(!is_incomplete(&parse_program("Disp 1\nEnd").unwrap_err()));
}

#[test]
fn test_parse_second_else_is_not_incomplete() {
    let err = parse_program("If 1\nThen\nElse\nElse\nEnd").unwrap_err();
    assert!(!is_incomplete(&err));
    assert!(err.message().contains("expected `End`"));
}

// ============================================
// Nesting limits
// ============================================

fn too_deep(err: &crate::error::SourceError) -> bool {
    err.message().starts_with("nesting too deep")
}

#[test]
fn test_parse_long_sign_chain_is_rejected() {
    let source = format!("{}1", "-".repeat(200_000));
    assert!(too_deep(&parse_expression(&source).unwrap_err()));
    let source = format!("2^{}1", "-".repeat(200_000));
    assert!(too_deep(&parse_expression(&source).unwrap_err()));
}

#[test]
fn test_parse_deep_parentheses_are_rejected() {
    let source = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
    assert!(too_deep(&parse_expression(&source).unwrap_err()));
}

#[test]
fn test_parse_long_operator_chain_is_rejected() {
    let source = format!("{}1", "1+".repeat(200_000));
    assert!(too_deep(&parse_expression(&source).unwrap_err()));
    let source = format!("{}1", "1=".repeat(200_000));
    assert!(too_deep(&parse_expression(&source).unwrap_err()));
}

#[test]
fn test_parse_nesting_below_limit() {
    let source = format!("{}1{}", "(".repeat(900), ")".repeat(900));
    assert!(parse_expression(&source).is_ok());
    assert!(parse_expression(&format!("{}1", "1+".repeat(900))).is_ok());
}

#[test]
fn test_parse_deep_blocks_are_rejected() {
    let source = format!("{}Disp 1\n{}", "If 1\nThen\n".repeat(3000), "End\n".repeat(3000));
    let err = parse_program(&source).unwrap_err();
    assert!(too_deep(&err));
    assert!(!is_incomplete(&err));

    // Single-line `If` bodies nest as well
    let source = format!("{}Disp 1", "If 1:".repeat(3000));
    assert!(too_deep(&parse_program(&source).unwrap_err()));
}

// ============================================
// Expressions
// ============================================

#[test]
fn test_parse_precedence() {
    match expr("1+2*3") {
        Expr::Binary {
            op: BinOp::Add,
            right,
            ..
        } => assert!(matches!(right.node, Expr::Binary { op: BinOp::Mul, .. })),
        other => panic!("Expected Add at root, got {other:?}"),
    }
}

#[test]
fn test_parse_negation_binds_looser_than_power() {
    match expr("-2^2") {
        Expr::Unary { op: UnOp::Neg, expr } => {
            assert!(matches!(expr.node, Expr::Binary { op: BinOp::Pow, .. }));
        }
        other => panic!("Expected Neg at root, got {other:?}"),
    }
}

#[test]
fn test_parse_logical_precedence() {
    match expr("A=1 or B=2 and C=3") {
        Expr::Logical {
            op: LogicOp::Or,
            right,
            ..
        } => assert!(matches!(right.node, Expr::Logical { op: LogicOp::And, .. })),
        other => panic!("Expected Or at root, got {other:?}"),
    }
}

#[test]
fn test_parse_list_literal_and_element() {
    assert!(matches!(expr("{1,2,3}"), Expr::List(items) if items.len() == 3));
    assert!(matches!(expr("L₁(2)"), Expr::Element { name, .. } if name == "L₁"));
    assert!(matches!(expr("⌊AB(1)"), Expr::Element { name, .. } if name == "⌊AB"));
    assert_eq!(expr("L₃"), Expr::Var("L₃".into()));
}

#[test]
fn test_parse_grouping() {
    assert!(matches!(expr("(A)"), Expr::Grouping(_)));
}

#[test]
fn test_parse_expression_rejects_trailing_tokens() {
    assert!(parse_expression("1 2").is_err());
    assert!(parse_expression("").is_err());
    assert!(parse_expression("Disp 1").is_err());
}
