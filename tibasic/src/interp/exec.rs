//! Statement executor
//!
//! Block statements run their sub-chains through nested [`Interpreter::execute_chain`]
//! calls. A `Goto` does not unwind: it comes back up as [`Flow::Jump`], every
//! caller hands it straight to its own caller, and only the top-level loop in
//! [`Interpreter::interpret`] resolves it against the label index.

use super::console::{Console, StdConsole};
use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::eval::{evaluate, evaluate_number};
use super::value::{Value, is_true};
use crate::ast::{
    AssignTarget, ChainId, Expr, LabelIndex, Position, Program, Span, Spanned, Stmt,
};
use crate::config::RunConfig;
use crate::parser::parse_expression;
use crate::util::{find_similar_name, format_suggestion_hint};

/// Stack growth parameters for deeply nested blocks
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Outcome of executing a statement or a chain
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement
    Proceed,
    /// Transfer control to a label
    Jump(Spanned<String>),
    /// End the run
    Halt,
}

/// The interpreter: one environment, one console
pub struct Interpreter<C: Console = StdConsole> {
    env: Environment,
    console: C,
    config: RunConfig,
    steps: u64,
}

impl<C: Console> Interpreter<C> {
    /// Create a new interpreter with a fresh environment
    pub fn new(console: C) -> Self {
        Self::with_config(console, RunConfig::default())
    }

    pub fn with_config(console: C, config: RunConfig) -> Self {
        Interpreter {
            env: Environment::new(),
            console,
            config,
            steps: 0,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Discard all variables
    pub fn reset(&mut self) {
        self.env = Environment::new();
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Build the label index and run from the first top-level statement
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, program: &Program) -> InterpResult<()> {
        let labels = LabelIndex::build(program);
        tracing::debug!(
            statements = program.len(),
            labels = labels.len(),
            "program loaded"
        );
        self.interpret(program, &labels, program.head())
    }

    /// Run from `head` until the chain ends, a `Stop`, or a fault
    pub fn interpret(
        &mut self,
        program: &Program,
        labels: &LabelIndex,
        head: Option<Position>,
    ) -> InterpResult<()> {
        self.steps = 0;
        let mut cursor = head;
        while let Some(pos) = cursor {
            let Some(stmt) = program.stmt(pos) else {
                break;
            };
            cursor = match self.execute(program, stmt)? {
                Flow::Proceed => program.next(pos),
                Flow::Jump(label) => Some(self.resolve(labels, &label)?),
                Flow::Halt => {
                    tracing::debug!("stopped");
                    None
                }
            };
        }
        tracing::debug!(steps = self.steps, "run finished");
        Ok(())
    }

    fn resolve(&self, labels: &LabelIndex, label: &Spanned<String>) -> InterpResult<Position> {
        match labels.resolve(&label.node) {
            Some(pos) => {
                tracing::trace!(label = %label.node, chain = pos.chain.0, index = pos.index, "jump");
                Ok(pos)
            }
            None => {
                let names = labels.names();
                let hint = format_suggestion_hint(find_similar_name(&label.node, &names, 1));
                Err(RuntimeError::undefined_label(&label.node, &hint).at(label.span))
            }
        }
    }

    /// Run a sub-chain to completion, or until it yields a jump or halt
    fn execute_chain(&mut self, program: &Program, chain: ChainId) -> InterpResult<Flow> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            for stmt in program.chain(chain) {
                match self.execute(program, stmt)? {
                    Flow::Proceed => {}
                    flow => return Ok(flow),
                }
            }
            Ok(Flow::Proceed)
        })
    }

    fn execute(&mut self, program: &Program, stmt: &Spanned<Stmt>) -> InterpResult<Flow> {
        self.count_step(stmt.span)?;

        match &stmt.node {
            Stmt::Expr(expr) => {
                evaluate(&self.env, expr)?;
            }

            Stmt::Disp(exprs) => {
                for expr in exprs {
                    let value = evaluate(&self.env, expr)?;
                    self.console
                        .write_line(&value.to_string())
                        .map_err(|e| RuntimeError::io_error(&e.to_string()).at(stmt.span))?;
                }
            }

            Stmt::Assign { value, target } => self.assign(value, target)?,

            Stmt::Prompt(names) => {
                for name in names {
                    self.read_into(&format!("{}?", name.node), name)?;
                }
            }

            Stmt::Input { prompt, name } => {
                let prompt = prompt
                    .clone()
                    .unwrap_or_else(|| self.config.default_input_prompt.clone());
                self.read_into(&prompt, name)?;
            }

            Stmt::If {
                cond,
                then_chain,
                else_chain,
            } => {
                if is_true(evaluate_number(&self.env, cond, "If condition")?) {
                    return self.execute_chain(program, *then_chain);
                }
                if let Some(else_chain) = else_chain {
                    return self.execute_chain(program, *else_chain);
                }
            }

            Stmt::While { cond, body } => {
                while is_true(evaluate_number(&self.env, cond, "While condition")?) {
                    match self.execute_chain(program, *body)? {
                        Flow::Proceed => {}
                        flow => return Ok(flow),
                    }
                }
            }

            Stmt::For {
                var,
                start,
                end,
                step,
                body,
            } => {
                return self.execute_for(program, var, start, end, step.as_ref(), *body, stmt.span);
            }

            Stmt::Label(_) => {}

            Stmt::Goto(label) => {
                return Ok(Flow::Jump(Spanned::new(label.clone(), stmt.span)));
            }

            Stmt::Stop => return Ok(Flow::Halt),
        }

        Ok(Flow::Proceed)
    }

    /// End and step are evaluated once, before the start value is assigned.
    /// The loop counter is private, so body writes to the variable do not steer it.
    #[allow(clippy::too_many_arguments)]
    fn execute_for(
        &mut self,
        program: &Program,
        var: &Spanned<String>,
        start: &Spanned<Expr>,
        end: &Spanned<Expr>,
        step: Option<&Spanned<Expr>>,
        body: ChainId,
        span: Span,
    ) -> InterpResult<Flow> {
        let end = evaluate_number(&self.env, end, "For( end")?;
        let step = match step {
            Some(step) => evaluate_number(&self.env, step, "For( step")?,
            None => 1.0,
        };
        if !(step > 0.0 || step < 0.0) {
            return Err(RuntimeError::invalid_step().at(span));
        }

        let start = evaluate(&self.env, start)?;
        self.env
            .assign(&var.node, start)
            .map_err(|e| e.at(var.span))?;
        let mut counter = match self.env.get(&var.node)? {
            Value::Number(n) => n,
            other => {
                return Err(
                    RuntimeError::type_error("For( variable", "number", other.type_name())
                        .at(var.span),
                );
            }
        };

        tracing::trace!(var = %var.node, counter, end, step, "for loop");
        while (step > 0.0 && counter <= end) || (step < 0.0 && counter >= end) {
            self.env
                .assign(&var.node, Value::Number(counter))
                .map_err(|e| e.at(var.span))?;
            match self.execute_chain(program, body)? {
                Flow::Proceed => {}
                flow => return Ok(flow),
            }
            counter += step;
        }
        Ok(Flow::Proceed)
    }

    fn assign(&mut self, value: &Spanned<Expr>, target: &AssignTarget) -> InterpResult<()> {
        let value = evaluate(&self.env, value)?;
        match target {
            AssignTarget::Var(name) => self
                .env
                .assign(&name.node, value)
                .map_err(|e| e.at(name.span)),
            AssignTarget::Element { name, index } => {
                let index_value = evaluate(&self.env, index)?;
                self.env
                    .assign_list_element(&name.node, &value, &index_value)
                    .map_err(|e| e.at(name.span.merge(index.span)))
            }
        }
    }

    /// Block until a non-blank line arrives, evaluate it as an expression and
    /// store the result in `name`
    fn read_into(&mut self, prompt: &str, name: &Spanned<String>) -> InterpResult<()> {
        let line = loop {
            let line = self
                .console
                .read_line(prompt)
                .map_err(|e| RuntimeError::io_error(&e.to_string()).at(name.span))?;
            match line {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
                None => {
                    return Err(RuntimeError::io_error(&format!(
                        "input closed while waiting for {}",
                        name.node
                    ))
                    .at(name.span));
                }
            }
        };
        tracing::debug!(variable = %name.node, input = %line, "read input");

        let expr = parse_expression(&line)
            .map_err(|e| RuntimeError::invalid_input(&line, e.message()).at(name.span))?;
        // Spans inside `expr` point into the typed line, not the program
        let value = evaluate(&self.env, &expr).map_err(|e| e.relocated(name.span))?;
        self.env
            .assign(&name.node, value)
            .map_err(|e| e.at(name.span))
    }

    fn count_step(&mut self, span: Span) -> InterpResult<()> {
        self.steps += 1;
        match self.config.step_limit {
            Some(limit) if self.steps > limit => {
                Err(RuntimeError::step_limit_exceeded(limit).at(span))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::{ErrorKind, ScriptedConsole};
    use crate::parser::parse_source;

    fn interpreter(input: &[&str]) -> Interpreter<ScriptedConsole> {
        Interpreter::new(ScriptedConsole::new(input.iter().copied()))
    }

    fn run(source: &str, input: &[&str]) -> (InterpResult<()>, Interpreter<ScriptedConsole>) {
        let program = parse_source("test", source).expect("program should parse");
        let mut interp = interpreter(input);
        let result = interp.run(&program);
        (result, interp)
    }

    fn output(source: &str) -> Vec<String> {
        let (result, interp) = run(source, &[]);
        result.expect("program should run");
        interp.console().output.clone()
    }

    fn num(interp: &Interpreter<ScriptedConsole>, name: &str) -> f64 {
        interp.environment().get(name).unwrap().as_number().unwrap()
    }

    #[test]
    fn test_store_and_disp() {
        let (result, interp) = run("5→A:Disp A", &[]);
        result.unwrap();
        assert_eq!(num(&interp, "A"), 5.0);
        assert_eq!(interp.console().output, vec!["5.0"]);
    }

    #[test]
    fn test_disp_each_value_on_its_own_line() {
        assert_eq!(output("Disp 1,2/4,L₁"), vec!["1.0", "0.5", "{1.0}"]);
    }

    #[test]
    fn test_if_else() {
        assert_eq!(output("If 0\nThen\nDisp 1\nElse\nDisp 2\nEnd"), vec!["2.0"]);
        assert_eq!(output("If 3\nThen\nDisp 1\nElse\nDisp 2\nEnd"), vec!["1.0"]);
        assert_eq!(output("If 0:Disp 1\nDisp 9"), vec!["9.0"]);
    }

    #[test]
    fn test_if_condition_must_be_number() {
        let (result, _) = run("If L₁:Disp 1", &[]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_while_loop() {
        let (result, interp) = run("While A<3\nA+1→A\nEnd", &[]);
        result.unwrap();
        assert_eq!(num(&interp, "A"), 3.0);
    }

    #[test]
    fn test_while_condition_checked_only_between_iterations() {
        // The body finishes even after the condition turns false
        assert_eq!(
            output("While A=0\n1→A\nDisp 7\nEnd"),
            vec!["7.0"]
        );
    }

    #[test]
    fn test_for_iterates_with_step() {
        assert_eq!(output("For(A,1,5,2)\nDisp A\nEnd"), vec!["1.0", "3.0", "5.0"]);
    }

    #[test]
    fn test_for_negative_step() {
        assert_eq!(output("For(A,3,1,-1)\nDisp A\nEnd"), vec!["3.0", "2.0", "1.0"]);
    }

    #[test]
    fn test_for_default_step_and_empty_range() {
        assert_eq!(output("For(I,1,3)\nDisp I\nEnd"), vec!["1.0", "2.0", "3.0"]);
        assert!(output("For(I,5,1)\nDisp I\nEnd").is_empty());
    }

    #[test]
    fn test_for_bounds_frozen_at_entry() {
        // Changing N and S inside the body does not change the iteration count
        let source = "5→N:2→S\nFor(A,1,N,S)\nDisp A\n100→N\n-1→S\nEnd";
        assert_eq!(output(source), vec!["1.0", "3.0", "5.0"]);
    }

    #[test]
    fn test_for_body_writes_do_not_steer_counter() {
        let (result, interp) = run("For(A,1,3)\n10→A\nB+1→B\nEnd", &[]);
        result.unwrap();
        assert_eq!(num(&interp, "B"), 3.0);
        assert_eq!(num(&interp, "A"), 10.0);
    }

    #[test]
    fn test_for_zero_step_is_invalid() {
        let (result, interp) = run("For(A,1,5,0)\nDisp A\nEnd", &[]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidStep);
        assert!(err.span.is_some());
        assert!(interp.console().output.is_empty());
    }

    #[test]
    fn test_for_list_variable_is_type_mismatch() {
        let (result, _) = run("For(L₁,1,2)\nEnd", &[]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_goto_escapes_nested_blocks() {
        let source = "While 1\nIf 1\nThen\nGoto X\nDisp 1\nEnd\nDisp 2\nEnd\nLbl X\nDisp 3";
        assert_eq!(output(source), vec!["3.0"]);
    }

    #[test]
    fn test_goto_backwards_loop() {
        let source = "Lbl A\nB+1→B\nIf B<4\nGoto A\nDisp B";
        assert_eq!(output(source), vec!["4.0"]);
    }

    #[test]
    fn test_goto_undefined_label() {
        let (result, interp) = run("Disp 1\nGoto Q\nDisp 2", &[]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedLabel);
        assert_eq!(interp.console().output, vec!["1.0"]);
    }

    #[test]
    fn test_undefined_label_suggests_close_name() {
        let (result, _) = run("Lbl AB\nGoto AC", &[]);
        let err = result.unwrap_err();
        assert!(err.message.contains("did you mean `AB`?"), "{}", err.message);
    }

    #[test]
    fn test_goto_into_block_runs_rest_of_that_chain_then_ends() {
        let source = "Goto IN\nIf 0\nThen\nDisp 1\nLbl IN\nDisp 2\nEnd\nDisp 3";
        assert_eq!(output(source), vec!["2.0"]);
    }

    #[test]
    fn test_stop_halts() {
        assert_eq!(output("Disp 1\nWhile 1\nStop\nEnd\nDisp 2"), vec!["1.0"]);
    }

    #[test]
    fn test_step_limit() {
        let program = parse_source("test", "Lbl A\nGoto A").unwrap();
        let mut interp = Interpreter::with_config(
            ScriptedConsole::default(),
            RunConfig::new().step_limit(Some(50)),
        );
        let err = interp.run(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StepLimitExceeded);
    }

    #[test]
    fn test_prompt_reprompts_until_non_empty() {
        let (result, interp) = run("Prompt A,B", &["", "  ", "2+3", "A*2"]);
        result.unwrap();
        assert_eq!(num(&interp, "A"), 5.0);
        assert_eq!(num(&interp, "B"), 10.0);
        assert_eq!(interp.console().prompts, vec!["A?", "A?", "A?", "B?"]);
    }

    #[test]
    fn test_input_uses_given_or_default_prompt() {
        let (result, interp) = run("Input \"AGE\",A\nInput B", &["30", "{1,2}"]);
        let err = result.unwrap_err();
        // B is a number slot, so storing a list fails
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(num(&interp, "A"), 30.0);
        assert_eq!(interp.console().prompts, vec!["AGE", "?"]);
    }

    #[test]
    fn test_input_into_list_slot() {
        let (result, interp) = run("Input \"DATA\",L₂", &["{4,5}"]);
        result.unwrap();
        assert_eq!(interp.environment().get("L₂").unwrap(), Value::list(vec![4.0, 5.0]));
    }

    #[test]
    fn test_input_closed() {
        let (result, _) = run("Prompt A", &[]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.message.contains("input closed"));
    }

    #[test]
    fn test_invalid_input() {
        let (result, _) = run("Prompt A", &["2+"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::InvalidInput);
    }

    #[test]
    fn test_input_fault_is_reported_at_statement() {
        let (result, _) = run("Disp 0\nPrompt A", &["⌊NOPE"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert_eq!(err.span, Some(Span::new(14, 15)));
    }

    #[test]
    fn test_overly_nested_typed_input_is_invalid() {
        let line = format!("{}1", "-".repeat(200_000));
        let (result, _) = run("Prompt A", &[line.as_str()]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert!(err.message.contains("nesting too deep"));
    }

    #[test]
    fn test_deeply_nested_blocks_run() {
        let source = format!("{}Disp 7\n{}", "If 1\nThen\n".repeat(300), "End\n".repeat(300));
        assert_eq!(output(&source), vec!["7.0"]);
    }

    #[test]
    fn test_store_to_list_element() {
        let (result, interp) = run("1→L₁(2)", &[]);
        result.unwrap();
        assert_eq!(interp.environment().get("L₁").unwrap(), Value::list(vec![1.0, 1.0]));
    }

    #[test]
    fn test_fault_stops_run() {
        let (result, interp) = run("Disp 1\n{1}→A\nDisp 2", &[]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(interp.console().output, vec!["1.0"]);
    }

    #[test]
    fn test_interpret_from_explicit_head() {
        let program = parse_source("test", "Disp 1\nDisp 2\nDisp 3").unwrap();
        let labels = LabelIndex::build(&program);
        let mut interp = interpreter(&[]);
        interp
            .interpret(&program, &labels, Some(Position::new(ChainId::ROOT, 1)))
            .unwrap();
        assert_eq!(interp.console().output, vec!["2.0", "3.0"]);
    }

    #[test]
    fn test_empty_program() {
        assert!(output("").is_empty());
    }
}
