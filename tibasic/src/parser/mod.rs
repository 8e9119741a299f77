//! Recursive-descent parser
//!
//! Builds the chain arena of a [`Program`]. Block statements (`If`/`While`/`For(`)
//! get their own chains, terminated by `End`. A closing `)` or `}` may be left off
//! at the end of a statement, as on the calculator.

use crate::ast::{
    AssignTarget, BinOp, ChainId, Expr, LogicOp, Program, Span, Spanned, Stmt, UnOp,
};
use crate::error::{Result, SourceError};
use crate::lexer::{Token, tokenize};

#[cfg(test)]
mod tests;

/// Stack growth parameters for deeply nested expressions and blocks
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Deepest nesting of blocks and subexpressions a program may use
pub const MAX_NESTING: usize = 1000;

/// Parse tokens into a program
pub fn parse(_filename: &str, source: &str, tokens: Vec<(Token, Span)>) -> Result<Program> {
    let mut parser = Parser::new(source, tokens);
    parser.parse_chain(ChainId::ROOT)?;
    if let Some((token, span)) = parser.tokens.get(parser.pos) {
        return Err(SourceError::parser(
            format!("{} without a matching block", token.describe()),
            *span,
        ));
    }
    Ok(parser.program)
}

/// Tokenize and parse a whole program
pub fn parse_source(filename: &str, source: &str) -> Result<Program> {
    let tokens = tokenize(source)?;
    tracing::trace!(file = filename, tokens = tokens.len(), "tokenized");
    let program = parse(filename, source, tokens)?;
    tracing::debug!(
        file = filename,
        statements = program.len(),
        chains = program.chains.len(),
        "parsed"
    );
    Ok(program)
}

/// True when `err` only says a block was left open, so more lines may complete it
pub fn is_incomplete(err: &SourceError) -> bool {
    matches!(err, SourceError::Incomplete { .. })
}

/// Parse a single expression, as typed at a `Prompt` or `Input`
pub fn parse_expression(source: &str) -> Result<Spanned<Expr>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(source, tokens);
    let expr = parser.parse_expr()?;
    if let Some((token, span)) = parser.tokens.get(parser.pos) {
        return Err(SourceError::parser(
            format!("unexpected {} after expression", token.describe()),
            *span,
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    eof: Span,
    program: Program,
    /// Current height of the tree being built, in blocks and expression nodes
    depth: usize,
}

impl Parser {
    fn new(source: &str, tokens: Vec<(Token, Span)>) -> Self {
        Parser {
            tokens,
            pos: 0,
            eof: Span::new(source.len(), source.len()),
            program: Program::new(),
            depth: 0,
        }
    }

    // ---- nesting ----

    fn nest(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(SourceError::parser(
                format!("nesting too deep (more than {MAX_NESTING} levels)"),
                self.peek_span(),
            ));
        }
        Ok(())
    }

    /// Run `f` one level deeper, on a grown stack if needed
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let outer = self.depth;
        self.nest()?;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || f(self));
        self.depth = outer;
        result
    }

    // ---- token cursor ----

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Span {
        self.tokens.get(self.pos).map(|(_, s)| *s).unwrap_or(self.eof)
    }

    fn prev_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(_, s)| *s)
            .unwrap_or(self.eof)
    }

    fn advance(&mut self) -> Option<(Token, Span)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<Span> {
        if self.eat(token) {
            Ok(self.prev_span())
        } else {
            Err(self.unexpected(&token.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> SourceError {
        let found = self
            .peek()
            .map(Token::describe)
            .unwrap_or_else(|| "end of input".to_string());
        SourceError::parser(format!("expected {expected}, found {found}"), self.peek_span())
    }

    fn at_statement_end(&self) -> bool {
        matches!(self.peek(), None | Some(Token::Eol))
    }

    fn skip_separators(&mut self) {
        while self.eat(&Token::Eol) {}
    }

    /// Closing delimiter, optional when the statement ends right here
    fn close(&mut self, token: &Token) -> Result<()> {
        if self.eat(token) || self.at_statement_end() {
            Ok(())
        } else {
            Err(self.unexpected(&token.describe()))
        }
    }

    // ---- statements ----

    /// Parse statements into `chain` until `End`, `Else` or end of input
    fn parse_chain(&mut self, chain: ChainId) -> Result<()> {
        loop {
            self.skip_separators();
            if matches!(self.peek(), None | Some(Token::End) | Some(Token::Else)) {
                return Ok(());
            }
            let stmt = self.parse_statement()?;
            if !self.at_statement_end() {
                return Err(self.unexpected("end of statement"));
            }
            self.push(chain, stmt);
        }
    }

    fn push(&mut self, chain: ChainId, stmt: Spanned<Stmt>) {
        if let Some(chain) = self.program.chain_mut(chain) {
            chain.stmts.push(stmt);
        }
    }

    fn parse_block_end(&mut self, opener: &str, opened_at: Span) -> Result<()> {
        if self.eat(&Token::End) {
            Ok(())
        } else if self.peek().is_some() {
            Err(self.unexpected("`End`"))
        } else {
            Err(SourceError::incomplete(
                format!("`{opener}` block is missing its `End`"),
                opened_at,
            ))
        }
    }

    fn parse_statement(&mut self) -> Result<Spanned<Stmt>> {
        let start = self.peek_span();
        let node = match self.peek() {
            Some(Token::Disp) => {
                self.advance();
                let mut exprs = Vec::new();
                if !self.at_statement_end() {
                    exprs.push(self.parse_expr()?);
                    while self.eat(&Token::Comma) {
                        exprs.push(self.parse_expr()?);
                    }
                }
                Stmt::Disp(exprs)
            }
            Some(Token::Prompt) => {
                self.advance();
                let mut names = vec![self.parse_variable()?];
                while self.eat(&Token::Comma) {
                    names.push(self.parse_variable()?);
                }
                Stmt::Prompt(names)
            }
            Some(Token::Input) => {
                self.advance();
                let prompt = match self.peek() {
                    Some(Token::Str(text)) => {
                        let text = text.clone();
                        self.advance();
                        self.expect(&Token::Comma)?;
                        Some(text)
                    }
                    _ => None,
                };
                let name = self.parse_variable()?;
                Stmt::Input { prompt, name }
            }
            Some(Token::If) => return self.parse_if(start),
            Some(Token::While) => {
                self.advance();
                let cond = self.parse_expr()?;
                let header = start.merge(self.prev_span());
                let body = self.program.add_chain();
                self.nested(|p| p.parse_chain(body))?;
                self.parse_block_end("While", header)?;
                return Ok(Spanned::new(Stmt::While { cond, body }, header));
            }
            Some(Token::For) => return self.parse_for(start),
            Some(Token::Lbl(name)) => {
                let name = name.clone();
                self.advance();
                Stmt::Label(name)
            }
            Some(Token::Goto(name)) => {
                let name = name.clone();
                self.advance();
                Stmt::Goto(name)
            }
            Some(Token::Stop) => {
                self.advance();
                Stmt::Stop
            }
            Some(Token::Then) => {
                return Err(SourceError::parser("`Then` without `If`", start));
            }
            _ => {
                let value = self.parse_expr()?;
                if self.eat(&Token::Store) {
                    let target = self.parse_target()?;
                    Stmt::Assign { value, target }
                } else {
                    Stmt::Expr(value)
                }
            }
        };
        Ok(Spanned::new(node, start.merge(self.prev_span())))
    }

    fn parse_if(&mut self, start: Span) -> Result<Spanned<Stmt>> {
        self.advance();
        let cond = self.parse_expr()?;
        let header = start.merge(self.prev_span());
        self.skip_separators();

        let then_chain = self.program.add_chain();
        let mut else_chain = None;
        if self.eat(&Token::Then) {
            self.nested(|p| p.parse_chain(then_chain))?;
            if self.eat(&Token::Else) {
                let chain = self.program.add_chain();
                self.nested(|p| p.parse_chain(chain))?;
                else_chain = Some(chain);
            }
            self.parse_block_end("If", header)?;
        } else {
            // Without `Then`, the next statement alone is conditional
            if matches!(self.peek(), None | Some(Token::End | Token::Else)) {
                return Err(self.unexpected("a statement after `If`"));
            }
            let stmt = self.nested(Self::parse_statement)?;
            self.push(then_chain, stmt);
        }

        Ok(Spanned::new(
            Stmt::If {
                cond,
                then_chain,
                else_chain,
            },
            header,
        ))
    }

    fn parse_for(&mut self, start: Span) -> Result<Spanned<Stmt>> {
        self.advance();
        let var = self.parse_variable()?;
        self.expect(&Token::Comma)?;
        let begin = self.parse_expr()?;
        self.expect(&Token::Comma)?;
        let end = self.parse_expr()?;
        let step = if self.eat(&Token::Comma) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.close(&Token::RParen)?;
        let header = start.merge(self.prev_span());

        let body = self.program.add_chain();
        self.nested(|p| p.parse_chain(body))?;
        self.parse_block_end("For(", header)?;

        Ok(Spanned::new(
            Stmt::For {
                var,
                start: begin,
                end,
                step,
                body,
            },
            header,
        ))
    }

    fn parse_variable(&mut self) -> Result<Spanned<String>> {
        match self.peek() {
            Some(Token::Var(name) | Token::ListVar(name) | Token::CustomList(name)) => {
                let name = name.clone();
                self.advance();
                Ok(Spanned::new(name, self.prev_span()))
            }
            _ => Err(self.unexpected("a variable")),
        }
    }

    fn parse_target(&mut self) -> Result<AssignTarget> {
        let indexable = matches!(self.peek(), Some(Token::ListVar(_) | Token::CustomList(_)));
        let name = self.parse_variable()?;
        if indexable && self.eat(&Token::LParen) {
            let index = self.parse_expr()?;
            self.close(&Token::RParen)?;
            Ok(AssignTarget::Element { name, index })
        } else {
            Ok(AssignTarget::Var(name))
        }
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> Result<Spanned<Expr>> {
        self.nested(Self::parse_or)
    }

    // Binary levels count each node they add, since chains like `1+1+1` nest to the left

    fn parse_or(&mut self) -> Result<Spanned<Expr>> {
        let outer = self.depth;
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            self.nest()?;
            let right = self.parse_and()?;
            left = logical(left, LogicOp::Or, right);
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Spanned<Expr>> {
        let outer = self.depth;
        let mut left = self.parse_comparison()?;
        while self.eat(&Token::And) {
            self.nest()?;
            let right = self.parse_comparison()?;
            left = logical(left, LogicOp::And, right);
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Spanned<Expr>> {
        let outer = self.depth;
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Eq) => BinOp::Eq,
                Some(Token::Ne) => BinOp::Ne,
                Some(Token::Lt) => BinOp::Lt,
                Some(Token::Le) => BinOp::Le,
                Some(Token::Gt) => BinOp::Gt,
                Some(Token::Ge) => BinOp::Ge,
                _ => break,
            };
            self.advance();
            self.nest()?;
            let right = self.parse_additive()?;
            left = binary(left, op, right);
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Spanned<Expr>> {
        let outer = self.depth;
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            self.nest()?;
            let right = self.parse_multiplicative()?;
            left = binary(left, op, right);
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Spanned<Expr>> {
        let outer = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            self.nest()?;
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        self.depth = outer;
        Ok(left)
    }

    /// Negation binds looser than `^`: `-2^2` is `-(2^2)`
    fn parse_unary(&mut self) -> Result<Spanned<Expr>> {
        match self.unary_op() {
            Some(op) => {
                let start = self.peek_span();
                self.advance();
                let operand = self.nested(Self::parse_unary)?;
                Ok(unary(op, start, operand))
            }
            None => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Spanned<Expr>> {
        let outer = self.depth;
        let mut base = self.parse_primary()?;
        while self.eat(&Token::Caret) {
            self.nest()?;
            let exponent = self.parse_exponent()?;
            base = binary(base, BinOp::Pow, exponent);
        }
        self.depth = outer;
        Ok(base)
    }

    /// Exponent operand: a primary, optionally signed (`2^-1`)
    fn parse_exponent(&mut self) -> Result<Spanned<Expr>> {
        match self.unary_op() {
            Some(op) => {
                let start = self.peek_span();
                self.advance();
                let operand = self.nested(Self::parse_exponent)?;
                Ok(unary(op, start, operand))
            }
            None => self.parse_primary(),
        }
    }

    fn unary_op(&self) -> Option<UnOp> {
        match self.peek() {
            Some(Token::Plus) => Some(UnOp::Plus),
            Some(Token::Minus) => Some(UnOp::Neg),
            _ => None,
        }
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>> {
        let start = self.peek_span();
        match self.peek().cloned() {
            Some(Token::Number(n)) => {
                self.advance();
                Ok(Spanned::new(Expr::Literal(n), start))
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.close(&Token::RParen)?;
                Ok(Spanned::new(
                    Expr::Grouping(Box::new(inner)),
                    start.merge(self.prev_span()),
                ))
            }
            Some(Token::LBrace) => {
                self.advance();
                let mut items = vec![self.parse_expr()?];
                while self.eat(&Token::Comma) {
                    items.push(self.parse_expr()?);
                }
                self.close(&Token::RBrace)?;
                Ok(Spanned::new(Expr::List(items), start.merge(self.prev_span())))
            }
            Some(Token::Var(name)) => {
                self.advance();
                Ok(Spanned::new(Expr::Var(name), start))
            }
            Some(Token::ListVar(name) | Token::CustomList(name)) => {
                self.advance();
                if self.eat(&Token::LParen) {
                    let index = self.parse_expr()?;
                    self.close(&Token::RParen)?;
                    Ok(Spanned::new(
                        Expr::Element {
                            name,
                            index: Box::new(index),
                        },
                        start.merge(self.prev_span()),
                    ))
                } else {
                    Ok(Spanned::new(Expr::Var(name), start))
                }
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}

fn binary(left: Spanned<Expr>, op: BinOp, right: Spanned<Expr>) -> Spanned<Expr> {
    let span = left.span.merge(right.span);
    Spanned::new(
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn logical(left: Spanned<Expr>, op: LogicOp, right: Spanned<Expr>) -> Spanned<Expr> {
    let span = left.span.merge(right.span);
    Spanned::new(
        Expr::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn unary(op: UnOp, start: Span, operand: Spanned<Expr>) -> Spanned<Expr> {
    let span = start.merge(operand.span);
    Spanned::new(
        Expr::Unary {
            op,
            expr: Box::new(operand),
        },
        span,
    )
}
