//! Abstract Syntax Tree definitions
//!
//! A program is an arena of statement chains. Chain 0 is the top level; every
//! `If`/`While`/`For` refers to its own sub-chains by [`ChainId`] instead of
//! splicing them into the chain that contains it.

mod expr;
mod span;
mod stmt;

pub use expr::*;
pub use span::*;
pub use stmt::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a chain inside [`Program::chains`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub usize);

impl ChainId {
    pub const ROOT: ChainId = ChainId(0);
}

/// A single statement's location: which chain, and where in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub chain: ChainId,
    pub index: usize,
}

impl Position {
    pub fn new(chain: ChainId, index: usize) -> Self {
        Self { chain, index }
    }
}

/// Statements in textual order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub stmts: Vec<Spanned<Stmt>>,
}

/// A parsed program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub chains: Vec<Chain>,
}

impl Program {
    /// Program with an empty top-level chain
    pub fn new() -> Self {
        Program {
            chains: vec![Chain::default()],
        }
    }

    /// Reserve a new empty chain and return its id
    pub fn add_chain(&mut self) -> ChainId {
        self.chains.push(Chain::default());
        ChainId(self.chains.len() - 1)
    }

    pub fn chain(&self, id: ChainId) -> &[Spanned<Stmt>] {
        self.chains
            .get(id.0)
            .map(|c| c.stmts.as_slice())
            .unwrap_or(&[])
    }

    pub fn chain_mut(&mut self, id: ChainId) -> Option<&mut Chain> {
        self.chains.get_mut(id.0)
    }

    pub fn stmt(&self, pos: Position) -> Option<&Spanned<Stmt>> {
        self.chain(pos.chain).get(pos.index)
    }

    /// First statement of the top-level chain
    pub fn head(&self) -> Option<Position> {
        self.first_of(ChainId::ROOT)
    }

    pub fn first_of(&self, chain: ChainId) -> Option<Position> {
        (!self.chain(chain).is_empty()).then(|| Position::new(chain, 0))
    }

    /// Statement after `pos` in the same chain; `None` at the chain's end
    pub fn next(&self, pos: Position) -> Option<Position> {
        let next = Position::new(pos.chain, pos.index + 1);
        self.stmt(next).map(|_| next)
    }

    /// Total statement count across all chains
    pub fn len(&self) -> usize {
        self.chains.iter().map(|c| c.stmts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// Label name → position of its `Lbl` statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelIndex {
    targets: HashMap<String, Position>,
}

impl LabelIndex {
    /// Scan the top-level chain and every nested chain in textual order.
    /// When a label is defined twice, the first definition wins.
    pub fn build(program: &Program) -> Self {
        let mut index = LabelIndex::default();
        index.scan(program, ChainId::ROOT);
        index
    }

    fn scan(&mut self, program: &Program, chain: ChainId) {
        for (i, stmt) in program.chain(chain).iter().enumerate() {
            match &stmt.node {
                Stmt::Label(name) => {
                    self.targets
                        .entry(name.clone())
                        .or_insert(Position::new(chain, i));
                }
                Stmt::If {
                    then_chain,
                    else_chain,
                    ..
                } => {
                    self.scan(program, *then_chain);
                    if let Some(else_chain) = else_chain {
                        self.scan(program, *else_chain);
                    }
                }
                Stmt::While { body, .. } | Stmt::For { body, .. } => self.scan(program, *body),
                _ => {}
            }
        }
    }

    pub fn resolve(&self, label: &str) -> Option<Position> {
        self.targets.get(label).copied()
    }

    /// Label names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
