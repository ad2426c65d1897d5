use thiserror::Error;

use crate::{lr::Action, ProductionId, StateId};

/// The kind of invariant a table definition violates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("a terminal with the same identifier already exists {0}")]
    DuplicatedSymbol(String),

    #[error("symbol {0} is used both as a terminal and as a production head")]
    SymbolKindClash(String),

    #[error("the start symbol {0} is not the head of any production")]
    InvalidStart(String),

    #[error("symbol {symbol} is neither a terminal nor a nonterminal with table entries")]
    DanglingSymbol { symbol: String },

    #[error("unknown nonterminal {0}")]
    UnknownRow(String),

    #[error("unknown symbol {0}")]
    UnknownColumn(String),

    #[error("unknown production {0}")]
    UnknownProduction(ProductionId),

    #[error("production {production} does not derive from {nonterminal}")]
    ProductionMismatch {
        nonterminal: String,
        production: ProductionId,
    },

    #[error("conflicting entries {0} and {1}")]
    ConflictingCell(String, String),

    #[error("the table has no state")]
    EmptyTable,

    #[error("state ids are not contiguous, state {missing} is missing")]
    NonContiguousStates { missing: StateId },

    #[error("{action} targets state {target} which does not exist")]
    InvalidTarget { action: String, target: StateId },

    #[error("action {0} is keyed by a nonterminal")]
    ActionOnNonTerminal(Action),

    #[error("goto is keyed by a terminal")]
    GotoOnTerminal,

    #[error("accept is only allowed on the end-of-input marker")]
    AcceptOnNonEos,

    #[error("states {first} and {second} both yield accept")]
    MultipleAcceptStates { first: StateId, second: StateId },

    #[error("no state yields accept")]
    MissingAccept,
}

/// The table cell an error points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// A nonterminal, a state, or a production head.
    pub row: String,
    /// A terminal, a symbol, or a production's right-hand side symbol.
    pub column: String,
}

impl Cell {
    pub fn new(row: impl ToString, column: impl ToString) -> Self {
        Self {
            row: row.to_string(),
            column: column.to_string(),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Kind of error
    kind: ErrorKind,
    /// Location of the error in the table.
    cell: Option<Cell>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.cell {
            Some(cell) => write!(f, "invalid table at {}: {}", cell, self.kind),
            None => write!(f, "invalid table: {}", self.kind),
        }
    }
}

impl ValidationError {
    pub fn new(kind: impl Into<ErrorKind>, cell: Option<Cell>) -> Self {
        Self {
            kind: kind.into(),
            cell,
        }
    }

    pub fn at(kind: impl Into<ErrorKind>, row: impl ToString, column: impl ToString) -> Self {
        Self::new(kind, Some(Cell::new(row, column)))
    }
}

impl From<ErrorKind> for ValidationError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, cell: None }
    }
}

impl ValidationError {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn cell(&self) -> Option<&Cell> {
        self.cell.as_ref()
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
