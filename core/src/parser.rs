use std::sync::Arc;

use thiserror::Error;

use crate::{lr::StateId, ProductionId};

pub mod traits {
    use crate::{
        trace::{NullObserver, StepObserver},
        ParseOutcome, Trace,
    };

    pub trait Parser {
        /// Parse the input, every recorded step being reported to the observer.
        fn run_observed<S: AsRef<str>>(
            &self,
            input: &[S],
            observer: &mut dyn StepObserver,
        ) -> (ParseOutcome, Trace);

        /// Parse the input.
        fn run<S: AsRef<str>>(&self, input: &[S]) -> (ParseOutcome, Trace) {
            self.run_observed(input, &mut NullObserver)
        }
    }
}

/// Why a run rejected its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("terminal mismatch, expecting {expected}, got {found}")]
    TerminalMismatch { expected: Arc<str>, found: Arc<str> },

    #[error("no production for ({nonterminal}, {lookahead})")]
    NoProduction {
        nonterminal: Arc<str>,
        lookahead: Arc<str>,
    },

    #[error("no action for ({state}, {lookahead})")]
    NoAction { state: StateId, lookahead: Arc<str> },

    #[error("table error action for ({state}, {lookahead})")]
    ErrorAction { state: StateId, lookahead: Arc<str> },

    #[error("table consistency fault, no goto for ({state}, {nonterminal})")]
    MissingGoto {
        state: StateId,
        nonterminal: Arc<str>,
    },

    #[error("table consistency fault, unknown production {0}")]
    MissingProduction(ProductionId),

    #[error("table consistency fault, the parse stack underflowed")]
    StackUnderflow,

    #[error("step limit exceeded ({limit} steps)")]
    StepLimitExceeded { limit: usize },
}

impl RejectReason {
    /// The table is inconsistent, the input is not to blame.
    pub fn is_table_fault(&self) -> bool {
        matches!(
            self,
            Self::MissingGoto { .. } | Self::MissingProduction(_) | Self::StackUnderflow
        )
    }
}

/// The result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Accepted,
    Rejected {
        reason: RejectReason,
        /// Index of the rejecting step.
        step: usize,
    },
}

impl ParseOutcome {
    pub fn rejected(reason: RejectReason, step: usize) -> Self {
        Self::Rejected { reason, step }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected { reason, .. } => Some(reason),
        }
    }

    pub fn step(&self) -> Option<usize> {
        match self {
            Self::Accepted => None,
            Self::Rejected { step, .. } => Some(*step),
        }
    }
}

impl std::fmt::Display for ParseOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected { reason, step } => write!(f, "rejected at step {}: {}", step, reason),
        }
    }
}

/// The maximum number of steps of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepLimit {
    /// `(input length + 1) * (steps per token + 1)`, saturating.
    #[default]
    Derived,
    Fixed(usize),
}

impl StepLimit {
    /// The ceiling for an input of `input_len` tokens, the end-of-input marker included.
    pub fn resolve(self, input_len: usize, steps_per_token: usize) -> usize {
        match self {
            Self::Derived => input_len.saturating_add(1).saturating_mul(steps_per_token.saturating_add(1)),
            Self::Fixed(limit) => limit,
        }
    }
}

/// Configuration for the parsers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserConfig {
    pub step_limit: StepLimit,
}

impl ParserConfig {
    pub fn with_step_limit(mut self, step_limit: StepLimit) -> Self {
        self.step_limit = step_limit;
        self
    }
}
