//! Per-step records of a run.
//!
//! Both parsers append one [TraceStep] per step to a [TraceRecorder], the
//! snapshot being taken before the step's action is applied. Once the run
//! terminates, the recorder is frozen into a read-only [Trace].
use prettytable::Table as PtTable;
use std::sync::Arc;

use itertools::Itertools;

use crate::{
    lr::{Action, StateId},
    parser::{ParseOutcome, RejectReason},
    stack::StackSnapshot,
    Production, ProductionId, Symbol,
};

/// What a step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Replace the nonterminal on top of the stack by the production's right-hand side.
    Expand(Arc<Production>),
    /// Pop the terminal on top of the stack and consume the lookahead.
    Match(Symbol),
    /// Push the lookahead and the next state.
    Shift { symbol: Symbol, state: StateId },
    /// Pop the production's right-hand side, push its head and the goto state.
    Reduce {
        production: Arc<Production>,
        goto: StateId,
    },
    Accept,
    Reject(RejectReason),
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expand(production) => write!(f, "expand {}", production),
            Self::Match(symbol) => write!(f, "match {}", symbol),
            Self::Shift { symbol, state } => write!(f, "shift {} to state {}", symbol, state),
            Self::Reduce { production, goto } => {
                write!(f, "reduce by {}, goto {}", production, goto)
            }
            Self::Accept => write!(f, "accept"),
            Self::Reject(reason) => write!(f, "reject: {}", reason),
        }
    }
}

/// A table cell consulted by a step, absent entries included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEntry {
    Predict {
        nonterminal: Symbol,
        lookahead: Arc<str>,
        production: Option<ProductionId>,
    },
    Action {
        state: StateId,
        lookahead: Arc<str>,
        action: Option<Action>,
    },
    Goto {
        state: StateId,
        nonterminal: Symbol,
        target: Option<StateId>,
    },
}

impl std::fmt::Display for TableEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Predict {
                nonterminal,
                lookahead,
                production,
            } => write!(f, "M[{}, {}] = {}", nonterminal, lookahead, or_dash(production)),
            Self::Action {
                state,
                lookahead,
                action,
            } => write!(f, "ACTION[{}, {}] = {}", state, lookahead, or_dash(action)),
            Self::Goto {
                state,
                nonterminal,
                target,
            } => write!(f, "GOTO[{}, {}] = {}", state, nonterminal, or_dash(target)),
        }
    }
}

fn or_dash<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub index: usize,
    /// The stack before the action, bottom first.
    pub stack: StackSnapshot,
    /// The input left before the action, the lookahead first.
    pub input: Vec<Arc<str>>,
    pub action: StepAction,
    pub entries: Vec<TableEntry>,
}

impl TraceStep {
    /// The outcome of the run if the step terminates it.
    pub fn outcome(&self) -> Option<ParseOutcome> {
        match &self.action {
            StepAction::Accept => Some(ParseOutcome::Accepted),
            StepAction::Reject(reason) => Some(ParseOutcome::rejected(reason.clone(), self.index)),
            _ => None,
        }
    }
}

/// Receives the steps of a run as they are recorded.
pub trait StepObserver {
    fn on_step(&mut self, step: &TraceStep);
}

/// Ignores every step.
pub struct NullObserver;

impl StepObserver for NullObserver {
    fn on_step(&mut self, _step: &TraceStep) {}
}

/// Prints every step on the standard output.
pub struct PrintObserver;

impl StepObserver for PrintObserver {
    fn on_step(&mut self, step: &TraceStep) {
        println!("#{} {} :: {}", step.index, step.stack, step.action);
    }
}

/// Accumulates the steps of a single run.
pub struct TraceRecorder<'o> {
    steps: Vec<TraceStep>,
    observer: &'o mut dyn StepObserver,
}

impl<'o> TraceRecorder<'o> {
    pub(crate) fn new(observer: &'o mut dyn StepObserver) -> Self {
        Self {
            steps: Vec::default(),
            observer,
        }
    }

    /// Append a step, returns it.
    pub(crate) fn record(
        &mut self,
        stack: StackSnapshot,
        input: Vec<Arc<str>>,
        action: StepAction,
        entries: Vec<TableEntry>,
    ) -> &TraceStep {
        self.steps.push(TraceStep {
            index: self.steps.len(),
            stack,
            input,
            action,
            entries,
        });

        let step = &self.steps[self.steps.len() - 1];
        self.observer.on_step(step);
        step
    }

    /// The number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn finish(self) -> Trace {
        Trace { steps: self.steps }
    }
}

/// The ordered, read-only log of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceStep> {
        self.steps.iter()
    }

    pub fn get(&self, index: usize) -> Option<&TraceStep> {
        self.steps.get(index)
    }

    pub fn last(&self) -> Option<&TraceStep> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over the actions, in order.
    pub fn iter_actions(&self) -> impl Iterator<Item = &StepAction> {
        self.iter().map(|step| &step.action)
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceStep;
    type IntoIter = std::slice::Iter<'a, TraceStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl std::fmt::Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();

        table.add_row(["NO", "STACK", "INPUT", "ACTION"].into_iter().collect());

        for step in self.iter() {
            table.add_row(
                [
                    step.index.to_string(),
                    step.stack.to_string(),
                    step.input.iter().join(" "),
                    step.action.to_string(),
                ]
                .into_iter()
                .collect(),
            );
        }

        write!(f, "{}", table)
    }
}
