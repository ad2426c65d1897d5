use crate::{
    input::TokenStream,
    parser::{traits::Parser, ParseOutcome, ParserConfig, RejectReason},
    stack::SymbolStack,
    trace::{StepAction, StepObserver, TableEntry, Trace, TraceRecorder},
};

mod table;

pub use table::*;

/// A top-down predictive parser driven by an LL(1) table.
pub struct LlParser<'table> {
    table: &'table LlTable,
    config: ParserConfig,
}

impl<'table> LlParser<'table> {
    pub fn new(table: &'table LlTable) -> Self {
        Self {
            table,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }
}

impl Parser for LlParser<'_> {
    fn run_observed<S: AsRef<str>>(
        &self,
        input: &[S],
        observer: &mut dyn StepObserver,
    ) -> (ParseOutcome, Trace) {
        let mut tokens = TokenStream::new(self.table.symbols(), input);
        let limit = self.config.step_limit.resolve(tokens.len(), self.table.steps_per_token());
        let mut recorder = TraceRecorder::new(observer);

        let mut stack = SymbolStack::default();
        stack.push(self.table.eos().clone());
        stack.push(self.table.start().clone());

        let outcome = loop {
            if recorder.len() >= limit {
                break ParseOutcome::rejected(RejectReason::StepLimitExceeded { limit }, recorder.len());
            }

            let snapshot = stack.snapshot();
            let remaining = tokens.remaining();
            let lookahead = tokens.lookahead();
            let mut entries = Vec::default();

            let action = match stack.top() {
                // The end-of-input marker is never popped.
                None => StepAction::Reject(RejectReason::StackUnderflow),

                Some(top) if top.is_eos() && lookahead.symbol.as_ref() == Some(top) => StepAction::Accept,

                // Pop, match and read a terminal if we expect one
                Some(top) if top.is_terminal() => {
                    if lookahead.symbol.as_ref() == Some(top) {
                        StepAction::Match(top.clone())
                    } else {
                        StepAction::Reject(RejectReason::TerminalMismatch {
                            expected: top.shared_name(),
                            found: lookahead.name.clone(),
                        })
                    }
                }

                // Otherwise expand the nonterminal by the predicted production
                Some(top) => {
                    let production = lookahead
                        .symbol
                        .as_ref()
                        .and_then(|sym| self.table.predict(top, sym));

                    entries.push(TableEntry::Predict {
                        nonterminal: top.clone(),
                        lookahead: lookahead.name.clone(),
                        production: production.map(|p| p.id),
                    });

                    match production {
                        Some(production) => StepAction::Expand(production.clone()),
                        None => StepAction::Reject(RejectReason::NoProduction {
                            nonterminal: top.shared_name(),
                            lookahead: lookahead.name.clone(),
                        }),
                    }
                }
            };

            match &action {
                StepAction::Match(_) => {
                    stack.pop();
                    tokens.advance();
                }
                // Push the body in reverse order, so that its first symbol
                // comes off the stack first. An ε-production pushes nothing.
                StepAction::Expand(production) => {
                    stack.pop();
                    stack.push_reversed(&production.rhs);
                }
                _ => {}
            }

            if let Some(outcome) = recorder.record(snapshot, remaining, action, entries).outcome() {
                break outcome;
            }
        };

        (outcome, recorder.finish())
    }
}

/// Parse the input against the table, with the default configuration.
pub fn run<S: AsRef<str>>(table: &LlTable, input: &[S]) -> (ParseOutcome, Trace) {
    LlParser::new(table).run(input)
}
