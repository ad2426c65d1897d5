use crate::{
    input::TokenStream,
    parser::{traits::Parser, ParseOutcome, ParserConfig, RejectReason},
    stack::StateStack,
    trace::{StepAction, StepObserver, TableEntry, Trace, TraceRecorder},
    ProductionId,
};

mod action;
mod table;

pub use action::*;
pub use table::*;

pub type StateId = usize;

/// A bottom-up shift-reduce parser driven by an LR(1) table.
///
/// The run always starts in state 0.
pub struct LrParser<'table> {
    table: &'table LrTable,
    config: ParserConfig,
}

impl<'table> LrParser<'table> {
    pub fn new(table: &'table LrTable) -> Self {
        Self {
            table,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Compute the reduction of the stack by the production, without applying it.
    fn reduce(&self, stack: &StateStack, production_id: ProductionId, entries: &mut Vec<TableEntry>) -> StepAction {
        let Some(production) = self.table.grammar().production(production_id) else {
            return StepAction::Reject(RejectReason::MissingProduction(production_id));
        };

        let Some(uncovered) = stack.peek_below(production.rhs.len()) else {
            return StepAction::Reject(RejectReason::StackUnderflow);
        };

        let goto = self.table.goto(uncovered, &production.lhs);

        entries.push(TableEntry::Goto {
            state: uncovered,
            nonterminal: production.lhs.clone(),
            target: goto,
        });

        match goto {
            Some(goto) => StepAction::Reduce {
                production: production.clone(),
                goto,
            },
            None => StepAction::Reject(RejectReason::MissingGoto {
                state: uncovered,
                nonterminal: production.lhs.shared_name(),
            }),
        }
    }
}

impl Parser for LrParser<'_> {
    fn run_observed<S: AsRef<str>>(
        &self,
        input: &[S],
        observer: &mut dyn StepObserver,
    ) -> (ParseOutcome, Trace) {
        let mut tokens = TokenStream::new(self.table.symbols(), input);
        let limit = self.config.step_limit.resolve(tokens.len(), self.table.steps_per_token());
        let mut recorder = TraceRecorder::new(observer);

        let mut stack = StateStack::new(0);

        let outcome = loop {
            if recorder.len() >= limit {
                break ParseOutcome::rejected(RejectReason::StepLimitExceeded { limit }, recorder.len());
            }

            let snapshot = stack.snapshot();
            let remaining = tokens.remaining();
            let lookahead = tokens.lookahead();
            let mut entries = Vec::default();

            let action = match stack.top() {
                None => StepAction::Reject(RejectReason::StackUnderflow),
                Some(state) => {
                    let cell = lookahead
                        .symbol
                        .as_ref()
                        .and_then(|sym| self.table.action(state, sym))
                        .copied();

                    entries.push(TableEntry::Action {
                        state,
                        lookahead: lookahead.name.clone(),
                        action: cell,
                    });

                    match (cell, lookahead.symbol.as_ref()) {
                        // Push the lookahead and move to the given state.
                        (Some(Action::Shift(next)), Some(symbol)) => StepAction::Shift {
                            symbol: symbol.clone(),
                            state: next,
                        },

                        // Pop the right-hand side, then goto from the uncovered state.
                        (Some(Action::Reduce(production)), _) => self.reduce(&stack, production, &mut entries),

                        (Some(Action::Accept), _) => StepAction::Accept,

                        (Some(Action::Error), _) => StepAction::Reject(RejectReason::ErrorAction {
                            state,
                            lookahead: lookahead.name.clone(),
                        }),

                        _ => StepAction::Reject(RejectReason::NoAction {
                            state,
                            lookahead: lookahead.name.clone(),
                        }),
                    }
                }
            };

            match &action {
                StepAction::Shift { symbol, state } => {
                    stack.push(symbol.clone(), *state);
                    tokens.advance();
                }
                StepAction::Reduce { production, goto } => {
                    stack.pop(production.rhs.len());
                    stack.push(production.lhs.clone(), *goto);
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
pub fn run<S: AsRef<str>>(table: &LrTable, input: &[S]) -> (ParseOutcome, Trace) {
    LrParser::new(table).run(input)
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::*};

    use crate::{
        fixtures::fixture_lr_def,
        parser::{traits::Parser as _, ParserConfig, RejectReason, StepLimit},
        trace::{PrintObserver, StepAction},
        ParseOutcome,
    };

    use super::{run, Action, LrParser, LrTable, LrTableDef};

    fn fixture_table() -> LrTable {
        LrTable::new(fixture_lr_def()).expect("cannot build table")
    }

    /// n (+ n)*
    fn is_sum(input: &[&str]) -> bool {
        !input.is_empty()
            && input.len() % 2 == 1
            && input
                .iter()
                .enumerate()
                .all(|(i, tok)| *tok == if i % 2 == 0 { "n" } else { "+" })
    }

    #[test]
    fn test_accepts_sum() {
        let table = fixture_table();
        let (outcome, trace) = LrParser::new(&table).run_observed(&["n", "+", "n", "+", "n", "$"], &mut PrintObserver);

        assert_eq!(outcome, ParseOutcome::Accepted);
        assert_eq!(trace.len(), 9);

        let actions: Vec<String> = trace.iter_actions().map(|a| a.to_string()).collect();
        assert_eq!(
            actions,
            vec![
                "shift n to state 2",
                "reduce by E -> n, goto 1",
                "shift + to state 3",
                "shift n to state 4",
                "reduce by E -> E + n, goto 1",
                "shift + to state 3",
                "shift n to state 4",
                "reduce by E -> E + n, goto 1",
                "accept"
            ]
        );

        assert_eq!(
            trace.iter_actions().filter(|a| matches!(a, StepAction::Shift { .. })).count(),
            5
        );

        let reduce = trace.get(4).expect("no step");
        assert_eq!(reduce.stack.to_string(), "0 E 1 + 3 n 4");
        assert_eq!(
            reduce.entries.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec!["ACTION[4, +] = r0", "GOTO[0, E] = 1"]
        );
        assert_eq!(trace.last().expect("no step").stack.to_string(), "0 E 1");
    }

    #[test]
    fn test_rejects_missing_action() {
        let table = fixture_table();

        let (outcome, trace) = run(&table, &["n", "n"]);
        assert_eq!(
            outcome,
            ParseOutcome::rejected(
                RejectReason::NoAction {
                    state: 2,
                    lookahead: "n".into()
                },
                1
            )
        );
        assert_eq!(trace.len(), 2);

        let (outcome, _) = run(&table, &["n", "+"]);
        assert_eq!(
            outcome.reason(),
            Some(&RejectReason::NoAction {
                state: 3,
                lookahead: "$".into()
            })
        );

        let (outcome, _) = run::<&str>(&table, &[]);
        assert_eq!(outcome.step(), Some(0));
    }

    #[test]
    fn test_rejects_unknown_token() {
        let (outcome, trace) = run(&fixture_table(), &["x"]);

        assert_eq!(
            outcome.reason(),
            Some(&RejectReason::NoAction {
                state: 0,
                lookahead: "x".into()
            })
        );
        assert_eq!(trace.get(0).expect("no step").entries[0].to_string(), "ACTION[0, x] = -");
    }

    #[test]
    fn test_error_action() {
        let mut def = fixture_lr_def();
        def.add_action(0, "+", Action::Error);
        let table = LrTable::new(def).expect("cannot build table");

        let (outcome, _) = run(&table, &["+", "n"]);
        assert_eq!(
            outcome,
            ParseOutcome::rejected(
                RejectReason::ErrorAction {
                    state: 0,
                    lookahead: "+".into()
                },
                0
            )
        );
    }

    #[test]
    fn test_missing_goto_is_a_table_fault() {
        let mut def = LrTableDef::default();
        def.add_terminal("n");
        let pid = def.add_production("E", ["n"]);
        def.add_action(0, "n", Action::Shift(1))
            .add_action(1, "$", Action::Reduce(pid))
            .add_action(2, "$", Action::Accept);

        let table = LrTable::new(def).expect("cannot build table");
        let (outcome, trace) = run(&table, &["n"]);

        let reason = outcome.reason().expect("expecting a rejection");
        assert_eq!(
            reason,
            &RejectReason::MissingGoto {
                state: 0,
                nonterminal: "E".into()
            }
        );
        assert!(reason.is_table_fault());
        assert_eq!(trace.last().expect("no step").entries[1].to_string(), "GOTO[0, E] = -");
    }

    #[test]
    fn test_stack_underflow_is_a_table_fault() {
        let mut def = LrTableDef::default();
        def.add_terminal("n");
        let pid = def.add_production("E", ["n", "n"]);
        def.add_action(0, "n", Action::Shift(1))
            .add_action(1, "$", Action::Reduce(pid))
            .add_action(2, "$", Action::Accept)
            .add_goto(0, "E", 2);

        let table = LrTable::new(def).expect("cannot build table");
        let (outcome, _) = run(&table, &["n"]);

        assert_eq!(outcome, ParseOutcome::rejected(RejectReason::StackUnderflow, 1));
        assert!(outcome.reason().is_some_and(|r| r.is_table_fault()));
    }

    #[test]
    fn test_step_limit() {
        // E -> ε, reduced forever in state 0.
        let mut def = LrTableDef::default();
        def.add_terminal("n");
        let pid = def.add_production::<[&str; 0], &str>("E", []);
        def.add_action(0, "n", Action::Reduce(pid))
            .add_goto(0, "E", 0)
            .add_action(1, "$", Action::Accept);

        let table = LrTable::new(def).expect("cannot build table");

        let (outcome, trace) = run(&table, &["n"]);
        assert!(matches!(
            outcome.reason(),
            Some(RejectReason::StepLimitExceeded { .. })
        ));
        assert_eq!(outcome.step(), Some(trace.len()));

        let parser = LrParser::new(&table).with_config(ParserConfig::default().with_step_limit(StepLimit::Fixed(3)));
        let (outcome, trace) = parser.run(&["n"]);
        assert_eq!(
            outcome,
            ParseOutcome::rejected(RejectReason::StepLimitExceeded { limit: 3 }, 3)
        );
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn test_nested_epsilon_reductions_fit_the_derived_limit() {
        // E -> X0 n, Xi -> Xi+1 Xi+1, X6 -> ε.
        const DEPTH: usize = 6;

        let level = |i: usize| format!("X{}", i);
        // After the first child of Xi, then after both.
        let middle = |i: usize| 1 + i;
        let done = |i: usize| 1 + DEPTH + i;
        let (after_head, after_n, accepting) = (1 + 2 * DEPTH, 2 + 2 * DEPTH, 3 + 2 * DEPTH);

        let mut def = LrTableDef::default();
        def.add_terminal("n");

        let sentence = def.add_production("E", [level(0), "n".to_string()]);
        let pairs: Vec<_> = (0..DEPTH)
            .map(|i| def.add_production(&level(i), [level(i + 1), level(i + 1)]))
            .collect();
        let leaf = def.add_production::<[&str; 0], &str>(&level(DEPTH), []);

        def.add_action(0, "n", Action::Reduce(leaf))
            .add_goto(0, &level(0), after_head)
            .add_goto(0, "E", accepting);

        for j in 1..=DEPTH {
            def.add_goto(0, &level(j), middle(j - 1));
        }

        for i in 0..DEPTH {
            def.add_action(middle(i), "n", Action::Reduce(leaf))
                .add_goto(middle(i), &level(i + 1), done(i))
                .add_action(done(i), "n", Action::Reduce(pairs[i]));

            for j in (i + 2)..=DEPTH {
                def.add_goto(middle(i), &level(j), middle(j - 1));
            }
        }

        def.add_action(after_head, "n", Action::Shift(after_n))
            .add_action(after_n, "$", Action::Reduce(sentence))
            .add_action(accepting, "$", Action::Accept);

        let table = LrTable::new(def).expect("cannot build table");
        let (outcome, trace) = run(&table, &["n"]);

        assert_eq!(outcome, ParseOutcome::Accepted);
        // 127 reductions below X0, then shift, reduce and accept.
        assert_eq!(trace.len(), (1 << (DEPTH + 1)) - 1 + 3);
    }

    fn token_strategy() -> impl Strategy<Value = Vec<&'static str>> {
        vec(prop_oneof![Just("n"), Just("+"), Just("x")], 0..12)
    }

    proptest! {
        #[test]
        fn accepts_sums_only(input in token_strategy()) {
            let table = fixture_table();
            let (outcome, trace) = run(&table, &input);

            prop_assert_eq!(outcome.is_accepted(), is_sum(&input));
            prop_assert!(!outcome.reason().is_some_and(|r| r.is_table_fault()));

            // The last step, and only that one, terminates the run.
            let last = trace.last().expect("no step");
            prop_assert_eq!(last.outcome(), Some(outcome.clone()));
            prop_assert!(trace.iter().rev().skip(1).all(|step| step.outcome().is_none()));
            prop_assert!(trace.iter().enumerate().all(|(i, step)| step.index == i));

            if let Some(step) = outcome.step() {
                prop_assert_eq!(step + 1, trace.len());
                prop_assert!(step < StepLimit::Derived.resolve(input.len() + 1, table.steps_per_token()));
            }
        }

        #[test]
        fn runs_are_deterministic(input in token_strategy()) {
            let table = fixture_table();
            prop_assert_eq!(run(&table, &input), run(&table, &input));
        }
    }
}
