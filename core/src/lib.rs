pub mod batch;
pub mod error;
pub mod grammar;
pub mod input;
pub mod ll;
pub mod lr;
pub mod parser;
pub mod production;
pub mod stack;
pub mod symbol;
pub mod trace;

pub use error::{Cell, ErrorKind, ValidationError, ValidationResult};
pub use grammar::Grammar;
pub use ll::{validate_ll, LlParser, LlTable, LlTableDef};
pub use lr::{validate_lr, Action, LrParser, LrTable, LrTableDef, StateId};
pub use parser::{ParseOutcome, ParserConfig, RejectReason, StepLimit};
pub use production::{Production, ProductionDef, ProductionId, EPSILON};
pub use symbol::{Symbol, SymbolId, SymbolKind, SymbolTable, EOS};
pub use trace::{NullObserver, PrintObserver, StepAction, TableEntry, Trace, TraceStep};

pub mod traits {
    pub use crate::parser::traits::Parser;
    pub use crate::trace::StepObserver;
}

#[cfg(test)]
pub mod fixtures {
    use crate::{Action, LlTableDef, LrTableDef};

    /// S -> a S b | ε
    pub fn fixture_ll_def() -> LlTableDef {
        let mut def = LlTableDef::new("S");
        def.add_terminal("a").add_terminal("b");

        let asb = def.add_production("S", ["a", "S", "b"]);
        let eps = def.add_production::<[&str; 0], &str>("S", []);

        def.add_entry("S", "a", asb)
            .add_entry("S", "b", eps)
            .add_entry("S", "$", eps);

        def
    }

    /// S -> S, predicted forever.
    pub fn fixture_cyclic_ll_def() -> LlTableDef {
        let mut def = LlTableDef::new("S");
        def.add_terminal("a");

        let pid = def.add_production("S", ["S"]);
        def.add_entry("S", "a", pid);

        def
    }

    /// E -> E + n | n
    pub fn fixture_lr_def() -> LrTableDef {
        let mut def = LrTableDef::default();
        def.add_terminal("n").add_terminal("+");

        let sum = def.add_production("E", ["E", "+", "n"]);
        let num = def.add_production("E", ["n"]);

        def.add_action(0, "n", Action::Shift(2))
            .add_goto(0, "E", 1)
            .add_action(1, "+", Action::Shift(3))
            .add_action(1, "$", Action::Accept)
            .add_action(2, "+", Action::Reduce(num))
            .add_action(2, "$", Action::Reduce(num))
            .add_action(3, "n", Action::Shift(4))
            .add_action(4, "+", Action::Reduce(sum))
            .add_action(4, "$", Action::Reduce(sum));

        def
    }

    #[test]
    fn test_fixtures() {
        println!("{:#?}", fixture_ll_def());
        println!("{:#?}", fixture_lr_def());
    }
}
