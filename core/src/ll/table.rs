use prettytable::Table as PtTable;
use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{ErrorKind, ValidationError, ValidationResult},
    Grammar, Production, ProductionDef, ProductionId, Symbol, SymbolId, SymbolTable,
};

/// A cell of an LL(1) table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlCellDef {
    pub nonterminal: String,
    pub terminal: String,
    pub production: ProductionId,
}

/// An unvalidated LL(1) table, as read from its source.
///
/// # Example
///
/// ```
/// use stepparse_core::{LlTable, LlTableDef};
///
/// let mut def = LlTableDef::new("S");
/// def.add_terminal("a").add_terminal("b");
///
/// let asb = def.add_production("S", ["a", "S", "b"]);
/// let eps = def.add_production::<_, &str>("S", []);
///
/// def.add_entry("S", "a", asb)
///     .add_entry("S", "b", eps)
///     .add_entry("S", "$", eps);
///
/// let table = LlTable::new(def).expect("invalid table");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlTableDef {
    pub start: String,
    pub terminals: Vec<String>,
    pub productions: Vec<ProductionDef>,
    pub cells: Vec<LlCellDef>,
}

impl LlTableDef {
    pub fn new(start: &str) -> Self {
        Self {
            start: start.to_string(),
            ..Default::default()
        }
    }

    /// Add a terminal column.
    pub fn add_terminal(&mut self, id: &str) -> &mut Self {
        self.terminals.push(id.to_string());
        self
    }

    /// Add a production, returns its index.
    pub fn add_production<I, S>(&mut self, lhs: &str, rhs: I) -> ProductionId
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.productions.push(ProductionDef::new(lhs, rhs));
        self.productions.len() - 1
    }

    /// Add a table entry (nonterminal, terminal) -> production.
    pub fn add_entry(&mut self, nonterminal: &str, terminal: &str, production: ProductionId) -> &mut Self {
        self.cells.push(LlCellDef {
            nonterminal: nonterminal.to_string(),
            terminal: terminal.to_string(),
            production,
        });
        self
    }
}

/// Check the definition describes a well-formed LL(1) table.
pub fn validate_ll(def: &LlTableDef) -> ValidationResult<()> {
    LlTable::new(def.clone()).map(|_| ())
}

/// A validated LL(1) parsing table.
#[derive(Debug, Clone)]
pub struct LlTable {
    grammar: Grammar,
    start: Symbol,
    cells: HashMap<(SymbolId, SymbolId), ProductionId>,
}

impl LlTable {
    /// Validate the definition and build the table.
    pub fn new(def: LlTableDef) -> ValidationResult<Self> {
        let grammar = Grammar::resolve(&def.terminals, &def.productions)?;
        let symbols = grammar.symbols();

        let start = symbols
            .get(&def.start)
            .filter(|sym| sym.is_non_terminal())
            .cloned()
            .ok_or_else(|| ValidationError::at(ErrorKind::InvalidStart(def.start.clone()), &def.start, "<start>"))?;

        let mut cells = HashMap::<(SymbolId, SymbolId), ProductionId>::default();

        for cell in &def.cells {
            let nterm = symbols
                .get(&cell.nonterminal)
                .filter(|sym| sym.is_non_terminal())
                .ok_or_else(|| {
                    ValidationError::at(
                        ErrorKind::UnknownRow(cell.nonterminal.clone()),
                        &cell.nonterminal,
                        &cell.terminal,
                    )
                })?;

            let term = symbols
                .get(&cell.terminal)
                .filter(|sym| sym.is_terminal())
                .ok_or_else(|| {
                    ValidationError::at(
                        ErrorKind::UnknownColumn(cell.terminal.clone()),
                        &cell.nonterminal,
                        &cell.terminal,
                    )
                })?;

            let production = grammar.production(cell.production).ok_or_else(|| {
                ValidationError::at(
                    ErrorKind::UnknownProduction(cell.production),
                    &cell.nonterminal,
                    &cell.terminal,
                )
            })?;

            if &production.lhs != nterm {
                return Err(ValidationError::at(
                    ErrorKind::ProductionMismatch {
                        nonterminal: cell.nonterminal.clone(),
                        production: cell.production,
                    },
                    &cell.nonterminal,
                    &cell.terminal,
                ));
            }

            match cells.get(&(nterm.id, term.id)) {
                Some(&existing) if existing != cell.production => {
                    return Err(ValidationError::at(
                        ErrorKind::ConflictingCell(
                            def.productions[existing].to_string(),
                            production.to_string(),
                        ),
                        &cell.nonterminal,
                        &cell.terminal,
                    ));
                }
                _ => {
                    cells.insert((nterm.id, term.id), cell.production);
                }
            }
        }

        // Every nonterminal the parser can push must be expandable.
        for nterm in std::iter::once(&start).chain(
            grammar
                .iter_productions()
                .flat_map(|p| p.rhs.iter())
                .filter(|sym| sym.is_non_terminal()),
        ) {
            if !cells.keys().any(|(row, _)| *row == nterm.id) {
                return Err(ValidationError::at(
                    ErrorKind::DanglingSymbol {
                        symbol: nterm.name().to_string(),
                    },
                    nterm,
                    "<any>",
                ));
            }
        }

        Ok(Self {
            grammar,
            start,
            cells,
        })
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.grammar.symbols()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    pub fn eos(&self) -> &Symbol {
        self.symbols().eos()
    }

    /// The production predicted for the nonterminal on the lookahead, if any.
    pub fn predict(&self, nonterminal: &Symbol, lookahead: &Symbol) -> Option<&Arc<Production>> {
        self.cells
            .get(&(nonterminal.id, lookahead.id))
            .and_then(|id| self.grammar.production(*id))
    }

    /// The number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Upper bound of the steps a terminating run spends on each token, used to derive the step ceiling.
    pub(crate) fn steps_per_token(&self) -> usize {
        self.grammar.steps_per_token()
    }
}

impl std::fmt::Display for LlTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();

        table.add_row(
            ["#"]
                .into_iter()
                .chain(self.symbols().iter_terminals().map(|sym| sym.name()))
                .collect(),
        );

        for nterm in self.symbols().iter_non_terminals() {
            table.add_row(
                [nterm.to_string()]
                    .into_iter()
                    .chain(self.symbols().iter_terminals().map(|term| {
                        self.predict(nterm, term)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    }))
                    .collect(),
            );
        }

        write!(f, "{}", table)
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ErrorKind, fixtures::fixture_ll_def};

    use super::{validate_ll, LlTable, LlTableDef};

    #[test]
    fn test_fixture_is_valid() {
        let table = LlTable::new(fixture_ll_def()).expect("cannot build table");
        println!("{}", table);

        let s = table.symbols().get("S").cloned().expect("missing S");
        let a = table.symbols().get("a").cloned().expect("missing a");
        let c = table.symbols().get("$").cloned().expect("missing $");

        assert_eq!(table.len(), 3);
        assert_eq!(table.start(), &s);
        assert_eq!(table.predict(&s, &a).map(|p| p.to_string()).as_deref(), Some("S -> a S b"));
        assert!(table.predict(&s, &c).is_some_and(|p| p.is_epsilon()));
    }

    #[test]
    fn test_invalid_start() {
        let mut def = fixture_ll_def();
        def.start = "X".into();

        let err = validate_ll(&def).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidStart("X".into()));
    }

    #[test]
    fn test_unknown_row_and_column() {
        let mut def = fixture_ll_def();
        def.add_entry("a", "b", 0);
        assert_eq!(validate_ll(&def).unwrap_err().kind(), &ErrorKind::UnknownRow("a".into()));

        let mut def = fixture_ll_def();
        def.add_entry("S", "c", 0);
        let err = validate_ll(&def).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownColumn("c".into()));
        assert_eq!(err.cell().map(|c| (c.row.as_str(), c.column.as_str())), Some(("S", "c")));
    }

    #[test]
    fn test_malformed_production_index() {
        let mut def = fixture_ll_def();
        def.add_entry("S", "a", 7);
        assert_eq!(validate_ll(&def).unwrap_err().kind(), &ErrorKind::UnknownProduction(7));
    }

    #[test]
    fn test_production_mismatch() {
        let mut def = fixture_ll_def();
        def.add_terminal("c");
        let t = def.add_production("T", ["c"]);
        def.add_entry("T", "c", t).add_entry("S", "c", t);

        assert_eq!(
            validate_ll(&def).unwrap_err().kind(),
            &ErrorKind::ProductionMismatch {
                nonterminal: "S".into(),
                production: t
            }
        );
    }

    #[test]
    fn test_conflicting_cell() {
        let mut def = fixture_ll_def();
        // (S, a) already predicts S -> a S b.
        def.add_entry("S", "a", 1);

        let err = validate_ll(&def).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::ConflictingCell("S -> a S b".into(), "S -> ε".into())
        );
    }

    #[test]
    fn test_duplicated_cell_is_not_a_conflict() {
        let mut def = fixture_ll_def();
        def.add_entry("S", "a", 0);
        assert!(validate_ll(&def).is_ok());
    }

    #[test]
    fn test_nonterminal_without_entries() {
        let mut def = LlTableDef::new("S");
        def.add_terminal("a");
        let s = def.add_production("S", ["a", "T"]);
        def.add_production("T", ["a"]);
        def.add_entry("S", "a", s);

        let err = validate_ll(&def).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::DanglingSymbol { symbol: "T".into() });
    }
}
