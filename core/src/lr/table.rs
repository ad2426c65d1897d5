use prettytable::Table as PtTable;
use std::collections::{BTreeSet, HashMap};

use crate::{
    error::{ErrorKind, ValidationError, ValidationResult},
    Grammar, ProductionDef, ProductionId, Symbol, SymbolId, SymbolTable,
};

use super::{Action, StateId};

/// An action cell of an LR(1) table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCellDef {
    pub state: StateId,
    pub symbol: String,
    pub action: Action,
}

/// A goto cell of an LR(1) table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GotoCellDef {
    pub state: StateId,
    pub nonterminal: String,
    pub target: StateId,
}

/// An unvalidated LR(1) table, as read from its source.
///
/// The rows of the table are the states declared with [LrTableDef::add_state]
/// and the states owning at least one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LrTableDef {
    pub terminals: Vec<String>,
    pub productions: Vec<ProductionDef>,
    pub states: Vec<StateId>,
    pub actions: Vec<ActionCellDef>,
    pub gotos: Vec<GotoCellDef>,
}

impl LrTableDef {
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

    /// Declare a row, even one without any cell.
    pub fn add_state(&mut self, state: StateId) -> &mut Self {
        self.states.push(state);
        self
    }

    pub fn add_action(&mut self, state: StateId, symbol: &str, action: Action) -> &mut Self {
        self.actions.push(ActionCellDef {
            state,
            symbol: symbol.to_string(),
            action,
        });
        self
    }

    pub fn add_goto(&mut self, state: StateId, nonterminal: &str, target: StateId) -> &mut Self {
        self.gotos.push(GotoCellDef {
            state,
            nonterminal: nonterminal.to_string(),
            target,
        });
        self
    }

    fn iter_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .iter()
            .copied()
            .chain(self.actions.iter().map(|cell| cell.state))
            .chain(self.gotos.iter().map(|cell| cell.state))
    }
}

/// Check the definition describes a well-formed LR(1) table.
pub fn validate_lr(def: &LrTableDef) -> ValidationResult<()> {
    LrTable::new(def.clone()).map(|_| ())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Row {
    actions: HashMap<SymbolId, Action>,
    goto: HashMap<SymbolId, StateId>,
}

impl Row {
    pub fn action(&self, symbol: &Symbol) -> Option<&Action> {
        self.actions.get(&symbol.id)
    }

    pub fn goto(&self, symbol: &Symbol) -> Option<StateId> {
        self.goto.get(&symbol.id).copied()
    }
}

/// A validated LR(1) parsing table.
#[derive(Debug, Clone)]
pub struct LrTable {
    grammar: Grammar,
    rows: Vec<Row>,
}

impl LrTable {
    /// Validate the definition and build the table.
    pub fn new(def: LrTableDef) -> ValidationResult<Self> {
        let grammar = Grammar::resolve(&def.terminals, &def.productions)?;
        let symbols = grammar.symbols();

        let states: BTreeSet<StateId> = def.iter_states().collect();
        if states.is_empty() {
            return Err(ErrorKind::EmptyTable.into());
        }
        if let Some(missing) = (0..states.len()).find(|id| !states.contains(id)) {
            return Err(ValidationError::at(
                ErrorKind::NonContiguousStates { missing },
                missing,
                "<state>",
            ));
        }

        let len = states.len();
        let mut rows = vec![Row::default(); len];
        let mut accepting: Option<StateId> = None;

        for cell in &def.actions {
            let at = |kind: ErrorKind| ValidationError::at(kind, cell.state, &cell.symbol);

            let symbol = symbols
                .get(&cell.symbol)
                .ok_or_else(|| at(ErrorKind::UnknownColumn(cell.symbol.clone())))?;

            if symbol.is_non_terminal() {
                return Err(at(ErrorKind::ActionOnNonTerminal(cell.action)));
            }

            match cell.action {
                Action::Shift(target) if target >= len => {
                    return Err(at(ErrorKind::InvalidTarget {
                        action: cell.action.to_string(),
                        target,
                    }));
                }
                Action::Reduce(id) if grammar.production(id).is_none() => {
                    return Err(at(ErrorKind::UnknownProduction(id)));
                }
                Action::Accept if !symbol.is_eos() => {
                    return Err(at(ErrorKind::AcceptOnNonEos));
                }
                Action::Accept => match accepting {
                    Some(first) if first != cell.state => {
                        return Err(at(ErrorKind::MultipleAcceptStates {
                            first,
                            second: cell.state,
                        }));
                    }
                    _ => accepting = Some(cell.state),
                },
                _ => {}
            }

            let row = &mut rows[cell.state];
            match row.actions.get(&symbol.id) {
                Some(existing) if *existing != cell.action => {
                    return Err(at(ErrorKind::ConflictingCell(
                        existing.to_string(),
                        cell.action.to_string(),
                    )));
                }
                _ => {
                    row.actions.insert(symbol.id, cell.action);
                }
            }
        }

        for cell in &def.gotos {
            let at = |kind: ErrorKind| ValidationError::at(kind, cell.state, &cell.nonterminal);

            let symbol = symbols
                .get(&cell.nonterminal)
                .ok_or_else(|| at(ErrorKind::UnknownColumn(cell.nonterminal.clone())))?;

            if symbol.is_terminal() {
                return Err(at(ErrorKind::GotoOnTerminal));
            }

            if cell.target >= len {
                return Err(at(ErrorKind::InvalidTarget {
                    action: format!("goto {}", cell.target),
                    target: cell.target,
                }));
            }

            let row = &mut rows[cell.state];
            match row.goto.get(&symbol.id) {
                Some(existing) if *existing != cell.target => {
                    return Err(at(ErrorKind::ConflictingCell(
                        format!("goto {}", existing),
                        format!("goto {}", cell.target),
                    )));
                }
                _ => {
                    row.goto.insert(symbol.id, cell.target);
                }
            }
        }

        if accepting.is_none() {
            return Err(ErrorKind::MissingAccept.into());
        }

        Ok(Self { grammar, rows })
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.grammar.symbols()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn action(&self, state: StateId, symbol: &Symbol) -> Option<&Action> {
        self.rows.get(state).and_then(|row| row.action(symbol))
    }

    pub fn goto(&self, state: StateId, symbol: &Symbol) -> Option<StateId> {
        self.rows.get(state).and_then(|row| row.goto(symbol))
    }

    /// The number of rows (states) in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the terminals having an action in the state.
    pub fn iter_terminals(&self, state: StateId) -> impl Iterator<Item = &Symbol> {
        self.symbols()
            .iter_terminals()
            .filter(move |sym| self.action(state, sym).is_some())
    }

    /// Iterate over the nonterminals having a goto in the state.
    pub fn iter_non_terminals(&self, state: StateId) -> impl Iterator<Item = &Symbol> {
        self.symbols()
            .iter_non_terminals()
            .filter(move |sym| self.goto(state, sym).is_some())
    }

    /// Upper bound of the steps a terminating run spends on each token, used to derive the step ceiling.
    pub(crate) fn steps_per_token(&self) -> usize {
        self.grammar.steps_per_token()
    }
}

impl std::fmt::Display for LrTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();

        table.add_row(
            ["#"]
                .into_iter()
                .chain(
                    self.symbols()
                        .iter_terminals()
                        .chain(self.symbols().iter_non_terminals())
                        .map(|sym| sym.name()),
                )
                .collect(),
        );

        for (id, row) in self.rows.iter().enumerate() {
            table.add_row(
                [id.to_string()]
                    .into_iter()
                    .chain(self.symbols().iter_terminals().map(|sym| {
                        row.action(sym)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    }))
                    .chain(self.symbols().iter_non_terminals().map(|sym| {
                        row.goto(sym)
                            .map(|state| state.to_string())
                            .unwrap_or_default()
                    }))
                    .collect(),
            );
        }

        write!(f, "{}", table)
    }
}
