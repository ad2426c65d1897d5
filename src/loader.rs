//! Readers for the `;`-separated text tables and input lists.
//!
//! Every line is stripped from its whitespace and control characters before
//! being split. The loaders only check the layout of the files, the tables
//! being validated when built ([LlTable::new], [LrTable::new]).
use std::collections::HashMap;

use itertools::Itertools;
use stepparse_core::{Action, LlTable, LlTableDef, LrTable, LrTableDef, ProductionDef, StateId, ValidationError, EOS};
use thiserror::Error;

use crate::{tokenizer::split_longest, Method, ParsingInput};

const STATE_PREFIX: &str = "State_";
const ARROW: &str = "->";
const EPSILONS: [&str; 2] = ["ϵ", "ε"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("missing header line")]
    MissingHeader,

    #[error("line {line}: invalid state {value}")]
    InvalidState { line: usize, value: String },

    #[error("line {line}: cell {column} is beyond the header ({width} columns)")]
    CellOutOfBounds {
        line: usize,
        column: usize,
        width: usize,
    },

    #[error("line {line}: invalid production {value}")]
    InvalidProduction { line: usize, value: String },

    #[error("line {line}: invalid goto {value}")]
    InvalidGoto { line: usize, value: String },

    #[error("the table has no entry")]
    NoEntry,

    #[error("column {0} is neither a production head nor part of a production")]
    UnresolvedColumn(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// The parsing inputs of an input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFile {
    pub inputs: Vec<ParsingInput>,
    /// Lines with an unsupported method, with their number.
    pub skipped: Vec<(usize, String)>,
}

fn clean(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace() && !c.is_control()).collect()
}

/// The non-empty lines of the text, numbered from 1.
fn lines(text: &str) -> impl Iterator<Item = (usize, String)> + '_ {
    text.lines()
        .map(clean)
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.is_empty())
}

fn parse_state(line: usize, value: &str) -> LoadResult<StateId> {
    value
        .strip_prefix(STATE_PREFIX)
        .unwrap_or(value)
        .parse()
        .map_err(|_| LoadError::InvalidState {
            line,
            value: value.to_string(),
        })
}

/// Split `A->rhs` into its head and body, the body split against the names.
fn parse_production<'n>(
    line: usize,
    value: &str,
    lhs: Option<&str>,
    names: impl IntoIterator<Item = &'n str>,
) -> LoadResult<ProductionDef> {
    let (head, body) = match (value.split_once(ARROW), lhs) {
        (Some((head, body)), _) => (head, body),
        // The head may be omitted in a predictive table.
        (None, Some(lhs)) => (lhs, value),
        (None, None) => {
            return Err(LoadError::InvalidProduction {
                line,
                value: value.to_string(),
            })
        }
    };

    if head.is_empty() || lhs.is_some_and(|lhs| lhs != head) {
        return Err(LoadError::InvalidProduction {
            line,
            value: value.to_string(),
        });
    }

    let rhs = if EPSILONS.contains(&body) {
        vec![]
    } else {
        split_longest(body, names)
    };

    Ok(ProductionDef {
        lhs: head.to_string(),
        rhs,
    })
}

/// Productions interned by their text.
#[derive(Default)]
struct Productions {
    defs: Vec<ProductionDef>,
    ids: HashMap<String, usize>,
}

impl Productions {
    fn intern(&mut self, def: ProductionDef) -> usize {
        let key = def.to_string();
        *self.ids.entry(key).or_insert_with(|| {
            self.defs.push(def);
            self.defs.len() - 1
        })
    }
}

/// Read a predictive table.
///
/// ```text
/// LL;a;b;$
/// S;S->aSb;S->ϵ;S->ϵ
/// ```
///
/// The start symbol is the row of the first non-empty cell.
pub fn load_ll(text: &str) -> LoadResult<LlTableDef> {
    let mut lines = lines(text);
    let (_, header) = lines.next().ok_or(LoadError::MissingHeader)?;
    let terminals = header.split(';').skip(1).map(str::to_string).collect::<Vec<_>>();

    let rows = lines
        .map(|(no, line)| (no, line.split(';').map(str::to_string).collect::<Vec<_>>()))
        .collect::<Vec<_>>();

    let names = terminals
        .iter()
        .map(String::as_str)
        .chain(rows.iter().map(|(_, cells)| cells[0].as_str()))
        .chain([EOS])
        .unique()
        .collect::<Vec<_>>();

    let mut start = None;
    let mut productions = Productions::default();
    let mut entries = Vec::default();

    for (no, cells) in &rows {
        let nonterminal = &cells[0];

        for (column, cell) in cells.iter().enumerate().skip(1) {
            if cell.is_empty() {
                continue;
            }

            let terminal = terminals.get(column - 1).ok_or(LoadError::CellOutOfBounds {
                line: *no,
                column,
                width: terminals.len(),
            })?;

            let production = parse_production(*no, cell, Some(nonterminal.as_str()), names.iter().copied())?;
            entries.push((nonterminal.clone(), terminal.clone(), productions.intern(production)));
            if start.is_none() {
                start = Some(nonterminal.clone());
            }
        }
    }

    let mut def = LlTableDef::new(&start.ok_or(LoadError::NoEntry)?);

    // The end-of-input marker is implicit.
    for terminal in terminals.iter().filter(|t| t.as_str() != EOS) {
        def.add_terminal(terminal);
    }
    def.productions = productions.defs;
    for (nonterminal, terminal, production) in entries {
        def.add_entry(&nonterminal, &terminal, production);
    }

    Ok(def)
}

/// Read a shift-reduce table.
///
/// ```text
/// LR table
/// State;n;+;$;E
/// State_0;State_2;;;State_1
/// State_1;;State_3;accept;
/// ```
///
/// The nonterminal columns are the heads of the reduced productions. A filled column
/// that is neither a head nor part of a reduced production cannot be told apart
/// from a goto column, and is refused.
pub fn load_lr(text: &str) -> LoadResult<LrTableDef> {
    let mut lines = lines(text);
    lines.next().ok_or(LoadError::MissingHeader)?;
    let (_, header) = lines.next().ok_or(LoadError::MissingHeader)?;
    let columns = header.split(';').skip(1).map(str::to_string).collect::<Vec<_>>();

    let rows = lines
        .map(|(no, line)| (no, line.split(';').map(str::to_string).collect::<Vec<_>>()))
        .collect::<Vec<_>>();

    let heads = rows
        .iter()
        .flat_map(|(_, cells)| cells.iter().skip(1))
        .filter_map(|cell| cell.split_once(ARROW).map(|(head, _)| head.to_string()))
        .unique()
        .collect::<Vec<_>>();

    let names = columns
        .iter()
        .chain(heads.iter())
        .map(String::as_str)
        .chain([EOS])
        .unique()
        .collect::<Vec<_>>();

    let mut def = LrTableDef::default();
    let mut productions = Productions::default();

    for column in columns.iter().filter(|c| c.as_str() != EOS && !heads.contains(c)) {
        def.add_terminal(column);
    }

    for (no, cells) in &rows {
        let state = parse_state(*no, &cells[0])?;
        def.add_state(state);

        for (column, cell) in cells.iter().enumerate().skip(1) {
            if cell.is_empty() {
                continue;
            }

            let symbol = columns.get(column - 1).ok_or(LoadError::CellOutOfBounds {
                line: *no,
                column,
                width: columns.len(),
            })?;

            if heads.contains(symbol) {
                let target = parse_state(*no, cell).map_err(|_| LoadError::InvalidGoto {
                    line: *no,
                    value: cell.clone(),
                })?;
                def.add_goto(state, symbol, target);
                continue;
            }

            let action = if cell.eq_ignore_ascii_case("accept") {
                Action::Accept
            } else if cell.contains(ARROW) {
                Action::Reduce(productions.intern(parse_production(*no, cell, None, names.iter().copied())?))
            } else if let Ok(target) = parse_state(*no, cell) {
                Action::Shift(target)
            } else {
                Action::Error
            };

            def.add_action(state, symbol, action);
        }
    }

    let unresolved = columns.iter().find(|column| {
        column.as_str() != EOS
            && !heads.contains(column)
            && !productions.defs.iter().any(|p| p.rhs.contains(column))
            && def.actions.iter().any(|cell| &cell.symbol == *column)
    });

    if let Some(column) = unresolved {
        return Err(LoadError::UnresolvedColumn(column.clone()));
    }

    def.productions = productions.defs;
    Ok(def)
}

/// Read a list of parsing inputs.
///
/// ```text
/// Method;String
/// LL;aabb$
/// LR;n+n$
/// ```
pub fn load_inputs(text: &str) -> LoadResult<InputFile> {
    let mut lines = lines(text);
    lines.next().ok_or(LoadError::MissingHeader)?;

    let mut file = InputFile::default();

    for (no, line) in lines {
        let (method, string) = line.split_once(';').unwrap_or((line.as_str(), ""));

        match method.parse::<Method>() {
            Ok(method) => file.inputs.push(ParsingInput {
                method,
                string: string.to_string(),
            }),
            Err(_) => file.skipped.push((no, line.clone())),
        }
    }

    Ok(file)
}

/// Read and validate both tables.
pub fn load_tables(ll: &str, lr: &str) -> LoadResult<(LlTable, LrTable)> {
    Ok((LlTable::new(load_ll(ll)?)?, LrTable::new(load_lr(lr)?)?))
}
