use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{ErrorKind, ValidationError, ValidationResult},
    Production, ProductionDef, ProductionId, Symbol, SymbolId, SymbolKind, SymbolTable,
};

/// The symbols and productions shared by the cells of a table.
///
/// Terminals are declared, nonterminals are the heads of the productions.
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: SymbolTable,
    productions: Vec<Arc<Production>>,
    steps_per_token: usize,
}

impl Grammar {
    /// Resolve the declared terminals and productions.
    ///
    /// Fails if a terminal is declared twice, if a production head is also a terminal,
    /// or if a right-hand side refers to an undeclared symbol.
    pub fn resolve(terminals: &[String], productions: &[ProductionDef]) -> ValidationResult<Self> {
        let mut symbols = SymbolTable::default();

        for term in terminals {
            match symbols.get(term) {
                // An explicit end-of-input marker column is allowed.
                Some(sym) if sym.is_eos() => {}
                Some(_) => {
                    return Err(ValidationError::at(
                        ErrorKind::DuplicatedSymbol(term.clone()),
                        "<terminals>",
                        term,
                    ))
                }
                None => {
                    symbols.intern(term, SymbolKind::Terminal);
                }
            }
        }

        for def in productions {
            if symbols.get(&def.lhs).is_some_and(Symbol::is_terminal) {
                return Err(ValidationError::at(
                    ErrorKind::SymbolKindClash(def.lhs.clone()),
                    &def.lhs,
                    def,
                ));
            }
            symbols.intern(&def.lhs, SymbolKind::NonTerminal);
        }

        let productions = productions
            .iter()
            .enumerate()
            .map(|(id, def)| {
                let rhs = def
                    .rhs
                    .iter()
                    .map(|name| {
                        symbols.get(name).cloned().ok_or_else(|| {
                            ValidationError::at(
                                ErrorKind::DanglingSymbol {
                                    symbol: name.clone(),
                                },
                                def,
                                name,
                            )
                        })
                    })
                    .collect::<ValidationResult<Vec<_>>>()?;

                Ok(Arc::new(Production {
                    id,
                    lhs: symbols.intern(&def.lhs, SymbolKind::NonTerminal),
                    rhs,
                }))
            })
            .collect::<ValidationResult<Vec<_>>>()?;

        let steps_per_token = bound_steps_per_token(&symbols, &productions);

        Ok(Self {
            symbols,
            productions,
            steps_per_token,
        })
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn production(&self, id: ProductionId) -> Option<&Arc<Production>> {
        self.productions.get(id)
    }

    /// Iterate over all productions
    pub fn iter_productions(&self) -> impl Iterator<Item = &Arc<Production>> {
        self.productions.iter()
    }

    pub fn iter_productions_by_symbol<'a>(
        &'a self,
        sym: &'a Symbol,
    ) -> impl Iterator<Item = &'a Arc<Production>> + 'a {
        self.iter_productions().filter(move |p| &p.lhs == sym)
    }

    /// Upper bound of the steps a run spends on each input token.
    pub(crate) fn steps_per_token(&self) -> usize {
        self.steps_per_token
    }
}

/// Bound the parse tree nodes hanging off one token.
///
/// The nodes whose yield starts at a given token form a chain holding each nonterminal
/// at most once. Each node of the chain carries right-hand side siblings deriving ε,
/// and each such sibling costs at most the largest ε-derivation of the grammar.
fn bound_steps_per_token(symbols: &SymbolTable, productions: &[Arc<Production>]) -> usize {
    let mut memo = HashMap::default();

    let chain = symbols.iter_non_terminals().count();
    let siblings = productions.iter().map(|p| p.rhs.len()).max().unwrap_or(0);
    let vanishing = symbols
        .iter_non_terminals()
        .map(|sym| epsilon_steps(sym, productions, &mut memo))
        .max()
        .unwrap_or(0);

    chain
        .saturating_add(1)
        .saturating_mul(siblings.saturating_mul(vanishing.saturating_add(1)).saturating_add(1))
        .saturating_add(1)
}

/// Steps of the largest derivation of ε rooted at the nonterminal, one per production applied.
///
/// A nonterminal met again while its own derivation is computed counts for nothing.
fn epsilon_steps(
    sym: &Symbol,
    productions: &[Arc<Production>],
    memo: &mut HashMap<SymbolId, Option<usize>>,
) -> usize {
    match memo.get(&sym.id) {
        Some(Some(steps)) => return *steps,
        Some(None) => return 0,
        None => {}
    }

    memo.insert(sym.id, None);

    let mut steps = 0usize;

    for production in productions.iter().filter(|p| &p.lhs == sym) {
        if !production.rhs.iter().all(Symbol::is_non_terminal) {
            continue;
        }

        let cost = production
            .rhs
            .iter()
            .fold(1usize, |acc, child| acc.saturating_add(epsilon_steps(child, productions, memo)));

        steps = steps.max(cost);
    }

    memo.insert(sym.id, Some(steps));
    steps
}
