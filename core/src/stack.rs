use itertools::Itertools;

use crate::{lr::StateId, Symbol};

/// A stack snapshot, bottom first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackSnapshot {
    /// The symbols of a predictive parser.
    Symbols(Vec<Symbol>),
    /// The states of a shift-reduce parser, with the symbols between them.
    States {
        states: Vec<StateId>,
        symbols: Vec<Symbol>,
    },
}

impl std::fmt::Display for StackSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackSnapshot::Symbols(symbols) => write!(f, "{}", symbols.iter().join(" ")),
            // 0 E 1 + 3
            StackSnapshot::States { states, symbols } => {
                for (i, state) in states.iter().enumerate() {
                    if i > 0 {
                        match symbols.get(i - 1) {
                            Some(sym) => write!(f, " {} ", sym)?,
                            None => write!(f, " ")?,
                        }
                    }
                    write!(f, "{}", state)?;
                }
                Ok(())
            }
        }
    }
}

/// The stack of a predictive parser.
#[derive(Debug, Clone, Default)]
pub struct SymbolStack {
    elements: Vec<Symbol>,
}

impl SymbolStack {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn top(&self) -> Option<&Symbol> {
        self.elements.last()
    }

    pub fn pop(&mut self) -> Option<Symbol> {
        self.elements.pop()
    }

    pub fn push(&mut self, symbol: Symbol) {
        self.elements.push(symbol);
    }

    /// Push the symbols so that the first one ends on top.
    pub fn push_reversed(&mut self, symbols: &[Symbol]) {
        self.elements.extend(symbols.iter().rev().cloned());
    }

    pub fn snapshot(&self) -> StackSnapshot {
        StackSnapshot::Symbols(self.elements.clone())
    }
}

/// The stacks of a shift-reduce parser.
///
/// The symbol stack always holds one element less than the state stack.
#[derive(Debug, Clone)]
pub struct StateStack {
    states: Vec<StateId>,
    symbols: Vec<Symbol>,
}

impl StateStack {
    /// Creates the stacks, the start state alone.
    pub fn new(start: StateId) -> Self {
        Self {
            states: vec![start],
            symbols: Vec::default(),
        }
    }

    pub fn top(&self) -> Option<StateId> {
        self.states.last().copied()
    }

    /// The state uncovered once `count` states are popped.
    pub fn peek_below(&self, count: usize) -> Option<StateId> {
        self.states
            .len()
            .checked_sub(count + 1)
            .map(|idx| self.states[idx])
    }

    pub fn push(&mut self, symbol: Symbol, state: StateId) {
        self.symbols.push(symbol);
        self.states.push(state);
    }

    /// Pop `count` states and symbols.
    pub fn pop(&mut self, count: usize) {
        self.states.truncate(self.states.len().saturating_sub(count));
        self.symbols.truncate(self.symbols.len().saturating_sub(count));
    }

    pub fn snapshot(&self) -> StackSnapshot {
        StackSnapshot::States {
            states: self.states.clone(),
            symbols: self.symbols.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{SymbolKind, SymbolTable};

    use super::{StateStack, SymbolStack};

    #[test]
    fn test_push_reversed() {
        let mut symbols = SymbolTable::default();
        let a = symbols.intern("a", SymbolKind::Terminal);
        let s = symbols.intern("S", SymbolKind::NonTerminal);
        let b = symbols.intern("b", SymbolKind::Terminal);

        let mut stack = SymbolStack::default();
        stack.push(symbols.eos().clone());
        stack.push_reversed(&[a.clone(), s, b]);

        assert_eq!(stack.top(), Some(&a));
        assert_eq!(stack.snapshot().to_string(), "$ b S a");
    }

    #[test]
    fn test_state_stack() {
        let mut symbols = SymbolTable::default();
        let n = symbols.intern("n", SymbolKind::Terminal);
        let e = symbols.intern("E", SymbolKind::NonTerminal);

        let mut stack = StateStack::new(0);
        stack.push(e, 1);
        stack.push(n, 4);

        assert_eq!(stack.snapshot().to_string(), "0 E 1 n 4");
        assert_eq!(stack.peek_below(2), Some(0));
        assert_eq!(stack.peek_below(3), None);

        stack.pop(2);
        assert_eq!(stack.top(), Some(0));
        assert_eq!(stack.snapshot().to_string(), "0");
    }
}
