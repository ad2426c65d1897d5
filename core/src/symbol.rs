use std::{collections::HashMap, hash::Hash, sync::Arc};

/// The end-of-input marker.
pub const EOS: &str = "$";

/// The identifier of an interned symbol.
pub type SymbolId = usize;

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
    EOS,
}

/// Defines a symbol
///
/// Symbols are interned by a [SymbolTable], two symbols are equal
/// if they share the same identifier.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// *Unique* identifier of the symbol within its table
    pub id: SymbolId,
    name: Arc<str>,
    kind: SymbolKind,
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A shared handle on the symbol's name.
    pub fn shared_name(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, SymbolKind::EOS | SymbolKind::Terminal)
    }

    #[inline(always)]
    pub fn is_non_terminal(&self) -> bool {
        matches!(self.kind, SymbolKind::NonTerminal)
    }

    #[inline(always)]
    pub fn is_eos(&self) -> bool {
        matches!(self.kind, SymbolKind::EOS)
    }
}

/// Interns the symbols of a table.
///
/// The end-of-input marker is always interned first, with the identifier 0.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<Arc<str>, SymbolId>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut table = Self {
            symbols: Vec::default(),
            by_name: HashMap::default(),
        };
        table.push(EOS, SymbolKind::EOS);
        table
    }
}

impl SymbolTable {
    fn push(&mut self, name: &str, kind: SymbolKind) -> Symbol {
        let name: Arc<str> = Arc::from(name);
        let symbol = Symbol {
            id: self.symbols.len(),
            name: name.clone(),
            kind,
        };
        self.by_name.insert(name, symbol.id);
        self.symbols.push(symbol.clone());
        symbol
    }

    /// Interns a symbol.
    ///
    /// Returns the already interned symbol if the name is known, whatever its kind.
    pub(crate) fn intern(&mut self, name: &str, kind: SymbolKind) -> Symbol {
        match self.get(name) {
            Some(sym) => sym.clone(),
            None => self.push(name, kind),
        }
    }

    /// Get a symbol based on its name.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.by_name.get(name).map(|id| &self.symbols[*id])
    }

    /// Returns the end-of-input symbol.
    pub fn eos(&self) -> &Symbol {
        &self.symbols[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Iterate over the terminals, the end-of-input marker included.
    pub fn iter_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|sym| sym.is_terminal())
    }

    pub fn iter_non_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|sym| sym.is_non_terminal())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
