use std::hash::Hash;

use itertools::Itertools;

use super::Symbol;

/// The production's index in its table.
pub type ProductionId = usize;

/// The notation of the empty right-hand side.
pub const EPSILON: &str = "ε";

#[derive(Debug, Eq, PartialEq, Clone)]
/// A resolved production
///
/// This object is produced by a table with
/// references to its interned symbols.
///
/// # Example
/// S -> a S b
pub struct Production {
    pub id: ProductionId,
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_epsilon() {
            write!(f, "{} -> {}", self.lhs, EPSILON)
        } else {
            write!(f, "{} -> {}", self.lhs, self.rhs.iter().join(" "))
        }
    }
}

impl Hash for Production {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}

impl Production {
    /// Check the production derives the empty string in one step.
    #[inline(always)]
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

/// Defines a production
///
/// Symbols are referred by name, the table resolves them
/// when it is built.
/// X := A1..An
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProductionDef {
    pub lhs: String,
    pub rhs: Vec<String>,
}

impl std::fmt::Display for ProductionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.rhs.is_empty() {
            write!(f, "{} -> {}", self.lhs, EPSILON)
        } else {
            write!(f, "{} -> {}", self.lhs, self.rhs.iter().join(" "))
        }
    }
}

impl ProductionDef {
    pub fn new<I, S>(lhs: &str, rhs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            lhs: lhs.to_string(),
            rhs: rhs.into_iter().map(|s| s.to_string()).collect(),
        }
    }
}
