pub mod loader;
pub mod tokenizer;

pub use stepparse_core::*;

use thiserror::Error;

use loader::{load_tables, LoadResult};
use stepparse_core::traits::{Parser, StepObserver};

/// The engine used to parse an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Ll,
    Lr,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported parsing method {0}")]
pub struct UnknownMethod(pub String);

impl std::str::FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LL" => Ok(Self::Ll),
            "LR" => Ok(Self::Lr),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ll => write!(f, "LL"),
            Self::Lr => write!(f, "LR"),
        }
    }
}

/// A string to parse, and the engine to parse it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingInput {
    pub method: Method,
    pub string: String,
}

impl ParsingInput {
    pub fn new(method: Method, string: &str) -> Self {
        Self {
            method,
            string: string.to_string(),
        }
    }
}

/// A predictive and a shift-reduce table, sharing the inputs to parse.
pub struct Tables {
    pub ll: LlTable,
    pub lr: LrTable,
}

impl Tables {
    /// Read and validate both tables from their text.
    pub fn load(ll: &str, lr: &str) -> LoadResult<Self> {
        let (ll, lr) = load_tables(ll, lr)?;
        Ok(Self { ll, lr })
    }

    pub fn run(&self, input: &ParsingInput) -> (ParseOutcome, Trace) {
        self.run_observed(input, &mut NullObserver)
    }

    /// Tokenize the input against the table of its method, then parse it.
    pub fn run_observed(&self, input: &ParsingInput, observer: &mut dyn StepObserver) -> (ParseOutcome, Trace) {
        match input.method {
            Method::Ll => {
                let tokens = tokenizer::tokenize(&input.string, self.ll.symbols());
                LlParser::new(&self.ll).run_observed(&tokens, observer)
            }
            Method::Lr => {
                let tokens = tokenizer::tokenize(&input.string, self.lr.symbols());
                LrParser::new(&self.lr).run_observed(&tokens, observer)
            }
        }
    }
}
