use std::sync::Arc;

use crate::{Symbol, SymbolTable};

/// An input token, resolved against the symbols of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub name: Arc<str>,
    /// The terminal matching the token, [None] if the table does not know it.
    pub symbol: Option<Symbol>,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The input of a run, always terminated by the end-of-input marker.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    /// Resolve the input tokens.
    ///
    /// A trailing end-of-input marker is kept, otherwise one is appended.
    /// Only the final token resolves to the end-of-input symbol: a marker
    /// found anywhere else never matches.
    pub fn new<S: AsRef<str>>(symbols: &SymbolTable, input: &[S]) -> Self {
        let eos = symbols.eos();
        let input = match input.split_last() {
            Some((last, rest)) if last.as_ref() == eos.name() => rest,
            _ => input,
        };

        let tokens = input
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Token {
                    name: Arc::from(name),
                    symbol: symbols.get(name).filter(|sym| sym.is_terminal() && !sym.is_eos()).cloned(),
                }
            })
            .chain(std::iter::once(Token {
                name: eos.shared_name(),
                symbol: Some(eos.clone()),
            }))
            .collect();

        Self { tokens, cursor: 0 }
    }

    /// The current token.
    pub fn lookahead(&self) -> &Token {
        // The end-of-input token is never consumed.
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    pub fn advance(&mut self) {
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
    }

    /// The names of the tokens left, the lookahead first.
    pub fn remaining(&self) -> Vec<Arc<str>> {
        self.tokens[self.cursor..].iter().map(|tok| tok.name.clone()).collect()
    }

    /// The number of tokens, the end-of-input marker included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::{SymbolKind, SymbolTable};

    use super::TokenStream;

    fn symbols() -> SymbolTable {
        let mut symbols = SymbolTable::default();
        symbols.intern("a", SymbolKind::Terminal);
        symbols.intern("S", SymbolKind::NonTerminal);
        symbols
    }

    #[test]
    fn test_eos_is_appended() {
        let stream = TokenStream::new(&symbols(), &["a", "a"]);
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.remaining().iter().map(|s| s.as_ref()).collect::<Vec<_>>(), vec!["a", "a", "$"]);
    }

    #[test]
    fn test_trailing_eos_is_kept() {
        let stream = TokenStream::new(&symbols(), &["a", "$"]);
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn test_unknown_and_misplaced_tokens() {
        let mut stream = TokenStream::new(&symbols(), &["S", "$", "z"]);

        assert!(stream.lookahead().symbol.is_none());
        stream.advance();
        assert!(stream.lookahead().symbol.is_none());
        stream.advance();
        assert!(stream.lookahead().symbol.is_none());
        stream.advance();
        assert!(stream.lookahead().symbol.as_ref().is_some_and(|s| s.is_eos()));

        // The end-of-input token is never consumed.
        stream.advance();
        assert_eq!(stream.lookahead().name.as_ref(), "$");
    }

    #[test]
    fn test_empty_input() {
        let stream = TokenStream::new::<&str>(&symbols(), &[]);
        assert_eq!(stream.len(), 1);
        assert!(stream.lookahead().symbol.as_ref().is_some_and(|s| s.is_eos()));
    }
}
