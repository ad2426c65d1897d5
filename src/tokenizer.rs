use stepparse_core::SymbolTable;

/// Split the text by greedy longest match against the names.
///
/// Whitespace is skipped. A character starting no name becomes a token on its own.
pub fn split_longest<'n, I>(text: &str, names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'n str>,
{
    let names: Vec<&str> = names.into_iter().filter(|name| !name.is_empty()).collect();
    let mut tokens = Vec::default();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if ch.is_whitespace() {
            rest = &rest[ch.len_utf8()..];
            continue;
        }

        let len = names
            .iter()
            .filter(|name| rest.starts_with(*name))
            .map(|name| name.len())
            .max()
            .unwrap_or(ch.len_utf8());

        tokens.push(rest[..len].to_string());
        rest = &rest[len..];
    }

    tokens
}

/// Split the text into the terminals of the table.
pub fn tokenize(text: &str, symbols: &SymbolTable) -> Vec<String> {
    split_longest(text, symbols.iter_terminals().map(|sym| sym.name()))
}

#[cfg(test)]
mod tests {
    use super::split_longest;

    #[test]
    fn test_longest_match() {
        assert_eq!(
            split_longest("id+ id*(id)$", ["id", "+", "*", "(", ")", "$", "i"]),
            vec!["id", "+", "id", "*", "(", "id", ")", "$"]
        );
        assert_eq!(split_longest("a==b", ["=", "=="]), vec!["a", "==", "b"]);
    }

    #[test]
    fn test_unknown_characters() {
        assert_eq!(split_longest("aéb", ["a"]), vec!["a", "é", "b"]);
        assert!(split_longest("  ", ["a"]).is_empty());
    }
}
