use std::collections::BTreeSet;

/// Ticker symbols of one exchange's SME tier.
///
/// An empty universe means "unknown", and filtering treats it as no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolUniverse {
    symbols: BTreeSet<String>,
}

impl SymbolUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a ticker after trimming and uppercasing. Blank input is ignored.
    pub fn insert(&mut self, symbol: &str) -> bool {
        let normalized = symbol.trim().to_uppercase();
        if normalized.is_empty() {
            return false;
        }
        self.symbols.insert(normalized)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(&symbol.trim().to_uppercase())
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for SymbolUniverse {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut universe = Self::new();
        for symbol in iter {
            universe.insert(symbol.as_ref());
        }
        universe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let universe: SymbolUniverse = ["abc", " Def "].into_iter().collect();
        assert!(universe.contains("ABC"));
        assert!(universe.contains("def"));
        assert!(!universe.contains("XYZ"));
        assert_eq!(universe.len(), 2);
    }

    #[test]
    fn blank_symbols_are_not_inserted() {
        let mut universe = SymbolUniverse::new();
        assert!(!universe.insert("   "));
        assert!(universe.is_empty());
    }
}
