use crate::nfa::NFA;

/// The ordered set of symbols a DFA has transitions for
///
/// Symbols are kept sorted and deduplicated, so a symbol's position in the
/// alphabet is its column in the DFA transition table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Create an alphabet from any collection of symbols
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        let mut symbols: Vec<char> = symbols.into_iter().collect();
        symbols.sort_unstable();
        symbols.dedup();
        Self { symbols }
    }

    /// The fixed ten-digit, `.`, `a`, `b`, `c` alphabet.
    pub fn classic() -> Self {
        Self::new("0123456789.abc".chars())
    }

    /// Every symbol that labels some transition in `nfa`.
    pub fn from_nfa(nfa: &NFA) -> Self {
        Self::new(nfa.symbols())
    }

    /// Position of `symbol` in the alphabet, if present
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.symbols.binary_search(&symbol).ok()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index_of(symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over symbols in ascending order
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}
