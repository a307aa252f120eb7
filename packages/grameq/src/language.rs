use std::{collections::BTreeSet, fmt::Display};

use derive_more::{Deref, Display, From};
use itertools::Itertools;

use crate::error::Error;

pub const EPSILON: char = '*';

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub char);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal(pub char);

impl TryFrom<&str> for NonTerminal {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.trim().chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_uppercase() => Ok(NonTerminal(c)),
            _ => Err(Error::InvalidStartSymbol {
                symbol: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
    #[display("*")]
    Epsilon,
}

impl Symbol {
    /// Upper-case characters are non-terminals, the epsilon marker is its own
    /// class and everything else is a terminal.
    pub fn classify(c: char) -> Self {
        if c == EPSILON {
            Symbol::Epsilon
        } else if c.is_uppercase() {
            Symbol::NonTerminal(NonTerminal(c))
        } else {
            Symbol::Terminal(Terminal(c))
        }
    }

    pub fn as_non_terminal(&self) -> Option<NonTerminal> {
        match self {
            Symbol::NonTerminal(nt) => Some(*nt),
            _ => None,
        }
    }
}

/// A production, or a sentential form reached while deriving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Word(pub Vec<Symbol>);

impl Word {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Word(symbols.into_iter().collect())
    }

    pub fn epsilon() -> Self {
        Word(vec![Symbol::Epsilon])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.0.iter()
    }

    /// True only for the single-marker production, not for words that merely
    /// contain epsilon markers.
    pub fn is_epsilon(&self) -> bool {
        self.0 == [Symbol::Epsilon]
    }

    pub fn is_terminal(&self) -> bool {
        self.0
            .iter()
            .all(|symbol| !matches!(symbol, Symbol::NonTerminal(_)))
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = NonTerminal> + '_ {
        self.0.iter().filter_map(Symbol::as_non_terminal)
    }

    pub fn leftmost_non_terminal(&self) -> Option<(usize, NonTerminal)> {
        self.0
            .iter()
            .enumerate()
            .find_map(|(i, symbol)| symbol.as_non_terminal().map(|nt| (i, nt)))
    }

    /// Substitutes `replacement` for the single symbol at `index`.
    pub fn replace_at(&self, index: usize, replacement: &Word) -> Word {
        let mut symbols = Vec::with_capacity(self.0.len() + replacement.0.len() - 1);
        symbols.extend_from_slice(&self.0[..index]);
        symbols.extend_from_slice(&replacement.0);
        symbols.extend_from_slice(&self.0[index + 1..]);

        Word(symbols)
    }

    /// The terminal string this word spells, with epsilon markers removed.
    pub fn to_terminal_string(&self) -> String {
        self.0
            .iter()
            .filter_map(|symbol| match symbol {
                Symbol::Terminal(t) => Some(t.0),
                Symbol::NonTerminal(nt) => Some(nt.0),
                Symbol::Epsilon => None,
            })
            .collect()
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        Word(value.chars().map(Symbol::classify).collect())
    }
}

impl From<NonTerminal> for Word {
    fn from(value: NonTerminal) -> Self {
        Word(vec![Symbol::NonTerminal(value)])
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }

        Ok(())
    }
}

/// A finite set of terminal strings, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, From)]
pub struct Language(BTreeSet<String>);

impl Language {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: String) -> bool {
        self.0.insert(word)
    }

    pub fn difference(&self, other: &Language) -> Language {
        Language(self.0.difference(&other.0).cloned().collect())
    }

    pub fn into_inner(self) -> BTreeSet<String> {
        self.0
    }
}

impl FromIterator<String> for Language {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Language(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Language {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Language(iter.into_iter().map(ToOwned::to_owned).collect())
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .map(|word| if word.is_empty() { "ε" } else { word.as_str() })
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_symbols() {
        assert_eq!(Symbol::classify('A'), Symbol::NonTerminal(NonTerminal('A')));
        assert_eq!(Symbol::classify('a'), Symbol::Terminal(Terminal('a')));
        assert_eq!(Symbol::classify('0'), Symbol::Terminal(Terminal('0')));
        assert_eq!(Symbol::classify('*'), Symbol::Epsilon);
    }

    #[test]
    fn finds_leftmost_non_terminal() {
        let word = Word::from("abCdE");
        assert_eq!(word.leftmost_non_terminal(), Some((2, NonTerminal('C'))));
        assert_eq!(Word::from("ab*").leftmost_non_terminal(), None);
    }

    #[test]
    fn replaces_single_symbol() {
        let word = Word::from("aSb");
        assert_eq!(word.replace_at(1, &Word::from("aSb")), Word::from("aaSbb"));
        assert_eq!(word.replace_at(1, &Word::epsilon()), Word::from("a*b"));
    }

    #[test]
    fn strips_epsilon_markers() {
        assert_eq!(Word::from("a*b*").to_terminal_string(), "ab");
        assert_eq!(Word::epsilon().to_terminal_string(), "");
        assert!(Word::from("a*b").is_terminal());
        assert!(!Word::from("a*B").is_terminal());
    }

    #[test]
    fn epsilon_word_is_only_the_marker() {
        assert!(Word::from("*").is_epsilon());
        assert!(!Word::from("**").is_epsilon());
        assert!(!Word::from("a*").is_epsilon());
    }

    #[test]
    fn parses_start_symbols() {
        assert_eq!(NonTerminal::try_from("S"), Ok(NonTerminal('S')));
        assert_eq!(NonTerminal::try_from(" T "), Ok(NonTerminal('T')));
        assert!(NonTerminal::try_from("s").is_err());
        assert!(NonTerminal::try_from("").is_err());
        assert!(NonTerminal::try_from("ST").is_err());
    }

    #[test]
    fn language_difference_and_display() {
        let first = ["", "a", "ab"].into_iter().collect::<Language>();
        let second = ["a"].into_iter().collect::<Language>();

        assert_eq!(
            first.difference(&second),
            ["", "ab"].into_iter().collect::<Language>()
        );
        assert_eq!(first.to_string(), "{ε, a, ab}");
    }
}
