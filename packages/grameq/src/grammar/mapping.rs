use std::fmt::Display;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::{
    grammar::Grammar,
    language::{NonTerminal, Symbol, Word},
};

/// A renaming of non-terminals. Symbols without an entry are left alone, so a
/// partial mapping is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMapping(IndexMap<NonTerminal, NonTerminal>);

impl SymbolMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(grammar: &Grammar) -> Self {
        grammar
            .non_terminals()
            .into_iter()
            .chain(grammar.undefined_non_terminals())
            .map(|nt| (nt, nt))
            .collect()
    }

    pub fn insert(&mut self, from: NonTerminal, to: NonTerminal) -> Option<NonTerminal> {
        self.0.insert(from, to)
    }

    pub fn get(&self, from: &NonTerminal) -> Option<NonTerminal> {
        self.0.get(from).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NonTerminal, &NonTerminal)> {
        self.0.iter()
    }

    pub fn map_non_terminal(&self, nt: NonTerminal) -> NonTerminal {
        self.get(&nt).unwrap_or(nt)
    }

    pub fn map_word(&self, word: &Word) -> Word {
        Word::new(word.symbols().map(|symbol| match symbol {
            Symbol::NonTerminal(nt) => Symbol::NonTerminal(self.map_non_terminal(*nt)),
            _ => *symbol,
        }))
    }

    /// Rewrites heads and every non-terminal occurrence. Heads that collapse
    /// onto the same target have their productions merged.
    pub fn apply(&self, grammar: &Grammar) -> Grammar {
        let mut mapped = Grammar::new();

        for (lhs, rhs) in grammar.productions() {
            let lhs = self.map_non_terminal(*lhs);

            for word in rhs {
                mapped.add_production(lhs, self.map_word(word));
            }
        }

        mapped
    }
}

impl FromIterator<(NonTerminal, NonTerminal)> for SymbolMapping {
    fn from_iter<I: IntoIterator<Item = (NonTerminal, NonTerminal)>>(iter: I) -> Self {
        SymbolMapping(iter.into_iter().collect())
    }
}

impl Display for SymbolMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .map(|(from, to)| format!("{from} → {to}"))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(char, char)]) -> SymbolMapping {
        pairs
            .iter()
            .map(|&(from, to)| (NonTerminal(from), NonTerminal(to)))
            .collect()
    }

    #[test]
    fn renames_heads_and_occurrences() {
        let grammar = Grammar::parse("S -> aA | b\nA -> Ab | *");
        let mapped = mapping(&[('S', 'T'), ('A', 'B')]).apply(&grammar);

        assert_eq!(mapped, Grammar::parse("T -> aB | b\nB -> Bb | *"));
    }

    #[test]
    fn leaves_unmapped_symbols_alone() {
        let grammar = Grammar::parse("S -> aA | C\nA -> c");
        let mapped = mapping(&[('A', 'B')]).apply(&grammar);

        assert_eq!(mapped, Grammar::parse("S -> aB | C\nB -> c"));
    }

    #[test]
    fn merges_collapsed_heads() {
        let grammar = Grammar::parse("S -> A | B\nA -> a | c\nB -> b | c");
        let mapped = mapping(&[('A', 'X'), ('B', 'X')]).apply(&grammar);

        assert_eq!(mapped, Grammar::parse("S -> X\nX -> a | c | b"));
    }

    #[test]
    fn identity_keeps_grammar() {
        let grammar = Grammar::parse("S -> aA | Bb\nA -> *");
        let identity = SymbolMapping::identity(&grammar);

        assert_eq!(identity.len(), 3);
        assert_eq!(identity.apply(&grammar), grammar);
    }

    #[test]
    fn renders_pairs() {
        assert_eq!(mapping(&[('S', 'T'), ('A', 'B')]).to_string(), "{S → T, A → B}");
    }
}
