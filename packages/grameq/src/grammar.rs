pub mod analysis;
pub mod mapping;
pub mod parser;

use std::fmt::Display;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::language::{NonTerminal, Symbol, Terminal, Word};

/// A rule set keyed by head. A non-terminal that only ever appears inside
/// productions is legal and simply has no productions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    productions: IndexMap<NonTerminal, IndexSet<Word>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        parser::parse_grammar(text)
    }

    pub fn from_productions(productions: &[(char, &[&str])]) -> Self {
        let mut grammar = Self::new();

        for &(lhs, rhs) in productions {
            for word in rhs {
                grammar.add_production(NonTerminal(lhs), Word::from(*word));
            }
        }

        grammar
    }

    /// Returns false if the production was already present.
    pub fn add_production(&mut self, lhs: NonTerminal, rhs: Word) -> bool {
        self.productions
            .entry(lhs)
            .or_insert_with(IndexSet::new)
            .insert(rhs)
    }

    pub fn productions(&self) -> &IndexMap<NonTerminal, IndexSet<Word>> {
        &self.productions
    }

    pub fn productions_of(&self, lhs: &NonTerminal) -> Option<&IndexSet<Word>> {
        self.productions.get(lhs)
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    pub fn non_terminals(&self) -> IndexSet<NonTerminal> {
        self.productions.keys().copied().collect()
    }

    /// Non-terminals used inside some production but never defined.
    pub fn undefined_non_terminals(&self) -> IndexSet<NonTerminal> {
        self.productions
            .values()
            .flatten()
            .flat_map(Word::non_terminals)
            .filter(|nt| !self.productions.contains_key(nt))
            .collect()
    }

    pub fn terminals(&self) -> IndexSet<Terminal> {
        self.productions
            .values()
            .flatten()
            .flat_map(|word| {
                word.symbols().filter_map(|symbol| match symbol {
                    Symbol::Terminal(t) => Some(*t),
                    _ => None,
                })
            })
            .collect()
    }

    /// Mean symbol count over every non-epsilon production.
    pub fn average_production_length(&self) -> f64 {
        let (total, count) = self
            .productions
            .values()
            .flatten()
            .filter(|word| !word.is_epsilon())
            .fold((0, 0), |(total, count), word| (total + word.len(), count + 1));

        total as f64 / count.max(1) as f64
    }

    pub fn definition(&self, start_symbol: &NonTerminal) -> String {
        let mut non_terminals = self.non_terminals();
        non_terminals.extend(self.undefined_non_terminals());
        non_terminals.insert(*start_symbol);
        non_terminals.sort_by(|a, b| {
            if a == start_symbol {
                return std::cmp::Ordering::Less;
            }
            if b == start_symbol {
                return std::cmp::Ordering::Greater;
            }
            a.cmp(b)
        });

        let mut terminals = self.terminals();
        terminals.sort();

        let mut definition = format!(
            "G = ({{{}}}, {{{}}}, P, {})\n\n",
            non_terminals.iter().join(", "),
            terminals.iter().join(", "),
            start_symbol
        );

        definition += "P = {\n";

        for (lhs, rhs) in self.productions.iter().sorted_by_key(|(lhs, _)| **lhs) {
            definition += &format!("  {} → {}\n", lhs, rhs.iter().join(" | "));
        }

        definition += "}\n";

        definition
    }
}

/// Renders the rule text the parser reads back.
impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (lhs, rhs) in &self.productions {
            writeln!(f, "{} {} {}", lhs, parser::ARROW, rhs.iter().join(" | "))?;
        }

        Ok(())
    }
}
