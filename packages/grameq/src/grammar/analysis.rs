use std::fmt::Display;

use derive_more::Deref;
use indexmap::IndexMap;
use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::{
    grammar::Grammar,
    language::{NonTerminal, Symbol, Terminal},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralFeatures {
    pub total_productions: usize,
    pub epsilon_count: usize,
    pub terminal_only_count: usize,
    pub non_terminal_only_count: usize,
    pub mixed_count: usize,
    pub terminal_occurrences: IndexMap<Terminal, usize>,
}

/// Which production shapes a non-terminal has at all, ignoring how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Profile {
    pub erasing: bool,
    pub terminal_only: bool,
    pub non_terminal_only: bool,
    pub mixed: bool,
}

impl StructuralFeatures {
    pub fn profile(&self) -> Profile {
        Profile {
            erasing: self.epsilon_count > 0,
            terminal_only: self.terminal_only_count > 0,
            non_terminal_only: self.non_terminal_only_count > 0,
            mixed: self.mixed_count > 0,
        }
    }

    pub fn is_compatible_with(&self, other: &StructuralFeatures) -> bool {
        self.profile() == other.profile()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct StructuralAnalysis(IndexMap<NonTerminal, StructuralFeatures>);

impl StructuralAnalysis {
    /// Undefined non-terminals get an all-zero record.
    pub fn features(&self, nt: &NonTerminal) -> StructuralFeatures {
        self.0.get(nt).cloned().unwrap_or_default()
    }
}

pub fn analyze(grammar: &Grammar) -> StructuralAnalysis {
    let mut analysis = IndexMap::new();

    for (lhs, rhs) in grammar.productions() {
        let mut features = StructuralFeatures {
            total_productions: rhs.len(),
            ..Default::default()
        };

        for word in rhs {
            if word.is_epsilon() {
                features.epsilon_count += 1;
                continue;
            }

            let mut has_terminal = false;
            let mut has_non_terminal = false;

            for symbol in word.symbols() {
                match symbol {
                    Symbol::NonTerminal(_) => has_non_terminal = true,
                    Symbol::Terminal(t) => {
                        has_terminal = true;
                        *features.terminal_occurrences.entry(*t).or_default() += 1;
                    }
                    Symbol::Epsilon => {}
                }
            }

            match (has_terminal, has_non_terminal) {
                (true, false) => features.terminal_only_count += 1,
                (false, true) => features.non_terminal_only_count += 1,
                (true, true) => features.mixed_count += 1,
                (false, false) => {}
            }
        }

        analysis.insert(*lhs, features);
    }

    for nt in grammar.undefined_non_terminals() {
        analysis.insert(nt, StructuralFeatures::default());
    }

    StructuralAnalysis(analysis)
}

impl Display for StructuralAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = Builder::default();

        builder.push_record(
            [
                "",
                "productions",
                "ε",
                "terminal only",
                "non-terminal only",
                "mixed",
                "terminal occurrences",
            ]
            .map(ToString::to_string),
        );

        for (nt, features) in &self.0 {
            builder.push_record([
                nt.to_string(),
                features.total_productions.to_string(),
                features.epsilon_count.to_string(),
                features.terminal_only_count.to_string(),
                features.non_terminal_only_count.to_string(),
                features.mixed_count.to_string(),
                features
                    .terminal_occurrences
                    .iter()
                    .map(|(t, count)| format!("{t}: {count}"))
                    .join(", "),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        write!(f, "{}", table)
    }
}
