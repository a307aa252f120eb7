use std::collections::VecDeque;

use indexmap::IndexSet;
use log::{debug, warn};

use crate::{
    grammar::Grammar,
    language::{Language, NonTerminal, Word},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub max_depth: usize,
    /// `None` leaves sentential forms unbounded in length.
    pub max_len: Option<usize>,
}

impl Bounds {
    pub fn new(max_depth: usize, max_len: usize) -> Self {
        Self {
            max_depth,
            max_len: Some(max_len),
        }
    }

    pub fn depth_only(max_depth: usize) -> Self {
        Self {
            max_depth,
            max_len: None,
        }
    }

    fn exceeds_len(&self, word: &Word) -> bool {
        self.max_len.is_some_and(|max_len| word.len() > max_len)
    }
}

#[derive(Debug)]
struct DerivationState {
    word: Word,
    depth: usize,
}

/// Breadth-first leftmost derivation under depth and length bounds.
#[derive(Debug, Clone, Copy)]
pub struct Enumerator<'g> {
    grammar: &'g Grammar,
    bounds: Bounds,
    step_limit: Option<usize>,
}

impl<'g> Enumerator<'g> {
    pub fn new(grammar: &'g Grammar, bounds: Bounds) -> Self {
        Self {
            grammar,
            bounds,
            step_limit: None,
        }
    }

    /// Caps the number of states taken off the queue. Hitting the cap ends the
    /// enumeration early with whatever was found so far.
    pub fn with_step_limit(mut self, step_limit: Option<usize>) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn enumerate(&self, start: NonTerminal) -> Language {
        let mut language = Language::new();
        let mut visited = IndexSet::new();
        let mut queue = VecDeque::from([DerivationState {
            word: Word::from(start),
            depth: 0,
        }]);
        let mut steps = 0;

        while let Some(DerivationState { word, depth }) = queue.pop_front() {
            if self.step_limit.is_some_and(|limit| steps >= limit) {
                warn!(
                    "enumeration from {} stopped after {} steps with {} states still queued",
                    start,
                    steps,
                    queue.len() + 1
                );
                break;
            }
            steps += 1;

            if self.bounds.exceeds_len(&word) || visited.contains(&word) {
                continue;
            }

            if word.is_terminal() {
                language.insert(word.to_terminal_string());
                visited.insert(word);
                continue;
            }

            if depth >= self.bounds.max_depth {
                visited.insert(word);
                continue;
            }

            if let Some((index, nt)) = word.leftmost_non_terminal() {
                if let Some(rhs) = self.grammar.productions_of(&nt) {
                    for production in rhs {
                        queue.push_back(DerivationState {
                            word: word.replace_at(index, production),
                            depth: depth + 1,
                        });
                    }
                }
            }

            visited.insert(word);
        }

        debug!(
            "enumerated {} strings from {} in {} steps ({} distinct forms)",
            language.len(),
            start,
            steps,
            visited.len()
        );

        language
    }
}

pub fn enumerate(
    grammar: &Grammar,
    start: NonTerminal,
    max_depth: usize,
    max_len: usize,
) -> Language {
    Enumerator::new(grammar, Bounds::new(max_depth, max_len)).enumerate(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language(words: &[&str]) -> Language {
        words.iter().copied().collect()
    }

    #[test]
    fn finite_language() {
        let grammar = Grammar::parse("S -> a | b");
        assert_eq!(enumerate(&grammar, NonTerminal('S'), 3, 5), language(&["a", "b"]));
    }

    #[test]
    fn epsilon_production_yields_empty_string() {
        let grammar = Grammar::parse("S -> a | *");
        assert_eq!(enumerate(&grammar, NonTerminal('S'), 1, 1), language(&["a", ""]));
    }

    #[test]
    fn depth_bounds_derivation_steps() {
        let grammar = Grammar::parse("S -> AB\nA -> a\nB -> b");

        assert_eq!(enumerate(&grammar, NonTerminal('S'), 2, 10), language(&[]));
        assert_eq!(enumerate(&grammar, NonTerminal('S'), 3, 10), language(&["ab"]));
    }

    #[test]
    fn length_bounds_sentential_forms() {
        let grammar = Grammar::parse("S -> aS | *");

        assert_eq!(
            enumerate(&grammar, NonTerminal('S'), 3, 10),
            language(&["", "a", "aa"])
        );
        // `aaS` is too long, while `a*` still fits.
        assert_eq!(enumerate(&grammar, NonTerminal('S'), 3, 2), language(&["", "a"]));
    }

    #[test]
    fn inner_epsilon_markers_are_stripped_on_acceptance() {
        let grammar = Grammar::parse("S -> AbA\nA -> a | *");

        assert_eq!(
            enumerate(&grammar, NonTerminal('S'), 5, 10),
            language(&["aba", "ab", "ba", "b"])
        );
        // `AbA` already has three symbols.
        assert_eq!(enumerate(&grammar, NonTerminal('S'), 5, 2), language(&[]));
    }

    #[test]
    fn undefined_non_terminals_are_dead_ends() {
        let grammar = Grammar::parse("S -> aB | c");
        assert_eq!(enumerate(&grammar, NonTerminal('S'), 5, 5), language(&["c"]));
    }

    #[test]
    fn missing_start_symbol_is_empty_language() {
        let grammar = Grammar::parse("S -> a");
        assert!(enumerate(&grammar, NonTerminal('T'), 5, 5).is_empty());
    }

    #[test]
    fn unbounded_length_relies_on_depth() {
        let grammar = Grammar::parse("S -> SS | a");
        let language = Enumerator::new(&grammar, Bounds::depth_only(5)).enumerate(NonTerminal('S'));

        assert!(language.contains("aaa"));
        assert!(language.iter().all(|word| word.chars().all(|c| c == 'a')));
    }

    #[test]
    fn step_limit_truncates() {
        let grammar = Grammar::parse("S -> aS | bS | *");
        let bounds = Bounds::new(10, 20);

        let full = Enumerator::new(&grammar, bounds).enumerate(NonTerminal('S'));
        let truncated = Enumerator::new(&grammar, bounds)
            .with_step_limit(Some(4))
            .enumerate(NonTerminal('S'));

        assert!(truncated.len() < full.len());
        assert!(truncated.iter().all(|word| full.contains(word)));
    }
}
