use itertools::{Either, Itertools};
use log::{debug, trace, warn};

use crate::{
    derivation::{Bounds, Enumerator},
    grammar::{analysis::analyze, mapping::SymbolMapping, Grammar},
    language::NonTerminal,
};

/// Above this many non-terminals in the first grammar the search is skipped.
pub const MAX_SEARCH_NON_TERMINALS: usize = 6;

/// Length cap for the enumerations compared during the search.
pub const DEFAULT_SEARCH_MAX_LEN: usize = 15;

/// Looks for a renaming of the first grammar's non-terminals under which it
/// enumerates the same strings as the second grammar.
#[derive(Debug, Clone)]
pub struct MappingSearch<'a> {
    first: &'a Grammar,
    first_start: NonTerminal,
    second: &'a Grammar,
    second_start: NonTerminal,
    bounds: Bounds,
    structural_filter: bool,
    candidate_limit: Option<usize>,
    step_limit: Option<usize>,
}

impl<'a> MappingSearch<'a> {
    pub fn new(
        first: &'a Grammar,
        first_start: NonTerminal,
        second: &'a Grammar,
        second_start: NonTerminal,
        max_depth: usize,
    ) -> Self {
        Self {
            first,
            first_start,
            second,
            second_start,
            bounds: Bounds::new(max_depth, DEFAULT_SEARCH_MAX_LEN),
            structural_filter: false,
            candidate_limit: None,
            step_limit: None,
        }
    }

    pub fn with_max_len(mut self, max_len: Option<usize>) -> Self {
        self.bounds.max_len = max_len;
        self
    }

    /// Only pairs non-terminals whose production shapes agree. Cheaper, but
    /// may skip a mapping the exhaustive search would accept.
    pub fn with_structural_filter(mut self, structural_filter: bool) -> Self {
        self.structural_filter = structural_filter;
        self
    }

    pub fn with_candidate_limit(mut self, candidate_limit: Option<usize>) -> Self {
        self.candidate_limit = candidate_limit;
        self
    }

    pub fn with_step_limit(mut self, step_limit: Option<usize>) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Every candidate mapping, in permutation order. The start symbols are
    /// always paired with each other.
    pub fn candidates(&self) -> impl Iterator<Item = SymbolMapping> + 'a {
        let first_non_terminals = self.first.non_terminals();
        let second_non_terminals = self.second.non_terminals();

        if first_non_terminals.len() > MAX_SEARCH_NON_TERMINALS {
            warn!(
                "first grammar has {} non-terminals, more than the {} the mapping search handles; skipping it",
                first_non_terminals.len(),
                MAX_SEARCH_NON_TERMINALS
            );
            return Either::Left(std::iter::empty());
        }

        if first_non_terminals.len() != second_non_terminals.len() {
            warn!(
                "grammars have different numbers of non-terminals ({} vs {}); a mapping is less likely",
                first_non_terminals.len(),
                second_non_terminals.len()
            );
        }

        let (first_start, second_start) = (self.first_start, self.second_start);
        let rest_first = first_non_terminals
            .into_iter()
            .filter(|nt| *nt != first_start)
            .collect::<Vec<_>>();
        let rest_second = second_non_terminals
            .into_iter()
            .filter(|nt| *nt != second_start)
            .collect::<Vec<_>>();

        let profiles = self
            .structural_filter
            .then(|| (analyze(self.first), analyze(self.second)));

        let candidates = rest_second
            .into_iter()
            .permutations(rest_first.len())
            .filter_map(move |targets| {
                let pairs = rest_first.iter().copied().zip(targets);

                if let Some((first, second)) = &profiles {
                    let compatible = pairs.clone().all(|(from, to)| {
                        first
                            .features(&from)
                            .is_compatible_with(&second.features(&to))
                    });
                    if !compatible {
                        return None;
                    }
                }

                Some(
                    std::iter::once((first_start, second_start))
                        .chain(pairs)
                        .collect::<SymbolMapping>(),
                )
            });

        Either::Right(candidates.take(self.candidate_limit.unwrap_or(usize::MAX)))
    }

    pub fn find(&self) -> Option<SymbolMapping> {
        let target = Enumerator::new(self.second, self.bounds)
            .with_step_limit(self.step_limit)
            .enumerate(self.second_start);

        let mut tried = 0;
        let found = self.candidates().find(|mapping| {
            tried += 1;

            let mapped = mapping.apply(self.first);
            let language = Enumerator::new(&mapped, self.bounds)
                .with_step_limit(self.step_limit)
                .enumerate(self.second_start);

            trace!("candidate {}: {} strings", mapping, language.len());

            language == target
        });

        match &found {
            Some(mapping) => debug!("mapping {} matched after {} candidates", mapping, tried),
            None => debug!("no mapping matched among {} candidates", tried),
        }

        found
    }
}

pub fn find_mapping(
    first: &Grammar,
    second: &Grammar,
    first_start: NonTerminal,
    second_start: NonTerminal,
    max_depth: usize,
) -> Option<SymbolMapping> {
    MappingSearch::new(first, first_start, second, second_start, max_depth).find()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search<'a>(first: &'a Grammar, second: &'a Grammar, max_depth: usize) -> MappingSearch<'a> {
        MappingSearch::new(first, NonTerminal('S'), second, NonTerminal('S'), max_depth)
    }

    #[test]
    fn finds_renaming_of_undefined_reference() {
        let first = Grammar::parse("S -> aB\nA -> b");
        let second = Grammar::parse("S -> aB\nB -> b");

        let mapping = find_mapping(&first, &second, NonTerminal('S'), NonTerminal('S'), 5);

        assert_eq!(
            mapping,
            Some(SymbolMapping::from_iter([
                (NonTerminal('S'), NonTerminal('S')),
                (NonTerminal('A'), NonTerminal('B')),
            ]))
        );
    }

    #[test]
    fn renaming_cannot_fix_terminals() {
        let first = Grammar::parse("S -> Aa\nA -> b");
        let second = Grammar::parse("S -> Bc\nB -> a");

        assert_eq!(search(&first, &second, 5).candidates().count(), 1);
        assert_eq!(search(&first, &second, 5).find(), None);
    }

    #[test]
    fn start_symbols_are_always_paired() {
        let first = Grammar::parse("S -> A | B\nA -> a\nB -> b");
        let second = Grammar::parse("T -> X | Y | Z\nX -> a\nY -> b\nZ -> c");
        let search = MappingSearch::new(&first, NonTerminal('S'), &second, NonTerminal('T'), 4);

        let candidates = search.candidates().collect::<Vec<_>>();

        assert_eq!(candidates.len(), 6);
        assert!(candidates
            .iter()
            .all(|mapping| mapping.get(&NonTerminal('S')) == Some(NonTerminal('T'))));
        assert!(candidates.iter().all(|mapping| mapping.len() == 3));
    }

    #[test]
    fn too_few_target_symbols_yield_no_candidates() {
        let first = Grammar::parse("S -> A | B\nA -> a\nB -> b");
        let second = Grammar::parse("S -> X\nX -> a | b");

        assert_eq!(search(&first, &second, 4).candidates().count(), 0);
    }

    #[test]
    fn single_start_symbol_has_one_candidate() {
        let first = Grammar::parse("S -> a");
        let second = Grammar::parse("T -> a");
        let search = MappingSearch::new(&first, NonTerminal('S'), &second, NonTerminal('T'), 3);

        let candidates = search.candidates().collect::<Vec<_>>();
        assert_eq!(
            candidates,
            vec![SymbolMapping::from_iter([(NonTerminal('S'), NonTerminal('T'))])]
        );
    }

    #[test]
    fn skips_large_grammars() {
        let text = "S -> A\nA -> B\nB -> C\nC -> D\nD -> E\nE -> F\nF -> a";
        let first = Grammar::parse(text);
        let second = Grammar::parse(text);

        assert_eq!(first.non_terminals().len(), MAX_SEARCH_NON_TERMINALS + 1);
        assert_eq!(search(&first, &second, 10).candidates().count(), 0);
        assert_eq!(search(&first, &second, 10).find(), None);
    }

    #[test]
    fn six_non_terminals_are_still_searched() {
        let text = "S -> A\nA -> B\nB -> C\nC -> D\nD -> E\nE -> a";
        let first = Grammar::parse(text);
        let second = Grammar::parse(text);

        assert_eq!(first.non_terminals().len(), MAX_SEARCH_NON_TERMINALS);
        assert!(search(&first, &second, 10).find().is_some());
    }

    #[test]
    fn candidate_limit_bounds_the_sequence() {
        let first = Grammar::parse("S -> A | B\nA -> a\nB -> b");
        let second = Grammar::parse("S -> X | Y | Z\nX -> a\nY -> b\nZ -> c");

        let limited = search(&first, &second, 4).with_candidate_limit(Some(2));
        assert_eq!(limited.candidates().count(), 2);
    }

    #[test]
    fn structural_filter_prunes_incompatible_pairs() {
        let first = Grammar::parse("S -> aA | B\nA -> a\nB -> *");
        let second = Grammar::parse("S -> aX | Y\nX -> *\nY -> a");

        assert_eq!(search(&first, &second, 4).candidates().count(), 2);

        let filtered = search(&first, &second, 4)
            .with_structural_filter(true)
            .candidates()
            .collect::<Vec<_>>();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].get(&NonTerminal('A')), Some(NonTerminal('Y')));
        assert_eq!(filtered[0].get(&NonTerminal('B')), Some(NonTerminal('X')));
    }

    #[test]
    fn search_uses_its_own_length_cap() {
        let first = Grammar::parse("S -> aS | *");
        let search = search(&first, &first, 6);

        assert_eq!(search.bounds(), Bounds::new(6, DEFAULT_SEARCH_MAX_LEN));
        assert_eq!(search.with_max_len(Some(3)).bounds(), Bounds::new(6, 3));
    }
}
