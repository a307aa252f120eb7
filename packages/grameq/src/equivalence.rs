pub mod search;

use std::fmt::Display;

use derive_more::Display;
use log::{debug, info};
use tabled::{builder::Builder, settings::Style};

use crate::{
    derivation::{Bounds, Enumerator},
    error::Result,
    grammar::{mapping::SymbolMapping, Grammar},
    language::{Language, NonTerminal},
};

use search::{MappingSearch, DEFAULT_SEARCH_MAX_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    pub max_depth: usize,
    pub max_len: usize,
    /// Length cap inside the mapping search. It is independent of `max_len`
    /// unless `unify_bounds` is used.
    pub search_max_len: Option<usize>,
    pub structural_filter: bool,
    pub candidate_limit: Option<usize>,
    pub step_limit: Option<usize>,
}

impl CheckConfig {
    pub fn new(max_depth: usize, max_len: usize) -> Self {
        Self {
            max_depth,
            max_len,
            search_max_len: Some(DEFAULT_SEARCH_MAX_LEN),
            structural_filter: false,
            candidate_limit: None,
            step_limit: None,
        }
    }

    pub fn unify_bounds(mut self) -> Self {
        self.search_max_len = Some(self.max_len);
        self
    }

    pub fn with_search_max_len(mut self, search_max_len: Option<usize>) -> Self {
        self.search_max_len = search_max_len;
        self
    }

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
        Bounds::new(self.max_depth, self.max_len)
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    #[display("the grammars appear equivalent within the given depth and length")]
    Equivalent,
    #[display("the grammars are equivalent under the symbol mapping found")]
    EquivalentUnderMapping,
    #[display("the grammars are not equivalent, even under the symbol mapping found")]
    NotEquivalentUnderMapping,
    #[display("the grammars are not equivalent within the given depth")]
    NotEquivalent,
}

impl Verdict {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Verdict::Equivalent | Verdict::EquivalentUnderMapping)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceReport {
    pub verdict: Verdict,
    pub first: Language,
    pub second: Language,
    pub mapping: Option<SymbolMapping>,
    /// What the first grammar generates once the mapping is applied.
    pub first_mapped: Option<Language>,
    /// Strings only the first grammar generates; present on a negative verdict.
    pub only_in_first: Option<Language>,
    /// Strings only the second grammar generates; present on a negative verdict.
    pub only_in_second: Option<Language>,
}

impl EquivalenceReport {
    pub fn is_equivalent(&self) -> bool {
        self.verdict.is_equivalent()
    }
}

#[derive(Debug, Clone)]
pub struct EquivalenceChecker {
    config: CheckConfig,
}

impl EquivalenceChecker {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn check(
        &self,
        first: &Grammar,
        second: &Grammar,
        first_start: &str,
        second_start: &str,
    ) -> Result<EquivalenceReport> {
        let first_start = NonTerminal::try_from(first_start)?;
        let second_start = NonTerminal::try_from(second_start)?;

        Ok(self.check_symbols(first, second, first_start, second_start))
    }

    pub fn check_symbols(
        &self,
        first: &Grammar,
        second: &Grammar,
        first_start: NonTerminal,
        second_start: NonTerminal,
    ) -> EquivalenceReport {
        let config = &self.config;
        let enumerate = |grammar: &Grammar, start: NonTerminal| {
            Enumerator::new(grammar, config.bounds())
                .with_step_limit(config.step_limit)
                .enumerate(start)
        };

        let first_language = enumerate(first, first_start);
        let second_language = enumerate(second, second_start);

        if first_language == second_language {
            debug!("languages match directly");

            return EquivalenceReport {
                verdict: Verdict::Equivalent,
                first: first_language,
                second: second_language,
                mapping: None,
                first_mapped: None,
                only_in_first: None,
                only_in_second: None,
            };
        }

        info!("languages differ directly; searching for a symbol mapping");

        let mapping = MappingSearch::new(first, first_start, second, second_start, config.max_depth)
            .with_max_len(config.search_max_len)
            .with_structural_filter(config.structural_filter)
            .with_candidate_limit(config.candidate_limit)
            .with_step_limit(config.step_limit)
            .find();

        match mapping {
            Some(mapping) => {
                let first_mapped = enumerate(&mapping.apply(first), second_start);

                if first_mapped == second_language {
                    debug!("languages match under mapping {}", mapping);

                    EquivalenceReport {
                        verdict: Verdict::EquivalentUnderMapping,
                        first: first_language,
                        second: second_language,
                        mapping: Some(mapping),
                        first_mapped: Some(first_mapped),
                        only_in_first: None,
                        only_in_second: None,
                    }
                } else {
                    debug!("mapping {} does not hold under the length bound", mapping);

                    EquivalenceReport {
                        verdict: Verdict::NotEquivalentUnderMapping,
                        only_in_first: Some(first_mapped.difference(&second_language)),
                        only_in_second: Some(second_language.difference(&first_mapped)),
                        first: first_language,
                        second: second_language,
                        mapping: Some(mapping),
                        first_mapped: Some(first_mapped),
                    }
                }
            }
            None => EquivalenceReport {
                verdict: Verdict::NotEquivalent,
                only_in_first: Some(first_language.difference(&second_language)),
                only_in_second: Some(second_language.difference(&first_language)),
                first: first_language,
                second: second_language,
                mapping: None,
                first_mapped: None,
            },
        }
    }
}

pub fn check(
    first: &Grammar,
    second: &Grammar,
    first_start: &str,
    second_start: &str,
    max_depth: usize,
    max_len: usize,
) -> Result<EquivalenceReport> {
    EquivalenceChecker::new(CheckConfig::new(max_depth, max_len)).check(
        first,
        second,
        first_start,
        second_start,
    )
}

fn column(language: &Language) -> Vec<String> {
    language
        .iter()
        .map(|word| {
            if word.is_empty() {
                "ε".to_string()
            } else {
                word.clone()
            }
        })
        .collect()
}

fn side_by_side(headers: [&str; 2], left: &Language, right: &Language) -> String {
    let (left, right) = (column(left), column(right));
    let mut builder = Builder::default();

    builder.push_record(headers.map(ToString::to_string));
    for i in 0..left.len().max(right.len()) {
        builder.push_record([
            left.get(i).cloned().unwrap_or_default(),
            right.get(i).cloned().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    table.to_string()
}

impl Display for EquivalenceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Generated strings:")?;
        writeln!(
            f,
            "{}",
            side_by_side(["grammar 1", "grammar 2"], &self.first, &self.second)
        )?;

        if let Some(mapping) = &self.mapping {
            writeln!(f, "Symbol mapping: {}", mapping)?;
        }

        if let Some(first_mapped) = &self.first_mapped {
            writeln!(f, "Generated strings with the mapping applied:")?;
            writeln!(
                f,
                "{}",
                side_by_side(["grammar 1 (mapped)", "grammar 2"], first_mapped, &self.second)
            )?;
        }

        if let (Some(only_in_first), Some(only_in_second)) =
            (&self.only_in_first, &self.only_in_second)
        {
            writeln!(f, "Differences:")?;
            writeln!(
                f,
                "{}",
                side_by_side(
                    ["only in grammar 1", "only in grammar 2"],
                    only_in_first,
                    only_in_second
                )
            )?;
        }

        writeln!(f, "{}.", self.verdict)
    }
}
