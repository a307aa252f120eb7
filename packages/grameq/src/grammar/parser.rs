use indexmap::IndexMap;
use log::{trace, warn};
use winnow::{
    combinator::{separated, separated_pair},
    token::{take_till, take_until},
    ModalResult, Parser,
};

use crate::{
    grammar::Grammar,
    language::{NonTerminal, Word, EPSILON},
};

pub const ARROW: &str = "->";
pub const ARROW_GLYPH: &str = "→";
pub const EPSILON_GLYPH: char = 'ε';
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// Rewrites the alternate arrow and epsilon glyphs to their ASCII forms.
pub fn normalize(text: &str) -> String {
    text.replace(ARROW_GLYPH, ARROW)
        .replace(EPSILON_GLYPH, &EPSILON.to_string())
}

fn alternatives<'s>(input: &mut &'s str) -> ModalResult<Vec<&'s str>> {
    separated(0.., take_till(0.., ALTERNATIVE_SEPARATOR), ALTERNATIVE_SEPARATOR).parse_next(input)
}

fn rule<'s>(input: &mut &'s str) -> ModalResult<(&'s str, Vec<&'s str>)> {
    separated_pair(take_until(0.., ARROW), ARROW, alternatives).parse_next(input)
}

/// Splits one normalized line into its head and non-empty alternatives.
/// Lines without an arrow yield `None`.
pub fn parse_rule(line: &str) -> Option<(&str, Vec<&str>)> {
    let (head, alternatives) = rule.parse(line).ok()?;

    Some((
        head.trim(),
        alternatives
            .into_iter()
            .map(str::trim)
            .filter(|alternative| !alternative.is_empty())
            .collect(),
    ))
}

pub fn parse_grammar(text: &str) -> Grammar {
    let text = normalize(text);
    let mut grammar = Grammar::new();
    let mut declarations = IndexMap::<NonTerminal, usize>::new();

    for (number, line) in text.trim().lines().enumerate() {
        let Some((head, alternatives)) = parse_rule(line) else {
            trace!("line {}: no `{}`, skipped", number + 1, ARROW);
            continue;
        };

        let mut chars = head.chars();
        let lhs = match (chars.next(), chars.next()) {
            (Some(c), None) => NonTerminal(c),
            (None, _) => {
                trace!("line {}: empty head, skipped", number + 1);
                continue;
            }
            (Some(_), Some(_)) => {
                warn!(
                    "line {}: head `{}` is longer than one symbol and can never be referenced, skipped",
                    number + 1,
                    head
                );
                continue;
            }
        };

        *declarations.entry(lhs).or_default() += 1;

        for alternative in alternatives {
            if !grammar.add_production(lhs, Word::from(alternative)) {
                trace!("line {}: duplicate production {} → {}", number + 1, lhs, alternative);
            }
        }
    }

    for (lhs, count) in declarations {
        if count > 1 {
            warn!(
                "productions for {} were declared on {} lines and have been merged",
                lhs, count
            );
        }
    }

    grammar
}
