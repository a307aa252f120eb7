use grameq::Grammar;
use log::info;

pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_MAX_LEN: usize = 20;

/// Picks bounds from the average non-terminal count of the two grammars:
/// small grammars get deeper searches, larger ones longer strings.
pub fn tuned_bounds(first: &Grammar, second: &Grammar) -> (usize, usize) {
    let average = (first.non_terminals().len() + second.non_terminals().len()) as f64 / 2.0;

    let max_depth = ((10.0 + (5.0 - average)) as i64).clamp(7, 15) as usize;
    let max_len = ((5.0 * average) as i64).clamp(10, 30) as usize;

    info!(
        "tuned bounds: max depth {}, max length {} (average production length {:.2} / {:.2})",
        max_depth,
        max_len,
        first.average_production_length(),
        second.average_production_length()
    );

    (max_depth, max_len)
}

pub fn bounds(
    first: &Grammar,
    second: &Grammar,
    max_depth: Option<u64>,
    max_len: Option<u64>,
) -> (usize, usize) {
    match (max_depth, max_len) {
        (None, None) => tuned_bounds(first, second),
        (max_depth, max_len) => (
            max_depth.map_or(DEFAULT_MAX_DEPTH, |depth| depth as usize),
            max_len.map_or(DEFAULT_MAX_LEN, |len| len as usize),
        ),
    }
}
