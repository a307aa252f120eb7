use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Approximate equivalence check between two grammars")]
pub struct Cli {
    /// File containing the first grammar
    pub first: PathBuf,

    /// File containing the second grammar
    pub second: PathBuf,

    /// Start symbol of the first grammar
    #[arg(long, value_name = "SYMBOL", default_value = "S")]
    pub start1: String,

    /// Start symbol of the second grammar
    #[arg(long, value_name = "SYMBOL", default_value = "S")]
    pub start2: String,

    /// Maximum derivation depth (default: tuned from the grammars)
    #[arg(short = 'd', long, value_name = "DEPTH", value_parser = clap::value_parser!(u64).range(3..=15))]
    pub max_depth: Option<u64>,

    /// Maximum sentential form length (default: tuned from the grammars)
    #[arg(short = 'l', long, value_name = "LENGTH", value_parser = clap::value_parser!(u64).range(5..=30))]
    pub max_len: Option<u64>,

    /// Use the length bound inside the mapping search as well
    #[arg(long)]
    pub unify_bounds: bool,

    /// Only pair non-terminals with matching production shapes
    #[arg(long)]
    pub structural_filter: bool,

    /// Stop the mapping search after this many candidates
    #[arg(long, value_name = "COUNT")]
    pub candidate_limit: Option<usize>,

    /// Stop each enumeration after this many derivation steps
    #[arg(long, value_name = "STEPS")]
    pub step_limit: Option<usize>,

    /// Print the parsed grammars and their structural features
    #[arg(short, long)]
    pub verbose: bool,
}
