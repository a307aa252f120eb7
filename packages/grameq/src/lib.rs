pub mod derivation;
pub mod equivalence;
pub mod error;
pub mod grammar;
pub mod language;

pub use derivation::{enumerate, Bounds, Enumerator};
pub use equivalence::{
    check,
    search::{find_mapping, MappingSearch},
    CheckConfig, EquivalenceChecker, EquivalenceReport, Verdict,
};
pub use error::{Error, Result};
pub use grammar::{
    analysis::{analyze, StructuralAnalysis, StructuralFeatures},
    mapping::SymbolMapping,
    Grammar,
};
pub use language::{Language, NonTerminal, Symbol, Terminal, Word, EPSILON};
