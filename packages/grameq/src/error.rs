use derive_more::{Display, Error};

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[display("start symbol `{symbol}` must be a single upper-case character")]
    InvalidStartSymbol { symbol: String },
}

pub type Result<T> = std::result::Result<T, Error>;
