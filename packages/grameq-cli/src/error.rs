use std::{io, path::PathBuf};

use derive_more::{Display, Error, From};

#[derive(Debug, Display, Error, From)]
pub enum CliError {
    #[display("could not read {}: {source}", path.display())]
    #[from(skip)]
    Read { path: PathBuf, source: io::Error },
    #[display("{_0}")]
    Check(grameq::Error),
}
