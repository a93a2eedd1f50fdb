use std::{io, path::PathBuf};

use thiserror::Error;

use crate::env::EnvError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("separator must not be empty")]
    EmptySeparator,

    #[error("invalid match target `{0}`, expected a non-empty relative path")]
    InvalidTarget(String),

    #[error(transparent)]
    Environment(#[from] EnvError),

    // last failure of a search that matched nothing
    #[error("failed to check `{}`", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
