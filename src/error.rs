use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{}:{line}: column {column:?} has unusable value {value:?}: {reason}", .path.display())]
    Data {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    #[error("{}: no {column:?} column (have: {available})", .path.display())]
    MissingColumn {
        path: PathBuf,
        column: String,
        available: String,
    },

    #[error("{}: failed to read CSV", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: failed to write CSV", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl FilterError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
