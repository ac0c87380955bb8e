use std::path::PathBuf;

use crate::balance::{Outcome, Side};

/// Errors that abort a run. Row-local decode failures never reach this type.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Input file {0:?} not found")]
    InputNotFound(PathBuf),

    #[error("Input has no '{0}' column")]
    MissingColumn(String),

    #[error("Schema mismatch at column {column}: expected '{expected}', found '{found}'")]
    SchemaMismatch {
        column: usize,
        expected: String,
        found: String,
    },

    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: u64, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Category ({side}, {outcome}) is empty, cannot balance")]
    EmptyCategory { side: Side, outcome: Outcome },

    #[error("No evaluation bins to balance")]
    EmptyBin,

    #[error("Cannot normalize an empty table")]
    EmptyTable,

    #[error("Cannot normalize: every evaluation equals {0}")]
    DegenerateRange(i32),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
