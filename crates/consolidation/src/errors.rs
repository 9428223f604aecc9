use std::{io, path::PathBuf};

use miette::Diagnostic;
use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T, E = ConsolidationError> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Error)]
pub enum ConsolidationError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[diagnostic(help(
        "tables must be comma-separated (.csv) or tab-separated (.tsv or .txt) text files"
    ))]
    #[error("the table {path:?} is not in a supported format")]
    UnsupportedTable { path: PathBuf },

    #[diagnostic(help(
        "a batch file lists one replicate per row, with filename, area_filename, condition_id, and replicate_id columns"
    ))]
    #[error("the batch file {path:?} is invalid: {reason}")]
    InvalidBatch { path: PathBuf, reason: String },

    #[error("the table {table:?} has no {column:?} column")]
    MissingColumn { table: PathBuf, column: String },

    #[error("protein annotation failed: {message}")]
    Annotation { message: String },
}

impl ConsolidationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();

        Self::Io { path, source }
    }
}
