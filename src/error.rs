//! Error types for the uae2ynab library.

use std::io;
use thiserror::Error;

use crate::types::Classification;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during detection, extraction and normalization.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing CSV data.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error loading or decoding a PDF document.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// File content matched no known bank/statement signature. Fatal for the file.
    #[error("unrecognized statement format: {0}")]
    UnrecognizedFormat(String),

    /// Format was recognized but no transaction table could be located. Fatal
    /// for the file, distinct from an unrecognized format.
    #[error("{0} statement contains no transaction table")]
    NoTransactionTable(Classification),

    /// Invalid date format. Row-level.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Invalid amount format. Row-level.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A zero amount never describes a real transaction. Row-level.
    #[error("zero amount in row dated {0}")]
    ZeroAmount(String),

    /// Missing required field. Row-level.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Background parse task failed to complete.
    #[error("parse task failed: {0}")]
    Task(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl Error {
    /// Row-level errors are recovered by skipping the row; anything else is
    /// fatal for the whole file.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            Error::InvalidDate(_)
                | Error::InvalidAmount(_)
                | Error::ZeroAmount(_)
                | Error::MissingField(_)
        )
    }
}
