//! Error types for taxi-output.

use thiserror::Error;

/// Errors that can occur when exporting recorded statistics.
#[derive(Debug, Error)]
pub enum TaxiOutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, TaxiOutputError>`.
pub type TaxiOutputResult<T> = Result<T, TaxiOutputError>;
