//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `TaxiCoreError` via `From` impls, or keep them separate and wrap
//! `TaxiCoreError` as one variant. Both patterns are acceptable; prefer
//! whichever keeps error sites clean.
//!
//! Precondition violations (invalid station index, infeasible row sums, ...)
//! are NOT modeled here — those are programming errors and panic at the call
//! site instead (see `SPEC_FULL.md` §7.1). This enum is for conditions an
//! embedder can plausibly react to: malformed fixture data and numerical
//! tolerance failures.

use thiserror::Error;

use crate::StationId;

/// The top-level error type for `taxi-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum TaxiCoreError {
    #[error("station {0} out of range")]
    StationOutOfRange(StationId),

    #[error("matrix is not square, or has a non-zero diagonal at ({0}, {0})")]
    MalformedMatrix(usize),

    #[error("CDF drift {drift:.6} exceeds tolerance {tolerance:.6}")]
    CdfTolerance { drift: f64, tolerance: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `taxi-core` and sub-crates that wrap it.
pub type TaxiCoreResult<T> = Result<T, TaxiCoreError>;
