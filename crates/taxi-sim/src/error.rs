//! Recoverable error conditions for the fleet simulators.
//!
//! Precondition violations (out-of-range station index, infeasible action
//! matrix, solver infeasibility) are programming errors and panic at the
//! call site per `SPEC_FULL.md` §7.1 — they do not appear here. This enum
//! only covers conditions an embedder can reasonably react to, composing a
//! lower crate's error the way `dt-sim::SimError::Mobility(#[from]
//! MobilityError)` wraps `dt-mobility` without losing the variant.

use taxi_stats::TaxiStatsError;
use taxi_streams::TaxiStreamsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxiSimError {
    #[error(transparent)]
    Stream(#[from] TaxiStreamsError),

    #[error(transparent)]
    Stats(#[from] TaxiStatsError),
}

pub type TaxiSimResult<T> = Result<T, TaxiSimError>;
