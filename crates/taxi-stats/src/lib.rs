//! `taxi-stats` — demand modeling and statistics primitives for the
//! `taxi-sim` fleet simulation framework.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|-------------------------------------------------------------------|
//! | [`od_matrix`] | `OdMatrixWrapper` — rates, marginals, trip probabilities, sampling |
//! | [`sampler`]   | `EmpiricalSampler` — O(log n) categorical sampling from a CDF      |
//! | [`histogram`] | `NaturalHistogram`, `OdHistogram`                                  |
//! | [`call_time`] | `CallTimeTracker` — per-station running mean empty-trip call time  |
//! | [`error`]     | `TaxiStatsError`, `TaxiStatsResult`                                |

pub mod call_time;
pub mod error;
pub mod histogram;
pub mod od_matrix;
pub mod sampler;

#[cfg(test)]
mod tests;

pub use call_time::CallTimeTracker;
pub use error::{TaxiStatsError, TaxiStatsResult};
pub use histogram::{NaturalHistogram, OdHistogram};
pub use od_matrix::OdMatrixWrapper;
pub use sampler::EmpiricalSampler;
