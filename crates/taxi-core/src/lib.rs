//! `taxi-core` — foundational types for the `taxi-sim` fleet simulation framework.
//!
//! This crate is a dependency of every other crate in the workspace. It
//! intentionally has no workspace-internal dependencies and minimal external
//! ones (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `StationId`, `VehicleId`                               |
//! | [`time`]     | `Tick` — an integer simulation-time counter             |
//! | [`rng`]      | `SimRng` — the single process-wide uniform source       |
//! | [`matrix`]   | `SquareMatrix<T>`, cumulative moving average, row-sum-constrained matrix enumeration |
//! | [`error`]    | `TaxiCoreError`, `TaxiCoreResult`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod matrix;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TaxiCoreError, TaxiCoreResult};
pub use ids::{StationId, VehicleId};
pub use matrix::{
    all_square_matrices_with_row_sums_lte, cumulative_moving_average,
    each_square_matrix_with_row_sums_lte, SquareMatrix,
};
pub use rng::SimRng;
pub use time::Tick;
