//! `taxi-streams` — passenger request streams and CSV fixture loading for
//! the `taxi-sim` fleet simulation framework.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|-------------------------------------------------------------|
//! | [`pax`]    | `Pax` — a single `(origin, destin, arrive)` request          |
//! | [`stream`] | `PaxStream` trait, `PoissonPaxStream`, `DeterministicPaxStream` |
//! | [`loader`] | `load_trip_time_csv`, `load_od_rate_csv` fixture loaders      |
//! | [`error`]  | `TaxiStreamsError`, `TaxiStreamsResult<T>`                    |

pub mod error;
pub mod loader;
pub mod pax;
pub mod stream;

#[cfg(test)]
mod tests;

pub use error::{TaxiStreamsError, TaxiStreamsResult};
pub use loader::{load_od_rate_csv, load_od_rate_reader, load_trip_time_csv, load_trip_time_reader};
pub use pax::Pax;
pub use stream::{DeterministicPaxStream, PaxStream, PoissonPaxStream};
