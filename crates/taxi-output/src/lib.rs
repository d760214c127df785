//! `taxi-output` — concrete statistics sinks for `taxi-sim`, plus CSV
//! export for their accumulated results.
//!
//! [`taxi_sim::observer::StatsSink`] has one no-op impl ([`taxi_sim::NoopStatsSink`])
//! living alongside the trait in `taxi-sim`; the remaining three sinks named
//! in the external-interface contract live here:
//!
//! | Sink                | Records                                          |
//! |----------------------|---------------------------------------------------|
//! | [`MeanWaitSink`]     | a single running mean passenger wait               |
//! | [`HistogramSink`]    | per-station wait-time histograms                   |
//! | [`RawRecorderSink`]  | every served-passenger and empty-trip event        |
//!
//! # Usage
//!
//! A sink that needs to be read back after the run (anything but
//! `MeanWaitSink`'s final value, which can be logged from `on_sim_end`)
//! should be wrapped in `Rc<RefCell<_>>` and implement [`taxi_sim::observer::StatsSink`]
//! by delegating through the `RefCell`, since [`taxi_sim::Sim`] takes
//! ownership of its sink as `Box<dyn StatsSink>`.

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;

#[cfg(test)]
mod tests;

pub use error::{TaxiOutputError, TaxiOutputResult};
pub use observer::{HistogramSink, MeanWaitSink, RawRecorderSink};
pub use row::{EmptyTripRow, PaxEventRow, StationWaitBucketRow};
