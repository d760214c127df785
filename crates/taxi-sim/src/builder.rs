//! Fluent builder for constructing a [`Sim`].

use taxi_core::SquareMatrix;

use crate::config::SimConfig;
use crate::observer::{NoopStatsSink, StatsSink};
use crate::proactive::ProactiveHandler;
use crate::reactive::ReactiveHandler;
use crate::sim::Sim;

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - the trip-time matrix
/// - a [`ReactiveHandler`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                  |
/// |-------------------|---------------------------|
/// | `.proactive(p)`   | `ProactiveHandler::None`   |
/// | `.stats(s)`       | `NoopStatsSink`            |
/// | `.fleet_size(n)`  | `0` (add vehicles manually)|
pub struct SimBuilder {
    trip_time: SquareMatrix<i64>,
    config: SimConfig,
    reactive: ReactiveHandler,
    proactive: ProactiveHandler,
    stats: Box<dyn StatsSink>,
    fleet_size: usize,
}

impl SimBuilder {
    pub fn new(trip_time: SquareMatrix<i64>, config: SimConfig, reactive: ReactiveHandler) -> Self {
        SimBuilder {
            trip_time,
            config,
            reactive,
            proactive: ProactiveHandler::None,
            stats: Box::new(NoopStatsSink),
            fleet_size: 0,
        }
    }

    pub fn proactive(mut self, proactive: ProactiveHandler) -> Self {
        self.proactive = proactive;
        self
    }

    pub fn stats(mut self, stats: Box<dyn StatsSink>) -> Self {
        self.stats = stats;
        self
    }

    /// Add `n` vehicles, parked in turn starting at station 0, once built.
    pub fn fleet_size(mut self, n: usize) -> Self {
        self.fleet_size = n;
        self
    }

    pub fn build(self) -> Sim {
        let mut sim = Sim::new(self.trip_time, self.config, self.reactive)
            .with_proactive(self.proactive)
            .with_stats(self.stats);
        sim.add_vehicles_in_turn(self.fleet_size, 0);
        sim
    }
}
