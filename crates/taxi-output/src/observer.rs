//! Concrete [`StatsSink`] implementations.
//!
//! Grounded on `dt-sim/src/observer.rs`'s `SimObserver` impls, remapped from
//! agent/tick snapshots to this domain's served-passenger and empty-trip
//! events.

use std::collections::HashMap;

use taxi_core::{cumulative_moving_average, StationId, VehicleId};
use taxi_sim::observer::StatsSink;
use taxi_streams::Pax;

use crate::row::{EmptyTripRow, PaxEventRow, StationWaitBucketRow};

/// Tracks a single running mean passenger wait time (`pickup - arrive`)
/// across the whole fleet.
#[derive(Clone, Debug, Default)]
pub struct MeanWaitSink {
    mean_wait: f64,
    served:    u64,
}

impl MeanWaitSink {
    pub fn new() -> Self {
        MeanWaitSink::default()
    }

    pub fn mean_wait(&self) -> f64 {
        self.mean_wait
    }

    pub fn served(&self) -> u64 {
        self.served
    }
}

impl StatsSink for MeanWaitSink {
    fn on_pax_served(&mut self, pax: &Pax, _vehicle: VehicleId, pickup: u64) {
        let wait = pickup.saturating_sub(pax.arrive) as f64;
        self.mean_wait = cumulative_moving_average(wait, self.mean_wait, self.served);
        self.served += 1;
    }
}

/// A per-station histogram of passenger wait times, bucketed into
/// fixed-width ranges.
pub struct HistogramSink {
    bucket_width: u64,
    buckets:      Vec<HashMap<u64, u64>>,
}

impl HistogramSink {
    /// Bucket waits into ranges of `bucket_width` ticks, one histogram per
    /// station among `num_stations`.
    pub fn new(num_stations: usize, bucket_width: u64) -> Self {
        assert!(bucket_width > 0, "bucket_width must be positive");
        HistogramSink {
            bucket_width,
            buckets: (0..num_stations).map(|_| HashMap::new()).collect(),
        }
    }

    /// Flatten the histogram into rows suitable for CSV export, sorted by
    /// station then bucket.
    pub fn rows(&self) -> Vec<StationWaitBucketRow> {
        let mut rows: Vec<StationWaitBucketRow> = self
            .buckets
            .iter()
            .enumerate()
            .flat_map(|(station, buckets)| {
                buckets.iter().map(move |(&bucket_lower, &count)| StationWaitBucketRow {
                    station: station as u32,
                    bucket_lower,
                    count,
                })
            })
            .collect();
        rows.sort_by_key(|r| (r.station, r.bucket_lower));
        rows
    }
}

impl StatsSink for HistogramSink {
    fn on_pax_served(&mut self, pax: &Pax, _vehicle: VehicleId, pickup: u64) {
        let wait = pickup.saturating_sub(pax.arrive);
        let bucket = (wait / self.bucket_width) * self.bucket_width;
        *self.buckets[pax.origin.index()].entry(bucket).or_insert(0) += 1;
    }
}

/// Records every served-passenger and empty-trip event verbatim, for
/// post-hoc analysis or CSV export. Unbounded — intended for small test runs
/// and demos, not long production runs.
#[derive(Clone, Debug, Default)]
pub struct RawRecorderSink {
    pax_events:  Vec<PaxEventRow>,
    empty_trips: Vec<EmptyTripRow>,
}

impl RawRecorderSink {
    pub fn new() -> Self {
        RawRecorderSink::default()
    }

    pub fn pax_events(&self) -> &[PaxEventRow] {
        &self.pax_events
    }

    pub fn empty_trips(&self) -> &[EmptyTripRow] {
        &self.empty_trips
    }
}

impl StatsSink for RawRecorderSink {
    fn on_pax_served(&mut self, pax: &Pax, vehicle: VehicleId, pickup: u64) {
        self.pax_events.push(PaxEventRow {
            origin:  pax.origin.index() as u32,
            destin:  pax.destin.index() as u32,
            arrive:  pax.arrive,
            vehicle: vehicle.index() as u32,
            pickup,
            wait:    pickup.saturating_sub(pax.arrive),
        });
    }

    fn on_empty_trip(&mut self, origin: StationId, destin: StationId, now: u64) {
        self.empty_trips.push(EmptyTripRow {
            origin: origin.index() as u32,
            destin: destin.index() as u32,
            now,
        });
    }
}
