//! Per-station running mean of non-trivial empty-trip call times.
//!
//! Grounded on `bell_wong/bell_wong_call_times.cpp` (the revision that
//! increments `call[destin]` on every update — a sibling, newer revision in
//! `bell_wong/call_times.cpp` drops that increment, which would leave the
//! moving average permanently weighted as if it had seen only one
//! observation; that looks like a retrieval-side regression rather than a
//! deliberate change, so the increment is kept here).

use taxi_core::matrix::cumulative_moving_average;
use taxi_core::SquareMatrix;

/// Tracks, per station, the running mean empty-trip duration of vehicles
/// called in (dispatched empty) to that station.
#[derive(Clone, Debug)]
pub struct CallTimeTracker {
    call_time: Vec<f64>,
    count: Vec<u64>,
}

impl CallTimeTracker {
    /// Initialize call times to the shortest trip time from any other
    /// station, per `SPEC_FULL.md`'s invariant `call_time[i] >= min_{j!=i}
    /// trip_time(j, i)`.
    pub fn new(trip_time: &SquareMatrix<i64>) -> Self {
        let n = trip_time.n();
        let mut call_time = vec![0.0; n];
        for i in 0..n {
            let min_time = (0..n)
                .filter(|&j| j != i)
                .map(|j| trip_time[(j, i)])
                .min()
                .unwrap_or(0);
            call_time[i] = min_time as f64;
        }
        CallTimeTracker {
            call_time,
            count: vec![0; n],
        }
    }

    #[inline]
    pub fn at(&self, i: usize) -> f64 {
        self.call_time[i]
    }

    /// Record an empty vehicle trip from `ev_origin` to `ev_destin`. Trivial
    /// trips (`ev_origin == ev_destin`) are ignored — they never happen over
    /// a non-zero duration and would otherwise drag the mean down.
    pub fn update(&mut self, ev_origin: usize, ev_destin: usize, trip_time: &SquareMatrix<i64>) {
        if ev_origin == ev_destin {
            return;
        }
        let duration = trip_time[(ev_origin, ev_destin)] as f64;
        self.call_time[ev_destin] =
            cumulative_moving_average(duration, self.call_time[ev_destin], self.count[ev_destin]);
        self.count[ev_destin] += 1;
    }
}
