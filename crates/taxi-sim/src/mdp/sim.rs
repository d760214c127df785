//! The discrete-time MDP fleet simulator.
//!
//! Grounded on `mdp_sim/mdp_sim.h/.cpp`'s `MDPSim::tick`. State per station
//! is a waiting-passenger queue and an inbound-vehicle count; each vehicle is
//! tracked only as `(destination, ticks remaining)` rather than a full
//! `origin/destin/arrive` trajectory, since the learner only ever needs
//! per-station aggregates.

use std::collections::VecDeque;

use taxi_core::{SimRng, SquareMatrix, StationId};
use taxi_streams::{Pax, PaxStream, TaxiStreamsError};

use crate::mdp::stats::{MdpStatsRecorder, WaitRule};

/// A vehicle as tracked by the MDP simulator: its destination station and
/// the number of ticks remaining until it arrives there. `0` means idle at
/// `destin`.
#[derive(Copy, Clone, Debug)]
struct MdpVehicle {
    destin: StationId,
    remaining: i64,
}

pub struct MdpSim {
    n: usize,
    /// Trip time between stations, rounded to whole ticks.
    trip_time_ticks: SquareMatrix<i64>,
    tick_length: f64,
    queue: Vec<VecDeque<QueuedPax>>,
    /// Cap on `queue[i].len()` applied at the end of every tick, if set.
    queue_max: Option<usize>,
    vehicles: Vec<MdpVehicle>,
    stream: Box<dyn PaxStream>,
    buffered: Option<Pax>,
    now: u64,
    /// Total requests pulled from `stream` so far, across all ticks.
    requests_consumed: u64,
}

/// A waiting passenger, tagged with enough provenance to pick the right
/// wait-time approximation rule when it's served.
#[derive(Copy, Clone, Debug)]
struct QueuedPax {
    destin: StationId,
    /// `Some(p)` if this request arrived during the tick it's served in,
    /// where `p` is its estimated fractional arrival time within the tick.
    /// `None` if it was already waiting at the start of the tick.
    arrived_this_tick: Option<f64>,
}

impl MdpSim {
    pub fn new(trip_time: &SquareMatrix<i64>, tick_length: f64, stream: Box<dyn PaxStream>) -> Self {
        let n = trip_time.n();
        let mut ticks = SquareMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                ticks[(i, j)] = ((trip_time[(i, j)] as f64) / tick_length).round().max(0.0) as i64;
            }
        }
        MdpSim {
            n,
            trip_time_ticks: ticks,
            tick_length,
            queue: (0..n).map(|_| VecDeque::new()).collect(),
            queue_max: None,
            vehicles: Vec::new(),
            stream,
            buffered: None,
            now: 0,
            requests_consumed: 0,
        }
    }

    /// Truncate every station's queue to at most `max` entries at the end of
    /// each tick (dropping the newest overflow first), as a policy-compatibility
    /// aid for learners trained against a bounded state space.
    pub fn with_queue_max(mut self, max: usize) -> Self {
        self.queue_max = Some(max);
        self
    }

    pub fn num_stations(&self) -> usize {
        self.n
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Total requests pulled from the underlying stream so far.
    pub fn requests_consumed(&self) -> u64 {
        self.requests_consumed
    }

    pub fn add_vehicles_in_turn(&mut self, n: usize, start: usize) {
        for k in 0..n {
            let station = StationId::try_from((start + k) % self.n).expect("station index fits in u32");
            self.vehicles.push(MdpVehicle { destin: station, remaining: 0 });
        }
    }

    pub fn queue_len(&self, i: StationId) -> i64 {
        self.queue[i.index()].len() as i64
    }

    pub fn inbound(&self, i: StationId) -> i64 {
        self.vehicles.iter().filter(|v| v.destin == i).count() as i64
    }

    pub fn idle(&self, i: StationId) -> i64 {
        self.vehicles.iter().filter(|v| v.destin == i && v.remaining == 0).count() as i64
    }

    /// Raw per-vehicle remaining-time list, in vehicle-index order.
    pub fn remaining_times(&self) -> Vec<i64> {
        self.vehicles.iter().map(|v| v.remaining).collect()
    }

    /// Dispatch `count` idle vehicles at `i` empty to `j`.
    fn move_vehicles(&mut self, i: StationId, j: StationId, count: i64) {
        let ticks = self.trip_time_ticks[(i.index(), j.index())];
        let mut moved = 0;
        for v in self.vehicles.iter_mut() {
            if moved >= count {
                break;
            }
            if v.destin == i && v.remaining == 0 {
                v.destin = j;
                v.remaining = ticks.max(1);
                moved += 1;
            }
        }
    }

    /// Count of idle vehicles (`remaining == 0`) currently resting at each
    /// station, in ascending station-index order.
    fn available_by_station(&self) -> Vec<i64> {
        (0..self.n)
            .map(|i| {
                let station = StationId::try_from(i).expect("station index fits in u32");
                self.vehicles.iter().filter(|v| v.destin == station && v.remaining == 0).count() as i64
            })
            .collect()
    }

    /// Pull every request arriving before `horizon`, serving it immediately
    /// if a vehicle is available at its origin, otherwise appending it to
    /// the origin's queue. Requests are tagged with an estimated fractional
    /// arrival position within the current tick (evenly spaced across the
    /// batch, since the underlying stream only gives whole-tick-rounded
    /// arrival times), used to pick the wait-time approximation rule.
    ///
    /// A finite stream running dry mid-simulation (e.g. a test fixture) is
    /// not an error here: it simply means no further arrivals are pending.
    #[allow(clippy::too_many_arguments)]
    fn pull_and_serve_arrivals(
        &mut self,
        horizon: u64,
        available: &mut [i64],
        rng: &mut SimRng,
        stats: &mut MdpStatsRecorder,
        was_idle_before_tick: &[bool],
        served: &mut usize,
    ) {
        let mut pulled = 0u32;
        loop {
            let pax = match self.buffered.take() {
                Some(p) => p,
                None => match self.stream.next_pax(rng) {
                    Ok(p) => p,
                    Err(TaxiStreamsError::StreamExhausted) => return,
                    Err(e) => panic!("MDP passenger stream failed: {e}"),
                },
            };
            if pax.arrive >= horizon {
                self.buffered = Some(pax);
                return;
            }
            self.requests_consumed += 1;

            let frac = self.now as f64 + (pulled as f64 + 0.5) / (pulled as f64 + 1.5);
            let i = pax.origin.index();

            if available[i] > 0 {
                let vi = self
                    .vehicles
                    .iter()
                    .position(|v| v.destin == pax.origin && v.remaining == 0)
                    .expect("available[i] > 0 implies an idle vehicle rests at i");
                let rule = if was_idle_before_tick[vi] {
                    WaitRule::AlreadyIdle
                } else {
                    WaitRule::SameTickArrival { now: self.now, p: frac }
                };
                stats.record_served(self.tick_length, rule);

                let ticks = self.trip_time_ticks[(i, pax.destin.index())];
                self.vehicles[vi].destin = pax.destin;
                self.vehicles[vi].remaining = ticks.max(1);
                *served += 1;
                available[i] -= 1;
            } else {
                self.queue[i].push_back(QueuedPax {
                    destin: pax.destin,
                    arrived_this_tick: Some(frac),
                });
            }
            pulled += 1;
        }
    }

    /// Advance one tick, in the order SPEC_FULL.md §4.7 fixes: serve the
    /// existing queue against vehicles idle before any dispatch, record the
    /// reward against the post-service backlog, apply the action matrix `m`
    /// (`m[i*n+j]` idle vehicles sent from `i` to `j`) to whatever vehicles
    /// remain idle, then let new arrivals through. Returns `(served,
    /// reward)` for this tick.
    pub fn tick(&mut self, m: &[i64], rng: &mut SimRng, stats: &mut MdpStatsRecorder) -> (usize, f64) {
        assert_eq!(m.len(), self.n * self.n, "action matrix must be n x n");

        let was_idle_before_tick: Vec<bool> = self.vehicles.iter().map(|v| v.remaining == 0).collect();
        let mut available = self.available_by_station();

        let mut served = 0usize;
        for i in 0..self.n {
            let station = StationId::try_from(i).expect("station index fits in u32");
            while available[i] > 0 {
                if self.queue[i].is_empty() {
                    break;
                }
                let Some(vi) = self.vehicles.iter().position(|v| v.destin == station && v.remaining == 0) else {
                    break;
                };
                let pax = self.queue[i].pop_front().expect("checked non-empty above");

                let rule = match pax.arrived_this_tick {
                    None => WaitRule::QueueServed,
                    Some(_) if was_idle_before_tick[vi] => WaitRule::AlreadyIdle,
                    Some(p) => WaitRule::SameTickArrival { now: self.now, p },
                };
                stats.record_served(self.tick_length, rule);

                let ticks = self.trip_time_ticks[(i, pax.destin.index())];
                self.vehicles[vi].destin = pax.destin;
                self.vehicles[vi].remaining = ticks.max(1);
                served += 1;
                available[i] -= 1;
            }
        }

        let reward: f64 = -(self.queue.iter().map(|q| q.len() as f64).sum::<f64>());

        for i in 0..self.n {
            let row_sum: i64 = (0..self.n).map(|j| m[i * self.n + j]).sum();
            assert!(
                row_sum <= available[i],
                "action matrix row {i} dispatches {row_sum} vehicles but only {} are available",
                available[i]
            );
        }
        for i in 0..self.n {
            for j in 0..self.n {
                if i == j || m[i * self.n + j] == 0 {
                    continue;
                }
                let origin = StationId::try_from(i).expect("station index fits in u32");
                let destin = StationId::try_from(j).expect("station index fits in u32");
                self.move_vehicles(origin, destin, m[i * self.n + j]);
                available[i] -= m[i * self.n + j];
            }
        }

        let horizon = self.now + 1;
        self.pull_and_serve_arrivals(horizon, &mut available, rng, stats, &was_idle_before_tick, &mut served);

        if let Some(max) = self.queue_max {
            for q in self.queue.iter_mut() {
                while q.len() > max {
                    q.pop_back();
                }
            }
        }

        for q in self.queue.iter_mut() {
            for pax in q.iter_mut() {
                pax.arrived_this_tick = None;
            }
        }

        self.now += 1;

        for v in self.vehicles.iter_mut() {
            if v.remaining > 0 {
                v.remaining -= 1;
            }
        }

        (served, reward)
    }
}
