//! Reactive dispatch handlers: choose which idle vehicle serves an
//! incoming passenger request.
//!
//! Grounded on `bell_wong/bell_wong.h`'s `BWNNHandler` (nearest-neighbor)
//! and `BWSNNHandler` (the "cheating" static baseline) for NN/SNN;
//! ETNN/H1/H2 are not present verbatim in the retrieved source excerpt and
//! are implemented from `SPEC_FULL.md` §4.2's closed-form description
//! (see `DESIGN.md`).
//!
//! Modeled as a closed sum type per `SPEC_FULL.md` §9 rather than a trait
//! object hierarchy — the handler family is small and fixed at build time.

use taxi_core::{SquareMatrix, StationId, VehicleId};
use taxi_streams::Pax;

use crate::vehicle::Vehicle;

/// The result of a reactive handler's dispatch decision.
pub enum ReactiveOutcome {
    /// The simulator should serve `pax` with vehicle `k` via the normal
    /// `Vehicle::serve_pax` path.
    Select(VehicleId),
    /// The handler already mutated the vehicle and computed pickup itself
    /// (SNN's retroactive cheat), bypassing the simulator's usual update.
    Handled {
        vehicle: VehicleId,
        empty_origin: StationId,
        pickup: u64,
    },
}

/// `wait(pax, k) = max(0, arrive_k - pax.arrive) + trip_time(destin_k, pax.origin)`,
/// shared by NN and the horizon heuristics.
fn wait(v: &Vehicle, trip_time: &SquareMatrix<i64>, pax: &Pax) -> i64 {
    let idle_slack = (v.arrive as i64 - pax.arrive as i64).max(0);
    idle_slack + trip_time[(v.destin.index(), pax.origin.index())]
}

fn argmin_by<F: Fn(usize, &Vehicle) -> (i64, i64, i64)>(vehicles: &[Vehicle], key: F) -> VehicleId {
    let mut best_idx = 0usize;
    let mut best_key = key(0, &vehicles[0]);
    for (idx, v) in vehicles.iter().enumerate().skip(1) {
        let k = key(idx, v);
        if k < best_key {
            best_key = k;
            best_idx = idx;
        }
    }
    VehicleId::try_from(best_idx).expect("fleet size fits in u32")
}

fn nn_select(vehicles: &[Vehicle], trip_time: &SquareMatrix<i64>, pax: &Pax) -> VehicleId {
    argmin_by(vehicles, |_, v| (wait(v, trip_time, pax), 0, 0))
}

fn etnn_select(vehicles: &[Vehicle], trip_time: &SquareMatrix<i64>, now: u64, pax: &Pax) -> VehicleId {
    argmin_by(vehicles, |_, v| {
        let empty = trip_time[(v.destin.index(), pax.origin.index())];
        let idle_slack = (v.arrive as i64 - now as i64).max(0);
        (empty, idle_slack, 0)
    })
}

/// Select a vehicle for `pax` using SNN's retroactive cheat, mutating it in
/// place. Returns the outcome plus whether the chosen vehicle was already
/// idle (by `now`) before this selection — used by the sampling-and-voting
/// handler's per-rollout bookkeeping.
pub(crate) fn snn_select(
    vehicles: &mut [Vehicle],
    trip_time: &SquareMatrix<i64>,
    now: u64,
    pax: &Pax,
) -> (ReactiveOutcome, bool) {
    let k = argmin_by(vehicles, |_, v| {
        let empty = trip_time[(v.destin.index(), pax.origin.index())];
        let w = (v.arrive as i64 + empty - pax.arrive as i64).max(0);
        (w, empty, -(v.arrive as i64))
    });

    let vehicle = &mut vehicles[k.index()];
    let was_idle = vehicle.arrive <= now;
    let empty_origin = vehicle.destin;
    let empty = trip_time[(empty_origin.index(), pax.origin.index())];
    let pickup = (vehicle.arrive as i64 + empty).max(pax.arrive as i64) as u64;
    let occupied = trip_time[(pax.origin.index(), pax.destin.index())];

    vehicle.origin = pax.origin;
    vehicle.destin = pax.destin;
    vehicle.arrive = pickup + occupied as u64;

    (
        ReactiveOutcome::Handled {
            vehicle: k,
            empty_origin,
            pickup,
        },
        was_idle,
    )
}

/// Which closed-form `future` estimate a [`HorizonHandler`] uses.
#[derive(Copy, Clone, Debug)]
pub enum HorizonMode {
    /// Expected extra empty-time to an i.i.d.-sampled next-passenger origin
    /// plus the expected occupied-trip duration, precomputed as `C·P·1`.
    H1,
    /// An `alpha`-weighted worst-case expected wait if the vehicle were not
    /// used, over a configurable look-ahead horizon.
    H2,
}

/// Horizon heuristics H1/H2: `k* = argmin_k [wait(pax, k) - alpha*future(destin_k)]`.
pub struct HorizonHandler {
    mode: HorizonMode,
    alpha: f64,
    /// Per-station precomputed future value, indexed by station.
    future: Vec<f64>,
}

impl HorizonHandler {
    /// H1: `future[i] = sum_j trip_time(i,j) * (sum_k trip_prob(j,k))`, the
    /// matrix product `C·P·1` with `C` = trip-time, `P` = trip probability.
    pub fn h1(trip_time: &SquareMatrix<i64>, trip_prob: &SquareMatrix<f64>, alpha: f64) -> Self {
        let n = trip_time.n();
        let row_sum_p: Vec<f64> = (0..n).map(|j| (0..n).map(|k| trip_prob[(j, k)]).sum()).collect();
        let future = (0..n)
            .map(|i| (0..n).map(|j| trip_time[(i, j)] as f64 * row_sum_p[j]).sum())
            .collect();
        HorizonHandler {
            mode: HorizonMode::H1,
            alpha,
            future,
        }
    }

    /// H2: `future[i] = horizon / rate_from(i)`, an estimate of the expected
    /// wait accrued at station `i` over `horizon` future requests if no
    /// vehicle is dispatched there.
    pub fn h2(rate_from: &[f64], alpha: f64, horizon: u32) -> Self {
        let future = rate_from
            .iter()
            .map(|&rate| horizon as f64 / rate.max(1e-9))
            .collect();
        HorizonHandler {
            mode: HorizonMode::H2,
            alpha,
            future,
        }
    }

    pub fn mode(&self) -> HorizonMode {
        self.mode
    }

    fn select(&self, vehicles: &[Vehicle], trip_time: &SquareMatrix<i64>, pax: &Pax) -> VehicleId {
        let future = &self.future;
        let alpha = self.alpha;
        let mut best_idx = 0usize;
        let mut best_score = f64::MAX;
        for (idx, v) in vehicles.iter().enumerate() {
            let score = wait(v, trip_time, pax) as f64 - alpha * future[v.destin.index()];
            if score < best_score {
                best_score = score;
                best_idx = idx;
            }
        }
        VehicleId::try_from(best_idx).expect("fleet size fits in u32")
    }
}

/// The family of reactive dispatch handlers.
pub enum ReactiveHandler {
    Nn,
    Etnn,
    Snn,
    Horizon(HorizonHandler),
}

impl ReactiveHandler {
    pub fn handle_pax(
        &self,
        vehicles: &mut [Vehicle],
        trip_time: &SquareMatrix<i64>,
        now: u64,
        pax: &Pax,
    ) -> ReactiveOutcome {
        assert!(!vehicles.is_empty(), "reactive handler invoked with an empty fleet");
        match self {
            ReactiveHandler::Nn => ReactiveOutcome::Select(nn_select(vehicles, trip_time, pax)),
            ReactiveHandler::Etnn => ReactiveOutcome::Select(etnn_select(vehicles, trip_time, now, pax)),
            ReactiveHandler::Snn => snn_select(vehicles, trip_time, now, pax).0,
            ReactiveHandler::Horizon(h) => ReactiveOutcome::Select(h.select(vehicles, trip_time, pax)),
        }
    }
}
