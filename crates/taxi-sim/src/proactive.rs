//! Proactive (rebalancing) handlers: react to passenger-served, vehicle-idle,
//! and strobe events to reposition empty vehicles ahead of demand.
//!
//! Grounded per-handler on `bell_wong/andreasson.h/.cpp`,
//! `bell_wong/dynamic_tp.h/.cpp`, `bell_wong/sampling_voting.h/.cpp`,
//! `bell_wong/surplus_deficit.h/.cpp`, and `bell_wong/mdp_policy.h/.cpp`.
//! Modeled as a closed sum type per `SPEC_FULL.md` §9.

use std::collections::{HashMap, VecDeque};

use rustc_hash::FxHashMap;

use taxi_core::{SimRng, SquareMatrix, StationId, VehicleId};
use taxi_stats::CallTimeTracker;
use taxi_streams::{Pax, PaxStream};

use crate::flow::MinCostFlow;
use crate::mdp::sarsa::StateVector;
use crate::reactive::{snn_select, ReactiveOutcome};
use crate::vehicle::{self, Vehicle};

/// Borrowed simulator state a proactive handler is allowed to read and
/// mutate. Handlers never see the simulator itself — only this narrow
/// slice — so they cannot reach the reactive handler, stats sink, or RNG.
pub struct FleetCtx<'a> {
    pub vehicles: &'a mut Vec<Vehicle>,
    pub trip_time: &'a SquareMatrix<i64>,
    pub call_times: &'a mut CallTimeTracker,
    pub now: u64,
}

impl<'a> FleetCtx<'a> {
    pub fn idle_veh_at(&self, i: StationId) -> Option<VehicleId> {
        vehicle::idle_veh_at(self.vehicles, self.now, i)
    }

    pub fn num_vehicles_inbound(&self, i: StationId) -> usize {
        vehicle::num_vehicles_inbound(self.vehicles, i)
    }

    pub fn num_vehicles_immediately_inbound(&self, i: StationId) -> usize {
        vehicle::num_vehicles_immediately_inbound(self.vehicles, self.trip_time, self.now, i)
    }

    pub fn num_vehicles_idle_by(&self, i: StationId, t: u64) -> usize {
        vehicle::num_vehicles_idle_by(self.vehicles, i, t)
    }

    /// Dispatch idle vehicle `k` empty to `destin`, recording the leg with
    /// the call-time tracker.
    pub fn dispatch_empty(&mut self, k: VehicleId, destin: StationId) {
        let empty_origin = self.vehicles[k.index()].destin;
        self.vehicles[k.index()].dispatch_to(destin, self.now, self.trip_time);
        self.call_times.update(empty_origin.index(), destin.index(), self.trip_time);
    }
}

// ── Andreasson call/send ──────────────────────────────────────────────────

/// Configuration flags for [`AndreassonHandler`] (`SPEC_FULL.md` §6).
#[derive(Clone, Debug)]
pub struct AndreassonConfig {
    pub immediate_inbound_only: bool,
    pub use_call_times_for_inbound: bool,
    pub use_call_times_for_targets: bool,
    pub send_when_over: bool,
    pub call_only_from_surplus: bool,
    pub surplus_threshold: f64,
    pub targets: Vec<f64>,
    pub preferred: SquareMatrix<bool>,
}

impl AndreassonConfig {
    pub fn new(num_stations: usize) -> Self {
        AndreassonConfig {
            immediate_inbound_only: false,
            use_call_times_for_inbound: false,
            use_call_times_for_targets: false,
            send_when_over: false,
            call_only_from_surplus: false,
            surplus_threshold: 1.0,
            targets: vec![0.0; num_stations],
            preferred: SquareMatrix::new(num_stations),
        }
    }
}

/// Call/send proactive handler. State: a FIFO of stations with an
/// unsatisfied call, plus the `rate_from` demand model used when
/// `use_call_times_for_targets` is set.
pub struct AndreassonHandler {
    config: AndreassonConfig,
    rate_from: Vec<f64>,
    call_queue: VecDeque<StationId>,
}

impl AndreassonHandler {
    pub fn new(config: AndreassonConfig, rate_from: Vec<f64>) -> Self {
        AndreassonHandler {
            config,
            rate_from,
            call_queue: VecDeque::new(),
        }
    }

    fn supply(&self, ctx: &FleetCtx, i: StationId) -> f64 {
        let eps = 1e-3;
        match (self.config.immediate_inbound_only, self.config.use_call_times_for_inbound) {
            (true, true) => ctx
                .vehicles
                .iter()
                .filter(|v| {
                    v.destin == i && {
                        let leg = ctx.trip_time[(v.origin.index(), i.index())] as f64;
                        let bound = ctx.now as f64 + ctx.call_times.at(i.index()).min(leg) + eps;
                        (v.arrive as f64) <= bound
                    }
                })
                .count() as f64,
            (true, false) => ctx.num_vehicles_immediately_inbound(i) as f64,
            (false, true) => {
                let bound = ctx.now as f64 + ctx.call_times.at(i.index()) + eps;
                ctx.vehicles
                    .iter()
                    .filter(|v| v.destin == i && (v.arrive as f64) <= bound)
                    .count() as f64
            }
            (false, false) => ctx.num_vehicles_inbound(i) as f64,
        }
    }

    fn demand(&self, ctx: &FleetCtx, i: StationId) -> f64 {
        if self.config.use_call_times_for_targets {
            ctx.call_times.at(i.index()) * self.rate_from[i.index()]
        } else {
            self.config.targets[i.index()]
        }
    }

    fn surplus(&self, ctx: &FleetCtx, i: StationId) -> f64 {
        self.supply(ctx, i) - self.demand(ctx, i)
    }

    /// Triggered when a passenger is served, vacating station `j`.
    pub fn on_pax_served(&mut self, ctx: &mut FleetCtx, j: StationId) {
        if self.surplus(ctx, j) >= self.config.surplus_threshold {
            return;
        }
        let m = if self.config.call_only_from_surplus {
            self.config.surplus_threshold
        } else {
            self.surplus(ctx, j)
        };

        let n = ctx.trip_time.n();
        let mut best: Option<(usize, bool, i64)> = None;
        for idx in 0..n {
            if idx == j.index() {
                continue;
            }
            let i = StationId::try_from(idx).expect("station index fits in u32");
            if self.surplus(ctx, i) < m {
                continue;
            }
            let not_preferred = !self.config.preferred[(idx, j.index())];
            let tt = ctx.trip_time[(idx, j.index())];
            let better = match best {
                None => true,
                Some((_, bp, bt)) => (not_preferred, tt) < (bp, bt),
            };
            if better {
                best = Some((idx, not_preferred, tt));
            }
        }

        if let Some((idx, ..)) = best {
            let i = StationId::try_from(idx).expect("station index fits in u32");
            if let Some(k) = ctx.idle_veh_at(i) {
                ctx.dispatch_empty(k, j);
                return;
            }
        }
        self.call_queue.push_back(j);
    }

    /// Triggered when `vehicle` goes idle at its destination.
    pub fn on_idle(&mut self, ctx: &mut FleetCtx, vehicle: VehicleId) {
        let i = ctx.vehicles[vehicle.index()].destin;
        if self.surplus(ctx, i) < self.config.surplus_threshold {
            return;
        }

        if let Some(&head) = self.call_queue.front() {
            if head != i {
                self.call_queue.pop_front();
                ctx.dispatch_empty(vehicle, head);
            }
            return;
        }

        if !self.config.send_when_over {
            return;
        }

        let n = ctx.trip_time.n();
        let mut best: Option<(usize, f64, bool, i64)> = None;
        for idx in 0..n {
            if idx == i.index() {
                continue;
            }
            let j = StationId::try_from(idx).expect("station index fits in u32");
            let s = self.surplus(ctx, j);
            if s >= 0.0 {
                continue;
            }
            let not_preferred = !self.config.preferred[(i.index(), idx)];
            let tt = ctx.trip_time[(i.index(), idx)];
            let better = match best {
                None => true,
                Some((_, bs, bp, bt)) => (s, not_preferred, tt) < (bs, bp, bt),
            };
            if better {
                best = Some((idx, s, not_preferred, tt));
            }
        }

        if let Some((idx, ..)) = best {
            ctx.dispatch_empty(vehicle, StationId::try_from(idx).expect("station index fits in u32"));
        }
    }

    pub fn reset(&mut self) {
        self.call_queue.clear();
    }
}

// ── Dynamic transportation problem ────────────────────────────────────────

/// Min-cost-flow based proactive handler. Per-station targets; redistributes
/// on every trigger.
pub struct DynamicTpHandler {
    targets: Vec<i64>,
    fleet_size: usize,
}

impl DynamicTpHandler {
    pub fn new(targets: Vec<i64>, fleet_size: usize) -> Self {
        DynamicTpHandler { targets, fleet_size }
    }

    pub fn redistribute(&mut self, ctx: &mut FleetCtx) {
        let n = ctx.trip_time.n();
        let mut demand = vec![0i64; n];
        for idx in 0..n {
            let station = StationId::try_from(idx).expect("station index fits in u32");
            let inbound = ctx.num_vehicles_inbound(station) as i64;
            let idle_by_now = ctx.num_vehicles_idle_by(station, ctx.now) as i64;
            let surplus_available = (inbound - self.targets[idx]).min(idle_by_now);
            demand[idx] = -surplus_available;
        }

        let source = n;
        let sink = n + 1;
        let cap = 100 * self.fleet_size as i64;
        let mut flow = MinCostFlow::new(n + 2);
        let mut arc_id = vec![vec![0usize; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    arc_id[i][j] = flow.add_edge(i, j, cap, ctx.trip_time[(i, j)]);
                }
            }
        }

        let mut supply_total = 0i64;
        let mut demand_total = 0i64;
        for idx in 0..n {
            if demand[idx] < 0 {
                supply_total += -demand[idx];
                flow.add_edge(source, idx, -demand[idx], 0);
            } else if demand[idx] > 0 {
                demand_total += demand[idx];
                flow.add_edge(idx, sink, demand[idx], 0);
            }
        }

        let flow_needed = supply_total.min(demand_total);
        if flow_needed <= 0 {
            return;
        }

        let result = flow.solve(source, sink, flow_needed);
        assert!(
            result.is_some(),
            "dynamic-TP min-cost flow infeasible despite uncapacitated construction"
        );

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut f = flow.flow_on(arc_id[i][j]);
                if f <= 0 {
                    continue;
                }
                let origin = StationId::try_from(i).expect("station index fits in u32");
                let destin = StationId::try_from(j).expect("station index fits in u32");
                while f > 0 {
                    match ctx.idle_veh_at(origin) {
                        Some(k) => ctx.dispatch_empty(k, destin),
                        None => break,
                    }
                    f -= 1;
                }
            }
        }
    }

    pub fn reset(&mut self) {}
}

// ── Sampling and voting ────────────────────────────────────────────────────

pub struct SamplingVotingConfig {
    pub num_sequences: usize,
    pub num_pax: usize,
}

/// What was first observed, during one rollout sequence, for a station with
/// an idle vehicle (`SPEC_FULL.md` §4.5 step d).
#[derive(Copy, Clone)]
enum Observation {
    FirstNonTrivial(StationId),
    Trivial,
    FirstAnyNonTrivial(StationId),
}

/// Sampling-and-voting proactive handler. Runs short rollouts against a
/// scratch copy of the fleet, using SNN, and dispatches idle vehicles to
/// the destination each idle station "voted" for most often.
pub struct SamplingVotingHandler {
    config: SamplingVotingConfig,
    stream: Box<dyn PaxStream>,
    /// Reused across sequences per `SPEC_FULL.md` §9 ("do not allocate per
    /// sequence").
    scratch: Vec<Vehicle>,
}

impl SamplingVotingHandler {
    pub fn new(config: SamplingVotingConfig, stream: Box<dyn PaxStream>) -> Self {
        SamplingVotingHandler {
            config,
            stream,
            scratch: Vec::new(),
        }
    }

    pub fn trigger(&mut self, ctx: &mut FleetCtx, rng: &mut SimRng) {
        let n = ctx.trip_time.n();
        let idle_stations: Vec<StationId> = (0..n)
            .map(|i| StationId::try_from(i).expect("station index fits in u32"))
            .filter(|&i| ctx.idle_veh_at(i).is_some())
            .collect();
        if idle_stations.is_empty() {
            return;
        }

        let mut action_hist: HashMap<StationId, HashMap<StationId, u32>> = HashMap::new();

        for _ in 0..self.config.num_sequences {
            self.scratch.clear();
            self.scratch.extend(ctx.vehicles.iter().map(|v| {
                let mut v = *v;
                v.arrive = v.arrive.min(ctx.now);
                v
            }));
            self.stream.reset(ctx.now);

            let mut observed: HashMap<StationId, Observation> = HashMap::new();

            for _ in 0..self.config.num_pax {
                let pax = match self.stream.next_pax(rng) {
                    Ok(p) => p,
                    Err(_) => break,
                };
                let (outcome, was_idle) = snn_select(&mut self.scratch, ctx.trip_time, ctx.now, &pax);
                let ReactiveOutcome::Handled { empty_origin, .. } = outcome else {
                    unreachable!("snn_select always returns Handled")
                };

                if !idle_stations.contains(&empty_origin) {
                    continue;
                }
                let trivial = pax.origin == empty_origin;
                if !observed.contains_key(&empty_origin) {
                    if trivial {
                        observed.insert(empty_origin, Observation::Trivial);
                    } else if was_idle {
                        observed.insert(empty_origin, Observation::FirstNonTrivial(pax.destin));
                    } else {
                        observed.insert(empty_origin, Observation::FirstAnyNonTrivial(pax.destin));
                    }
                } else if let Some(Observation::Trivial) = observed.get(&empty_origin) {
                    if was_idle && !trivial {
                        observed.insert(empty_origin, Observation::FirstNonTrivial(pax.destin));
                    }
                }

                if idle_stations
                    .iter()
                    .all(|s| matches!(observed.get(s), Some(Observation::FirstNonTrivial(_))))
                {
                    break;
                }
            }

            for &i in &idle_stations {
                if let Some(Observation::FirstNonTrivial(destin)) = observed.get(&i) {
                    *action_hist.entry(i).or_default().entry(*destin).or_insert(0) += 1;
                }
            }
        }

        for &i in &idle_stations {
            let Some(votes) = action_hist.get(&i) else {
                continue;
            };
            let best = votes.iter().max_by(|(&da, &va), (&db, &vb)| {
                va.cmp(&vb).then_with(|| {
                    ctx.trip_time[(i.index(), db.index())].cmp(&ctx.trip_time[(i.index(), da.index())])
                })
            });
            if let Some((&destin, _)) = best {
                if let Some(k) = ctx.idle_veh_at(i) {
                    ctx.dispatch_empty(k, destin);
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.scratch.clear();
    }
}

// ── Surplus/deficit ────────────────────────────────────────────────────────

/// A simpler rebalancer than Andreasson: greedily sends idle vehicles from
/// the biggest-surplus station to the nearest-deficit station.
pub struct SurplusDeficitHandler {
    targets: Vec<f64>,
    rate_from: Vec<f64>,
}

impl SurplusDeficitHandler {
    pub fn new(targets: Vec<f64>, rate_from: Vec<f64>) -> Self {
        SurplusDeficitHandler { targets, rate_from }
    }

    fn surplus(&self, ctx: &FleetCtx, i: StationId) -> f64 {
        ctx.num_vehicles_inbound(i) as f64
            - ctx.call_times.at(i.index()) * self.rate_from[i.index()]
            - self.targets[i.index()]
    }

    fn send_from(&self, ctx: &mut FleetCtx, i: StationId) {
        if self.surplus(ctx, i) < 1.0 {
            return;
        }
        let Some(k) = ctx.idle_veh_at(i) else {
            return;
        };
        let n = ctx.trip_time.n();
        let mut best: Option<(usize, f64, i64)> = None;
        for idx in 0..n {
            if idx == i.index() {
                continue;
            }
            let j = StationId::try_from(idx).expect("station index fits in u32");
            let s = self.surplus(ctx, j);
            if s >= 0.0 {
                continue;
            }
            let tt = ctx.trip_time[(i.index(), idx)];
            let better = match best {
                None => true,
                Some((_, bs, bt)) => (tt, s) < (bt, bs),
            };
            if better {
                best = Some((idx, s, tt));
            }
        }
        if let Some((idx, ..)) = best {
            ctx.dispatch_empty(k, StationId::try_from(idx).expect("station index fits in u32"));
        }
    }

    /// Triggered on a strobe/refresh event: consider every station with an
    /// idle vehicle, in descending idle-count order.
    pub fn trigger(&mut self, ctx: &mut FleetCtx) {
        let n = ctx.trip_time.n();
        let mut stations: Vec<StationId> = (0..n)
            .map(|i| StationId::try_from(i).expect("station index fits in u32"))
            .collect();
        stations.sort_by_key(|&i| {
            std::cmp::Reverse(ctx.vehicles.iter().filter(|v| v.destin == i && v.is_idle(ctx.now)).count())
        });
        for i in stations {
            self.send_from(ctx, i);
        }
    }

    /// Triggered when `vehicle` goes idle: apply the same rule only to its
    /// station.
    pub fn on_idle(&mut self, ctx: &mut FleetCtx, vehicle: VehicleId) {
        let i = ctx.vehicles[vehicle.index()].destin;
        self.send_from(ctx, i);
    }

    pub fn reset(&mut self) {}
}

// ── MDP-policy lookup ───────────────────────────────────────────────────────

/// Wraps a previously learned `state -> action` table. Always exploits
/// (epsilon = 0); falls back to the all-zero action for unvisited states.
pub struct MdpPolicyHandler {
    table: FxHashMap<StateVector, Vec<i64>>,
}

impl MdpPolicyHandler {
    pub fn new(table: FxHashMap<StateVector, Vec<i64>>) -> Self {
        MdpPolicyHandler { table }
    }

    /// Rebuild the continuous-sim state into the MDP state encoding, look
    /// up the best known action, and dispatch it, clamped to availability.
    pub fn on_strobe(&mut self, ctx: &mut FleetCtx) {
        let n = ctx.trip_time.n();
        let queue_lengths = vec![0i64; n]; // the continuous sim has no explicit queues
        let inbound_counts: Vec<i64> = (0..n)
            .map(|i| {
                ctx.num_vehicles_inbound(StationId::try_from(i).expect("station index fits in u32")) as i64
            })
            .collect();
        let remaining_times: Vec<i64> = ctx
            .vehicles
            .iter()
            .map(|v| (v.arrive as i64 - ctx.now as i64).max(0))
            .collect();

        let state = StateVector::new(queue_lengths, inbound_counts, remaining_times);
        let Some(action) = self.table.get(&state) else {
            return;
        };

        let mut idle_at: Vec<usize> = (0..n)
            .map(|i| ctx.num_vehicles_idle_by(StationId::try_from(i).expect("station index fits in u32"), ctx.now))
            .collect();

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut count = action[i * n + j];
                while count > 0 && idle_at[i] > 0 {
                    let origin = StationId::try_from(i).expect("station index fits in u32");
                    if let Some(k) = ctx.idle_veh_at(origin) {
                        ctx.dispatch_empty(k, StationId::try_from(j).expect("station index fits in u32"));
                        idle_at[i] -= 1;
                    } else {
                        break;
                    }
                    count -= 1;
                }
            }
        }
    }

    pub fn reset(&mut self) {}
}

// ── The closed handler family ───────────────────────────────────────────────

/// The family of proactive rebalancing handlers.
pub enum ProactiveHandler {
    None,
    Andreasson(AndreassonHandler),
    DynamicTp(DynamicTpHandler),
    SamplingVoting(SamplingVotingHandler),
    SurplusDeficit(SurplusDeficitHandler),
    MdpPolicy(MdpPolicyHandler),
}

impl ProactiveHandler {
    pub fn on_pax_served(&mut self, ctx: &mut FleetCtx, empty_origin: StationId, rng: &mut SimRng) {
        match self {
            ProactiveHandler::None => {}
            ProactiveHandler::Andreasson(h) => h.on_pax_served(ctx, empty_origin),
            ProactiveHandler::DynamicTp(h) => h.redistribute(ctx),
            ProactiveHandler::SamplingVoting(h) => h.trigger(ctx, rng),
            ProactiveHandler::SurplusDeficit(_) => {}
            ProactiveHandler::MdpPolicy(_) => {}
        }
    }

    pub fn on_idle(&mut self, ctx: &mut FleetCtx, vehicle: VehicleId, rng: &mut SimRng) {
        match self {
            ProactiveHandler::None => {}
            ProactiveHandler::Andreasson(h) => h.on_idle(ctx, vehicle),
            ProactiveHandler::DynamicTp(h) => h.redistribute(ctx),
            ProactiveHandler::SamplingVoting(h) => h.trigger(ctx, rng),
            ProactiveHandler::SurplusDeficit(h) => h.on_idle(ctx, vehicle),
            ProactiveHandler::MdpPolicy(_) => {}
        }
    }

    pub fn on_strobe(&mut self, ctx: &mut FleetCtx, rng: &mut SimRng) {
        match self {
            ProactiveHandler::None => {}
            ProactiveHandler::Andreasson(_) => {}
            ProactiveHandler::DynamicTp(h) => h.redistribute(ctx),
            ProactiveHandler::SamplingVoting(h) => h.trigger(ctx, rng),
            ProactiveHandler::SurplusDeficit(h) => h.trigger(ctx),
            ProactiveHandler::MdpPolicy(h) => h.on_strobe(ctx),
        }
    }

    pub fn reset(&mut self) {
        match self {
            ProactiveHandler::None => {}
            ProactiveHandler::Andreasson(h) => h.reset(),
            ProactiveHandler::DynamicTp(h) => h.reset(),
            ProactiveHandler::SamplingVoting(h) => h.reset(),
            ProactiveHandler::SurplusDeficit(h) => h.reset(),
            ProactiveHandler::MdpPolicy(h) => h.reset(),
        }
    }
}
