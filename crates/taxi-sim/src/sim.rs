//! The continuous-time fleet simulator: the vehicle list, the trip-time
//! matrix, and the tick loop that drives reactive and proactive dispatch.
//!
//! Grounded on `bell_wong/bell_wong.h`'s `BWSim::run_to`/`handle_pax`.

use taxi_core::{SimRng, SquareMatrix, StationId, VehicleId};
use taxi_stats::CallTimeTracker;
use taxi_streams::{Pax, PaxStream};

use crate::config::SimConfig;
use crate::error::TaxiSimResult;
use crate::observer::{NoopStatsSink, StatsSink};
use crate::proactive::{FleetCtx, ProactiveHandler};
use crate::reactive::{ReactiveHandler, ReactiveOutcome};
use crate::vehicle::{self, Vehicle};

/// The continuous-time fleet simulator.
///
/// Time is measured in abstract ticks; a request is served by advancing the
/// clock to its arrival via [`Self::run_to`] (processing idle/strobe
/// rebalancing events along the way), then dispatching it with the
/// configured [`ReactiveHandler`].
pub struct Sim {
    trip_time: SquareMatrix<i64>,
    vehicles: Vec<Vehicle>,
    now: u64,
    config: SimConfig,
    call_times: CallTimeTracker,
    reactive: ReactiveHandler,
    proactive: ProactiveHandler,
    stats: Box<dyn StatsSink>,
    rng: SimRng,
}

impl Sim {
    /// A fleet-less simulator over `trip_time`, with no vehicles yet added.
    /// Use [`Self::add_vehicles_in_turn`] to populate the fleet.
    pub fn new(trip_time: SquareMatrix<i64>, config: SimConfig, reactive: ReactiveHandler) -> Self {
        let call_times = CallTimeTracker::new(&trip_time);
        let rng = SimRng::new(config.seed);
        Sim {
            trip_time,
            vehicles: Vec::new(),
            now: 0,
            config,
            call_times,
            reactive,
            proactive: ProactiveHandler::None,
            stats: Box::new(NoopStatsSink),
            rng,
        }
    }

    pub fn with_proactive(mut self, proactive: ProactiveHandler) -> Self {
        self.proactive = proactive;
        self
    }

    pub fn with_stats(mut self, stats: Box<dyn StatsSink>) -> Self {
        self.stats = stats;
        self
    }

    pub fn num_stations(&self) -> usize {
        self.trip_time.n()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn trip_time(&self) -> &SquareMatrix<i64> {
        &self.trip_time
    }

    pub fn call_times(&self) -> &CallTimeTracker {
        &self.call_times
    }

    /// Reset the clock and proactive-handler state, leaving the fleet and
    /// trip-time matrix untouched. Called once before a run begins.
    pub fn init(&mut self) {
        self.now = 0;
        self.proactive.reset();
    }

    /// Append `n` vehicles, parked and idle, cycling through stations
    /// starting at `start`.
    pub fn add_vehicles_in_turn(&mut self, n: usize, start: usize) {
        let num_stations = self.num_stations();
        for k in 0..n {
            let station = StationId::try_from((start + k) % num_stations).expect("station index fits in u32");
            self.vehicles.push(Vehicle::parked_at(station, self.now));
        }
    }

    /// Re-park every existing vehicle, idle, cycling through stations
    /// starting at `start`. Used to reset a fleet between runs without
    /// reallocating it.
    pub fn park_vehicles_in_turn(&mut self, start: usize) {
        let num_stations = self.num_stations();
        for (k, v) in self.vehicles.iter_mut().enumerate() {
            let station = StationId::try_from((start + k) % num_stations).expect("station index fits in u32");
            *v = Vehicle::parked_at(station, self.now);
        }
    }

    pub fn idle_veh_at(&self, i: StationId) -> Option<VehicleId> {
        vehicle::idle_veh_at(&self.vehicles, self.now, i)
    }

    pub fn num_vehicles_inbound(&self, i: StationId) -> usize {
        vehicle::num_vehicles_inbound(&self.vehicles, i)
    }

    pub fn num_vehicles_immediately_inbound(&self, i: StationId) -> usize {
        vehicle::num_vehicles_immediately_inbound(&self.vehicles, &self.trip_time, self.now, i)
    }

    pub fn num_vehicles_idle_by(&self, i: StationId, t: u64) -> usize {
        vehicle::num_vehicles_idle_by(&self.vehicles, i, t)
    }

    /// Dispatch idle vehicle `k` empty to `destin`, outside of any
    /// passenger-service event (e.g. manual repositioning in a test, or a
    /// caller-driven rebalancing policy).
    pub fn move_empty(&mut self, k: VehicleId, destin: StationId) {
        let empty_origin = self.vehicles[k.index()].destin;
        self.vehicles[k.index()].dispatch_to(destin, self.now, &self.trip_time);
        self.call_times.update(empty_origin.index(), destin.index(), &self.trip_time);
        self.stats.on_empty_trip(empty_origin, destin, self.now);
    }

    /// Advance the clock to `pax.arrive` and dispatch a vehicle to serve it.
    pub fn handle_pax(&mut self, pax: &Pax) {
        self.run_to(pax.arrive);
        assert!(!self.vehicles.is_empty(), "handle_pax called on an empty fleet");

        let outcome = self.reactive.handle_pax(&mut self.vehicles, &self.trip_time, self.now, pax);

        let (vehicle, empty_origin, pickup) = match outcome {
            ReactiveOutcome::Select(k) => {
                let empty_origin = self.vehicles[k.index()].destin;
                let pickup = self.vehicles[k.index()].serve_pax(pax.origin, pax.destin, self.now, &self.trip_time);
                (k, empty_origin, pickup)
            }
            ReactiveOutcome::Handled { vehicle, empty_origin, pickup } => (vehicle, empty_origin, pickup),
        };

        self.call_times.update(empty_origin.index(), pax.origin.index(), &self.trip_time);
        self.stats.on_pax_served(pax, vehicle, pickup);

        let mut ctx = FleetCtx {
            vehicles: &mut self.vehicles,
            trip_time: &self.trip_time,
            call_times: &mut self.call_times,
            now: self.now,
        };
        self.proactive.on_pax_served(&mut ctx, empty_origin, &mut self.rng);
    }

    /// Draw and serve `n` requests from `stream`.
    pub fn handle_pax_stream(&mut self, n: usize, stream: &mut dyn PaxStream) -> TaxiSimResult<()> {
        for _ in 0..n {
            let pax = stream.next_pax(&mut self.rng)?;
            self.handle_pax(&pax);
        }
        Ok(())
    }

    /// Advance the clock to `t`, tick by tick, processing idle-vehicle and
    /// strobe rebalancing events along the way: at each tick, stats are
    /// recorded first, then idle callbacks fire in ascending station-index
    /// order, then the strobe callback (if this tick is a strobe boundary),
    /// then the clock advances.
    pub fn run_to(&mut self, t: u64) {
        while self.now < t {
            self.tick_once();
        }
    }

    fn tick_once(&mut self) {
        self.stats.on_tick_start(self.now, &self.vehicles);

        // SPEC_FULL.md §4.1 step 2: "for each vehicle k in ascending index
        // order, if arrive == now, invoke handle_idle(vehicle_k)" — a
        // one-shot notification fired on the tick a vehicle transitions to
        // idle, not a per-tick re-scan of every currently-idle vehicle. A
        // vehicle the handler declines to move stays idle without being
        // re-offered to it on later ticks, and every vehicle that goes idle
        // this tick is offered individually, even several at the same
        // station.
        for idx in 0..self.vehicles.len() {
            if self.vehicles[idx].arrive == self.now {
                let k = VehicleId::try_from(idx).expect("fleet size fits in u32");
                let mut ctx = FleetCtx {
                    vehicles: &mut self.vehicles,
                    trip_time: &self.trip_time,
                    call_times: &mut self.call_times,
                    now: self.now,
                };
                self.proactive.on_idle(&mut ctx, k, &mut self.rng);
            }
        }

        if self.config.strobe > 0 && self.now % self.config.strobe == 0 {
            let mut ctx = FleetCtx {
                vehicles: &mut self.vehicles,
                trip_time: &self.trip_time,
                call_times: &mut self.call_times,
                now: self.now,
            };
            self.proactive.on_strobe(&mut ctx, &mut self.rng);
        }

        self.now += 1;
    }
}
