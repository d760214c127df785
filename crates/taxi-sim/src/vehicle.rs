//! A single vehicle's trajectory.
//!
//! Grounded on `bell_wong/bell_wong.h`'s `BWVehicle` (`origin`/`destin`/
//! `arrive`) — `SPEC_FULL.md` §3 keeps the same three-field shape; dropped
//! is any notion of on-road geometric progress, since this crate has no
//! geospatial representation.

use taxi_core::{SquareMatrix, StationId, VehicleId};

/// A fleet vehicle. Idle iff `arrive <= now` and the vehicle is located at
/// `destin` (it has finished its last assigned leg).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Vehicle {
    pub origin: StationId,
    pub destin: StationId,
    pub arrive: u64,
}

impl Vehicle {
    /// A vehicle parked at `station`, idle as of `now`.
    pub fn parked_at(station: StationId, now: u64) -> Self {
        Vehicle {
            origin: station,
            destin: station,
            arrive: now,
        }
    }

    pub fn is_idle(&self, now: u64) -> bool {
        self.arrive <= now
    }

    /// Assign a new leg departing from the vehicle's current destination no
    /// earlier than `now`. Updates `origin`, `destin`, and `arrive` in
    /// place; returns the new arrival time.
    pub fn dispatch_to(&mut self, target: StationId, now: u64, trip_time: &SquareMatrix<i64>) -> u64 {
        let depart_from = self.destin;
        let duration = trip_time[(depart_from.index(), target.index())] as u64;
        self.arrive = self.arrive.max(now) + duration;
        self.origin = depart_from;
        self.destin = target;
        self.arrive
    }

    /// Serve a passenger request: an empty leg to `pax.origin` followed by
    /// an occupied leg to `pax.destin`. Returns the pickup time (arrival at
    /// `pax.origin`).
    pub fn serve_pax(
        &mut self,
        pax_origin: StationId,
        pax_destin: StationId,
        now: u64,
        trip_time: &SquareMatrix<i64>,
    ) -> u64 {
        let pickup = self.dispatch_to(pax_origin, now, trip_time);
        self.dispatch_to(pax_destin, pickup, trip_time);
        pickup
    }
}

/// Lowest-index idle vehicle at station `i`, or `None` (the "sentinel
/// `VehicleId::INVALID`" of `SPEC_FULL.md` §4.1, surfaced idiomatically as
/// an `Option`).
pub fn idle_veh_at(vehicles: &[Vehicle], now: u64, i: StationId) -> Option<VehicleId> {
    vehicles
        .iter()
        .position(|v| v.destin == i && v.is_idle(now))
        .map(|idx| VehicleId::try_from(idx).expect("fleet size fits in u32"))
}

/// Count of vehicles whose `destin == i`, regardless of leg.
pub fn num_vehicles_inbound(vehicles: &[Vehicle], i: StationId) -> usize {
    vehicles.iter().filter(|v| v.destin == i).count()
}

/// As [`num_vehicles_inbound`], but additionally requires the vehicle to be
/// on its last leg — i.e. it can reach `i` within `trip_time(origin, i)` of
/// now.
pub fn num_vehicles_immediately_inbound(
    vehicles: &[Vehicle],
    trip_time: &SquareMatrix<i64>,
    now: u64,
    i: StationId,
) -> usize {
    vehicles
        .iter()
        .filter(|v| {
            v.destin == i && v.arrive <= now + trip_time[(v.origin.index(), i.index())] as u64
        })
        .count()
}

/// Count of vehicles destined to `i` that will have arrived by `t`.
pub fn num_vehicles_idle_by(vehicles: &[Vehicle], i: StationId, t: u64) -> usize {
    vehicles.iter().filter(|v| v.destin == i && v.arrive <= t).count()
}
