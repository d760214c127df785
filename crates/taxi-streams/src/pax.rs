//! A single passenger request.
//!
//! Grounded on `bell_wong/bell_wong.h`'s `BWPax` (continuous-time) and
//! `mdp_sim/mdp_pax.h`'s `MDPPax` — both are `{origin, destin, arrive}`
//! triples; this crate uses one shape for both simulators since the only
//! difference between them is the unit `arrive` is measured in.

use taxi_core::StationId;

/// An ephemeral passenger request, consumed by a reactive handler.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Pax {
    pub origin: StationId,
    pub destin: StationId,
    pub arrive: u64,
}

impl Pax {
    pub fn new(origin: StationId, destin: StationId, arrive: u64) -> Self {
        Pax {
            origin,
            destin,
            arrive,
        }
    }
}
