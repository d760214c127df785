//! The statistics sink trait implemented by `taxi-output`'s recorders.
//!
//! Grounded on `dt-sim/src/observer.rs`'s `SimObserver` shape
//! (`on_tick_start`/`on_tick_end`/`on_snapshot`/`on_sim_end`), remapped to
//! this domain's events: a per-tick hook, a served-passenger hook, an
//! empty-dispatch hook, and an end-of-run hook.

use taxi_core::{StationId, VehicleId};
use taxi_streams::Pax;

/// Callbacks invoked by [`crate::Sim`] at key points in a run.
///
/// All methods have default no-op implementations so implementors only
/// need to override what they care about.
pub trait StatsSink {
    /// Called once per integer tick, before idle/strobe events are
    /// processed, with the vehicle list as it stood at the start of the
    /// tick. Implementors use this to record time-step stats such as
    /// per-station idle-vehicle counts.
    fn on_tick_start(&mut self, _now: u64, _vehicles: &[crate::vehicle::Vehicle]) {}

    /// Called when a passenger request is served by vehicle `vehicle`,
    /// picked up at `pickup`.
    fn on_pax_served(&mut self, _pax: &Pax, _vehicle: VehicleId, _pickup: u64) {}

    /// Called whenever an empty trip is dispatched, by a reactive or
    /// proactive handler.
    fn on_empty_trip(&mut self, _origin: StationId, _destin: StationId, _now: u64) {}

    /// Called once after the run's final tick.
    fn on_sim_end(&mut self, _final_now: u64) {}
}

/// A [`StatsSink`] that does nothing. The default for a freshly constructed
/// [`crate::Sim`].
pub struct NoopStatsSink;

impl StatsSink for NoopStatsSink {}
