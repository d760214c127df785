//! Simulator-wide configuration.
//!
//! Following `dt-core::SimConfig`, bundles the knobs an embedder sets once
//! at construction so `Sim::new` doesn't take a long positional parameter
//! list. Per-handler configuration lives on each handler's own struct
//! instead (`SPEC_FULL.md` §10.2).

/// Knobs shared by the continuous-time simulator.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Seed for the single process-wide [`taxi_core::SimRng`].
    pub seed: u64,
    /// Tick interval on which `handle_strobe` fires (0 disables strobing).
    pub strobe: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig { seed: 0, strobe: 0 }
    }
}
