//! The coarser, discrete-time fleet simulator used to train and evaluate
//! the tabular SARSA dispatch policy.
//!
//! Grounded on `mdp_sim/mdp_sim.h/.cpp`. Unlike [`crate::sim::Sim`], time
//! advances in fixed-length ticks and vehicles are tracked only by
//! `(destination, ticks remaining)` rather than a full `origin/destin/arrive`
//! trajectory — the coarser granularity needed to make a hash-map Q-table
//! over the state space tractable.

pub mod sarsa;
pub mod sim;
pub mod stats;

pub use sarsa::{StateVector, TabularSarsaSolver};
pub use sim::MdpSim;
pub use stats::MdpStatsRecorder;
