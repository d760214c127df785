//! `taxi-sim` — the continuous-time and MDP fleet simulators for the
//! taxi-sim station-based dispatch framework.
//!
//! # Modules
//!
//! | Module       | Contents                                                         |
//! |--------------|-------------------------------------------------------------------|
//! | [`vehicle`]  | `Vehicle`, and free functions queried by handlers and `Sim` alike  |
//! | [`config`]   | `SimConfig`                                                        |
//! | [`error`]    | `TaxiSimError`, `TaxiSimResult`                                    |
//! | [`observer`] | `StatsSink`, `NoopStatsSink`                                       |
//! | [`reactive`] | NN/ETNN/SNN/H1/H2 passenger-dispatch handlers                      |
//! | [`flow`]     | A small min-cost flow solver used by the dynamic-TP handler        |
//! | [`proactive`]| Andreasson/DynamicTp/SamplingVoting/SurplusDeficit/MdpPolicy       |
//! | [`sim`]      | `Sim`, the continuous-time simulator and tick loop                 |
//! | [`mdp`]      | The discrete-time MDP simulator and tabular SARSA learner          |
//! | [`builder`]  | `SimBuilder`                                                       |

pub mod builder;
pub mod config;
pub mod error;
pub mod flow;
pub mod mdp;
pub mod observer;
pub mod proactive;
pub mod reactive;
pub mod sim;
pub mod vehicle;


pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{TaxiSimError, TaxiSimResult};
pub use observer::{NoopStatsSink, StatsSink};
pub use proactive::ProactiveHandler;
pub use reactive::ReactiveHandler;
pub use sim::Sim;
pub use vehicle::Vehicle;
