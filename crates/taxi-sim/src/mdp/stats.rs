//! Wait-time statistics for the MDP simulator.
//!
//! Grounded on `mdp_sim/mdp_sim_stats.h/.cpp`. The MDP simulator only
//! matches vehicles to passengers once per tick, so the exact wait time
//! within a tick is unobservable; three closed-form approximations cover
//! the cases that actually arise.

use taxi_core::cumulative_moving_average;

/// Which approximation rule produced a recorded wait sample.
#[derive(Copy, Clone, Debug)]
pub enum WaitRule {
    /// The vehicle was already idle before the tick began: the passenger
    /// (whenever it arrived) didn't wait for a vehicle to free up.
    AlreadyIdle,
    /// The passenger was already queued at the start of the tick: its
    /// exact arrival tick is unknown, so its wait is approximated as half
    /// a tick.
    QueueServed,
    /// The passenger arrived during this tick, at estimated fractional
    /// position `p` within `[now, now + 1)`, and was served by a vehicle
    /// that became idle partway through the same tick: approximate the
    /// wait as half the remaining time in the tick after `p`.
    SameTickArrival { now: u64, p: f64 },
}

impl WaitRule {
    fn wait(&self, tick_length: f64) -> f64 {
        match *self {
            WaitRule::AlreadyIdle => 0.0,
            WaitRule::QueueServed => tick_length / 2.0,
            WaitRule::SameTickArrival { now, p } => {
                let remaining_in_tick = (now + 1) as f64 - p;
                tick_length * remaining_in_tick / 2.0
            }
        }
    }
}

/// Running mean wait time and served-passenger count, updated incrementally
/// via [`cumulative_moving_average`] so the full sample history needn't be
/// retained.
#[derive(Clone, Debug, Default)]
pub struct MdpStatsRecorder {
    mean_wait: f64,
    served: u64,
}

impl MdpStatsRecorder {
    pub fn new() -> Self {
        MdpStatsRecorder { mean_wait: 0.0, served: 0 }
    }

    pub fn record_served(&mut self, tick_length: f64, rule: WaitRule) {
        let wait = rule.wait(tick_length);
        self.mean_wait = cumulative_moving_average(wait, self.mean_wait, self.served);
        self.served += 1;
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn mean_wait(&self) -> f64 {
        self.mean_wait
    }
}
