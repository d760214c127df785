//! Tabular SARSA: learns a station-pair dispatch policy over the MDP
//! simulator's discretized state space.
//!
//! Grounded on `mdp_sim/mdp_sim_sarsa_agent.h/.cpp`. The Q-table is a plain
//! hash map keyed by `(state, action)` rather than a dense array, since the
//! state space (per-station queue/inbound counts crossed with per-vehicle
//! remaining times) is sparse relative to its nominal size — the same
//! reasoning the teacher applies to its `FxHashMap`-keyed contact index.

use std::io::{self, Write};

use rustc_hash::FxHashMap;

use taxi_core::{all_square_matrices_with_row_sums_lte, SimRng, StationId};

use crate::mdp::sim::MdpSim;
use crate::mdp::stats::MdpStatsRecorder;

/// The learner's view of simulator state: per-station queue lengths,
/// per-station inbound-vehicle counts, and the fleet's remaining-time
/// multiset.
///
/// `remaining_times` is sorted on construction — a vehicle's identity
/// doesn't affect the dispatch problem, only the multiset of how long until
/// each one frees up, so sorting collapses permutations of the same
/// physical state onto the same table entry.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateVector {
    queue_lengths: Vec<i64>,
    inbound_counts: Vec<i64>,
    remaining_times: Vec<i64>,
}

impl StateVector {
    pub fn new(queue_lengths: Vec<i64>, inbound_counts: Vec<i64>, mut remaining_times: Vec<i64>) -> Self {
        remaining_times.sort_unstable();
        StateVector { queue_lengths, inbound_counts, remaining_times }
    }
}

/// A tabular SARSA(0) learner over [`StateVector`] states and flattened
/// `n x n` dispatch-matrix actions.
pub struct TabularSarsaSolver {
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    q: FxHashMap<(StateVector, Vec<i64>), f64>,
}

impl TabularSarsaSolver {
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Self {
        TabularSarsaSolver {
            alpha,
            gamma,
            epsilon,
            q: FxHashMap::default(),
        }
    }

    /// Every feasible dispatch matrix given `idle_counts[i]` idle vehicles
    /// available at station `i` (and the zero-diagonal, no-self-dispatch
    /// constraint `each_square_matrix_with_row_sums_lte` already enforces).
    pub fn feasible_actions(&self, idle_counts: &[u64]) -> Vec<Vec<i64>> {
        all_square_matrices_with_row_sums_lte(idle_counts)
    }

    /// Epsilon-greedy action selection: with probability `epsilon` pick a
    /// uniformly random feasible action, otherwise the highest-`Q` feasible
    /// action (ties broken by enumeration order, i.e. lexicographically
    /// smallest matrix).
    pub fn select_action(&self, state: &StateVector, idle_counts: &[u64], rng: &mut SimRng) -> Vec<i64> {
        let actions = self.feasible_actions(idle_counts);
        assert!(!actions.is_empty(), "the all-zero matrix is always feasible");

        if rng.gen_bool(self.epsilon) {
            let idx = rng.gen_range(0..actions.len());
            return actions[idx].clone();
        }

        let mut best: Option<(Vec<i64>, f64)> = None;
        for action in actions {
            let q = self.q.get(&(state.clone(), action.clone())).copied().unwrap_or(0.0);
            match &best {
                Some((_, best_q)) if q <= *best_q => {}
                _ => best = Some((action, q)),
            }
        }
        best.expect("at least one feasible action exists").0
    }

    /// `Q(s,a) <- Q(s,a) + alpha * [r + gamma * Q(s',a') - Q(s,a)]`.
    pub fn update(
        &mut self,
        state: StateVector,
        action: Vec<i64>,
        reward: f64,
        next_state: &StateVector,
        next_action: &[i64],
    ) {
        let current = self.q.get(&(state.clone(), action.clone())).copied().unwrap_or(0.0);
        let next_q = self
            .q
            .get(&(next_state.clone(), next_action.to_vec()))
            .copied()
            .unwrap_or(0.0);
        let updated = current + self.alpha * (reward + self.gamma * next_q - current);
        self.q.insert((state, action), updated);
    }

    pub fn q_table_len(&self) -> usize {
        self.q.len()
    }

    /// The learner's state vector for `sim`'s current state.
    fn observe(sim: &MdpSim) -> StateVector {
        let n = sim.num_stations();
        let station = |i: usize| StationId::try_from(i).expect("station index fits in u32");
        let queue_lengths = (0..n).map(|i| sim.queue_len(station(i))).collect();
        let inbound_counts = (0..n).map(|i| sim.inbound(station(i))).collect();
        StateVector::new(queue_lengths, inbound_counts, sim.remaining_times())
    }

    /// Per-station idle-vehicle counts still available for dispatch once the
    /// existing queue has had its turn, for [`Self::feasible_actions`] — the
    /// same `available[i]` an about-to-run `tick` will check the action
    /// matrix against (SPEC_FULL.md §4.7 steps 2-3), so a selected action
    /// can never trip `tick`'s precondition assertion.
    fn idle_counts(sim: &MdpSim) -> Vec<u64> {
        let n = sim.num_stations();
        (0..n)
            .map(|i| {
                let station = StationId::try_from(i).expect("station index fits in u32");
                let idle = sim.idle(station);
                let queue_len = sim.queue_len(station);
                (idle - queue_len.min(idle)).max(0) as u64
            })
            .collect()
    }

    /// Drive `sim` with SARSA(0), batching `stream`'s output (already
    /// wired into `sim`) into per-tick request lists, until `num_pax`
    /// requests have been consumed — including any final partial batch.
    /// Returns the number of ticks run.
    ///
    /// Grounded on `mdp_sim/mdp_sim_sarsa_agent.h/.cpp`'s training loop:
    /// select an action for the current state, step the simulator, observe
    /// the next state and its greedy-or-explored action, and update on the
    /// `(s, a, r, s', a')` quintuple.
    pub fn handle_pax_stream(&mut self, sim: &mut MdpSim, num_pax: usize, rng: &mut SimRng, stats: &mut MdpStatsRecorder) -> u64 {
        let mut state = Self::observe(sim);
        let mut action = self.select_action(&state, &Self::idle_counts(sim), rng);
        let mut ticks = 0u64;

        while sim.requests_consumed() < num_pax as u64 {
            let (_served, reward) = sim.tick(&action, rng, stats);
            ticks += 1;

            let next_state = Self::observe(sim);
            let next_action = self.select_action(&next_state, &Self::idle_counts(sim), rng);
            self.update(state, action, reward, &next_state, &next_action);

            state = next_state;
            action = next_action;
        }

        ticks
    }

    /// Write one `state action -> value` line per learned entry, sorted by
    /// `(state, action)` for deterministic output.
    ///
    /// Grounded on `mdp_sim/tabular_sarsa_solver.h`'s `dump_q(ostream&)`.
    pub fn dump_q(&self, mut w: impl Write) -> io::Result<()> {
        let mut entries: Vec<(&(StateVector, Vec<i64>), &f64)> = self.q.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for ((state, action), value) in entries {
            writeln!(w, "{state:?} {action:?} -> {value}")?;
        }
        Ok(())
    }

    /// Collapse the learned Q-table into a pure `state -> best action`
    /// policy, for use by [`crate::proactive::MdpPolicyHandler`].
    pub fn into_policy(self) -> FxHashMap<StateVector, Vec<i64>> {
        let mut best: FxHashMap<StateVector, (Vec<i64>, f64)> = FxHashMap::default();
        for ((state, action), value) in self.q {
            best.entry(state)
                .and_modify(|(best_action, best_value)| {
                    if value > *best_value {
                        *best_action = action.clone();
                        *best_value = value;
                    }
                })
                .or_insert((action, value));
        }
        best.into_iter().map(|(state, (action, _))| (state, action)).collect()
    }
}
