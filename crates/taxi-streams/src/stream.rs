//! Passenger request generators.
//!
//! Grounded on `bell_wong/bell_wong.h`'s `BWPaxStream`/`BWPoissonPaxStream`
//! and `mdp_sim/mdp_sim.h`'s `MDPPaxStream`/`MDPPoissonPaxStream` — the same
//! shape recurs at both time granularities in the original, so this crate's
//! stream is granularity-agnostic: it feeds the continuous-time simulator
//! directly and, via batching by the SARSA learner, the MDP simulator too.

use std::collections::VecDeque;

use taxi_core::{SimRng, StationId};
use taxi_stats::OdMatrixWrapper;

use crate::error::{TaxiStreamsError, TaxiStreamsResult};
use crate::pax::Pax;

/// An abstract, notionally infinite generator of passenger requests,
/// non-decreasing in `arrive`.
pub trait PaxStream {
    /// Draw the next request.
    fn next_pax(&mut self, rng: &mut SimRng) -> TaxiStreamsResult<Pax>;

    /// Rebase the stream so the next draw is relative to `now`, discarding
    /// any buffered future draw.
    fn reset(&mut self, now: u64);
}

/// Draws requests from an [`OdMatrixWrapper`]: interarrival times are
/// exponential with rate `Σ rate_from`, and each arrival's (origin, destin)
/// is drawn from the OD matrix's flattened categorical sampler.
pub struct PoissonPaxStream {
    od: OdMatrixWrapper,
    current_time: f64,
}

impl PoissonPaxStream {
    pub fn new(od: OdMatrixWrapper) -> Self {
        PoissonPaxStream {
            od,
            current_time: 0.0,
        }
    }
}

impl PaxStream for PoissonPaxStream {
    fn next_pax(&mut self, rng: &mut SimRng) -> TaxiStreamsResult<Pax> {
        let (origin, destin, interval) = self.od.sample(rng);
        self.current_time += interval;
        Ok(Pax::new(
            StationId::try_from(origin).expect("station index fits in u32"),
            StationId::try_from(destin).expect("station index fits in u32"),
            self.current_time.round() as u64,
        ))
    }

    fn reset(&mut self, now: u64) {
        self.current_time = now as f64;
    }
}

/// Wraps a fixed, caller-supplied sequence of requests. Useful for
/// deterministic tests and for the "cheating" rollouts used by the
/// sampling-and-voting handler.
pub struct DeterministicPaxStream {
    remaining: VecDeque<Pax>,
}

impl DeterministicPaxStream {
    pub fn new(pax: impl IntoIterator<Item = Pax>) -> Self {
        DeterministicPaxStream {
            remaining: pax.into_iter().collect(),
        }
    }
}

impl PaxStream for DeterministicPaxStream {
    fn next_pax(&mut self, _rng: &mut SimRng) -> TaxiStreamsResult<Pax> {
        self.remaining
            .pop_front()
            .ok_or(TaxiStreamsError::StreamExhausted)
    }

    /// Shift every remaining request's `arrive` by `now - first_remaining.arrive`,
    /// preserving relative spacing between requests.
    fn reset(&mut self, now: u64) {
        let Some(first) = self.remaining.front() else {
            return;
        };
        let shift = now as i64 - first.arrive as i64;
        for pax in self.remaining.iter_mut() {
            pax.arrive = (pax.arrive as i64 + shift) as u64;
        }
    }
}
