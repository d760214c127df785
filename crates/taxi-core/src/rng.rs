//! The single process-wide deterministic RNG wrapper.
//!
//! `SPEC_FULL.md` §5 specifies a single process-wide uniform generator,
//! seeded externally, consumed by every sampling operation (OD draws,
//! Poisson interarrival, ε-greedy action selection). There is no per-agent
//! RNG here — unlike the teacher's `AgentRng`/`SimRng` split (which exists to
//! give each of millions of agents independent, order-insensitive randomness
//! for parallel execution), this domain is strictly single-threaded and a
//! single shared stream is both sufficient and required for reproducibility.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// The process-wide uniform random source.
///
/// Used only in single-threaded contexts — `SPEC_FULL.md` §5 is explicit
/// that no two handlers may race to consume random values.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// A uniform sample in `[0, 1)`.
    #[inline]
    pub fn uniform_01(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }

    /// A sample from the exponential distribution with the given `rate`
    /// (mean `1/rate`), via inverse-CDF sampling: `-ln(1 - U) / rate`.
    ///
    /// `rate` must be positive.
    #[inline]
    pub fn exponential(&mut self, rate: f64) -> f64 {
        debug_assert!(rate > 0.0, "exponential rate must be positive");
        -(1.0 - self.uniform_01()).ln() / rate
    }
}
