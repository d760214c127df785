//! Cached derived figures for an origin-destination rate matrix.
//!
//! Grounded on `od_matrix_wrapper.h`/`.cpp`. `poisson_destin_pmf` and
//! `multinomial_trip_pmf` are declared in the header but have no definition
//! anywhere in the retrieved source tree; both are implemented here from
//! scratch, symmetric to their defined siblings (`poisson_origin_pmf`,
//! `poisson_trip_pmf`).

use taxi_core::{SimRng, SquareMatrix};

use crate::error::{TaxiStatsError, TaxiStatsResult};
use crate::sampler::EmpiricalSampler;

/// Cached marginals, trip probabilities, and a flattened categorical
/// sampler for an N×N non-negative rate matrix (zero diagonal, at least one
/// positive entry).
pub struct OdMatrixWrapper {
    od: SquareMatrix<f64>,
    expected_interarrival_time: f64,
    rate_from: Vec<f64>,
    rate_to: Vec<f64>,
    trip_prob: SquareMatrix<f64>,
    sampler: EmpiricalSampler,
}

impl OdMatrixWrapper {
    pub fn new(od: SquareMatrix<f64>) -> TaxiStatsResult<Self> {
        let n = od.n();
        if od.as_slice().len() != n * n {
            return Err(TaxiStatsError::NotSquare { rows: n, cols: n });
        }
        let total: f64 = od.as_slice().iter().sum();
        if total <= 0.0 {
            return Err(TaxiStatsError::EmptyOdMatrix);
        }
        let expected_interarrival_time = 1.0 / total;

        let mut rate_from = vec![0.0; n];
        let mut rate_to = vec![0.0; n];
        for i in 0..n {
            for j in 0..n {
                let v = od[(i, j)];
                rate_from[i] += v;
                rate_to[j] += v;
            }
        }

        let mut trip_prob = SquareMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                trip_prob[(i, j)] = od[(i, j)] * expected_interarrival_time;
            }
        }

        // Flatten row-major for a single categorical sampler, as the
        // original does for the sampling-and-voting hot path.
        let flat: Vec<f64> = trip_prob.as_slice().to_vec();
        let sampler = EmpiricalSampler::from_pmf(&flat, 1e-5)?;

        Ok(OdMatrixWrapper {
            od,
            expected_interarrival_time,
            rate_from,
            rate_to,
            trip_prob,
            sampler,
        })
    }

    #[inline]
    pub fn num_stations(&self) -> usize {
        self.od.n()
    }

    #[inline]
    pub fn expected_interarrival_time(&self) -> f64 {
        self.expected_interarrival_time
    }

    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.od[(i, j)]
    }

    #[inline]
    pub fn trip_prob(&self, i: usize, j: usize) -> f64 {
        self.trip_prob[(i, j)]
    }

    #[inline]
    pub fn rate_from(&self, i: usize) -> f64 {
        self.rate_from[i]
    }

    #[inline]
    pub fn rate_to(&self, j: usize) -> f64 {
        self.rate_to[j]
    }

    /// Probability of exactly `n` arrivals (per unit time) originating at
    /// station `i`.
    pub fn poisson_origin_pmf(&self, i: usize, n: u64) -> f64 {
        poisson_pmf(self.rate_from(i), n)
    }

    /// Probability of exactly `n` arrivals (per unit time) destined for
    /// station `j`.
    pub fn poisson_destin_pmf(&self, j: usize, n: u64) -> f64 {
        poisson_pmf(self.rate_to(j), n)
    }

    /// Probability of exactly `n` requests (per unit time) from `i` to `j`.
    pub fn poisson_trip_pmf(&self, i: usize, j: usize, n: u64) -> f64 {
        poisson_pmf(self.at(i, j), n)
    }

    /// Probability of strictly more than `n` arrivals (per unit time) at
    /// station `i`.
    pub fn poisson_origin_cdf_complement(&self, i: usize, n: u64) -> f64 {
        poisson_cdf_complement(self.rate_from(i), n)
    }

    /// Probability of strictly more than `n` requests (per unit time) from
    /// `i` to `j`.
    pub fn poisson_trip_cdf_complement(&self, i: usize, j: usize, n: u64) -> f64 {
        poisson_cdf_complement(self.at(i, j), n)
    }

    /// Probability of the given per-destination trip counts from station
    /// `i`, conditional on the total number of trips out of `i` (i.e.
    /// `x.iter().sum()`) being known.
    ///
    /// `x.len()` must equal `num_stations()`.
    pub fn multinomial_trip_pmf(&self, i: usize, x: &[u64]) -> f64 {
        let n = self.num_stations();
        assert_eq!(x.len(), n, "x must have one entry per station");
        let total: u64 = x.iter().sum();
        let rate_from_i = self.rate_from(i);

        let mut ln_p = ln_factorial(total);
        for (j, &xj) in x.iter().enumerate() {
            ln_p -= ln_factorial(xj);
            if xj == 0 {
                continue;
            }
            let qj = if rate_from_i > 0.0 {
                self.at(i, j) / rate_from_i
            } else {
                0.0
            };
            if qj <= 0.0 {
                return 0.0;
            }
            ln_p += xj as f64 * qj.ln();
        }
        ln_p.exp()
    }

    /// Draw `(origin, destin, interval)`: origin/destin from the flattened
    /// trip-probability sampler, interval from an exponential distribution
    /// with mean `expected_interarrival_time()`.
    pub fn sample(&self, rng: &mut SimRng) -> (usize, usize, f64) {
        let interval = rng.exponential(1.0 / self.expected_interarrival_time);
        let n = self.num_stations();
        let l = self.sampler.sample(rng);
        let origin = l / n;
        let destin = l % n;
        debug_assert!(origin < n);
        (origin, destin, interval)
    }
}

fn ln_factorial(n: u64) -> f64 {
    (1..=n).map(|k| (k as f64).ln()).sum()
}

/// Boost's Poisson distribution refuses a zero rate; mirror that edge case
/// directly rather than special-casing call sites.
fn poisson_pmf(lambda: f64, n: u64) -> f64 {
    if lambda == 0.0 {
        if n == 0 { 1.0 } else { 0.0 }
    } else {
        (-lambda + n as f64 * lambda.ln() - ln_factorial(n)).exp()
    }
}

fn poisson_cdf_complement(lambda: f64, n: u64) -> f64 {
    if lambda == 0.0 {
        0.0 // zero rate never exceeds any n >= 0
    } else {
        let cdf: f64 = (0..=n).map(|k| poisson_pmf(lambda, k)).sum();
        (1.0 - cdf).max(0.0)
    }
}
