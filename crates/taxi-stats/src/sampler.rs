//! Categorical sampling from an empirical distribution.
//!
//! Grounded on `empirical_sampler.h`/`empirical_sampler_impl.h`: sampling is
//! always performed against a CDF, built once by prefix-summing a PMF, so
//! that drawing a category is an O(log n) binary search rather than a linear
//! scan.

use taxi_core::SimRng;

use crate::error::{TaxiStatsError, TaxiStatsResult};

/// A precomputed CDF over `0..sup()`, ready for O(log n) sampling.
#[derive(Clone, Debug)]
pub struct EmpiricalSampler {
    cdf: Vec<f64>,
}

impl EmpiricalSampler {
    /// Build a sampler from a probability mass function. `cdf_tol` bounds how
    /// far the pmf's sum may drift from 1 before construction fails; the
    /// final CDF entry is then pinned to exactly `1.0` so sampling can never
    /// run off the end through rounding.
    pub fn from_pmf(pmf: &[f64], cdf_tol: f64) -> TaxiStatsResult<Self> {
        let mut cdf = Vec::with_capacity(pmf.len());
        let mut sum = 0.0;
        for &p in pmf {
            sum += p;
            cdf.push(sum);
        }
        if let Some(last) = cdf.last_mut() {
            let drift = (1.0 - *last).abs();
            if drift >= cdf_tol {
                return Err(TaxiStatsError::CdfTolerance {
                    drift,
                    tolerance: cdf_tol,
                });
            }
            *last = 1.0;
        }
        Ok(EmpiricalSampler { cdf })
    }

    /// Build a sampler directly from an already-cumulative CDF.
    pub fn from_cdf(cdf: Vec<f64>, cdf_tol: f64) -> TaxiStatsResult<Self> {
        let mut cdf = cdf;
        if let Some(last) = cdf.last_mut() {
            let drift = (1.0 - *last).abs();
            if drift >= cdf_tol {
                return Err(TaxiStatsError::CdfTolerance {
                    drift,
                    tolerance: cdf_tol,
                });
            }
            *last = 1.0;
        }
        Ok(EmpiricalSampler { cdf })
    }

    /// The number of categories, i.e. the supremum of [`sample`](Self::sample).
    #[inline]
    pub fn sup(&self) -> usize {
        self.cdf.len()
    }

    /// Draw a category in `[0, sup())`.
    ///
    /// Uses `r = 1 - uniform(0,1)`, which lands in `(0, 1]`, so that a
    /// `lower_bound`-style search never selects a zero-probability entry at
    /// the start of the CDF.
    pub fn sample(&self, rng: &mut SimRng) -> usize {
        let r = 1.0 - rng.uniform_01();
        self.pick(r)
    }

    /// Binary-search the CDF for the first entry `>= r`.
    pub fn pick(&self, r: f64) -> usize {
        match self.cdf.partition_point(|&c| c < r) {
            i if i < self.cdf.len() => i,
            _ => self.cdf.len() - 1,
        }
    }
}
