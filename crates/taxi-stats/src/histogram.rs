//! Unbounded-bin natural-number histogram and an OD-indexed count matrix.
//!
//! Grounded on `natural_histogram.h`/`.cpp` and `od_histogram.h`/`.cpp`.

use taxi_core::SquareMatrix;

/// A histogram over non-negative integers with bin size 1, growing to
/// accommodate the largest value recorded.
#[derive(Clone, Debug, Default)]
pub struct NaturalHistogram {
    frequency: Vec<u64>,
}

impl NaturalHistogram {
    pub fn new() -> Self {
        NaturalHistogram::default()
    }

    #[inline]
    pub fn increment(&mut self, x: usize) {
        self.accumulate(x, 1);
    }

    pub fn accumulate(&mut self, x: usize, weight: u64) {
        if x >= self.frequency.len() {
            self.frequency.resize(x + 1, 0);
        }
        self.frequency[x] += weight;
    }

    pub fn clear(&mut self) {
        self.frequency.clear();
    }

    pub fn frequency(&self, x: usize) -> u64 {
        self.frequency.get(x).copied().unwrap_or(0)
    }

    /// Total observation count across all bins.
    pub fn count(&self) -> u64 {
        self.frequency.iter().sum()
    }

    /// The mean of the distribution; `NaN` if no observations were recorded.
    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return f64::NAN;
        }
        let sum: u64 = self
            .frequency
            .iter()
            .enumerate()
            .map(|(i, &f)| i as u64 * f)
            .sum();
        sum as f64 / count as f64
    }

    /// The `n`-th central moment; `NaN` if no observations were recorded.
    pub fn central_moment(&self, n: i32) -> f64 {
        let count = self.count();
        if count == 0 {
            return f64::NAN;
        }
        let mu = self.mean();
        let count = count as f64;
        self.frequency
            .iter()
            .enumerate()
            .map(|(i, &f)| f as f64 * (i as f64 - mu).powi(n) / count)
            .sum()
    }
}

/// A histogram of origin-destination pair occurrences.
#[derive(Clone, Debug)]
pub struct OdHistogram {
    matrix: SquareMatrix<i64>,
}

impl OdHistogram {
    pub fn new(num_stations: usize) -> Self {
        OdHistogram {
            matrix: SquareMatrix::new(num_stations),
        }
    }

    #[inline]
    pub fn num_stations(&self) -> usize {
        self.matrix.n()
    }

    #[inline]
    pub fn increment(&mut self, origin: usize, destin: usize) {
        self.accumulate(origin, destin, 1);
    }

    #[inline]
    pub fn accumulate(&mut self, origin: usize, destin: usize, weight: i64) {
        self.matrix[(origin, destin)] += weight;
    }

    pub fn clear(&mut self) {
        for v in self.matrix.as_mut_slice() {
            *v = 0;
        }
    }

    #[inline]
    pub fn at(&self, i: usize, j: usize) -> i64 {
        self.matrix[(i, j)]
    }

    /// The largest weight accumulated anywhere in the matrix.
    pub fn max_weight(&self) -> i64 {
        self.matrix.as_slice().iter().copied().max().unwrap_or(i64::MIN)
    }

    /// The largest weight accumulated in row `i`.
    pub fn max_weight_in_row(&self, i: usize) -> i64 {
        self.matrix.row(i).iter().copied().max().unwrap_or(i64::MIN)
    }
}
