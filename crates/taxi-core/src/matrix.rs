//! Square matrices and the row-sum-constrained action enumeration used by
//! the proactive rebalancing handlers and the tabular SARSA learner.
//!
//! Grounded on `si_taxi.h`'s `cumulative_moving_average` and the
//! `each_square_matrix_with_row_sums_lte`/`all_square_matrices_with_row_sums_lte`
//! pair declared in `si_taxi.cpp` (used via the `F_get_matrix_data` functor and,
//! in `tabular_sarsa_solver.cpp`, via `F_random_qsa`/`F_max_qsa`). The template
//! definition itself was not present in the retrieved source, so the recursive
//! structure below is reconstructed from its call sites: enumerate every
//! square matrix with a zero diagonal whose row `i` sums to at most
//! `row_sums[i]`.

use std::ops::{Index, IndexMut};

/// A dense, row-major `n x n` matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquareMatrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> SquareMatrix<T> {
    /// A matrix of `n x n` default-valued entries.
    pub fn new(n: usize) -> Self {
        SquareMatrix {
            n,
            data: vec![T::default(); n * n],
        }
    }
}

impl<T> SquareMatrix<T> {
    pub fn from_vec(n: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), n * n, "data length must be n*n");
        SquareMatrix { n, data }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

impl<T> Index<(usize, usize)> for SquareMatrix<T> {
    type Output = T;
    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.data[r * self.n + c]
    }
}

impl<T> IndexMut<(usize, usize)> for SquareMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        &mut self.data[r * self.n + c]
    }
}

/// Cumulative moving average: given the previous `average` over `count`
/// observations and a newly observed `x`, returns the updated average.
///
/// Does not update `count` — callers own that increment.
#[inline]
pub fn cumulative_moving_average(x: f64, average: f64, count: u64) -> f64 {
    average + (x - average) / (count as f64 + 1.0)
}

/// Visit every `n x n` row-major matrix (flattened into `data[offset..offset
/// + n*n]`) with a zero diagonal whose row `i` sums to at most
/// `row_sums[i]`, calling `visit` once per complete matrix.
///
/// `data` is reused as scratch space across calls to `visit` — callers that
/// need to keep a matrix past the call must clone it.
pub fn each_square_matrix_with_row_sums_lte<F: FnMut(&[i64])>(
    data: &mut [i64],
    offset: usize,
    row: usize,
    col: usize,
    row_sums: &[u64],
    visit: &mut F,
) {
    let n = row_sums.len();
    if row == n {
        visit(&data[offset..offset + n * n]);
        return;
    }
    if col == n {
        each_square_matrix_with_row_sums_lte(data, offset, row + 1, 0, row_sums, visit);
        return;
    }
    if col == row {
        // Diagonal stays zero: a station never sends vehicles to itself.
        data[offset + row * n + col] = 0;
        each_square_matrix_with_row_sums_lte(data, offset, row, col + 1, row_sums, visit);
        return;
    }

    let row_used: i64 = (0..col).filter(|&c| c != row).map(|c| data[offset + row * n + c]).sum();
    let remaining = row_sums[row] as i64 - row_used;
    for v in 0..=remaining.max(0) {
        data[offset + row * n + col] = v;
        each_square_matrix_with_row_sums_lte(data, offset, row, col + 1, row_sums, visit);
    }
}

/// Collect every feasible matrix from [`each_square_matrix_with_row_sums_lte`]
/// into a `Vec`.
pub fn all_square_matrices_with_row_sums_lte(row_sums: &[u64]) -> Vec<Vec<i64>> {
    let n = row_sums.len();
    let mut data = vec![0i64; n * n];
    let mut results = Vec::new();
    let mut collect = |m: &[i64]| results.push(m.to_vec());
    each_square_matrix_with_row_sums_lte(&mut data, 0, 0, 0, row_sums, &mut collect);
    results
}
