//! Unit tests for taxi-core primitives.

#[cfg(test)]
mod ids {
    use crate::{StationId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = StationId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(StationId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(StationId(0) < StationId(1));
        assert!(VehicleId(100) > VehicleId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(StationId::INVALID.0, u32::MAX);
        assert_eq!(VehicleId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(StationId(7).to_string(), "StationId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn tick_ordering() {
        assert!(Tick(1) < Tick(2));
        assert_eq!(Tick::ZERO, Tick(0));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut r0 = SimRng::new(1);
        let mut r1 = SimRng::new(2);
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b);
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn uniform_01_in_bounds() {
        let mut rng = SimRng::new(7);
        for _ in 0..1000 {
            let v = rng.uniform_01();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn exponential_is_nonnegative() {
        let mut rng = SimRng::new(7);
        for _ in 0..1000 {
            assert!(rng.exponential(2.0) >= 0.0);
        }
    }
}

#[cfg(test)]
mod matrix {
    use crate::{all_square_matrices_with_row_sums_lte, cumulative_moving_average, SquareMatrix};

    #[test]
    fn square_matrix_indexing() {
        let mut m: SquareMatrix<i64> = SquareMatrix::new(3);
        m[(0, 1)] = 5;
        m[(2, 2)] = 9;
        assert_eq!(m[(0, 1)], 5);
        assert_eq!(m[(2, 2)], 9);
        assert_eq!(m.row(0), &[0, 5, 0]);
    }

    #[test]
    fn cma_tracks_running_mean() {
        let mut avg = 0.0;
        let mut count = 0u64;
        for x in [10.0, 20.0, 30.0] {
            avg = cumulative_moving_average(x, avg, count);
            count += 1;
        }
        assert!((avg - 20.0).abs() < 1e-9);
    }

    #[test]
    fn enumerate_two_station_zero_budget() {
        // With no idle vehicles anywhere, the only feasible action is all-zero.
        let matrices = all_square_matrices_with_row_sums_lte(&[0, 0]);
        assert_eq!(matrices.len(), 1);
        assert_eq!(matrices[0], vec![0, 0, 0, 0]);
    }

    #[test]
    fn enumerate_two_station_one_idle_each() {
        // Station 0 can send 0 or 1 vehicle to station 1, and vice versa:
        // 2 * 2 = 4 feasible matrices.
        let matrices = all_square_matrices_with_row_sums_lte(&[1, 1]);
        assert_eq!(matrices.len(), 4);
        for m in &matrices {
            assert_eq!(m[0], 0, "diagonal must stay zero");
            assert_eq!(m[3], 0, "diagonal must stay zero");
        }
    }

    #[test]
    fn row_sum_never_exceeds_budget() {
        let row_sums = [2u64, 0, 3];
        for m in all_square_matrices_with_row_sums_lte(&row_sums) {
            for (i, &budget) in row_sums.iter().enumerate() {
                let sum: i64 = m[i * 3..(i + 1) * 3].iter().sum();
                assert!(sum <= budget as i64);
            }
        }
    }
}
