//! Unit tests for taxi-stats primitives.

#[cfg(test)]
mod sampler {
    use crate::sampler::EmpiricalSampler;
    use crate::TaxiStatsError;
    use taxi_core::SimRng;

    #[test]
    fn uniform_three_way_split() {
        let sampler =
            EmpiricalSampler::from_pmf(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], 1e-5).unwrap();
        assert_eq!(sampler.sup(), 3);
        assert_eq!(sampler.pick(0.1), 0);
        assert_eq!(sampler.pick(0.4), 1);
        assert_eq!(sampler.pick(0.9), 2);
        assert_eq!(sampler.pick(1.0), 2);
    }

    #[test]
    fn cdf_tail_pinned_to_one() {
        let sampler = EmpiricalSampler::from_pmf(&[0.3, 0.3, 0.399999999], 1e-5).unwrap();
        assert_eq!(sampler.pick(1.0), 2);
    }

    #[test]
    fn rejects_drift_beyond_tolerance() {
        let err = EmpiricalSampler::from_pmf(&[0.3, 0.3], 1e-5).unwrap_err();
        assert!(matches!(err, TaxiStatsError::CdfTolerance { .. }));
    }

    #[test]
    fn sampled_frequencies_converge() {
        let mut rng = SimRng::new(7);
        let sampler = EmpiricalSampler::from_pmf(&[0.2, 0.3, 0.5], 1e-5).unwrap();
        let mut counts = [0u32; 3];
        let n = 20_000;
        for _ in 0..n {
            counts[sampler.sample(&mut rng)] += 1;
        }
        let freq: Vec<f64> = counts.iter().map(|&c| c as f64 / n as f64).collect();
        assert!((freq[0] - 0.2).abs() < 0.02);
        assert!((freq[1] - 0.3).abs() < 0.02);
        assert!((freq[2] - 0.5).abs() < 0.02);
    }
}

#[cfg(test)]
mod histogram {
    use crate::histogram::{NaturalHistogram, OdHistogram};

    #[test]
    fn natural_histogram_mean_and_moments() {
        let mut h = NaturalHistogram::new();
        for x in [1, 2, 2, 3] {
            h.increment(x);
        }
        assert_eq!(h.count(), 4);
        assert!((h.mean() - 2.0).abs() < 1e-9);
        assert!(h.central_moment(2) >= 0.0);
    }

    #[test]
    fn natural_histogram_empty_is_nan() {
        let h = NaturalHistogram::new();
        assert!(h.mean().is_nan());
        assert!(h.central_moment(2).is_nan());
    }

    #[test]
    fn od_histogram_tracks_counts() {
        let mut h = OdHistogram::new(3);
        h.increment(0, 1);
        h.increment(0, 1);
        h.increment(0, 2);
        assert_eq!(h.at(0, 1), 2);
        assert_eq!(h.at(0, 2), 1);
        assert_eq!(h.max_weight(), 2);
        assert_eq!(h.max_weight_in_row(0), 2);
        assert_eq!(h.max_weight_in_row(1), 0);
    }
}

#[cfg(test)]
mod call_time {
    use crate::call_time::CallTimeTracker;
    use taxi_core::SquareMatrix;

    fn trip_times() -> SquareMatrix<i64> {
        // 0 -> 1 -> 2 chain; 0->2 direct shortcut.
        SquareMatrix::from_vec(3, vec![0, 5, 9, 5, 0, 4, 9, 4, 0])
    }

    #[test]
    fn initializes_to_shortest_upstream_trip() {
        let tt = trip_times();
        let tracker = CallTimeTracker::new(&tt);
        assert_eq!(tracker.at(0), 5.0);
        assert_eq!(tracker.at(1), 4.0);
        assert_eq!(tracker.at(2), 4.0);
    }

    #[test]
    fn trivial_trips_are_ignored() {
        let tt = trip_times();
        let mut tracker = CallTimeTracker::new(&tt);
        let before = tracker.at(0);
        tracker.update(0, 0, &tt);
        assert_eq!(tracker.at(0), before);
    }

    #[test]
    fn call_time_converges_to_mean_of_observed_durations() {
        let tt = trip_times();
        let mut tracker = CallTimeTracker::new(&tt);
        for _ in 0..5 {
            tracker.update(1, 2, &tt);
        }
        assert!((tracker.at(2) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn lower_bound_invariant_holds_after_updates() {
        let tt = trip_times();
        let mut tracker = CallTimeTracker::new(&tt);
        tracker.update(0, 2, &tt);
        let min_upstream = (0..3)
            .filter(|&j| j != 2)
            .map(|j| tt[(j, 2)])
            .min()
            .unwrap() as f64;
        assert!(tracker.at(2) >= min_upstream);
    }
}

#[cfg(test)]
mod od_matrix {
    use crate::od_matrix::OdMatrixWrapper;
    use crate::TaxiStatsError;
    use taxi_core::{SimRng, SquareMatrix};

    fn two_station_od() -> SquareMatrix<f64> {
        SquareMatrix::from_vec(2, vec![0.0, 2.0, 1.0, 0.0])
    }

    #[test]
    fn marginals_and_interarrival() {
        let od = OdMatrixWrapper::new(two_station_od()).unwrap();
        assert_eq!(od.rate_from(0), 2.0);
        assert_eq!(od.rate_from(1), 1.0);
        assert_eq!(od.rate_to(0), 1.0);
        assert_eq!(od.rate_to(1), 2.0);
        assert!((od.expected_interarrival_time() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn trip_prob_sums_to_one() {
        let od = OdMatrixWrapper::new(two_station_od()).unwrap();
        let n = od.num_stations();
        let sum: f64 = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| od.trip_prob(i, j))
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_all_zero_matrix() {
        let od = SquareMatrix::from_vec(2, vec![0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            OdMatrixWrapper::new(od).unwrap_err(),
            TaxiStatsError::EmptyOdMatrix
        ));
    }

    #[test]
    fn poisson_pmf_zero_rate_is_certain_at_zero() {
        let od = OdMatrixWrapper::new(two_station_od()).unwrap();
        // Station 0 -> station 0 never happens (zero diagonal).
        assert_eq!(od.poisson_trip_pmf(0, 0, 0), 1.0);
        assert_eq!(od.poisson_trip_pmf(0, 0, 1), 0.0);
    }

    #[test]
    fn poisson_origin_pmf_matches_known_value() {
        let od = OdMatrixWrapper::new(two_station_od()).unwrap();
        // rate_from(0) = 2, so P(0 arrivals) = e^-2.
        let p = od.poisson_origin_pmf(0, 0);
        assert!((p - (-2.0f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn poisson_cdf_complement_decreases_with_n() {
        let od = OdMatrixWrapper::new(two_station_od()).unwrap();
        let a = od.poisson_origin_cdf_complement(0, 1);
        let b = od.poisson_origin_cdf_complement(0, 5);
        assert!(a > b);
    }

    #[test]
    fn multinomial_pmf_single_destination_is_certain() {
        let od = OdMatrixWrapper::new(two_station_od()).unwrap();
        let p = od.multinomial_trip_pmf(1, &[3, 0]);
        assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sample_respects_zero_entries() {
        let od = OdMatrixWrapper::new(two_station_od()).unwrap();
        let mut rng = SimRng::new(42);
        for _ in 0..500 {
            let (origin, destin, interval) = od.sample(&mut rng);
            assert_ne!(origin, destin);
            assert!(interval >= 0.0);
        }
    }

    #[test]
    fn empirical_frequencies_converge_to_trip_prob() {
        let od = OdMatrixWrapper::new(two_station_od()).unwrap();
        let mut rng = SimRng::new(1);
        let mut hits_0_1 = 0u32;
        let n = 20_000;
        for _ in 0..n {
            let (o, d, _) = od.sample(&mut rng);
            if o == 0 && d == 1 {
                hits_0_1 += 1;
            }
        }
        let freq = hits_0_1 as f64 / n as f64;
        assert!((freq - od.trip_prob(0, 1)).abs() < 0.02);
    }
}
