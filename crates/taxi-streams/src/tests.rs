//! Unit tests for taxi-streams.

#[cfg(test)]
mod stream {
    use taxi_core::{SimRng, SquareMatrix, StationId};
    use taxi_stats::OdMatrixWrapper;

    use crate::pax::Pax;
    use crate::stream::{DeterministicPaxStream, PaxStream, PoissonPaxStream};
    use crate::TaxiStreamsError;

    fn two_station_od() -> OdMatrixWrapper {
        OdMatrixWrapper::new(SquareMatrix::from_vec(2, vec![0.0, 2.0, 1.0, 0.0])).unwrap()
    }

    #[test]
    fn poisson_stream_nondecreasing() {
        let mut stream = PoissonPaxStream::new(two_station_od());
        let mut rng = SimRng::new(1);
        let mut last = 0u64;
        for _ in 0..1000 {
            let pax = stream.next_pax(&mut rng).unwrap();
            assert!(pax.arrive >= last);
            last = pax.arrive;
        }
    }

    #[test]
    fn poisson_stream_reset_rebases() {
        let mut stream = PoissonPaxStream::new(two_station_od());
        let mut rng = SimRng::new(1);
        stream.next_pax(&mut rng).unwrap();
        stream.reset(1000);
        let pax = stream.next_pax(&mut rng).unwrap();
        assert!(pax.arrive >= 1000);
    }

    #[test]
    fn deterministic_stream_drains_in_order() {
        let pax = vec![
            Pax::new(StationId(0), StationId(1), 5),
            Pax::new(StationId(1), StationId(0), 10),
        ];
        let mut stream = DeterministicPaxStream::new(pax);
        let mut rng = SimRng::new(0);
        assert_eq!(stream.next_pax(&mut rng).unwrap().arrive, 5);
        assert_eq!(stream.next_pax(&mut rng).unwrap().arrive, 10);
    }

    #[test]
    fn deterministic_stream_exhaustion_is_an_error() {
        let mut stream = DeterministicPaxStream::new(Vec::new());
        let mut rng = SimRng::new(0);
        assert!(matches!(
            stream.next_pax(&mut rng).unwrap_err(),
            TaxiStreamsError::StreamExhausted
        ));
    }

    #[test]
    fn deterministic_stream_reset_preserves_spacing() {
        let pax = vec![
            Pax::new(StationId(0), StationId(1), 5),
            Pax::new(StationId(1), StationId(0), 10),
        ];
        let mut stream = DeterministicPaxStream::new(pax);
        stream.reset(100);
        let mut rng = SimRng::new(0);
        assert_eq!(stream.next_pax(&mut rng).unwrap().arrive, 100);
        assert_eq!(stream.next_pax(&mut rng).unwrap().arrive, 105);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::loader::{load_od_rate_reader, load_trip_time_reader};
    use crate::TaxiStreamsError;

    #[test]
    fn trip_time_loader_fills_dense_matrix() {
        let csv = "origin,destin,trip_time\n0,1,5\n1,0,6\n";
        let matrix = load_trip_time_reader(Cursor::new(csv), 2).unwrap();
        assert_eq!(matrix[(0, 1)], 5);
        assert_eq!(matrix[(1, 0)], 6);
        assert_eq!(matrix[(0, 0)], 0);
    }

    #[test]
    fn trip_time_loader_rejects_missing_off_diagonal() {
        let csv = "origin,destin,trip_time\n0,1,5\n";
        let err = load_trip_time_reader(Cursor::new(csv), 2).unwrap_err();
        assert!(matches!(err, TaxiStreamsError::MissingTripTime(1, 0)));
    }

    #[test]
    fn od_rate_loader_defaults_missing_to_zero() {
        let csv = "origin,destin,rate\n0,1,2.0\n";
        let matrix = load_od_rate_reader(Cursor::new(csv), 2).unwrap();
        assert_eq!(matrix[(0, 1)], 2.0);
        assert_eq!(matrix[(1, 0)], 0.0);
    }
}
