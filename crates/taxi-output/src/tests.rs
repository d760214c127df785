//! Integration tests for taxi-output.

use taxi_core::{StationId, VehicleId};
use taxi_sim::observer::StatsSink;
use taxi_streams::Pax;

fn station(i: usize) -> StationId {
    StationId::try_from(i).expect("station index fits in u32")
}

fn vehicle(i: usize) -> VehicleId {
    VehicleId::try_from(i).expect("vehicle index fits in u32")
}

mod mean_wait_tests {
    use super::*;
    use crate::observer::MeanWaitSink;

    #[test]
    fn averages_across_served_pax() {
        let mut sink = MeanWaitSink::new();
        let pax = Pax::new(station(0), station(1), 10);
        sink.on_pax_served(&pax, vehicle(0), 15); // wait 5
        sink.on_pax_served(&pax, vehicle(0), 20); // wait 10
        assert_eq!(sink.served(), 2);
        assert!((sink.mean_wait() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn zero_wait_by_default() {
        let sink = MeanWaitSink::new();
        assert_eq!(sink.served(), 0);
        assert_eq!(sink.mean_wait(), 0.0);
    }
}

mod histogram_tests {
    use super::*;
    use crate::observer::HistogramSink;

    #[test]
    fn buckets_by_station_and_width() {
        let mut sink = HistogramSink::new(2, 10);
        let pax_from_0 = Pax::new(station(0), station(1), 0);
        sink.on_pax_served(&pax_from_0, vehicle(0), 3); // wait 3 -> bucket 0
        sink.on_pax_served(&pax_from_0, vehicle(0), 13); // wait 13 -> bucket 10

        let pax_from_1 = Pax::new(station(1), station(0), 0);
        sink.on_pax_served(&pax_from_1, vehicle(0), 1); // wait 1 -> bucket 0

        let rows = sink.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().filter(|r| r.station == 0).count(), 2);
        assert_eq!(rows.iter().filter(|r| r.station == 1).count(), 1);
    }

    #[test]
    #[should_panic(expected = "bucket_width must be positive")]
    fn rejects_zero_width() {
        HistogramSink::new(1, 0);
    }
}

mod raw_recorder_tests {
    use super::*;
    use crate::observer::RawRecorderSink;

    #[test]
    fn records_served_pax_and_empty_trips() {
        let mut sink = RawRecorderSink::new();
        let pax = Pax::new(station(0), station(1), 10);
        sink.on_pax_served(&pax, vehicle(2), 17);
        sink.on_empty_trip(station(1), station(0), 30);

        assert_eq!(sink.pax_events().len(), 1);
        let row = sink.pax_events()[0];
        assert_eq!(row.origin, 0);
        assert_eq!(row.destin, 1);
        assert_eq!(row.arrive, 10);
        assert_eq!(row.vehicle, 2);
        assert_eq!(row.pickup, 17);
        assert_eq!(row.wait, 7);

        assert_eq!(sink.empty_trips().len(), 1);
        let trip = sink.empty_trips()[0];
        assert_eq!(trip.origin, 1);
        assert_eq!(trip.destin, 0);
        assert_eq!(trip.now, 30);
    }
}

mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{write_empty_trips, write_histogram, write_pax_events};
    use crate::row::{EmptyTripRow, PaxEventRow, StationWaitBucketRow};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn pax_events_round_trip() {
        let dir = tmp();
        let path = dir.path().join("pax_events.csv");
        let rows = vec![
            PaxEventRow { origin: 0, destin: 1, arrive: 10, vehicle: 0, pickup: 15, wait: 5 },
            PaxEventRow { origin: 1, destin: 0, arrive: 20, vehicle: 1, pickup: 20, wait: 0 },
        ];
        write_pax_events(&path, &rows).expect("write succeeds");

        let mut rdr = ::csv::Reader::from_path(&path).expect("file exists");
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["origin", "destin", "arrive", "vehicle", "pickup", "wait"]);
        let records: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][5], "5");
    }

    #[test]
    fn empty_trips_round_trip() {
        let dir = tmp();
        let path = dir.path().join("empty_trips.csv");
        let rows = vec![EmptyTripRow { origin: 2, destin: 3, now: 99 }];
        write_empty_trips(&path, &rows).expect("write succeeds");

        let mut rdr = ::csv::Reader::from_path(&path).expect("file exists");
        let records: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "2");
        assert_eq!(&records[0][2], "99");
    }

    #[test]
    fn histogram_round_trip() {
        let dir = tmp();
        let path = dir.path().join("histogram.csv");
        let rows = vec![StationWaitBucketRow { station: 0, bucket_lower: 10, count: 4 }];
        write_histogram(&path, &rows).expect("write succeeds");

        let mut rdr = ::csv::Reader::from_path(&path).expect("file exists");
        let records: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][2], "4");
    }

    #[test]
    fn empty_rows_still_write_header() {
        let dir = tmp();
        let path = dir.path().join("empty.csv");
        write_pax_events(&path, &[]).expect("write succeeds");
        assert!(path.exists());
    }
}
