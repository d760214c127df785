//! CSV fixture loaders for trip-time and OD-rate matrices.
//!
//! Grounded on `dt-schedule/src/loader.rs`'s `load_plans_csv`/
//! `load_plans_reader` dual-entry-point convention (one over a `Path`, one
//! over any `Read`). This loader exists only to give tests and examples a
//! convenient on-disk fixture format (`SPEC_FULL.md` §6.1) — it is not a
//! production demand-matrix parsing layer.
//!
//! # CSV formats
//!
//! Trip-time matrix (dense or sparse; missing `i==j` defaults to 0, missing
//! `i!=j` is an error):
//!
//! ```csv
//! origin,destin,trip_time
//! 0,1,5
//! 1,0,5
//! ```
//!
//! OD rate matrix (missing cells default to 0.0):
//!
//! ```csv
//! origin,destin,rate
//! 0,1,2.0
//! 1,0,1.0
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use taxi_core::SquareMatrix;

use crate::error::{TaxiStreamsError, TaxiStreamsResult};

#[derive(Deserialize)]
struct TripTimeRecord {
    origin: usize,
    destin: usize,
    trip_time: i64,
}

#[derive(Deserialize)]
struct OdRateRecord {
    origin: usize,
    destin: usize,
    rate: f64,
}

/// Load a trip-time matrix from a CSV file at `path`.
pub fn load_trip_time_csv(path: &Path, num_stations: usize) -> TaxiStreamsResult<SquareMatrix<i64>> {
    let file = std::fs::File::open(path)?;
    load_trip_time_reader(file, num_stations)
}

/// Like [`load_trip_time_csv`] but accepts any `Read` source.
pub fn load_trip_time_reader<R: Read>(
    reader: R,
    num_stations: usize,
) -> TaxiStreamsResult<SquareMatrix<i64>> {
    let mut matrix = SquareMatrix::new(num_stations);
    let mut seen = vec![false; num_stations * num_stations];

    let mut csv_reader = csv::Reader::from_reader(reader);
    for result in csv_reader.deserialize::<TripTimeRecord>() {
        let row = result.map_err(|e| TaxiStreamsError::Parse(e.to_string()))?;
        matrix[(row.origin, row.destin)] = row.trip_time;
        seen[row.origin * num_stations + row.destin] = true;
    }

    for i in 0..num_stations {
        for j in 0..num_stations {
            if i != j && !seen[i * num_stations + j] {
                return Err(TaxiStreamsError::MissingTripTime(i, j));
            }
        }
    }

    Ok(matrix)
}

/// Load an OD rate matrix from a CSV file at `path`.
pub fn load_od_rate_csv(path: &Path, num_stations: usize) -> TaxiStreamsResult<SquareMatrix<f64>> {
    let file = std::fs::File::open(path)?;
    load_od_rate_reader(file, num_stations)
}

/// Like [`load_od_rate_csv`] but accepts any `Read` source.
pub fn load_od_rate_reader<R: Read>(
    reader: R,
    num_stations: usize,
) -> TaxiStreamsResult<SquareMatrix<f64>> {
    let mut matrix = SquareMatrix::new(num_stations);

    let mut csv_reader = csv::Reader::from_reader(reader);
    for result in csv_reader.deserialize::<OdRateRecord>() {
        let row = result.map_err(|e| TaxiStreamsError::Parse(e.to_string()))?;
        matrix[(row.origin, row.destin)] = row.rate;
    }

    Ok(matrix)
}
