//! CSV export for the recorders in [`crate::observer`].
//!
//! Each function opens one file, writes a header row, then one row per
//! record — mirroring the teacher's `CsvWriter` backend, simplified to a
//! one-shot dump since these recorders are exported once after a run ends
//! rather than streamed live.

use std::path::Path;

use csv::Writer;

use crate::row::{EmptyTripRow, PaxEventRow, StationWaitBucketRow};
use crate::TaxiOutputResult;

pub fn write_pax_events(path: &Path, rows: &[PaxEventRow]) -> TaxiOutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["origin", "destin", "arrive", "vehicle", "pickup", "wait"])?;
    for row in rows {
        w.write_record(&[
            row.origin.to_string(),
            row.destin.to_string(),
            row.arrive.to_string(),
            row.vehicle.to_string(),
            row.pickup.to_string(),
            row.wait.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_empty_trips(path: &Path, rows: &[EmptyTripRow]) -> TaxiOutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["origin", "destin", "now"])?;
    for row in rows {
        w.write_record(&[row.origin.to_string(), row.destin.to_string(), row.now.to_string()])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_histogram(path: &Path, rows: &[StationWaitBucketRow]) -> TaxiOutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["station", "bucket_lower", "count"])?;
    for row in rows {
        w.write_record(&[row.station.to_string(), row.bucket_lower.to_string(), row.count.to_string()])?;
    }
    w.flush()?;
    Ok(())
}
