//! Plain data row types written by the recorders and exported to CSV.

/// One served passenger request, as recorded by [`crate::observer::RawRecorderSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaxEventRow {
    pub origin:  u32,
    pub destin:  u32,
    pub arrive:  u64,
    pub vehicle: u32,
    pub pickup:  u64,
    /// `pickup - arrive`.
    pub wait:    u64,
}

/// One empty (unoccupied) vehicle trip, as recorded by
/// [`crate::observer::RawRecorderSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyTripRow {
    pub origin: u32,
    pub destin: u32,
    pub now:    u64,
}

/// One station's aggregated wait-time histogram bucket, as recorded by
/// [`crate::observer::HistogramSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationWaitBucketRow {
    pub station:     u32,
    /// Inclusive lower bound of this bucket, in ticks.
    pub bucket_lower: u64,
    pub count:        u64,
}
