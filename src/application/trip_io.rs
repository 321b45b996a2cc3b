// Boundary traits for reading points and emitting trips
use crate::domain::point::{RawRecord, RejectReason};
use crate::domain::trip::{Trip, TripStats};

pub trait PointSource {
    /// Load every raw record from the input
    fn load_records(&self) -> anyhow::Result<Vec<RawRecord>>;
}

pub trait RejectLog {
    /// Append one rejected record and the reason it was rejected
    fn record_rejection(&self, record: &RawRecord, reason: &RejectReason) -> anyhow::Result<()>;
}

pub trait TripSink {
    /// Write the points and statistics of trip number `trip_number` (1-based)
    fn write_trip(&self, trip_number: usize, trip: &Trip, stats: &TripStats) -> anyhow::Result<()>;

    /// Write the collection of all trips, once per run
    fn write_collection(&self, trips: &[Trip]) -> anyhow::Result<()>;
}
