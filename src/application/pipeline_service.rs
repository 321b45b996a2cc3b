// Pipeline service - load, validate, sort, segment and emit trips
use crate::application::trip_io::{PointSource, RejectLog, TripSink};
use crate::domain::point::Point;
use crate::domain::trip::segment_trips;
use std::sync::Arc;

/// Counts for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub records_read: usize,
    pub records_rejected: usize,
    pub points_accepted: usize,
    pub trips_written: usize,
}

#[derive(Clone)]
pub struct PipelineService {
    source: Arc<dyn PointSource>,
    rejects: Arc<dyn RejectLog>,
    sink: Arc<dyn TripSink>,
}

impl PipelineService {
    pub fn new(
        source: Arc<dyn PointSource>,
        rejects: Arc<dyn RejectLog>,
        sink: Arc<dyn TripSink>,
    ) -> Self {
        Self {
            source,
            rejects,
            sink,
        }
    }

    pub fn run(&self) -> anyhow::Result<RunSummary> {
        let records = self.source.load_records()?;
        let mut summary = RunSummary {
            records_read: records.len(),
            ..RunSummary::default()
        };

        let mut points = Vec::with_capacity(records.len());
        for record in &records {
            match Point::from_record(record) {
                Ok(point) => points.push(point),
                Err(reason) => {
                    tracing::warn!("Rejected row {}: {}", record, reason);
                    self.rejects.record_rejection(record, &reason)?;
                    summary.records_rejected += 1;
                }
            }
        }
        summary.points_accepted = points.len();

        // Stable: equal timestamps keep their input order
        points.sort_by_key(|p| p.timestamp().instant());

        let trips = segment_trips(points);
        tracing::debug!("Segmented {} points into {} trips", summary.points_accepted, trips.len());

        for (index, trip) in trips.iter().enumerate() {
            let trip_number = index + 1;
            let stats = trip.stats();
            tracing::debug!(
                "Trip {}: {} points, {} km, {} min, avg {} km/h, max {} km/h",
                trip_number,
                trip.point_count(),
                stats.distance_km,
                stats.duration_min,
                stats.avg_speed_kmh,
                stats.max_speed_kmh
            );
            self.sink.write_trip(trip_number, trip, &stats)?;
        }

        self.sink.write_collection(&trips)?;
        summary.trips_written = trips.len();

        tracing::info!(
            "Processed {} records: {} rejected, {} points in {} trips",
            summary.records_read,
            summary.records_rejected,
            summary.points_accepted,
            summary.trips_written
        );

        Ok(summary)
    }
}
