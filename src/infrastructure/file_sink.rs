// File trip sink - per-trip CSV and JSON exports plus a combined GeoJSON file
use crate::application::trip_io::TripSink;
use crate::domain::trip::{Trip, TripStats};
use crate::infrastructure::geojson_mapper::trips_to_geojson;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const COLLECTION_FILE: &str = "trips.geojson";

#[derive(Debug, Clone)]
pub struct FileTripSink {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct PointRow<'a> {
    device_id: &'a str,
    lat: f64,
    lon: f64,
    timestamp: String,
}

impl FileTripSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn create(&self, file_name: &str) -> Result<(PathBuf, BufWriter<File>)> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })?;

        let path = self.output_dir.join(file_name);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok((path, BufWriter::new(file)))
    }

    fn write_points(&self, trip_number: usize, trip: &Trip) -> Result<()> {
        let (path, writer) = self.create(&format!("trip_{trip_number}.csv"))?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        for point in trip.points() {
            csv_writer
                .serialize(PointRow {
                    device_id: point.device_id(),
                    lat: point.lat(),
                    lon: point.lon(),
                    timestamp: point.timestamp().to_iso8601(),
                })
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        csv_writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!("Wrote {} points to {}", trip.point_count(), path.display());
        Ok(())
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let (path, mut writer) = self.create(file_name)?;

        serde_json::to_writer_pretty(&mut writer, value)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }
}

impl TripSink for FileTripSink {
    fn write_trip(&self, trip_number: usize, trip: &Trip, stats: &TripStats) -> Result<()> {
        self.write_points(trip_number, trip)?;

        let path = self.write_json(&format!("trip_{trip_number}.json"), stats)?;
        tracing::debug!("Wrote trip stats to {}", path.display());

        Ok(())
    }

    fn write_collection(&self, trips: &[Trip]) -> Result<()> {
        let path = self.write_json(COLLECTION_FILE, &trips_to_geojson(trips))?;
        tracing::info!("Wrote {} trips to {}", trips.len(), path.display());
        Ok(())
    }
}
