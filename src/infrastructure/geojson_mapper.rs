// Mapper to convert trips to a GeoJSON feature collection
use crate::domain::trip::Trip;
use serde::Serialize;

pub const TRIP_PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
];

#[derive(Debug, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    pub properties: TripProperties,
    pub geometry: LineString,
}

#[derive(Debug, Serialize)]
pub struct TripProperties {
    pub trip_id: String,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LineString {
    #[serde(rename = "type")]
    kind: &'static str,
    /// `[lon, lat]` pairs in trip order
    pub coordinates: Vec<[f64; 2]>,
}

/// Color for 1-based trip number `trip_number`
pub fn trip_color(trip_number: usize) -> &'static str {
    TRIP_PALETTE[(trip_number - 1) % TRIP_PALETTE.len()]
}

pub fn trips_to_geojson(trips: &[Trip]) -> FeatureCollection {
    let features = trips
        .iter()
        .enumerate()
        .map(|(index, trip)| trip_to_feature(index + 1, trip))
        .collect();

    FeatureCollection {
        kind: "FeatureCollection",
        features,
    }
}

fn trip_to_feature(trip_number: usize, trip: &Trip) -> Feature {
    let coordinates = trip.points().iter().map(|p| [p.lon(), p.lat()]).collect();

    Feature {
        kind: "Feature",
        properties: TripProperties {
            trip_id: format!("trip_{trip_number}"),
            color: trip_color(trip_number),
        },
        geometry: LineString {
            kind: "LineString",
            coordinates,
        },
    }
}
