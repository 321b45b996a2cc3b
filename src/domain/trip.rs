// Trip domain model - segmentation of a point stream and per-trip statistics
use super::point::Point;
use serde::Serialize;

/// A gap longer than this between consecutive points starts a new trip.
pub const MAX_TIME_GAP_MINUTES: f64 = 25.0;

/// A jump further than this between consecutive points starts a new trip.
pub const MAX_DISTANCE_GAP_KM: f64 = 2.0;

/// Consecutive points of one journey, ordered by timestamp. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripStats {
    pub distance_km: f64,
    pub duration_min: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
}

impl Trip {
    #[cfg(test)]
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> &Point {
        &self.points[0]
    }

    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    pub fn stats(&self) -> TripStats {
        if self.points.len() < 2 {
            return TripStats::ZERO;
        }

        let mut distance_km = 0.0;
        let mut max_speed_kmh: f64 = 0.0;

        for pair in self.points.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            let segment_km = prev.distance_km(curr);
            distance_km += segment_km;

            let hours = curr.timestamp().hours_since(prev.timestamp());
            if hours > 0.0 {
                max_speed_kmh = max_speed_kmh.max(segment_km / hours);
            }
        }

        let duration_min = self.last().timestamp().minutes_since(self.first().timestamp());
        let avg_speed_kmh = if duration_min > 0.0 {
            distance_km / (duration_min / 60.0)
        } else {
            0.0
        };

        TripStats {
            distance_km: round_to(distance_km, 3),
            duration_min: round_to(duration_min, 2),
            avg_speed_kmh: round_to(avg_speed_kmh, 3),
            max_speed_kmh: round_to(max_speed_kmh, 3),
        }
    }
}

impl TripStats {
    pub const ZERO: TripStats = TripStats {
        distance_km: 0.0,
        duration_min: 0.0,
        avg_speed_kmh: 0.0,
        max_speed_kmh: 0.0,
    };
}

/// Split a time-sorted point stream into trips. Device ids are not
/// consulted: only the time and distance gap to the preceding point matter.
pub fn segment_trips(points: Vec<Point>) -> Vec<Trip> {
    let mut trips = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for point in points {
        if let Some(prev) = current.last() {
            if starts_new_trip(prev, &point) {
                trips.push(Trip {
                    points: std::mem::take(&mut current),
                });
            }
        }
        current.push(point);
    }

    if !current.is_empty() {
        trips.push(Trip { points: current });
    }

    trips
}

fn starts_new_trip(prev: &Point, curr: &Point) -> bool {
    let time_diff = curr.timestamp().minutes_since(prev.timestamp());
    let dist = prev.distance_km(curr);
    time_diff > MAX_TIME_GAP_MINUTES || dist > MAX_DISTANCE_GAP_KM
}

/// Round half-to-even on the exact binary value, the way `{:.N}` formats.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
