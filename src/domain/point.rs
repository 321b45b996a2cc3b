// GPS point domain model and raw record validation
use super::timestamp::{Timestamp, TimestampError};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// One untyped input row, column name to value, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
    /// Columns whose bytes were not valid UTF-8 and hold a lossy copy
    undecodable: Vec<String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        self.undecodable.retain(|n| *n != name);
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Store a lossily decoded value; validation rejects it if the column is required.
    pub fn insert_undecodable(&mut self, name: impl Into<String>, lossy_value: impl Into<String>) {
        let name = name.into();
        self.insert(name.clone(), lossy_value);
        self.undecodable.push(name);
    }

    pub fn is_undecodable(&self, name: &str) -> bool {
        self.undecodable.iter().any(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value:?}")?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RejectReason {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` is not valid UTF-8")]
    InvalidEncoding(&'static str),
    #[error("empty field `{0}`")]
    EmptyField(&'static str),
    #[error("could not parse `{field}` value {value:?} as a number")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    InvalidTimestamp(#[from] TimestampError),
    #[error("invalid coordinates (lat {lat}, lon {lon})")]
    OutOfRange { lat: f64, lon: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    device_id: String,
    lat: f64,
    lon: f64,
    timestamp: Timestamp,
}

impl Point {
    pub fn new(
        device_id: impl Into<String>,
        lat: f64,
        lon: f64,
        timestamp: Timestamp,
    ) -> Result<Self, RejectReason> {
        if !LATITUDE_RANGE.contains(&lat) || !LONGITUDE_RANGE.contains(&lon) {
            return Err(RejectReason::OutOfRange { lat, lon });
        }

        Ok(Self {
            device_id: device_id.into(),
            lat,
            lon,
            timestamp,
        })
    }

    /// Validate one raw input row.
    pub fn from_record(record: &RawRecord) -> Result<Self, RejectReason> {
        let device_id = required(record, "device_id")?;
        if device_id.is_empty() {
            return Err(RejectReason::EmptyField("device_id"));
        }

        let lat = parse_coordinate(record, "lat")?;
        let lon = parse_coordinate(record, "lon")?;
        let timestamp = Timestamp::parse(required(record, "timestamp")?)?;

        Point::new(device_id, lat, lon, timestamp)
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn distance_km(&self, other: &Point) -> f64 {
        super::geo::haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

fn required<'a>(record: &'a RawRecord, field: &'static str) -> Result<&'a str, RejectReason> {
    if record.is_undecodable(field) {
        return Err(RejectReason::InvalidEncoding(field));
    }
    record.get(field).ok_or(RejectReason::MissingField(field))
}

fn parse_coordinate(record: &RawRecord, field: &'static str) -> Result<f64, RejectReason> {
    let value = required(record, field)?;
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| RejectReason::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(device_id: &str, lat: &str, lon: &str, timestamp: &str) -> RawRecord {
        RawRecord::new()
            .with_field("device_id", device_id)
            .with_field("lat", lat)
            .with_field("lon", lon)
            .with_field("timestamp", timestamp)
    }

    #[test]
    fn test_valid_record() {
        let point = Point::from_record(&record("dev-1", "52.52", " 13.405", "2024-03-01T08:00:00"))
            .unwrap();
        assert_eq!(point.device_id(), "dev-1");
        assert_eq!(point.lat(), 52.52);
        assert_eq!(point.lon(), 13.405);
        assert_eq!(point.timestamp().to_iso8601(), "2024-03-01T08:00:00");
    }

    #[test]
    fn test_non_numeric_lat_is_rejected() {
        let err = Point::from_record(&record("dev-1", "north", "13.4", "2024-03-01T08:00:00"))
            .unwrap_err();
        assert_eq!(
            err,
            RejectReason::InvalidNumber {
                field: "lat",
                value: "north".to_string()
            }
        );
    }

    #[test]
    fn test_lat_out_of_range_is_rejected() {
        let err =
            Point::from_record(&record("dev-1", "91", "0", "2024-03-01T08:00:00")).unwrap_err();
        assert_eq!(err, RejectReason::OutOfRange { lat: 91.0, lon: 0.0 });
    }

    #[test]
    fn test_lon_out_of_range_is_rejected() {
        let err =
            Point::from_record(&record("dev-1", "0", "-180.5", "2024-03-01T08:00:00")).unwrap_err();
        assert!(matches!(err, RejectReason::OutOfRange { .. }));
    }

    #[test]
    fn test_boundary_coordinates_are_accepted() {
        assert!(Point::from_record(&record("dev-1", "90", "180", "2024-03-01T08:00:00")).is_ok());
        assert!(Point::from_record(&record("dev-1", "-90", "-180", "2024-03-01T08:00:00")).is_ok());
    }

    #[test]
    fn test_nan_and_infinite_coordinates_are_rejected() {
        for (lat, lon) in [("NaN", "0"), ("0", "inf"), ("-infinity", "0")] {
            let err = Point::from_record(&record("dev-1", lat, lon, "2024-03-01T08:00:00"))
                .unwrap_err();
            assert!(matches!(err, RejectReason::OutOfRange { .. }), "{lat} {lon}");
        }
    }

    #[test]
    fn test_missing_device_id_is_rejected() {
        let raw = RawRecord::new()
            .with_field("lat", "1")
            .with_field("lon", "1")
            .with_field("timestamp", "2024-03-01T08:00:00");
        assert_eq!(
            Point::from_record(&raw).unwrap_err(),
            RejectReason::MissingField("device_id")
        );
    }

    #[test]
    fn test_empty_device_id_is_rejected() {
        let err = Point::from_record(&record("", "1", "1", "2024-03-01T08:00:00")).unwrap_err();
        assert_eq!(err, RejectReason::EmptyField("device_id"));
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let err = Point::from_record(&record("dev-1", "1", "1", "03/01/2024 08:00")).unwrap_err();
        assert!(matches!(err, RejectReason::InvalidTimestamp(_)));
        assert!(err.to_string().contains("03/01/2024 08:00"));
    }

    #[test]
    fn test_whitespace_around_timestamp_is_accepted() {
        let point =
            Point::from_record(&record("dev-1", "1", "1", "  2024-03-01T08:00:00+01:00 ")).unwrap();
        assert_eq!(point.timestamp().to_iso8601(), "2024-03-01T08:00:00+01:00");
    }

    #[test]
    fn test_undecodable_required_field_is_rejected() {
        let mut raw = record("dev-1", "1", "1", "2024-03-01T08:00:00");
        raw.insert_undecodable("device_id", "\u{FFFD}\u{FFFD}");
        assert_eq!(
            Point::from_record(&raw).unwrap_err(),
            RejectReason::InvalidEncoding("device_id")
        );
    }

    #[test]
    fn test_undecodable_extra_column_is_ignored() {
        let mut raw = record("dev-1", "1", "1", "2024-03-01T08:00:00");
        raw.insert_undecodable("note", "\u{FFFD}");
        assert!(Point::from_record(&raw).is_ok());
    }

    #[test]
    fn test_raw_record_display_keeps_column_order() {
        let raw = record("dev-1", "x", "2", "t");
        assert_eq!(
            raw.to_string(),
            r#"{device_id: "dev-1", lat: "x", lon: "2", timestamp: "t"}"#
        );
    }

    #[test]
    fn test_raw_record_from_iter_overwrites_duplicates() {
        let raw: RawRecord = [("lat", "1"), ("lat", "2")].into_iter().collect();
        assert_eq!(raw.get("lat"), Some("2"));
        assert_eq!(raw.to_string(), r#"{lat: "2"}"#);
    }
}
