// Timestamp domain model - ISO-8601 date-times with or without an offset
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;
use thiserror::Error;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid ISO-8601 timestamp {value:?}: {source}")]
pub struct TimestampError {
    pub value: String,
    source: chrono::ParseError,
}

/// A parsed date-time. The offset, when present in the input, is kept so it
/// can be written back out unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl Timestamp {
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        let expanded = expand_short_forms(value.trim());

        let mut first_error = None;
        for format in OFFSET_FORMATS {
            match DateTime::parse_from_str(&expanded, format) {
                Ok(dt) => return Ok(Timestamp::Offset(dt)),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&expanded, format) {
                return Ok(Timestamp::Naive(dt));
            }
        }

        match NaiveDate::parse_from_str(&expanded, DATE_FORMAT) {
            Ok(date) => Ok(Timestamp::Naive(date.and_time(NaiveTime::MIN))),
            Err(e) => Err(TimestampError {
                value: value.to_string(),
                source: first_error.unwrap_or(e),
            }),
        }
    }

    /// Point on the UTC timeline used for ordering and subtraction.
    /// Naive timestamps are read as UTC wall-clock time.
    pub fn instant(&self) -> NaiveDateTime {
        match self {
            Timestamp::Naive(dt) => *dt,
            Timestamp::Offset(dt) => dt.naive_utc(),
        }
    }

    pub fn since(&self, earlier: &Timestamp) -> TimeDelta {
        self.instant() - earlier.instant()
    }

    pub fn seconds_since(&self, earlier: &Timestamp) -> f64 {
        let delta = self.since(earlier);
        delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
    }

    pub fn minutes_since(&self, earlier: &Timestamp) -> f64 {
        self.seconds_since(earlier) / 60.0
    }

    pub fn hours_since(&self, earlier: &Timestamp) -> f64 {
        self.seconds_since(earlier) / 3600.0
    }

    /// `YYYY-MM-DDTHH:MM:SS`, with `.ffffff` only when there are sub-second
    /// digits and `±HH:MM` only for offset-aware values.
    pub fn to_iso8601(&self) -> String {
        let naive = match self {
            Timestamp::Naive(dt) => *dt,
            Timestamp::Offset(dt) => dt.naive_local(),
        };

        let mut out = if naive.and_utc().timestamp_subsec_micros() == 0 {
            naive.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            naive.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        };

        if let Timestamp::Offset(dt) = self {
            out.push_str(&dt.format("%:z").to_string());
        }

        out
    }
}

/// Rewrite the ISO-8601 short forms chrono cannot read: an hour-only time
/// (`T08`), a bare hour offset (`+02`) and the `Z` designator.
fn expand_short_forms(value: &str) -> String {
    let separator = value.as_bytes().get(10);
    if !matches!(separator, Some(b'T' | b' ')) {
        return value.to_string();
    }

    let (date, time_and_offset) = value.split_at(11);
    let (time, offset) = match time_and_offset.strip_suffix(['Z', 'z']) {
        Some(time) => (time, "+00:00".to_string()),
        None => match time_and_offset.find(['+', '-']) {
            Some(at) => {
                let (time, offset) = time_and_offset.split_at(at);
                if offset.len() == 3 {
                    (time, format!("{offset}:00"))
                } else {
                    (time, offset.to_string())
                }
            }
            None => (time_and_offset, String::new()),
        },
    };

    if time.len() == 2 {
        format!("{date}{time}:00{offset}")
    } else {
        format!("{date}{time}{offset}")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}
