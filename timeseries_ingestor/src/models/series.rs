//! Decoded, explicitly timestamped series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single sample with an explicit timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Milliseconds since the UNIX epoch.
    pub time: i64,
    /// The sample value; `None` is a gap, never a zero.
    pub value: Option<f64>,
}

impl Point {
    pub const fn new(time: i64, value: Option<f64>) -> Self {
        Self { time, value }
    }

    /// The timestamp as a UTC datetime, if it is within chrono's range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}

/// A named sequence of points in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Identifier of the data source (e.g. the endpoint `/fans/total`).
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Values of the series with gaps skipped.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.value)
    }
}
