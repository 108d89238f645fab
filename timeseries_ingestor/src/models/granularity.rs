//! Sampling granularity requested from the dense series API.
//!
//! The API accepts `hour`, `day` (the default) and `week`; `hour` is only
//! served by some endpoints. The granularity requested and the `period`
//! echoed in the payload should agree, see [`Granularity::period_secs`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid granularity: {input} (expected hour, day or week)")]
pub struct GranularityError {
    pub input: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Week,
}

impl Granularity {
    /// The sampling period in seconds a payload at this granularity carries.
    pub const fn period_secs(self) -> i64 {
        match self {
            Granularity::Hour => 3_600,
            Granularity::Day => 86_400,
            Granularity::Week => 604_800,
        }
    }

    /// The query parameter value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = GranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h" | "hr" | "hour" => Ok(Granularity::Hour),
            "d" | "day" => Ok(Granularity::Day),
            "w" | "wk" | "week" => Ok(Granularity::Week),
            _ => Err(GranularityError {
                input: s.to_string(),
            }),
        }
    }
}
